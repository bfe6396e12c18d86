use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mandi::commands;

#[derive(Parser)]
#[command(
    name = "mandi",
    version,
    about = "Seller dashboard backend with market trend analytics and AI-assisted listings",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard API server
    Serve {
        /// Bind address, overriding MANDI_BIND
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },

    /// Run the trend pipeline once and print the ranking
    Trends {
        /// City to analyze (repeatable)
        #[arg(short, long = "city", required = true)]
        cities: Vec<String>,

        /// Product category to analyze
        #[arg(short = 'C', long)]
        category: String,

        /// Number of ranked trends to print
        #[arg(short, long, default_value = "8")]
        top: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging
    setup_tracing(&cli.log_format, cli.verbose)?;

    tracing::info!("mandi dashboard backend starting");

    match cli.command {
        Commands::Serve { bind } => {
            tracing::info!(bind = ?bind, "Starting serve command");
            commands::serve(bind).await?;
        }

        Commands::Trends {
            cities,
            category,
            top,
        } => {
            tracing::info!(
                cities = ?cities,
                category = %category,
                top = %top,
                "Starting trends command"
            );
            commands::trends(cities, category, top).await?;
        }
    }

    tracing::info!("mandi completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("mandi=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("mandi=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
