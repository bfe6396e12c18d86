//! REST API handlers for the dashboard server
//!
//! This module defines the API routes and handlers for the dashboard
//! backend.

use axum::{
    extract::{Query, State},
    http::{request::Parts, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::dashboard::{self, SummaryRequest};
use crate::error::Error;
use crate::listing::{self, GeneratedContent, ListingRequest};
use crate::models::{NewProduct, StoreProfile, TrendQuery, TrendsResponse, UserSession};
use crate::planner;
use crate::reshape::DashboardViews;
use crate::store::StoreError;
use crate::trends::images::{self, FeatureImages};

use super::app::AppState;

// ============================================================================
// API Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Simple error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub llm_available: bool,
}

/// Cron trigger response
#[derive(Debug, Serialize)]
pub struct CronResponse {
    pub status: String,
    pub message: String,
}

/// Map a unified error to the HTTP status carrying it
fn error_status(err: &Error) -> StatusCode {
    match err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::AuthMissing => StatusCode::UNAUTHORIZED,
        Error::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
        Error::Store(StoreError::ImageDecode(_)) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_reply(err: &Error) -> (StatusCode, Json<ErrorResponse>) {
    (error_status(err), Json(ErrorResponse::new(err.to_string())))
}

// ============================================================================
// Session Extraction
// ============================================================================

/// Extract the user session from request headers
///
/// The auth provider terminates upstream; by the time a request reaches
/// this service the verified identity travels in plain headers. Requests
/// without one are rejected before any store call.
impl axum::extract::FromRequestParts<AppState> for UserSession {
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        match (header("x-user-id"), header("x-user-email")) {
            (Some(user_id), Some(email)) => Ok(UserSession { user_id, email }),
            _ => Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("No authenticated user")),
            )),
        }
    }
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/api/health", get(health_check))
        .route("/api/cron/run-cron", get(run_cron))
        // Trend endpoints
        .route("/api/trends", post(query_trends))
        .route("/api/trends/reshape", post(reshape_trends))
        .route("/api/trends/feature-images", get(feature_images))
        // Listing endpoints
        .route("/api/listing", post(generate_listing))
        .route("/api/listing/improve", post(improve_listing))
        .route("/api/listing/translate", post(translate_listing))
        // Dashboard endpoints
        .route("/api/dashboard/summary", post(dashboard_summary))
        .route("/api/planner/full-report", get(planner_report))
        // Store endpoints
        .route("/api/profile", get(get_profile).put(put_profile))
        .route("/api/products", post(create_product))
        .with_state(state)
}

// ============================================================================
// Health Handlers
// ============================================================================

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();
    let llm_available = state.trends.llm().is_available().await;

    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: uptime,
        llm_available,
    }))
}

/// Cron trigger endpoint; the hosting platform polls this on a schedule
async fn run_cron() -> impl IntoResponse {
    tracing::info!("Cron task executed");
    Json(CronResponse {
        status: "success".to_string(),
        message: "Cron task executed".to_string(),
    })
}

// ============================================================================
// Trend Handlers
// ============================================================================

/// Run the trend pipeline for the requested cities
///
/// Per-city failures are inline error records; the endpoint itself only
/// fails on an invalid query.
async fn query_trends(
    State(state): State<AppState>,
    Json(query): Json<TrendQuery>,
) -> axum::response::Response {
    match state.trends.query(&query).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_reply(&e).into_response(),
    }
}

/// Derive chart-ready views from a flat trend list
async fn reshape_trends(Json(body): Json<TrendsResponse>) -> impl IntoResponse {
    Json(DashboardViews::build(&body.trends))
}

#[derive(Debug, Deserialize)]
struct FeatureImagesParams {
    feature: String,
    #[serde(default)]
    category: String,
}

/// Find product images for a trend feature
///
/// Failures answer 200 with the error inline, mirroring the per-record
/// error convention of the trend pipeline.
async fn feature_images(
    State(state): State<AppState>,
    Query(params): Query<FeatureImagesParams>,
) -> impl IntoResponse {
    let trends = &state.trends;
    let result = images::find_feature_images(
        trends.llm(),
        trends.search(),
        &params.feature,
        &params.category,
    )
    .await;

    match result {
        Ok(response) => Json(response),
        Err(e) => {
            tracing::warn!(feature = %params.feature, error = %e, "Feature image lookup failed");
            Json(FeatureImages::failed(
                &params.feature,
                &params.category,
                e.to_string(),
            ))
        }
    }
}

// ============================================================================
// Listing Handlers
// ============================================================================

/// Generate listing content for a product description
async fn generate_listing(
    State(state): State<AppState>,
    Json(request): Json<ListingRequest>,
) -> axum::response::Response {
    match listing::generate_listing(state.trends.llm(), &request).await {
        Ok(content) => (StatusCode::OK, Json(content)).into_response(),
        Err(e) => error_reply(&e).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct ImproveRequest {
    content: GeneratedContent,
}

/// Improve existing listing content without changing its structure
async fn improve_listing(
    State(state): State<AppState>,
    Json(request): Json<ImproveRequest>,
) -> axum::response::Response {
    match listing::improve_listing(state.trends.llm(), &request.content).await {
        Ok(content) => (StatusCode::OK, Json(content)).into_response(),
        Err(e) => error_reply(&e).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct TranslateRequest {
    content: GeneratedContent,
    language: String,
}

/// Translate listing content into the target language
async fn translate_listing(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> axum::response::Response {
    match listing::translate_listing(state.trends.llm(), &request.content, &request.language).await
    {
        Ok(content) => (StatusCode::OK, Json(content)).into_response(),
        Err(e) => error_reply(&e).into_response(),
    }
}

// ============================================================================
// Dashboard Handlers
// ============================================================================

/// Weekly actionable summary; always answers, falling back when needed
async fn dashboard_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> impl IntoResponse {
    let summary = dashboard::generate_summary(state.trends.llm(), &request).await;
    Json(summary)
}

#[derive(Debug, Deserialize)]
struct PlannerParams {
    #[serde(default = "default_planner_location")]
    location: String,
}

fn default_planner_location() -> String {
    "Delhi".to_string()
}

/// Full festival-aware inventory planning report for a location
async fn planner_report(
    State(state): State<AppState>,
    Query(params): Query<PlannerParams>,
) -> axum::response::Response {
    match planner::generate_report(state.trends.llm(), &params.location).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => error_reply(&e).into_response(),
    }
}

// ============================================================================
// Store Handlers
// ============================================================================

/// Fetch the profile of the authenticated user
async fn get_profile(
    State(state): State<AppState>,
    session: UserSession,
) -> axum::response::Response {
    match state.profiles.get(&session).await {
        Ok(Some(profile)) => (StatusCode::OK, Json(ApiResponse::success(profile))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Profile not found")),
        )
            .into_response(),
        Err(e) => error_reply(&Error::Store(e)).into_response(),
    }
}

/// Create or update the profile of the authenticated user
async fn put_profile(
    State(state): State<AppState>,
    session: UserSession,
    Json(profile): Json<StoreProfile>,
) -> axum::response::Response {
    if let Err(e) = profile.validate() {
        return error_reply(&e).into_response();
    }

    match state.profiles.upsert(&session, profile).await {
        Ok(saved) => (StatusCode::OK, Json(ApiResponse::success(saved))).into_response(),
        Err(e) => error_reply(&Error::Store(e)).into_response(),
    }
}

/// Create a product for the authenticated user
async fn create_product(
    State(state): State<AppState>,
    session: UserSession,
    Json(product): Json<NewProduct>,
) -> axum::response::Response {
    if let Err(e) = product.validate() {
        return error_reply(&e).into_response();
    }

    match state.products.create(&session, product).await {
        Ok(document) => (StatusCode::CREATED, Json(ApiResponse::success(document))).into_response(),
        Err(e) => error_reply(&Error::Store(e)).into_response(),
    }
}

// ============================================================================
// Tests
// ============================================================================
