//! Profile store
//!
//! One profile document per user, keyed by the session user id. Updates
//! replace the whole document.

use chrono::Utc;

use super::{DocumentStore, StoreError};
use crate::models::{StoreProfile, UserSession};

const COLLECTION: &str = "profiles";

/// Profile document store, keyed by user id
#[derive(Clone)]
pub struct ProfileStore {
    documents: DocumentStore,
}

impl ProfileStore {
    /// Create a new profile store
    pub fn new(documents: DocumentStore) -> Self {
        Self { documents }
    }

    /// Fetch the profile for a user, `None` when never saved
    pub async fn get(&self, session: &UserSession) -> Result<Option<StoreProfile>, StoreError> {
        self.documents.get(COLLECTION, &session.user_id).await
    }

    /// Create or update the profile for a user
    pub async fn upsert(
        &self,
        session: &UserSession,
        mut profile: StoreProfile,
    ) -> Result<StoreProfile, StoreError> {
        profile.updated_at = Some(Utc::now());
        self.documents
            .put(COLLECTION, &session.user_id, &profile)
            .await?;

        tracing::info!(user = %session.user_id, "Profile saved");
        Ok(profile)
    }
}
