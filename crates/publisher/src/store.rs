//! In-process credential store for development and tests.

use adwizard_core::{AdWizardResult, CredentialStore, UserCredentials};
use async_trait::async_trait;
use dashmap::DashMap;
use tracing::info;

#[derive(Default)]
pub struct InMemoryCredentialStore {
    entries: DashMap<String, UserCredentials>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the grant a user completed. Replaces any previous grant.
    pub fn connect(&self, user_id: impl Into<String>, credentials: UserCredentials) {
        let user_id = user_id.into();
        info!(user_id = %user_id, customer_id = %credentials.customer_id, "Ads account connected");
        self.entries.insert(user_id, credentials);
    }

    pub fn disconnect(&self, user_id: &str) -> bool {
        self.entries.remove(user_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn user_credentials(&self, user_id: &str) -> AdWizardResult<Option<UserCredentials>> {
        Ok(self.entries.get(user_id).map(|entry| entry.value().clone()))
    }
}
