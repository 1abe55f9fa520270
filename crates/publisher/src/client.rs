//! Ads platform client capability and its stub variant.

use std::fmt;
use std::time::Duration;

use adwizard_core::payload::{AdGroupSpec, AdSpec, CampaignSpec, Keyword};
use adwizard_core::Credentials;
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Failure reported by an ads platform call.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("platform returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<reqwest::Error> for PlatformError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PlatformError::UnexpectedResponse(err.to_string())
        } else {
            PlatformError::Transport(err.to_string())
        }
    }
}

/// Authenticated context for the calls of one publish invocation.
#[derive(Clone)]
pub struct PlatformSession {
    pub access_token: String,
    pub developer_token: String,
    pub customer_id: String,
    pub login_customer_id: Option<String>,
}

impl fmt::Debug for PlatformSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformSession")
            .field("access_token", &"<redacted>")
            .field("developer_token", &"<redacted>")
            .field("customer_id", &self.customer_id)
            .field("login_customer_id", &self.login_customer_id)
            .finish()
    }
}

/// Calls against an external ads platform. Each creation call returns the
/// platform's resource name for what it created.
#[async_trait]
pub trait AdsPlatformClient: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn authenticate(&self, credentials: &Credentials) -> Result<PlatformSession, PlatformError>;

    async fn create_budget(
        &self,
        session: &PlatformSession,
        campaign: &CampaignSpec,
    ) -> Result<String, PlatformError>;

    async fn create_campaign(
        &self,
        session: &PlatformSession,
        campaign: &CampaignSpec,
        budget: &str,
    ) -> Result<String, PlatformError>;

    async fn create_ad_group(
        &self,
        session: &PlatformSession,
        ad_group: &AdGroupSpec,
        campaign: &str,
    ) -> Result<String, PlatformError>;

    async fn create_ad(
        &self,
        session: &PlatformSession,
        ad: &AdSpec,
        ad_group: &str,
    ) -> Result<String, PlatformError>;

    async fn create_keywords(
        &self,
        session: &PlatformSession,
        keywords: &[Keyword],
        ad_group: &str,
    ) -> Result<Vec<String>, PlatformError>;
}

// ─── Stub ───────────────────────────────────────────────────────────────────

/// Client for deployments without a platform integration. Every call fails
/// with [`PlatformError::NotImplemented`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NotImplementedClient;

impl NotImplementedClient {
    pub fn new() -> Self {
        Self
    }

    fn unavailable<T>(call: &str) -> Result<T, PlatformError> {
        debug!(backend = "stub", call, "Ads platform integration not available");
        Err(PlatformError::NotImplemented(format!(
            "ads platform integration is not available ({call})"
        )))
    }
}

#[async_trait]
impl AdsPlatformClient for NotImplementedClient {
    fn backend(&self) -> &'static str {
        "stub"
    }

    async fn authenticate(&self, _credentials: &Credentials) -> Result<PlatformSession, PlatformError> {
        Self::unavailable("authenticate")
    }

    async fn create_budget(
        &self,
        _session: &PlatformSession,
        _campaign: &CampaignSpec,
    ) -> Result<String, PlatformError> {
        Self::unavailable("create_budget")
    }

    async fn create_campaign(
        &self,
        _session: &PlatformSession,
        _campaign: &CampaignSpec,
        _budget: &str,
    ) -> Result<String, PlatformError> {
        Self::unavailable("create_campaign")
    }

    async fn create_ad_group(
        &self,
        _session: &PlatformSession,
        _ad_group: &AdGroupSpec,
        _campaign: &str,
    ) -> Result<String, PlatformError> {
        Self::unavailable("create_ad_group")
    }

    async fn create_ad(
        &self,
        _session: &PlatformSession,
        _ad: &AdSpec,
        _ad_group: &str,
    ) -> Result<String, PlatformError> {
        Self::unavailable("create_ad")
    }

    async fn create_keywords(
        &self,
        _session: &PlatformSession,
        _keywords: &[Keyword],
        _ad_group: &str,
    ) -> Result<Vec<String>, PlatformError> {
        Self::unavailable("create_keywords")
    }
}
