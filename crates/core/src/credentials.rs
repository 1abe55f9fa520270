//! Credential shapes consumed by the publisher. Storage and the OAuth consent
//! flow live outside this workspace; the core only reads these values.

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AdWizardResult;

/// Per-application secrets, issued once for the whole deployment.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AppCredentials {
    #[serde(default)]
    pub developer_token: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    /// Manager account the calls are made through, if any.
    #[serde(default)]
    pub login_customer_id: Option<String>,
}

/// Per-user grant obtained through the platform's OAuth consent flow.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct UserCredentials {
    pub refresh_token: String,
    pub customer_id: String,
}

impl UserCredentials {
    pub fn new(refresh_token: impl Into<String>, customer_id: impl Into<String>) -> Self {
        Self {
            refresh_token: refresh_token.into(),
            customer_id: customer_id.into(),
        }
    }
}

/// Everything needed to open a session for one publish invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub app: AppCredentials,
    pub user: UserCredentials,
}

impl Credentials {
    pub fn new(app: AppCredentials, user: UserCredentials) -> Self {
        Self { app, user }
    }

    /// Customer id with the dashes the platform UI shows stripped out.
    pub fn customer_id(&self) -> String {
        self.user.customer_id.replace('-', "")
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

impl fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredentials")
            .field("developer_token", &redact(&self.developer_token))
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("login_customer_id", &self.login_customer_id)
            .finish()
    }
}

impl fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentials")
            .field("refresh_token", &redact(&self.refresh_token))
            .field("customer_id", &self.customer_id)
            .finish()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app", &self.app)
            .field("user", &self.user)
            .finish()
    }
}

/// Lookup of per-user credentials by user identity.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// `Ok(None)` when the user has not connected an ads account.
    async fn user_credentials(&self, user_id: &str) -> AdWizardResult<Option<UserCredentials>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::new(
            AppCredentials {
                developer_token: "dev-token-123".into(),
                client_id: "client.apps.example".into(),
                client_secret: "shh".into(),
                login_customer_id: None,
            },
            UserCredentials::new("1//refresh", "123-456-7890"),
        );
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("dev-token-123"));
        assert!(!rendered.contains("shh"));
        assert!(!rendered.contains("1//refresh"));
        assert!(rendered.contains("client.apps.example"));
        assert!(rendered.contains("123-456-7890"));
    }

    #[test]
    fn test_customer_id_normalized() {
        let creds = Credentials::new(
            AppCredentials::default(),
            UserCredentials::new("r", "123-456-7890"),
        );
        assert_eq!(creds.customer_id(), "1234567890");
    }
}
