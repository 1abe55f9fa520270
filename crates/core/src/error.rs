use thiserror::Error;

pub type AdWizardResult<T> = Result<T, AdWizardError>;

#[derive(Error, Debug)]
pub enum AdWizardError {
    #[error("Invalid brief field '{field}': {message}")]
    InvalidBrief { field: &'static str, message: String },

    #[error("Creative generation error: {0}")]
    Generation(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Remote step '{step}' failed: {message}")]
    RemoteStepFailed { step: String, message: String },

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("No credentials stored for user '{0}'")]
    CredentialsNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AdWizardError {
    pub fn invalid_brief(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidBrief {
            field,
            message: message.into(),
        }
    }

    pub fn is_invalid_brief(&self) -> bool {
        matches!(self, Self::InvalidBrief { .. })
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented(_))
    }
}

impl From<config::ConfigError> for AdWizardError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
