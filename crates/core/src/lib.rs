pub mod brief;
pub mod config;
pub mod credentials;
pub mod error;
pub mod payload;

pub use brief::{Brief, BriefInput, CampaignGoal};
pub use config::AppConfig;
pub use credentials::{AppCredentials, CredentialStore, Credentials, UserCredentials};
pub use error::{AdWizardError, AdWizardResult};
pub use payload::CampaignPayload;
