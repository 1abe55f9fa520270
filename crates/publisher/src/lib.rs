//! Campaign submission to the external ads platform.

pub mod client;
pub mod google_ads;
pub mod publisher;
pub mod state;
pub mod store;

pub use client::{AdsPlatformClient, NotImplementedClient, PlatformError, PlatformSession};
pub use google_ads::GoogleAdsClient;
pub use publisher::{build_client, CampaignPublisher, CreatedResources, PublishResult};
pub use state::{FailureReason, PublishState, PublishStateMachine, PublishStep};
pub use store::InMemoryCredentialStore;
