//! Pushes a generated campaign payload to the ads platform.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use adwizard_core::config::{PublisherBackend, PublisherConfig};
use adwizard_core::{
    AdWizardError, AdWizardResult, AppCredentials, CampaignPayload, CredentialStore, Credentials,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::{AdsPlatformClient, NotImplementedClient, PlatformError};
use crate::google_ads::GoogleAdsClient;
use crate::state::{FailureReason, PublishStateMachine, PublishStep};

/// Remote resources created during a publish, in creation order. On failure
/// these are left in place for the caller to reconcile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedResources {
    pub budget: Option<String>,
    pub campaign: Option<String>,
    pub ad_group: Option<String>,
    pub ad: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Outcome of one publish invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PublishResult {
    Success {
        external_campaign_id: String,
        resources: CreatedResources,
    },
    Failure {
        /// Creation step that failed; `None` when nothing was attempted.
        step: Option<PublishStep>,
        reason: FailureReason,
        message: String,
        resources: CreatedResources,
    },
}

impl PublishResult {
    fn failure(
        step: Option<PublishStep>,
        reason: FailureReason,
        message: impl Into<String>,
        resources: CreatedResources,
    ) -> Self {
        PublishResult::Failure {
            step,
            reason,
            message: message.into(),
            resources,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PublishResult::Success { .. })
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            PublishResult::Success { .. } => None,
            PublishResult::Failure { reason, .. } => Some(*reason),
        }
    }

    pub fn failed_step(&self) -> Option<PublishStep> {
        match self {
            PublishResult::Success { .. } => None,
            PublishResult::Failure { step, .. } => *step,
        }
    }

    pub fn resources(&self) -> &CreatedResources {
        match self {
            PublishResult::Success { resources, .. } | PublishResult::Failure { resources, .. } => {
                resources
            }
        }
    }

    /// External campaign id on success, otherwise the matching error.
    pub fn into_result(self) -> AdWizardResult<String> {
        match self {
            PublishResult::Success {
                external_campaign_id,
                ..
            } => Ok(external_campaign_id),
            PublishResult::Failure {
                step,
                reason,
                message,
                ..
            } => Err(match reason {
                FailureReason::AuthenticationFailed => AdWizardError::AuthenticationFailed(message),
                FailureReason::RemoteStepFailed => AdWizardError::RemoteStepFailed {
                    step: step.map(|s| s.as_str()).unwrap_or("unknown").to_string(),
                    message,
                },
                FailureReason::NotImplemented => AdWizardError::NotImplemented(message),
                FailureReason::CredentialsNotFound => AdWizardError::CredentialsNotFound(message),
                FailureReason::InvalidPayload => AdWizardError::InvalidPayload(message),
                FailureReason::Internal => AdWizardError::Internal(anyhow::anyhow!(message)),
            }),
        }
    }
}

/// Trailing id segment of a resource name (`customers/1/campaigns/42` → `42`).
fn resource_id(resource_name: &str) -> String {
    resource_name
        .rsplit('/')
        .next()
        .unwrap_or(resource_name)
        .to_string()
}

struct StepFailure {
    step: Option<PublishStep>,
    reason: FailureReason,
    message: String,
}

impl StepFailure {
    fn platform(step: Option<PublishStep>, err: PlatformError) -> Self {
        let reason = match (&err, step) {
            (PlatformError::NotImplemented(_), _) => FailureReason::NotImplemented,
            (_, None) => FailureReason::AuthenticationFailed,
            (_, Some(_)) => FailureReason::RemoteStepFailed,
        };
        Self {
            step,
            reason,
            message: err.to_string(),
        }
    }

    /// Metric and log label: the failed step, or the reason when no step ran.
    fn label(&self) -> &'static str {
        match self.step {
            Some(step) => step.as_str(),
            None => self.reason.as_str(),
        }
    }

    fn internal(step: Option<PublishStep>, err: anyhow::Error) -> Self {
        Self {
            step,
            reason: FailureReason::Internal,
            message: err.to_string(),
        }
    }
}

/// Select the platform client variant named by configuration.
pub fn build_client(config: &PublisherConfig) -> AdWizardResult<Arc<dyn AdsPlatformClient>> {
    let client: Arc<dyn AdsPlatformClient> = match config.backend {
        PublisherBackend::Stub => Arc::new(NotImplementedClient::new()),
        PublisherBackend::GoogleAds => Arc::new(GoogleAdsClient::new(config)?),
    };
    info!(backend = client.backend(), "Ads platform client initialized");
    Ok(client)
}

/// Runs the five dependent creation calls for a payload.
///
/// Calls within one publish are strictly sequential; separate publishes share
/// nothing and may run concurrently.
pub struct CampaignPublisher {
    client: Arc<dyn AdsPlatformClient>,
    credential_store: Arc<dyn CredentialStore>,
    app_credentials: AppCredentials,
    step_timeout: Duration,
}

impl CampaignPublisher {
    pub fn new(
        client: Arc<dyn AdsPlatformClient>,
        credential_store: Arc<dyn CredentialStore>,
        app_credentials: AppCredentials,
        step_timeout: Duration,
    ) -> Self {
        Self {
            client,
            credential_store,
            app_credentials,
            step_timeout,
        }
    }

    pub fn from_config(
        config: &PublisherConfig,
        credential_store: Arc<dyn CredentialStore>,
    ) -> AdWizardResult<Self> {
        Ok(Self::new(
            build_client(config)?,
            credential_store,
            config.app_credentials.clone(),
            Duration::from_millis(config.step_timeout_ms),
        ))
    }

    pub fn backend(&self) -> &'static str {
        self.client.backend()
    }

    /// Publish on behalf of `user_id`, reading their grant from the
    /// credential store.
    pub async fn publish_for_user(&self, payload: &CampaignPayload, user_id: &str) -> PublishResult {
        match self.credential_store.user_credentials(user_id).await {
            Ok(Some(user)) => {
                let credentials = Credentials::new(self.app_credentials.clone(), user);
                self.publish(payload, &credentials).await
            }
            Ok(None) => {
                warn!(user_id, "No ads account connected");
                PublishResult::failure(
                    None,
                    FailureReason::CredentialsNotFound,
                    AdWizardError::CredentialsNotFound(user_id.to_string()).to_string(),
                    CreatedResources::default(),
                )
            }
            Err(e) => {
                warn!(user_id, error = %e, "Credential lookup failed");
                PublishResult::failure(
                    None,
                    FailureReason::Internal,
                    e.to_string(),
                    CreatedResources::default(),
                )
            }
        }
    }

    /// Authenticate once, then create budget, campaign, ad group, ad and
    /// keywords in order. Stops at the first failure without rolling back.
    pub async fn publish(&self, payload: &CampaignPayload, credentials: &Credentials) -> PublishResult {
        let publish_id = Uuid::new_v4();
        let backend = self.client.backend();
        metrics::counter!("publisher.attempts", "backend" => backend).increment(1);

        info!(
            publish_id = %publish_id,
            backend,
            campaign = %payload.campaign.name,
            customer_id = %credentials.user.customer_id,
            "Publishing campaign"
        );

        let mut machine = PublishStateMachine::new();
        let mut resources = CreatedResources::default();

        match self
            .execute(payload, credentials, &mut machine, &mut resources)
            .await
        {
            Ok(campaign) => {
                metrics::counter!("publisher.successes", "backend" => backend).increment(1);
                info!(
                    publish_id = %publish_id,
                    campaign = %campaign,
                    keywords = resources.keywords.len(),
                    "Campaign published"
                );
                PublishResult::Success {
                    external_campaign_id: resource_id(&campaign),
                    resources,
                }
            }
            Err(failure) => {
                if let Err(e) = machine.fail(failure.step, failure.reason) {
                    warn!(publish_id = %publish_id, error = %e, "Publish state not updated");
                }
                let step_label = failure.label();
                metrics::counter!(
                    "publisher.failures",
                    "backend" => backend,
                    "step" => step_label
                )
                .increment(1);
                warn!(
                    publish_id = %publish_id,
                    step = step_label,
                    reason = ?failure.reason,
                    error = %failure.message,
                    state = ?machine.state(),
                    "Campaign publish failed"
                );
                PublishResult::failure(failure.step, failure.reason, failure.message, resources)
            }
        }
    }

    async fn execute(
        &self,
        payload: &CampaignPayload,
        credentials: &Credentials,
        machine: &mut PublishStateMachine,
        resources: &mut CreatedResources,
    ) -> Result<String, StepFailure> {
        payload.check().map_err(|e| StepFailure {
            step: None,
            reason: FailureReason::InvalidPayload,
            message: e.to_string(),
        })?;
        let ad = payload.primary_ad().ok_or_else(|| StepFailure {
            step: None,
            reason: FailureReason::InvalidPayload,
            message: AdWizardError::InvalidPayload("payload has no ads".into()).to_string(),
        })?;

        let session = self
            .timed(self.client.authenticate(credentials))
            .await
            .map_err(|e| StepFailure::platform(None, e))?;

        let budget = self
            .step(
                machine,
                PublishStep::BudgetCreation,
                self.client.create_budget(&session, &payload.campaign),
            )
            .await?;
        resources.budget = Some(budget.clone());

        let campaign = self
            .step(
                machine,
                PublishStep::CampaignCreation,
                self.client.create_campaign(&session, &payload.campaign, &budget),
            )
            .await?;
        resources.campaign = Some(campaign.clone());

        let ad_group = self
            .step(
                machine,
                PublishStep::AdGroupCreation,
                self.client.create_ad_group(&session, &payload.ad_group, &campaign),
            )
            .await?;
        resources.ad_group = Some(ad_group.clone());

        let ad = self
            .step(
                machine,
                PublishStep::AdCreation,
                self.client.create_ad(&session, ad, &ad_group),
            )
            .await?;
        resources.ad = Some(ad);

        resources.keywords = self
            .step(
                machine,
                PublishStep::KeywordCreation,
                self.client.create_keywords(&session, &payload.keywords, &ad_group),
            )
            .await?;

        Ok(campaign)
    }

    async fn timed<T>(
        &self,
        call: impl Future<Output = Result<T, PlatformError>>,
    ) -> Result<T, PlatformError> {
        tokio::time::timeout(self.step_timeout, call)
            .await
            .unwrap_or(Err(PlatformError::Timeout(self.step_timeout)))
    }

    async fn step<T>(
        &self,
        machine: &mut PublishStateMachine,
        step: PublishStep,
        call: impl Future<Output = Result<T, PlatformError>>,
    ) -> Result<T, StepFailure> {
        if machine.next_step() != Some(step) {
            return Err(StepFailure::internal(
                Some(step),
                anyhow::anyhow!("{:?} attempted out of order from {:?}", step, machine.state()),
            ));
        }

        let value = self
            .timed(call)
            .await
            .map_err(|e| StepFailure::platform(Some(step), e))?;
        let state = machine
            .complete(step)
            .map_err(|e| StepFailure::internal(Some(step), e))?;
        debug!(step = step.as_str(), ?state, "Publish step completed");
        Ok(value)
    }
}
