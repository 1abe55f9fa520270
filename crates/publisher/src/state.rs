use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// One of the five dependent creation calls, in execution order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PublishStep {
    BudgetCreation,
    CampaignCreation,
    AdGroupCreation,
    AdCreation,
    KeywordCreation,
}

impl PublishStep {
    pub const ALL: [PublishStep; 5] = [
        PublishStep::BudgetCreation,
        PublishStep::CampaignCreation,
        PublishStep::AdGroupCreation,
        PublishStep::AdCreation,
        PublishStep::KeywordCreation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PublishStep::BudgetCreation => "budget_creation",
            PublishStep::CampaignCreation => "campaign_creation",
            PublishStep::AdGroupCreation => "ad_group_creation",
            PublishStep::AdCreation => "ad_creation",
            PublishStep::KeywordCreation => "keyword_creation",
        }
    }

    /// State the publish must be in before this step may run.
    pub fn precondition(&self) -> PublishState {
        match self {
            PublishStep::BudgetCreation => PublishState::NotStarted,
            PublishStep::CampaignCreation => PublishState::BudgetCreated,
            PublishStep::AdGroupCreation => PublishState::CampaignCreated,
            PublishStep::AdCreation => PublishState::AdGroupCreated,
            PublishStep::KeywordCreation => PublishState::AdCreated,
        }
    }

    /// State reached once this step succeeds.
    pub fn outcome(&self) -> PublishState {
        match self {
            PublishStep::BudgetCreation => PublishState::BudgetCreated,
            PublishStep::CampaignCreation => PublishState::CampaignCreated,
            PublishStep::AdGroupCreation => PublishState::AdGroupCreated,
            PublishStep::AdCreation => PublishState::AdCreated,
            PublishStep::KeywordCreation => PublishState::KeywordsCreated,
        }
    }
}

/// Why a publish ended without a campaign.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    AuthenticationFailed,
    RemoteStepFailed,
    NotImplemented,
    CredentialsNotFound,
    InvalidPayload,
    Internal,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::AuthenticationFailed => "authentication_failed",
            FailureReason::RemoteStepFailed => "remote_step_failed",
            FailureReason::NotImplemented => "not_implemented",
            FailureReason::CredentialsNotFound => "credentials_not_found",
            FailureReason::InvalidPayload => "invalid_payload",
            FailureReason::Internal => "internal",
        }
    }
}

/// Progress of a single publish invocation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PublishState {
    NotStarted,
    BudgetCreated,
    CampaignCreated,
    AdGroupCreated,
    AdCreated,
    KeywordsCreated,
    /// `step` is `None` when the failure happened before any creation call.
    Failed {
        step: Option<PublishStep>,
        reason: FailureReason,
    },
}

impl PublishState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PublishState::KeywordsCreated | PublishState::Failed { .. })
    }
}

/// Enforces the strictly forward sequence
/// `NotStarted → BudgetCreated → CampaignCreated → AdGroupCreated → AdCreated
/// → KeywordsCreated`, with `Failed` reachable from any non-terminal state.
#[derive(Debug, Clone)]
pub struct PublishStateMachine {
    state: PublishState,
}

impl PublishStateMachine {
    pub fn new() -> Self {
        Self {
            state: PublishState::NotStarted,
        }
    }

    pub fn state(&self) -> PublishState {
        self.state
    }

    /// The step allowed to run next, if any.
    pub fn next_step(&self) -> Option<PublishStep> {
        PublishStep::ALL
            .into_iter()
            .find(|step| step.precondition() == self.state)
    }

    /// Record that `step` succeeded. Errors when `step` is not the next step.
    pub fn complete(&mut self, step: PublishStep) -> Result<PublishState> {
        if self.state != step.precondition() {
            return Err(anyhow!(
                "Invalid publish transition: cannot complete {:?} from {:?}",
                step,
                self.state
            ));
        }
        self.state = step.outcome();
        Ok(self.state)
    }

    /// Move to `Failed`. Errors when the publish already ended.
    pub fn fail(&mut self, step: Option<PublishStep>, reason: FailureReason) -> Result<PublishState> {
        if self.state.is_terminal() {
            return Err(anyhow!(
                "Invalid publish transition: {:?} is terminal",
                self.state
            ));
        }
        if let Some(step) = step {
            if self.next_step() != Some(step) {
                return Err(anyhow!(
                    "Invalid publish transition: {:?} cannot fail from {:?}",
                    step,
                    self.state
                ));
            }
        }
        self.state = PublishState::Failed { step, reason };
        Ok(self.state)
    }
}

impl Default for PublishStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
