//! Brief → campaign payload.

use std::sync::Arc;

use adwizard_core::config::GeneratorConfig;
use adwizard_core::payload::{AdGroupSpec, AdSpec, AdType, CampaignSpec, DEFAULT_AD_GROUP_NAME};
use adwizard_core::{AdWizardResult, Brief, BriefInput, CampaignPayload};
use tracing::debug;

use crate::budget::daily_budget;
use crate::creative::{CreativeProvider, TemplateCreativeProvider};
use crate::keywords::generate_keywords;
use crate::naming::campaign_name;

/// Knobs for payload generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratorOptions {
    pub enforce_char_limits: bool,
}

impl From<&GeneratorConfig> for GeneratorOptions {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            enforce_char_limits: config.enforce_char_limits,
        }
    }
}

/// Turns a validated brief into a [`CampaignPayload`].
///
/// Holds no mutable state; one instance can serve concurrent callers.
#[derive(Clone)]
pub struct PayloadGenerator {
    provider: Arc<dyn CreativeProvider>,
    options: GeneratorOptions,
}

impl PayloadGenerator {
    pub fn new(provider: Arc<dyn CreativeProvider>, options: GeneratorOptions) -> Self {
        Self { provider, options }
    }

    /// Generator backed by the fixed templates.
    pub fn with_templates(options: GeneratorOptions) -> Self {
        Self::new(Arc::new(TemplateCreativeProvider::new()), options)
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Build the payload. All-or-nothing: a provider failure or a creative
    /// set that breaks the provider contract is returned as an error and no
    /// payload is produced.
    pub fn generate(&self, brief: &Brief) -> AdWizardResult<CampaignPayload> {
        let product = brief.product_description();

        let creative = self.provider.generate(product, brief.target_audience())?;
        creative.check(self.options.enforce_char_limits)?;

        let payload = CampaignPayload {
            campaign: CampaignSpec {
                name: campaign_name(brief.website_url(), product),
                goal: brief.campaign_goal().platform_goal(),
                daily_budget: daily_budget(brief.budget()),
            },
            ad_group: AdGroupSpec {
                name: DEFAULT_AD_GROUP_NAME.to_string(),
            },
            ads: vec![AdSpec {
                ad_type: AdType::ResponsiveSearchAd,
                final_url: brief.website_url().to_string(),
                headlines: creative.headlines,
                descriptions: creative.descriptions,
            }],
            keywords: generate_keywords(product),
        };

        debug!(
            provider = self.provider.name(),
            campaign = %payload.campaign.name,
            goal = payload.campaign.goal.as_str(),
            daily_budget = %payload.campaign.daily_budget,
            keywords = payload.keywords.len(),
            "Generated campaign payload"
        );

        Ok(payload)
    }

    /// Validate raw form input, then generate.
    pub fn generate_from_input(&self, input: &BriefInput) -> AdWizardResult<CampaignPayload> {
        let brief = input.validate()?;
        self.generate(&brief)
    }
}

impl Default for PayloadGenerator {
    fn default() -> Self {
        Self::with_templates(GeneratorOptions::default())
    }
}
