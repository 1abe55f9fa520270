//! Platform-agnostic campaign payload produced from a brief.
//!
//! Serializes as a plain nested record (objects, arrays, strings and
//! numbers only) so any renderer can display it without depending on this
//! crate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AdWizardError, AdWizardResult};

/// Product name used as the campaign name prefix.
pub const APP_NAME: &str = "AdWizard";

/// Name given to the single ad group of a generated campaign.
pub const DEFAULT_AD_GROUP_NAME: &str = "Main Ad Group";

/// Upper bound on headlines per responsive search ad.
pub const MAX_HEADLINES: usize = 10;

/// Upper bound on descriptions per responsive search ad.
pub const MAX_DESCRIPTIONS: usize = 4;

/// Upper bound on keywords per payload.
pub const MAX_KEYWORDS: usize = 15;

/// Platform character limit for a single headline.
pub const HEADLINE_CHAR_LIMIT: usize = 30;

/// Platform character limit for a single description.
pub const DESCRIPTION_CHAR_LIMIT: usize = 90;

/// Campaign objective in the ads platform's vocabulary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlatformGoal {
    Traffic,
    Leads,
    Sales,
}

impl PlatformGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformGoal::Traffic => "TRAFFIC",
            PlatformGoal::Leads => "LEADS",
            PlatformGoal::Sales => "SALES",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdType {
    ResponsiveSearchAd,
}

/// Keyword matching strictness.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    Broad,
    Phrase,
    Exact,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Broad => "BROAD",
            MatchType::Phrase => "PHRASE",
            MatchType::Exact => "EXACT",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignSpec {
    pub name: String,
    pub goal: PlatformGoal,
    /// Daily spend in the account currency, two decimal places.
    #[serde(with = "rust_decimal::serde::float")]
    pub daily_budget: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdGroupSpec {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdSpec {
    #[serde(rename = "type")]
    pub ad_type: AdType,
    /// Landing page the ad links to.
    pub final_url: String,
    pub headlines: Vec<String>,
    pub descriptions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Keyword {
    pub match_type: MatchType,
    pub text: String,
}

impl Keyword {
    pub fn new(match_type: MatchType, text: impl Into<String>) -> Self {
        Self {
            match_type,
            text: text.into(),
        }
    }

    pub fn broad(text: impl Into<String>) -> Self {
        Self::new(MatchType::Broad, text)
    }

    pub fn phrase(text: impl Into<String>) -> Self {
        Self::new(MatchType::Phrase, text)
    }

    pub fn exact(text: impl Into<String>) -> Self {
        Self::new(MatchType::Exact, text)
    }
}

/// Campaign ready for review and submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignPayload {
    pub campaign: CampaignSpec,
    pub ad_group: AdGroupSpec,
    pub ads: Vec<AdSpec>,
    pub keywords: Vec<Keyword>,
}

impl CampaignPayload {
    /// The ad submitted to the platform. Only the first ad is published.
    pub fn primary_ad(&self) -> Option<&AdSpec> {
        self.ads.first()
    }

    /// Structural checks a payload must pass before it is submitted.
    /// Character limits are not checked here.
    pub fn check(&self) -> AdWizardResult<()> {
        let invalid = AdWizardError::InvalidPayload;

        if self.campaign.name.trim().is_empty() {
            return Err(invalid("campaign name is empty".into()));
        }
        if self.campaign.daily_budget <= Decimal::ZERO {
            return Err(invalid(format!(
                "daily budget must be positive, got {}",
                self.campaign.daily_budget
            )));
        }
        if self.ad_group.name.trim().is_empty() {
            return Err(invalid("ad group name is empty".into()));
        }

        let ad = self
            .primary_ad()
            .ok_or_else(|| invalid("payload has no ads".into()))?;
        if ad.final_url.trim().is_empty() {
            return Err(invalid("ad final_url is empty".into()));
        }
        check_copy("headline", &ad.headlines, MAX_HEADLINES).map_err(invalid)?;
        check_copy("description", &ad.descriptions, MAX_DESCRIPTIONS).map_err(invalid)?;

        if self.keywords.len() > MAX_KEYWORDS {
            return Err(invalid(format!(
                "at most {MAX_KEYWORDS} keywords allowed, got {}",
                self.keywords.len()
            )));
        }
        if let Some(idx) = self.keywords.iter().position(|k| k.text.trim().is_empty()) {
            return Err(invalid(format!("keyword #{} is empty", idx + 1)));
        }
        Ok(())
    }
}

/// Between one and `max` non-blank entries of ad copy.
pub fn check_copy(kind: &str, items: &[String], max: usize) -> Result<(), String> {
    if items.is_empty() || items.len() > max {
        return Err(format!("expected 1 to {max} {kind}s, got {}", items.len()));
    }
    if let Some(idx) = items.iter().position(|s| s.trim().is_empty()) {
        return Err(format!("{kind} #{} is empty", idx + 1));
    }
    Ok(())
}
