//! Questionnaire answers ("brief") as collected from the form layer, and the
//! validated, typed form the generator consumes.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AdWizardError, AdWizardResult};
use crate::payload::PlatformGoal;

/// What the advertiser wants the campaign to achieve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CampaignGoal {
    Traffic,
    Leads,
    Sales,
}

impl CampaignGoal {
    pub const ALL: [CampaignGoal; 3] = [Self::Traffic, Self::Leads, Self::Sales];

    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignGoal::Traffic => "traffic",
            CampaignGoal::Leads => "leads",
            CampaignGoal::Sales => "sales",
        }
    }

    /// Goal as understood by the ads platform. Total over every variant.
    pub fn platform_goal(&self) -> PlatformGoal {
        match self {
            CampaignGoal::Traffic => PlatformGoal::Traffic,
            CampaignGoal::Leads => PlatformGoal::Leads,
            CampaignGoal::Sales => PlatformGoal::Sales,
        }
    }
}

impl fmt::Display for CampaignGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignGoal {
    type Err = AdWizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "traffic" => Ok(CampaignGoal::Traffic),
            "leads" => Ok(CampaignGoal::Leads),
            "sales" => Ok(CampaignGoal::Sales),
            other => Err(AdWizardError::invalid_brief(
                "campaign_goal",
                format!("unrecognized goal '{other}', expected one of traffic, leads, sales"),
            )),
        }
    }
}

/// Monthly budget as the form layer submits it: either a JSON number or the
/// raw text of an input field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    fn to_decimal(&self) -> Option<Decimal> {
        match self {
            // Display gives the shortest round-trip text, so 0.1 stays 0.1.
            RawAmount::Number(n) if n.is_finite() => n.to_string().parse().ok(),
            RawAmount::Number(_) => None,
            RawAmount::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<f64> for RawAmount {
    fn from(value: f64) -> Self {
        RawAmount::Number(value)
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        RawAmount::Text(value.to_string())
    }
}

/// Unvalidated form submission. Every field is optional so that a missing
/// answer is reported as an invalid brief rather than a decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BriefInput {
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub product_description: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub budget: Option<RawAmount>,
    #[serde(default)]
    pub campaign_goal: Option<String>,
}

impl BriefInput {
    /// Check every field and produce a typed [`Brief`]. The first failing
    /// field is reported.
    pub fn validate(&self) -> AdWizardResult<Brief> {
        let website_url = required(&self.website_url, "website_url")?;
        let parsed = Url::parse(&website_url).map_err(|e| {
            AdWizardError::invalid_brief("website_url", format!("not a valid URL: {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AdWizardError::invalid_brief(
                "website_url",
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }

        let product_description = required(&self.product_description, "product_description")?;
        let target_audience = required(&self.target_audience, "target_audience")?;

        let budget = self
            .budget
            .as_ref()
            .ok_or_else(|| AdWizardError::invalid_brief("budget", "is required"))?
            .to_decimal()
            .ok_or_else(|| AdWizardError::invalid_brief("budget", "is not a number"))?;
        if budget <= Decimal::ZERO {
            return Err(AdWizardError::invalid_brief("budget", "must be positive"));
        }

        let campaign_goal = required(&self.campaign_goal, "campaign_goal")?.parse()?;

        Ok(Brief {
            website_url,
            product_description,
            target_audience,
            budget,
            campaign_goal,
        })
    }
}

fn required(value: &Option<String>, field: &'static str) -> AdWizardResult<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AdWizardError::invalid_brief(field, "is required")),
    }
}

/// A validated brief. Only obtainable through [`BriefInput::validate`] (or
/// deserialization, which runs the same checks), so holders can rely on every
/// field being present and well-typed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "BriefInput")]
pub struct Brief {
    website_url: String,
    product_description: String,
    target_audience: String,
    #[serde(with = "rust_decimal::serde::float")]
    budget: Decimal,
    campaign_goal: CampaignGoal,
}

impl Brief {
    pub fn new(
        website_url: impl Into<String>,
        product_description: impl Into<String>,
        target_audience: impl Into<String>,
        budget: Decimal,
        campaign_goal: CampaignGoal,
    ) -> AdWizardResult<Self> {
        BriefInput {
            website_url: Some(website_url.into()),
            product_description: Some(product_description.into()),
            target_audience: Some(target_audience.into()),
            budget: Some(RawAmount::Text(budget.to_string())),
            campaign_goal: Some(campaign_goal.as_str().to_string()),
        }
        .validate()
    }

    pub fn website_url(&self) -> &str {
        &self.website_url
    }

    pub fn product_description(&self) -> &str {
        &self.product_description
    }

    pub fn target_audience(&self) -> &str {
        &self.target_audience
    }

    /// Monthly budget.
    pub fn budget(&self) -> Decimal {
        self.budget
    }

    pub fn campaign_goal(&self) -> CampaignGoal {
        self.campaign_goal
    }
}

impl TryFrom<BriefInput> for Brief {
    type Error = AdWizardError;

    fn try_from(input: BriefInput) -> Result<Self, Self::Error> {
        input.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn input() -> BriefInput {
        BriefInput {
            website_url: Some("https://brew.coffee".into()),
            product_description: Some("organic coffee beans".into()),
            target_audience: Some("health-conscious millennials".into()),
            budget: Some(600.0.into()),
            campaign_goal: Some("sales".into()),
        }
    }

    #[test]
    fn test_valid_input() {
        let brief = input().validate().unwrap();
        assert_eq!(brief.website_url(), "https://brew.coffee");
        assert_eq!(brief.budget(), Decimal::from(600));
        assert_eq!(brief.campaign_goal(), CampaignGoal::Sales);
    }

    #[test]
    fn test_goal_parsing_is_strict() {
        assert_eq!("traffic".parse::<CampaignGoal>().unwrap(), CampaignGoal::Traffic);
        assert_eq!(" Leads ".parse::<CampaignGoal>().unwrap(), CampaignGoal::Leads);
        assert_eq!("SALES".parse::<CampaignGoal>().unwrap(), CampaignGoal::Sales);

        for bad in ["awareness", "", "lead", "sale s"] {
            let err = bad.parse::<CampaignGoal>().unwrap_err();
            assert!(err.is_invalid_brief(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_goal_mapping_is_total() {
        for goal in CampaignGoal::ALL {
            let mapped = goal.platform_goal();
            assert_eq!(mapped.as_str(), goal.as_str().to_ascii_uppercase());
        }
    }

    #[test]
    fn test_unknown_goal_rejected() {
        let mut raw = input();
        raw.campaign_goal = Some("brand_awareness".into());
        match raw.validate() {
            Err(AdWizardError::InvalidBrief { field, .. }) => assert_eq!(field, "campaign_goal"),
            other => panic!("expected invalid brief, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_and_blank_fields() {
        let mut raw = input();
        raw.product_description = Some("   ".into());
        match raw.validate() {
            Err(AdWizardError::InvalidBrief { field, .. }) => {
                assert_eq!(field, "product_description")
            }
            other => panic!("expected invalid brief, got {other:?}"),
        }

        let mut raw = input();
        raw.target_audience = None;
        assert!(raw.validate().unwrap_err().is_invalid_brief());
    }

    #[test]
    fn test_bad_url() {
        let mut raw = input();
        raw.website_url = Some("not a url".into());
        assert!(raw.validate().unwrap_err().is_invalid_brief());

        raw.website_url = Some("ftp://files.example.com".into());
        assert!(raw.validate().unwrap_err().is_invalid_brief());
    }

    #[test]
    fn test_budget_forms() {
        let mut raw = input();
        raw.budget = Some("1500.50".into());
        assert_eq!(
            raw.validate().unwrap().budget(),
            Decimal::from_f64(1500.5).unwrap()
        );

        raw.budget = Some(0.0.into());
        assert!(raw.validate().unwrap_err().is_invalid_brief());

        raw.budget = Some((-10.0).into());
        assert!(raw.validate().unwrap_err().is_invalid_brief());

        raw.budget = Some("lots".into());
        assert!(raw.validate().unwrap_err().is_invalid_brief());
    }

    #[test]
    fn test_deserialize_brief_runs_validation() {
        let json = r#"{
            "website_url": "https://brew.coffee",
            "product_description": "organic coffee beans",
            "target_audience": "health-conscious millennials",
            "budget": "600",
            "campaign_goal": "sales"
        }"#;
        let brief: Brief = serde_json::from_str(json).unwrap();
        assert_eq!(brief.campaign_goal(), CampaignGoal::Sales);

        let bad = json.replace("\"sales\"", "\"fame\"");
        assert!(serde_json::from_str::<Brief>(&bad).is_err());
    }
}
