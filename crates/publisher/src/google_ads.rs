//! Google Ads REST client.
//!
//! Exchanges the user's refresh token for an access token, then creates
//! resources through the `:mutate` endpoints of the customer account.

use adwizard_core::config::PublisherConfig;
use adwizard_core::payload::{AdGroupSpec, AdSpec, CampaignSpec, Keyword, PlatformGoal};
use adwizard_core::{AdWizardError, AdWizardResult, Credentials};
use async_trait::async_trait;
use reqwest::StatusCode;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::client::{AdsPlatformClient, PlatformError, PlatformSession};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MutateResponse {
    #[serde(default)]
    results: Vec<MutateResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MutateResult {
    resource_name: String,
}

/// Daily budget in micros of the account currency.
fn to_micros(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::from(1_000_000))?
        .trunc()
        .to_i64()
}

/// Bidding strategy that pursues the campaign goal.
fn bidding_strategy(goal: PlatformGoal) -> (&'static str, Value) {
    match goal {
        PlatformGoal::Traffic => ("targetSpend", json!({})),
        PlatformGoal::Leads => ("maximizeConversions", json!({})),
        PlatformGoal::Sales => ("maximizeConversionValue", json!({})),
    }
}

pub struct GoogleAdsClient {
    http: reqwest::Client,
    token_url: String,
    api_base_url: String,
    api_version: String,
}

impl GoogleAdsClient {
    pub fn new(config: &PublisherConfig) -> AdWizardResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("adwizard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AdWizardError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            token_url: config.token_url.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
        })
    }

    fn mutate_url(&self, session: &PlatformSession, resource: &str) -> String {
        format!(
            "{}/{}/customers/{}/{}:mutate",
            self.api_base_url, self.api_version, session.customer_id, resource
        )
    }

    async fn mutate(
        &self,
        session: &PlatformSession,
        resource: &str,
        operations: Vec<Value>,
    ) -> Result<Vec<String>, PlatformError> {
        let url = self.mutate_url(session, resource);
        let expected = operations.len();

        let mut request = self
            .http
            .post(&url)
            .bearer_auth(&session.access_token)
            .header("developer-token", &session.developer_token)
            .json(&json!({ "operations": operations }));
        if let Some(login) = &session.login_customer_id {
            request = request.header("login-customer-id", login);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(resource, status = status.as_u16(), "Google Ads mutate failed");
            return Err(match status {
                StatusCode::UNAUTHORIZED => PlatformError::Unauthorized(body),
                _ => PlatformError::Http {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        let parsed: MutateResponse = response.json().await?;
        if parsed.results.len() != expected {
            return Err(PlatformError::UnexpectedResponse(format!(
                "{resource}: expected {expected} results, got {}",
                parsed.results.len()
            )));
        }

        let names: Vec<String> = parsed.results.into_iter().map(|r| r.resource_name).collect();
        debug!(resource, created = names.len(), "Google Ads mutate succeeded");
        Ok(names)
    }

    async fn mutate_one(
        &self,
        session: &PlatformSession,
        resource: &str,
        create: Value,
    ) -> Result<String, PlatformError> {
        let mut names = self
            .mutate(session, resource, vec![json!({ "create": create })])
            .await?;
        names
            .pop()
            .ok_or_else(|| PlatformError::UnexpectedResponse(format!("{resource}: empty result")))
    }
}

#[async_trait]
impl AdsPlatformClient for GoogleAdsClient {
    fn backend(&self) -> &'static str {
        "google_ads"
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<PlatformSession, PlatformError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", credentials.app.client_id.as_str()),
                ("client_secret", credentials.app.client_secret.as_str()),
                ("refresh_token", credentials.user.refresh_token.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(if status.is_client_error() {
                PlatformError::Unauthorized(body)
            } else {
                PlatformError::Http {
                    status: status.as_u16(),
                    body,
                }
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(PlatformSession {
            access_token: token.access_token,
            developer_token: credentials.app.developer_token.clone(),
            customer_id: credentials.customer_id(),
            login_customer_id: credentials
                .app
                .login_customer_id
                .as_ref()
                .map(|id| id.replace('-', "")),
        })
    }

    async fn create_budget(
        &self,
        session: &PlatformSession,
        campaign: &CampaignSpec,
    ) -> Result<String, PlatformError> {
        let micros = to_micros(campaign.daily_budget).ok_or_else(|| {
            PlatformError::UnexpectedResponse(format!(
                "daily budget {} out of range",
                campaign.daily_budget
            ))
        })?;

        self.mutate_one(
            session,
            "campaignBudgets",
            json!({
                "name": format!("{} Budget", campaign.name),
                "amountMicros": micros.to_string(),
                "deliveryMethod": "STANDARD",
                "explicitlyShared": false,
            }),
        )
        .await
    }

    async fn create_campaign(
        &self,
        session: &PlatformSession,
        campaign: &CampaignSpec,
        budget: &str,
    ) -> Result<String, PlatformError> {
        let (strategy, settings) = bidding_strategy(campaign.goal);
        let mut create = json!({
            "name": campaign.name,
            "status": "PAUSED",
            "advertisingChannelType": "SEARCH",
            "campaignBudget": budget,
            "networkSettings": {
                "targetGoogleSearch": true,
                "targetSearchNetwork": true,
                "targetContentNetwork": false,
            },
        });
        create[strategy] = settings;

        self.mutate_one(session, "campaigns", create).await
    }

    async fn create_ad_group(
        &self,
        session: &PlatformSession,
        ad_group: &AdGroupSpec,
        campaign: &str,
    ) -> Result<String, PlatformError> {
        self.mutate_one(
            session,
            "adGroups",
            json!({
                "name": ad_group.name,
                "campaign": campaign,
                "status": "ENABLED",
                "type": "SEARCH_STANDARD",
            }),
        )
        .await
    }

    async fn create_ad(
        &self,
        session: &PlatformSession,
        ad: &AdSpec,
        ad_group: &str,
    ) -> Result<String, PlatformError> {
        let assets = |texts: &[String]| -> Vec<Value> {
            texts.iter().map(|text| json!({ "text": text })).collect()
        };

        self.mutate_one(
            session,
            "adGroupAds",
            json!({
                "adGroup": ad_group,
                "status": "PAUSED",
                "ad": {
                    "finalUrls": [ad.final_url],
                    "responsiveSearchAd": {
                        "headlines": assets(&ad.headlines),
                        "descriptions": assets(&ad.descriptions),
                    },
                },
            }),
        )
        .await
    }

    async fn create_keywords(
        &self,
        session: &PlatformSession,
        keywords: &[Keyword],
        ad_group: &str,
    ) -> Result<Vec<String>, PlatformError> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let operations = keywords
            .iter()
            .map(|keyword| {
                json!({
                    "create": {
                        "adGroup": ad_group,
                        "status": "ENABLED",
                        "keyword": {
                            "text": keyword.text,
                            "matchType": keyword.match_type.as_str(),
                        },
                    }
                })
            })
            .collect();

        self.mutate(session, "adGroupCriteria", operations).await
    }
}
