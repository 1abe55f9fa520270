//! Route-level tests driven through the router without binding a socket.

use std::sync::Arc;
use std::time::{Duration, Instant};

use adwizard_api::{router, AppState};
use adwizard_core::config::AppConfig;
use adwizard_core::payload::{AdGroupSpec, AdSpec, CampaignSpec, Keyword};
use adwizard_core::{AppCredentials, Credentials, UserCredentials};
use adwizard_generator::PayloadGenerator;
use adwizard_publisher::{
    AdsPlatformClient, CampaignPublisher, InMemoryCredentialStore, NotImplementedClient,
    PlatformError, PlatformSession,
};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Accepts every call and hands back fixed resource names.
struct AcceptingClient;

#[async_trait]
impl AdsPlatformClient for AcceptingClient {
    fn backend(&self) -> &'static str {
        "accepting"
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<PlatformSession, PlatformError> {
        Ok(PlatformSession {
            access_token: "token".into(),
            developer_token: String::new(),
            customer_id: credentials.customer_id(),
            login_customer_id: None,
        })
    }

    async fn create_budget(&self, _: &PlatformSession, _: &CampaignSpec) -> Result<String, PlatformError> {
        Ok("customers/1/campaignBudgets/5".into())
    }

    async fn create_campaign(
        &self,
        _: &PlatformSession,
        _: &CampaignSpec,
        _: &str,
    ) -> Result<String, PlatformError> {
        Ok("customers/1/campaigns/77".into())
    }

    async fn create_ad_group(
        &self,
        _: &PlatformSession,
        _: &AdGroupSpec,
        _: &str,
    ) -> Result<String, PlatformError> {
        Ok("customers/1/adGroups/8".into())
    }

    async fn create_ad(&self, _: &PlatformSession, _: &AdSpec, _: &str) -> Result<String, PlatformError> {
        Ok("customers/1/adGroupAds/8~9".into())
    }

    async fn create_keywords(
        &self,
        _: &PlatformSession,
        keywords: &[Keyword],
        _: &str,
    ) -> Result<Vec<String>, PlatformError> {
        Ok(keywords
            .iter()
            .enumerate()
            .map(|(i, _)| format!("customers/1/adGroupCriteria/8~{i}"))
            .collect())
    }
}

fn app_with(client: Arc<dyn AdsPlatformClient>) -> (Router, Arc<InMemoryCredentialStore>) {
    let accounts = Arc::new(InMemoryCredentialStore::new());
    let publisher = CampaignPublisher::new(
        client,
        accounts.clone(),
        AppCredentials::default(),
        Duration::from_secs(1),
    );
    let state = AppState {
        generator: Arc::new(PayloadGenerator::default()),
        publisher: Arc::new(publisher),
        accounts: accounts.clone(),
        start_time: Instant::now(),
    };
    (router(state), accounts)
}

fn stub_app() -> Router {
    app_with(Arc::new(NotImplementedClient::new())).0
}

fn brief() -> Value {
    json!({
        "website_url": "https://www.brew.coffee",
        "product_description": "organic coffee beans",
        "target_audience": "health-conscious millennials",
        "budget": 600,
        "campaign_goal": "sales"
    })
}

async fn send(app: Router, method: &str, uri: &str, user: Option<&str>, body: Value) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user) = user {
        request = request.header("x-user-id", user);
    }
    let response = app
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn generated_payload(app: Router) -> Value {
    let (status, body) = send(app, "POST", "/v1/generations", None, brief()).await;
    assert_eq!(status, StatusCode::OK);
    body["payload"].clone()
}

#[tokio::test]
async fn test_generation_returns_brief_and_payload() {
    let (status, body) = send(stub_app(), "POST", "/v1/generations", None, brief()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["brief"]["campaign_goal"], "sales");
    let payload = &body["payload"];
    assert_eq!(payload["campaign"]["name"], "AdWizard – Brew");
    assert_eq!(payload["campaign"]["goal"], "SALES");
    assert_eq!(payload["campaign"]["daily_budget"], json!(20.0));
    assert_eq!(payload["ad_group"]["name"], "Main Ad Group");
    assert_eq!(payload["ads"][0]["type"], "RESPONSIVE_SEARCH_AD");
    assert!(payload["keywords"].as_array().unwrap().len() <= 15);
}

#[tokio::test]
async fn test_invalid_brief_is_422() {
    let mut bad = brief();
    bad["campaign_goal"] = json!("awareness");

    let (status, body) = send(stub_app(), "POST", "/v1/generations", None, bad).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_brief");
}

#[tokio::test]
async fn test_publish_with_stub_backend_is_501() {
    let (app, accounts) = app_with(Arc::new(NotImplementedClient::new()));
    accounts.connect("owner", UserCredentials::new("refresh", "123-456-7890"));
    let payload = generated_payload(app.clone()).await;

    let (status, body) = send(
        app,
        "POST",
        "/v1/generations/publish",
        Some("owner"),
        json!({ "payload": payload }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body["outcome"], "failure");
    assert_eq!(body["reason"], "not_implemented");
}

#[tokio::test]
async fn test_publish_rejects_broken_payload() {
    let (app, accounts) = app_with(Arc::new(AcceptingClient));
    accounts.connect("owner", UserCredentials::new("refresh", "123-456-7890"));
    let mut payload = generated_payload(app.clone()).await;
    payload["campaign"]["daily_budget"] = json!(-5.0);

    let (status, body) = send(
        app,
        "POST",
        "/v1/generations/publish",
        Some("owner"),
        json!({ "payload": payload }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["reason"], "invalid_payload");
    assert_eq!(body["resources"]["campaign"], Value::Null);
}

#[tokio::test]
async fn test_publish_requires_user_header() {
    let app = stub_app();
    let payload = generated_payload(app.clone()).await;

    let (status, body) = send(
        app,
        "POST",
        "/v1/generations/publish",
        None,
        json!({ "payload": payload }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing_user_id");
}

#[tokio::test]
async fn test_publish_without_connected_account_is_401() {
    let app = stub_app();
    let payload = generated_payload(app.clone()).await;

    let (status, body) = send(
        app,
        "POST",
        "/v1/generations/publish",
        Some("nobody"),
        json!({ "payload": payload }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["reason"], "credentials_not_found");
}

#[tokio::test]
async fn test_connect_then_publish_succeeds() {
    let (app, _) = app_with(Arc::new(AcceptingClient));
    let payload = generated_payload(app.clone()).await;

    let (status, _) = send(
        app.clone(),
        "POST",
        "/v1/accounts",
        Some("owner"),
        json!({ "refresh_token": "refresh", "customer_id": "111-222-3333" }),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        app.clone(),
        "POST",
        "/v1/generations/publish",
        Some("owner"),
        json!({ "payload": payload }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["outcome"], "success");
    assert_eq!(body["external_campaign_id"], "77");

    let (status, _) = send(app.clone(), "DELETE", "/v1/accounts", Some("owner"), Value::Null).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(app, "DELETE", "/v1/accounts", Some("owner"), Value::Null).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_backend() {
    let (status, body) = send(stub_app(), "GET", "/health", None, Value::Null).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["publisher_backend"], "stub");
}

#[test]
fn test_server_builds_from_default_config() {
    let server = adwizard_api::ApiServer::new(AppConfig::default()).unwrap();
    assert_eq!(server.state().publisher.backend(), "stub");
}
