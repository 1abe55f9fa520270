//! REST handlers for payload generation, publishing and account connection.

use adwizard_core::{AdWizardError, Brief, BriefInput, CampaignPayload, UserCredentials};
use adwizard_generator::PayloadGenerator;
use adwizard_publisher::{CampaignPublisher, FailureReason, InMemoryCredentialStore, PublishResult};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Header carrying the caller's user id. Authentication of that id happens
/// upstream of this service.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Maximum accepted user id length.
const MAX_USER_ID_LEN: usize = 256;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<PayloadGenerator>,
    pub publisher: Arc<CampaignPublisher>,
    pub accounts: Arc<InMemoryCredentialStore>,
    pub start_time: Instant,
}

#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub brief: Brief,
    pub payload: CampaignPayload,
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub payload: CampaignPayload,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub publisher_backend: String,
    pub uptime_secs: u64,
}

/// Error body plus the status it is sent with.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, error: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: error.to_string(),
                message: message.into(),
            },
        }
    }

    fn missing_user() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "missing_user_id",
            format!("header '{USER_ID_HEADER}' is required"),
        )
    }
}

impl From<AdWizardError> for ApiError {
    fn from(err: AdWizardError) -> Self {
        let (status, code) = match &err {
            AdWizardError::InvalidBrief { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_brief"),
            AdWizardError::Generation(_) => (StatusCode::BAD_GATEWAY, "generation_failed"),
            AdWizardError::InvalidPayload(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_payload"),
            AdWizardError::AuthenticationFailed(_) => (StatusCode::UNAUTHORIZED, "authentication_failed"),
            AdWizardError::CredentialsNotFound(_) => (StatusCode::UNAUTHORIZED, "credentials_not_found"),
            AdWizardError::RemoteStepFailed { .. } => (StatusCode::BAD_GATEWAY, "remote_step_failed"),
            AdWizardError::NotImplemented(_) => (StatusCode::NOT_IMPLEMENTED, "not_implemented"),
            AdWizardError::Config(_)
            | AdWizardError::Serialization(_)
            | AdWizardError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };
        Self::new(status, code, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn user_id(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or_default();
    if value.is_empty() || value.len() > MAX_USER_ID_LEN {
        return Err(ApiError::missing_user());
    }
    Ok(value.to_string())
}

fn publish_status(result: &PublishResult) -> StatusCode {
    match result.failure_reason() {
        None => StatusCode::CREATED,
        Some(FailureReason::NotImplemented) => StatusCode::NOT_IMPLEMENTED,
        Some(FailureReason::AuthenticationFailed | FailureReason::CredentialsNotFound) => {
            StatusCode::UNAUTHORIZED
        }
        Some(FailureReason::RemoteStepFailed) => StatusCode::BAD_GATEWAY,
        Some(FailureReason::InvalidPayload) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(FailureReason::Internal) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// POST /v1/generations: validate a brief and build its campaign payload.
pub async fn generate(
    State(state): State<AppState>,
    Json(input): Json<BriefInput>,
) -> Result<Json<GenerationResponse>, ApiError> {
    let brief = input.validate().map_err(|e| {
        warn!(error = %e, "Brief validation failed");
        metrics::counter!("api.validation_errors").increment(1);
        ApiError::from(e)
    })?;

    match state.generator.generate(&brief) {
        Ok(payload) => {
            metrics::counter!("api.generations").increment(1);
            Ok(Json(GenerationResponse { brief, payload }))
        }
        Err(e) => {
            error!(error = %e, provider = state.generator.provider_name(), "Generation failed");
            metrics::counter!("api.errors", "route" => "generations").increment(1);
            Err(e.into())
        }
    }
}

/// POST /v1/generations/publish: submit a payload on behalf of the caller.
///
/// The body is the [`PublishResult`] in every case where publishing was
/// attempted, so partial progress is visible on failure.
pub async fn publish(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<PublishRequest>,
) -> Result<(StatusCode, Json<PublishResult>), ApiError> {
    let user_id = user_id(&headers)?;
    let result = state.publisher.publish_for_user(&request.payload, &user_id).await;
    let status = publish_status(&result);
    info!(user_id = %user_id, status = status.as_u16(), "Publish request handled");
    Ok((status, Json(result)))
}

/// POST /v1/accounts: record the caller's ads account grant.
pub async fn connect_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(credentials): Json<UserCredentials>,
) -> Result<StatusCode, ApiError> {
    let user_id = user_id(&headers)?;
    if credentials.refresh_token.trim().is_empty() || credentials.customer_id.trim().is_empty() {
        return Err(ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_credentials",
            "refresh_token and customer_id are required",
        ));
    }
    state.accounts.connect(user_id, credentials);
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /v1/accounts: forget the caller's grant.
pub async fn disconnect_account(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let user_id = user_id(&headers)?;
    if state.accounts.disconnect(&user_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::new(
            StatusCode::NOT_FOUND,
            "credentials_not_found",
            format!("no ads account connected for user {user_id}"),
        ))
    }
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        publisher_backend: state.publisher.backend().to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /live: Liveness probe.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (AdWizardError::invalid_brief("budget", "must be positive"), 422),
            (AdWizardError::Generation("empty".into()), 502),
            (AdWizardError::NotImplemented("stub".into()), 501),
            (AdWizardError::CredentialsNotFound("u1".into()), 401),
            (AdWizardError::AuthenticationFailed("bad grant".into()), 401),
            (
                AdWizardError::RemoteStepFailed {
                    step: "campaign_creation".into(),
                    message: "400".into(),
                },
                502,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status.as_u16(), status);
        }
    }

    #[test]
    fn test_user_id_header() {
        let mut headers = HeaderMap::new();
        assert!(user_id(&headers).is_err());

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("  "));
        assert!(user_id(&headers).is_err());

        headers.insert(USER_ID_HEADER, HeaderValue::from_static(" owner-1 "));
        assert_eq!(user_id(&headers).unwrap(), "owner-1");
    }
}
