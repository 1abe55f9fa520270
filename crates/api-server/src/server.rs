//! API server: HTTP REST surface plus the Prometheus exporter.

use crate::rest::{self, AppState};
use adwizard_core::config::AppConfig;
use adwizard_generator::{GeneratorOptions, PayloadGenerator};
use adwizard_publisher::{CampaignPublisher, InMemoryCredentialStore};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the REST router over an existing state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/generations", post(rest::generate))
        .route("/v1/generations/publish", post(rest::publish))
        .route(
            "/v1/accounts",
            post(rest::connect_account).delete(rest::disconnect_account),
        )
        // Operational endpoints
        .route("/health", get(rest::health_check))
        .route("/live", get(rest::liveness))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct ApiServer {
    config: AppConfig,
    state: AppState,
}

impl ApiServer {
    /// Wire the generator, publisher and account store from configuration.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let accounts = Arc::new(InMemoryCredentialStore::new());
        let generator = PayloadGenerator::with_templates(GeneratorOptions::from(&config.generator));
        let publisher = CampaignPublisher::from_config(&config.publisher, accounts.clone())?;

        info!(
            backend = publisher.backend(),
            provider = generator.provider_name(),
            "API state initialised"
        );

        let state = AppState {
            generator: Arc::new(generator),
            publisher: Arc::new(publisher),
            accounts,
            start_time: Instant::now(),
        };
        Ok(Self { config, state })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Start the HTTP REST server. Runs until the listener fails.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = router(self.state.clone());
        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the metrics exporter on its own port.
    pub fn start_metrics(&self) -> anyhow::Result<()> {
        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.metrics.port);
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}
