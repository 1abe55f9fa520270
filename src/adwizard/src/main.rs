//! AdWizard: turns an advertiser brief into a search campaign payload and
//! publishes it to the ads platform.

use std::path::{Path, PathBuf};

use adwizard_api::ApiServer;
use adwizard_core::config::AppConfig;
use adwizard_core::BriefInput;
use adwizard_generator::{GeneratorOptions, PayloadGenerator};
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "adwizard")]
#[command(about = "Generate and publish search campaigns from a short brief")]
#[command(version)]
struct Cli {
    /// Enforce headline/description character limits (overrides config)
    #[arg(long, global = true, env = "ADWIZARD__GENERATOR__ENFORCE_CHAR_LIMITS")]
    enforce_char_limits: Option<bool>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// HTTP port (overrides config)
        #[arg(long, env = "ADWIZARD__API__HTTP_PORT")]
        http_port: Option<u16>,

        /// Metrics port (overrides config)
        #[arg(long, env = "ADWIZARD__METRICS__PORT")]
        metrics_port: Option<u16>,
    },
    /// Generate a payload from a brief file and print it as JSON
    Generate {
        /// Path to a JSON brief
        #[arg(long)]
        brief: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adwizard=info,tower_http=info".into()),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    if let Some(enforce) = cli.enforce_char_limits {
        config.generator.enforce_char_limits = enforce;
    }

    match cli.command {
        Command::Serve {
            http_port,
            metrics_port,
        } => {
            if let Some(port) = http_port {
                config.api.http_port = port;
            }
            if let Some(port) = metrics_port {
                config.metrics.port = port;
            }
            serve(config).await
        }
        Command::Generate { brief } => generate(&config, &brief),
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    info!(
        http_port = config.api.http_port,
        backend = ?config.publisher.backend,
        enforce_char_limits = config.generator.enforce_char_limits,
        "Configuration loaded"
    );

    let metrics_enabled = config.metrics.enabled;
    let api_server = ApiServer::new(config)?;

    if metrics_enabled {
        if let Err(e) = api_server.start_metrics() {
            error!(error = %e, "Failed to start metrics exporter");
        }
    }

    info!("AdWizard is ready to serve traffic");
    api_server.start_http().await
}

fn generate(config: &AppConfig, path: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading brief {}", path.display()))?;
    let input: BriefInput = serde_json::from_str(&raw)
        .with_context(|| format!("parsing brief {}", path.display()))?;

    let generator = PayloadGenerator::with_templates(GeneratorOptions::from(&config.generator));
    let payload = generator.generate_from_input(&input)?;

    info!(
        campaign = %payload.campaign.name,
        keywords = payload.keywords.len(),
        "Payload generated"
    );
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
