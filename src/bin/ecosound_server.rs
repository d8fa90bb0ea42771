use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ecosound::collaborators::{DisabledFeedbackTransport, FeedbackTransport, HttpFeedbackTransport};
use ecosound::config::AppConfig;
use ecosound::context::AppContext;
use ecosound::http::{self, AppState};

#[derive(Parser, Debug)]
#[command(
    name = "ecosound_server",
    about = "HTTP surface for the EcoSound noise monitoring pipeline"
)]
struct Args {
    /// Path to the JSON config file
    #[arg(long, default_value = "ecosound.json")]
    config: PathBuf,

    /// Override the configured bind address
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// Override the configured feedback submission endpoint
    #[arg(long)]
    feedback_endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config = AppConfig::load_from_file(&args.config);
    if let Some(endpoint) = args.feedback_endpoint {
        config.feedback.endpoint = Some(endpoint);
    }

    let addr = match args.addr {
        Some(addr) => addr,
        None => config
            .server
            .bind_addr
            .parse()
            .with_context(|| format!("parsing bind address '{}'", config.server.bind_addr))?,
    };

    let transport: Arc<dyn FeedbackTransport> = match &config.feedback.endpoint {
        Some(endpoint) => {
            tracing::info!("feedback transport: POST {}", endpoint);
            Arc::new(HttpFeedbackTransport::new(endpoint.clone()))
        }
        None => {
            tracing::info!("feedback transport disabled (no endpoint configured)");
            Arc::new(DisabledFeedbackTransport)
        }
    };

    let context = Arc::new(AppContext::new(config).with_feedback_transport(transport));
    if !context.model_available() {
        tracing::warn!("no inference service configured; classifications will be synthetic");
    }

    tracing::info!("listening on {}", addr);
    tokio::select! {
        result = http::run_http_server(AppState::new(context), addr) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}
