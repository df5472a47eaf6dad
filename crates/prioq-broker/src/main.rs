use clap::Parser;
use prioq_broker::{api::create_rest_api, BrokerConfig, BrokerMetrics, QueueRegistry};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "prioq-broker")]
#[command(about = "In-memory multi-queue priority task broker", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Listen host
    #[arg(long)]
    host: Option<String>,

    /// Listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = if std::path::Path::new(&args.config).exists() {
        BrokerConfig::from_file(&args.config)?
    } else {
        BrokerConfig::default()
    };

    // Override with CLI args
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if !std::path::Path::new(&args.config).exists() {
        tracing::warn!("Config file not found, using defaults");
    }

    tracing::info!("Starting broker with config: {:?}", config);

    // All state lives behind these two handles; the registry is the
    // single source of truth for name-to-queue resolution.
    let registry = Arc::new(QueueRegistry::new());
    let metrics = Arc::new(BrokerMetrics::new()?);

    let app = create_rest_api(registry, metrics).layer(TraceLayer::new_for_http());
    let addr = config.bind_addr();

    tracing::info!("Broker listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutting down broker");
}
