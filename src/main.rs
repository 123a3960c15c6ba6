use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use translation_hub::{
    create_router, AppState, Config, Hub, IngestGateway, NatsClient, OpenAiTranslator,
};

/// Live transcript and translation broadcast hub
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file (extension optional)
    #[arg(short, long, default_value = "config/translation-hub")]
    config: String,

    /// Override the HTTP bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut cfg = Config::load(&cli.config)?;
    if let Some(bind) = cli.bind {
        cfg.service.http.bind = bind;
    }
    if let Some(port) = cli.port {
        cfg.service.http.port = port;
    }

    info!("Translation Hub v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);
    if cfg.translation.api_key.is_none() {
        warn!("No translation API key configured; translations will fail until one is set");
    }

    let translator = Arc::new(OpenAiTranslator::new(&cfg.translation)?);
    let hub = Hub::new(&cfg.hub, translator, cfg.translation.timeout());

    if let Some(url) = cfg.nats.url.as_deref() {
        let nats = NatsClient::connect(url, &cfg.nats).await?;
        nats.spawn_ingest(IngestGateway::new(Arc::clone(&hub))).await?;
    } else {
        info!("NATS transcript source disabled (nats.url not set)");
    }

    let router = create_router(AppState::new(hub, cfg.hub.subscriber_buffer));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP API listening on http://{}", addr);
    info!("Display clients can connect to ws://{}/ws", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .context("HTTP server error")?;

    Ok(())
}
