use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use docsqa_backend::core::config::{AppPaths, ConfigService};
use docsqa_backend::core::logging;
use docsqa_backend::server;
use docsqa_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let paths = Arc::new(AppPaths::new());
    let config_service = ConfigService::new(paths.clone());
    let (config, raw_config) = config_service.load().with_context(|| {
        format!(
            "Failed to load configuration from {}",
            paths.config_path.display()
        )
    })?;

    logging::init(&config.logging, &paths);
    tracing::info!(
        "Effective configuration: {}",
        config_service.redact_sensitive_values(&raw_config)
    );

    let state =
        AppState::initialize(&config, &paths).context("Failed to initialize answer pipeline")?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;

    println!("DOCSQA_PORT={}", addr.port());
    tracing::info!("Listening on {}", addr);

    let app: Router = server::router::router(state);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
