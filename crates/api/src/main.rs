use std::sync::Arc;

use anyhow::Context;

use partstrack_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;
    partstrack_observability::init(config.log_format);

    let services = partstrack_api::app::build_services(&config)?;
    let app = partstrack_api::app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, site = %config.site_name, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
