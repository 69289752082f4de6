use bankpredict::{config, model, server, service::PredictionService, telemetry};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Init
    telemetry::init_tracing();
    let metrics_handle = telemetry::init_metrics()?;
    model::loader::init_ort()?;

    // 2. Load Config
    let config = config::AppConfig::load_from_env()?;

    // 3. Load Model (a missing model is not fatal)
    tracing::info!(path = %config.model.path, version = %config.model.version, "loading model");
    let loaded = model::loader::load_from_config(&config.model);
    let service = PredictionService::new(loaded, config.model.threshold);

    // 4. Create Router
    let app = server::routes::create_router(
        service,
        config.model.version.clone(),
        Some(metrics_handle),
    );

    // 5. Bind & Serve
    let listener =
        TcpListener::bind(format!("{}:{}", config.server.host, config.server.port)).await?;
    tracing::info!(
        "Server listening on http://{}:{}",
        config.server.host,
        config.server.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
