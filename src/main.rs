use anyhow::Context;
use dotenvy::dotenv;
use unidesk::logging::init_tracing;
use unidesk::metrics::{init_metrics, metrics_app};
use unidesk::router::init_router;
use unidesk::state::init_app_state;
use unidesk_config::ServerConfig;
use unidesk_db::run_migrations;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let server_config = ServerConfig::from_env();
    let _log_guard = init_tracing(&server_config.log_dir)?;

    let metrics_handle = init_metrics()?;

    let state = init_app_state().await?;
    run_migrations(&state.db)
        .await
        .context("Failed to run database migrations")?;

    let bind_address = state.server_config.bind_address();
    let mut app = init_router(state);
    if let Some(handle) = metrics_handle {
        app = app.merge(metrics_app(handle));
    }

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;

    tracing::info!(address = %bind_address, "server listening");
    tracing::info!("Swagger UI at /swagger-ui, Scalar at /scalar");

    axum::serve(listener, app).await?;
    Ok(())
}
