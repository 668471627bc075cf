use anyhow::Context;
use sqlx::PgPool;

use unidesk_config::{CorsConfig, JwtConfig, ServerConfig};
use unidesk_db::init_db_pool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub server_config: ServerConfig,
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let server_config = ServerConfig::from_env();
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let db = init_db_pool(&database_url, server_config.database_max_connections)
        .await
        .context("Failed to connect to database")?;

    Ok(AppState {
        db,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        server_config,
    })
}
