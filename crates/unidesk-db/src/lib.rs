//! # Unidesk DB
//!
//! PostgreSQL pool initialisation, embedded migrations and the mapping from
//! `sqlx` errors to [`AppError`].
//!
//! # Example
//!
//! ```ignore
//! use unidesk_db::{init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&database_url, 10).await?;
//! run_migrations(&pool).await?;
//! ```

use std::fmt::Display;

use sqlx::postgres::PgPoolOptions;
use unidesk_core::AppError;

pub use sqlx::PgPool;

/// Connects a PostgreSQL pool.
pub async fn init_db_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Builds a pool that only connects on first use.
pub fn lazy_db_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new().connect_lazy(database_url)
}

/// Applies the schema in `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Maps a database error onto the API error taxonomy.
///
/// Unique violations become 400 with `conflict` as the message and check
/// violations a generic 400. Foreign key violations become 404 since the
/// referenced record does not exist. Anything else is an opaque 500.
pub fn map_db_error(err: sqlx::Error, conflict: impl Display) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::bad_request(anyhow::anyhow!("{}", conflict));
        }
        if db_err.is_foreign_key_violation() {
            return AppError::not_found(anyhow::anyhow!("Referenced record not found"));
        }
        if db_err.is_check_violation() {
            return AppError::bad_request(anyhow::anyhow!("Invalid field value"));
        }
    }
    tracing::error!(error = %err, "database error");
    AppError::database(err)
}

/// Turns an affected-row count of zero into a 404.
pub fn ensure_affected(rows: u64, entity: &str) -> Result<(), AppError> {
    if rows == 0 {
        return Err(AppError::not_found(anyhow::anyhow!("{} not found", entity)));
    }
    Ok(())
}
