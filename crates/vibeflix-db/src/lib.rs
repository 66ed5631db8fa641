//! # Vibeflix DB
//!
//! PostgreSQL connection pool initialisation.
//!
//! # Example
//!
//! ```ignore
//! use vibeflix_db::init_db_pool;
//!
//! let pool = init_db_pool().await;
//! sqlx::migrate!("./migrations").run(&pool).await?;
//! ```

use std::env;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

/// Connects to the database named by `DATABASE_URL`.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is unset or the first connection fails; the
/// service cannot start without its credential store.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    tracing::info!(max_connections, "Connecting to database");

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

pub use sqlx::PgPool;
