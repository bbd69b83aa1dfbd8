//! PostgreSQL pool initialization.
//!
//! The connection string comes from `DATABASE_URL`; embedded migrations run
//! on startup. Called once per process — the pool is cheaply cloneable and
//! travels through application state.

use sqlx::PgPool;
use std::env;

/// Connects to PostgreSQL and applies pending migrations.
///
/// # Panics
///
/// Panics when `DATABASE_URL` is unset, the connection fails, or a migration
/// cannot be applied. Startup is the one place where failing loudly is the
/// right behavior.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    pool
}
