use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use thiserror::Error;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../migrations");

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

#[derive(Debug, Error)]
pub enum DbSetupError {
    #[error("failed to create database pool: {0}")]
    Pool(#[from] r2d2::PoolError),

    #[error("failed to run database migrations: {0}")]
    Migrations(String),
}

/// Build the connection pool and bring the schema up to date.
pub fn create_pool(database_url: &str) -> Result<DbPool, DbSetupError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().build(manager)?;

    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DbSetupError::Migrations(e.to_string()))?;
    if !applied.is_empty() {
        tracing::info!(count = applied.len(), "applied database migrations");
    }

    Ok(pool)
}

/// A pool that never connects until first use. Handlers that reject a request
/// before touching the database can be exercised against it without Postgres.
#[cfg(test)]
pub fn lazy_pool(database_url: &str) -> DbPool {
    r2d2::Pool::builder()
        .max_size(1)
        .build_unchecked(ConnectionManager::<PgConnection>::new(database_url))
}

/// Single-connection pool for tests that go through the pool like handlers do.
/// The connection lives inside a test transaction, so nothing is committed.
#[cfg(test)]
pub fn test_pool() -> Option<DbPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let mut conn = PgConnection::establish(&url).expect("Failed to connect to TEST_DATABASE_URL");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations on test database");

    let pool = r2d2::Pool::builder()
        .max_size(1)
        .connection_timeout(std::time::Duration::from_secs(2))
        .connection_customizer(Box::new(r2d2::TestCustomizer))
        .build(ConnectionManager::<PgConnection>::new(url))
        .expect("Failed to build test pool");
    Some(pool)
}

/// Connection for store tests: migrated, inside a transaction that is never
/// committed. Returns `None` when `TEST_DATABASE_URL` is unset so the suite
/// still passes on machines without Postgres.
#[cfg(test)]
pub fn test_connection() -> Option<PgConnection> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let mut conn = PgConnection::establish(&url).expect("Failed to connect to TEST_DATABASE_URL");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations on test database");
    conn.begin_test_transaction()
        .expect("Failed to begin test transaction");
    Some(conn)
}
