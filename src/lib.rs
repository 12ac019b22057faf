pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod observability;
pub mod oidc;
pub mod routes;
pub mod storage;

pub use config::Config;
pub use routes::AppState;

/// Create the app router for testing.
///
/// Builds the Axum router with all routes configured, useful for
/// integration testing without starting the full server.
pub async fn create_app(pool: sqlx::SqlitePool, config: Config) -> anyhow::Result<axum::Router> {
    Ok(routes::router(AppState::new(config, pool)))
}
