//! Shared helpers for web integration tests

#![allow(dead_code)]

use axum::Router;
use sqlx::SqlitePool;

pub const TEST_USER_ID: &str = "kc-user-1";

/// Set up an in-memory database with migrations applied
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

/// A configuration for tests: in-memory database, fixed JWT secret
pub fn test_config() -> mahlzeit::Config {
    mahlzeit::Config {
        server: mahlzeit::config::ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3001,
        },
        database: mahlzeit::config::DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        jwt: mahlzeit::config::JwtConfig {
            secret: "test-secret-key-32-bytes-long!!!!".to_string(),
            issuer: "mahlzeit".to_string(),
            audience: "mahlzeit-web".to_string(),
            expiration_days: 7,
        },
        oidc: mahlzeit::config::OidcConfig::default(),
        observability: mahlzeit::config::ObservabilityConfig::default(),
    }
}

pub async fn create_test_app(pool: SqlitePool) -> Router {
    mahlzeit::create_app(pool, test_config()).await.unwrap()
}

/// Insert a user as the OIDC callback would
pub async fn insert_user(pool: &SqlitePool, id: &str, name: &str, email: &str) {
    sqlx::query(
        "INSERT INTO users (id, name, email, created_at) VALUES (?1, ?2, ?3, strftime('%s', 'now'))",
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .execute(pool)
    .await
    .unwrap();
}

/// Cookie header value for an authenticated request
pub fn session_cookie(user_id: &str) -> String {
    let token = mahlzeit::auth::generate_token(&test_config().jwt, user_id.to_string()).unwrap();
    format!("auth_token={token}")
}

/// Insert the default test user and return their session cookie
pub async fn signed_in_user(pool: &SqlitePool) -> String {
    insert_user(pool, TEST_USER_ID, "Jordi Isken", "jordi@example.com").await;
    session_cookie(TEST_USER_ID)
}

/// The user's persisted plan store, read back the way the app stores it
pub async fn stored_plan(pool: &SqlitePool, user_id: &str) -> weekplan::PlanStore {
    let raw: Option<String> = sqlx::query_scalar(
        "SELECT value FROM local_store WHERE user_id = ?1 AND key = 'food-plan'",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .unwrap();

    raw.map(|raw| serde_json::from_str(&raw).unwrap())
        .unwrap_or_default()
}
