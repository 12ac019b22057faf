use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub oidc: OidcConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_jwt_issuer")]
    pub issuer: String,
    #[serde(default = "default_jwt_audience")]
    pub audience: String,
    pub expiration_days: u64,
}

fn default_jwt_issuer() -> String {
    "mahlzeit".to_string()
}

fn default_jwt_audience() -> String {
    "mahlzeit-web".to_string()
}

/// Connection settings for the external OpenID Connect provider. The
/// defaults match the local Keycloak realm used during development.
#[derive(Debug, Deserialize, Clone)]
pub struct OidcConfig {
    #[serde(default = "default_oidc_issuer")]
    pub issuer: String,
    #[serde(default = "default_oidc_client_id")]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_oidc_redirect_uri")]
    pub redirect_uri: String,
}

impl Default for OidcConfig {
    fn default() -> Self {
        Self {
            issuer: default_oidc_issuer(),
            client_id: default_oidc_client_id(),
            client_secret: String::new(),
            redirect_uri: default_oidc_redirect_uri(),
        }
    }
}

fn default_oidc_issuer() -> String {
    "http://localhost:8083/realms/myrealm".to_string()
}

fn default_oidc_client_id() -> String {
    "food-suggestions".to_string()
}

fn default_oidc_redirect_uri() -> String {
    "http://localhost:3000/auth/callback".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (MAHLZEIT__DATABASE__URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // Set defaults
        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite:mahlzeit.db")?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.expiration_days", 7)?;

        // Load config file if path provided or CONFIG_PATH env var set
        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Try to load config file (optional - ignore if not found)
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        // Override with environment variables (MAHLZEIT__DATABASE__URL, etc.)
        builder = builder.add_source(
            Environment::with_prefix("MAHLZEIT")
                .separator("__")
                .try_parsing(true),
        );

        // Also support the unprefixed variables the deployment already uses
        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }
        if let Ok(jwt_secret) = env::var("JWT_SECRET") {
            builder = builder.set_override("jwt.secret", jwt_secret)?;
        }
        if let Ok(issuer) = env::var("KEYCLOAK_ISSUER") {
            builder = builder.set_override("oidc.issuer", issuer)?;
        }
        if let Ok(client_id) = env::var("KEYCLOAK_ID") {
            builder = builder.set_override("oidc.client_id", client_id)?;
        }
        if let Ok(client_secret) = env::var("KEYCLOAK_SECRET") {
            builder = builder.set_override("oidc.client_secret", client_secret)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt.secret.len() < 32 {
            return Err("JWT secret must be at least 32 characters long".to_string());
        }
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if self.oidc.client_id.is_empty() {
            return Err("OIDC client_id must not be empty".to_string());
        }
        if self.oidc.issuer.ends_with('/') {
            return Err("OIDC issuer must not end with a slash".to_string());
        }
        Ok(())
    }
}
