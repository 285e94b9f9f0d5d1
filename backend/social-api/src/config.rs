/// Configuration management
///
/// Loads all settings from environment variables into one explicit value
/// constructed at startup and passed by reference into each component.
use serde::{Deserialize, Serialize};

const DEV_JWT_SECRET: &str = "dev-only-secret-change-me";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub invitation: InvitationConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

/// Token issuance configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared HMAC secret for token signing
    pub jwt_secret: String,
    /// Issuer and audience value embedded in every token
    pub jwt_issuer: String,
    /// Token lifetime in seconds
    pub jwt_ttl_secs: i64,
}

/// Invitation lifecycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationConfig {
    /// How long an activation token stays valid, in seconds
    pub ttl_secs: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("SOCIAL_API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("SOCIAL_API_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/social".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            auth: {
                let jwt_secret = match std::env::var("JWT_SECRET") {
                    Ok(value) => value,
                    Err(_) if app_env.eq_ignore_ascii_case("production") => {
                        return Err("JWT_SECRET must be set in production".to_string())
                    }
                    Err(_) => DEV_JWT_SECRET.to_string(),
                };

                if app_env.eq_ignore_ascii_case("production") && jwt_secret == DEV_JWT_SECRET {
                    return Err("JWT_SECRET cannot be the development default in production"
                        .to_string());
                }

                AuthConfig {
                    jwt_secret,
                    jwt_issuer: std::env::var("JWT_ISSUER")
                        .unwrap_or_else(|_| "social-api".to_string()),
                    jwt_ttl_secs: std::env::var("JWT_TTL_SECS")
                        .ok()
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(60 * 60 * 24 * 3),
                }
            },
            invitation: InvitationConfig {
                ttl_secs: std::env::var("INVITATION_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60 * 60 * 24 * 3),
            },
        })
    }
}
