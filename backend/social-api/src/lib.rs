/// Social API Library
///
/// Identity, access and content backend: token-based authentication,
/// role-based authorization, the transactional user-invitation lifecycle,
/// optimistic-concurrency post mutation and the followed-authors feed.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `middleware`: Bearer-token authentication middleware
/// - `models`: Data structures for users, roles, posts, comments
/// - `services`: Business logic layer
/// - `db`: Storage traits and Postgres repositories
/// - `security`: Password hashing and token issuance/validation
/// - `error`: Error taxonomy and HTTP mapping
/// - `config`: Configuration management
/// - `telemetry`: Tracing setup
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;
pub mod telemetry;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{AppError, Result};

use crate::db::Storage;
use crate::security::token::JwtAuthenticator;
use crate::services::{AuthService, AuthorizationService};
use std::sync::Arc;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: sqlx::PgPool,
    pub storage: Storage,
    pub authenticator: Arc<JwtAuthenticator>,
    pub auth: AuthService,
    pub authz: AuthorizationService,
}
