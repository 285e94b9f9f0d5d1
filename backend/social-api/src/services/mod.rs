pub mod auth;
pub mod authorization;

pub use auth::AuthService;
pub use authorization::AuthorizationService;
