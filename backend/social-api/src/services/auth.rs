use chrono::Duration;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::db::UserStore;
use crate::error::{AppError, Result};
use crate::models::{NewUser, RegisterUserPayload, UserWithToken};
use crate::security::password;
use crate::security::token::JwtAuthenticator;

const DEFAULT_ROLE: &str = "user";

/// Registration, login and account activation.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    authenticator: Arc<JwtAuthenticator>,
    invitation_ttl: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        authenticator: Arc<JwtAuthenticator>,
        invitation_ttl: Duration,
    ) -> Self {
        Self {
            users,
            authenticator,
            invitation_ttl,
        }
    }

    /// Create an inactive user and its invitation in one transaction.
    /// The plaintext activation token is returned to the caller exactly
    /// once; only its hash is persisted.
    pub async fn register(&self, payload: RegisterUserPayload) -> Result<UserWithToken> {
        let password_hash = password::hash_password(&payload.password)?;

        let token = generate_invitation_token();
        let token_hash = hash_invitation_token(&token);

        let user = self
            .users
            .create_and_invite(
                NewUser {
                    username: payload.username,
                    email: payload.email,
                    password_hash,
                    role_name: DEFAULT_ROLE.to_string(),
                },
                &token_hash,
                self.invitation_ttl,
            )
            .await?;

        tracing::info!(user_id = %user.id, "user registered");

        Ok(UserWithToken { user, token })
    }

    /// Exchange email + password for a signed identity token. An unknown
    /// or inactive account and a wrong password read identically.
    pub async fn login(&self, email: &str, password_input: &str) -> Result<String> {
        let user = self.users.get_by_email(email).await.map_err(|err| match err {
            AppError::NotFound => AppError::Unauthorized,
            other => other,
        })?;

        password::verify_password(password_input, &user.password_hash)?;

        let token = self.authenticator.issue(user.id)?;
        tracing::info!(user_id = %user.id, "token issued");
        Ok(token)
    }

    /// Consume a plaintext activation token.
    pub async fn activate(&self, token: &str) -> Result<()> {
        self.users.activate(&hash_invitation_token(token)).await
    }
}

/// 32 random bytes, hex encoded. Generated once at invite time and never
/// stored.
pub(crate) fn generate_invitation_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub(crate) fn hash_invitation_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
