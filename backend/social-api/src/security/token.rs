use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Claims embedded in every identity token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Not before (Unix timestamp)
    pub nbf: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

/// Stateless HS256 token authenticator. A single shared secret signs and
/// verifies; there is no revocation list and no server-side session.
pub struct JwtAuthenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl JwtAuthenticator {
    pub fn new(secret: &str, issuer: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.to_string(),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Issue a signed token for `user_id` with `iat = nbf = now` and
    /// `exp = now + ttl`; issuer and audience both carry the configured
    /// issuer string.
    pub fn issue(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            iss: self.issuer.clone(),
            aud: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|_| AppError::Internal("failed to sign token".to_string()))
    }

    /// Validate signature, `[nbf, exp]` window and issuer/audience
    /// equality. Every failure collapses to `Unauthorized`; callers never
    /// learn which check tripped.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.issuer]);
        validation.validate_nbf = true;
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }

    /// Parse the subject claim back into a user id.
    pub fn subject(claims: &Claims) -> Result<Uuid> {
        Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)
    }
}
