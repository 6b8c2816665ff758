use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// How long an issued token stays valid.
const TOKEN_TTL_DAYS: i64 = 30;

/// Represents the claims encoded within a session JWT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject of the token, the authenticated user's ID.
    pub sub: Uuid,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: usize,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
}

/// Issues and verifies HS256-signed session tokens.
///
/// The signing secret is handed in once at construction and survives only
/// inside the derived keys; nothing else in the application ever sees it.
/// Handlers and middleware receive the service via app data.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> TokenService {
        TokenService {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Signs a token for a user.
    ///
    /// # Arguments
    /// * `user_id` - The ID of the user the token authenticates.
    ///
    /// # Returns
    /// The encoded JWT, valid for thirty days.
    pub fn issue(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(Duration::days(TOKEN_TTL_DAYS))
            .ok_or_else(|| AppError::InternalServerError("Token expiry overflow".into()))?;

        let claims = Claims {
            sub: user_id,
            exp: expires.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AppError::from)
    }

    /// Verifies a JWT string and decodes its claims.
    ///
    /// Default validation checks are applied (signature and expiration), so
    /// garbage input fails the same way a forged token does.
    ///
    /// # Arguments
    /// * `token` - The JWT string to verify.
    ///
    /// # Returns
    /// The token's [`Claims`] when the signature and expiry check out.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
    }
}
