use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a decimal string.
    pub sub: String,
    /// Expiry, Unix seconds.
    pub exp: i64,
    /// Issued at, Unix seconds.
    pub iat: i64,
}

/// Issue an HS256 access token for the user.
///
/// # Errors
///
/// Returns an error when encoding fails.
pub fn generate_token(user_id: i32, config: &Config) -> anyhow::Result<String> {
    let issued_at = Utc::now().timestamp();

    #[allow(clippy::cast_possible_wrap)]
    let claims = Claims {
        sub: user_id.to_string(),
        exp: issued_at + config.jwt_expiration_secs as i64,
        iat: issued_at,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| anyhow::anyhow!("Token encoding failed: {e}"))
}

/// Decode and verify an access token, returning its claims.
///
/// # Errors
///
/// Returns an error when the signature is wrong or the token has expired.
pub fn validate_token(token: &str, secret: &str) -> anyhow::Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| anyhow::anyhow!("Invalid access token: {e}"))
}
