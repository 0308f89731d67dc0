use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Reset links die after 15 minutes; sessions last a day.
pub const RESET_TTL_MINUTES: i64 = 15;
pub const SESSION_TTL_HOURS: i64 = 24;

const PURPOSE_RESET: &str = "reset";
const PURPOSE_SESSION: &str = "session";

/// Payload shared by both token kinds. The `purpose` claim is checked on
/// every decode so a session token can never pass reset verification (or
/// vice versa), even if both secrets are configured to the same value.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub purpose: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    fn new(email: &str, purpose: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: email.to_string(),
            purpose: purpose.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

/// Deliberately opaque: callers must not be able to tell a bad signature
/// from an expired or malformed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenError;

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid or expired token")
    }
}

impl std::error::Error for TokenError {}

pub fn issue_reset(email: &str, secret: &str) -> Result<String, TokenError> {
    encode_claims(
        &Claims::new(email, PURPOSE_RESET, Duration::minutes(RESET_TTL_MINUTES)),
        secret,
    )
}

pub fn verify_reset(token: &str, secret: &str) -> Result<String, TokenError> {
    verify(token, secret, PURPOSE_RESET)
}

pub fn issue_session(email: &str, secret: &str) -> Result<String, TokenError> {
    encode_claims(
        &Claims::new(email, PURPOSE_SESSION, Duration::hours(SESSION_TTL_HOURS)),
        secret,
    )
}

pub fn verify_session(token: &str, secret: &str) -> Result<String, TokenError> {
    verify(token, secret, PURPOSE_SESSION)
}

fn encode_claims(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| TokenError)
}

fn decode_claims(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| TokenError)
}

fn verify(token: &str, secret: &str, purpose: &str) -> Result<String, TokenError> {
    let claims = decode_claims(token, secret)?;
    if claims.purpose != purpose {
        return Err(TokenError);
    }
    // jsonwebtoken still accepts exp == now; the contract is strict
    // (valid while now < exp, rejected from the boundary on).
    if Utc::now().timestamp() >= claims.exp {
        return Err(TokenError);
    }
    Ok(claims.sub)
}
