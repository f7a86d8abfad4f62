pub mod password;
pub mod permissions;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;
use uuid::Uuid;

use crate::config;
use crate::database::models::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    /// None only for SUPER_ADMIN tokens
    pub institute_id: Option<Uuid>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String, role: Role, institute_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            user_id,
            email,
            role,
            institute_id,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Token has expired")]
    Expired,
    #[error("Token signature mismatch")]
    BadSignature,
    #[error("Token generation error: {0}")]
    Generation(String),
    #[error("JWT secret not configured")]
    InvalidSecret,
}

pub fn generate_token(claims: &Claims) -> Result<String, TokenError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(TokenError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| TokenError::Generation(e.to_string()))
}

// Successful decodes are cached for a short window keyed by the raw token,
// so rapid successive requests with the same token skip signature
// verification. Entries expire on their own; logout never invalidates them
// (revocation is out of scope and the residual window is accepted).
struct CachedClaims {
    claims: Claims,
    expires_at: Instant,
}

static TOKEN_CACHE: Lazy<Mutex<HashMap<String, CachedClaims>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Verify a token, using the short-lived decode cache. Signature mismatch
/// and expiry are reported as distinct error kinds.
pub fn verify_token(token: &str) -> Result<Claims, TokenError> {
    if let Some(claims) = cache_get(token) {
        return Ok(claims);
    }

    let claims = decode_token(token)?;
    cache_put(token, claims.clone());
    Ok(claims)
}

fn decode_token(token: &str) -> Result<Claims, TokenError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(TokenError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::BadSignature,
            _ => TokenError::Invalid(e.to_string()),
        })
}

fn cache_get(token: &str) -> Option<Claims> {
    let mut cache = TOKEN_CACHE.lock().ok()?;
    match cache.get(token) {
        Some(entry) if entry.expires_at > Instant::now() => Some(entry.claims.clone()),
        Some(_) => {
            cache.remove(token);
            None
        }
        None => None,
    }
}

fn cache_put(token: &str, claims: Claims) {
    let ttl = std::time::Duration::from_secs(config::config().security.token_cache_ttl_secs);
    if let Ok(mut cache) = TOKEN_CACHE.lock() {
        let now = Instant::now();
        cache.retain(|_, entry| entry.expires_at > now);
        cache.insert(
            token.to_string(),
            CachedClaims {
                claims,
                expires_at: now + ttl,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims() -> Claims {
        Claims::new(
            Uuid::new_v4(),
            "admin@example.com".to_string(),
            Role::InstituteAdmin,
            Some(Uuid::new_v4()),
        )
    }

    #[test]
    fn token_round_trip() {
        let claims = sample_claims();
        let token = generate_token(&claims).unwrap();
        let decoded = verify_token(&token).unwrap();
        assert_eq!(decoded.user_id, claims.user_id);
        assert_eq!(decoded.role, claims.role);
        assert_eq!(decoded.institute_id, claims.institute_id);
    }

    #[test]
    fn expired_token_is_a_distinct_failure() {
        let mut claims = sample_claims();
        claims.exp = (Utc::now() - Duration::hours(1)).timestamp();
        let token = generate_token(&claims).unwrap();
        assert!(matches!(decode_token(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn tampered_token_fails_signature_check() {
        let token = generate_token(&sample_claims()).unwrap();
        // Flip a character in the signature segment
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'a' { 'b' } else { 'a' });
        assert!(matches!(
            decode_token(&tampered),
            Err(TokenError::BadSignature) | Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn garbage_token_is_invalid() {
        assert!(matches!(
            decode_token("not.a.jwt"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn verified_token_is_served_from_cache() {
        let claims = sample_claims();
        let token = generate_token(&claims).unwrap();
        verify_token(&token).unwrap();
        assert!(cache_get(&token).is_some());
        // second verify hits the cache and still agrees with the original
        let decoded = verify_token(&token).unwrap();
        assert_eq!(decoded.user_id, claims.user_id);
    }
}
