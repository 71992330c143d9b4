use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::SecurityConfig;

/// Claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT generation error: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("authorization header missing")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("token claims are not an object")]
    InvalidClaims,

    #[error("token carries no numeric user_id")]
    InvalidUserId,
}

/// Signing and verification keys derived from the process-wide secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(security: &SecurityConfig) -> Self {
        Self::from_secret(
            security.jwt_secret.as_bytes(),
            Duration::hours(security.token_ttl_hours),
        )
    }

    pub fn from_secret(secret: &[u8], ttl: Duration) -> Self {
        // HMAC family only; any other `alg` in the header is rejected.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a token for `user_id` expiring `ttl` from now.
    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        self.sign(&Claims::new(user_id, self.ttl))
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Verify signature and expiry, then pull the user id out of the claim set.
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        let data = decode::<Value>(token, &self.decoding, &self.validation)
            .map_err(TokenError::InvalidToken)?;

        let claims = data.claims.as_object().ok_or(TokenError::InvalidClaims)?;

        claims
            .get("user_id")
            .and_then(user_id_from_json)
            .filter(|id| *id > 0)
            .ok_or(TokenError::InvalidUserId)
    }
}

/// Any JSON number with no fractional part, so `7` and `7.0` both name user 7.
fn user_id_from_json(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Extract the token from the `Authorization` header. Accepts both
/// `Bearer <token>` and a bare token.
pub fn extract_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(TokenError::MissingToken)?
        .to_str()
        .map_err(|_| TokenError::InvalidToken(ErrorKind::InvalidToken.into()))?;

    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        return Err(TokenError::MissingToken);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn keys() -> TokenKeys {
        TokenKeys::from_secret(b"test-secret", Duration::hours(24))
    }

    #[test]
    fn issued_token_carries_user_id() {
        let keys = keys();
        let token = keys.issue(7).unwrap();
        assert_eq!(keys.verify(&token).unwrap(), 7);
    }

    #[test]
    fn expiry_is_one_day_out() {
        let claims = Claims::new(1, Duration::hours(24));
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn expired_token_is_rejected_even_with_valid_signature() {
        let keys = keys();
        let now = Utc::now().timestamp();
        let token = keys
            .sign(&Claims { user_id: 7, exp: now - 3600, iat: now - 7200 })
            .unwrap();

        match keys.verify(&token) {
            Err(TokenError::InvalidToken(e)) => {
                assert!(matches!(e.kind(), ErrorKind::ExpiredSignature))
            }
            other => panic!("expected expired signature, got {other:?}"),
        }
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let other = TokenKeys::from_secret(b"another-secret", Duration::hours(1));
        let token = other.issue(3).unwrap();
        assert!(matches!(keys().verify(&token), Err(TokenError::InvalidToken(_))));
    }

    #[test]
    fn other_hmac_strengths_are_accepted() {
        let exp = Utc::now().timestamp() + 60;
        let token = encode(
            &Header::new(Algorithm::HS512),
            &json!({ "user_id": 11, "exp": exp }),
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert_eq!(keys().verify(&token).unwrap(), 11);
    }

    #[test]
    fn non_hmac_algorithms_are_rejected() {
        let keys = keys();
        let token = keys.issue(7).unwrap();
        let (_, rest) = token.split_once('.').unwrap();

        // {"alg":"RS256","typ":"JWT"} and {"alg":"none","typ":"JWT"}
        for header in ["eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9", "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0"] {
            let forged = format!("{header}.{rest}");
            assert!(matches!(keys.verify(&forged), Err(TokenError::InvalidToken(_))), "{header}");
        }
    }

    #[test]
    fn non_numeric_user_id_is_rejected() {
        let exp = Utc::now().timestamp() + 60;
        let enc = EncodingKey::from_secret(b"test-secret");
        for claims in [
            json!({ "user_id": "7", "exp": exp }),
            json!({ "sub": 7, "exp": exp }),
            json!({ "user_id": 0, "exp": exp }),
            json!({ "user_id": 7.5, "exp": exp }),
        ] {
            let token = encode(&Header::default(), &claims, &enc).unwrap();
            assert!(matches!(keys().verify(&token), Err(TokenError::InvalidUserId)));
        }
    }

    #[test]
    fn whole_float_user_id_is_accepted() {
        let exp = Utc::now().timestamp() + 60;
        let claims = json!({ "user_id": 7.0, "exp": exp });
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test-secret")).unwrap();
        assert_eq!(keys().verify(&token).unwrap(), 7);
    }

    #[test]
    fn garbage_is_invalid() {
        assert!(matches!(keys().verify("not.a.token"), Err(TokenError::InvalidToken(_))));
    }

    #[test]
    fn extracts_bearer_and_raw_tokens() {
        let mut headers = HeaderMap::new();
        assert!(matches!(extract_token(&headers), Err(TokenError::MissingToken)));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_token(&headers).unwrap(), "abc.def.ghi");

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("abc.def.ghi"));
        assert_eq!(extract_token(&headers).unwrap(), "abc.def.ghi");

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(matches!(extract_token(&headers), Err(TokenError::MissingToken)));
    }
}
