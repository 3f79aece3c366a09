//! Session verification for the admin console.
//!
//! Access tokens are issued by the hosted identity provider and signed with
//! a shared HS256 secret. This module only verifies them: [`SessionVerifier`]
//! decodes the [`Claims`], and the [`AdminSession`] extractor additionally
//! requires an `admin` row in `user_roles`.

mod session;

use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SiteError;

pub use session::{AdminSession, authorize_admin};

/// Cookie the front end stores the access token in.
pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the identity-provider user id.
    pub sub: Uuid,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// User e-mail, when the provider includes it.
    #[serde(default)]
    pub email: Option<String>,
    /// Provider-level role (e.g. `"authenticated"`); not used for access
    /// decisions.
    #[serde(default)]
    pub role: Option<String>,
}

/// Verifies HS256 access tokens against the shared secret.
#[derive(Clone)]
pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for SessionVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionVerifier")
            .field("algorithm", &"HS256")
            .finish_non_exhaustive()
    }
}

impl SessionVerifier {
    /// Creates a verifier for tokens signed with `secret`.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Provider tokens carry `aud: "authenticated"`.
        validation.validate_aud = false;
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a token (signature and expiry).
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Unauthorized`] for a malformed, forged or
    /// expired token.
    pub fn verify(&self, token: &str) -> Result<Claims, SiteError> {
        jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "rejected access token");
                SiteError::Unauthorized("invalid or expired session".to_string())
            })
    }
}

/// Finds the access token in the `Authorization: Bearer` header or, failing
/// that, the [`ACCESS_TOKEN_COOKIE`] cookie.
#[must_use]
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == ACCESS_TOKEN_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::http::HeaderValue;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header};

    use super::*;

    const SECRET: &str = "test-secret";

    fn token(secret: &str, exp_offset: i64) -> String {
        let claims = Claims {
            sub: Uuid::new_v4(),
            exp: Utc::now().timestamp() + exp_offset,
            email: Some("owner@example.fi".to_string()),
            role: Some("authenticated".to_string()),
        };
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap_or_default()
    }

    #[test]
    fn valid_token_is_accepted() {
        let verifier = SessionVerifier::new(SECRET);
        let Ok(claims) = verifier.verify(&token(SECRET, 600)) else {
            panic!("token should verify");
        };
        assert_eq!(claims.email.as_deref(), Some("owner@example.fi"));
    }

    #[test]
    fn wrong_secret_and_expired_tokens_are_rejected() {
        let verifier = SessionVerifier::new(SECRET);
        assert!(matches!(
            verifier.verify(&token("other", 600)),
            Err(SiteError::Unauthorized(_))
        ));
        assert!(verifier.verify(&token(SECRET, -600)).is_err());
        assert!(verifier.verify("garbage").is_err());
    }

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; sb-access-token=xyz"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc"));

        headers.remove(AUTHORIZATION);
        assert_eq!(token_from_headers(&headers).as_deref(), Some("xyz"));

        headers.insert(COOKIE, HeaderValue::from_static("sb-access-token="));
        assert_eq!(token_from_headers(&headers), None);
    }
}
