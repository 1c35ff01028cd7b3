use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::config::EffectiveConfig;
use crate::models::auth::Claims;
use crate::AppState;

/// Extractor for authenticated requests. Carries the JWT subject.
pub struct AuthUser {
    pub subject: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, &'static str);

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let config = state.config.clone();
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        async move {
            let header = auth_header
                .ok_or((StatusCode::UNAUTHORIZED, "Missing Authorization header"))?;

            let token = header
                .strip_prefix("Bearer ")
                .ok_or((StatusCode::UNAUTHORIZED, "Invalid Authorization format"))?;

            let claims = validate_token(token, &config.jwt_secret)
                .ok_or((StatusCode::UNAUTHORIZED, "Invalid or expired token"))?;

            Ok(AuthUser {
                subject: claims.sub,
            })
        }
    }
}

/// Route layer that lets a request through only with a valid bearer token.
pub async fn require_bearer(auth: AuthUser, request: Request, next: Next) -> Response {
    tracing::debug!("Authorized request for {}", auth.subject);
    next.run(request).await
}

/// Signs a token for `subject`. Nothing in the public API issues tokens.
#[allow(dead_code)]
pub fn create_token(
    subject: &str,
    config: &EffectiveConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: subject.to_string(),
        exp: now + config.jwt_expiry().num_seconds() as usize,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
}

pub fn validate_token(token: &str, secret: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| tracing::debug!("Rejected token: {}", e))
    .ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::resolve;

    fn config(secret: &str) -> EffectiveConfig {
        let env: HashMap<String, String> =
            [("JWT_SECRET".to_string(), secret.to_string())].into_iter().collect();
        resolve(&env)
    }

    #[test]
    fn test_token_roundtrip() {
        let config = config("first-secret");
        let token = create_token("invoice-42", &config).unwrap();

        let claims = validate_token(&token, "first-secret").unwrap();
        assert_eq!(claims.sub, "invoice-42");
        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token("invoice-42", &config("first-secret")).unwrap();
        assert!(validate_token(&token, "second-secret").is_none());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "invoice-42".to_string(),
            iat: now - 2 * 86_400,
            exp: now - 86_400,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"first-secret"),
        )
        .unwrap();

        assert!(validate_token(&token, "first-secret").is_none());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(validate_token("not.a.jwt", "first-secret").is_none());
    }
}
