//! Bearer-token extractor. Tokens are issued by the identity provider and
//! verified by asking it; nothing is cached here.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::errors::AppError;
use crate::identity_client::{IdentityErrorKind, IdentityUser};
use crate::state::AppState;

/// The verified caller of a protected route.
#[derive(Debug, Clone)]
pub struct AuthUser(pub IdentityUser);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Access token required".to_string()))?;

        match state.identity.verify_token(token).await {
            Ok(user) => Ok(AuthUser(user)),
            Err(e) if e.kind() == IdentityErrorKind::Unavailable => {
                Err(AppError::Upstream(e.to_string()))
            }
            Err(e) => {
                debug!(error = %e, "Token verification failed");
                Err(AppError::Unauthorized(
                    "Invalid or expired token".to_string(),
                ))
            }
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
