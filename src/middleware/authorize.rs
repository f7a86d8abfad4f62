//! Authorization gate: one admission check executed before every protected
//! route.
//!
//! Sequence per request: bearer extraction, token verification (cached),
//! identity load, capability check, request-context population, then the
//! wrapped handler. The steps are strictly ordered; each depends on the one
//! before it.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
    routing::MethodRouter,
    Extension,
};

use crate::auth::{self, permissions, TokenError};
use crate::context;
use crate::error::ApiError;
use crate::state::AppState;

/// Capability a protected route requires, attached as a request extension
/// by [`guarded`]
#[derive(Debug, Clone, Copy)]
pub struct RequiredCapability(pub &'static str);

/// Wrap every request in a fresh request-context scope, torn down when the
/// response future completes.
pub async fn context_middleware(request: Request, next: Next) -> Response {
    context::scope(next.run(request)).await
}

/// Wire the authorization gate and its required capability onto a route
pub fn guarded(
    state: AppState,
    capability: &'static str,
    routes: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    routes
        .route_layer(axum::middleware::from_fn_with_state(state, authorize))
        .route_layer(Extension(RequiredCapability(capability)))
}

/// The gate itself. Failure kinds follow the error taxonomy: missing or bad
/// tokens are 401, unknown principals 404, soft-deleted principals 410,
/// inactive principals and missing capabilities 403.
pub async fn authorize(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let capability = request.extensions().get::<RequiredCapability>().copied();

    let token = extract_bearer_token(request.headers())?;

    let claims = auth::verify_token(&token).map_err(|e| match e {
        TokenError::Expired => ApiError::unauthorized("Session expired. Please login again"),
        TokenError::BadSignature => ApiError::unauthorized("Invalid token signature"),
        _ => ApiError::unauthorized("Invalid authentication token"),
    })?;

    let user = state
        .user_repo()
        .get_user_by_id(claims.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if user.is_deleted {
        return Err(ApiError::gone("User has been deleted"));
    }
    if !user.is_active {
        return Err(ApiError::forbidden("User account is inactive"));
    }

    if let Some(RequiredCapability(capability)) = capability {
        if !permissions::has_permission(user.role, capability) {
            tracing::warn!(
                "Access denied for user {} | role: {} | required: {}",
                user.id,
                user.role,
                capability
            );
            return Err(ApiError::forbidden("Insufficient permissions"));
        }
    }

    context::set_auth_context(&user);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| ApiError::unauthorized("No token provided"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        Some(_) => Err(ApiError::unauthorized("Empty bearer token")),
        None => Err(ApiError::unauthorized(
            "Authorization header must use Bearer token format",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let headers = HeaderMap::new();
        assert!(matches!(
            extract_bearer_token(&headers),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert!(extract_bearer_token(&headers).is_err());
    }

    #[test]
    fn empty_bearer_token_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer   "));
        assert!(extract_bearer_token(&headers).is_err());
    }
}
