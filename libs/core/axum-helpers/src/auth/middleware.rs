use super::session::{SessionAuth, SessionClaims};
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

/// Extract the session token from the Authorization header or cookie
fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    // Try Authorization header first: "Bearer <token>"
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(|s| s.to_string()))
        .or_else(|| {
            // Fallback to cookie: "session_token=<token>"
            headers
                .get("cookie")
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        let parts: Vec<&str> = cookie.trim().splitn(2, '=').collect();
                        if parts.len() == 2 && parts[0] == "session_token" {
                            Some(parts[1].to_string())
                        } else {
                            None
                        }
                    })
                })
        })
}

/// Session authentication middleware.
///
/// Validates the session token from the Authorization header or cookie and
/// inserts [`SessionClaims`] into request extensions on success. Any admin
/// role passes; routes needing more layer [`require_superadmin_middleware`]
/// on top.
///
/// # Example
///
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::{SessionAuth, session_auth_middleware};
///
/// let protected_routes = Router::new()
///     .route("/api/interactions", get(stats_handler))
///     .layer(axum::middleware::from_fn_with_state(
///         auth.clone(),
///         session_auth_middleware,
///     ));
/// ```
pub async fn session_auth_middleware(
    State(auth): State<SessionAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = match extract_token_from_request(&headers) {
        Some(t) => t,
        None => {
            tracing::debug!("No session token in Authorization header or cookie");
            return Err(AppError::Unauthorized("Unauthorized".to_string()));
        }
    };

    let claims = match auth.verify_token(&token) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("Session token verification failed: {}", e);
            return Err(AppError::Unauthorized("Unauthorized".to_string()));
        }
    };

    // Session is valid - insert claims into request extensions
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Superadmin gate.
///
/// Must be layered after [`session_auth_middleware`]; reads the claims that
/// middleware inserted and rejects sessions without the superadmin role.
pub async fn require_superadmin_middleware(
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match request.extensions().get::<SessionClaims>() {
        Some(claims) if claims.is_superadmin() => Ok(next.run(request).await),
        Some(claims) => {
            tracing::debug!(admin = %claims.sub, "Superadmin required");
            Err(AppError::Forbidden("Superadmin access required".to_string()))
        }
        None => Err(AppError::Unauthorized("Unauthorized".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_token_from_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(
            extract_token_from_request(&headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_static("theme=dark; session_token=abc.def.ghi; other=1"),
        );
        assert_eq!(
            extract_token_from_request(&headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_extract_token_missing() {
        let headers = HeaderMap::new();
        assert_eq!(extract_token_from_request(&headers), None);
    }

    #[test]
    fn test_bearer_takes_precedence_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer from-header"));
        headers.insert(
            "cookie",
            HeaderValue::from_static("session_token=from-cookie"),
        );
        assert_eq!(
            extract_token_from_request(&headers),
            Some("from-header".to_string())
        );
    }
}
