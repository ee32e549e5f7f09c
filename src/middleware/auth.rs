use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Serialize;

use crate::auth::{self, Claims};
use crate::error::ApiError;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug, Serialize)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
        }
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    let claims = auth::issuer().validate(token).map_err(|e| {
        tracing::debug!("Rejected bearer token: {}", e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or("Authorization header is required")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() && !token.contains(' ') => Ok(token),
        _ => Err("Invalid authorization header format"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(extract_jwt_from_headers(&headers), Ok("abc.def.ghi"));
    }

    #[test]
    fn missing_header_is_rejected() {
        assert_eq!(
            extract_jwt_from_headers(&HeaderMap::new()),
            Err("Authorization header is required")
        );
    }

    #[test]
    fn malformed_headers_are_rejected() {
        for value in ["abc.def.ghi", "Basic dXNlcjpwYXNz", "Bearer ", "bearer abc", "Bearer a b"] {
            assert_eq!(
                extract_jwt_from_headers(&headers_with(value)),
                Err("Invalid authorization header format"),
                "header {:?} should be rejected",
                value
            );
        }
    }

    mod routed {
        use super::super::*;
        use axum::{
            body::{to_bytes, Body},
            http::{Request as HttpRequest, StatusCode},
            middleware::from_fn,
            routing::get,
            Extension, Router,
        };
        use tower::ServiceExt;

        fn router() -> Router {
            Router::new()
                .route(
                    "/me",
                    get(|Extension(user): Extension<AuthUser>| async move {
                        format!("{}:{}", user.user_id, user.email)
                    }),
                )
                .route_layer(from_fn(jwt_auth_middleware))
        }

        async fn call(auth: Option<String>) -> (StatusCode, String) {
            let mut req = HttpRequest::builder().uri("/me");
            if let Some(value) = auth {
                req = req.header(AUTHORIZATION, value);
            }
            let res = router()
                .oneshot(req.body(Body::empty()).unwrap())
                .await
                .unwrap();
            let status = res.status();
            let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
            (status, String::from_utf8(body.to_vec()).unwrap())
        }

        #[tokio::test]
        async fn valid_token_reaches_handler_with_identity() {
            let token = auth::issuer().issue(7, "grace@example.com").unwrap();
            let (status, body) = call(Some(format!("Bearer {}", token))).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, "7:grace@example.com");
        }

        #[tokio::test]
        async fn rejection_uses_error_envelope() {
            let (status, body) = call(Some("Bearer not-a-jwt".to_string())).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);

            let json: serde_json::Value = serde_json::from_str(&body).unwrap();
            assert_eq!(json["success"], false);
            assert_eq!(json["error"], "Invalid token");
            assert_eq!(json["code"], "UNAUTHORIZED");
        }

        #[tokio::test]
        async fn missing_header_never_reaches_handler() {
            let (status, body) = call(None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert!(body.contains("Authorization header is required"));
        }
    }

    #[test]
    fn claims_convert_to_auth_user() {
        let claims = Claims::new(42, "ada@example.com", chrono::Utc::now());
        let user = AuthUser::from(claims);
        assert_eq!(user.user_id, 42);
        assert_eq!(user.email, "ada@example.com");
    }
}
