use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Preflight responses may be cached for a day
pub const CORS_MAX_AGE: Duration = Duration::from_secs(86400);

const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Build the CORS layer. An empty allow-list mirrors the request origin.
///
/// Credentials are allowed, so neither origins nor headers may be wildcards.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allow_origin(origins))
        .allow_credentials(true)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(allowed_headers())
        .max_age(CORS_MAX_AGE)
}

fn allow_origin(origins: &[String]) -> AllowOrigin {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(parsed)
    }
}

fn allowed_headers() -> Vec<HeaderName> {
    vec![
        header::CONTENT_TYPE,
        header::CONTENT_LENGTH,
        header::ACCEPT_ENCODING,
        header::AUTHORIZATION,
        header::ACCEPT,
        header::ORIGIN,
        header::CACHE_CONTROL,
        HeaderName::from_static("x-csrf-token"),
        HeaderName::from_static("x-requested-with"),
    ]
}
