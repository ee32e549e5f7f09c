use axum::{
    http::StatusCode,
    middleware::from_fn,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use ignite_api::config::{self, API_PREFIX};
use ignite_api::database::{DatabaseError, DatabaseManager};
use ignite_api::handlers;
use ignite_api::is_production;
use ignite_api::middleware::{cors_layer, jwt_auth_middleware};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET_KEY, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    init_tracing(&config.logging.level);

    tracing::info!("Starting Ignite API in {:?} mode", config.environment);
    if config.security.jwt_secret.is_empty() {
        if is_production!() {
            tracing::error!("JWT_SECRET_KEY is not set; logins will fail and every protected route answers 401");
        } else {
            tracing::warn!("JWT_SECRET_KEY is not set");
        }
    }

    DatabaseManager::warm_up().await;

    let app = app();

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("Ignite API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    DatabaseManager::close().await;
    tracing::info!("Server stopped");
    Ok(())
}

/// RUST_LOG wins; otherwise the configured LOG_LEVEL applies
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},sqlx=warn,tower_http=info")));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn app() -> Router {
    let api = Router::new()
        .merge(public_routes())
        .merge(protected_routes());

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .nest(API_PREFIX, api)
        // Global middleware
        .layer(cors_layer(&config::config().security.cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router {
    use handlers::public::{self, auth};

    Router::new()
        .route("/test", get(public::test_get))
        .route("/user", post(auth::register_post))
        .route("/user/login", post(auth::login_post))
}

fn protected_routes() -> Router {
    Router::new()
        .merge(user_routes())
        .merge(settings_routes())
        .route("/auth/whoami", get(handlers::protected::whoami_get))
        .route_layer(from_fn(jwt_auth_middleware))
}

fn user_routes() -> Router {
    use handlers::protected::user;

    Router::new()
        .route(
            "/user/:id",
            get(user::user_get).put(user::user_put).delete(user::user_delete),
        )
        .route("/user/email/:email", get(user::user_get_by_email))
        .route("/user/:id/password", put(user::password_put))
        .route("/user/:id/activate", put(user::activate_put))
        .route("/user/:id/deactivate", put(user::deactivate_put))
}

fn settings_routes() -> Router {
    use handlers::protected::settings;

    Router::new()
        .route(
            "/settings/:user_id",
            get(settings::settings_get).put(settings::settings_put),
        )
        .route("/settings/:user_id/notifications", put(settings::notifications_put))
        .route("/settings/:user_id/privacy", put(settings::privacy_put))
        .route("/settings/:user_id/general", put(settings::general_put))
        .route("/settings/:user_id/custom", put(settings::custom_put))
        .route("/settings/:user_id/custom/:key", get(settings::custom_get))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Ignite API",
            "version": version,
            "description": "REST starter with JWT sessions and encrypted credentials",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "test": format!("{API_PREFIX}/test (public)"),
                "register": format!("{API_PREFIX}/user (public, POST)"),
                "login": format!("{API_PREFIX}/user/login (public, POST)"),
                "user": format!("{API_PREFIX}/user/:id[/password|/activate|/deactivate] (protected)"),
                "settings": format!("{API_PREFIX}/settings/:user_id[/notifications|/privacy|/general|/custom] (protected)"),
                "whoami": format!("{API_PREFIX}/auth/whoami (protected)"),
            }
        }
    }))
}

async fn health() -> impl IntoResponse {
    let (status, body) = health_response(DatabaseManager::health_check().await, chrono::Utc::now());
    (status, Json(body))
}

fn health_response(
    database: Result<(), DatabaseError>,
    now: chrono::DateTime<chrono::Utc>,
) -> (StatusCode, Value) {
    match database {
        Ok(_) => (
            StatusCode::OK,
            json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            }),
        ),
        // Running without a database is a supported mode, not a fault
        Err(DatabaseError::Disabled) => (
            StatusCode::OK,
            json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "disabled"
                }
            }),
        ),
        Err(e) => {
            // Driver errors can name hosts and databases; keep them in the log
            tracing::error!("Database health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({
                    "success": false,
                    "error": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unavailable"
                    }
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_reports_disabled_database_as_ok() {
        let (status, body) = health_response(Err(DatabaseError::Disabled), chrono::Utc::now());
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["database"], "disabled");
    }

    #[test]
    fn health_failure_hides_driver_details() {
        let err = DatabaseError::Sqlx(sqlx::Error::Configuration(
            "password authentication failed for db-internal.example:5432/ignite".into(),
        ));
        let (status, body) = health_response(Err(err), chrono::Utc::now());

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["data"]["status"], "degraded");
        assert_eq!(body["data"]["database"], "unavailable");
        assert!(body["data"].get("database_error").is_none());
        assert!(!body.to_string().contains("db-internal"));
    }
}
