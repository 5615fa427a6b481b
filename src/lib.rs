//! Anteroom - pre-launch landing page and workspace dashboard backend.

pub mod config;
pub mod email;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod provision;
pub mod schema;
pub mod slug;
pub mod telemetry;

use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use diesel::r2d2::{self, ConnectionManager};
use diesel::PgConnection;
use std::sync::Arc;
use std::time::Duration;

use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use config::WaitlistConfig;
use email::EmailProvider;
use middleware::request_id::request_id_middleware;

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: DbPool,
    pub session_cookie: Arc<str>,
    pub waitlist: Arc<WaitlistConfig>,
    pub email: Option<Arc<dyn EmailProvider>>,
}

impl AppState {
    pub fn new(db_pool: DbPool, config: &Config) -> Self {
        Self {
            db_pool,
            session_cookie: Arc::from(config.session.cookie_name.as_str()),
            waitlist: Arc::new(config.waitlist.clone()),
            email: email::create_provider(&config.email),
        }
    }
}

pub fn create_router(state: AppState, config: &config::Config) -> Router {
    let cors = build_cors_layer(config);
    let body_limit = RequestBodyLimitLayer::new(config.server.max_body_size);

    #[allow(deprecated)]
    let timeout = TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let health_routes = Router::new()
        .route("/health", get(handlers::health::health_check_simple))
        .route("/health/status", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::ready_check))
        .route("/health/live", get(handlers::health::live_check))
        .with_state(state.clone());

    let waitlist_routes = Router::new()
        .route("/api/waitlist", post(handlers::waitlist::join_waitlist))
        .route("/api/waitlist/spots", get(handlers::waitlist::early_spots))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route(
            "/api/workspaces",
            post(handlers::workspaces::create_workspace).get(handlers::workspaces::list_workspaces),
        )
        .route(
            "/api/workspaces/{workspace_slug}/projects",
            post(handlers::projects::create_project).get(handlers::projects::list_projects),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::session::require_session_api,
        ))
        .with_state(state.clone());

    let public_pages = Router::new()
        .route("/", get(handlers::pages::landing))
        .route("/login", get(handlers::pages::login_page))
        .route("/signup", get(handlers::pages::signup_page))
        .with_state(state.clone());

    let protected_pages = Router::new()
        .route("/onboarding", get(handlers::pages::onboarding))
        .route("/dashboard", get(handlers::pages::dashboard))
        .route("/{workspace_slug}", get(handlers::pages::workspace_overview))
        .route(
            "/{workspace_slug}/projects/new",
            get(handlers::pages::new_project_page),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::session::require_session_page,
        ))
        .with_state(state.clone());

    // The gate wraps every page route; `/api` endpoints answer 401 JSON
    // themselves instead of redirecting.
    let page_routes = Router::new()
        .merge(public_pages)
        .merge(protected_pages)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::gate::gate_middleware,
        ));

    Router::new()
        .merge(openapi::swagger_router())
        .merge(health_routes)
        .merge(waitlist_routes)
        .merge(api_routes)
        .merge(page_routes)
        .fallback(fallback_handler)
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(timeout)
        .layer(body_limit)
        .layer(cors)
}

async fn fallback_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "Not found", "code": "NOT_FOUND"})),
    )
}

fn build_cors_layer(config: &config::Config) -> CorsLayer {
    use axum::http::header::HeaderName;
    use axum::http::{HeaderValue, Method};

    let is_wildcard_origin = config.cors.allowed_origins.contains(&"*".to_string())
        || config.cors.allowed_origins.is_empty();

    let methods: Vec<Method> = config
        .cors
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();

    let headers: Vec<HeaderName> = config
        .cors
        .allowed_headers
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect();

    if is_wildcard_origin {
        // Credentials cannot be combined with a wildcard origin.
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers)
            .max_age(Duration::from_secs(config.cors.max_age_secs))
    } else {
        let origins: Vec<HeaderValue> = config
            .cors
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        let layer = CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
            .max_age(Duration::from_secs(config.cors.max_age_secs));

        if config.cors.allow_credentials {
            layer.allow_credentials(true)
        } else {
            layer
        }
    }
}

pub fn create_db_pool(config: &config::Config) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(&config.database.url);
    r2d2::Pool::builder()
        .max_size(config.database.max_connections)
        .min_idle(Some(config.database.min_connections))
        .connection_timeout(Duration::from_secs(config.database.connection_timeout_secs))
        .idle_timeout(Some(Duration::from_secs(config.database.idle_timeout_secs)))
        .build(manager)
        .expect("Failed to create database pool")
}

pub fn create_db_pool_with_url(database_url: &str) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    r2d2::Pool::builder()
        .max_size(10)
        .min_idle(Some(2))
        .connection_timeout(Duration::from_secs(30))
        .idle_timeout(Some(Duration::from_secs(600)))
        .build(manager)
        .expect("Failed to create database pool")
}

pub fn init_tracing(config: &config::Config) {
    telemetry::init_telemetry(config);
}

pub use config::Config;
pub use telemetry::tracing::shutdown_telemetry;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_build_cors_layer_accepts_testing_config() {
        let config = Config::default_for_testing();
        let _layer = build_cors_layer(&config);
    }
}
