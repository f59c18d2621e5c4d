//! Atrium Web Server
//!
//! The HTTP surface of the Salesforce BFF: routes for affiliates, workshops,
//! users and facilitators, each behind the authorization gate from
//! `atrium-auth`.

pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use server::AtriumServer;
pub use state::AppState;

use atrium_core::{AtriumConfig, AtriumError};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    response::{IntoResponse, Response},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    // Configure CORS; the gate headers are client-supplied
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_origin("http://127.0.0.1:3000".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_credentials(true)
        .allow_headers([
            ACCEPT,
            CONTENT_TYPE,
            HeaderName::from_static("x-jwt"),
            HeaderName::from_static("x-email"),
            HeaderName::from_static("x-affiliate"),
            HeaderName::from_static("x-user-id"),
            HeaderName::from_static("x-role-name"),
            HeaderName::from_static("x-bypass-token"),
        ]);

    Router::new()
        // API routes
        .nest("/api", routes::api_routes(&state))
        // Session resolution runs before every route gate
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::session_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024)) // 2MB max body size
        .with_state(state)
}

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Shared Atrium configuration (gate, CRM, sessions)
    pub core: AtriumConfig,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            core: AtriumConfig::default(),
        }
    }
}

impl WebConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut core = AtriumConfig::default();
        core.apply_env();

        Self {
            host: std::env::var("ATRIUM_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("ATRIUM_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            core,
        }
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(#[from] Box<AtriumError>),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebError::Validation(_) => axum::http::StatusCode::BAD_REQUEST,
            WebError::NotFound(_) => axum::http::StatusCode::NOT_FOUND,
            WebError::Upstream(e) if matches!(**e, AtriumError::NotFound { .. }) => {
                axum::http::StatusCode::NOT_FOUND
            }
            _ => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

/// Initialize logging for the web server
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atrium_web=debug,tower_http=debug,axum=debug".into()),
        )
        .init();
}
