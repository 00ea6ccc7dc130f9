//! Clarity Web Server
//!
//! Axum-based REST API over the Clarity core library:
//! - Transaction categorization (single, extended, batch)
//! - Financial-health analysis
//! - Model and rule introspection
//!
//! The model is loaded once by the caller and shared read-only through
//! `AppState`. No authentication is performed.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use clarity_core::{Analyzer, ClarityConfig, ClassificationEngine, ModelContext};

mod handlers;

/// Environment variable with comma-separated CORS origins
pub const ALLOWED_ORIGINS_ENV: &str = "CLARITY_ALLOWED_ORIGINS";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Largest accepted /batch_predict body
    pub max_batch_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            max_batch_size: 1000,
        }
    }
}

impl ServerConfig {
    /// Build from the loaded config plus `CLARITY_ALLOWED_ORIGINS`
    pub fn from_env(config: &ClarityConfig) -> Self {
        let allowed_origins = std::env::var(ALLOWED_ORIGINS_ENV)
            .map(|v| parse_origins(&v))
            .unwrap_or_default();
        Self {
            allowed_origins,
            max_batch_size: config.batch.max_size,
        }
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub engine: ClassificationEngine,
    pub analyzer: Analyzer,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(
        clarity: &ClarityConfig,
        model: Option<Arc<ModelContext>>,
        config: ServerConfig,
    ) -> Self {
        let engine = ClassificationEngine::new(clarity.rules.clone(), model);
        let analyzer = Analyzer::from_config(engine.clone(), clarity);
        Self {
            engine,
            analyzer,
            config,
        }
    }

    pub fn model(&self) -> Option<&Arc<ModelContext>> {
        self.engine.model()
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors(&state.config.allowed_origins);
    let state = Arc::new(state);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/model_info", get(handlers::model_info))
        .route("/categorize", post(handlers::categorize))
        .route("/predict", post(handlers::predict))
        .route("/batch_predict", post(handlers::batch_predict))
        .route("/analyze", post(handlers::analyze))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
}

fn build_cors(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        return cors;
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}

/// Start the server
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    match state.model() {
        Some(model) => info!(
            "Model loaded: {} ({} categories, {} features)",
            model.model_name(),
            model.categories().len(),
            model.feature_columns().len()
        ),
        None => warn!("No model loaded - unmatched transactions fall back to Misc"),
    }

    let app = create_router(state);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        // Bad input is the caller's problem and safe to echo back
        if let Some(core) = err.downcast_ref::<clarity_core::Error>() {
            if core.is_validation() {
                return Self::bad_request(&core.to_string());
            }
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
