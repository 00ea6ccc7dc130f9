//! Server command implementation

use std::sync::Arc;

use anyhow::Result;
use tracing::error;
use clarity_core::{ClarityConfig, ModelContext};
use clarity_server::{AppState, ServerConfig};

pub async fn cmd_serve(
    config: &ClarityConfig,
    model: Option<Arc<ModelContext>>,
    host: &str,
    port: u16,
) -> Result<()> {
    if model.is_none() {
        error!(
            "Serving without a statistical model - pass --model-dir or set CLARITY_MODEL_DIR"
        );
    }

    println!("🚀 Starting Clarity web server...");
    println!("   Listening: http://{}:{}", host, port);

    let server_config = ServerConfig::from_env(config);
    if server_config.allowed_origins.is_empty() {
        println!("   CORS: same-origin only (set CLARITY_ALLOWED_ORIGINS to allow more)");
    } else {
        println!("   CORS: {}", server_config.allowed_origins.join(", "));
    }
    println!();

    let state = AppState::new(config, model, server_config);
    clarity_server::serve(state, host, port).await
}
