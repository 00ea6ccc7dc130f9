//! Shared setup for every command

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clarity_core::{ClarityConfig, ClassificationEngine, ModelContext};
use tracing::{info, warn};

/// Load config from an explicit path, the data-dir override, or built-ins
pub fn load_config(path: Option<&Path>) -> Result<ClarityConfig> {
    ClarityConfig::load(path).context("Failed to load configuration")
}

/// Model directory looked up under `base` when none is given
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Explicit directory, else `<base>/models` when it exists
pub fn resolve_model_dir(explicit: Option<&Path>, base: &Path) -> Option<PathBuf> {
    if let Some(dir) = explicit {
        return Some(dir.to_path_buf());
    }
    let fallback = base.join(DEFAULT_MODEL_DIR);
    fallback.is_dir().then_some(fallback)
}

/// Load the model if a directory was given
///
/// A directory that is given but unusable is fatal; no directory at all means
/// rules-only classification.
pub fn load_model(dir: Option<&Path>) -> Result<Option<Arc<ModelContext>>> {
    let Some(dir) = dir else {
        warn!("No model directory given and no ./models found - running rules only");
        return Ok(None);
    };

    let context = ModelContext::load(dir)
        .with_context(|| format!("Failed to load model from {}", dir.display()))?;
    info!("Using model from {}", dir.display());
    Ok(Some(Arc::new(context)))
}

pub fn build_engine(
    config: &ClarityConfig,
    model: Option<Arc<ModelContext>>,
) -> ClassificationEngine {
    ClassificationEngine::new(config.rules.clone(), model)
}
