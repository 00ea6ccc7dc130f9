//! Pre-trained categorical model abstraction
//!
//! # Architecture
//!
//! - `CategoricalModel` trait: predict class + per-class probability over an
//!   ordered numeric feature slice
//! - `ModelContext`: the model plus its category mapping and resolved feature
//!   columns. Built once at startup, immutable afterwards, shared via `Arc`.
//! - Implementations: `DecisionForest` (serialized artifact), `MockModel`
//!
//! # Artifacts
//!
//! A model directory holds two JSON files:
//! - `metadata.json`: `{categories, feature_columns, category_mapping}`
//! - `classifier.json`: the decision forest
//!
//! Any problem with either file is a fatal `Error::ModelLoad`.

mod forest;
mod mock;

pub use forest::{DecisionForest, DecisionTree, TreeNode};
pub use mock::MockModel;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::features::{resolve_columns, Feature};

pub const METADATA_FILE: &str = "metadata.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";

/// Environment variable naming the model directory
pub const MODEL_DIR_ENV: &str = "CLARITY_MODEL_DIR";

/// Trait implemented by every categorical model
///
/// Implementations must be Send + Sync so one loaded model can serve any
/// number of concurrent requests without locking.
pub trait CategoricalModel: Send + Sync {
    /// Model family name (for logs and /health)
    fn name(&self) -> &str;

    /// Number of classes the model scores
    fn n_classes(&self) -> usize;

    /// Most likely class index
    fn predict(&self, features: &[f64]) -> Result<usize>;

    /// Probability of every class, indexed by class
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>>;
}

/// Model metadata as stored on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub feature_columns: Vec<String>,
    /// Class index (as a JSON object key) to category name
    #[serde(default)]
    pub category_mapping: BTreeMap<String, String>,
}

/// Loaded model with everything needed to score a transaction
pub struct ModelContext {
    model: Box<dyn CategoricalModel>,
    category_mapping: BTreeMap<usize, String>,
    categories: Vec<String>,
    feature_names: Vec<String>,
    feature_columns: Vec<Feature>,
}

impl std::fmt::Debug for ModelContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelContext")
            .field("model", &self.model.name())
            .field("category_mapping", &self.category_mapping)
            .field("feature_columns", &self.feature_names)
            .finish()
    }
}

impl ModelContext {
    /// Assemble a context, checking the metadata against the model
    pub fn new(model: Box<dyn CategoricalModel>, metadata: ModelMetadata) -> Result<Self> {
        let feature_columns = resolve_columns(&metadata.feature_columns)?;
        if feature_columns.is_empty() {
            // Still loadable: every statistical prediction degrades to ml_error
            warn!("Model metadata lists no feature columns");
        }

        let mut category_mapping = BTreeMap::new();
        for (key, name) in metadata.category_mapping {
            let index: usize = key.trim().parse().map_err(|_| {
                Error::ModelLoad(format!("Category mapping key is not a class index: {}", key))
            })?;
            if index >= model.n_classes() {
                return Err(Error::ModelLoad(format!(
                    "Category mapping index {} out of range for {} classes",
                    index,
                    model.n_classes()
                )));
            }
            category_mapping.insert(index, name);
        }

        let categories = if metadata.categories.is_empty() {
            category_mapping.values().cloned().collect()
        } else {
            metadata.categories
        };

        Ok(Self {
            model,
            category_mapping,
            categories,
            feature_names: metadata.feature_columns,
            feature_columns,
        })
    }

    /// Load `metadata.json` and `classifier.json` from a directory
    pub fn load(dir: &Path) -> Result<Self> {
        let metadata_path = dir.join(METADATA_FILE);
        info!(path = %metadata_path.display(), "Loading model metadata");
        let metadata: ModelMetadata = read_json(&metadata_path)?;

        let classifier_path = dir.join(CLASSIFIER_FILE);
        info!(path = %classifier_path.display(), "Loading classifier");
        let forest: DecisionForest = read_json(&classifier_path)?;
        forest.validate(metadata.feature_columns.len())?;

        let context = Self::new(Box::new(forest), metadata)?;
        info!(
            model = context.model_name(),
            categories = ?context.categories,
            features = context.feature_columns.len(),
            "Model loaded"
        );
        Ok(context)
    }

    pub fn model(&self) -> &dyn CategoricalModel {
        self.model.as_ref()
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn feature_columns(&self) -> &[Feature] {
        &self.feature_columns
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn category_mapping(&self) -> &BTreeMap<usize, String> {
        &self.category_mapping
    }

    /// Category name for a predicted class, if mapped
    pub fn category_for(&self, class: usize) -> Option<&str> {
        self.category_mapping.get(&class).map(String::as_str)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::ModelLoad(format!("Cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| Error::ModelLoad(format!("Corrupt {}: {}", path.display(), e)))
}
