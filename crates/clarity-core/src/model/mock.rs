//! Mock model for testing
//!
//! Returns predictable responses without any artifact on disk.

use crate::error::{Error, Result};

use super::CategoricalModel;

/// Mock categorical model
#[derive(Debug, Clone)]
pub struct MockModel {
    class: usize,
    proba: Vec<f64>,
    /// When set, every call fails with this message
    failure: Option<String>,
}

impl MockModel {
    /// Always predict `class` with the given probability vector
    pub fn fixed(class: usize, proba: Vec<f64>) -> Self {
        Self {
            class,
            proba,
            failure: None,
        }
    }

    /// A model over `n_classes` classes whose inference always fails
    pub fn failing(n_classes: usize, message: &str) -> Self {
        Self {
            class: 0,
            proba: vec![0.0; n_classes],
            failure: Some(message.to_string()),
        }
    }
}

impl CategoricalModel for MockModel {
    fn name(&self) -> &str {
        "MockModel"
    }

    fn n_classes(&self) -> usize {
        self.proba.len()
    }

    fn predict(&self, _features: &[f64]) -> Result<usize> {
        match &self.failure {
            Some(msg) => Err(Error::Inference(msg.clone())),
            None => Ok(self.class),
        }
    }

    fn predict_proba(&self, _features: &[f64]) -> Result<Vec<f64>> {
        match &self.failure {
            Some(msg) => Err(Error::Inference(msg.clone())),
            None => Ok(self.proba.clone()),
        }
    }
}
