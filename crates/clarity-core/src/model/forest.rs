//! Decision forest classifier
//!
//! Each tree is a flat node list; node 0 is the root. A split sends a sample
//! left when `features[feature] <= threshold`. Class probabilities are the
//! mean of the leaf distributions reached in every tree.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::CategoricalModel;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        distribution: Vec<f64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Walk from the root to a leaf
    fn leaf(&self, features: &[f64]) -> Result<&[f64]> {
        let mut index = 0;
        // A valid tree reaches a leaf in fewer steps than it has nodes
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { distribution }) => return Ok(distribution),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = features.get(*feature).ok_or_else(|| {
                        Error::Inference(format!(
                            "Split on feature {} but only {} features given",
                            feature,
                            features.len()
                        ))
                    })?;
                    index = if *value <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(Error::Inference(format!("Dangling node index {}", index)));
                }
            }
        }
        Err(Error::Inference("Tree traversal did not terminate".into()))
    }
}

/// Ensemble of decision trees voting with leaf class distributions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionForest {
    pub n_classes: usize,
    pub trees: Vec<DecisionTree>,
}

impl DecisionForest {
    /// Structural checks run once at load time
    pub fn validate(&self, n_features: usize) -> Result<()> {
        if self.n_classes == 0 {
            return Err(Error::ModelLoad("Forest has no classes".into()));
        }
        if self.trees.is_empty() {
            return Err(Error::ModelLoad("Forest has no trees".into()));
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(Error::ModelLoad(format!("Tree {} is empty", t)));
            }
            for (n, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if *feature >= n_features {
                            return Err(Error::ModelLoad(format!(
                                "Tree {} node {} splits on feature {} of {}",
                                t, n, feature, n_features
                            )));
                        }
                        if !threshold.is_finite() {
                            return Err(Error::ModelLoad(format!(
                                "Tree {} node {} has a non-finite threshold",
                                t, n
                            )));
                        }
                        // Children must point forward, which also rules out cycles
                        for child in [left, right] {
                            if *child <= n || *child >= tree.nodes.len() {
                                return Err(Error::ModelLoad(format!(
                                    "Tree {} node {} has invalid child {}",
                                    t, n, child
                                )));
                            }
                        }
                    }
                    TreeNode::Leaf { distribution } => {
                        if distribution.len() != self.n_classes {
                            return Err(Error::ModelLoad(format!(
                                "Tree {} leaf {} has {} classes, expected {}",
                                t,
                                n,
                                distribution.len(),
                                self.n_classes
                            )));
                        }
                        if distribution.iter().any(|p| !p.is_finite() || *p < 0.0)
                            || distribution.iter().sum::<f64>() <= 0.0
                        {
                            return Err(Error::ModelLoad(format!(
                                "Tree {} leaf {} has an invalid distribution",
                                t, n
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl CategoricalModel for DecisionForest {
    fn name(&self) -> &str {
        "DecisionForest"
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict(&self, features: &[f64]) -> Result<usize> {
        let proba = self.predict_proba(features)?;
        proba
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, p)| match best {
                Some((_, bp)) if bp >= *p => best,
                _ => Some((i, *p)),
            })
            .map(|(i, _)| i)
            .ok_or_else(|| Error::Inference("Empty probability vector".into()))
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        if self.trees.is_empty() {
            return Err(Error::Inference("Forest has no trees".into()));
        }

        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            let leaf = tree.leaf(features)?;
            if leaf.len() != self.n_classes {
                return Err(Error::Inference("Leaf size does not match classes".into()));
            }
            let total: f64 = leaf.iter().sum();
            for (acc, p) in proba.iter_mut().zip(leaf) {
                *acc += p / total;
            }
        }

        let n = self.trees.len() as f64;
        Ok(proba.into_iter().map(|p| p / n).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(threshold: f64, left: Vec<f64>, right: Vec<f64>) -> DecisionTree {
        DecisionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 0,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { distribution: left },
                TreeNode::Leaf {
                    distribution: right,
                },
            ],
        }
    }

    #[test]
    fn test_forest_averages_trees() {
        let forest = DecisionForest {
            n_classes: 2,
            trees: vec![
                stump(0.0, vec![1.0, 0.0], vec![0.0, 1.0]),
                stump(10.0, vec![3.0, 1.0], vec![0.0, 1.0]),
            ],
        };
        forest.validate(1).unwrap();

        let proba = forest.predict_proba(&[5.0]).unwrap();
        // Tree 1 goes right (0,1), tree 2 goes left (0.75,0.25)
        assert!((proba[0] - 0.375).abs() < 1e-9);
        assert!((proba[1] - 0.625).abs() < 1e-9);
        assert_eq!(forest.predict(&[5.0]).unwrap(), 1);
        assert_eq!(forest.predict(&[-5.0]).unwrap(), 0);
    }

    #[test]
    fn test_threshold_is_inclusive_left() {
        let forest = DecisionForest {
            n_classes: 2,
            trees: vec![stump(1.0, vec![1.0, 0.0], vec![0.0, 1.0])],
        };
        assert_eq!(forest.predict(&[1.0]).unwrap(), 0);
    }

    #[test]
    fn test_missing_feature_is_inference_error() {
        let forest = DecisionForest {
            n_classes: 2,
            trees: vec![stump(1.0, vec![1.0, 0.0], vec![0.0, 1.0])],
        };
        let err = forest.predict_proba(&[]).unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[test]
    fn test_validate_rejects_backward_child() {
        let forest = DecisionForest {
            n_classes: 1,
            trees: vec![DecisionTree {
                nodes: vec![
                    TreeNode::Split {
                        feature: 0,
                        threshold: 0.0,
                        left: 1,
                        right: 1,
                    },
                    TreeNode::Split {
                        feature: 0,
                        threshold: 0.0,
                        left: 0,
                        right: 0,
                    },
                ],
            }],
        };
        assert!(forest.validate(1).is_err());
    }

    #[test]
    fn test_validate_rejects_wrong_leaf_width() {
        let forest = DecisionForest {
            n_classes: 3,
            trees: vec![stump(0.0, vec![1.0, 0.0], vec![0.0, 1.0])],
        };
        let err = forest.validate(1).unwrap_err();
        assert!(err.to_string().contains("expected 3"));
    }

    #[test]
    fn test_validate_rejects_unknown_feature_index() {
        let forest = DecisionForest {
            n_classes: 2,
            trees: vec![stump(0.0, vec![1.0, 0.0], vec![0.0, 1.0])],
        };
        assert!(forest.validate(0).is_err());
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{"n_classes":2,"trees":[{"nodes":[
            {"kind":"split","feature":0,"threshold":0.5,"left":1,"right":2},
            {"kind":"leaf","distribution":[0.9,0.1]},
            {"kind":"leaf","distribution":[0.2,0.8]}]}]}"#;
        let forest: DecisionForest = serde_json::from_str(json).unwrap();
        forest.validate(1).unwrap();
        assert_eq!(forest.predict(&[1.0]).unwrap(), 1);
    }
}
