use serde::{Deserialize, Serialize};

/// One node of a fitted decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Go left when `features[feature] <= threshold`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Regression trees hold one value, classification trees one weight per class
    Leaf { value: Vec<f64> },
}

/// Decision tree stored as a flat node array rooted at index 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Children must come after their parent, which also rules out cycles.
    pub fn validate(&self, n_features: usize, value_len: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} of {}",
                            index, feature, n_features
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", index));
                    }
                    for child in [*left, *right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", index, child));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != value_len {
                        return Err(format!(
                            "leaf {} holds {} values, expected {}",
                            index,
                            value.len(),
                            value_len
                        ));
                    }
                    if value.iter().any(|v| !v.is_finite()) {
                        return Err(format!("leaf {} holds a non-finite value", index));
                    }
                }
            }
        }
        Ok(())
    }

    /// Leaf reached by `features`. Only call on a validated tree.
    pub fn leaf(&self, features: &[f64]) -> &[f64] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump() -> DecisionTree {
        serde_json::from_str(
            r#"{"nodes": [
                {"split": {"feature": 1, "threshold": 0.5, "left": 1, "right": 2}},
                {"leaf": {"value": [1.0]}},
                {"leaf": {"value": [4.0]}}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_threshold_is_inclusive_on_the_left() {
        let tree = stump();
        tree.validate(2, 1).unwrap();
        assert_eq!(tree.leaf(&[9.0, 0.5]), &[1.0]);
        assert_eq!(tree.leaf(&[9.0, 0.6]), &[4.0]);
    }

    #[test]
    fn test_validate_rejects_bad_structure() {
        let tree = stump();
        assert!(tree.validate(1, 1).is_err());
        assert!(tree.validate(2, 3).is_err());

        let cyclic = DecisionTree {
            nodes: vec![TreeNode::Split {
                feature: 0,
                threshold: 0.0,
                left: 0,
                right: 0,
            }],
        };
        assert!(cyclic.validate(1, 1).is_err());
        assert!(DecisionTree { nodes: vec![] }.validate(1, 1).is_err());
    }
}
