//! Regression tree structure and traversal
//!
//! Trees store nodes in a flat vector with node 0 as the root. Traversal
//! goes left on `feature <= threshold`, the same comparison the trainer
//! uses when it partitions samples, so training and inference agree on
//! every boundary value.

use serde::{Deserialize, Serialize};

/// A decision tree node (internal or leaf)
///
/// Internal nodes carry `feature_idx >= 0` and child indices; leaf nodes
/// carry `feature_idx == -1` and a leaf value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Left child index (-1 for leaf nodes)
    pub left: i32,

    /// Right child index (-1 for leaf nodes)
    pub right: i32,

    /// Feature index to split on (-1 for leaf nodes)
    pub feature_idx: i32,

    /// Split threshold
    pub threshold: f64,

    /// Leaf value (Some for leaf nodes, None for internal nodes)
    pub leaf: Option<f64>,
}

impl Node {
    pub fn internal(feature_idx: i32, threshold: f64, left: i32, right: i32) -> Self {
        Self {
            left,
            right,
            feature_idx,
            threshold,
            leaf: None,
        }
    }

    pub fn leaf(value: f64) -> Self {
        Self {
            left: -1,
            right: -1,
            feature_idx: -1,
            threshold: 0.0,
            leaf: Some(value),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.feature_idx < 0 || self.leaf.is_some()
    }
}

/// A single regression tree in the boosted ensemble.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tree {
    /// Tree nodes (node 0 is the root)
    pub nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Evaluate this tree on a feature vector.
    ///
    /// Structural defects (dangling child index, feature index past the
    /// vector) evaluate to 0.0 rather than panicking; `validate` exists to
    /// reject such trees up front.
    pub fn evaluate(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;

        loop {
            let Some(node) = self.nodes.get(idx) else {
                return 0.0;
            };

            if node.is_leaf() {
                return node.leaf.unwrap_or(0.0);
            }

            let Some(&value) = features.get(node.feature_idx as usize) else {
                return 0.0;
            };

            let child = if value <= node.threshold {
                node.left
            } else {
                node.right
            };
            if child < 0 {
                return 0.0;
            }
            idx = child as usize;
        }
    }

    /// Validate tree structure: child indices in bounds, leaves carry
    /// values, internal nodes carry a real feature index.
    pub fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() {
                if node.leaf.is_none() {
                    return Err(format!("leaf node {i} has no value"));
                }
                continue;
            }

            if node.left < 0 || node.left as usize >= self.nodes.len() {
                return Err(format!("node {i} has invalid left child {}", node.left));
            }
            if node.right < 0 || node.right as usize >= self.nodes.len() {
                return Err(format!("node {i} has invalid right child {}", node.right));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_tree() -> Tree {
        // if feature[0] <= 0.5 return -1.0 else return 1.0
        Tree::new(vec![
            Node::internal(0, 0.5, 1, 2),
            Node::leaf(-1.0),
            Node::leaf(1.0),
        ])
    }

    #[test]
    fn test_tree_evaluation() {
        let tree = simple_tree();
        assert_eq!(tree.evaluate(&[0.3]), -1.0);
        assert_eq!(tree.evaluate(&[0.5]), -1.0); // equal goes left
        assert_eq!(tree.evaluate(&[0.7]), 1.0);
    }

    #[test]
    fn test_tree_validation() {
        assert!(simple_tree().validate().is_ok());

        let dangling = Tree::new(vec![
            Node::internal(0, 0.5, 5, 2),
            Node::leaf(-1.0),
            Node::leaf(1.0),
        ]);
        assert!(dangling.validate().is_err());
    }

    #[test]
    fn test_deterministic_traversal() {
        let tree = simple_tree();
        let features = vec![0.49];
        let first = tree.evaluate(&features);
        for _ in 0..10 {
            assert_eq!(tree.evaluate(&features), first);
        }
    }
}
