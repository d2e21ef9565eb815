//! Decision tree algorithms and ensemble methods.
//!
//! This module implements:
//! - CART (Classification and Regression Trees) using Gini impurity
//! - Random Forest ensemble classifier
//!
//! # Example
//!
//! ```
//! use reident::prelude::*;
//! use reident::tree::DecisionTreeClassifier;
//!
//! // Training data (simple 2D, three classes)
//! let x = Matrix::from_vec(4, 2, vec![
//!     0.0, 0.0,  // class 0
//!     0.0, 1.0,  // class 0
//!     5.0, 0.0,  // class 1
//!     5.0, 5.0,  // class 2
//! ]).expect("4x2 matrix");
//! let y = vec![0, 0, 1, 2];
//!
//! let mut tree = DecisionTreeClassifier::new().with_max_depth(3);
//! tree.fit(&x, &y).expect("fit should succeed");
//! assert_eq!(tree.predict(&x).expect("fitted"), y);
//! ```

use crate::error::{ReidentError, Result};
use crate::monte_carlo::majority_vote;
use crate::primitives::Matrix;
use crate::traits::Classifier;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Internal node in a decision tree.
///
/// Contains a split condition (feature and threshold) and pointers to
/// left and right subtrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f32,
    /// Left subtree (samples where feature <= threshold)
    pub left: Box<TreeNode>,
    /// Right subtree (samples where feature > threshold)
    pub right: Box<TreeNode>,
}

/// Leaf node in a decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaf {
    /// Predicted class label for this leaf
    pub class_label: usize,
    /// Number of training samples in this leaf
    pub n_samples: usize,
}

/// A node in a decision tree (either internal node or leaf).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Internal decision node with split condition
    Node(Node),
    /// Leaf node with class prediction
    Leaf(Leaf),
}

impl TreeNode {
    /// Returns the depth of the tree rooted at this node.
    ///
    /// Leaf nodes have depth 0, internal nodes have depth 1 + max(left, right).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 0,
            TreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }

    fn predict_one(&self, sample: &[f32]) -> usize {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf(leaf) => return leaf.class_label,
                TreeNode::Node(internal) => {
                    node = if sample[internal.feature_idx] <= internal.threshold {
                        &internal.left
                    } else {
                        &internal.right
                    };
                }
            }
        }
    }
}

/// Decision tree classifier using the CART algorithm.
///
/// Uses Gini impurity for splitting criterion and builds trees recursively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    tree: Option<TreeNode>,
    max_depth: Option<usize>,
    /// Number of features the model was trained on (for validation)
    n_features: Option<usize>,
}

impl DecisionTreeClassifier {
    /// Creates a new decision tree classifier with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: None,
            max_depth: None,
            n_features: None,
        }
    }

    /// Sets the maximum depth of the tree.
    ///
    /// # Arguments
    ///
    /// * `depth` - Maximum depth (root has depth 0)
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Depth of the fitted tree, `None` before fit.
    #[must_use]
    pub fn depth(&self) -> Option<usize> {
        self.tree.as_ref().map(TreeNode::depth)
    }
}

impl Classifier for DecisionTreeClassifier {
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        let (n_rows, n_cols) = x.shape();
        if n_rows != y.len() {
            return Err("Number of samples in X and y must match".into());
        }
        if n_rows == 0 {
            return Err("Cannot fit with zero samples".into());
        }

        self.n_features = Some(n_cols);
        self.tree = Some(build_tree(x, y, 0, self.max_depth));
        Ok(())
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        let tree = self.tree.as_ref().ok_or("Model not fitted yet")?;

        if let Some(expected) = self.n_features {
            if x.n_cols() != expected {
                return Err(ReidentError::dimension_mismatch(
                    "features",
                    expected,
                    x.n_cols(),
                ));
            }
        }

        Ok(x.rows().map(|sample| tree.predict_one(sample)).collect())
    }
}

/// Random Forest classifier.
///
/// Trains `n_estimators` CART trees on bootstrap samples and predicts by
/// majority vote, lowest label on ties. Bootstrap draws come from the
/// forest's own generator: seeded with `random_state + tree_index` when a
/// random state is set, from OS entropy otherwise.
#[derive(Debug, Clone)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTreeClassifier>,
    n_estimators: usize,
    max_depth: Option<usize>,
    random_state: Option<u64>,
}

impl RandomForestClassifier {
    /// Creates a new Random Forest classifier.
    ///
    /// # Arguments
    ///
    /// * `n_estimators` - Number of trees in the forest
    #[must_use]
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            random_state: None,
        }
    }

    /// Sets the maximum depth for each tree.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets the random state for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Returns the number of trees.
    #[must_use]
    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }
}

impl Classifier for RandomForestClassifier {
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        let n_samples = x.n_rows();
        if n_samples != y.len() {
            return Err("Number of samples in X and y must match".into());
        }
        if n_samples == 0 {
            return Err("Cannot fit with zero samples".into());
        }
        if self.n_estimators == 0 {
            return Err(ReidentError::invalid_hyperparameter(
                "n_estimators",
                0,
                ">= 1",
            ));
        }

        self.trees = Vec::with_capacity(self.n_estimators);

        // Train each tree on a bootstrap sample
        for i in 0..self.n_estimators {
            let seed = self.random_state.map(|s| s.wrapping_add(i as u64));
            let indices = bootstrap_sample(n_samples, seed);

            let bootstrap_x = x.select_rows(&indices);
            let bootstrap_y: Vec<usize> = indices.iter().map(|&idx| y[idx]).collect();

            let mut tree = match self.max_depth {
                Some(depth) => DecisionTreeClassifier::new().with_max_depth(depth),
                None => DecisionTreeClassifier::new(),
            };
            tree.fit(&bootstrap_x, &bootstrap_y)?;
            self.trees.push(tree);
        }

        Ok(())
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        if self.trees.is_empty() {
            return Err("Model not fitted yet".into());
        }

        let per_tree: Vec<Vec<usize>> = self
            .trees
            .iter()
            .map(|tree| tree.predict(x))
            .collect::<Result<_>>()?;

        let mut predictions = Vec::with_capacity(x.n_rows());
        let mut votes = Vec::with_capacity(self.trees.len());
        for sample_idx in 0..x.n_rows() {
            votes.clear();
            votes.extend(per_tree.iter().map(|p| p[sample_idx]));
            predictions.push(majority_vote(&votes).ok_or("Forest produced no votes")?);
        }

        Ok(predictions)
    }
}

/// Draws `n_samples` row indices uniformly with replacement.
fn bootstrap_sample(n_samples: usize, random_state: Option<u64>) -> Vec<usize> {
    let mut rng = match random_state {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
}

/// Gini impurity `1 - Σ pᵢ²` of a label set; 0.0 for an empty set.
fn gini_impurity(labels: &[usize]) -> f32 {
    if labels.is_empty() {
        return 0.0;
    }

    let mut counts = std::collections::BTreeMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0_usize) += 1;
    }

    let n = labels.len() as f32;
    1.0 - counts
        .values()
        .map(|&c| {
            let p = c as f32 / n;
            p * p
        })
        .sum::<f32>()
}

/// Weighted Gini impurity of a two-way split.
fn gini_split(left_labels: &[usize], right_labels: &[usize]) -> f32 {
    let n_left = left_labels.len() as f32;
    let n_right = right_labels.len() as f32;
    let n_total = n_left + n_right;

    if n_total == 0.0 {
        return 0.0;
    }

    (n_left / n_total) * gini_impurity(left_labels)
        + (n_right / n_total) * gini_impurity(right_labels)
}

/// Sorted distinct values of one feature column.
fn sorted_unique_values(values: &[f32]) -> Vec<f32> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);
    sorted.dedup_by(|a, b| (*a - *b).abs() <= 1e-10);
    sorted
}

/// Best `(threshold, gain)` for one feature, trying midpoints between
/// consecutive distinct values. `None` if no split reduces impurity.
fn find_best_split_for_feature(values: &[f32], y: &[usize]) -> Option<(f32, f32)> {
    let unique = sorted_unique_values(values);
    if unique.len() < 2 {
        return None;
    }

    let current = gini_impurity(y);
    let mut best: Option<(f32, f32)> = None;

    for pair in unique.windows(2) {
        let threshold = (pair[0] + pair[1]) / 2.0;
        let (left, right): (Vec<(f32, usize)>, Vec<(f32, usize)>) = values
            .iter()
            .copied()
            .zip(y.iter().copied())
            .partition(|(v, _)| *v <= threshold);
        if left.is_empty() || right.is_empty() {
            continue;
        }
        let left: Vec<usize> = left.into_iter().map(|(_, l)| l).collect();
        let right: Vec<usize> = right.into_iter().map(|(_, l)| l).collect();

        let gain = current - gini_split(&left, &right);
        if gain > best.map_or(0.0, |(_, g)| g) {
            best = Some((threshold, gain));
        }
    }

    best
}

/// Best `(feature_idx, threshold)` across all features.
fn find_best_split(x: &Matrix<f32>, y: &[usize]) -> Option<(usize, f32)> {
    if x.n_rows() < 2 {
        return None;
    }

    let mut best: Option<(usize, f32, f32)> = None;
    for feature_idx in 0..x.n_cols() {
        let column = x.column(feature_idx);
        if let Some((threshold, gain)) = find_best_split_for_feature(&column, y) {
            if gain > best.map_or(0.0, |(_, _, g)| g) {
                best = Some((feature_idx, threshold, gain));
            }
        }
    }

    best.map(|(feature_idx, threshold, _)| (feature_idx, threshold))
}

fn make_leaf(y: &[usize]) -> TreeNode {
    TreeNode::Leaf(Leaf {
        class_label: majority_vote(y).unwrap_or(0),
        n_samples: y.len(),
    })
}

/// Builds a decision tree recursively.
fn build_tree(x: &Matrix<f32>, y: &[usize], depth: usize, max_depth: Option<usize>) -> TreeNode {
    let pure = y.windows(2).all(|w| w[0] == w[1]);
    if pure || max_depth.is_some_and(|max_d| depth >= max_d) {
        return make_leaf(y);
    }

    let Some((feature_idx, threshold)) = find_best_split(x, y) else {
        return make_leaf(y);
    };

    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) =
        (0..x.n_rows()).partition(|&row| x.get(row, feature_idx) <= threshold);
    if left_idx.is_empty() || right_idx.is_empty() {
        return make_leaf(y);
    }

    let left_y: Vec<usize> = left_idx.iter().map(|&i| y[i]).collect();
    let right_y: Vec<usize> = right_idx.iter().map(|&i| y[i]).collect();

    let left = build_tree(&x.select_rows(&left_idx), &left_y, depth + 1, max_depth);
    let right = build_tree(&x.select_rows(&right_idx), &right_y, depth + 1, max_depth);

    TreeNode::Node(Node {
        feature_idx,
        threshold,
        left: Box::new(left),
        right: Box::new(right),
    })
}


#[cfg(test)]
#[path = "tests_dt_contract.rs"]
mod tests_dt_contract;
