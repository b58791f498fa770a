//! CART (Classification and Regression Tree) builder
//!
//! Implements deterministic exact-greedy regression tree construction.
//! Splits maximise the reduction in squared error; candidate thresholds
//! are midpoints between consecutive distinct feature values.

use housepk_core::forest::{Node, Tree};

use crate::dataset::Matrix;
use crate::deterministic::SplitTieBreaker;

/// Training parameters for a single tree
#[derive(Clone, Debug)]
pub struct TreeConfig {
    /// `None` means unlimited depth
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

/// Split candidate with its score and tie-breaker
#[derive(Debug, Clone)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    /// `sum_l^2 / n_l + sum_r^2 / n_r`; larger means lower squared error
    score: f64,
    tie_breaker: SplitTieBreaker,
}

impl SplitCandidate {
    fn beats(&self, other: &SplitCandidate) -> bool {
        self.score > other.score
            || (self.score == other.score && self.tie_breaker < other.tie_breaker)
    }
}

/// Build a regression tree using exact-greedy CART
pub struct CartBuilder<'a> {
    features: &'a Matrix,
    targets: &'a [f64],
    config: TreeConfig,
}

impl<'a> CartBuilder<'a> {
    pub fn new(features: &'a Matrix, targets: &'a [f64], config: TreeConfig) -> Self {
        debug_assert_eq!(features.rows(), targets.len());
        Self {
            features,
            targets,
            config,
        }
    }

    /// Build a tree over the given sample indices (duplicates allowed)
    pub fn build(&self, indices: &[usize]) -> Tree {
        let mut nodes = Vec::new();
        if indices.is_empty() {
            nodes.push(Node::leaf(0, 0.0));
        } else {
            self.build_node(indices, 0, &mut nodes);
        }
        Tree::new(nodes)
    }

    /// Recursively build tree nodes; returns the index of the new node
    fn build_node(&self, indices: &[usize], depth: usize, nodes: &mut Vec<Node>) -> i32 {
        let current_idx = nodes.len() as i32;
        let leaf_value = self.mean_target(indices);

        // Check stopping conditions
        let depth_reached = self.config.max_depth.is_some_and(|max| depth >= max);
        if depth_reached || indices.len() < self.config.min_samples_split || self.is_pure(indices)
        {
            nodes.push(Node::leaf(current_idx, leaf_value));
            return current_idx;
        }

        let Some(split) = self.find_best_split(indices) else {
            nodes.push(Node::leaf(current_idx, leaf_value));
            return current_idx;
        };

        let (left_indices, right_indices) =
            self.split_samples(indices, split.feature_idx, split.threshold);

        // Reserve space for current node; children always land after it
        nodes.push(Node::internal(
            current_idx,
            split.feature_idx as i32,
            split.threshold,
            -1,
            -1,
        ));

        let left_idx = self.build_node(&left_indices, depth + 1, nodes);
        let right_idx = self.build_node(&right_indices, depth + 1, nodes);

        let node = &mut nodes[current_idx as usize];
        node.left = left_idx;
        node.right = right_idx;

        current_idx
    }

    /// Find the best split across all features
    fn find_best_split(&self, indices: &[usize]) -> Option<SplitCandidate> {
        let (total, n) = self.sum_targets(indices);
        let parent_score = total * total / n as f64;

        let mut best: Option<SplitCandidate> = None;
        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(indices.len());

        for feature_idx in 0..self.features.cols() {
            pairs.clear();
            pairs.extend(
                indices
                    .iter()
                    .map(|&i| (self.features.get(i, feature_idx), self.targets[i])),
            );
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            let mut rank = 0usize;
            for pos in 1..pairs.len() {
                left_sum += pairs[pos - 1].1;

                let (lo, hi) = (pairs[pos - 1].0, pairs[pos].0);
                if lo >= hi {
                    continue;
                }

                let n_left = pos as f64;
                let n_right = (pairs.len() - pos) as f64;
                let right_sum = total - left_sum;
                let score = left_sum * left_sum / n_left + right_sum * right_sum / n_right;

                let candidate = SplitCandidate {
                    feature_idx,
                    threshold: midpoint(lo, hi),
                    score,
                    tie_breaker: SplitTieBreaker::new(feature_idx, rank),
                };
                rank += 1;

                if best.as_ref().map_or(true, |current| candidate.beats(current)) {
                    best = Some(candidate);
                }
            }
        }

        best.filter(|split| split.score.is_finite() && split.score > parent_score)
    }

    /// Split samples based on threshold
    fn split_samples(
        &self,
        indices: &[usize],
        feature_idx: usize,
        threshold: f64,
    ) -> (Vec<usize>, Vec<usize>) {
        indices
            .iter()
            .copied()
            .partition(|&idx| self.features.get(idx, feature_idx) <= threshold)
    }

    fn sum_targets(&self, indices: &[usize]) -> (f64, usize) {
        let sum = indices.iter().map(|&i| self.targets[i]).sum();
        (sum, indices.len())
    }

    fn mean_target(&self, indices: &[usize]) -> f64 {
        let (sum, n) = self.sum_targets(indices);
        if n == 0 {
            0.0
        } else {
            sum / n as f64
        }
    }

    fn is_pure(&self, indices: &[usize]) -> bool {
        let first = self.targets[indices[0]];
        indices.iter().all(|&i| self.targets[i] == first)
    }
}

/// Threshold between two distinct sorted values such that `lo <= t < hi`
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo + (hi - lo) / 2.0;
    if mid >= hi || !mid.is_finite() {
        lo
    } else {
        mid
    }
}
