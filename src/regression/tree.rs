//! CART regression tree over a single control variable
//!
//! Splits minimize the summed squared error of the two children, found with
//! running prefix sums over the samples sorted by control value. Nodes are
//! stored in a flat arena; the root is always index 0.

use std::cmp::Ordering;

use super::{validate_training_set, RegressionError};

/// Minimum SSE reduction for a split to be accepted over a leaf
const MIN_SPLIT_GAIN: f64 = 1e-12;

/// Tree growth limits
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    /// Maximum depth of the tree (root is depth 0)
    pub max_depth: usize,
    /// Minimum number of training samples in each leaf
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 10,
            min_samples_leaf: 5,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Single-feature regression tree
#[derive(Debug, Clone)]
pub struct RegressionTree {
    params: TreeParams,
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Create an unfitted tree with the given growth limits
    pub fn new(params: TreeParams) -> Self {
        Self {
            params,
            nodes: Vec::new(),
        }
    }

    /// Fit the tree on paired control/production observations
    pub fn fit(&mut self, x: &[f64], y: &[f64]) -> Result<(), RegressionError> {
        validate_training_set(x, y)?;

        let mut order: Vec<usize> = (0..x.len()).collect();
        order.sort_by(|&a, &b| x[a].partial_cmp(&x[b]).unwrap_or(Ordering::Equal));

        self.nodes.clear();
        self.build(x, y, &order, 0);
        Ok(())
    }

    /// Predict production for one control value
    ///
    /// Values below a node's threshold descend left, otherwise right. An
    /// unfitted tree predicts 0.0.
    pub fn predict(&self, x: f64) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(Node::Leaf { value }) => return *value,
                Some(Node::Split {
                    threshold,
                    left,
                    right,
                }) => {
                    index = if x < *threshold { *left } else { *right };
                }
                None => return 0.0,
            }
        }
    }

    /// Number of nodes in the fitted tree
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Grow the subtree for `order` (sample indices sorted by x), returning
    /// the arena index of its root. The slot is reserved before recursing so
    /// the overall root lands at index 0.
    fn build(&mut self, x: &[f64], y: &[f64], order: &[usize], depth: usize) -> usize {
        let n = order.len();
        let sum: f64 = order.iter().map(|&i| y[i]).sum();
        let mean = sum / n as f64;

        let index = self.nodes.len();
        self.nodes.push(Node::Leaf { value: mean });

        if depth >= self.params.max_depth || n < 2 * self.params.min_samples_leaf {
            return index;
        }

        if let Some((split_at, threshold)) = self.best_split(x, y, order, sum) {
            let left = self.build(x, y, &order[..split_at], depth + 1);
            let right = self.build(x, y, &order[split_at..], depth + 1);
            self.nodes[index] = Node::Split {
                threshold,
                left,
                right,
            };
        }

        index
    }

    /// Find the SSE-minimizing split position, if any valid one exists.
    ///
    /// Minimizing left SSE + right SSE is equivalent to maximizing
    /// S_l²/n_l + S_r²/n_r, which a single pass with a running left sum
    /// evaluates in O(n). Positions that would undercut `min_samples_leaf`
    /// or fall between equal control values are skipped.
    fn best_split(
        &self,
        x: &[f64],
        y: &[f64],
        order: &[usize],
        total_sum: f64,
    ) -> Option<(usize, f64)> {
        let n = order.len();
        let base_score = total_sum * total_sum / n as f64;

        let mut left_sum = 0.0;
        let mut best_gain = MIN_SPLIT_GAIN;
        let mut best: Option<(usize, f64)> = None;

        for position in 1..n {
            left_sum += y[order[position - 1]];

            if position < self.params.min_samples_leaf || n - position < self.params.min_samples_leaf
            {
                continue;
            }

            let x_left = x[order[position - 1]];
            let x_right = x[order[position]];
            if x_right <= x_left {
                // Equal control values cannot be separated by a threshold
                continue;
            }

            let right_sum = total_sum - left_sum;
            let score = left_sum * left_sum / position as f64
                + right_sum * right_sum / (n - position) as f64;
            let gain = score - base_score;

            if gain > best_gain {
                best_gain = gain;
                best = Some((position, 0.5 * (x_left + x_right)));
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_target_yields_single_leaf() {
        let x: Vec<f64> = (0..50).map(f64::from).collect();
        let y = vec![7.5; 50];

        let mut tree = RegressionTree::new(TreeParams::default());
        tree.fit(&x, &y).unwrap();

        assert_eq!(tree.node_count(), 1);
        assert!((tree.predict(25.0) - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_recovers_step_function() {
        // y jumps from 1 to 9 at x = 50; a depth-1 tree should find it.
        let x: Vec<f64> = (0..100).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|&v| if v < 50.0 { 1.0 } else { 9.0 }).collect();

        let mut tree = RegressionTree::new(TreeParams {
            max_depth: 1,
            min_samples_leaf: 5,
        });
        tree.fit(&x, &y).unwrap();

        assert!((tree.predict(10.0) - 1.0).abs() < 1e-9);
        assert!((tree.predict(90.0) - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_min_samples_leaf_respected() {
        // 8 samples with min leaf 5 cannot split at all.
        let x: Vec<f64> = (0..8).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|&v| v * 2.0).collect();

        let mut tree = RegressionTree::new(TreeParams {
            max_depth: 10,
            min_samples_leaf: 5,
        });
        tree.fit(&x, &y).unwrap();
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_identical_controls_never_split() {
        let x = vec![3.0; 40];
        let y: Vec<f64> = (0..40).map(f64::from).collect();

        let mut tree = RegressionTree::new(TreeParams::default());
        tree.fit(&x, &y).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert!((tree.predict(3.0) - 19.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_training_set_rejected() {
        let mut tree = RegressionTree::new(TreeParams::default());
        assert!(matches!(
            tree.fit(&[], &[]),
            Err(RegressionError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut tree = RegressionTree::new(TreeParams::default());
        assert!(matches!(
            tree.fit(&[1.0, 2.0], &[1.0]),
            Err(RegressionError::LengthMismatch { x: 2, y: 1 })
        ));
    }

    #[test]
    fn test_deep_tree_tracks_smooth_curve() {
        let x: Vec<f64> = (0..400).map(|i| f64::from(i) / 40.0).collect();
        let y: Vec<f64> = x.iter().map(|&v| (v * 0.8).sin() * 100.0).collect();

        let mut tree = RegressionTree::new(TreeParams {
            max_depth: 10,
            min_samples_leaf: 2,
        });
        tree.fit(&x, &y).unwrap();

        for &v in &[1.0f64, 3.0, 5.0, 7.0, 9.0] {
            let expected = (v * 0.8).sin() * 100.0;
            assert!(
                (tree.predict(v) - expected).abs() < 10.0,
                "prediction at {v} too far from {expected}"
            );
        }
    }
}
