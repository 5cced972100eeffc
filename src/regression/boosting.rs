//! Gradient boosting over shallow regression trees
//!
//! Least-squares boosting: start from the target mean, then repeatedly fit a
//! shallow tree to the current residuals and add a shrunken copy of its
//! predictions. Deterministic given the training data (no resampling).

use super::{validate_training_set, RegressionError, Regressor, RegressionTree, TreeParams};

/// Gradient boosting hyperparameters
#[derive(Debug, Clone, Copy)]
pub struct BoostingParams {
    /// Number of boosting rounds
    pub rounds: usize,
    /// Shrinkage applied to each tree's contribution
    pub learning_rate: f64,
    /// Growth limits shared by every tree
    pub tree: TreeParams,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            rounds: 150,
            learning_rate: 0.08,
            tree: TreeParams {
                max_depth: 3,
                min_samples_leaf: 10,
            },
        }
    }
}

/// Boosted-trees regressor
#[derive(Debug, Clone)]
pub struct GradientBoostingRegressor {
    params: BoostingParams,
    baseline: f64,
    trees: Vec<RegressionTree>,
}

impl GradientBoostingRegressor {
    /// Create an unfitted booster with the given hyperparameters
    pub fn new(params: BoostingParams) -> Self {
        Self {
            params,
            baseline: 0.0,
            trees: Vec::new(),
        }
    }

    /// Number of fitted boosting rounds
    pub fn round_count(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for GradientBoostingRegressor {
    fn fit(&mut self, x: &[f64], y: &[f64]) -> Result<(), RegressionError> {
        validate_training_set(x, y)?;

        self.baseline = y.iter().sum::<f64>() / y.len() as f64;
        let mut residuals: Vec<f64> = y.iter().map(|&v| v - self.baseline).collect();

        let mut trees = Vec::with_capacity(self.params.rounds);
        for _ in 0..self.params.rounds {
            let mut tree = RegressionTree::new(self.params.tree);
            tree.fit(x, &residuals)?;

            for (residual, &control) in residuals.iter_mut().zip(x.iter()) {
                *residual -= self.params.learning_rate * tree.predict(control);
            }
            trees.push(tree);
        }

        self.trees = trees;
        Ok(())
    }

    fn predict(&self, x: f64) -> f64 {
        let boosted: f64 = self.trees.iter().map(|tree| tree.predict(x)).sum();
        self.baseline + self.params.learning_rate * boosted
    }

    fn family(&self) -> &'static str {
        "gradient boosting"
    }
}
