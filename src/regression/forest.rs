//! Bootstrap-averaged ensemble of regression trees
//!
//! Each tree is grown on a bootstrap resample of the training data drawn
//! from a seeded RNG; predictions are the mean over all trees. Averaging
//! smooths the piecewise-constant tree outputs enough to follow the concave
//! gas-lift response.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{validate_training_set, RegressionError, Regressor, RegressionTree, TreeParams};

/// Random forest hyperparameters
#[derive(Debug, Clone, Copy)]
pub struct ForestParams {
    /// Number of bootstrap trees
    pub trees: usize,
    /// Growth limits shared by every tree
    pub tree: TreeParams,
    /// Seed for the bootstrap resampling stream
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            trees: 200,
            tree: TreeParams {
                max_depth: 10,
                min_samples_leaf: 5,
            },
            seed: 0,
        }
    }
}

/// Ensemble-of-trees averaging regressor
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    params: ForestParams,
    trees: Vec<RegressionTree>,
}

impl RandomForestRegressor {
    /// Create an unfitted forest with the given hyperparameters
    pub fn new(params: ForestParams) -> Self {
        Self {
            params,
            trees: Vec::new(),
        }
    }

    /// Number of fitted trees
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for RandomForestRegressor {
    fn fit(&mut self, x: &[f64], y: &[f64]) -> Result<(), RegressionError> {
        validate_training_set(x, y)?;

        let n = x.len();
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        let mut trees = Vec::with_capacity(self.params.trees);

        let mut boot_x = vec![0.0; n];
        let mut boot_y = vec![0.0; n];
        for _ in 0..self.params.trees {
            for slot in 0..n {
                let pick = rng.gen_range(0..n);
                boot_x[slot] = x[pick];
                boot_y[slot] = y[pick];
            }
            let mut tree = RegressionTree::new(self.params.tree);
            tree.fit(&boot_x, &boot_y)?;
            trees.push(tree);
        }

        self.trees = trees;
        Ok(())
    }

    fn predict(&self, x: f64) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.trees.iter().map(|tree| tree.predict(x)).sum();
        sum / self.trees.len() as f64
    }

    fn family(&self) -> &'static str {
        "random forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quadratic_data() -> (Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..300).map(|i| f64::from(i) / 30.0).collect();
        let y: Vec<f64> = x.iter().map(|&v| 400.0 - (v - 5.0) * (v - 5.0) * 12.0).collect();
        (x, y)
    }

    #[test]
    fn test_fits_concave_curve() {
        let (x, y) = quadratic_data();
        let mut forest = RandomForestRegressor::new(ForestParams {
            seed: 7,
            ..ForestParams::default()
        });
        forest.fit(&x, &y).unwrap();

        // Peak of the clean curve is at x = 5.
        let peak = forest.predict(5.0);
        assert!(peak > forest.predict(0.5));
        assert!(peak > forest.predict(9.5));
        assert!((peak - 400.0).abs() < 30.0, "peak prediction {peak} off");
    }

    #[test]
    fn test_seeded_fit_is_deterministic() {
        let (x, y) = quadratic_data();
        let params = ForestParams {
            trees: 50,
            seed: 11,
            ..ForestParams::default()
        };

        let mut first = RandomForestRegressor::new(params);
        first.fit(&x, &y).unwrap();
        let mut second = RandomForestRegressor::new(params);
        second.fit(&x, &y).unwrap();

        for i in 0..=20 {
            let probe = f64::from(i) / 2.0;
            assert!((first.predict(probe) - second.predict(probe)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_unfitted_forest_predicts_zero() {
        let forest = RandomForestRegressor::new(ForestParams::default());
        assert_eq!(forest.tree_count(), 0);
        assert!((forest.predict(3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_empty_training_set_rejected() {
        let mut forest = RandomForestRegressor::new(ForestParams::default());
        assert!(matches!(
            forest.fit(&[], &[]),
            Err(RegressionError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn test_predict_batch_preserves_order_and_length() {
        let (x, y) = quadratic_data();
        let mut forest = RandomForestRegressor::new(ForestParams {
            trees: 20,
            seed: 3,
            ..ForestParams::default()
        });
        forest.fit(&x, &y).unwrap();

        let grid = [0.0, 2.5, 5.0, 7.5, 10.0];
        let predictions = forest.predict_batch(&grid);
        assert_eq!(predictions.len(), grid.len());
        for (i, &g) in grid.iter().enumerate() {
            assert!((predictions[i] - forest.predict(g)).abs() < 1e-12);
        }
    }
}
