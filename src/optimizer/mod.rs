//! Fit-and-Scan Optimizer
//!
//! For a single control variable: split the observations into train/holdout
//! subsets, fit a regression model on the training subset, score it on the
//! holdout (R²), then evaluate the fitted model over a dense candidate grid
//! and take the production-maximizing point.
//!
//! The procedure is invoked once per control variable with different model
//! families and grids; invocations share no mutable state. Tie-breaking on
//! the grid is first-occurrence: tree ensembles produce piecewise-constant
//! curves, so exact ties are routine rather than hypothetical.

pub mod correlations;

pub use correlations::{control_correlation, ControlCorrelation};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;
use tracing::debug;

use crate::regression::{RegressionError, Regressor};

/// Errors produced by the fit-and-scan procedure
#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("holdout fraction must lie in (0, 1), got {0}")]
    InvalidHoldoutFraction(f64),

    #[error("holdout fraction {fraction} leaves an empty train or holdout subset for {records} records")]
    UnusableSplit { fraction: f64, records: usize },

    #[error("candidate grid is empty")]
    EmptyGrid,

    #[error("candidate grid contains a non-finite value at index {0}")]
    NonFiniteGrid(usize),

    #[error("control and target columns differ in length: {x} vs {y}")]
    LengthMismatch { x: usize, y: usize },

    #[error("training subset has fewer than 2 distinct control values")]
    DegenerateFit,

    #[error(transparent)]
    Regression(#[from] RegressionError),
}

/// Train/holdout split policy
#[derive(Debug, Clone, Copy)]
pub struct SplitConfig {
    /// Fraction of records held out for scoring, in (0, 1)
    pub holdout_fraction: f64,
    /// Seed for the index-shuffle stream
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            holdout_fraction: 0.2,
            seed: 42,
        }
    }
}

/// Grid point with maximum predicted production
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimalPoint {
    /// Control value at the optimum
    pub control: f64,
    /// Predicted production at the optimum (bbl/day)
    pub production: f64,
    /// Index of the optimum within the candidate grid
    pub grid_index: usize,
}

/// Result of one fit-and-scan invocation
#[derive(Debug, Clone)]
pub struct OptimizationOutcome<M> {
    /// The fitted model handle
    pub model: M,
    /// Coefficient of determination on the holdout subset
    pub r_squared: f64,
    /// The candidate grid that was swept
    pub grid: Vec<f64>,
    /// Predicted production at each grid point, parallel to `grid`
    pub predictions: Vec<f64>,
    /// Production-maximizing grid point
    pub optimum: OptimalPoint,
}

/// Fit `model` on a seeded train/holdout split of `(x, y)`, then sweep the
/// candidate grid for the production-maximizing control value.
pub fn fit_and_scan<M: Regressor>(
    mut model: M,
    x: &[f64],
    y: &[f64],
    split: &SplitConfig,
    grid: &[f64],
) -> Result<OptimizationOutcome<M>, OptimizeError> {
    if !(split.holdout_fraction > 0.0 && split.holdout_fraction < 1.0) {
        return Err(OptimizeError::InvalidHoldoutFraction(split.holdout_fraction));
    }
    if grid.is_empty() {
        return Err(OptimizeError::EmptyGrid);
    }
    if let Some(bad) = grid.iter().position(|v| !v.is_finite()) {
        return Err(OptimizeError::NonFiniteGrid(bad));
    }
    if x.len() != y.len() {
        return Err(OptimizeError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }

    let (train_idx, holdout_idx) = split_indices(x.len(), split)?;

    let train_x: Vec<f64> = train_idx.iter().map(|&i| x[i]).collect();
    let train_y: Vec<f64> = train_idx.iter().map(|&i| y[i]).collect();
    if distinct_count(&train_x) < 2 {
        return Err(OptimizeError::DegenerateFit);
    }

    model.fit(&train_x, &train_y)?;

    let holdout_actual: Vec<f64> = holdout_idx.iter().map(|&i| y[i]).collect();
    let holdout_predicted: Vec<f64> = holdout_idx.iter().map(|&i| model.predict(x[i])).collect();
    let r_squared = r_squared(&holdout_actual, &holdout_predicted);

    let predictions = model.predict_batch(grid);
    let optimum = argmax_first(grid, &predictions);

    debug!(
        family = model.family(),
        r_squared,
        optimal_control = optimum.control,
        optimal_production = optimum.production,
        "fit-and-scan complete"
    );

    Ok(OptimizationOutcome {
        model,
        r_squared,
        grid: grid.to_vec(),
        predictions,
        optimum,
    })
}

/// Evenly spaced candidate grid spanning `[lo, hi]`, endpoints included
pub fn linspace(lo: f64, hi: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![lo],
        _ => (0..points)
            .map(|i| lo + (hi - lo) * i as f64 / (points - 1) as f64)
            .collect(),
    }
}

/// Coefficient of determination: 1 − SSR/SST
///
/// A constant holdout target (SST = 0) reports 1.0 for a perfect fit and
/// 0.0 otherwise, avoiding a NaN from the division.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let sst: f64 = actual.iter().map(|&a| (a - mean) * (a - mean)).sum();
    let ssr: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(&a, &p)| (a - p) * (a - p))
        .sum();

    if sst == 0.0 {
        return if ssr == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ssr / sst
}

/// Seeded shuffle of record indices, partitioned into (train, holdout)
fn split_indices(records: usize, split: &SplitConfig) -> Result<(Vec<usize>, Vec<usize>), OptimizeError> {
    let mut indices: Vec<usize> = (0..records).collect();
    let mut rng = StdRng::seed_from_u64(split.seed);
    indices.shuffle(&mut rng);

    let holdout_len = (records as f64 * split.holdout_fraction).round() as usize;
    if holdout_len == 0 || holdout_len >= records {
        return Err(OptimizeError::UnusableSplit {
            fraction: split.holdout_fraction,
            records,
        });
    }

    let holdout = indices.split_off(records - holdout_len);
    Ok((indices, holdout))
}

/// First-occurrence argmax over parallel (grid, predictions) sequences
///
/// Strictly-greater comparison keeps the earliest grid point of any tied
/// plateau, making the selection deterministic.
fn argmax_first(grid: &[f64], predictions: &[f64]) -> OptimalPoint {
    let mut best = 0;
    for (index, &value) in predictions.iter().enumerate() {
        if value > predictions[best] {
            best = index;
        }
    }
    OptimalPoint {
        control: grid[best],
        production: predictions[best],
        grid_index: best,
    }
}

/// Number of distinct values in a column (exact comparison)
fn distinct_count(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted.dedup();
    sorted.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regression::{BoostingParams, ForestParams, GradientBoostingRegressor, RandomForestRegressor};

    fn line_data(n: usize) -> (Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..n).map(|i| i as f64 / 10.0).collect();
        let y: Vec<f64> = x.iter().map(|&v| 3.0 * v + 5.0).collect();
        (x, y)
    }

    #[test]
    fn test_invalid_holdout_fraction_rejected() {
        let (x, y) = line_data(100);
        let grid = linspace(0.0, 10.0, 50);
        for fraction in [0.0, 1.0, -0.5, 1.5] {
            let split = SplitConfig {
                holdout_fraction: fraction,
                seed: 1,
            };
            let model = RandomForestRegressor::new(ForestParams::default());
            assert!(matches!(
                fit_and_scan(model, &x, &y, &split, &grid),
                Err(OptimizeError::InvalidHoldoutFraction(_))
            ));
        }
    }

    #[test]
    fn test_empty_grid_rejected() {
        let (x, y) = line_data(100);
        let model = RandomForestRegressor::new(ForestParams::default());
        assert!(matches!(
            fit_and_scan(model, &x, &y, &SplitConfig::default(), &[]),
            Err(OptimizeError::EmptyGrid)
        ));
    }

    #[test]
    fn test_non_finite_grid_rejected() {
        let (x, y) = line_data(100);
        let grid = [0.0, 1.0, f64::NAN, 3.0];
        let model = RandomForestRegressor::new(ForestParams::default());
        assert!(matches!(
            fit_and_scan(model, &x, &y, &SplitConfig::default(), &grid),
            Err(OptimizeError::NonFiniteGrid(2))
        ));
    }

    #[test]
    fn test_degenerate_training_subset_rejected() {
        // Every control value identical: no model can be fit.
        let x = vec![5.0; 100];
        let y: Vec<f64> = (0..100).map(|i| f64::from(i)).collect();
        let grid = linspace(0.0, 10.0, 20);
        let model = RandomForestRegressor::new(ForestParams::default());
        assert!(matches!(
            fit_and_scan(model, &x, &y, &SplitConfig::default(), &grid),
            Err(OptimizeError::DegenerateFit)
        ));
    }

    #[test]
    fn test_unusable_split_rejected_for_tiny_dataset() {
        let (x, y) = line_data(2);
        let grid = linspace(0.0, 1.0, 10);
        let split = SplitConfig {
            holdout_fraction: 0.01,
            seed: 1,
        };
        let model = GradientBoostingRegressor::new(BoostingParams::default());
        assert!(matches!(
            fit_and_scan(model, &x, &y, &split, &grid),
            Err(OptimizeError::UnusableSplit { .. })
        ));
    }

    #[test]
    fn test_predictions_parallel_to_grid_and_finite() {
        let (x, y) = line_data(200);
        let grid = linspace(0.0, 20.0, 150);
        let model = GradientBoostingRegressor::new(BoostingParams::default());
        let outcome = fit_and_scan(model, &x, &y, &SplitConfig::default(), &grid).unwrap();

        assert_eq!(outcome.predictions.len(), grid.len());
        assert!(outcome.predictions.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_optimum_dominates_grid() {
        let (x, y) = line_data(200);
        let grid = linspace(0.0, 20.0, 150);
        let model = RandomForestRegressor::new(ForestParams {
            trees: 40,
            seed: 5,
            ..ForestParams::default()
        });
        let outcome = fit_and_scan(model, &x, &y, &SplitConfig::default(), &grid).unwrap();

        for &p in &outcome.predictions {
            assert!(outcome.optimum.production >= p);
        }
        assert!(
            (outcome.predictions[outcome.optimum.grid_index] - outcome.optimum.production).abs()
                < 1e-12
        );
    }

    #[test]
    fn test_tie_break_takes_first_grid_point() {
        // A constant target makes every model output the same value over
        // the whole grid; the first grid point must win.
        let x: Vec<f64> = (0..100).map(f64::from).collect();
        let y = vec![10.0; 100];
        let grid = linspace(0.0, 99.0, 100);
        let model = GradientBoostingRegressor::new(BoostingParams::default());
        let outcome = fit_and_scan(model, &x, &y, &SplitConfig::default(), &grid).unwrap();

        assert_eq!(outcome.optimum.grid_index, 0);
        assert!((outcome.optimum.control - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_good_fit_scores_high_r_squared() {
        let (x, y) = line_data(400);
        let grid = linspace(0.0, 40.0, 100);
        let model = GradientBoostingRegressor::new(BoostingParams::default());
        let outcome = fit_and_scan(model, &x, &y, &SplitConfig::default(), &grid).unwrap();
        assert!(outcome.r_squared > 0.95, "R² too low: {}", outcome.r_squared);
    }

    #[test]
    fn test_r_squared_perfect_and_mean_fits() {
        let actual = [1.0, 2.0, 3.0, 4.0];
        assert!((r_squared(&actual, &actual) - 1.0).abs() < 1e-12);

        // Predicting the mean everywhere gives exactly 0.
        let mean = [2.5, 2.5, 2.5, 2.5];
        assert!(r_squared(&actual, &mean).abs() < 1e-12);
    }

    #[test]
    fn test_r_squared_constant_actual() {
        let actual = [3.0, 3.0, 3.0];
        assert!((r_squared(&actual, &[3.0, 3.0, 3.0]) - 1.0).abs() < 1e-12);
        assert!(r_squared(&actual, &[1.0, 2.0, 3.0]).abs() < 1e-12);
    }

    #[test]
    fn test_linspace_spans_endpoints() {
        let grid = linspace(0.0, 10.0, 101);
        assert_eq!(grid.len(), 101);
        assert!((grid[0] - 0.0).abs() < 1e-12);
        assert!((grid[100] - 10.0).abs() < 1e-12);
        assert!((grid[50] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_split_is_seeded_and_disjoint() {
        let split = SplitConfig {
            holdout_fraction: 0.2,
            seed: 9,
        };
        let (train_a, holdout_a) = split_indices(100, &split).unwrap();
        let (train_b, holdout_b) = split_indices(100, &split).unwrap();
        assert_eq!(train_a, train_b);
        assert_eq!(holdout_a, holdout_b);
        assert_eq!(train_a.len() + holdout_a.len(), 100);
        assert_eq!(holdout_a.len(), 20);

        let mut all: Vec<usize> = train_a.iter().chain(holdout_a.iter()).copied().collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 100);
    }
}
