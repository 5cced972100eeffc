//! Single-feature regression models for production curves
//!
//! The optimization procedure only needs the capability set
//! `{fit(x, y), predict(x)}`; any model implementing [`Regressor`] is
//! substitutable. Two tree-ensemble families are provided:
//!
//! - `RandomForestRegressor`: bootstrap-averaged regression trees, used for
//!   the gas-lift curve
//! - `GradientBoostingRegressor`: shrinkage boosting over shallow trees,
//!   used for the choke curve
//!
//! Both are built on the same CART [`RegressionTree`].

mod boosting;
mod forest;
mod tree;

pub use boosting::{BoostingParams, GradientBoostingRegressor};
pub use forest::{ForestParams, RandomForestRegressor};
pub use tree::{RegressionTree, TreeParams};

use thiserror::Error;

/// Errors produced while fitting a regression model
#[derive(Error, Debug)]
pub enum RegressionError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("control and target columns differ in length: {x} vs {y}")]
    LengthMismatch { x: usize, y: usize },

    #[error("training data contains a non-finite value")]
    NonFiniteTrainingValue,
}

/// Capability set required by the fit-and-scan procedure
pub trait Regressor {
    /// Fit the model on paired control/production observations
    fn fit(&mut self, x: &[f64], y: &[f64]) -> Result<(), RegressionError>;

    /// Predict production for a single control value
    ///
    /// Callers must fit the model first; an unfitted model predicts 0.0.
    fn predict(&self, x: f64) -> f64;

    /// Predict production for every value in a slice, preserving order
    fn predict_batch(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.predict(x)).collect()
    }

    /// Short human-readable family name for reporting
    fn family(&self) -> &'static str;
}

/// Shared input validation for `fit` implementations
pub(crate) fn validate_training_set(x: &[f64], y: &[f64]) -> Result<(), RegressionError> {
    if x.is_empty() {
        return Err(RegressionError::EmptyTrainingSet);
    }
    if x.len() != y.len() {
        return Err(RegressionError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(RegressionError::NonFiniteTrainingValue);
    }
    Ok(())
}
