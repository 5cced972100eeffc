//! LiftOpt: Gas-Lift & Choke Production Optimization
//!
//! Generates synthetic petroleum-well observations from parametric response
//! curves, fits a regression model per control variable, and brute-force
//! scans a dense candidate grid for the production-maximizing operating
//! point.
//!
//! ## Architecture
//!
//! - **Physics**: deterministic gas-lift and choke response curves
//! - **Synthetic**: seeded observation generator (uniform controls, scaled
//!   Gaussian noise, non-negative clamp)
//! - **Regression**: `{fit, predict}` trait with random-forest and
//!   gradient-boosting implementations over a shared CART tree
//! - **Optimizer**: train/holdout split, R² scoring, grid sweep with
//!   first-occurrence argmax, correlation diagnostics
//! - **Report / Plot**: console summary, JSON artifact, side-by-side PNG

pub mod config;
pub mod optimizer;
pub mod physics;
pub mod plot;
pub mod regression;
pub mod report;
pub mod synthetic;

// Re-export configuration
pub use config::{ConfigError, RunConfig};

// Re-export commonly used types
pub use optimizer::{
    control_correlation, fit_and_scan, linspace, ControlCorrelation, OptimalPoint,
    OptimizationOutcome, OptimizeError, SplitConfig,
};
pub use regression::{
    BoostingParams, ForestParams, GradientBoostingRegressor, RandomForestRegressor,
    RegressionError, Regressor,
};
pub use report::{RunReport, VariableReport};
pub use synthetic::{generate, GeneratorConfig, GeneratorError, WellDataset, WellSample};
