//! Run Configuration - generation and optimization parameters as TOML values
//!
//! Every tunable the tool exposes is a field here, with `Default` impls
//! matching the built-in constants so behavior is unchanged when no config
//! file is present. Load order:
//!
//! 1. `$LIFTOPT_CONFIG` env var
//! 2. `./liftopt.toml`
//! 3. Built-in defaults
//!
//! CLI/env overrides are merged on top by the binary. `validate()` enforces
//! the hard physical constraints; legal-but-suspicious values only warn.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::regression::{BoostingParams, ForestParams, TreeParams};
use crate::synthetic::GeneratorConfig;

/// Environment variable naming a config file to load
pub const CONFIG_ENV_VAR: &str = "LIFTOPT_CONFIG";

/// Config file searched in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "liftopt.toml";

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("record count must be positive")]
    InvalidRecordCount,

    #[error("{name} bounds are inverted: lower {lower} >= upper {upper}")]
    InvertedBounds {
        name: &'static str,
        lower: f64,
        upper: f64,
    },

    #[error("noise fraction must be finite and non-negative, got {0}")]
    InvalidNoiseFraction(f64),

    #[error("holdout fraction must lie in (0, 1), got {0}")]
    InvalidHoldoutFraction(f64),

    #[error("{name} candidate grid needs at least 2 points, got {points}")]
    GridTooSmall { name: &'static str, points: usize },

    #[error("{0}")]
    InvalidModelParams(String),
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for one optimization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Synthetic data generation parameters
    #[serde(default)]
    pub generator: GeneratorSettings,

    /// Split, grid, and model parameters
    #[serde(default)]
    pub optimizer: OptimizerSettings,

    /// Output artifact paths
    #[serde(default)]
    pub output: OutputSettings,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorSettings::default(),
            optimizer: OptimizerSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

/// Synthetic data generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Number of observation records to generate
    pub records: usize,
    /// Seed for the generation RNG stream; the split stream derives from it
    pub seed: u64,
    /// Gaussian noise sigma as a fraction of the noise-free signal
    pub noise_fraction: f64,
    /// Gas injection domain lower bound (MMscf/day)
    pub gas_rate_min: f64,
    /// Gas injection domain upper bound (MMscf/day)
    pub gas_rate_max: f64,
    /// Choke size domain lower bound (1/64 in)
    pub choke_min: f64,
    /// Choke size domain upper bound (1/64 in)
    pub choke_max: f64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            records: 1000,
            seed: 42,
            noise_fraction: 0.05,
            gas_rate_min: 0.0,
            gas_rate_max: 10.0,
            choke_min: 0.0,
            choke_max: 64.0,
        }
    }
}

/// Split, grid, and model parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSettings {
    /// Fraction of records held out for R² scoring, in (0, 1)
    pub holdout_fraction: f64,
    /// Candidate grid resolution for the gas-lift scan
    pub gas_grid_points: usize,
    /// Candidate grid resolution for the choke scan
    pub choke_grid_points: usize,
    /// Random forest: number of bootstrap trees
    pub forest_trees: usize,
    /// Random forest: maximum tree depth
    pub forest_max_depth: usize,
    /// Random forest: minimum samples per leaf
    pub forest_min_samples_leaf: usize,
    /// Gradient boosting: number of rounds
    pub boosting_rounds: usize,
    /// Gradient boosting: shrinkage per round, in (0, 1]
    pub boosting_learning_rate: f64,
    /// Gradient boosting: maximum tree depth
    pub boosting_max_depth: usize,
    /// Gradient boosting: minimum samples per leaf
    pub boosting_min_samples_leaf: usize,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            holdout_fraction: 0.2,
            gas_grid_points: 100,
            choke_grid_points: 100,
            forest_trees: 200,
            forest_max_depth: 10,
            forest_min_samples_leaf: 5,
            boosting_rounds: 150,
            boosting_learning_rate: 0.08,
            boosting_max_depth: 3,
            boosting_min_samples_leaf: 10,
        }
    }
}

/// Output artifact paths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Side-by-side prediction-curve image
    pub plot_path: String,
    /// JSON results artifact
    pub results_path: String,
    /// Optional CSV dump of the generated dataset
    pub dataset_csv_path: Option<String>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            plot_path: "well_optimization.png".to_string(),
            results_path: "optimization_results.json".to_string(),
            dataset_csv_path: None,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl RunConfig {
    /// Load configuration using the standard search order
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            info!("loading config from ${CONFIG_ENV_VAR}: {path}");
            return Self::from_path(Path::new(&path));
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            info!("loading config from ./{DEFAULT_CONFIG_FILE}");
            return Self::from_path(local);
        }

        info!("no config file found, using built-in defaults");
        Ok(Self::default())
    }

    /// Load configuration from an explicit TOML file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Validate the configuration against physical and statistical limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.generator;
        if g.records == 0 {
            return Err(ConfigError::InvalidRecordCount);
        }
        if g.gas_rate_min >= g.gas_rate_max {
            return Err(ConfigError::InvertedBounds {
                name: "gas injection rate",
                lower: g.gas_rate_min,
                upper: g.gas_rate_max,
            });
        }
        if g.choke_min >= g.choke_max {
            return Err(ConfigError::InvertedBounds {
                name: "choke size",
                lower: g.choke_min,
                upper: g.choke_max,
            });
        }
        if !g.noise_fraction.is_finite() || g.noise_fraction < 0.0 {
            return Err(ConfigError::InvalidNoiseFraction(g.noise_fraction));
        }

        let o = &self.optimizer;
        if !(o.holdout_fraction > 0.0 && o.holdout_fraction < 1.0) {
            return Err(ConfigError::InvalidHoldoutFraction(o.holdout_fraction));
        }
        if o.gas_grid_points < 2 {
            return Err(ConfigError::GridTooSmall {
                name: "gas-lift",
                points: o.gas_grid_points,
            });
        }
        if o.choke_grid_points < 2 {
            return Err(ConfigError::GridTooSmall {
                name: "choke",
                points: o.choke_grid_points,
            });
        }
        if o.forest_trees == 0 {
            return Err(ConfigError::InvalidModelParams(
                "forest_trees must be positive".to_string(),
            ));
        }
        if o.boosting_rounds == 0 {
            return Err(ConfigError::InvalidModelParams(
                "boosting_rounds must be positive".to_string(),
            ));
        }
        if !(o.boosting_learning_rate > 0.0 && o.boosting_learning_rate <= 1.0) {
            return Err(ConfigError::InvalidModelParams(format!(
                "boosting_learning_rate must lie in (0, 1], got {}",
                o.boosting_learning_rate
            )));
        }
        if o.forest_min_samples_leaf == 0 || o.boosting_min_samples_leaf == 0 {
            return Err(ConfigError::InvalidModelParams(
                "min samples per leaf must be positive".to_string(),
            ));
        }

        // Legal but suspicious values only warn.
        if g.noise_fraction > 0.5 {
            warn!(
                noise_fraction = g.noise_fraction,
                "noise above 50% of signal will swamp the response curves"
            );
        }
        if g.records < 100 {
            warn!(
                records = g.records,
                "fewer than 100 records gives unstable fit scores"
            );
        }

        Ok(())
    }

    /// Generator configuration derived from these settings
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            records: self.generator.records,
            seed: self.generator.seed,
            gas_rate_bounds: (self.generator.gas_rate_min, self.generator.gas_rate_max),
            choke_bounds: (self.generator.choke_min, self.generator.choke_max),
            noise_fraction: self.generator.noise_fraction,
        }
    }

    /// Forest hyperparameters for the gas-lift fit; the bootstrap stream is
    /// derived from the run seed so the whole run replays from one number.
    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            trees: self.optimizer.forest_trees,
            tree: TreeParams {
                max_depth: self.optimizer.forest_max_depth,
                min_samples_leaf: self.optimizer.forest_min_samples_leaf,
            },
            seed: self.generator.seed.wrapping_add(2),
        }
    }

    /// Boosting hyperparameters for the choke fit
    pub fn boosting_params(&self) -> BoostingParams {
        BoostingParams {
            rounds: self.optimizer.boosting_rounds,
            learning_rate: self.optimizer.boosting_learning_rate,
            tree: TreeParams {
                max_depth: self.optimizer.boosting_max_depth,
                min_samples_leaf: self.optimizer.boosting_min_samples_leaf,
            },
        }
    }
}
