//! Synthetic Well Data Generator
//!
//! Produces reproducible synthetic well observations for the optimization
//! pipeline. Control variables are sampled uniformly over their physical
//! domains; production follows the deterministic response curves in
//! [`crate::physics`] with Gaussian noise scaled to the noise-free signal.
//!
//! The generator is a pure function of its configuration: the same seed and
//! parameters yield a byte-identical dataset.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use thiserror::Error;
use tracing::debug;

use crate::physics;

/// Default record count
pub const DEFAULT_RECORDS: usize = 1000;

/// Default generation seed
pub const DEFAULT_SEED: u64 = 42;

/// Default noise scale as a fraction of the noise-free signal
pub const DEFAULT_NOISE_FRACTION: f64 = 0.05;

/// Physical gas injection domain (MMscf/day)
pub const DEFAULT_GAS_RATE_BOUNDS: (f64, f64) = (0.0, 10.0);

/// Physical choke size domain (1/64 in)
pub const DEFAULT_CHOKE_BOUNDS: (f64, f64) = (0.0, 64.0);

/// Errors produced by dataset generation
#[derive(Error, Debug)]
pub enum GeneratorError {
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
}

/// Generator configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of observation records to produce
    pub records: usize,
    /// Seed for the generation RNG stream
    pub seed: u64,
    /// Gas injection rate domain (MMscf/day), lower < upper
    pub gas_rate_bounds: (f64, f64),
    /// Choke size domain (1/64 in), lower < upper
    pub choke_bounds: (f64, f64),
    /// Gaussian noise sigma as a fraction of the noise-free production
    pub noise_fraction: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            records: DEFAULT_RECORDS,
            seed: DEFAULT_SEED,
            gas_rate_bounds: DEFAULT_GAS_RATE_BOUNDS,
            choke_bounds: DEFAULT_CHOKE_BOUNDS,
            noise_fraction: DEFAULT_NOISE_FRACTION,
        }
    }
}

impl GeneratorConfig {
    /// Validate the configuration against physical constraints
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.records == 0 {
            return Err(GeneratorError::InvalidRecordCount);
        }
        if self.gas_rate_bounds.0 >= self.gas_rate_bounds.1 {
            return Err(GeneratorError::InvertedBounds {
                name: "gas injection rate",
                lower: self.gas_rate_bounds.0,
                upper: self.gas_rate_bounds.1,
            });
        }
        if self.choke_bounds.0 >= self.choke_bounds.1 {
            return Err(GeneratorError::InvertedBounds {
                name: "choke size",
                lower: self.choke_bounds.0,
                upper: self.choke_bounds.1,
            });
        }
        if !self.noise_fraction.is_finite() || self.noise_fraction < 0.0 {
            return Err(GeneratorError::InvalidNoiseFraction(self.noise_fraction));
        }
        Ok(())
    }
}

/// One synthetic well observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WellSample {
    /// Gas injection rate (MMscf/day)
    pub gas_injection_rate: f64,
    /// Choke size (1/64 in)
    pub choke_size: f64,
    /// Oil production under the gas-lift regime (bbl/day)
    pub gas_lift_production: f64,
    /// Flow rate under the choke regime (bbl/day)
    pub choke_production: f64,
}

/// Immutable ordered collection of synthetic observations
#[derive(Debug, Clone, PartialEq)]
pub struct WellDataset {
    samples: Vec<WellSample>,
}

impl WellDataset {
    /// Number of observation records
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the dataset holds no records
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Read-only view of the records
    pub fn samples(&self) -> &[WellSample] {
        &self.samples
    }

    /// Gas injection rate column (MMscf/day)
    pub fn gas_rates(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.gas_injection_rate).collect()
    }

    /// Choke size column (1/64 in)
    pub fn choke_sizes(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.choke_size).collect()
    }

    /// Gas-lift regime production column (bbl/day)
    pub fn gas_lift_production(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.gas_lift_production).collect()
    }

    /// Choke regime production column (bbl/day)
    pub fn choke_production(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.choke_production).collect()
    }
}

/// Generate a synthetic dataset from the given configuration
///
/// Each record draws both control variables uniformly, evaluates the
/// noise-free response curves, and perturbs each production value with
/// independent Gaussian noise proportional to the clean signal:
///
/// production = clean × (1 + noise_fraction × n),  n ~ N(0, 1)
///
/// clamped at zero so noise never produces negative production.
pub fn generate(config: &GeneratorConfig) -> Result<WellDataset, GeneratorError> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let (gas_lo, gas_hi) = config.gas_rate_bounds;
    let (choke_lo, choke_hi) = config.choke_bounds;

    let mut samples = Vec::with_capacity(config.records);
    for _ in 0..config.records {
        let gas_injection_rate = rng.gen_range(gas_lo..gas_hi);
        let choke_size = rng.gen_range(choke_lo..choke_hi);

        let clean_gas = physics::gas_lift_response(gas_injection_rate);
        let clean_choke = physics::choke_response(choke_size);

        let gas_noise: f64 = rng.sample(StandardNormal);
        let choke_noise: f64 = rng.sample(StandardNormal);

        let gas_lift_production =
            (clean_gas * (1.0 + config.noise_fraction * gas_noise)).max(0.0);
        let choke_production =
            (clean_choke * (1.0 + config.noise_fraction * choke_noise)).max(0.0);

        samples.push(WellSample {
            gas_injection_rate,
            choke_size,
            gas_lift_production,
            choke_production,
        });
    }

    debug!(
        records = samples.len(),
        seed = config.seed,
        "synthetic dataset generated"
    );

    Ok(WellDataset { samples })
}
