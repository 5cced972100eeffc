//! LiftOpt - Gas-Lift & Choke Production Optimization
//!
//! Generates a synthetic well dataset, fits one regression model per control
//! variable, scans each candidate grid for the production-maximizing
//! operating point, and writes the results (console summary, JSON artifact,
//! side-by-side prediction-curve PNG).
//!
//! # Usage
//!
//! ```bash
//! # Run with built-in defaults (seed 42, 1000 records)
//! liftopt
//!
//! # Override generation parameters
//! liftopt --records 500 --seed 7 --noise-fraction 0.1
//!
//! # Dump the generated dataset alongside the results
//! liftopt --dump-csv well_data.csv
//! ```
//!
//! # Environment Variables
//!
//! - `LIFTOPT_CONFIG`: Path to a TOML config file
//! - `LIFTOPT_RECORDS`, `LIFTOPT_SEED`, `LIFTOPT_NOISE_FRACTION`,
//!   `LIFTOPT_HOLDOUT`, `LIFTOPT_GAS_GRID`, `LIFTOPT_CHOKE_GRID`:
//!   parameter overrides
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

use liftopt::config::RunConfig;
use liftopt::optimizer::{control_correlation, fit_and_scan, linspace, SplitConfig};
use liftopt::plot::{render_side_by_side, CurvePanel};
use liftopt::regression::{GradientBoostingRegressor, RandomForestRegressor, Regressor};
use liftopt::report::{write_dataset_csv, RunReport, VariableReport};
use liftopt::synthetic::generate;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "liftopt")]
#[command(about = "Gas-lift and choke production optimization")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML config file (overrides the default search order)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of synthetic records to generate
    #[arg(long, env = "LIFTOPT_RECORDS")]
    records: Option<usize>,

    /// Seed for data generation and the train/holdout split
    #[arg(long, env = "LIFTOPT_SEED")]
    seed: Option<u64>,

    /// Gaussian noise sigma as a fraction of the noise-free signal
    #[arg(long, env = "LIFTOPT_NOISE_FRACTION")]
    noise_fraction: Option<f64>,

    /// Fraction of records held out for fit scoring, in (0, 1)
    #[arg(long, env = "LIFTOPT_HOLDOUT")]
    holdout_fraction: Option<f64>,

    /// Candidate grid resolution for the gas-lift scan
    #[arg(long, env = "LIFTOPT_GAS_GRID")]
    gas_grid_points: Option<usize>,

    /// Candidate grid resolution for the choke scan
    #[arg(long, env = "LIFTOPT_CHOKE_GRID")]
    choke_grid_points: Option<usize>,

    /// Output path for the prediction-curve image
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Output path for the JSON results artifact
    #[arg(long)]
    results: Option<PathBuf>,

    /// Also dump the generated dataset as CSV to this path
    #[arg(long, value_name = "PATH")]
    dump_csv: Option<PathBuf>,

    /// Skip writing the prediction-curve image
    #[arg(long)]
    no_plot: bool,
}

impl CliArgs {
    /// Merge CLI/env overrides into the loaded configuration
    fn apply(&self, config: &mut RunConfig) {
        if let Some(records) = self.records {
            config.generator.records = records;
        }
        if let Some(seed) = self.seed {
            config.generator.seed = seed;
        }
        if let Some(noise) = self.noise_fraction {
            config.generator.noise_fraction = noise;
        }
        if let Some(holdout) = self.holdout_fraction {
            config.optimizer.holdout_fraction = holdout;
        }
        if let Some(points) = self.gas_grid_points {
            config.optimizer.gas_grid_points = points;
        }
        if let Some(points) = self.choke_grid_points {
            config.optimizer.choke_grid_points = points;
        }
        if let Some(plot) = &self.plot {
            config.output.plot_path = plot.display().to_string();
        }
        if let Some(results) = &self.results {
            config.output.results_path = results.display().to_string();
        }
        if let Some(csv) = &self.dump_csv {
            config.output.dataset_csv_path = Some(csv.display().to_string());
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => RunConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => RunConfig::load().context("loading configuration")?,
    };
    args.apply(&mut config);
    config.validate().context("validating configuration")?;

    let seed = config.generator.seed;
    info!(
        records = config.generator.records,
        seed, "generating synthetic well dataset"
    );
    let dataset = generate(&config.generator_config()).context("generating dataset")?;

    // The split stream is derived from the run seed so generation and
    // partitioning stay independent but jointly reproducible.
    let split = SplitConfig {
        holdout_fraction: config.optimizer.holdout_fraction,
        seed: seed.wrapping_add(1),
    };

    // Gas-lift: ensemble-of-trees averaging regressor over its grid
    let gas_rates = dataset.gas_rates();
    let gas_production = dataset.gas_lift_production();
    let gas_grid = linspace(
        config.generator.gas_rate_min,
        config.generator.gas_rate_max,
        config.optimizer.gas_grid_points,
    );
    let forest = RandomForestRegressor::new(config.forest_params());
    let gas_outcome = fit_and_scan(forest, &gas_rates, &gas_production, &split, &gas_grid)
        .context("gas-lift optimization")?;
    info!(
        r_squared = gas_outcome.r_squared,
        optimal_rate = gas_outcome.optimum.control,
        "gas-lift scan complete"
    );

    // Choke: boosted-trees regressor over its grid
    let choke_sizes = dataset.choke_sizes();
    let choke_production = dataset.choke_production();
    let choke_grid = linspace(
        config.generator.choke_min,
        config.generator.choke_max,
        config.optimizer.choke_grid_points,
    );
    let booster = GradientBoostingRegressor::new(config.boosting_params());
    let choke_outcome = fit_and_scan(booster, &choke_sizes, &choke_production, &split, &choke_grid)
        .context("choke optimization")?;
    info!(
        r_squared = choke_outcome.r_squared,
        optimal_size = choke_outcome.optimum.control,
        "choke scan complete"
    );

    let report = RunReport::new(
        seed,
        dataset.len(),
        VariableReport::new(
            "gas_injection_rate",
            "MMscf/day",
            gas_outcome.model.family(),
            gas_outcome.r_squared,
            &gas_outcome.optimum,
            gas_outcome.grid.len(),
            control_correlation(
                &gas_rates,
                &gas_production,
                "gas_injection_rate",
                "gas_lift_production",
            ),
        ),
        VariableReport::new(
            "choke_size",
            "1/64 in",
            choke_outcome.model.family(),
            choke_outcome.r_squared,
            &choke_outcome.optimum,
            choke_outcome.grid.len(),
            control_correlation(
                &choke_sizes,
                &choke_production,
                "choke_size",
                "choke_production",
            ),
        ),
    );

    report.print_summary();
    report
        .write_json(Path::new(&config.output.results_path))
        .context("writing results artifact")?;

    if let Some(csv_path) = &config.output.dataset_csv_path {
        write_dataset_csv(&dataset, Path::new(csv_path)).context("writing dataset CSV")?;
    }

    if !args.no_plot {
        let gas_panel = CurvePanel {
            title: "Gas Lift Optimization",
            x_label: "Gas Injection Rate (MMscf/day)",
            y_label: "Oil Production (bbl/day)",
            grid: &gas_outcome.grid,
            predictions: &gas_outcome.predictions,
            optimum: gas_outcome.optimum,
        };
        let choke_panel = CurvePanel {
            title: "Choke Optimization",
            x_label: "Choke Size (1/64 in)",
            y_label: "Flow Rate (bbl/day)",
            grid: &choke_outcome.grid,
            predictions: &choke_outcome.predictions,
            optimum: choke_outcome.optimum,
        };
        render_side_by_side(Path::new(&config.output.plot_path), &gas_panel, &choke_panel)
            .context("rendering prediction curves")?;
    }

    Ok(())
}
