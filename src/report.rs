//! Run reporting: console summary, JSON artifact, CSV dataset dump

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::optimizer::{ControlCorrelation, OptimalPoint};
use crate::synthetic::WellDataset;

/// Errors raised while writing report artifacts
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Summary of one optimized control variable
#[derive(Debug, Clone, Serialize)]
pub struct VariableReport {
    /// Control column name
    pub control: String,
    /// Units of the control variable
    pub control_units: String,
    /// Model family used for the fit
    pub model: String,
    /// Coefficient of determination on the holdout subset
    pub r_squared: f64,
    /// Control value at the predicted-production maximum
    pub optimal_control: f64,
    /// Predicted production at the optimum (bbl/day)
    pub optimal_production: f64,
    /// Number of candidate grid points swept
    pub grid_points: usize,
    /// Linear correlation diagnostics, when statistically significant
    pub correlation: Option<ControlCorrelation>,
}

impl VariableReport {
    /// Assemble a variable summary from fit-and-scan outputs
    pub fn new(
        control: &str,
        control_units: &str,
        model: &str,
        r_squared: f64,
        optimum: &OptimalPoint,
        grid_points: usize,
        correlation: Option<ControlCorrelation>,
    ) -> Self {
        Self {
            control: control.to_string(),
            control_units: control_units.to_string(),
            model: model.to_string(),
            r_squared,
            optimal_control: optimum.control,
            optimal_production: optimum.production,
            grid_points,
            correlation,
        }
    }
}

/// Serializable summary of a full optimization run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// When the run completed (UTC)
    pub generated_at: DateTime<Utc>,
    /// Seed the run replays from
    pub seed: u64,
    /// Number of synthetic records generated
    pub records: usize,
    /// Gas-lift optimization summary
    pub gas_lift: VariableReport,
    /// Choke optimization summary
    pub choke: VariableReport,
}

impl RunReport {
    /// Assemble the run report, stamping the current time
    pub fn new(seed: u64, records: usize, gas_lift: VariableReport, choke: VariableReport) -> Self {
        Self {
            generated_at: Utc::now(),
            seed,
            records,
            gas_lift,
            choke,
        }
    }

    /// Print the human-readable results block to stdout
    pub fn print_summary(&self) {
        println!("{}", "=".repeat(64));
        println!("WELL PRODUCTION OPTIMIZATION RESULTS");
        println!("{}", "=".repeat(64));
        println!("Records: {}  Seed: {}", self.records, self.seed);
        println!();
        for report in [&self.gas_lift, &self.choke] {
            println!("{} ({}):", report.control, report.model);
            println!("  Fit R²: {:.4}", report.r_squared);
            println!(
                "  Optimum: {:.2} {} -> {:.1} bbl/day",
                report.optimal_control, report.control_units, report.optimal_production
            );
            match &report.correlation {
                Some(corr) => println!(
                    "  Linear correlation: r = {:.3} (p = {:.2e}, n = {})",
                    corr.r_value, corr.p_value, corr.sample_count
                ),
                None => println!("  Linear correlation: not significant (non-monotonic response)"),
            }
            println!();
        }
        println!("{}", "=".repeat(64));
    }

    /// Write the JSON results artifact
    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ReportError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!("results written to {}", path.display());
        Ok(())
    }
}

/// Dump the generated dataset as CSV (header plus one line per record)
pub fn write_dataset_csv(dataset: &WellDataset, path: &Path) -> Result<(), ReportError> {
    let wrap = |source| ReportError::Io {
        path: path.display().to_string(),
        source,
    };

    let mut file = std::fs::File::create(path).map_err(wrap)?;
    writeln!(
        file,
        "gas_injection_rate,choke_size,gas_lift_production,choke_production"
    )
    .map_err(wrap)?;
    for sample in dataset.samples() {
        writeln!(
            file,
            "{:.6},{:.6},{:.4},{:.4}",
            sample.gas_injection_rate,
            sample.choke_size,
            sample.gas_lift_production,
            sample.choke_production
        )
        .map_err(wrap)?;
    }
    info!(
        records = dataset.len(),
        "dataset written to {}",
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{generate, GeneratorConfig};

    fn sample_report() -> RunReport {
        let optimum = OptimalPoint {
            control: 4.6,
            production: 731.2,
            grid_index: 46,
        };
        let gas = VariableReport::new(
            "gas_injection_rate",
            "MMscf/day",
            "random forest",
            0.91,
            &optimum,
            100,
            None,
        );
        let choke_optimum = OptimalPoint {
            control: 56.2,
            production: 941.7,
            grid_index: 87,
        };
        let choke = VariableReport::new(
            "choke_size",
            "1/64 in",
            "gradient boosting",
            0.96,
            &choke_optimum,
            100,
            None,
        );
        RunReport::new(42, 500, gas, choke)
    }

    #[test]
    fn test_json_artifact_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        sample_report().write_json(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["seed"], 42);
        assert_eq!(parsed["records"], 500);
        assert_eq!(parsed["gas_lift"]["model"], "random forest");
        assert!(parsed["gas_lift"]["correlation"].is_null());
    }

    #[test]
    fn test_csv_dump_has_header_and_all_records() {
        let dataset = generate(&GeneratorConfig {
            records: 50,
            ..GeneratorConfig::default()
        })
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.csv");
        write_dataset_csv(&dataset, &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 51);
        assert_eq!(
            lines[0],
            "gas_injection_rate,choke_size,gas_lift_production,choke_production"
        );
        assert_eq!(lines[1].split(',').count(), 4);
    }
}
