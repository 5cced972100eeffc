//! Control/production correlation diagnostics
//!
//! Pearson correlation with p-value filtering using the statrs crate. Only
//! correlations meeting the significance threshold (p < 0.05) are reported;
//! a non-monotonic response (the gas-lift curve) legitimately yields none.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Minimum samples for a meaningful correlation
pub const MIN_CORRELATION_SAMPLES: usize = 30;

/// Two-tailed significance threshold
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// A statistically significant control/production correlation
#[derive(Debug, Clone, Serialize)]
pub struct ControlCorrelation {
    /// Control column name
    pub control: String,
    /// Production column name
    pub target: String,
    /// Pearson correlation coefficient
    pub r_value: f64,
    /// r² (variance explained by a linear relation)
    pub r_squared: f64,
    /// Two-tailed p-value from the Student's t distribution
    pub p_value: f64,
    /// Number of paired samples
    pub sample_count: usize,
}

/// Pearson correlation between a control column and its production target,
/// returned only when statistically significant (p < 0.05).
pub fn control_correlation(
    x: &[f64],
    y: &[f64],
    control: &str,
    target: &str,
) -> Option<ControlCorrelation> {
    let n = x.len();
    if n < MIN_CORRELATION_SAMPLES || n != y.len() {
        return None;
    }

    let r = pearson(x, y);
    let p_value = p_value_for_r(r, n);

    if p_value >= SIGNIFICANCE_THRESHOLD {
        return None;
    }

    Some(ControlCorrelation {
        control: control.to_string(),
        target: target.to_string(),
        r_value: r,
        r_squared: r * r,
        p_value,
        sample_count: n,
    })
}

/// Pearson correlation coefficient
///
/// Formula: r = Σ[(xi − x̄)(yi − ȳ)] / sqrt(Σ(xi − x̄)² × Σ(yi − ȳ)²)
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y.iter()).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|a| a * a).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x.powi(2)) * (n * sum_y2 - sum_y.powi(2))).sqrt();

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Two-tailed p-value for a correlation coefficient
///
/// Formula: t = r × sqrt(n−2) / sqrt(1−r²), compared against the Student's
/// t distribution with n−2 degrees of freedom.
fn p_value_for_r(r: f64, n: usize) -> f64 {
    if n < 3 {
        return 1.0;
    }

    if r.abs() >= 0.9999 {
        return 0.0;
    }

    let df = (n - 2) as f64;
    let t_stat = r * df.sqrt() / (1.0 - r * r).sqrt();

    match StudentsT::new(0.0, 1.0, df) {
        Ok(t_dist) => 2.0 * (1.0 - t_dist.cdf(t_stat.abs())),
        Err(_) => 1.0,
    }
}
