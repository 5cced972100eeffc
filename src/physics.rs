//! Well-response physics models for production optimization
//!
//! Deterministic response curves used by the synthetic data generator:
//! - Gas-lift response: saturating lift gain with an over-injection penalty
//! - Choke response: flow saturating toward the fully-open position
//!
//! Both curves return bbl/day and are clamped to be non-negative.

// ============================================================================
// Gas-Lift Response
// ============================================================================

/// Natural (no-lift) production baseline (bbl/day)
pub const BASE_PRODUCTION_BBL: f64 = 200.0;

/// Maximum incremental production from gas lift (bbl/day)
pub const GAS_LIFT_GAIN_BBL: f64 = 600.0;

/// Gas-lift response time constant (MMscf/day)
pub const GAS_LIFT_TAU_MMSCF: f64 = 2.0;

/// Injection rate past which over-injection friction sets in (MMscf/day)
pub const OVER_INJECTION_THRESHOLD_MMSCF: f64 = 4.0;

/// Quadratic over-injection penalty coefficient ((bbl/day) / (MMscf/day)²)
pub const OVER_INJECTION_PENALTY: f64 = 18.0;

/// Noise-free oil production for a given gas injection rate
///
/// Lift gain follows diminishing returns: gain = A × (1 − e^(−g/τ)).
/// Past the over-injection threshold, excess gas increases bottomhole
/// friction and backpressure, modeled as a quadratic penalty:
///
/// q(g) = base + A × (1 − e^(−g/τ)) − B × max(0, g − g_thr)²
///
/// The curve rises from the natural baseline, peaks between the threshold
/// and full injection, and declines beyond it. Result is clamped at 0.
pub fn gas_lift_response(gas_rate: f64) -> f64 {
    let lift = GAS_LIFT_GAIN_BBL * (1.0 - (-gas_rate / GAS_LIFT_TAU_MMSCF).exp());
    let excess = (gas_rate - OVER_INJECTION_THRESHOLD_MMSCF).max(0.0);
    let production = BASE_PRODUCTION_BBL + lift - OVER_INJECTION_PENALTY * excess * excess;
    production.max(0.0)
}

// ============================================================================
// Choke Response
// ============================================================================

/// Production plateau with the choke fully open (bbl/day)
pub const CHOKE_PLATEAU_BBL: f64 = 950.0;

/// Choke saturation constant (1/64 in)
pub const CHOKE_SATURATION_64THS: f64 = 22.0;

/// Noise-free flow rate for a given choke size
///
/// q(c) = q_max × tanh(c / c_sat)
///
/// Flow rises steeply while the choke restricts the well, then plateaus as
/// the wellbore itself becomes the limiting restriction. Monotone
/// increasing over the physical domain; clamped at 0 for closed chokes.
pub fn choke_response(choke_size: f64) -> f64 {
    let production = CHOKE_PLATEAU_BBL * (choke_size / CHOKE_SATURATION_64THS).tanh();
    production.max(0.0)
}
