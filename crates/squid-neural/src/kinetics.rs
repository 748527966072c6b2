// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Gating Kinetics
//!
//! Voltage-dependent opening (α) and closing (β) rates for the three HH gates,
//! in the modern convention where rest sits near -65 mV.
//!
//! ```text
//! α_n = 0.01 (V+55) / (1 − exp(−(V+55)/10))     β_n = 0.125 exp(−(V+65)/80)
//! α_m = 0.1  (V+40) / (1 − exp(−(V+40)/10))     β_m = 4 exp(−(V+65)/18)
//! α_h = 0.07 exp(−(V+65)/20)                    β_h = 1 / (1 + exp(−(V+35)/10))
//!
//! τ_x(V) = 1 / (α_x(V) + β_x(V))
//! x∞(V)  = α_x(V) · τ_x(V)
//! ```
//!
//! ## Singular voltages
//!
//! α_n at -55 mV and α_m at -40 mV are 0/0 when evaluated literally. The free
//! functions below evaluate the raw formula and return NaN at exactly those
//! voltages. [`Kinetics`] lets a caller opt into the analytic limit instead.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Voltage at which α_n has a removable singularity (mV)
pub const N_SINGULAR_VOLTAGE: f64 = -55.0;

/// Voltage at which α_m has a removable singularity (mV)
pub const M_SINGULAR_VOLTAGE: f64 = -40.0;

/// One of the three HH gating variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GatingVariable {
    /// Potassium activation
    N,
    /// Sodium activation
    M,
    /// Sodium inactivation
    H,
}

impl GatingVariable {
    /// All gates in (n, m, h) order
    pub const ALL: [GatingVariable; 3] = [GatingVariable::N, GatingVariable::M, GatingVariable::H];

    pub fn name(&self) -> &'static str {
        match self {
            GatingVariable::N => "n",
            GatingVariable::M => "m",
            GatingVariable::H => "h",
        }
    }
}

/// How α_n and α_m are evaluated at their singular voltages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SingularityPolicy {
    /// Evaluate the literal formula; NaN at the singular voltage propagates
    #[default]
    Propagate,
    /// Replace the 0/0 with its L'Hôpital limit
    AnalyticLimit,
}

/// `x / (1 - e^-x)`, with the limit 1 at x = 0
#[inline(always)]
fn vtrap(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        // exp_m1 keeps the denominator accurate close to the singular point
        x / -(-x).exp_m1()
    }
}

/// Potassium activation opening rate (1/ms)
#[inline]
pub fn alpha_n(v: f64) -> f64 {
    0.01 * (v + 55.0) / (1.0 - (-(v + 55.0) / 10.0).exp())
}

/// Potassium activation closing rate (1/ms)
#[inline]
pub fn beta_n(v: f64) -> f64 {
    0.125 * (-(v + 65.0) / 80.0).exp()
}

/// Sodium activation opening rate (1/ms)
#[inline]
pub fn alpha_m(v: f64) -> f64 {
    0.1 * (v + 40.0) / (1.0 - (-(v + 40.0) / 10.0).exp())
}

/// Sodium activation closing rate (1/ms)
#[inline]
pub fn beta_m(v: f64) -> f64 {
    4.0 * (-(v + 65.0) / 18.0).exp()
}

/// Sodium inactivation rate (1/ms)
#[inline]
pub fn alpha_h(v: f64) -> f64 {
    0.07 * (-(v + 65.0) / 20.0).exp()
}

/// Sodium de-inactivation rate (1/ms)
#[inline]
pub fn beta_h(v: f64) -> f64 {
    1.0 / (1.0 + (-(v + 35.0) / 10.0).exp())
}

/// Evaluated kinetics of one gate at one voltage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateRates {
    pub alpha: f64,
    pub beta: f64,
}

impl GateRates {
    /// Time constant τ = 1 / (α + β), in ms
    #[inline]
    pub fn tau(&self) -> f64 {
        1.0 / (self.alpha + self.beta)
    }

    /// Steady-state value x∞ = α · τ
    #[inline]
    pub fn steady_state(&self) -> f64 {
        self.alpha * self.tau()
    }
}

/// Rate-function evaluator carrying a [`SingularityPolicy`]
///
/// Zero-sized apart from the policy, so it is passed around by value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Kinetics {
    pub policy: SingularityPolicy,
}

impl Kinetics {
    /// Kinetics that evaluate the literal formulas
    pub const fn new() -> Self {
        Self {
            policy: SingularityPolicy::Propagate,
        }
    }

    pub const fn with_policy(policy: SingularityPolicy) -> Self {
        Self { policy }
    }

    /// Opening rate α(V) for `gate`
    #[inline]
    pub fn alpha(&self, gate: GatingVariable, v: f64) -> f64 {
        match gate {
            // 0.01 (V+55) / (1 - e^-(V+55)/10) = 0.1 · vtrap((V+55)/10)
            GatingVariable::N => match self.policy {
                SingularityPolicy::Propagate => alpha_n(v),
                SingularityPolicy::AnalyticLimit => 0.1 * vtrap((v + 55.0) / 10.0),
            },
            GatingVariable::M => match self.policy {
                SingularityPolicy::Propagate => alpha_m(v),
                SingularityPolicy::AnalyticLimit => vtrap((v + 40.0) / 10.0),
            },
            GatingVariable::H => alpha_h(v),
        }
    }

    /// Closing rate β(V) for `gate`
    #[inline]
    pub fn beta(&self, gate: GatingVariable, v: f64) -> f64 {
        match gate {
            GatingVariable::N => beta_n(v),
            GatingVariable::M => beta_m(v),
            GatingVariable::H => beta_h(v),
        }
    }

    #[inline]
    pub fn rates(&self, gate: GatingVariable, v: f64) -> GateRates {
        GateRates {
            alpha: self.alpha(gate, v),
            beta: self.beta(gate, v),
        }
    }

    /// Time constant τ(V) in ms
    #[inline]
    pub fn tau(&self, gate: GatingVariable, v: f64) -> f64 {
        self.rates(gate, v).tau()
    }

    /// Steady-state fraction x∞(V)
    #[inline]
    pub fn steady_state(&self, gate: GatingVariable, v: f64) -> f64 {
        self.rates(gate, v).steady_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: Kinetics = Kinetics::new();
    const LIMIT: Kinetics = Kinetics::with_policy(SingularityPolicy::AnalyticLimit);

    #[test]
    fn test_resting_steady_states() {
        // Known HH values at -65 mV
        let n = RAW.steady_state(GatingVariable::N, -65.0);
        let m = RAW.steady_state(GatingVariable::M, -65.0);
        let h = RAW.steady_state(GatingVariable::H, -65.0);
        assert!((n - 0.3177).abs() < 1e-3, "n∞ = {}", n);
        assert!((m - 0.0529).abs() < 1e-3, "m∞ = {}", m);
        assert!((h - 0.5961).abs() < 1e-3, "h∞ = {}", h);
    }

    #[test]
    fn test_rates_positive_over_physiological_range() {
        let mut v = -100.0;
        while v <= 60.0 {
            for gate in GatingVariable::ALL {
                // Step of 0.37 never lands on a singular voltage
                let rates = RAW.rates(gate, v);
                assert!(rates.alpha > 0.0, "α_{} at {} mV", gate.name(), v);
                assert!(rates.beta > 0.0, "β_{} at {} mV", gate.name(), v);
                let x_inf = rates.steady_state();
                assert!((0.0..=1.0).contains(&x_inf));
            }
            v += 0.37;
        }
    }

    #[test]
    fn test_tau_and_steady_state_relation() {
        let v = -30.0;
        let rates = RAW.rates(GatingVariable::M, v);
        assert!((rates.tau() - 1.0 / (rates.alpha + rates.beta)).abs() < 1e-15);
        assert!((rates.steady_state() - rates.alpha / (rates.alpha + rates.beta)).abs() < 1e-15);
        assert_eq!(RAW.tau(GatingVariable::M, v), rates.tau());
    }

    #[test]
    fn test_raw_singularity_is_non_finite() {
        assert!(!alpha_n(N_SINGULAR_VOLTAGE).is_finite());
        assert!(!alpha_m(M_SINGULAR_VOLTAGE).is_finite());
        assert!(RAW.alpha(GatingVariable::N, N_SINGULAR_VOLTAGE).is_nan());
        assert!(RAW.steady_state(GatingVariable::M, M_SINGULAR_VOLTAGE).is_nan());
    }

    #[test]
    fn test_propagate_policy_uses_literal_formulas() {
        for v in [-80.0, N_SINGULAR_VOLTAGE + 0.5, -47.0, M_SINGULAR_VOLTAGE - 0.5, 0.0] {
            assert_eq!(RAW.alpha(GatingVariable::N, v), alpha_n(v));
            assert_eq!(RAW.alpha(GatingVariable::M, v), alpha_m(v));
            assert_eq!(RAW.alpha(GatingVariable::H, v), alpha_h(v));
        }
    }

    #[test]
    fn test_analytic_limit_at_singularity() {
        assert_eq!(LIMIT.alpha(GatingVariable::N, N_SINGULAR_VOLTAGE), 0.1);
        assert_eq!(LIMIT.alpha(GatingVariable::M, M_SINGULAR_VOLTAGE), 1.0);
        assert!(LIMIT.steady_state(GatingVariable::N, N_SINGULAR_VOLTAGE).is_finite());
    }

    #[test]
    fn test_analytic_limit_matches_raw_elsewhere() {
        for v in [-90.0, -65.0, -54.0, -41.5, -20.0, 10.0, 45.0] {
            for gate in GatingVariable::ALL {
                let raw = RAW.alpha(gate, v);
                let lim = LIMIT.alpha(gate, v);
                assert!((raw - lim).abs() <= 1e-12 * raw.abs().max(1.0), "{} {}", gate.name(), v);
            }
        }
    }

    #[test]
    fn test_analytic_limit_continuous_near_singularity() {
        let near = LIMIT.alpha(GatingVariable::M, M_SINGULAR_VOLTAGE + 1e-9);
        assert!((near - 1.0).abs() < 1e-6);
    }
}
