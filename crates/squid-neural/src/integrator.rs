// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Time-stepping
//!
//! ## Model Dynamics
//!
//! ```text
//! Gates (x ∈ {n, m, h}):
//!     dx/dt = (x∞(V) − x) / τ_x(V)
//!
//! Membrane:
//!     C dV/dt = I − g_L (V − E_L) − g_K n⁴ (V − E_K) − g_Na m³ h (V − E_Na)
//!
//! Forward Euler:
//!     y(t+dt) = y(t) + dt · dy/dt |_(t)
//! ```
//!
//! All four components are advanced from the *pre-update* state. The scheme is
//! only conditionally stable: a dt that is large relative to the fastest gate
//! time constant diverges without any error being raised.

use crate::kinetics::{GatingVariable, Kinetics};
use crate::parameters::ParameterSet;
use crate::types::{IonicCurrents, State, StateDerivative};

/// Per-step update rule
///
/// Implementations are stateless: everything a step depends on is passed in.
pub trait Integrator: Send + Sync {
    /// Human-readable scheme name
    fn scheme_name(&self) -> &'static str;

    /// Rate evaluator used for steady-state seeding and stepping
    fn kinetics(&self) -> Kinetics;

    /// Advance `state` by `dt` ms under applied current `current` (µA/mm²)
    fn step(&self, state: &State, current: f64, dt: f64, params: &ParameterSet) -> State;
}

/// Channel currents for `state`
#[inline]
pub fn ionic_currents(state: &State, params: &ParameterSet) -> IonicCurrents {
    let v = state.v;
    IonicCurrents {
        sodium: params.g_na * state.m.powi(3) * state.h * (v - params.e_na),
        potassium: params.g_k * state.n.powi(4) * (v - params.e_k),
        leak: params.g_l * (v - params.e_l),
    }
}

/// Right-hand side of the HH system at `state`
#[inline]
pub fn derivatives(
    kinetics: &Kinetics,
    state: &State,
    current: f64,
    params: &ParameterSet,
) -> StateDerivative {
    let v = state.v;
    let relax = |gate: GatingVariable, x: f64| {
        let rates = kinetics.rates(gate, v);
        (rates.steady_state() - x) / rates.tau()
    };

    let ionic = ionic_currents(state, params);
    StateDerivative {
        dv: (current - ionic.leak - ionic.potassium - ionic.sodium) / params.c_m,
        dn: relax(GatingVariable::N, state.n),
        dm: relax(GatingVariable::M, state.m),
        dh: relax(GatingVariable::H, state.h),
    }
}

/// Explicit (forward) Euler scheme
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardEuler {
    kinetics: Kinetics,
}

impl ForwardEuler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kinetics(kinetics: Kinetics) -> Self {
        Self { kinetics }
    }
}

impl Integrator for ForwardEuler {
    fn scheme_name(&self) -> &'static str {
        "Forward Euler"
    }

    fn kinetics(&self) -> Kinetics {
        self.kinetics
    }

    #[inline]
    fn step(&self, state: &State, current: f64, dt: f64, params: &ParameterSet) -> State {
        let d = derivatives(&self.kinetics, state, current, params);
        State {
            v: state.v + dt * d.dv,
            n: state.n + dt * d.dn,
            m: state.m + dt * d.dm,
            h: state.h + dt * d.dh,
        }
    }
}
