// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Squid Neural Computation
//!
//! Single-compartment Hodgkin-Huxley neuron:
//! - **Kinetics**: voltage-dependent α/β rates, τ and x∞ for the n, m, h gates
//! - **Parameters**: reversal potentials, capacitance, maximal conductances
//! - **Integrator**: explicit forward Euler step over (V, n, m, h)
//! - **Driver**: steady-state seeding and the full-run loop
//!
//! Supporting utilities:
//! - **Stimulus**: zero-baseline pulse and step construction
//! - **Analysis**: spike detection and run summaries
//! - **Sweep**: independent runs in parallel (`parallel` feature)
//!
//! ## Example
//!
//! ```
//! use squid_neural::{PulseProtocol, SimulationDriver, ParameterSet};
//!
//! let dt = 0.01;
//! let stimulus = PulseProtocol::default().build(dt);
//! let trajectory = SimulationDriver::new(ParameterSet::default()).run(stimulus.as_slice(), dt);
//!
//! assert_eq!(trajectory.len(), stimulus.len());
//! assert!(trajectory.peak_voltage().unwrap() > 0.0);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod types;

pub mod kinetics;
pub mod parameters;

pub mod driver;
pub mod integrator;
pub mod trajectory;

pub mod analysis;
pub mod stimulus;

#[cfg(feature = "parallel")]
pub mod sweep;

pub use types::{Error, IonicCurrents, Result, SimulationError, State, StateDerivative};

pub use kinetics::{
    alpha_h, alpha_m, alpha_n, beta_h, beta_m, beta_n, GateRates, GatingVariable, Kinetics,
    SingularityPolicy, M_SINGULAR_VOLTAGE, N_SINGULAR_VOLTAGE,
};
pub use parameters::ParameterSet;

pub use driver::{resting_state, simulate, SimulationDriver, DEFAULT_RESTING_POTENTIAL};
pub use integrator::{derivatives, ionic_currents, ForwardEuler, Integrator};
pub use trajectory::Trajectory;

pub use analysis::{detect_spikes, peak, SpikeSummary, DEFAULT_SPIKE_THRESHOLD};
pub use stimulus::{PulseProtocol, Stimulus};

#[cfg(feature = "parallel")]
pub use sweep::{run_batch, sweep_amplitudes, sweep_parameters};
