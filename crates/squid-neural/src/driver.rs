// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Simulation Driver
//!
//! Runs one Hodgkin-Huxley simulation over a full stimulus.
//!
//! ```text
//! V[0] = V_rest
//! x[0] = x∞(V_rest)               for x ∈ {n, m, h}
//! s[i+1] = step(s[i], I[i], dt)   for i in 0..N-1
//! ```
//!
//! The loop is a single sequential pass over pre-sized buffers. The final
//! stimulus sample is never applied because no state follows it.

use tracing::{debug, warn};

use crate::integrator::{ForwardEuler, Integrator};
use crate::kinetics::{GatingVariable, Kinetics, SingularityPolicy};
use crate::parameters::ParameterSet;
use crate::trajectory::Trajectory;
use crate::types::{Result, SimulationError, State};

/// Default resting potential used to seed the gates (mV)
pub const DEFAULT_RESTING_POTENTIAL: f64 = -65.0;

/// State with every gate at its steady-state value for `v_rest`
pub fn resting_state(kinetics: &Kinetics, v_rest: f64) -> State {
    State::new(
        v_rest,
        kinetics.steady_state(GatingVariable::N, v_rest),
        kinetics.steady_state(GatingVariable::M, v_rest),
        kinetics.steady_state(GatingVariable::H, v_rest),
    )
}

/// Orchestrates a run: seeding, stepping and trace collection
#[derive(Debug, Clone)]
pub struct SimulationDriver<I: Integrator = ForwardEuler> {
    params: ParameterSet,
    resting_potential: f64,
    integrator: I,
}

impl SimulationDriver<ForwardEuler> {
    pub fn new(params: ParameterSet) -> Self {
        Self {
            params,
            resting_potential: DEFAULT_RESTING_POTENTIAL,
            integrator: ForwardEuler::new(),
        }
    }

    /// Use `policy` for the α_n / α_m singularities
    pub fn with_singularity_policy(mut self, policy: SingularityPolicy) -> Self {
        self.integrator = ForwardEuler::with_kinetics(Kinetics::with_policy(policy));
        self
    }
}

impl Default for SimulationDriver<ForwardEuler> {
    fn default() -> Self {
        Self::new(ParameterSet::default())
    }
}

impl<I: Integrator> SimulationDriver<I> {
    /// Replace the membrane parameters, keeping rest and integrator
    pub fn with_params(mut self, params: ParameterSet) -> Self {
        self.params = params;
        self
    }

    pub fn with_resting_potential(mut self, v_rest: f64) -> Self {
        self.resting_potential = v_rest;
        self
    }

    /// Swap the stepping scheme
    pub fn with_integrator<J: Integrator>(self, integrator: J) -> SimulationDriver<J> {
        SimulationDriver {
            params: self.params,
            resting_potential: self.resting_potential,
            integrator,
        }
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn resting_potential(&self) -> f64 {
        self.resting_potential
    }

    pub fn integrator(&self) -> &I {
        &self.integrator
    }

    /// Initial condition for every run of this driver
    pub fn initial_state(&self) -> State {
        resting_state(&self.integrator.kinetics(), self.resting_potential)
    }

    /// Integrate over `stimulus` with fixed step `dt` (ms)
    ///
    /// No validation: a bad `dt` or parameter set shows up as NaN or
    /// divergence in the returned traces.
    pub fn run(&self, stimulus: &[f64], dt: f64) -> Trajectory {
        let len = stimulus.len();
        debug!(
            target: "squid_neural",
            samples = len,
            dt,
            v_rest = self.resting_potential,
            scheme = self.integrator.scheme_name(),
            "Starting simulation run"
        );

        let mut trajectory = Trajectory::zeroed(len, dt);
        if len == 0 {
            return trajectory;
        }

        let mut state = self.initial_state();
        trajectory.set(0, &state);
        for (i, &current) in stimulus[..len - 1].iter().enumerate() {
            state = self.integrator.step(&state, current, dt, &self.params);
            trajectory.set(i + 1, &state);
        }

        if !state.is_finite() {
            warn!(
                target: "squid_neural",
                dt,
                "Simulation ended in a non-finite state (singular voltage or unstable time step)"
            );
        }
        debug!(
            target: "squid_neural",
            final_v = state.v,
            peak_v = trajectory.peak_voltage(),
            "Simulation run complete"
        );

        trajectory
    }

    /// [`run`](Self::run) after rejecting unusable inputs
    pub fn run_checked(&self, stimulus: &[f64], dt: f64) -> Result<Trajectory> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimulationError::InvalidTimeStep(dt));
        }
        if !self.resting_potential.is_finite() {
            return Err(SimulationError::InvalidRestingPotential(self.resting_potential));
        }
        self.params.validate()?;
        if stimulus.is_empty() {
            return Err(SimulationError::EmptyStimulus);
        }
        Ok(self.run(stimulus, dt))
    }
}

/// Run with default parameters and resting potential
///
/// Returns `(V, m, n, h)`, each the same length as `stimulus`.
pub fn simulate(stimulus: &[f64], dt: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
    SimulationDriver::default().run(stimulus, dt).into_parts()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths_match_stimulus() {
        for len in [0usize, 1, 2, 17, 1000] {
            let stimulus = vec![0.05; len];
            let (v, m, n, h) = simulate(&stimulus, 0.01);
            assert_eq!(v.len(), len);
            assert_eq!(m.len(), len);
            assert_eq!(n.len(), len);
            assert_eq!(h.len(), len);
        }
    }

    #[test]
    fn test_initial_condition_is_resting_steady_state() {
        let driver = SimulationDriver::default().with_resting_potential(-70.0);
        let traj = driver.run(&[0.0; 4], 0.01);
        let k = Kinetics::new();
        let s0 = traj.state_at(0).unwrap();
        assert_eq!(s0.v, -70.0);
        assert_eq!(s0.n, k.steady_state(GatingVariable::N, -70.0));
        assert_eq!(s0.m, k.steady_state(GatingVariable::M, -70.0));
        assert_eq!(s0.h, k.steady_state(GatingVariable::H, -70.0));
    }

    #[test]
    fn test_single_sample_is_initial_condition_only() {
        let traj = SimulationDriver::default().run(&[5.0], 0.01);
        assert_eq!(traj.len(), 1);
        assert_eq!(traj.voltage()[0], DEFAULT_RESTING_POTENTIAL);
    }

    #[test]
    fn test_sample_i_drives_step_into_i_plus_one() {
        let driver = SimulationDriver::default();
        let quiet = driver.run(&[0.0, 0.0, 0.0], 0.01);
        let kicked = driver.run(&[0.0, 1.0, 0.0], 0.01);
        assert_eq!(quiet.voltage()[1], kicked.voltage()[1]);
        assert!(kicked.voltage()[2] > quiet.voltage()[2]);

        // The last sample never influences the output
        let tail = driver.run(&[0.0, 0.0, 9.0], 0.01);
        assert_eq!(tail, quiet);
    }

    #[test]
    fn test_run_is_deterministic() {
        let stimulus: Vec<f64> = (0..5000)
            .map(|i| if (1000..1500).contains(&i) { 0.2 } else { 0.0 })
            .collect();
        let driver = SimulationDriver::default();
        assert_eq!(driver.run(&stimulus, 0.01), driver.run(&stimulus, 0.01));
    }

    #[test]
    fn test_run_checked_rejects_bad_inputs() {
        let driver = SimulationDriver::default();
        assert_eq!(driver.run_checked(&[0.0], 0.0), Err(SimulationError::InvalidTimeStep(0.0)));
        assert!(matches!(
            driver.run_checked(&[0.0], f64::NAN),
            Err(SimulationError::InvalidTimeStep(_))
        ));
        assert_eq!(driver.run_checked(&[], 0.01), Err(SimulationError::EmptyStimulus));

        let bad_params = SimulationDriver::new(ParameterSet {
            c_m: -1.0,
            ..ParameterSet::default()
        });
        assert!(matches!(
            bad_params.run_checked(&[0.0], 0.01),
            Err(SimulationError::InvalidParameter { name: "c_m", .. })
        ));

        let bad_rest = SimulationDriver::default().with_resting_potential(f64::INFINITY);
        assert!(matches!(
            bad_rest.run_checked(&[0.0], 0.01),
            Err(SimulationError::InvalidRestingPotential(_))
        ));
    }

    #[test]
    fn test_run_checked_matches_run() {
        let driver = SimulationDriver::default();
        let stimulus = vec![0.1; 200];
        assert_eq!(driver.run_checked(&stimulus, 0.01).unwrap(), driver.run(&stimulus, 0.01));
    }

    #[test]
    fn test_singular_resting_potential_propagates_nan() {
        let traj = SimulationDriver::default()
            .with_resting_potential(-55.0)
            .run(&[0.0; 10], 0.01);
        assert!(traj.n()[0].is_nan());
        assert!(traj.voltage()[9].is_nan(), "NaN must persist to the end of the run");
    }

    #[test]
    fn test_analytic_limit_policy_recovers_singular_rest() {
        let traj = SimulationDriver::default()
            .with_singularity_policy(SingularityPolicy::AnalyticLimit)
            .with_resting_potential(-55.0)
            .run(&[0.0; 10], 0.01);
        assert!(traj.final_state().unwrap().is_finite());
    }

    #[test]
    fn test_oversized_time_step_diverges_silently() {
        let traj = SimulationDriver::default().run(&[0.2; 2000], 1.0);
        let last = traj.final_state().unwrap();
        assert!(!last.is_finite() || last.v.abs() > 1e3);
    }
}
