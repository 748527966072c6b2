// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Parallel batches of independent runs
//!
//! A single run is strictly sequential. Separate runs share nothing, so a
//! batch fans out over the rayon pool with one trajectory per input. Output
//! order always matches input order.

use rayon::prelude::*;
use tracing::debug;

use crate::driver::SimulationDriver;
use crate::integrator::Integrator;
use crate::parameters::ParameterSet;
use crate::stimulus::PulseProtocol;
use crate::trajectory::Trajectory;

/// Run `driver` once per stimulus
pub fn run_batch<I, S>(driver: &SimulationDriver<I>, stimuli: &[S], dt: f64) -> Vec<Trajectory>
where
    I: Integrator,
    S: AsRef<[f64]> + Sync,
{
    debug!(target: "squid_neural", runs = stimuli.len(), dt, "Starting batch");
    stimuli
        .par_iter()
        .map(|stimulus| driver.run(stimulus.as_ref(), dt))
        .collect()
}

/// Same pulse protocol at each amplitude in `amplitudes`
pub fn sweep_amplitudes<I: Integrator>(
    driver: &SimulationDriver<I>,
    protocol: &PulseProtocol,
    amplitudes: &[f64],
    dt: f64,
) -> Vec<Trajectory> {
    debug!(target: "squid_neural", runs = amplitudes.len(), dt, "Starting amplitude sweep");
    amplitudes
        .par_iter()
        .map(|&amplitude| {
            let stimulus = protocol.with_amplitude(amplitude).build(dt);
            driver.run(stimulus.as_slice(), dt)
        })
        .collect()
}

/// One shared stimulus under several parameter sets
///
/// Each run uses `template` with its parameters swapped out, so the resting
/// potential and singularity policy carry over.
pub fn sweep_parameters<I: Integrator + Clone>(
    template: &SimulationDriver<I>,
    parameter_sets: &[ParameterSet],
    stimulus: &[f64],
    dt: f64,
) -> Vec<Trajectory> {
    debug!(
        target: "squid_neural",
        runs = parameter_sets.len(),
        dt,
        "Starting parameter sweep"
    );
    parameter_sets
        .par_iter()
        .map(|params| template.clone().with_params(*params).run(stimulus, dt))
        .collect()
}
