// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # squid - Hodgkin-Huxley Membrane Simulation
//!
//! Single-compartment neuron with the classical four-variable Hodgkin-Huxley
//! model (V, n, m, h), integrated with a fixed-step forward Euler scheme.
//! This crate re-exports the workspace members and wires configuration,
//! logging and the simulation core together.
//!
//! ## Feature Flags
//!
//! - **`parallel`** (default): rayon-backed batches of independent runs
//! - **`file-logging`**: JSON log files in timestamped run folders
//!
//! ## Usage
//!
//! ```rust
//! use squid::prelude::*;
//!
//! let dt = 0.01;
//! let stimulus = Stimulus::zeros(50.0, dt).with_pulse(10.0, 10.0, 0.2);
//! let trajectory = SimulationDriver::new(ParameterSet::default()).run(stimulus.as_slice(), dt);
//!
//! assert_eq!(trajectory.len(), stimulus.len());
//! assert!(!trajectory.spike_indices(0.0).is_empty());
//! ```
//!
//! ### From a configuration file
//!
//! ```rust,no_run
//! let config = squid::config::load_config(None, None)?;
//! let report = squid::run_from_config(&config)?;
//! println!("{} spike(s)", report.summary.spike_count);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs;
use std::path::PathBuf;

use tracing::info;

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use squid_config as config;
pub use squid_neural as neural;
pub use squid_observability as observability;

use squid_config::{validate_config, ConfigError, SquidConfig};
use squid_neural::{SimulationDriver, SimulationError, SpikeSummary, Trajectory};

/// Convenient imports for simulation code
pub mod prelude {
    pub use squid_neural::{
        simulate, ForwardEuler, GatingVariable, Integrator, Kinetics, ParameterSet,
        PulseProtocol, SimulationDriver, SimulationError, SingularityPolicy, SpikeSummary, State,
        Stimulus, Trajectory,
    };

    #[cfg(feature = "parallel")]
    pub use squid_neural::{run_batch, sweep_amplitudes, sweep_parameters};
}

/// Errors from configured runs
#[derive(Debug, thiserror::Error)]
pub enum SquidError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("Failed to serialize trajectory: {0}")]
    Export(#[from] serde_json::Error),

    #[error("Failed to write trajectory to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SquidError>;

/// Outcome of [`run_from_config`]
#[derive(Debug, Clone)]
pub struct RunReport {
    pub trajectory: Trajectory,
    pub summary: SpikeSummary,
    /// Where the trajectory JSON was written, if anywhere
    pub trace_path: Option<PathBuf>,
}

/// Driver configured from the `[membrane]` and `[simulation]` tables
pub fn driver_from_config(config: &SquidConfig) -> SimulationDriver {
    SimulationDriver::new(config.membrane)
        .with_resting_potential(config.simulation.resting_potential_mv)
        .with_singularity_policy(config.simulation.singularity_policy)
}

/// Build the configured pulse, run it, summarize, and optionally export
///
/// With `simulation.validate_inputs` the config is validated and the checked
/// run path is used; otherwise inputs go to the integrator as they are.
pub fn run_from_config(config: &SquidConfig) -> Result<RunReport> {
    if config.simulation.validate_inputs {
        validate_config(config)?;
    }

    let dt = config.simulation.dt_ms;
    let stimulus = config.stimulus.build(dt);
    let driver = driver_from_config(config);

    info!(
        target: "squid",
        samples = stimulus.len(),
        dt,
        amplitude = config.stimulus.amplitude,
        onset_ms = config.stimulus.onset_ms,
        width_ms = config.stimulus.width_ms,
        "Running pulse protocol"
    );

    let trajectory = if config.simulation.validate_inputs {
        driver.run_checked(stimulus.as_slice(), dt)?
    } else {
        driver.run(stimulus.as_slice(), dt)
    };

    let summary = SpikeSummary::from_trajectory(&trajectory, config.output.spike_threshold_mv);
    info!(
        target: "squid",
        spikes = summary.spike_count,
        first_spike_ms = summary.first_spike_ms,
        peak_mv = summary.peak_mv,
        final_mv = summary.final_mv,
        "Run complete"
    );

    let trace_path = match &config.output.trace_path {
        Some(path) => {
            let json = trajectory.to_json()?;
            fs::write(path, json).map_err(|source| SquidError::Write {
                path: path.clone(),
                source,
            })?;
            info!(target: "squid", path = %path.display(), "Trajectory written");
            Some(path.clone())
        }
        None => None,
    };

    Ok(RunReport {
        trajectory,
        summary,
        trace_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_config() -> SquidConfig {
        let mut config = SquidConfig::default();
        config.simulation.dt_ms = 0.01;
        config.stimulus.duration_ms = 60.0;
        config.stimulus.onset_ms = 20.0;
        config
    }

    #[test]
    fn test_run_from_default_style_config_spikes() {
        let report = run_from_config(&short_config()).unwrap();
        assert_eq!(report.trajectory.len(), 6000);
        assert_eq!(report.summary.spike_count, 1);
        assert!(report.trace_path.is_none());
    }

    #[test]
    fn test_invalid_config_rejected_when_validating() {
        let mut config = short_config();
        config.membrane.g_l = -1.0;
        assert!(matches!(run_from_config(&config), Err(SquidError::Config(_))));
    }

    #[test]
    fn test_invalid_config_rejected_before_stimulus_is_built() {
        let mut config = short_config();
        // 1e15 samples if it were ever allocated
        config.simulation.dt_ms = 1e-9;
        config.stimulus.duration_ms = 1e6;
        config.membrane.c_m = 0.0;
        assert!(matches!(run_from_config(&config), Err(SquidError::Config(_))));
    }

    #[test]
    fn test_unvalidated_run_propagates_nan() {
        let mut config = short_config();
        config.simulation.validate_inputs = false;
        config.simulation.resting_potential_mv = -40.0;
        let report = run_from_config(&config).unwrap();
        assert!(report.trajectory.voltage().last().unwrap().is_nan());
    }

    #[test]
    fn test_trace_written_to_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        let mut config = short_config();
        config.stimulus.duration_ms = 1.0;
        config.stimulus.onset_ms = 0.0;
        config.output.trace_path = Some(path.clone());

        let report = run_from_config(&config).unwrap();
        assert_eq!(report.trace_path.as_deref(), Some(path.as_path()));

        let text = fs::read_to_string(&path).unwrap();
        let back: Trajectory = serde_json::from_str(&text).unwrap();
        assert_eq!(back, report.trajectory);
    }
}
