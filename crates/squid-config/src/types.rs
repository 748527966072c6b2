// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Each struct maps to a table in `squid_configuration.toml`. Every field is
//! optional in the file and falls back to the defaults below.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use squid_neural::{
    ParameterSet, PulseProtocol, SingularityPolicy, DEFAULT_RESTING_POTENTIAL,
    DEFAULT_SPIKE_THRESHOLD,
};
pub use squid_observability::{LogFormat, LoggingConfig};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SquidConfig {
    pub membrane: ParameterSet,
    pub simulation: SimulationConfig,
    pub stimulus: PulseProtocol,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

/// Integration settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed time step (ms)
    pub dt_ms: f64,
    /// Resting potential used to seed the gates (mV)
    pub resting_potential_mv: f64,
    pub singularity_policy: SingularityPolicy,
    /// Reject bad dt / parameters before running instead of propagating NaN
    pub validate_inputs: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt_ms: 0.001,
            resting_potential_mv: DEFAULT_RESTING_POTENTIAL,
            singularity_policy: SingularityPolicy::Propagate,
            validate_inputs: true,
        }
    }
}

/// Where and how results are reported
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JSON trajectory destination; nothing is written when unset
    pub trace_path: Option<PathBuf>,
    pub spike_threshold_mv: f64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            trace_path: None,
            spike_threshold_mv: DEFAULT_SPIKE_THRESHOLD,
        }
    }
}
