// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Collects every problem in one pass so a user can fix a config file in a
//! single edit.

use crate::{ConfigError, ConfigResult, SquidConfig};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    NotPositive { field: String, value: f64 },
    NotFinite { field: String, value: f64 },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotPositive { field, value } => {
                write!(f, "{} = {} must be > 0", field, value)
            }
            Self::NotFinite { field, value } => {
                write!(f, "{} = {} must be finite", field, value)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Positive capacitance and conductances, finite reversal potentials
/// - Positive time step and a run at least one step long
/// - A pulse that starts inside the run and has non-negative width
/// - A known log level
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every failed check
pub fn validate_config(config: &SquidConfig) -> ConfigResult<()> {
    let errors = collect_errors(config);
    if errors.is_empty() {
        return Ok(());
    }

    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}

/// Every failed check, in table order
pub fn collect_errors(config: &SquidConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_membrane(config, &mut errors);
    validate_simulation(config, &mut errors);
    validate_stimulus(config, &mut errors);
    validate_logging(config, &mut errors);
    errors
}

fn require_positive(field: &str, value: f64, errors: &mut Vec<ConfigValidationError>) {
    if !value.is_finite() {
        errors.push(ConfigValidationError::NotFinite {
            field: field.to_string(),
            value,
        });
    } else if value <= 0.0 {
        errors.push(ConfigValidationError::NotPositive {
            field: field.to_string(),
            value,
        });
    }
}

fn require_finite(field: &str, value: f64, errors: &mut Vec<ConfigValidationError>) {
    if !value.is_finite() {
        errors.push(ConfigValidationError::NotFinite {
            field: field.to_string(),
            value,
        });
    }
}

fn validate_membrane(config: &SquidConfig, errors: &mut Vec<ConfigValidationError>) {
    let m = &config.membrane;
    require_positive("membrane.c_m", m.c_m, errors);
    require_positive("membrane.g_na", m.g_na, errors);
    require_positive("membrane.g_k", m.g_k, errors);
    require_positive("membrane.g_l", m.g_l, errors);
    require_finite("membrane.e_na", m.e_na, errors);
    require_finite("membrane.e_k", m.e_k, errors);
    require_finite("membrane.e_l", m.e_l, errors);
}

fn validate_simulation(config: &SquidConfig, errors: &mut Vec<ConfigValidationError>) {
    require_positive("simulation.dt_ms", config.simulation.dt_ms, errors);
    require_finite(
        "simulation.resting_potential_mv",
        config.simulation.resting_potential_mv,
        errors,
    );
}

fn validate_stimulus(config: &SquidConfig, errors: &mut Vec<ConfigValidationError>) {
    let s = &config.stimulus;
    let dt = config.simulation.dt_ms;

    require_positive("stimulus.duration_ms", s.duration_ms, errors);
    require_finite("stimulus.amplitude", s.amplitude, errors);

    if s.duration_ms.is_finite() && dt.is_finite() && dt > 0.0 && s.duration_ms < dt {
        errors.push(ConfigValidationError::InvalidValue {
            field: "stimulus.duration_ms".to_string(),
            reason: format!("shorter than one time step ({} ms)", dt),
        });
    }
    if !(s.onset_ms >= 0.0 && s.onset_ms < s.duration_ms) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "stimulus.onset_ms".to_string(),
            reason: format!("must lie in [0, duration_ms), got {}", s.onset_ms),
        });
    }
    if !(s.width_ms >= 0.0 && s.width_ms.is_finite()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "stimulus.width_ms".to_string(),
            reason: format!("must be finite and >= 0, got {}", s.width_ms),
        });
    }
}

fn validate_logging(config: &SquidConfig, errors: &mut Vec<ConfigValidationError>) {
    if !config.logging.is_known_level() {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!(
                "'{}' is not one of {}",
                config.logging.level,
                squid_observability::LOG_LEVELS.join(", ")
            ),
        });
    }
}
