// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later ones winning:
//! 1. TOML file (base values)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, SquidConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File name searched for when no path is given
pub const CONFIG_FILE_NAME: &str = "squid_configuration.toml";

/// Find the configuration file
///
/// Search order:
/// 1. `SQUID_CONFIG_PATH` environment variable
/// 2. Current working directory
/// 3. Up to five parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("SQUID_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by SQUID_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.extend(cwd.ancestors().take(6).map(|dir| dir.join(CONFIG_FILE_NAME)));
    }

    if let Some(found) = search_paths.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\n\
         Set SQUID_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from a TOML file and apply overrides
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if the file is not found or contains invalid TOML. Value
/// checks are left to [`validate_config`](crate::validate_config).
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SquidConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: SquidConfig = toml::from_str(&content)?;
    tracing::debug!(
        target: "squid_config",
        path = %config_file.display(),
        "Loaded configuration file"
    );

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Parse `raw` into `slot`, leaving it untouched when parsing fails
fn set_parsed<T: FromStr>(slot: &mut T, key: &str, raw: &str) {
    match raw.trim().parse::<T>() {
        Ok(value) => *slot = value,
        Err(_) => tracing::warn!(
            target: "squid_config",
            key,
            value = raw,
            "Ignoring unparseable override"
        ),
    }
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `SQUID_DT_MS` -> `simulation.dt_ms`
/// - `SQUID_DURATION_MS` -> `stimulus.duration_ms`
/// - `SQUID_RESTING_POTENTIAL_MV` -> `simulation.resting_potential_mv`
/// - `SQUID_STIMULUS_AMPLITUDE` -> `stimulus.amplitude`
/// - `SQUID_LOG_LEVEL` -> `logging.level`
/// - `SQUID_TRACE_PATH` -> `output.trace_path`
pub fn apply_environment_overrides(config: &mut SquidConfig) {
    if let Ok(value) = env::var("SQUID_DT_MS") {
        set_parsed(&mut config.simulation.dt_ms, "SQUID_DT_MS", &value);
    }
    if let Ok(value) = env::var("SQUID_DURATION_MS") {
        set_parsed(&mut config.stimulus.duration_ms, "SQUID_DURATION_MS", &value);
    }
    if let Ok(value) = env::var("SQUID_RESTING_POTENTIAL_MV") {
        set_parsed(
            &mut config.simulation.resting_potential_mv,
            "SQUID_RESTING_POTENTIAL_MV",
            &value,
        );
    }
    if let Ok(value) = env::var("SQUID_STIMULUS_AMPLITUDE") {
        set_parsed(&mut config.stimulus.amplitude, "SQUID_STIMULUS_AMPLITUDE", &value);
    }
    if let Ok(value) = env::var("SQUID_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("SQUID_TRACE_PATH") {
        config.output.trace_path = Some(PathBuf::from(value));
    }
}

/// Apply CLI argument overrides to configuration
///
/// Keys: `dt_ms`, `duration_ms`, `resting_potential_mv`, `amplitude`,
/// `onset_ms`, `width_ms`, `log_level`, `trace_path`. Unknown keys are ignored.
pub fn apply_cli_overrides(config: &mut SquidConfig, cli_args: &HashMap<String, String>) {
    for (key, value) in cli_args {
        match key.as_str() {
            "dt_ms" => set_parsed(&mut config.simulation.dt_ms, key, value),
            "duration_ms" => set_parsed(&mut config.stimulus.duration_ms, key, value),
            "resting_potential_mv" => {
                set_parsed(&mut config.simulation.resting_potential_mv, key, value)
            }
            "amplitude" => set_parsed(&mut config.stimulus.amplitude, key, value),
            "onset_ms" => set_parsed(&mut config.stimulus.onset_ms, key, value),
            "width_ms" => set_parsed(&mut config.stimulus.width_ms, key, value),
            "log_level" => config.logging.level = value.clone(),
            "trace_path" => config.output.trace_path = Some(PathBuf::from(value)),
            _ => tracing::warn!(target: "squid_config", key = key.as_str(), "Unknown CLI override"),
        }
    }
}
