// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Run the configured current-pulse protocol once.
//!
//! Loads `squid_configuration.toml` (or the built-in defaults when none is
//! found), applies `--set key=value` overrides, integrates, logs a spike
//! summary and optionally writes the trajectory as JSON.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use squid::config::{find_config_file, load_config, ConfigError, SquidConfig};
use squid::observability::{debug_flags_help, init_logging, parse_debug_flags};

struct Args {
    config: Option<PathBuf>,
    overrides: HashMap<String, String>,
}

fn usage() -> String {
    format!(
        "Usage: simulate_pulse [--config <path>] [--set key=value]... [--output <path>]\n\n\
         Override keys: dt_ms, duration_ms, resting_potential_mv, amplitude, onset_ms,\n\
         width_ms, log_level, trace_path\n\n{}",
        debug_flags_help()
    )
}

fn parse_args() -> Result<Args> {
    let mut config = None;
    let mut overrides = HashMap::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let v = args.next().context("--config needs a path")?;
                config = Some(PathBuf::from(v));
            }
            "--output" => {
                let v = args.next().context("--output needs a path")?;
                overrides.insert("trace_path".to_string(), v);
            }
            "--set" => {
                let v = args.next().context("--set needs key=value")?;
                let (key, value) = v
                    .split_once('=')
                    .with_context(|| format!("Expected key=value, got '{}'", v))?;
                overrides.insert(key.trim().to_string(), value.trim().to_string());
            }
            "-h" | "--help" => {
                println!("{}", usage());
                process::exit(0);
            }
            // Consumed by parse_debug_flags
            other if other.starts_with("--debug-") => {}
            other => bail!("Unknown argument: {}\n\n{}", other, usage()),
        }
    }

    Ok(Args { config, overrides })
}

fn resolve_config(args: &Args) -> Result<SquidConfig> {
    if let Some(path) = &args.config {
        return load_config(Some(path), Some(&args.overrides))
            .with_context(|| format!("Failed to load {}", path.display()));
    }

    match find_config_file() {
        Ok(path) => load_config(Some(&path), Some(&args.overrides))
            .with_context(|| format!("Failed to load {}", path.display())),
        Err(ConfigError::FileNotFound(_)) => {
            let mut config = SquidConfig::default();
            squid::config::apply_environment_overrides(&mut config);
            squid::config::apply_cli_overrides(&mut config, &args.overrides);
            Ok(config)
        }
        Err(e) => Err(e.into()),
    }
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let config = resolve_config(&args)?;

    let debug_flags = parse_debug_flags();
    let _guard = init_logging(&debug_flags, &config.logging)?;

    if args.config.is_none() {
        tracing::debug!(target: "squid", "No --config given; using discovered file or defaults");
    }

    let report = squid::run_from_config(&config)?;
    let summary = &report.summary;

    println!(
        "spikes: {}  first spike: {}  peak: {}  final: {}",
        summary.spike_count,
        summary
            .first_spike_ms
            .map_or_else(|| "-".to_string(), |t| format!("{:.3} ms", t)),
        summary
            .peak_mv
            .map_or_else(|| "-".to_string(), |v| format!("{:.2} mV", v)),
        summary
            .final_mv
            .map_or_else(|| "-".to_string(), |v| format!("{:.2} mV", v)),
    );
    if let Some(path) = &report.trace_path {
        println!("trajectory: {}", path.display());
    }

    Ok(())
}
