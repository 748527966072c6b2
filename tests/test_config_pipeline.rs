// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file through to a finished run.

use std::collections::HashMap;
use std::path::Path;

use squid::config::{load_config, validate_config, SquidConfig};
use squid::neural::SingularityPolicy;
use squid::run_from_config;

fn shipped_config_path() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/squid_configuration.toml"))
}

#[test]
fn test_shipped_config_matches_defaults() {
    let text = std::fs::read_to_string(shipped_config_path()).unwrap();
    let config: SquidConfig = toml::from_str(&text).unwrap();
    assert_eq!(config, SquidConfig::default());
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_overridden_config_runs_subthreshold() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("squid_configuration.toml");
    std::fs::write(
        &path,
        "[simulation]\nsingularity_policy = \"analytic_limit\"\n[stimulus]\nonset_ms = 20.0\n",
    )
    .unwrap();

    let mut cli = HashMap::new();
    cli.insert("dt_ms".to_string(), "0.01".to_string());
    cli.insert("duration_ms".to_string(), "100".to_string());
    cli.insert("amplitude".to_string(), "0.01".to_string());
    let config = load_config(Some(&path), Some(&cli)).unwrap();
    assert_eq!(config.simulation.singularity_policy, SingularityPolicy::AnalyticLimit);

    let report = run_from_config(&config).unwrap();
    assert_eq!(report.trajectory.len(), 10_000);
    assert_eq!(report.summary.spike_count, 0);
    assert!(report.summary.peak_mv.unwrap() < -60.0);
}
