// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Console output always; with the `file-logging` feature and
//! `file_logging = true`, JSON logs are also written to a timestamped folder:
//!
//! ```text
//! ./logs/
//!   └── run_20250101_120000/
//!       └── squid.log
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LoggingConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps file writers alive; logs are flushed when this is dropped
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder receiving file logs, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

fn env_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter).with_context(|| format!("Invalid log filter: {}", filter))
}

/// Console layer plus the optional file layer, with the guard that owns them
fn build_layers(
    debug_flags: &CrateDebugFlags,
    config: &LoggingConfig,
) -> Result<(Vec<BoxedLayer>, LoggingGuard)> {
    let filter = debug_flags.to_filter_string(&config.level);

    let console_layer: BoxedLayer = match config.format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_filter(env_filter(&filter)?)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(env_filter(&filter)?)
            .boxed(),
    };
    let mut layers = vec![console_layer];

    let guard = attach_file_layer(&mut layers, config, &filter)?;
    Ok((layers, guard))
}

fn warn_if_file_logging_unavailable(config: &LoggingConfig, guard: &LoggingGuard) {
    if config.file_logging && guard.log_dir.is_none() {
        tracing::warn!("file_logging requested but the file-logging feature is not compiled in");
    }
}

/// Install the global subscriber
///
/// Fails if a subscriber is already installed; use [`try_init_logging`] where
/// repeated initialization is expected (tests, embedding).
pub fn init_logging(
    debug_flags: &CrateDebugFlags,
    config: &LoggingConfig,
) -> Result<LoggingGuard> {
    let (layers, guard) = build_layers(debug_flags, config)?;

    Registry::default()
        .with(layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    warn_if_file_logging_unavailable(config, &guard);
    Ok(guard)
}

/// Like [`init_logging`], but an already-installed subscriber is not an error
///
/// Returns `Ok(None)` when another subscriber is already active. Invalid
/// filters and log-directory failures are still reported.
pub fn try_init_logging(
    debug_flags: &CrateDebugFlags,
    config: &LoggingConfig,
) -> Result<Option<LoggingGuard>> {
    let (layers, guard) = build_layers(debug_flags, config)?;

    // Without the tracing-log bridge, try_init only fails on an existing global default
    if Registry::default().with(layers).try_init().is_err() {
        return Ok(None);
    }

    warn_if_file_logging_unavailable(config, &guard);
    Ok(Some(guard))
}

#[cfg(feature = "file-logging")]
fn attach_file_layer(
    layers: &mut Vec<BoxedLayer>,
    config: &LoggingConfig,
    filter: &str,
) -> Result<LoggingGuard> {
    if !config.file_logging {
        return Ok(LoggingGuard {
            _file_guard: None,
            log_dir: None,
        });
    }

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let run_folder = config.log_dir.join(format!("run_{}", timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;
    cleanup_old_runs(&config.log_dir, config.retention_runs)?;

    let appender = tracing_appender::rolling::never(&run_folder, "squid.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .json()
        .with_filter(env_filter(filter)?)
        .boxed();
    layers.push(file_layer);

    Ok(LoggingGuard {
        _file_guard: Some(guard),
        log_dir: Some(run_folder),
    })
}

#[cfg(not(feature = "file-logging"))]
fn attach_file_layer(
    _layers: &mut Vec<BoxedLayer>,
    _config: &LoggingConfig,
    _filter: &str,
) -> Result<LoggingGuard> {
    Ok(LoggingGuard { log_dir: None })
}

/// Remove all but the newest `keep` `run_*` folders
///
/// Folder names embed a sortable timestamp, so name order is age order.
#[cfg_attr(not(feature = "file-logging"), allow(dead_code))]
fn cleanup_old_runs(base_log_dir: &Path, keep: usize) -> Result<()> {
    if !base_log_dir.exists() {
        return Ok(());
    }

    let mut runs: Vec<PathBuf> = std::fs::read_dir(base_log_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_dir()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("run_"))
        })
        .collect();
    runs.sort();

    let excess = runs.len().saturating_sub(keep);
    for path in runs.iter().take(excess) {
        if let Err(e) = std::fs::remove_dir_all(path) {
            eprintln!("Warning: Failed to remove old log directory {}: {}", path.display(), e);
        }
    }

    Ok(())
}
