// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for checked simulation entry points
//!
//! The integrator itself never fails: numeric blow-ups propagate as NaN/Inf.
//! These errors are raised only when a caller asks for input validation.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("Invalid time step: {0} ms (must be finite and > 0)")]
    InvalidTimeStep(f64),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Invalid resting potential: {0} mV")]
    InvalidRestingPotential(f64),

    #[error("Stimulus is empty")]
    EmptyStimulus,

    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

pub type Result<T> = core::result::Result<T, SimulationError>;
pub type Error = SimulationError;
