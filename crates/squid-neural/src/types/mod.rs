// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Core type definitions shared by the integrator and the driver

pub mod error;
pub mod state;

pub use error::{Error, Result, SimulationError};
pub use state::{IonicCurrents, State, StateDerivative};
