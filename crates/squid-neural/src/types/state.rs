// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Instantaneous membrane state

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Membrane state at one time index
///
/// `v` is in mV; `n`, `m` and `h` are dimensionless gate fractions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct State {
    pub v: f64,
    pub n: f64,
    pub m: f64,
    pub h: f64,
}

impl State {
    pub const fn new(v: f64, n: f64, m: f64, h: f64) -> Self {
        Self { v, n, m, h }
    }

    /// True when no component is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.v.is_finite() && self.n.is_finite() && self.m.is_finite() && self.h.is_finite()
    }
}

/// Time derivatives of each state component (per ms)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StateDerivative {
    pub dv: f64,
    pub dn: f64,
    pub dm: f64,
    pub dh: f64,
}

/// Ionic currents through each channel (µA/mm², outward positive)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IonicCurrents {
    pub sodium: f64,
    pub potassium: f64,
    pub leak: f64,
}

impl IonicCurrents {
    pub fn total(&self) -> f64 {
        self.sodium + self.potassium + self.leak
    }
}
