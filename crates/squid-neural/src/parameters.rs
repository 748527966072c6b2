// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Membrane constants for one simulation run

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{Result, SimulationError};

/// Physical constants of the membrane patch
///
/// Units are per mm² of membrane: capacitance in µF/mm², conductances in
/// mS/mm², reversal potentials in mV. Immutable for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParameterSet {
    /// Potassium reversal potential (mV)
    pub e_k: f64,
    /// Sodium reversal potential (mV)
    pub e_na: f64,
    /// Leak reversal potential (mV)
    pub e_l: f64,
    /// Membrane capacitance (µF/mm²)
    pub c_m: f64,
    /// Maximal sodium conductance (mS/mm²)
    pub g_na: f64,
    /// Maximal potassium conductance (mS/mm²)
    pub g_k: f64,
    /// Leak conductance (mS/mm²)
    pub g_l: f64,
}

impl ParameterSet {
    /// Classical squid giant axon constants
    pub const SQUID_AXON: ParameterSet = ParameterSet {
        e_k: -77.0,
        e_na: 50.0,
        e_l: -54.387,
        c_m: 0.01,
        g_na: 1.2,
        g_k: 0.36,
        g_l: 0.003,
    };

    pub fn new() -> Self {
        Self::default()
    }

    /// Check that capacitance and conductances are strictly positive and every
    /// constant is finite
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("c_m", self.c_m),
            ("g_na", self.g_na),
            ("g_k", self.g_k),
            ("g_l", self.g_l),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimulationError::InvalidParameter {
                    name,
                    reason: format!("must be finite and > 0, got {}", value),
                });
            }
        }

        let reversal = [("e_k", self.e_k), ("e_na", self.e_na), ("e_l", self.e_l)];
        for (name, value) in reversal {
            if !value.is_finite() {
                return Err(SimulationError::InvalidParameter {
                    name,
                    reason: format!("must be finite, got {}", value),
                });
            }
        }

        Ok(())
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::SQUID_AXON
    }
}
