// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Output traces of a completed run

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::analysis;
use crate::types::{Result, SimulationError, State};

/// Index-aligned voltage and gate traces
///
/// Entry `i` corresponds to simulated time `i · dt`. Only the driver builds a
/// trajectory from a stimulus; after that it is read-only.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "TrajectoryParts"))]
pub struct Trajectory {
    dt: f64,
    v: Vec<f64>,
    m: Vec<f64>,
    n: Vec<f64>,
    h: Vec<f64>,
}

/// Unchecked wire form; every load goes through [`Trajectory::from_parts`]
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct TrajectoryParts {
    dt: f64,
    v: Vec<f64>,
    m: Vec<f64>,
    n: Vec<f64>,
    h: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<TrajectoryParts> for Trajectory {
    type Error = SimulationError;

    fn try_from(parts: TrajectoryParts) -> Result<Self> {
        Trajectory::from_parts(parts.v, parts.m, parts.n, parts.h, parts.dt)
    }
}

impl Trajectory {
    /// Zero-filled traces of length `len`
    pub(crate) fn zeroed(len: usize, dt: f64) -> Self {
        Self {
            dt,
            v: vec![0.0; len],
            m: vec![0.0; len],
            n: vec![0.0; len],
            h: vec![0.0; len],
        }
    }

    /// Rebuild a trajectory from stored traces (e.g. a deserialized export)
    pub fn from_parts(
        v: Vec<f64>,
        m: Vec<f64>,
        n: Vec<f64>,
        h: Vec<f64>,
        dt: f64,
    ) -> Result<Self> {
        let expected = v.len();
        for actual in [m.len(), n.len(), h.len()] {
            if actual != expected {
                return Err(SimulationError::LengthMismatch { expected, actual });
            }
        }
        Ok(Self { dt, v, m, n, h })
    }

    #[inline]
    pub(crate) fn set(&mut self, index: usize, state: &State) {
        self.v[index] = state.v;
        self.m[index] = state.m;
        self.n[index] = state.n;
        self.h[index] = state.h;
    }

    pub fn len(&self) -> usize {
        self.v.len()
    }

    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }

    /// Time step the trajectory was produced with (ms)
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Membrane voltage trace (mV)
    pub fn voltage(&self) -> &[f64] {
        &self.v
    }

    /// Sodium activation trace
    pub fn m(&self) -> &[f64] {
        &self.m
    }

    /// Potassium activation trace
    pub fn n(&self) -> &[f64] {
        &self.n
    }

    /// Sodium inactivation trace
    pub fn h(&self) -> &[f64] {
        &self.h
    }

    /// Simulated time of sample `index` (ms)
    #[inline]
    pub fn time_at(&self, index: usize) -> f64 {
        index as f64 * self.dt
    }

    /// Time axis, computed by multiplication so it never drifts
    pub fn time_axis(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.time_at(i)).collect()
    }

    pub fn state_at(&self, index: usize) -> Option<State> {
        if index >= self.len() {
            return None;
        }
        Some(State::new(self.v[index], self.n[index], self.m[index], self.h[index]))
    }

    pub fn final_state(&self) -> Option<State> {
        self.len().checked_sub(1).and_then(|i| self.state_at(i))
    }

    /// Peak voltage (mV), ignoring NaN samples
    pub fn peak_voltage(&self) -> Option<f64> {
        analysis::peak(&self.v).map(|(_, v)| v)
    }

    /// Sample indices where V crosses `threshold` upward
    pub fn spike_indices(&self, threshold: f64) -> Vec<usize> {
        analysis::detect_spikes(&self.v, threshold)
    }

    /// Consume into `(V, m, n, h)`
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
        (self.v, self.m, self.n, self.h)
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_axis_is_exact_multiple() {
        let traj = Trajectory::zeroed(1_000_001, 0.001);
        let axis = traj.time_axis();
        assert_eq!(axis.len(), traj.len());
        assert_eq!(axis[0], 0.0);
        assert_eq!(axis[200_000], 200_000.0 * 0.001);
        assert_eq!(axis[1_000_000], 1_000_000.0 * 0.001);

        // A running sum would drift; the axis must not
        let mut t = 0.0;
        for _ in 0..1_000_000 {
            t += 0.001;
        }
        assert_ne!(t, axis[1_000_000]);
    }

    #[test]
    fn test_from_parts_rejects_ragged_traces() {
        let result =
            Trajectory::from_parts(vec![0.0; 3], vec![0.0; 3], vec![0.0; 2], vec![0.0; 3], 0.1);
        assert_eq!(
            result,
            Err(SimulationError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_state_at_bounds() {
        let mut traj = Trajectory::zeroed(2, 0.5);
        traj.set(1, &State::new(-60.0, 0.1, 0.2, 0.3));
        assert_eq!(traj.state_at(1), Some(State::new(-60.0, 0.1, 0.2, 0.3)));
        assert_eq!(traj.final_state(), traj.state_at(1));
        assert_eq!(traj.state_at(2), None);
        assert_eq!(Trajectory::zeroed(0, 0.5).final_state(), None);
    }

    #[test]
    fn test_into_parts_order() {
        let traj = Trajectory::from_parts(vec![1.0], vec![2.0], vec![3.0], vec![4.0], 0.1).unwrap();
        let (v, m, n, h) = traj.into_parts();
        assert_eq!((v[0], m[0], n[0], h[0]), (1.0, 2.0, 3.0, 4.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_export() {
        let traj =
            Trajectory::from_parts(vec![-65.0], vec![0.05], vec![0.31], vec![0.59], 0.01).unwrap();
        let json = traj.to_json().unwrap();
        let back: Trajectory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, traj);
        assert!(json.contains("\"dt\":0.01"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_with_ragged_traces_is_rejected() {
        let json = r#"{"dt":0.1,"v":[1.0,2.0],"m":[0.0],"n":[0.0],"h":[0.0]}"#;
        let err = serde_json::from_str::<Trajectory>(json).unwrap_err();
        assert!(err.to_string().contains("Length mismatch"), "unexpected error: {}", err);

        let json = r#"{"dt":0.1,"v":[1.0,2.0],"m":[0.0,0.1],"n":[0.2,0.3],"h":[0.4,0.5]}"#;
        let traj: Trajectory = serde_json::from_str(json).unwrap();
        assert_eq!(traj.state_at(1), Some(State::new(2.0, 0.3, 0.1, 0.5)));
    }
}
