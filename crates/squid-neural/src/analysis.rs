// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Spike detection and trace summaries
//!
//! Read-only helpers over a finished voltage trace. Nothing here feeds back
//! into the integration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::trajectory::Trajectory;

/// Conventional spike detection threshold (mV)
pub const DEFAULT_SPIKE_THRESHOLD: f64 = 0.0;

/// Indices `i` where `v[i - 1] <= threshold < v[i]`
pub fn detect_spikes(v: &[f64], threshold: f64) -> Vec<usize> {
    v.windows(2)
        .enumerate()
        .filter(|(_, w)| w[0] <= threshold && w[1] > threshold)
        .map(|(i, _)| i + 1)
        .collect()
}

/// Index and value of the largest sample, skipping NaN
pub fn peak(v: &[f64]) -> Option<(usize, f64)> {
    v.iter()
        .copied()
        .enumerate()
        .filter(|(_, x)| !x.is_nan())
        .fold(None, |best, (i, x)| match best {
            Some((_, b)) if b >= x => best,
            _ => Some((i, x)),
        })
}

/// Compact description of a run's voltage response
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpikeSummary {
    pub threshold_mv: f64,
    pub spike_count: usize,
    pub first_spike_ms: Option<f64>,
    pub peak_mv: Option<f64>,
    pub peak_ms: Option<f64>,
    pub final_mv: Option<f64>,
}

impl SpikeSummary {
    pub fn from_trajectory(trajectory: &Trajectory, threshold_mv: f64) -> Self {
        let spikes = trajectory.spike_indices(threshold_mv);
        let peak = peak(trajectory.voltage());
        Self {
            threshold_mv,
            spike_count: spikes.len(),
            first_spike_ms: spikes.first().map(|&i| trajectory.time_at(i)),
            peak_mv: peak.map(|(_, v)| v),
            peak_ms: peak.map(|(i, _)| trajectory.time_at(i)),
            final_mv: trajectory.voltage().last().copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_upward_crossings_only() {
        let v = [-65.0, -10.0, 5.0, 30.0, -2.0, -70.0, 0.0, 12.0];
        assert_eq!(detect_spikes(&v, 0.0), vec![2, 7]);
    }

    #[test]
    fn test_detect_spikes_short_traces() {
        assert!(detect_spikes(&[], 0.0).is_empty());
        assert!(detect_spikes(&[10.0], 0.0).is_empty());
    }

    #[test]
    fn test_peak_skips_nan() {
        assert_eq!(peak(&[1.0, f64::NAN, 3.0, 2.0]), Some((2, 3.0)));
        assert_eq!(peak(&[f64::NAN]), None);
        // First occurrence wins on ties
        assert_eq!(peak(&[4.0, 4.0]), Some((0, 4.0)));
    }

    #[test]
    fn test_summary_from_trajectory() {
        let v = vec![-65.0, -20.0, 35.0, 10.0, -70.0];
        let traj =
            Trajectory::from_parts(v, vec![0.0; 5], vec![0.0; 5], vec![0.0; 5], 0.5).unwrap();
        let summary = SpikeSummary::from_trajectory(&traj, DEFAULT_SPIKE_THRESHOLD);
        assert_eq!(summary.spike_count, 1);
        assert_eq!(summary.first_spike_ms, Some(1.0));
        assert_eq!(summary.peak_mv, Some(35.0));
        assert_eq!(summary.peak_ms, Some(1.0));
        assert_eq!(summary.final_mv, Some(-70.0));
    }
}
