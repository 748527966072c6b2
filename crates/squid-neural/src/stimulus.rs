// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Injected-current construction
//!
//! The driver accepts any `&[f64]`; this module only builds the usual test
//! inputs (zero baseline plus rectangular pulses or steps).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sampled injected current (µA/mm²), one sample per `dt`
#[derive(Debug, Clone, PartialEq)]
pub struct Stimulus {
    dt: f64,
    samples: Vec<f64>,
}

impl Stimulus {
    /// `round(duration_ms / dt)` zero samples
    pub fn zeros(duration_ms: f64, dt: f64) -> Self {
        let len = Self::index_of(duration_ms, dt);
        Self {
            dt,
            samples: vec![0.0; len],
        }
    }

    pub fn from_samples(samples: Vec<f64>, dt: f64) -> Self {
        Self { dt, samples }
    }

    #[inline]
    fn index_of(t_ms: f64, dt: f64) -> usize {
        let idx = (t_ms / dt).round();
        if idx.is_finite() && idx > 0.0 {
            idx as usize
        } else {
            0
        }
    }

    fn add_over(&mut self, start: usize, end: usize, amplitude: f64) {
        let end = end.min(self.samples.len());
        if start < end {
            for sample in &mut self.samples[start..end] {
                *sample += amplitude;
            }
        }
    }

    /// Add `amplitude` over `[onset, onset + width)`, clamped to the run
    pub fn with_pulse(mut self, onset_ms: f64, width_ms: f64, amplitude: f64) -> Self {
        let start = Self::index_of(onset_ms, self.dt);
        let end = Self::index_of(onset_ms + width_ms, self.dt);
        self.add_over(start, end, amplitude);
        self
    }

    /// Add `amplitude` from `onset` to the end of the run
    pub fn with_step(mut self, onset_ms: f64, amplitude: f64) -> Self {
        let start = Self::index_of(onset_ms, self.dt);
        let end = self.samples.len();
        self.add_over(start, end, amplitude);
        self
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn time_at(&self, index: usize) -> f64 {
        index as f64 * self.dt
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.samples
    }
}

impl AsRef<[f64]> for Stimulus {
    fn as_ref(&self) -> &[f64] {
        &self.samples
    }
}

/// Single rectangular pulse over a zero baseline
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PulseProtocol {
    /// Total simulated time (ms)
    pub duration_ms: f64,
    /// Pulse start (ms)
    pub onset_ms: f64,
    /// Pulse length (ms)
    pub width_ms: f64,
    /// Pulse current (µA/mm²)
    pub amplitude: f64,
}

impl PulseProtocol {
    pub fn build(&self, dt: f64) -> Stimulus {
        Stimulus::zeros(self.duration_ms, dt).with_pulse(
            self.onset_ms,
            self.width_ms,
            self.amplitude,
        )
    }

    pub fn with_amplitude(self, amplitude: f64) -> Self {
        Self { amplitude, ..self }
    }
}

impl Default for PulseProtocol {
    fn default() -> Self {
        Self {
            duration_ms: 1000.0,
            onset_ms: 200.0,
            width_ms: 10.0,
            amplitude: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_length() {
        assert_eq!(Stimulus::zeros(1000.0, 0.001).len(), 1_000_000);
        assert_eq!(Stimulus::zeros(10.0, 0.1).len(), 100);
        assert!(Stimulus::zeros(0.0, 0.1).is_empty());
    }

    #[test]
    fn test_pulse_index_boundaries() {
        let stim = Stimulus::zeros(10.0, 1.0).with_pulse(2.0, 3.0, 0.5);
        assert_eq!(
            stim.as_slice(),
            &[0.0, 0.0, 0.5, 0.5, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_pulse_clamped_to_run() {
        let stim = Stimulus::zeros(5.0, 1.0).with_pulse(3.0, 10.0, 1.0);
        assert_eq!(stim.as_slice(), &[0.0, 0.0, 0.0, 1.0, 1.0]);

        let late = Stimulus::zeros(5.0, 1.0).with_pulse(8.0, 1.0, 1.0);
        assert!(late.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_step_and_pulse_superpose() {
        let stim = Stimulus::zeros(4.0, 1.0).with_step(1.0, 0.1).with_pulse(2.0, 1.0, 0.2);
        let expected = [0.0, 0.1, 0.1 + 0.2, 0.1];
        for (got, want) in stim.as_slice().iter().zip(expected) {
            assert!((got - want).abs() < 1e-15);
        }
    }

    #[test]
    fn test_default_protocol_pulse_window() {
        let dt = 0.001;
        let stim = PulseProtocol::default().build(dt);
        let samples = stim.as_slice();
        assert_eq!(samples.len(), 1_000_000);
        assert_eq!(samples[199_999], 0.0);
        assert_eq!(samples[200_000], 0.2);
        assert_eq!(samples[209_999], 0.2);
        assert_eq!(samples[210_000], 0.0);
        assert_eq!(samples.iter().filter(|&&x| x != 0.0).count(), 10_000);
    }
}
