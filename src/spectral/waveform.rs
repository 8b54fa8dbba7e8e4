//! Periodic waveform synthesis
//!
//! Every kind shares the angular argument `2π·f·t + φ`.

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

use crate::consts::{PULSE_DUTY, SINC_SCALE};

/// Waveform shapes, each with a distinct spectral signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WaveformKind {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
    Sinc,
    Pulse,
}

impl WaveformKind {
    /// All kinds in cycling order
    pub const ALL: [WaveformKind; 6] = [
        WaveformKind::Sine,
        WaveformKind::Square,
        WaveformKind::Sawtooth,
        WaveformKind::Triangle,
        WaveformKind::Sinc,
        WaveformKind::Pulse,
    ];

    /// Name used in task files
    pub fn as_str(&self) -> &'static str {
        match self {
            WaveformKind::Sine => "SINE",
            WaveformKind::Square => "SQUARE",
            WaveformKind::Sawtooth => "SAWTOOTH",
            WaveformKind::Triangle => "TRIANGLE",
            WaveformKind::Sinc => "SINC",
            WaveformKind::Pulse => "PULSE",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WaveformKind::Sine => "Sine",
            WaveformKind::Square => "Square",
            WaveformKind::Sawtooth => "Sawtooth",
            WaveformKind::Triangle => "Triangle",
            WaveformKind::Sinc => "Sinc",
            WaveformKind::Pulse => "Pulse",
        }
    }

    /// Parse a task-file name (case-insensitive)
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
    }

    /// Step through `ALL` with wraparound
    pub fn cycle(self, direction: i32) -> Self {
        let len = Self::ALL.len() as i32;
        let index = Self::ALL.iter().position(|k| *k == self).unwrap_or(0) as i32;
        Self::ALL[(index + direction).rem_euclid(len) as usize]
    }
}

/// One side of a spectrum-matching puzzle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveParams {
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
    pub kind: WaveformKind,
}

impl WaveParams {
    pub fn new(amplitude: f64, frequency: f64, phase: f64, kind: WaveformKind) -> Self {
        Self {
            amplitude,
            frequency,
            phase,
            kind,
        }
    }

    /// Sample this waveform at time `t` (seconds)
    #[inline]
    pub fn sample(&self, t: f64) -> f64 {
        generate_sample(t, self.amplitude, self.frequency, self.phase, self.kind)
    }
}

/// Generate a single waveform sample
pub fn generate_sample(t: f64, amplitude: f64, frequency: f64, phase: f64, kind: WaveformKind) -> f64 {
    let arg = TAU * frequency * t + phase;
    // Position within the current period, in [0, 1)
    let cycle = (arg / TAU).rem_euclid(1.0);

    match kind {
        WaveformKind::Sine => amplitude * arg.sin(),
        WaveformKind::Square => {
            let s = arg.sin();
            if s > 0.0 {
                amplitude
            } else if s < 0.0 {
                -amplitude
            } else {
                0.0
            }
        }
        // Ramp from -1 to 1 over each period
        WaveformKind::Sawtooth => amplitude * (2.0 * cycle - 1.0),
        // Folded sawtooth
        WaveformKind::Triangle => amplitude * (1.0 - 4.0 * (cycle - 0.5).abs()),
        WaveformKind::Sinc => {
            let x = frequency * t * SINC_SCALE;
            if x.abs() < 0.001 {
                return amplitude;
            }
            amplitude * (PI * x).sin() / (PI * x) * arg.cos()
        }
        WaveformKind::Pulse => {
            if cycle < PULSE_DUTY {
                amplitude
            } else {
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_name_case_insensitive() {
        assert_eq!(WaveformKind::from_name("square"), Some(WaveformKind::Square));
        assert_eq!(WaveformKind::from_name(" SawTooth "), Some(WaveformKind::Sawtooth));
        assert_eq!(WaveformKind::from_name("cosine"), None);
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(WaveformKind::Sine.cycle(-1), WaveformKind::Pulse);
        assert_eq!(WaveformKind::Pulse.cycle(1), WaveformKind::Sine);
        assert_eq!(WaveformKind::Square.cycle(2), WaveformKind::Triangle);
    }

    #[test]
    fn test_sine_quarter_period() {
        // 1 Hz sine at t = 0.25s peaks
        let v = generate_sample(0.25, 2.0, 1.0, 0.0, WaveformKind::Sine);
        assert!((v - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_square_levels() {
        assert_eq!(generate_sample(0.1, 3.0, 1.0, 0.0, WaveformKind::Square), 3.0);
        assert_eq!(generate_sample(0.6, 3.0, 1.0, 0.0, WaveformKind::Square), -3.0);
        assert_eq!(generate_sample(0.0, 3.0, 1.0, 0.0, WaveformKind::Square), 0.0);
    }

    #[test]
    fn test_sawtooth_and_triangle_shape() {
        // Start of the period
        assert!((generate_sample(0.0, 1.0, 1.0, 0.0, WaveformKind::Sawtooth) + 1.0).abs() < 1e-12);
        assert!((generate_sample(0.5, 1.0, 1.0, 0.0, WaveformKind::Sawtooth)).abs() < 1e-12);
        assert!((generate_sample(0.0, 1.0, 1.0, 0.0, WaveformKind::Triangle) + 1.0).abs() < 1e-12);
        assert!((generate_sample(0.5, 1.0, 1.0, 0.0, WaveformKind::Triangle) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_phase_stays_in_range() {
        for i in 0..100 {
            let t = i as f64 * 0.013;
            let saw = generate_sample(t, 1.0, 3.0, -5.0, WaveformKind::Sawtooth);
            let tri = generate_sample(t, 1.0, 3.0, -5.0, WaveformKind::Triangle);
            assert!((-1.0..=1.0).contains(&saw));
            assert!((-1.0..=1.0).contains(&tri));
        }
    }

    #[test]
    fn test_pulse_duty_cycle() {
        let high = (0..1000)
            .map(|i| generate_sample((i as f64 + 0.5) / 1000.0, 1.0, 1.0, 0.0, WaveformKind::Pulse))
            .filter(|v| *v > 0.0)
            .count();
        assert_eq!(high, 100);
    }

    #[test]
    fn test_sinc_origin() {
        assert_eq!(generate_sample(0.0, 4.0, 50.0, 0.0, WaveformKind::Sinc), 4.0);
    }

    proptest! {
        #[test]
        fn prop_generate_sample_is_pure(
            t in 0.0f64..1.0,
            amplitude in -10.0f64..10.0,
            frequency in 0.0f64..500.0,
            phase in -10.0f64..10.0,
            kind_index in 0usize..6,
        ) {
            let kind = WaveformKind::ALL[kind_index];
            let a = generate_sample(t, amplitude, frequency, phase, kind);
            let b = generate_sample(t, amplitude, frequency, phase, kind);
            prop_assert_eq!(a.to_bits(), b.to_bits());
        }
    }
}
