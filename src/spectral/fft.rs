//! Recursive radix-2 FFT and single-sided magnitude spectra

use rustfft::num_complex::Complex64;
use std::f64::consts::TAU;

use super::waveform::{WaveParams, WaveformKind, generate_sample};
use crate::consts::{HARMONIC_THRESHOLD, SAMPLE_RATE, SPECTRUM_SAMPLES};
use crate::error::{TaskError, TaskResult};

const _: () = assert!(SPECTRUM_SAMPLES.is_power_of_two());

/// Fast Fourier transform (Cooley-Tukey, decimation in time)
///
/// Fails if `signal.len()` is not a power of two.
pub fn fft(signal: &[Complex64]) -> TaskResult<Vec<Complex64>> {
    if !signal.len().is_power_of_two() {
        return Err(TaskError::SampleCount(signal.len()));
    }
    Ok(fft_recursive(signal))
}

fn fft_recursive(signal: &[Complex64]) -> Vec<Complex64> {
    let n = signal.len();
    if n == 1 {
        return vec![signal[0]];
    }

    let even: Vec<Complex64> = signal.iter().step_by(2).copied().collect();
    let odd: Vec<Complex64> = signal.iter().skip(1).step_by(2).copied().collect();
    let even = fft_recursive(&even);
    let odd = fft_recursive(&odd);

    let half = n / 2;
    let mut out = vec![Complex64::new(0.0, 0.0); n];
    for k in 0..half {
        let twiddle = Complex64::from_polar(1.0, -TAU * k as f64 / n as f64);
        let term = twiddle * odd[k];
        out[k] = even[k] + term;
        out[k + half] = even[k] - term;
    }
    out
}

/// Number of bins whose magnitude exceeds 5% of the peak
pub fn count_significant_harmonics(magnitudes: &[f64]) -> usize {
    let peak = magnitudes.iter().copied().fold(0.0, f64::max);
    let threshold = peak * HARMONIC_THRESHOLD;
    magnitudes.iter().filter(|&&m| m > threshold).count()
}

/// Single-sided amplitude spectrum
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Bin magnitudes, scaled by 2/n
    pub magnitudes: Vec<f64>,
    /// Width of one bin in Hz
    pub bin_width: f64,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Largest bin magnitude (0 for an empty or silent spectrum)
    pub fn peak(&self) -> f64 {
        self.magnitudes.iter().copied().fold(0.0, f64::max)
    }

    /// Index of the strongest non-DC bin (0 if every bin is silent)
    pub fn dominant_bin(&self) -> usize {
        let mut best = 0;
        let mut best_mag = 0.0;
        for (i, &mag) in self.magnitudes.iter().enumerate().skip(1) {
            if mag > best_mag {
                best_mag = mag;
                best = i;
            }
        }
        best
    }

    /// Frequency (Hz) of the strongest non-DC bin
    pub fn dominant_frequency(&self) -> f64 {
        self.dominant_bin() as f64 * self.bin_width
    }

    pub fn significant_harmonics(&self) -> usize {
        count_significant_harmonics(&self.magnitudes)
    }
}

/// Samples waveforms into a fixed buffer and transforms them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumAnalyzer {
    sample_count: usize,
    sample_rate: f64,
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl SpectrumAnalyzer {
    /// 256 samples at 1 kHz
    pub const STANDARD: SpectrumAnalyzer = SpectrumAnalyzer {
        sample_count: SPECTRUM_SAMPLES,
        sample_rate: SAMPLE_RATE,
    };

    pub fn new(sample_count: usize, sample_rate: f64) -> TaskResult<Self> {
        if !sample_count.is_power_of_two() {
            return Err(TaskError::SampleCount(sample_count));
        }
        Ok(Self {
            sample_count,
            sample_rate,
        })
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Bins in the single-sided spectrum
    pub fn num_bins(&self) -> usize {
        self.sample_count / 2
    }

    /// Hz per bin: `sample_rate / (2 * num_bins)`
    pub fn bin_width(&self) -> f64 {
        self.sample_rate / (2.0 * self.num_bins() as f64)
    }

    /// Time-domain buffer for a waveform, starting at t = 0
    pub fn sample_buffer(&self, amplitude: f64, frequency: f64, phase: f64, kind: WaveformKind) -> Vec<f64> {
        (0..self.sample_count)
            .map(|i| {
                let t = i as f64 / self.sample_rate;
                generate_sample(t, amplitude, frequency, phase, kind)
            })
            .collect()
    }

    /// Magnitude spectrum of a synthesized waveform
    pub fn compute_spectrum(&self, amplitude: f64, frequency: f64, phase: f64, kind: WaveformKind) -> Spectrum {
        let signal: Vec<Complex64> = self
            .sample_buffer(amplitude, frequency, phase, kind)
            .into_iter()
            .map(|s| Complex64::new(s, 0.0))
            .collect();

        // Length is a power of two by construction
        let bins = fft_recursive(&signal);
        let scale = 2.0 / self.sample_count as f64;
        let magnitudes = bins
            .iter()
            .take(self.num_bins())
            .map(|c| c.norm() * scale)
            .collect();

        Spectrum {
            magnitudes,
            bin_width: self.bin_width(),
        }
    }

    pub fn spectrum_of(&self, params: &WaveParams) -> Spectrum {
        self.compute_spectrum(params.amplitude, params.frequency, params.phase, params.kind)
    }

    /// Dominant frequency of a magnitude slice produced by this analyzer
    pub fn find_dominant_frequency(&self, magnitudes: &[f64]) -> f64 {
        Spectrum {
            magnitudes: magnitudes.to_vec(),
            bin_width: self.sample_rate / (2.0 * magnitudes.len().max(1) as f64),
        }
        .dominant_frequency()
    }
}
