//! Spectral analysis module
//!
//! Pure functions only: waveform synthesis is a closed-form function of time,
//! and the analyzer samples it into a fixed power-of-two buffer before
//! running a recursive radix-2 FFT.

pub mod fft;
pub mod waveform;

pub use fft::{Spectrum, SpectrumAnalyzer, count_significant_harmonics, fft};
pub use waveform::{WaveParams, WaveformKind, generate_sample};
