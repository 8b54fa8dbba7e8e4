//! Repair Bay - puzzle task engine for a module-repair arcade game
//!
//! Core modules:
//! - `task`: Task handle, the three puzzle kinds, and the text loader
//! - `circuit`: Grid-based logic circuit editor and signal propagation
//! - `spectral`: Waveform synthesis and FFT spectrum analysis
//! - `session`: One repair attempt bound to the life-support meter
//! - `render`: Abstract drawing surface and shared widgets
//! - `settings`: Data-driven engine configuration

pub mod circuit;
pub mod error;
pub mod input;
pub mod render;
pub mod session;
pub mod settings;
pub mod spectral;
pub mod task;

pub use error::{TaskError, TaskResult};
pub use input::TaskInput;
pub use session::{LifeSupport, RepairSession, SessionPhase};
pub use settings::Settings;
pub use task::{Task, TaskKind, TaskKindCode};

/// Engine configuration constants
pub mod consts {
    /// Circuit grid dimensions (cells)
    pub const GRID_COLS: usize = 25;
    pub const GRID_ROWS: usize = 11;
    pub const GRID_CELLS: usize = GRID_COLS * GRID_ROWS;

    /// Inputs sit in column 1, one every third row starting at row 2
    pub const INPUT_COLUMN: usize = 1;
    pub const FIRST_INPUT_ROW: usize = 2;
    pub const INPUT_ROW_SPACING: usize = 3;
    /// Number of input rows that fit on the grid (rows 2, 5, 8)
    pub const MAX_INPUTS: usize = (GRID_ROWS - FIRST_INPUT_ROW).div_ceil(INPUT_ROW_SPACING);

    /// Output sits near the right edge, centered vertically
    pub const OUTPUT_COLUMN: usize = GRID_COLS - 2;
    pub const OUTPUT_ROW: usize = GRID_ROWS / 2;

    /// Upper bound on gates that fit on the grid without overlap
    pub const MAX_GATES: usize = GRID_CELLS / 9;

    /// Propagation pass cap. Every productive pass settles at least one cell
    /// signal or one gate input slot, so grids built through the editing API
    /// reach a fixed point strictly before this.
    pub const MAX_PROPAGATION_PASSES: usize = GRID_CELLS + 2 * MAX_GATES + 1;

    /// Spectral analyzer sampling
    pub const SAMPLE_RATE: f64 = 1000.0; // Hz
    pub const SPECTRUM_SAMPLES: usize = 256; // Power of 2 for FFT

    /// Bins above this fraction of the peak count as harmonics
    pub const HARMONIC_THRESHOLD: f64 = 0.05;
    /// Pulse train duty cycle
    pub const PULSE_DUTY: f64 = 0.1;
    /// Sinc envelope time scale (relative to frequency)
    pub const SINC_SCALE: f64 = 4.0;

    /// Spectral slider step per key press (fraction of the parameter range),
    /// never coarser than the match tolerance
    pub const SLIDER_STEP_FRACTION: f64 = 0.02;
    /// Amplitude is adjustable and checked only below this difficulty
    pub const AMPLITUDE_DIFFICULTY_CUTOFF: u8 = 3;

    /// Difficulty tiers
    pub const MIN_DIFFICULTY: u8 = 1;
    pub const MAX_DIFFICULTY: u8 = 5;

    /// Multiple-choice answers per question
    pub const ANSWER_COUNT: usize = 4;

    /// Logical canvas size the task screens are laid out for
    pub const LOGICAL_WIDTH: f32 = 1280.0;
    pub const LOGICAL_HEIGHT: f32 = 720.0;
}

/// Wrap a phase into [0, 2π)
#[inline]
pub fn wrap_phase(phase: f64) -> f64 {
    phase.rem_euclid(std::f64::consts::TAU)
}

/// Shortest angular distance between two phases, in [0, π]
#[inline]
pub fn phase_distance(a: f64, b: f64) -> f64 {
    let d = wrap_phase(a - b);
    d.min(std::f64::consts::TAU - d)
}
