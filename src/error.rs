//! Error types for task construction and loading.

use thiserror::Error;

/// Result type for task operations.
pub type TaskResult<T> = Result<T, TaskError>;

/// Errors raised while building or loading a task.
///
/// Construction variants are contract violations of the task constructors.
/// Load variants come from the task description file format; the loader
/// absorbs them and substitutes the fallback task.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Multiple choice needs exactly four answers.
    #[error("multiple choice needs exactly {expected} answers, got {found}")]
    AnswerCount { expected: usize, found: usize },

    /// Correct answer letter outside A-D.
    #[error("correct answer must be A, B, C or D, got '{0}'")]
    AnswerLetter(char),

    /// Difficulty outside the 1-5 tiers.
    #[error("difficulty must be 1-5, got {0}")]
    Difficulty(i64),

    /// FFT buffer length is not a power of two.
    #[error("sample count {0} is not a power of two")]
    SampleCount(usize),

    /// A min/max range that is empty or not finite.
    #[error("invalid range for {name}: [{min}, {max}]")]
    InvalidRange { name: &'static str, min: f64, max: f64 },

    /// Match tolerance negative or not finite.
    #[error("tolerance must be a finite non-negative number, got {0}")]
    Tolerance(f64),

    /// Truth table without rows.
    #[error("truth table has no rows")]
    EmptyTruthTable,

    /// Truth table rows of differing lengths (or too short to hold an output).
    #[error("truth table row {row} has {found} columns, expected {expected}")]
    RaggedTruthTable {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// More truth table inputs than the grid has input rows.
    #[error("truth table has {found} inputs, grid supports at most {max}")]
    TooManyInputs { found: usize, max: usize },

    /// Circuit task without any usable gate.
    #[error("no usable gates available")]
    NoGatesAvailable,

    /// I/O error reading a task file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Task file with no directives.
    #[error("task file is empty")]
    EmptyFile,

    /// Unrecognized task kind code on line 1.
    #[error("unknown task kind code: {0}")]
    UnknownKind(String),

    /// Task file ended before a required directive.
    #[error("missing {what} (directive {line})")]
    MissingLine { what: &'static str, line: usize },

    /// Unparsable number.
    #[error("invalid number for {what}: '{value}'")]
    BadNumber { what: &'static str, value: String },

    /// Structurally malformed field.
    #[error("malformed {what}: '{value}'")]
    BadField { what: &'static str, value: String },
}
