//! Error taxonomy for test dispatch.
//!
//! Argument problems surface as [`ValidationError`] before any diagnostic or
//! test runs. Failures inside the statistical routines surface as
//! [`ComputationError`] and propagate unchanged.

use thiserror::Error;

/// Invalid arguments or data shape detected before any test executes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Significance level outside the open interval (0, 1).
    #[error("alpha must lie strictly between 0 and 1 (0.05 is customary), got {0}")]
    AlphaOutOfRange(f64),

    /// Side label not one of `Two`, `Left`, `Right`.
    #[error("side must be one of 'Two', 'Left', 'Right', got '{0}'")]
    UnknownSide(String),

    /// Column selection does not match the comparison arity.
    #[error("expected {} column(s) for aim {aim}, got {actual}", aim_requirement(.aim))]
    ColumnCount { aim: usize, actual: usize },

    /// Empty column selection.
    #[error("no columns selected")]
    NoColumns,

    /// One-sample comparison without a reference value.
    #[error("a reference value is required to compare a single column")]
    MissingReference,

    /// Reference value is NaN or infinite.
    #[error("reference value must be a finite float, got {0}")]
    InvalidReference(f64),

    /// Column not present in the dataset.
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    /// Column name appears twice in a dataset.
    #[error("column '{0}' already exists")]
    DuplicateColumn(String),

    /// Column is not numeric where numeric data is required.
    #[error("column '{0}' is not numeric")]
    NonNumericColumn(String),

    /// Column holds no usable observations.
    #[error("column '{0}' is empty")]
    EmptyColumn(String),

    /// Paired or tabular columns of different lengths.
    #[error("column '{left}' has {left_len} values but '{right}' has {right_len}")]
    LengthMismatch {
        left: String,
        left_len: usize,
        right: String,
        right_len: usize,
    },

    /// Contingency cell that is not a non-negative integer count.
    #[error("column '{column}' holds {value}, expected a non-negative integer count")]
    NonCountValue { column: String, value: f64 },

    /// Contingency table of the wrong shape for the chosen test.
    #[error("{test} requires a {expected} table, got {rows}x{cols}")]
    TableShape {
        test: &'static str,
        expected: &'static str,
        rows: usize,
        cols: usize,
    },

    /// Loaded thresholds are inconsistent.
    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),
}

fn aim_requirement(aim: &usize) -> String {
    if *aim >= 3 {
        "at least 3".to_string()
    } else {
        format!("exactly {aim}")
    }
}

/// Failures raised by the statistical routines on degenerate input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    /// Too few observations for the requested test.
    #[error("{test} needs at least {min_required} observations, got {actual}")]
    InsufficientData {
        test: &'static str,
        min_required: usize,
        actual: usize,
    },

    /// All observations identical, so the statistic is undefined.
    #[error("{test} is undefined for zero-variance input")]
    ZeroVariance { test: &'static str },

    /// A reference distribution could not be constructed.
    #[error("distribution error: {0}")]
    Distribution(String),

    /// Input the test cannot handle.
    #[error("unsupported input: {0}")]
    Unsupported(String),
}

/// Any failure of a comparison routine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("computation error: {0}")]
    Computation(#[from] ComputationError),
}

impl DispatchError {
    /// Returns true if the error was raised by an argument guard.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
