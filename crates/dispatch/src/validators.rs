//! Argument guards run before any diagnostic or test.
//!
//! Every guard returns a [`ValidationError`] instead of logging and carrying
//! on, so a comparison never executes with invalid arguments.

use crate::types::Side;
use easy_stat_core::ValidationError;

/// Checks the number of selected columns against the comparison arity.
///
/// Aims 1 and 2 require exactly that many columns; an aim of 3 or more
/// accepts any selection of at least 3 columns.
///
/// # Errors
///
/// Returns [`ValidationError::ColumnCount`] on mismatch.
pub fn check_nb_cols<S: AsRef<str>>(columns: &[S], aim: usize) -> Result<(), ValidationError> {
    let actual = columns.len();
    let matches = match aim {
        0 => false,
        1 | 2 => actual == aim,
        _ => actual >= 3,
    };
    if matches {
        Ok(())
    } else {
        Err(ValidationError::ColumnCount { aim, actual })
    }
}

/// Checks that the significance level lies in the open interval (0, 1).
///
/// # Errors
///
/// Returns [`ValidationError::AlphaOutOfRange`] otherwise, NaN included.
pub fn check_alpha_value(alpha: f64) -> Result<(), ValidationError> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(ValidationError::AlphaOutOfRange(alpha))
    }
}

/// Parses a side label, failing on anything but `Two`, `Left` or `Right`.
///
/// # Errors
///
/// Returns [`ValidationError::UnknownSide`] for an unrecognised label.
pub fn check_side(side: &str) -> Result<Side, ValidationError> {
    side.parse()
}

/// Checks that a reference value is present and finite.
///
/// # Errors
///
/// - [`ValidationError::MissingReference`] if absent
/// - [`ValidationError::InvalidReference`] for NaN or infinity
pub fn check_reference(reference: Option<f64>) -> Result<f64, ValidationError> {
    match reference {
        None => Err(ValidationError::MissingReference),
        Some(value) if value.is_finite() => Ok(value),
        Some(value) => Err(ValidationError::InvalidReference(value)),
    }
}
