//! Entry point routing a mean comparison by column count.

use crate::selection::{compare_mean_to_ref_group, compare_mean_to_ref_value, compare_two_means};
use crate::types::{TestConfig, TestOutcome};
use easy_stat_core::{Dataset, DispatchConfig, DispatchError, ValidationError};
use serde::{Deserialize, Serialize};

/// Comparison chosen from the number of selected columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonPath {
    /// One column against a reference value.
    ReferenceValue,
    TwoMeans,
    /// Three or more columns.
    Groups,
}

impl ComparisonPath {
    /// # Errors
    ///
    /// Returns [`ValidationError::NoColumns`] for zero columns.
    pub fn for_column_count(count: usize) -> Result<Self, ValidationError> {
        match count {
            0 => Err(ValidationError::NoColumns),
            1 => Ok(Self::ReferenceValue),
            2 => Ok(Self::TwoMeans),
            _ => Ok(Self::Groups),
        }
    }
}

/// Compares the means of the selected columns with the appropriate test.
///
/// One column is tested against `test.reference`, two columns against each
/// other (paired when `test.dependent`), and three or more as independent
/// groups.
///
/// # Errors
///
/// - [`DispatchError::Validation`] for an empty selection or any argument
///   rejected by the routed comparison
/// - [`DispatchError::Computation`] if the chosen test cannot be computed
///
/// # Example
///
/// ```
/// use easy_stat_core::{Dataset, DispatchConfig};
/// use easy_stat_dispatch::{compare_mean, ChosenTest, TestConfig};
///
/// let dataset = Dataset::new()
///     .with_numeric("scores", vec![10.0, 12.0, 11.0, 13.0, 12.0, 11.0, 14.0, 12.0, 13.0, 11.0])
///     .unwrap();
/// let test = TestConfig::default().with_reference(12.0);
///
/// let outcome = compare_mean(&dataset, &["scores"], &test, &DispatchConfig::default()).unwrap();
/// assert_eq!(outcome.chosen_test, ChosenTest::OneSampleT);
/// assert!(!outcome.significant);
/// ```
pub fn compare_mean<S: AsRef<str>>(
    dataset: &Dataset,
    columns: &[S],
    test: &TestConfig,
    config: &DispatchConfig,
) -> Result<TestOutcome, DispatchError> {
    let path = ComparisonPath::for_column_count(columns.len())?;
    decision!(config, columns = columns.len(), ?path, "Routing mean comparison");
    match path {
        ComparisonPath::ReferenceValue => compare_mean_to_ref_value(dataset, columns, test, config),
        ComparisonPath::TwoMeans => compare_two_means(dataset, columns, test, config),
        ComparisonPath::Groups => compare_mean_to_ref_group(dataset, columns, test, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_selection_is_rejected() {
        let none: [&str; 0] = [];
        let err = compare_mean(
            &Dataset::new(),
            &none,
            &TestConfig::default(),
            &DispatchConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, DispatchError::from(ValidationError::NoColumns));
    }

    #[test]
    fn routes_by_arity() {
        assert_eq!(
            ComparisonPath::for_column_count(1),
            Ok(ComparisonPath::ReferenceValue)
        );
        assert_eq!(ComparisonPath::for_column_count(2), Ok(ComparisonPath::TwoMeans));
        assert_eq!(ComparisonPath::for_column_count(3), Ok(ComparisonPath::Groups));
    }

    proptest! {
        #[test]
        fn three_or_more_is_groups(count in 3usize..1000) {
            prop_assert_eq!(ComparisonPath::for_column_count(count), Ok(ComparisonPath::Groups));
        }
    }

    #[test]
    fn routed_errors_come_from_the_selected_path() {
        let dataset = Dataset::new()
            .with_numeric("a", vec![1.0, 2.0, 3.0])
            .unwrap()
            .with_numeric("b", vec![2.0, 3.0, 4.0])
            .unwrap();
        let config = DispatchConfig::default();

        // Single column without reference: reference-value path.
        let err = compare_mean(&dataset, &["a"], &TestConfig::default(), &config).unwrap_err();
        assert_eq!(err, DispatchError::from(ValidationError::MissingReference));

        // Three columns with one unknown: group path.
        let err = compare_mean(&dataset, &["a", "b", "c"], &TestConfig::default(), &config)
            .unwrap_err();
        assert_eq!(
            err,
            DispatchError::from(ValidationError::ColumnNotFound("c".to_string()))
        );
    }
}
