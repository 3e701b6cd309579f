//! Comparison of proportions over a contingency table.
//!
//! The selected columns become the columns of the table and the dataset rows
//! become its rows, so every cell must hold a non-negative integer count.

use crate::diagnostics::check_proportion_group;
use crate::selection::{conclude, note_ignored_side};
use crate::types::{ChosenTest, TestConfig, TestOutcome};
use crate::validators::check_alpha_value;
use easy_stat_core::stats::{chi2_contingency, fisher_exact, mcnemar_exact};
use easy_stat_core::{ContingencyTable, Dataset, DispatchConfig, DispatchError, ValidationError};

/// Chooses the proportion test.
///
/// Paired outcomes use McNemar's test. Independent groups use the chi-square
/// test when the cells are adequately filled, Fisher's exact test otherwise.
#[must_use]
pub const fn select_proportion_test(dependent: bool, adequately_sized: bool) -> ChosenTest {
    if dependent {
        ChosenTest::McNemar
    } else if adequately_sized {
        ChosenTest::ChiSquare
    } else {
        ChosenTest::FisherExact
    }
}

fn as_count(column: &str, value: f64) -> Result<u64, ValidationError> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Ok(value as u64)
    } else {
        Err(ValidationError::NonCountValue {
            column: column.to_string(),
            value,
        })
    }
}

/// Builds a contingency table whose columns are the named dataset columns.
///
/// # Errors
///
/// - [`ValidationError::NoColumns`] for an empty selection
/// - [`ValidationError::LengthMismatch`] if the columns differ in length
/// - [`ValidationError::NonCountValue`] for a cell that is not a count
/// - [`ValidationError::TableShape`] for a table smaller than 2x2
pub fn build_table<S: AsRef<str>>(
    dataset: &Dataset,
    columns: &[S],
) -> Result<ContingencyTable, ValidationError> {
    let first = columns.first().ok_or(ValidationError::NoColumns)?.as_ref();
    let expected_len = dataset.raw_numeric(first)?.len();

    let mut counts = Vec::with_capacity(columns.len());
    for name in columns {
        let name = name.as_ref();
        let values = dataset.raw_numeric(name)?;
        if values.len() != expected_len {
            return Err(ValidationError::LengthMismatch {
                left: first.to_string(),
                left_len: expected_len,
                right: name.to_string(),
                right_len: values.len(),
            });
        }
        let column = values
            .iter()
            .map(|v| as_count(name, *v))
            .collect::<Result<Vec<_>, _>>()?;
        counts.push(column);
    }

    let shape_error = ValidationError::TableShape {
        test: "proportion comparison",
        expected: "at least 2x2",
        rows: expected_len,
        cols: columns.len(),
    };
    if expected_len < 2 || columns.len() < 2 {
        return Err(shape_error);
    }
    ContingencyTable::from_columns(&counts).map_err(|_| shape_error)
}

/// Tests whether proportions differ across the selected columns.
///
/// With `test.dependent` set the table must be 2x2 and is analysed with
/// McNemar's test. Otherwise the chi-square test is used when every cell
/// passes [`check_proportion_group`], Fisher's exact test when not.
///
/// # Errors
///
/// - [`DispatchError::Validation`] for an invalid alpha or table, or a paired
///   table that is not 2x2
/// - [`DispatchError::Computation`] if the chosen test cannot be computed,
///   including Fisher's exact test on a table larger than 2x2
pub fn compare_proportion<S: AsRef<str>>(
    dataset: &Dataset,
    columns: &[S],
    test: &TestConfig,
    config: &DispatchConfig,
) -> Result<TestOutcome, DispatchError> {
    check_alpha_value(test.alpha)?;
    let table = build_table(dataset, columns)?;
    if test.dependent && !table.is_2x2() {
        return Err(ValidationError::TableShape {
            test: "McNemar's test",
            expected: "2x2",
            rows: table.rows(),
            cols: table.cols(),
        }
        .into());
    }

    let cells: Vec<usize> = table.cells().iter().map(|&c| c as usize).collect();
    let adequately_sized = check_proportion_group(&cells, &config.thresholds);
    let chosen = select_proportion_test(test.dependent, adequately_sized);
    decision!(
        config,
        rows = table.rows(),
        cols = table.cols(),
        dependent = test.dependent,
        adequately_sized,
        test = %chosen,
        "Selected proportion test"
    );
    note_ignored_side(chosen, test, config);

    let result = match chosen {
        ChosenTest::McNemar => mcnemar_exact(&table)?,
        ChosenTest::ChiSquare => chi2_contingency(&table)?,
        _ => fisher_exact(&table, test.side.alternative())?,
    };
    Ok(conclude(chosen, result, test, config))
}
