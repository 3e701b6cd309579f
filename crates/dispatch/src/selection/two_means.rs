//! Two columns, independent or paired.

use super::{conclude, note_ignored_side};
use crate::diagnostics::GroupDiagnostics;
use crate::types::{ChosenTest, TestConfig, TestOutcome};
use crate::validators::{check_alpha_value, check_nb_cols};
use easy_stat_core::stats::{mann_whitney_u, ttest_ind, ttest_rel, wilcoxon, Alternative};
use easy_stat_core::{Dataset, DispatchConfig, DispatchError, ValidationError};

/// Chooses the two-sample test from the diagnostics and pairing.
///
/// Independent samples: large samples pick Student or Welch on homogeneity;
/// small samples go to Mann-Whitney unless both are normal, then the same
/// homogeneity-gated choice applies. Paired samples use the paired t-test
/// unless they are both small and non-normal.
#[must_use]
pub const fn select_two_means_test(diagnostics: &GroupDiagnostics, dependent: bool) -> ChosenTest {
    if dependent {
        return if !diagnostics.large && !diagnostics.normal {
            ChosenTest::PairedWilcoxon
        } else {
            ChosenTest::PairedT
        };
    }
    if !diagnostics.large && !diagnostics.normal {
        return ChosenTest::MannWhitneyU;
    }
    if diagnostics.homogeneous {
        ChosenTest::StudentT
    } else {
        ChosenTest::WelchT
    }
}

/// Observations of two paired columns, dropping any pair with a missing side.
fn paired_observations(
    dataset: &Dataset,
    left: &str,
    right: &str,
) -> Result<(Vec<f64>, Vec<f64>), ValidationError> {
    let xs = dataset.raw_numeric(left)?;
    let ys = dataset.raw_numeric(right)?;
    if xs.len() != ys.len() {
        return Err(ValidationError::LengthMismatch {
            left: left.to_string(),
            left_len: xs.len(),
            right: right.to_string(),
            right_len: ys.len(),
        });
    }
    let (xs, ys): (Vec<f64>, Vec<f64>) = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(x, y)| (*x, *y))
        .unzip();
    if xs.is_empty() {
        return Err(ValidationError::EmptyColumn(left.to_string()));
    }
    Ok((xs, ys))
}

/// Tests whether the means of two columns differ.
///
/// With `test.dependent` set the columns are treated as paired observations
/// and must have the same length.
///
/// # Errors
///
/// - [`DispatchError::Validation`] for a selection other than two columns,
///   an invalid alpha, an unusable column, or paired columns of different length
/// - [`DispatchError::Computation`] if the chosen test cannot be computed
pub fn compare_two_means<S: AsRef<str>>(
    dataset: &Dataset,
    columns: &[S],
    test: &TestConfig,
    config: &DispatchConfig,
) -> Result<TestOutcome, DispatchError> {
    check_nb_cols(columns, 2)?;
    check_alpha_value(test.alpha)?;
    let (left, right) = (columns[0].as_ref(), columns[1].as_ref());
    let (xs, ys) = if test.dependent {
        paired_observations(dataset, left, right)?
    } else {
        (dataset.numeric(left)?, dataset.numeric(right)?)
    };

    let diagnostics = GroupDiagnostics::from_series(&[&xs, &ys], config);
    let chosen = select_two_means_test(&diagnostics, test.dependent);
    decision!(
        config,
        left,
        right,
        dependent = test.dependent,
        test = %chosen,
        "Selected two-sample test"
    );
    note_ignored_side(chosen, test, config);

    let alternative = test.side.alternative();
    let result = match chosen {
        ChosenTest::StudentT => ttest_ind(&xs, &ys, true, alternative)?,
        ChosenTest::WelchT => ttest_ind(&xs, &ys, false, alternative)?,
        ChosenTest::PairedT => ttest_rel(&xs, &ys, alternative)?,
        ChosenTest::PairedWilcoxon => {
            let differences: Vec<f64> = xs.iter().zip(&ys).map(|(x, y)| x - y).collect();
            wilcoxon(&differences, Alternative::TwoSided)?
        }
        _ => mann_whitney_u(&xs, &ys, Alternative::TwoSided)?,
    };
    Ok(conclude(chosen, result, test, config))
}
