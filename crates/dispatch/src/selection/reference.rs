//! One column against a reference value.

use super::{conclude, note_ignored_side};
use crate::diagnostics::GroupDiagnostics;
use crate::types::{ChosenTest, TestConfig, TestOutcome};
use crate::validators::{check_alpha_value, check_nb_cols, check_reference};
use easy_stat_core::stats::{ttest_1samp, wilcoxon, Alternative};
use easy_stat_core::{Dataset, DispatchConfig, DispatchError};

/// Chooses between the one-sample t-test and the Wilcoxon signed-rank test.
///
/// Only a small column that also fails normality goes non-parametric.
#[must_use]
pub const fn select_reference_test(diagnostics: &GroupDiagnostics) -> ChosenTest {
    if !diagnostics.large && !diagnostics.normal {
        ChosenTest::WilcoxonSignedRank
    } else {
        ChosenTest::OneSampleT
    }
}

/// Tests whether the mean of a single column differs from `test.reference`.
///
/// # Errors
///
/// - [`DispatchError::Validation`] for a selection other than one column,
///   an invalid alpha, a missing or non-finite reference, or an unusable column
/// - [`DispatchError::Computation`] if the chosen test cannot be computed
pub fn compare_mean_to_ref_value<S: AsRef<str>>(
    dataset: &Dataset,
    columns: &[S],
    test: &TestConfig,
    config: &DispatchConfig,
) -> Result<TestOutcome, DispatchError> {
    check_nb_cols(columns, 1)?;
    check_alpha_value(test.alpha)?;
    let reference = check_reference(test.reference)?;
    let column = columns[0].as_ref();
    let data = dataset.numeric(column)?;

    let diagnostics = GroupDiagnostics::from_series(&[&data], config);
    let chosen = select_reference_test(&diagnostics);
    decision!(config, column, reference, test = %chosen, "Selected reference-value test");
    note_ignored_side(chosen, test, config);

    let result = if chosen == ChosenTest::OneSampleT {
        ttest_1samp(&data, reference, test.side.alternative())?
    } else {
        let shifted: Vec<f64> = data.iter().map(|x| x - reference).collect();
        wilcoxon(&shifted, Alternative::TwoSided)?
    };
    Ok(conclude(chosen, result, test, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;
    use easy_stat_core::ValidationError;
    use proptest::prelude::*;

    const SCORES: [f64; 10] = [10.0, 12.0, 11.0, 13.0, 12.0, 11.0, 14.0, 12.0, 13.0, 11.0];

    fn exponential_scores(n: usize) -> Vec<f64> {
        (1..=n)
            .map(|i| -(1.0 - (i as f64 - 0.5) / n as f64).ln())
            .collect()
    }

    // ============================================
    // Decision table
    // ============================================

    proptest! {
        #[test]
        fn only_small_non_normal_goes_wilcoxon(large: bool, normal: bool, homogeneous: bool) {
            let d = GroupDiagnostics { large, normal, homogeneous };
            let expected = if !large && !normal {
                ChosenTest::WilcoxonSignedRank
            } else {
                ChosenTest::OneSampleT
            };
            prop_assert_eq!(select_reference_test(&d), expected);
        }
    }

    // ============================================
    // Executor
    // ============================================

    #[test]
    fn normal_scores_use_one_sample_t() {
        let dataset = Dataset::new().with_numeric("scores", SCORES.to_vec()).unwrap();
        let test = TestConfig::default().with_reference(12.0);

        let outcome =
            compare_mean_to_ref_value(&dataset, &["scores"], &test, &DispatchConfig::default())
                .unwrap();

        assert_eq!(outcome.chosen_test, ChosenTest::OneSampleT);
        assert!(
            (outcome.statistic + 0.2641).abs() < 1e-3,
            "t was {}",
            outcome.statistic
        );
        assert!((outcome.p_value - 0.7976).abs() < 1e-3, "p was {}", outcome.p_value);
        assert!(!outcome.significant);
    }

    #[test]
    fn skewed_small_column_uses_wilcoxon() {
        let dataset = Dataset::new()
            .with_numeric("wait", exponential_scores(20))
            .unwrap();
        let test = TestConfig::default().with_reference(5.0).with_side(Side::Left);

        let outcome =
            compare_mean_to_ref_value(&dataset, &["wait"], &test, &DispatchConfig::default())
                .unwrap();

        assert_eq!(outcome.chosen_test, ChosenTest::WilcoxonSignedRank);
        // Every observation lies below 5, so W+ is zero.
        assert!(outcome.statistic.abs() < 1e-12);
        assert!(outcome.significant, "p was {}", outcome.p_value);
    }

    #[test]
    fn large_skewed_column_uses_t() {
        let dataset = Dataset::new()
            .with_numeric("wait", exponential_scores(40))
            .unwrap();
        let test = TestConfig::default().with_reference(1.0);

        let outcome =
            compare_mean_to_ref_value(&dataset, &["wait"], &test, &DispatchConfig::default())
                .unwrap();
        assert_eq!(outcome.chosen_test, ChosenTest::OneSampleT);
    }

    #[test]
    fn validation_precedes_computation() {
        let dataset = Dataset::new().with_numeric("scores", SCORES.to_vec()).unwrap();
        let config = DispatchConfig::default();

        let err = compare_mean_to_ref_value(
            &dataset,
            &["scores"],
            &TestConfig::new(1.5).with_reference(12.0),
            &config,
        )
        .unwrap_err();
        assert_eq!(err, DispatchError::from(ValidationError::AlphaOutOfRange(1.5)));

        let err =
            compare_mean_to_ref_value(&dataset, &["scores"], &TestConfig::default(), &config)
                .unwrap_err();
        assert_eq!(err, DispatchError::from(ValidationError::MissingReference));

        let err = compare_mean_to_ref_value(
            &dataset,
            &["scores", "scores"],
            &TestConfig::default().with_reference(12.0),
            &config,
        )
        .unwrap_err();
        assert!(err.is_validation());
    }
}
