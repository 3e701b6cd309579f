//! Three or more independent columns.

use super::{conclude, note_ignored_side};
use crate::diagnostics::GroupDiagnostics;
use crate::types::{ChosenTest, TestConfig, TestOutcome};
use crate::validators::{check_alpha_value, check_nb_cols};
use easy_stat_core::stats::{f_oneway, kruskal};
use easy_stat_core::{Dataset, DispatchConfig, DispatchError};

/// Chooses between one-way ANOVA and Kruskal-Wallis.
///
/// Large groups need only homogeneity for ANOVA; smaller groups need both
/// normality and homogeneity.
#[must_use]
pub const fn select_group_test(diagnostics: &GroupDiagnostics) -> ChosenTest {
    let parametric = if diagnostics.large {
        diagnostics.homogeneous
    } else {
        diagnostics.normal && diagnostics.homogeneous
    };
    if parametric {
        ChosenTest::OneWayAnova
    } else {
        ChosenTest::KruskalWallis
    }
}

/// Tests whether the means of three or more columns differ.
///
/// # Errors
///
/// - [`DispatchError::Validation`] for fewer than three columns, an invalid
///   alpha, or an unusable column
/// - [`DispatchError::Computation`] if the chosen test cannot be computed
pub fn compare_mean_to_ref_group<S: AsRef<str>>(
    dataset: &Dataset,
    columns: &[S],
    test: &TestConfig,
    config: &DispatchConfig,
) -> Result<TestOutcome, DispatchError> {
    check_nb_cols(columns, 3)?;
    check_alpha_value(test.alpha)?;
    let series = columns
        .iter()
        .map(|name| dataset.numeric(name.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    let groups: Vec<&[f64]> = series.iter().map(Vec::as_slice).collect();

    let diagnostics = GroupDiagnostics::from_series(&groups, config);
    let chosen = select_group_test(&diagnostics);
    decision!(config, groups = groups.len(), test = %chosen, "Selected k-group test");
    note_ignored_side(chosen, test, config);

    let result = match chosen {
        ChosenTest::OneWayAnova => f_oneway(&groups)?,
        _ => kruskal(&groups)?,
    };
    Ok(conclude(chosen, result, test, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use easy_stat_core::ValidationError;
    use proptest::prelude::*;

    // ============================================
    // Decision table
    // ============================================

    proptest! {
        #[test]
        fn anova_iff_assumptions_hold(large: bool, normal: bool, homogeneous: bool) {
            let d = GroupDiagnostics { large, normal, homogeneous };
            let chosen = select_group_test(&d);
            let parametric = homogeneous && (large || normal);
            prop_assert_eq!(chosen == ChosenTest::OneWayAnova, parametric);
        }

        #[test]
        fn normal_and_homogeneous_always_anova(large: bool) {
            let d = GroupDiagnostics { large, normal: true, homogeneous: true };
            prop_assert_eq!(select_group_test(&d), ChosenTest::OneWayAnova);
        }

        #[test]
        fn heterogeneous_always_kruskal(large: bool, normal: bool) {
            let d = GroupDiagnostics { large, normal, homogeneous: false };
            prop_assert_eq!(select_group_test(&d), ChosenTest::KruskalWallis);
        }
    }

    // ============================================
    // Executor
    // ============================================

    #[test]
    fn shifted_normal_groups_use_anova() {
        let dataset = Dataset::new()
            .with_numeric("a", vec![1.0, 2.0, 3.0, 4.0, 5.0])
            .unwrap()
            .with_numeric("b", vec![4.0, 5.0, 6.0, 7.0, 8.0])
            .unwrap()
            .with_numeric("c", vec![7.0, 8.0, 9.0, 10.0, 11.0])
            .unwrap();

        let outcome = compare_mean_to_ref_group(
            &dataset,
            &["a", "b", "c"],
            &TestConfig::default(),
            &DispatchConfig::default(),
        )
        .unwrap();

        assert_eq!(outcome.chosen_test, ChosenTest::OneWayAnova);
        // Between-group SS 90 over 2 df, within-group SS 30 over 12 df.
        assert!((outcome.statistic - 18.0).abs() < 1e-9, "F was {}", outcome.statistic);
        assert!(outcome.significant, "p was {}", outcome.p_value);
    }

    #[test]
    fn unequal_spread_uses_kruskal() {
        let dataset = Dataset::new()
            .with_numeric("tight", vec![9.9, 10.0, 10.1, 10.0, 9.9, 10.1, 10.0, 9.9, 10.1, 10.0])
            .unwrap()
            .with_numeric("wide", vec![0.0, 20.0, 5.0, 15.0, 2.0, 18.0, 8.0, 12.0, 1.0, 19.0])
            .unwrap()
            .with_numeric("mid", vec![8.0, 12.0, 9.0, 11.0, 10.0, 7.0, 13.0, 10.0, 9.5, 10.5])
            .unwrap();

        let outcome = compare_mean_to_ref_group(
            &dataset,
            &["tight", "wide", "mid"],
            &TestConfig::default(),
            &DispatchConfig::default(),
        )
        .unwrap();
        assert_eq!(outcome.chosen_test, ChosenTest::KruskalWallis);
    }

    #[test]
    fn two_columns_rejected() {
        let dataset = Dataset::new()
            .with_numeric("a", vec![1.0, 2.0])
            .unwrap()
            .with_numeric("b", vec![3.0, 4.0])
            .unwrap();

        let err = compare_mean_to_ref_group(
            &dataset,
            &["a", "b"],
            &TestConfig::default(),
            &DispatchConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            DispatchError::from(ValidationError::ColumnCount { aim: 3, actual: 2 })
        );
    }
}
