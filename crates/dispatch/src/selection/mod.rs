//! Selectors for comparisons of means.
//!
//! Each comparison is split into a pure decision function (`select_*`) over
//! [`GroupDiagnostics`](crate::diagnostics::GroupDiagnostics) and an executor
//! that validates the arguments, runs the diagnostics, and hands the data to
//! the chosen test.

mod groups;
mod reference;
mod two_means;

pub use groups::{compare_mean_to_ref_group, select_group_test};
pub use reference::{compare_mean_to_ref_value, select_reference_test};
pub use two_means::{compare_two_means, select_two_means_test};

use crate::types::{ChosenTest, Side, TestConfig, TestOutcome};
use easy_stat_core::stats::TestResult;
use easy_stat_core::DispatchConfig;

/// Logs the sidedness handed to a test that cannot honour it.
pub(crate) fn note_ignored_side(chosen: ChosenTest, test: &TestConfig, config: &DispatchConfig) {
    if test.side != Side::Two && !chosen.is_directional() {
        decision!(
            config,
            test = %chosen,
            side = %test.side,
            "Side ignored, test runs two-sided"
        );
    }
}

/// Wraps a test result into an outcome and logs it.
pub(crate) fn conclude(
    chosen: ChosenTest,
    result: TestResult,
    test: &TestConfig,
    config: &DispatchConfig,
) -> TestOutcome {
    let outcome = TestOutcome::new(chosen, result, test.alpha);
    decision!(
        config,
        test = %chosen,
        parametric = chosen.is_parametric(),
        statistic = outcome.statistic,
        p_value = outcome.p_value,
        alpha = outcome.alpha,
        significant = outcome.significant,
        "Test completed"
    );
    outcome
}
