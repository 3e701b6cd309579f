//! Rule-based selection of hypothesis tests.
//!
//! Given a [`Dataset`](easy_stat_core::Dataset), a selection of columns and
//! a [`TestConfig`], the comparison routines run diagnostics on the data
//! (normality, homogeneity, size) and execute the test whose assumptions
//! hold, returning a [`TestOutcome`].

// Decisions go to INFO when the dispatcher runs verbose, DEBUG otherwise.
macro_rules! decision {
    ($config:expr, $($arg:tt)+) => {
        if $config.verbose {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

pub mod diagnostics;
pub mod proportion;
pub mod router;
pub mod selection;
pub mod types;
pub mod validators;

pub use diagnostics::{
    check_group, check_homogeneity, check_normality, check_proportion_group, check_size,
    Diagnostic, GroupDiagnostics,
};
pub use proportion::{build_table, compare_proportion, select_proportion_test};
pub use router::{compare_mean, ComparisonPath};
pub use selection::{
    compare_mean_to_ref_group, compare_mean_to_ref_value, compare_two_means, select_group_test,
    select_reference_test, select_two_means_test,
};
pub use types::{ChosenTest, Side, TestConfig, TestOutcome};
pub use validators::{check_alpha_value, check_nb_cols, check_reference, check_side};
