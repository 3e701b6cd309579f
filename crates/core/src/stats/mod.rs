//! Statistical tests consumed by the dispatcher.
//!
//! Each test returns a [`TestResult`] holding the statistic and p-value, or a
//! [`ComputationError`] on degenerate input. Reference distributions come
//! from `statrs`.

mod contingency;
mod descriptive;
mod nonparametric;
mod normality;
mod parametric;
mod variance;

pub use contingency::{chi2_contingency, fisher_exact, mcnemar_exact, ContingencyTable};
pub use descriptive::{mean, median, rank_average, variance, Ranking};
pub use nonparametric::{kruskal, mann_whitney_u, rank_sums, wilcoxon};
pub use normality::{shapiro_wilk, SHAPIRO_MAX_N, SHAPIRO_MIN_N};
pub use parametric::{f_oneway, ttest_1samp, ttest_ind, ttest_rel};
pub use variance::levene;

use crate::error::ComputationError;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Statistic and p-value of a single test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub statistic: f64,
    pub p_value: f64,
}

impl TestResult {
    #[must_use]
    pub fn new(statistic: f64, p_value: f64) -> Self {
        Self {
            statistic,
            p_value: p_value.clamp(0.0, 1.0),
        }
    }
}

/// Alternative hypothesis for tests that admit a direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alternative {
    #[default]
    TwoSided,
    /// The first sample (or the sample vs. reference) is smaller.
    Less,
    /// The first sample (or the sample vs. reference) is larger.
    Greater,
}

pub(crate) fn distribution_error(e: impl std::fmt::Display) -> ComputationError {
    ComputationError::Distribution(e.to_string())
}

pub(crate) fn standard_normal() -> Result<Normal, ComputationError> {
    Normal::new(0.0, 1.0).map_err(distribution_error)
}

/// P-value of a standard normal statistic under `alternative`.
pub(crate) fn normal_p_value(z: f64, alternative: Alternative) -> Result<f64, ComputationError> {
    let normal = standard_normal()?;
    Ok(match alternative {
        Alternative::TwoSided => 2.0 * normal.sf(z.abs()),
        Alternative::Less => normal.cdf(z),
        Alternative::Greater => normal.sf(z),
    })
}

/// P-value of a Student-t statistic with `df` degrees of freedom under `alternative`.
pub(crate) fn student_p_value(
    t: f64,
    df: f64,
    alternative: Alternative,
) -> Result<f64, ComputationError> {
    let dist = StudentsT::new(0.0, 1.0, df).map_err(distribution_error)?;
    Ok(match alternative {
        Alternative::TwoSided => 2.0 * dist.sf(t.abs()),
        Alternative::Less => dist.cdf(t),
        Alternative::Greater => dist.sf(t),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_clamps_p_value() {
        assert!((TestResult::new(1.0, 1.2).p_value - 1.0).abs() < f64::EPSILON);
        assert!(TestResult::new(1.0, -1e-12).p_value.abs() < f64::EPSILON);
    }

    #[test]
    fn normal_p_value_at_196() {
        let p = normal_p_value(1.96, Alternative::TwoSided).unwrap();
        assert!((p - 0.05).abs() < 0.001, "p was {p}");

        let p = normal_p_value(1.96, Alternative::Greater).unwrap();
        assert!((p - 0.025).abs() < 0.001, "p was {p}");

        let p = normal_p_value(1.96, Alternative::Less).unwrap();
        assert!((p - 0.975).abs() < 0.001, "p was {p}");
    }

    #[test]
    fn student_p_value_symmetry() {
        let less = student_p_value(-1.5, 10.0, Alternative::Less).unwrap();
        let greater = student_p_value(1.5, 10.0, Alternative::Greater).unwrap();
        let two = student_p_value(1.5, 10.0, Alternative::TwoSided).unwrap();
        assert!((less - greater).abs() < 1e-12);
        assert!((two - 2.0 * greater).abs() < 1e-12);
    }

    #[test]
    fn student_p_value_rejects_bad_df() {
        assert!(student_p_value(1.0, 0.0, Alternative::TwoSided).is_err());
    }
}
