//! Levene's test for equality of variances.

use super::descriptive::{mean, median};
use super::{distribution_error, TestResult};
use crate::error::ComputationError;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Levene's test of the null hypothesis that all groups share one variance.
///
/// Deviations are taken from each group's median (the Brown-Forsythe
/// variant), which keeps the test robust for skewed data. The statistic W
/// follows F(k - 1, N - k) under the null.
///
/// # Errors
///
/// - [`ComputationError::InsufficientData`] with fewer than two groups, an
///   empty group, or no residual degrees of freedom
/// - [`ComputationError::ZeroVariance`] when every group is constant
pub fn levene(groups: &[&[f64]]) -> Result<TestResult, ComputationError> {
    let k = groups.len();
    if k < 2 {
        return Err(ComputationError::InsufficientData {
            test: "Levene",
            min_required: 2,
            actual: k,
        });
    }
    if let Some(empty) = groups.iter().find(|g| g.is_empty()) {
        return Err(ComputationError::InsufficientData {
            test: "Levene",
            min_required: 1,
            actual: empty.len(),
        });
    }

    let total: usize = groups.iter().map(|g| g.len()).sum();
    if total <= k {
        return Err(ComputationError::InsufficientData {
            test: "Levene",
            min_required: k + 1,
            actual: total,
        });
    }

    let deviations: Vec<Vec<f64>> = groups
        .iter()
        .map(|g| {
            let centre = median(g);
            g.iter().map(|x| (x - centre).abs()).collect()
        })
        .collect();
    let group_means: Vec<f64> = deviations.iter().map(|z| mean(z)).collect();
    let grand_mean = deviations.iter().flatten().sum::<f64>() / total as f64;

    let between: f64 = deviations
        .iter()
        .zip(&group_means)
        .map(|(z, m)| z.len() as f64 * (m - grand_mean).powi(2))
        .sum();
    let within: f64 = deviations
        .iter()
        .zip(&group_means)
        .map(|(z, m)| z.iter().map(|v| (v - m).powi(2)).sum::<f64>())
        .sum();

    if within <= f64::EPSILON {
        return Err(ComputationError::ZeroVariance { test: "Levene" });
    }

    let df_between = (k - 1) as f64;
    let df_within = (total - k) as f64;
    let w = (df_within * between) / (df_between * within);

    let dist = FisherSnedecor::new(df_between, df_within).map_err(distribution_error)?;
    Ok(TestResult::new(w, dist.sf(w)))
}
