//! Parametric tests: Student-t family and one-way ANOVA.

use super::descriptive::{mean, variance};
use super::{distribution_error, student_p_value, Alternative, TestResult};
use crate::error::ComputationError;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

fn require(test: &'static str, min_required: usize, actual: usize) -> Result<(), ComputationError> {
    if actual < min_required {
        return Err(ComputationError::InsufficientData {
            test,
            min_required,
            actual,
        });
    }
    Ok(())
}

/// One-sample t-test of the null hypothesis `mean(data) == reference`.
///
/// # Errors
///
/// - [`ComputationError::InsufficientData`] for fewer than 2 observations
/// - [`ComputationError::ZeroVariance`] for a constant sample
pub fn ttest_1samp(
    data: &[f64],
    reference: f64,
    alternative: Alternative,
) -> Result<TestResult, ComputationError> {
    require("one-sample t-test", 2, data.len())?;

    let n = data.len() as f64;
    let std_error = (variance(data) / n).sqrt();
    if std_error < f64::EPSILON {
        return Err(ComputationError::ZeroVariance {
            test: "one-sample t-test",
        });
    }

    let t = (mean(data) - reference) / std_error;
    let p = student_p_value(t, n - 1.0, alternative)?;
    Ok(TestResult::new(t, p))
}

/// Two-sample t-test for independent samples.
///
/// With `equal_var` the pooled-variance Student test is used, otherwise
/// Welch's test with Welch-Satterthwaite degrees of freedom.
///
/// # Errors
///
/// - [`ComputationError::InsufficientData`] if either sample has fewer than 2 observations
/// - [`ComputationError::ZeroVariance`] if the standard error vanishes
pub fn ttest_ind(
    x: &[f64],
    y: &[f64],
    equal_var: bool,
    alternative: Alternative,
) -> Result<TestResult, ComputationError> {
    let test = if equal_var {
        "Student's t-test"
    } else {
        "Welch's t-test"
    };
    require(test, 2, x.len())?;
    require(test, 2, y.len())?;

    let n1 = x.len() as f64;
    let n2 = y.len() as f64;
    let v1 = variance(x);
    let v2 = variance(y);

    let (std_error, df) = if equal_var {
        let pooled = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / (n1 + n2 - 2.0);
        ((pooled * (1.0 / n1 + 1.0 / n2)).sqrt(), n1 + n2 - 2.0)
    } else {
        let a = v1 / n1;
        let b = v2 / n2;
        let df = (a + b).powi(2) / (a * a / (n1 - 1.0) + b * b / (n2 - 1.0));
        ((a + b).sqrt(), df)
    };
    if std_error < f64::EPSILON {
        return Err(ComputationError::ZeroVariance { test });
    }

    let t = (mean(x) - mean(y)) / std_error;
    let p = student_p_value(t, df, alternative)?;
    Ok(TestResult::new(t, p))
}

/// Paired-sample t-test on `x[i] - y[i]`.
///
/// # Errors
///
/// - [`ComputationError::Unsupported`] if the samples differ in length
/// - otherwise as [`ttest_1samp`] on the differences
pub fn ttest_rel(
    x: &[f64],
    y: &[f64],
    alternative: Alternative,
) -> Result<TestResult, ComputationError> {
    if x.len() != y.len() {
        return Err(ComputationError::Unsupported(format!(
            "paired t-test needs equal lengths, got {} and {}",
            x.len(),
            y.len()
        )));
    }
    let differences: Vec<f64> = x.iter().zip(y).map(|(a, b)| a - b).collect();
    ttest_1samp(&differences, 0.0, alternative).map_err(|e| match e {
        ComputationError::ZeroVariance { .. } => ComputationError::ZeroVariance {
            test: "paired t-test",
        },
        other => other,
    })
}

/// One-way ANOVA of the null hypothesis that all group means are equal.
///
/// # Errors
///
/// - [`ComputationError::InsufficientData`] with fewer than two groups, an
///   empty group, or no residual degrees of freedom
/// - [`ComputationError::ZeroVariance`] when every group is constant
pub fn f_oneway(groups: &[&[f64]]) -> Result<TestResult, ComputationError> {
    let k = groups.len();
    require("one-way ANOVA", 2, k)?;
    for group in groups {
        require("one-way ANOVA", 1, group.len())?;
    }
    let total: usize = groups.iter().map(|g| g.len()).sum();
    require("one-way ANOVA", k + 1, total)?;

    let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / total as f64;
    let mut between = 0.0;
    let mut within = 0.0;
    for group in groups {
        let m = mean(group);
        between += group.len() as f64 * (m - grand_mean).powi(2);
        within += group.iter().map(|v| (v - m).powi(2)).sum::<f64>();
    }
    if within <= f64::EPSILON {
        return Err(ComputationError::ZeroVariance {
            test: "one-way ANOVA",
        });
    }

    let df_between = (k - 1) as f64;
    let df_within = (total - k) as f64;
    let f = (between / df_between) / (within / df_within);

    let dist = FisherSnedecor::new(df_between, df_within).map_err(distribution_error)?;
    Ok(TestResult::new(f, dist.sf(f)))
}
