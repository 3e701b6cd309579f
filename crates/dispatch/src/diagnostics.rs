//! Normality, homogeneity and size diagnostics feeding the selectors.
//!
//! Diagnostics never fail: a series the underlying test cannot judge
//! (too short, too long, constant) is reported as not satisfying the
//! assumption, which steers the selectors towards the robust branch.

use easy_stat_core::stats::{levene, shapiro_wilk, SHAPIRO_MAX_N, SHAPIRO_MIN_N};
use easy_stat_core::{Dataset, DispatchConfig, HomogeneityMethod, Thresholds, ValidationError};
use serde::{Deserialize, Serialize};

/// Returns true if the Shapiro-Wilk test does not reject normality.
#[must_use]
pub fn check_normality(series: &[f64], config: &DispatchConfig) -> bool {
    if series.len() < SHAPIRO_MIN_N || series.len() > SHAPIRO_MAX_N {
        tracing::debug!(n = series.len(), "Series outside Shapiro-Wilk range, treated as not normal");
        return false;
    }
    match shapiro_wilk(series) {
        Ok(result) => {
            decision!(
                config,
                n = series.len(),
                w = result.statistic,
                p_value = result.p_value,
                "Shapiro-Wilk normality check"
            );
            result.p_value > config.thresholds.diagnostic_alpha
        }
        Err(e) => {
            tracing::debug!(error = %e, "Shapiro-Wilk not computable, treated as not normal");
            false
        }
    }
}

/// Returns true if Levene's test does not reject equal variances.
///
/// Fewer than two groups are trivially homogeneous.
#[must_use]
pub fn check_homogeneity(groups: &[&[f64]], config: &DispatchConfig) -> bool {
    if groups.len() < 2 {
        return true;
    }
    match levene(groups) {
        Ok(result) => {
            decision!(
                config,
                groups = groups.len(),
                w = result.statistic,
                p_value = result.p_value,
                "Levene homogeneity check"
            );
            result.p_value > config.thresholds.diagnostic_alpha
        }
        Err(e) => {
            tracing::debug!(error = %e, "Levene not computable, treated as not homogeneous");
            false
        }
    }
}

/// Returns true if the series is large enough for asymptotic tests.
#[must_use]
pub fn check_size(series: &[f64], thresholds: &Thresholds) -> bool {
    series.len() > thresholds.n_max
}

/// Assumption evaluated over a selection of columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Diagnostic {
    Normality,
    Homogeneity,
    Size,
}

/// Normality and size must hold for every series. Homogeneity compares the
/// series with each other, or requires each to be normal under
/// [`HomogeneityMethod::PerColumnNormality`].
fn evaluate(diagnostic: Diagnostic, series: &[&[f64]], config: &DispatchConfig) -> bool {
    let verdict = match diagnostic {
        Diagnostic::Normality => series.iter().all(|s| check_normality(s, config)),
        Diagnostic::Size => series.iter().all(|s| check_size(s, &config.thresholds)),
        Diagnostic::Homogeneity => match config.homogeneity {
            HomogeneityMethod::Levene => check_homogeneity(series, config),
            HomogeneityMethod::PerColumnNormality => {
                series.iter().all(|s| check_normality(s, config))
            }
        },
    };
    tracing::debug!(?diagnostic, series = series.len(), verdict, "Group diagnostic");
    verdict
}

/// Evaluates a diagnostic over the named columns.
///
/// Missing observations are dropped from each column independently.
///
/// # Errors
///
/// - [`ValidationError::NoColumns`] for an empty selection
/// - any column lookup error from [`Dataset::numeric`]
pub fn check_group<S: AsRef<str>>(
    dataset: &Dataset,
    columns: &[S],
    diagnostic: Diagnostic,
    config: &DispatchConfig,
) -> Result<bool, ValidationError> {
    if columns.is_empty() {
        return Err(ValidationError::NoColumns);
    }
    let series = columns
        .iter()
        .map(|name| dataset.numeric(name.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    let slices: Vec<&[f64]> = series.iter().map(Vec::as_slice).collect();
    Ok(evaluate(diagnostic, &slices, config))
}

/// Returns true if the contingency cells are adequate for the chi-square
/// approximation.
///
/// Fails when any cell is empty or when the share of cells holding fewer
/// than `n_min` observations reaches `group_undersize_fraction`. An empty
/// list of cells is never adequate.
#[must_use]
pub fn check_proportion_group(counts: &[usize], thresholds: &Thresholds) -> bool {
    if counts.is_empty() || counts.contains(&0) {
        return false;
    }
    let undersized = counts.iter().filter(|&&c| c < thresholds.n_min).count();
    let fraction = undersized as f64 / counts.len() as f64;
    fraction < thresholds.group_undersize_fraction
}

/// Diagnostic verdicts consumed by the mean-comparison selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupDiagnostics {
    /// Every series holds more than `n_max` observations.
    pub large: bool,
    /// Every series passes the normality check.
    pub normal: bool,
    /// The series pass the homogeneity check.
    pub homogeneous: bool,
}

impl GroupDiagnostics {
    /// Runs the three diagnostics over the exact observations a test will use.
    #[must_use]
    pub fn from_series(series: &[&[f64]], config: &DispatchConfig) -> Self {
        let diagnostics = Self {
            large: evaluate(Diagnostic::Size, series, config),
            normal: evaluate(Diagnostic::Normality, series, config),
            homogeneous: evaluate(Diagnostic::Homogeneity, series, config),
        };
        decision!(
            config,
            large = diagnostics.large,
            normal = diagnostics.normal,
            homogeneous = diagnostics.homogeneous,
            "Diagnostics assessed"
        );
        diagnostics
    }
}
