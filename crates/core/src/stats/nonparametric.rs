//! Rank-based tests: Wilcoxon signed-rank, Mann-Whitney U, Wilcoxon
//! rank-sum and Kruskal-Wallis.

use super::descriptive::rank_average;
use super::{distribution_error, normal_p_value, standard_normal, Alternative, TestResult};
use crate::error::ComputationError;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Largest number of non-zero differences for the exact signed-rank distribution.
const WILCOXON_EXACT_MAX_N: usize = 50;
/// Largest per-sample size for the exact Mann-Whitney distribution.
const MANN_WHITNEY_EXACT_MAX_N: usize = 20;

/// Wilcoxon signed-rank test of the null hypothesis that `differences` are
/// symmetric about zero.
///
/// Zero differences are discarded. Without ties and with at most 50
/// remaining differences the exact null distribution is used; otherwise a
/// tie-corrected normal approximation. The two-sided statistic is
/// `min(W+, W-)`, the one-sided statistic is `W+`.
///
/// # Errors
///
/// Returns [`ComputationError::InsufficientData`] if every difference is zero.
pub fn wilcoxon(
    differences: &[f64],
    alternative: Alternative,
) -> Result<TestResult, ComputationError> {
    let nonzero: Vec<f64> = differences.iter().copied().filter(|d| *d != 0.0).collect();
    let n = nonzero.len();
    if n == 0 {
        return Err(ComputationError::InsufficientData {
            test: "Wilcoxon signed-rank",
            min_required: 1,
            actual: 0,
        });
    }

    let magnitudes: Vec<f64> = nonzero.iter().map(|d| d.abs()).collect();
    let ranking = rank_average(&magnitudes);
    let w_plus: f64 = ranking
        .ranks
        .iter()
        .zip(&nonzero)
        .filter(|(_, d)| **d > 0.0)
        .map(|(r, _)| r)
        .sum();
    let nf = n as f64;
    let total = nf * (nf + 1.0) / 2.0;
    let w_minus = total - w_plus;

    let statistic = match alternative {
        Alternative::TwoSided => w_plus.min(w_minus),
        Alternative::Less | Alternative::Greater => w_plus,
    };

    let p_value = if n <= WILCOXON_EXACT_MAX_N && !ranking.has_ties() {
        let counts = signed_rank_counts(n);
        let outcomes = 2f64.powi(n as i32);
        let cumulative = |upto: usize| counts[..=upto].iter().sum::<f64>() / outcomes;
        let observed = w_plus.round() as usize;
        match alternative {
            Alternative::TwoSided => 2.0 * cumulative(w_plus.min(w_minus).round() as usize),
            Alternative::Less => cumulative(observed),
            Alternative::Greater => counts[observed..].iter().sum::<f64>() / outcomes,
        }
    } else {
        let expected = total / 2.0;
        let variance = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - ranking.tie_term() / 48.0;
        if variance <= 0.0 {
            return Err(ComputationError::ZeroVariance {
                test: "Wilcoxon signed-rank",
            });
        }
        normal_p_value((w_plus - expected) / variance.sqrt(), alternative)?
    };

    Ok(TestResult::new(statistic, p_value))
}

/// Number of sign assignments of ranks 1..=n giving each positive-rank sum.
fn signed_rank_counts(n: usize) -> Vec<f64> {
    let max_sum = n * (n + 1) / 2;
    let mut counts = vec![0.0; max_sum + 1];
    counts[0] = 1.0;
    for rank in 1..=n {
        for sum in (rank..=max_sum).rev() {
            counts[sum] += counts[sum - rank];
        }
    }
    counts
}

/// Mann-Whitney U test for two independent samples.
///
/// The statistic is U of `x`. Without ties and with at most 20 observations
/// per sample the exact null distribution is used; otherwise a normal
/// approximation with tie and continuity correction.
///
/// # Errors
///
/// - [`ComputationError::InsufficientData`] if either sample is empty
/// - [`ComputationError::ZeroVariance`] if every observation is tied
pub fn mann_whitney_u(
    x: &[f64],
    y: &[f64],
    alternative: Alternative,
) -> Result<TestResult, ComputationError> {
    let (n1, n2) = (x.len(), y.len());
    if n1 == 0 || n2 == 0 {
        return Err(ComputationError::InsufficientData {
            test: "Mann-Whitney U",
            min_required: 1,
            actual: n1.min(n2),
        });
    }

    let combined: Vec<f64> = x.iter().chain(y).copied().collect();
    let ranking = rank_average(&combined);
    let rank_sum_x: f64 = ranking.ranks[..n1].iter().sum();
    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let u = rank_sum_x - n1f * (n1f + 1.0) / 2.0;

    let p_value = if !ranking.has_ties() && n1.max(n2) <= MANN_WHITNEY_EXACT_MAX_N {
        let counts = u_counts(n1, n2);
        let outcomes: f64 = counts.iter().sum();
        let observed = u.round() as usize;
        let lower = counts[..=observed].iter().sum::<f64>() / outcomes;
        let upper = counts[observed..].iter().sum::<f64>() / outcomes;
        match alternative {
            Alternative::TwoSided => 2.0 * lower.min(upper),
            Alternative::Less => lower,
            Alternative::Greater => upper,
        }
    } else {
        let n = n1f + n2f;
        let expected = n1f * n2f / 2.0;
        let variance = n1f * n2f / 12.0 * ((n + 1.0) - ranking.tie_term() / (n * (n - 1.0)));
        if variance <= 0.0 {
            return Err(ComputationError::ZeroVariance {
                test: "Mann-Whitney U",
            });
        }
        let sd = variance.sqrt();
        let normal = standard_normal()?;
        match alternative {
            Alternative::TwoSided => 2.0 * normal.sf(((u - expected).abs() - 0.5) / sd),
            Alternative::Less => normal.cdf((u - expected + 0.5) / sd),
            Alternative::Greater => normal.sf((u - expected - 0.5) / sd),
        }
    };

    Ok(TestResult::new(u, p_value))
}

/// Frequencies of each U value for sample sizes `n1` and `n2` under the null.
fn u_counts(n1: usize, n2: usize) -> Vec<f64> {
    // table[i][j][u]: arrangements of i x-values and j y-values giving U = u.
    let mut table: Vec<Vec<Vec<f64>>> = vec![vec![Vec::new(); n2 + 1]; n1 + 1];
    for i in 0..=n1 {
        for j in 0..=n2 {
            if i == 0 || j == 0 {
                table[i][j] = vec![1.0];
                continue;
            }
            let mut counts = vec![0.0; i * j + 1];
            // Largest value from y: U unchanged.
            for (u, c) in table[i][j - 1].iter().enumerate() {
                counts[u] += c;
            }
            // Largest value from x: it exceeds all j y-values.
            for (u, c) in table[i - 1][j].iter().enumerate() {
                counts[u + j] += c;
            }
            table[i][j] = counts;
        }
    }
    std::mem::take(&mut table[n1][n2])
}

/// Wilcoxon rank-sum test for two independent samples (normal approximation).
///
/// The statistic is the standardised rank sum of `x`.
///
/// # Errors
///
/// Returns [`ComputationError::InsufficientData`] if either sample is empty.
pub fn rank_sums(
    x: &[f64],
    y: &[f64],
    alternative: Alternative,
) -> Result<TestResult, ComputationError> {
    let (n1, n2) = (x.len(), y.len());
    if n1 == 0 || n2 == 0 {
        return Err(ComputationError::InsufficientData {
            test: "Wilcoxon rank-sum",
            min_required: 1,
            actual: n1.min(n2),
        });
    }

    let combined: Vec<f64> = x.iter().chain(y).copied().collect();
    let ranking = rank_average(&combined);
    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let rank_sum_x: f64 = ranking.ranks[..n1].iter().sum();
    let expected = n1f * (n1f + n2f + 1.0) / 2.0;
    let sd = (n1f * n2f * (n1f + n2f + 1.0) / 12.0).sqrt();
    let z = (rank_sum_x - expected) / sd;

    Ok(TestResult::new(z, normal_p_value(z, alternative)?))
}

/// Kruskal-Wallis H test of the null hypothesis that all groups share one
/// distribution. H is tie-corrected and compared with chi-square(k - 1).
///
/// # Errors
///
/// - [`ComputationError::InsufficientData`] with fewer than two groups or an empty group
/// - [`ComputationError::ZeroVariance`] if every observation is tied
pub fn kruskal(groups: &[&[f64]]) -> Result<TestResult, ComputationError> {
    let k = groups.len();
    if k < 2 {
        return Err(ComputationError::InsufficientData {
            test: "Kruskal-Wallis",
            min_required: 2,
            actual: k,
        });
    }
    if groups.iter().any(|g| g.is_empty()) {
        return Err(ComputationError::InsufficientData {
            test: "Kruskal-Wallis",
            min_required: 1,
            actual: 0,
        });
    }

    let combined: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let ranking = rank_average(&combined);
    let n = combined.len() as f64;

    let mut offset = 0;
    let mut weighted = 0.0;
    for group in groups {
        let rank_sum: f64 = ranking.ranks[offset..offset + group.len()].iter().sum();
        weighted += rank_sum * rank_sum / group.len() as f64;
        offset += group.len();
    }
    let h = 12.0 / (n * (n + 1.0)) * weighted - 3.0 * (n + 1.0);

    let correction = 1.0 - ranking.tie_term() / (n * n * n - n);
    if correction <= 0.0 {
        return Err(ComputationError::ZeroVariance {
            test: "Kruskal-Wallis",
        });
    }
    let h = h / correction;

    let dist = ChiSquared::new((k - 1) as f64).map_err(distribution_error)?;
    Ok(TestResult::new(h, dist.sf(h)))
}
