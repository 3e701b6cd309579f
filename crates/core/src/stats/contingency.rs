//! Tests on contingency tables of counts: chi-square of independence,
//! Fisher's exact test and McNemar's exact test.

use super::{distribution_error, Alternative, TestResult};
use crate::error::ComputationError;
use statrs::distribution::{Binomial, ChiSquared, ContinuousCDF, DiscreteCDF};
use statrs::function::factorial::ln_binomial;

/// Relative tolerance when comparing hypergeometric probabilities.
const FISHER_RELATIVE_TOLERANCE: f64 = 1e-7;

/// Row-major table of non-negative counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContingencyTable {
    rows: usize,
    cols: usize,
    cells: Vec<u64>,
}

impl ContingencyTable {
    /// Builds a table from its rows.
    ///
    /// # Errors
    ///
    /// Returns [`ComputationError::Unsupported`] for an empty or ragged table.
    pub fn from_rows(rows: &[Vec<u64>]) -> Result<Self, ComputationError> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.is_empty() || cols == 0 {
            return Err(ComputationError::Unsupported(
                "contingency table has no cells".to_string(),
            ));
        }
        if rows.iter().any(|r| r.len() != cols) {
            return Err(ComputationError::Unsupported(
                "contingency table rows differ in length".to_string(),
            ));
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            cells: rows.iter().flatten().copied().collect(),
        })
    }

    /// Builds a table from its columns.
    ///
    /// # Errors
    ///
    /// Returns [`ComputationError::Unsupported`] for an empty or ragged table.
    pub fn from_columns(columns: &[Vec<u64>]) -> Result<Self, ComputationError> {
        let rows = columns.first().map_or(0, Vec::len);
        if columns.iter().any(|c| c.len() != rows) {
            return Err(ComputationError::Unsupported(
                "contingency table columns differ in length".to_string(),
            ));
        }
        let transposed: Vec<Vec<u64>> = (0..rows)
            .map(|r| columns.iter().map(|c| c[r]).collect())
            .collect();
        Self::from_rows(&transposed)
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> u64 {
        self.cells[row * self.cols + col]
    }

    /// Every cell, row-major.
    #[must_use]
    pub fn cells(&self) -> &[u64] {
        &self.cells
    }

    #[must_use]
    pub fn is_2x2(&self) -> bool {
        self.rows == 2 && self.cols == 2
    }

    #[must_use]
    pub fn row_totals(&self) -> Vec<u64> {
        self.cells.chunks(self.cols).map(|r| r.iter().sum()).collect()
    }

    #[must_use]
    pub fn col_totals(&self) -> Vec<u64> {
        (0..self.cols)
            .map(|c| (0..self.rows).map(|r| self.get(r, c)).sum())
            .collect()
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.cells.iter().sum()
    }

    fn require_2x2(&self, test: &str) -> Result<(), ComputationError> {
        if self.is_2x2() {
            Ok(())
        } else {
            Err(ComputationError::Unsupported(format!(
                "{test} requires a 2x2 table, got {}x{}",
                self.rows, self.cols
            )))
        }
    }
}

/// Pearson chi-square test of independence between rows and columns.
///
/// Yates' continuity correction is applied when the table has one degree of
/// freedom.
///
/// # Errors
///
/// Returns [`ComputationError::Unsupported`] for a table with fewer than two
/// rows or columns, or with an all-zero row or column.
pub fn chi2_contingency(table: &ContingencyTable) -> Result<TestResult, ComputationError> {
    if table.rows() < 2 || table.cols() < 2 {
        return Err(ComputationError::Unsupported(format!(
            "chi-square test needs at least a 2x2 table, got {}x{}",
            table.rows(),
            table.cols()
        )));
    }

    let row_totals = table.row_totals();
    let col_totals = table.col_totals();
    if row_totals.contains(&0) || col_totals.contains(&0) {
        return Err(ComputationError::Unsupported(
            "chi-square test is undefined with an all-zero row or column".to_string(),
        ));
    }

    let total = table.total() as f64;
    let dof = (table.rows() - 1) * (table.cols() - 1);
    let mut statistic = 0.0;
    for (r, row_total) in row_totals.iter().enumerate() {
        for (c, col_total) in col_totals.iter().enumerate() {
            let expected = *row_total as f64 * *col_total as f64 / total;
            let mut deviation = (table.get(r, c) as f64 - expected).abs();
            if dof == 1 {
                deviation -= deviation.min(0.5);
            }
            statistic += deviation * deviation / expected;
        }
    }

    let dist = ChiSquared::new(dof as f64).map_err(distribution_error)?;
    Ok(TestResult::new(statistic, dist.sf(statistic)))
}

/// Fisher's exact test on a 2x2 table.
///
/// The statistic is the sample odds ratio `(a * d) / (b * c)`. The two-sided
/// p-value sums every table with the observed margins that is no more
/// probable than the observed one. A table with an empty margin yields
/// p = 1 and an undefined (NaN) odds ratio.
///
/// # Errors
///
/// Returns [`ComputationError::Unsupported`] for any shape other than 2x2.
pub fn fisher_exact(
    table: &ContingencyTable,
    alternative: Alternative,
) -> Result<TestResult, ComputationError> {
    table.require_2x2("Fisher's exact test")?;
    let (a, b, c, d) = (table.get(0, 0), table.get(0, 1), table.get(1, 0), table.get(1, 1));

    let row_totals = table.row_totals();
    let col_totals = table.col_totals();
    if row_totals.contains(&0) || col_totals.contains(&0) {
        return Ok(TestResult::new(f64::NAN, 1.0));
    }

    let odds_ratio = if b > 0 && c > 0 {
        (a as f64 * d as f64) / (b as f64 * c as f64)
    } else {
        f64::INFINITY
    };

    let law = Hypergeometric::new(table.total(), row_totals[0], col_totals[0]);
    let p_value = match alternative {
        Alternative::Less => law.lower_tail(a),
        Alternative::Greater => law.upper_tail(a),
        Alternative::TwoSided => law.two_sided(a),
    };

    Ok(TestResult::new(odds_ratio, p_value))
}

/// Null distribution of the top-left cell of a 2x2 table with fixed margins.
///
/// Tail sums start next to the mode and walk outwards, stopping once a term
/// no longer changes the running sum, so huge margins stay cheap.
struct Hypergeometric {
    successes: u64,
    failures: u64,
    draws: u64,
    low: u64,
    high: u64,
    ln_denominator: f64,
}

impl Hypergeometric {
    fn new(population: u64, successes: u64, draws: u64) -> Self {
        let failures = population - successes;
        Self {
            successes,
            failures,
            draws,
            low: draws.saturating_sub(failures),
            high: successes.min(draws),
            ln_denominator: ln_binomial(population, draws),
        }
    }

    fn ln_pmf(&self, x: u64) -> f64 {
        ln_binomial(self.successes, x) + ln_binomial(self.failures, self.draws - x)
            - self.ln_denominator
    }

    fn mode(&self) -> u64 {
        let population = (self.successes + self.failures) as f64;
        let estimate = ((self.draws as f64 + 1.0) * (self.successes as f64 + 1.0)
            / (population + 2.0))
            .floor() as u64;
        let mut mode = estimate.clamp(self.low, self.high);
        while mode < self.high && self.ln_pmf(mode + 1) > self.ln_pmf(mode) {
            mode += 1;
        }
        while mode > self.low && self.ln_pmf(mode - 1) > self.ln_pmf(mode) {
            mode -= 1;
        }
        mode
    }

    /// Sums the pmf from `start` to `end` inclusive; terms must shrink
    /// moving away from `start`.
    fn tail(&self, start: u64, end: u64) -> f64 {
        let mut sum = 0.0;
        let mut x = start;
        loop {
            let p = self.ln_pmf(x).exp();
            sum += p;
            if x == end || p <= sum * f64::EPSILON {
                return sum;
            }
            x = if end > start { x + 1 } else { x - 1 };
        }
    }

    /// `P(X <= a)`
    fn lower_tail(&self, a: u64) -> f64 {
        if a < self.mode() {
            self.tail(a, self.low)
        } else if a == self.high {
            1.0
        } else {
            1.0 - self.tail(a + 1, self.high)
        }
    }

    /// `P(X >= a)`
    fn upper_tail(&self, a: u64) -> f64 {
        if a > self.mode() {
            self.tail(a, self.high)
        } else if a == self.low {
            1.0
        } else {
            1.0 - self.tail(a - 1, self.low)
        }
    }

    /// Total probability of the outcomes no more likely than `a`.
    fn two_sided(&self, a: u64) -> f64 {
        let threshold = self.ln_pmf(a) + FISHER_RELATIVE_TOLERANCE.ln_1p();
        let mode = self.mode();
        let mut total = 0.0;

        // The pmf rises on [low, mode] and falls on [mode + 1, high].
        if self.ln_pmf(self.low) <= threshold {
            let (mut lo, mut hi) = (self.low, mode);
            while lo < hi {
                let mid = lo + (hi - lo + 1) / 2;
                if self.ln_pmf(mid) <= threshold {
                    lo = mid;
                } else {
                    hi = mid - 1;
                }
            }
            total += self.tail(lo, self.low);
        }
        if mode < self.high && self.ln_pmf(self.high) <= threshold {
            let (mut lo, mut hi) = (mode + 1, self.high);
            while lo < hi {
                let mid = lo + (hi - lo) / 2;
                if self.ln_pmf(mid) <= threshold {
                    hi = mid;
                } else {
                    lo = mid + 1;
                }
            }
            total += self.tail(lo, self.high);
        }
        total
    }
}

/// McNemar's exact test for paired binary outcomes.
///
/// Only the discordant cells `b = table[0][1]` and `c = table[1][0]`
/// matter. The statistic is `min(b, c)`; the p-value is the two-sided
/// exact binomial probability under p = 0.5. Without discordant pairs the
/// p-value is 1.
///
/// # Errors
///
/// Returns [`ComputationError::Unsupported`] for any shape other than 2x2.
pub fn mcnemar_exact(table: &ContingencyTable) -> Result<TestResult, ComputationError> {
    table.require_2x2("McNemar's test")?;
    let b = table.get(0, 1);
    let c = table.get(1, 0);
    let discordant = b + c;
    let statistic = b.min(c);
    if discordant == 0 {
        return Ok(TestResult::new(0.0, 1.0));
    }

    let binomial = Binomial::new(0.5, discordant).map_err(distribution_error)?;
    let p_value = 2.0 * binomial.cdf(statistic);
    Ok(TestResult::new(statistic as f64, p_value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[[u64; 2]; 2]) -> ContingencyTable {
        ContingencyTable::from_rows(&[rows[0].to_vec(), rows[1].to_vec()]).unwrap()
    }

    // ============================================
    // ContingencyTable Tests
    // ============================================

    #[test]
    fn from_columns_transposes() {
        let t = ContingencyTable::from_columns(&[vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(t.rows(), 3);
        assert_eq!(t.cols(), 2);
        assert_eq!(t.cells(), &[1, 4, 2, 5, 3, 6]);
        assert_eq!(t.row_totals(), vec![5, 7, 9]);
        assert_eq!(t.col_totals(), vec![6, 15]);
        assert_eq!(t.total(), 21);
    }

    #[test]
    fn ragged_rows_rejected() {
        assert!(ContingencyTable::from_rows(&[vec![1, 2], vec![3]]).is_err());
        assert!(ContingencyTable::from_rows(&[]).is_err());
    }

    // ============================================
    // chi2_contingency Tests
    // ============================================

    #[test]
    fn chi2_with_yates_correction() {
        // Expected 15 in every cell, |O - E| = 5, corrected to 4.5.
        let t = table(&[[20, 10], [10, 20]]);
        let result = chi2_contingency(&t).unwrap();
        assert!((result.statistic - 5.4).abs() < 1e-9, "chi2 was {}", result.statistic);
        assert!((result.p_value - 0.0201).abs() < 1e-3, "p was {}", result.p_value);
    }

    #[test]
    fn chi2_larger_table_without_correction() {
        let t = ContingencyTable::from_rows(&[vec![10, 10, 10], vec![10, 10, 10]]).unwrap();
        let result = chi2_contingency(&t).unwrap();
        assert!(result.statistic.abs() < 1e-12);
        assert!((result.p_value - 1.0).abs() < 1e-9, "p was {}", result.p_value);
    }

    #[test]
    fn chi2_zero_margin_is_error() {
        let t = table(&[[0, 0], [5, 7]]);
        assert!(chi2_contingency(&t).is_err());
    }

    // ============================================
    // fisher_exact Tests
    // ============================================

    #[test]
    fn fisher_tea_tasting() {
        // Fisher's lady tasting tea: 3 of 4 cups correct.
        let t = table(&[[3, 1], [1, 3]]);
        let result = fisher_exact(&t, Alternative::TwoSided).unwrap();
        assert!((result.statistic - 9.0).abs() < 1e-12);
        assert!((result.p_value - 34.0 / 70.0).abs() < 1e-9, "p was {}", result.p_value);

        let greater = fisher_exact(&t, Alternative::Greater).unwrap();
        assert!((greater.p_value - 17.0 / 70.0).abs() < 1e-9, "p was {}", greater.p_value);
    }

    #[test]
    fn fisher_strong_association() {
        let t = table(&[[8, 0], [0, 8]]);
        let result = fisher_exact(&t, Alternative::TwoSided).unwrap();
        assert!(result.statistic.is_infinite());
        assert!(result.p_value < 0.001, "p was {}", result.p_value);
    }

    #[test]
    fn fisher_empty_margin_is_uninformative() {
        let t = table(&[[0, 0], [3, 4]]);
        let result = fisher_exact(&t, Alternative::TwoSided).unwrap();
        assert!(result.statistic.is_nan());
        assert!((result.p_value - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fisher_one_sided_tails() {
        let t = table(&[[3, 1], [1, 3]]);
        let less = fisher_exact(&t, Alternative::Less).unwrap();
        assert!((less.p_value - 69.0 / 70.0).abs() < 1e-9, "p was {}", less.p_value);

        // X = 8 is the largest attainable value: P(X >= 8) = 1 / C(16, 8).
        let t = table(&[[8, 0], [0, 8]]);
        let greater = fisher_exact(&t, Alternative::Greater).unwrap();
        assert!((greater.p_value - 1.0 / 12870.0).abs() < 1e-12, "p was {}", greater.p_value);
        let less = fisher_exact(&t, Alternative::Less).unwrap();
        assert!((less.p_value - 1.0).abs() < 1e-12, "p was {}", less.p_value);
    }

    #[test]
    fn fisher_huge_counts_do_not_overflow() {
        let t = table(&[[0, 5_000_000_000], [5_000_000_000, 1]]);

        let result = fisher_exact(&t, Alternative::TwoSided).unwrap();
        assert!(result.statistic.abs() < f64::EPSILON, "odds ratio was {}", result.statistic);
        assert!(result.p_value < 1e-12, "p was {}", result.p_value);

        let greater = fisher_exact(&t, Alternative::Greater).unwrap();
        assert!((greater.p_value - 1.0).abs() < 1e-12, "p was {}", greater.p_value);
    }

    #[test]
    fn fisher_huge_balanced_table_is_uninformative() {
        let n = 250_000_000;
        let t = table(&[[n, n], [n, n]]);
        let result = fisher_exact(&t, Alternative::TwoSided).unwrap();
        assert!((result.statistic - 1.0).abs() < 1e-12);
        assert!(result.p_value > 0.99, "p was {}", result.p_value);
    }

    #[test]
    fn fisher_rejects_larger_tables() {
        let t = ContingencyTable::from_rows(&[vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert!(matches!(
            fisher_exact(&t, Alternative::TwoSided),
            Err(ComputationError::Unsupported(_))
        ));
    }

    // ============================================
    // mcnemar_exact Tests
    // ============================================

    #[test]
    fn mcnemar_discordant_imbalance() {
        // b = 1, c = 9: p = 2 * P(X <= 1 | n = 10) = 2 * 11 / 1024.
        let t = table(&[[20, 1], [9, 15]]);
        let result = mcnemar_exact(&t).unwrap();
        assert!((result.statistic - 1.0).abs() < f64::EPSILON);
        assert!((result.p_value - 22.0 / 1024.0).abs() < 1e-9, "p was {}", result.p_value);
    }

    #[test]
    fn mcnemar_balanced_is_capped_at_one() {
        let t = table(&[[10, 5], [5, 10]]);
        let result = mcnemar_exact(&t).unwrap();
        assert!((result.p_value - 1.0).abs() < f64::EPSILON, "p was {}", result.p_value);
    }

    #[test]
    fn mcnemar_without_discordant_pairs() {
        let t = table(&[[10, 0], [0, 10]]);
        let result = mcnemar_exact(&t).unwrap();
        assert!((result.p_value - 1.0).abs() < f64::EPSILON);
    }
}
