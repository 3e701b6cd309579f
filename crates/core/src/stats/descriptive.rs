//! Descriptive helpers shared by the tests.

/// Arithmetic mean, or NaN for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n - 1 denominator), or NaN with fewer than two values.
#[must_use]
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Median, or NaN for an empty slice.
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Average ranks of a sample together with its tie structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// 1-based rank of each input value, in input order. Ties share their mean rank.
    pub ranks: Vec<f64>,
    /// Size of every tie group with more than one member.
    pub ties: Vec<usize>,
}

impl Ranking {
    #[must_use]
    pub fn has_ties(&self) -> bool {
        !self.ties.is_empty()
    }

    /// Sum of `t^3 - t` over tie groups, used by tie corrections.
    #[must_use]
    pub fn tie_term(&self) -> f64 {
        self.ties
            .iter()
            .map(|&t| {
                let t = t as f64;
                t * t * t - t
            })
            .sum()
    }
}

/// Ranks values from 1..=n, assigning tied values their average rank.
#[must_use]
pub fn rank_average(values: &[f64]) -> Ranking {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; n];
    let mut ties = Vec::new();
    let mut start = 0;
    while start < n {
        let mut end = start;
        while end + 1 < n && values[order[end + 1]] == values[order[start]] {
            end += 1;
        }
        // Positions start..=end hold ranks start+1..=end+1.
        let rank = (start + end) as f64 / 2.0 + 1.0;
        for &idx in &order[start..=end] {
            ranks[idx] = rank;
        }
        if end > start {
            ties.push(end - start + 1);
        }
        start = end + 1;
    }

    Ranking { ranks, ties }
}
