//! Shapiro-Wilk normality test.
//!
//! Uses Royston's (1995) approximation of the coefficients and of the null
//! distribution of W, valid for 3 <= n <= 5000.

use super::{distribution_error, standard_normal, TestResult};
use crate::error::ComputationError;
use statrs::distribution::ContinuousCDF;

/// Smallest sample the test accepts.
pub const SHAPIRO_MIN_N: usize = 3;
/// Largest sample for which the p-value approximation holds.
pub const SHAPIRO_MAX_N: usize = 5000;

const C1: [f64; 6] = [0.0, 0.221_157, -0.147_981, -2.071_190, 4.434_685, -2.706_056];
const C2: [f64; 6] = [0.0, 0.042_981, -0.293_762, -1.752_461, 5.682_633, -3.582_633];
const C3: [f64; 4] = [0.544, -0.399_78, 0.025_054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.778_57, 0.062_767, -0.002_032_2];
const C5: [f64; 4] = [-1.5861, -0.310_82, -0.083_751, 0.003_891_5];
const C6: [f64; 3] = [-0.4803, -0.082_676, 0.003_030_2];
const G: [f64; 2] = [-2.273, 0.459];

fn poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Shapiro-Wilk test of the null hypothesis that `data` is normally distributed.
///
/// Returns W as the statistic; small p-values reject normality.
///
/// # Errors
///
/// - [`ComputationError::InsufficientData`] for fewer than 3 observations
/// - [`ComputationError::Unsupported`] for more than 5000 observations
/// - [`ComputationError::ZeroVariance`] when every observation is identical
pub fn shapiro_wilk(data: &[f64]) -> Result<TestResult, ComputationError> {
    let n = data.len();
    if n < SHAPIRO_MIN_N {
        return Err(ComputationError::InsufficientData {
            test: "Shapiro-Wilk",
            min_required: SHAPIRO_MIN_N,
            actual: n,
        });
    }
    if n > SHAPIRO_MAX_N {
        return Err(ComputationError::Unsupported(format!(
            "Shapiro-Wilk supports at most {SHAPIRO_MAX_N} observations, got {n}"
        )));
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    let range = sorted[n - 1] - sorted[0];
    if range <= f64::EPSILON * sorted[n - 1].abs().max(1.0) {
        return Err(ComputationError::ZeroVariance {
            test: "Shapiro-Wilk",
        });
    }

    let coefficients = coefficients(n)?;
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let ssq: f64 = sorted.iter().map(|x| (x - mean).powi(2)).sum();
    let numerator: f64 = coefficients
        .iter()
        .enumerate()
        .map(|(i, a)| a * (sorted[n - 1 - i] - sorted[i]))
        .sum();
    let w = (numerator * numerator / ssq).min(1.0);

    let p_value = p_value(w, n)?;
    Ok(TestResult::new(w, p_value))
}

/// Upper half of the antisymmetric coefficient vector, largest pair first.
fn coefficients(n: usize) -> Result<Vec<f64>, ComputationError> {
    if n == 3 {
        return Ok(vec![std::f64::consts::FRAC_1_SQRT_2]);
    }

    let normal = standard_normal()?;
    let half = n / 2;
    let an25 = n as f64 + 0.25;
    // Expected normal order statistics of the lower half (negative values).
    let m: Vec<f64> = (1..=half)
        .map(|i| normal.inverse_cdf((i as f64 - 0.375) / an25))
        .collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / (n as f64).sqrt();

    let a1 = poly(&C1, rsn) - m[0] / ssumm2;
    let mut a = vec![0.0; half];
    a[0] = a1;

    let (first_scaled, fac) = if n > 5 {
        let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
        a[1] = a2;
        let fac = ((summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1])
            / (1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2))
            .sqrt();
        (2, fac)
    } else {
        let fac = ((summ2 - 2.0 * m[0] * m[0]) / (1.0 - 2.0 * a1 * a1)).sqrt();
        (1, fac)
    };
    if !fac.is_finite() || fac <= 0.0 {
        return Err(distribution_error(format!(
            "Shapiro-Wilk coefficients undefined for n = {n}"
        )));
    }

    for i in first_scaled..half {
        a[i] = -m[i] / fac;
    }
    Ok(a)
}

fn p_value(w: f64, n: usize) -> Result<f64, ComputationError> {
    if n == 3 {
        // Exact distribution of W for three observations.
        let p = 6.0 / std::f64::consts::PI
            * (w.sqrt().asin() - std::f64::consts::FRAC_PI_3);
        return Ok(p.max(0.0));
    }

    let normal = standard_normal()?;
    let nf = n as f64;
    let mut y = (1.0 - w).ln();
    let (mu, sigma) = if n <= 11 {
        let gamma = poly(&G, nf);
        if y >= gamma {
            return Ok(1e-99);
        }
        y = -(gamma - y).ln();
        (poly(&C3, nf), poly(&C4, nf).exp())
    } else {
        let ln_n = nf.ln();
        (poly(&C5, ln_n), poly(&C6, ln_n).exp())
    };

    Ok(normal.sf((y - mu) / sigma))
}
