use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Sample count a series must exceed to count as "large".
pub const N_MAX: usize = 30;
/// Minimum count for a proportion sub-group.
pub const N_MIN: usize = 5;
/// Fraction of undersized sub-groups at which proportion checks fail.
pub const GROUP_UNDERSIZE_FRACTION: f64 = 0.2;
/// Significance threshold used by the normality and homogeneity diagnostics.
pub const DIAGNOSTIC_ALPHA: f64 = 0.1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub thresholds: Thresholds,
    pub homogeneity: HomogeneityMethod,
    /// Emit branch decisions at INFO instead of DEBUG.
    pub verbose: bool,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub n_max: usize,
    pub n_min: usize,
    pub group_undersize_fraction: f64,
    pub diagnostic_alpha: f64,
}

/// How variance homogeneity is diagnosed across a column group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomogeneityMethod {
    /// Levene's test across every column of the group.
    #[default]
    Levene,
    /// Legacy behaviour: Shapiro-Wilk on each column separately.
    PerColumnNormality,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    pub with_target: bool,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            n_max: N_MAX,
            n_min: N_MIN,
            group_undersize_fraction: GROUP_UNDERSIZE_FRACTION,
            diagnostic_alpha: DIAGNOSTIC_ALPHA,
        }
    }
}

impl Thresholds {
    /// Checks that the thresholds describe a usable configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidThreshold`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.n_min == 0 {
            return Err(ValidationError::InvalidThreshold(
                "n_min must be at least 1".to_string(),
            ));
        }
        if !(self.group_undersize_fraction > 0.0 && self.group_undersize_fraction <= 1.0) {
            return Err(ValidationError::InvalidThreshold(format!(
                "group_undersize_fraction must be in (0, 1], got {}",
                self.group_undersize_fraction
            )));
        }
        if !(self.diagnostic_alpha > 0.0 && self.diagnostic_alpha < 1.0) {
            return Err(ValidationError::InvalidThreshold(format!(
                "diagnostic_alpha must be in (0, 1), got {}",
                self.diagnostic_alpha
            )));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            with_target: false,
        }
    }
}

impl DispatchConfig {
    /// Returns a copy with decision logging raised to INFO.
    #[must_use]
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Returns a copy using the given homogeneity diagnostic.
    #[must_use]
    pub fn with_homogeneity(mut self, method: HomogeneityMethod) -> Self {
        self.homogeneity = method;
        self
    }
}
