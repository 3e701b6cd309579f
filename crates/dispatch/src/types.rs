//! Per-call test configuration and outcome types.

use easy_stat_core::stats::{Alternative, TestResult};
use easy_stat_core::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of the alternative hypothesis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Two,
    Left,
    Right,
}

impl Side {
    /// Recognised labels, in canonical order.
    pub const LABELS: [&'static str; 3] = ["Two", "Left", "Right"];

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Two => "Two",
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }

    /// Alternative hypothesis handed to directional tests.
    #[must_use]
    pub const fn alternative(&self) -> Alternative {
        match self {
            Self::Two => Alternative::TwoSided,
            Self::Left => Alternative::Less,
            Self::Right => Alternative::Greater,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Side {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Two" => Ok(Self::Two),
            "Left" => Ok(Self::Left),
            "Right" => Ok(Self::Right),
            other => Err(ValidationError::UnknownSide(other.to_string())),
        }
    }
}

/// Arguments of a single comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestConfig {
    /// Significance level, strictly between 0 and 1.
    pub alpha: f64,
    pub side: Side,
    /// Samples are paired (same subjects measured twice).
    pub dependent: bool,
    /// Reference value for the one-column comparison.
    pub reference: Option<f64>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            side: Side::Two,
            dependent: true,
            reference: None,
        }
    }
}

impl TestConfig {
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    #[must_use]
    pub fn with_dependent(mut self, dependent: bool) -> Self {
        self.dependent = dependent;
        self
    }

    #[must_use]
    pub fn with_reference(mut self, reference: f64) -> Self {
        self.reference = Some(reference);
        self
    }
}

/// Concrete test chosen by a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChosenTest {
    /// One-sample t-test against the reference value.
    OneSampleT,
    /// Wilcoxon signed-rank test of the column minus the reference value.
    WilcoxonSignedRank,
    /// Student's equal-variance two-sample t-test.
    StudentT,
    /// Welch's unequal-variance two-sample t-test.
    WelchT,
    MannWhitneyU,
    /// Paired-sample t-test.
    PairedT,
    /// Wilcoxon signed-rank test on paired differences.
    PairedWilcoxon,
    OneWayAnova,
    KruskalWallis,
    /// Chi-square test of independence.
    ChiSquare,
    FisherExact,
    McNemar,
}

impl ChosenTest {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OneSampleT => "one-sample t-test",
            Self::WilcoxonSignedRank => "Wilcoxon signed-rank test",
            Self::StudentT => "Student's t-test",
            Self::WelchT => "Welch's t-test",
            Self::MannWhitneyU => "Mann-Whitney U test",
            Self::PairedT => "paired t-test",
            Self::PairedWilcoxon => "paired Wilcoxon signed-rank test",
            Self::OneWayAnova => "one-way ANOVA",
            Self::KruskalWallis => "Kruskal-Wallis test",
            Self::ChiSquare => "chi-square test of independence",
            Self::FisherExact => "Fisher's exact test",
            Self::McNemar => "McNemar's exact test",
        }
    }

    /// Returns true for tests that assume normally distributed data.
    #[must_use]
    pub const fn is_parametric(&self) -> bool {
        matches!(
            self,
            Self::OneSampleT | Self::StudentT | Self::WelchT | Self::PairedT | Self::OneWayAnova
        )
    }

    /// Returns true if the test honours [`Side`].
    #[must_use]
    pub const fn is_directional(&self) -> bool {
        matches!(
            self,
            Self::OneSampleT | Self::StudentT | Self::WelchT | Self::PairedT | Self::FisherExact
        )
    }
}

impl fmt::Display for ChosenTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub chosen_test: ChosenTest,
    pub statistic: f64,
    pub p_value: f64,
    pub alpha: f64,
    /// `p_value < alpha`
    pub significant: bool,
}

impl TestOutcome {
    #[must_use]
    pub fn new(chosen_test: ChosenTest, result: TestResult, alpha: f64) -> Self {
        Self {
            chosen_test,
            statistic: result.statistic,
            p_value: result.p_value,
            alpha,
            significant: result.p_value < alpha,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_parses_known_labels() {
        for label in Side::LABELS {
            let side: Side = label.parse().unwrap();
            assert_eq!(side.label(), label);
        }
    }

    #[test]
    fn side_rejects_unknown_label() {
        assert_eq!(
            "Both".parse::<Side>(),
            Err(ValidationError::UnknownSide("Both".to_string()))
        );
        // Labels are case-sensitive.
        assert!("two".parse::<Side>().is_err());
    }

    #[test]
    fn side_maps_to_alternative() {
        assert_eq!(Side::Two.alternative(), Alternative::TwoSided);
        assert_eq!(Side::Left.alternative(), Alternative::Less);
        assert_eq!(Side::Right.alternative(), Alternative::Greater);
    }

    #[test]
    fn test_config_defaults() {
        let config = TestConfig::default();
        assert!((config.alpha - 0.05).abs() < f64::EPSILON);
        assert_eq!(config.side, Side::Two);
        assert!(config.dependent);
        assert!(config.reference.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = TestConfig::new(0.01)
            .with_side(Side::Left)
            .with_dependent(false)
            .with_reference(3.5);
        assert!((config.alpha - 0.01).abs() < f64::EPSILON);
        assert_eq!(config.side, Side::Left);
        assert!(!config.dependent);
        assert_eq!(config.reference, Some(3.5));
    }

    #[test]
    fn outcome_significance_is_strict() {
        let outcome = TestOutcome::new(ChosenTest::StudentT, TestResult::new(2.0, 0.05), 0.05);
        assert!(!outcome.significant);

        let outcome = TestOutcome::new(ChosenTest::StudentT, TestResult::new(2.0, 0.049), 0.05);
        assert!(outcome.significant);
    }

    #[test]
    fn chosen_test_classification() {
        assert!(ChosenTest::OneWayAnova.is_parametric());
        assert!(!ChosenTest::KruskalWallis.is_parametric());
        assert!(ChosenTest::FisherExact.is_directional());
        assert!(!ChosenTest::ChiSquare.is_directional());
    }

    #[test]
    fn outcome_serializes_roundtrip() {
        let outcome = TestOutcome::new(ChosenTest::WelchT, TestResult::new(-1.5, 0.2), 0.05);
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("WelchT"));

        let parsed: TestOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, outcome);
    }
}
