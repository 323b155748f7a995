use serde::{Deserialize, Serialize};

/// Priority bucket of a debt item, derived from its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

/// Score cutoffs for the priority buckets.
///
/// Cutoffs are inclusive lower bounds and must be strictly ascending:
/// `medium < high < critical`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityThresholds {
    #[serde(default = "default_critical")]
    pub critical: f64,

    #[serde(default = "default_high")]
    pub high: f64,

    #[serde(default = "default_medium")]
    pub medium: f64,
}

impl Default for PriorityThresholds {
    fn default() -> Self {
        Self {
            critical: default_critical(),
            high: default_high(),
            medium: default_medium(),
        }
    }
}

impl PriorityThresholds {
    /// Cutoffs for reports whose scores run on a 10x scale.
    pub fn scaled() -> Self {
        Self {
            critical: 80.0,
            high: 60.0,
            medium: 40.0,
        }
    }

    pub fn classify(&self, score: f64) -> Priority {
        if score >= self.critical {
            Priority::Critical
        } else if score >= self.high {
            Priority::High
        } else if score >= self.medium {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    pub fn is_critical(&self, score: f64) -> bool {
        score >= self.critical
    }

    pub fn validate(&self) -> Result<(), String> {
        let all = [self.medium, self.high, self.critical];
        if all.iter().any(|t| !t.is_finite() || *t < 0.0) {
            return Err("priority thresholds must be finite and non-negative".to_string());
        }
        if !(self.medium < self.high && self.high < self.critical) {
            return Err(format!(
                "priority thresholds must ascend (medium {} < high {} < critical {})",
                self.medium, self.high, self.critical
            ));
        }
        Ok(())
    }
}

fn default_critical() -> f64 {
    8.0
}

fn default_high() -> f64 {
    6.0
}

fn default_medium() -> f64 {
    4.0
}

/// Composite score cutoffs for the final status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusThresholds {
    #[serde(default = "default_complete_at")]
    pub complete_at: f64,

    #[serde(default = "default_incomplete_at")]
    pub incomplete_at: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            complete_at: default_complete_at(),
            incomplete_at: default_incomplete_at(),
        }
    }
}

impl StatusThresholds {
    pub fn validate(&self) -> Result<(), String> {
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(self.complete_at) || !in_range(self.incomplete_at) {
            return Err("status thresholds must lie within 0..=100".to_string());
        }
        if self.incomplete_at > self.complete_at {
            return Err(format!(
                "incomplete_at ({}) must not exceed complete_at ({})",
                self.incomplete_at, self.complete_at
            ));
        }
        Ok(())
    }
}

fn default_complete_at() -> f64 {
    75.0
}

fn default_incomplete_at() -> f64 {
    40.0
}

/// Tolerance below which a score change counts as unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum ScoreTolerance {
    /// Fixed epsilon in score units
    Absolute(f64),
    /// Fraction of the before score, for whole-number score scales
    Relative(f64),
}

impl Default for ScoreTolerance {
    fn default() -> Self {
        Self::Absolute(0.01)
    }
}

impl ScoreTolerance {
    /// Epsilon to apply around a given before score.
    pub fn epsilon(&self, before: f64) -> f64 {
        match *self {
            Self::Absolute(eps) => eps,
            Self::Relative(fraction) => fraction * before.abs(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let value = match *self {
            Self::Absolute(v) | Self::Relative(v) => v,
        };
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(format!("score tolerance must be non-negative, got {}", value))
        }
    }
}

/// Named threshold sets for the score scales seen in debt reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdPreset {
    /// 8 / 6 / 4
    Standard,
    /// 80 / 60 / 40
    Scaled,
}

impl ThresholdPreset {
    pub fn thresholds(self) -> PriorityThresholds {
        match self {
            Self::Standard => PriorityThresholds::default(),
            Self::Scaled => PriorityThresholds::scaled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries_are_inclusive() {
        let t = PriorityThresholds::default();
        assert_eq!(t.classify(8.0), Priority::Critical);
        assert_eq!(t.classify(7.99), Priority::High);
        assert_eq!(t.classify(6.0), Priority::High);
        assert_eq!(t.classify(4.0), Priority::Medium);
        assert_eq!(t.classify(3.99), Priority::Low);
        assert_eq!(t.classify(0.0), Priority::Low);
    }

    #[test]
    fn test_scaled_preset_is_ten_times_standard() {
        let standard = ThresholdPreset::Standard.thresholds();
        let scaled = ThresholdPreset::Scaled.thresholds();
        assert_eq!(scaled.critical, standard.critical * 10.0);
        assert_eq!(scaled.high, standard.high * 10.0);
        assert_eq!(scaled.medium, standard.medium * 10.0);
    }

    #[test]
    fn test_validate_rejects_non_ascending() {
        let t = PriorityThresholds {
            critical: 6.0,
            high: 6.0,
            medium: 4.0,
        };
        assert!(t.validate().is_err());
        assert!(PriorityThresholds::default().validate().is_ok());
    }

    #[test]
    fn test_status_thresholds_validate_order() {
        let bad = StatusThresholds {
            complete_at: 40.0,
            incomplete_at: 75.0,
        };
        assert!(bad.validate().is_err());
        assert!(StatusThresholds::default().validate().is_ok());
    }

    #[test]
    fn test_relative_tolerance_scales_with_before() {
        let tol = ScoreTolerance::Relative(0.05);
        assert_eq!(tol.epsilon(20.0), 1.0);
        assert_eq!(ScoreTolerance::default().epsilon(20.0), 0.01);
        assert!(ScoreTolerance::Absolute(-1.0).validate().is_err());
    }
}
