//! Weights for the composite improvement score.

use serde::{Deserialize, Serialize};

/// Weights of the four improvement sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentWeights {
    /// Share of critical items resolved (0.0-1.0)
    #[serde(default = "default_critical_resolution_weight")]
    pub critical_resolution: f64,

    /// Reduction of the total debt score (0.0-1.0)
    #[serde(default = "default_overall_improvement_weight")]
    pub overall_improvement: f64,

    /// Reduction of the average complexity (0.0-1.0)
    #[serde(default = "default_complexity_reduction_weight")]
    pub complexity_reduction: f64,

    /// Absence of newly introduced critical items (0.0-1.0)
    #[serde(default = "default_no_new_critical_weight")]
    pub no_new_critical: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            critical_resolution: default_critical_resolution_weight(),
            overall_improvement: default_overall_improvement_weight(),
            complexity_reduction: default_complexity_reduction_weight(),
            no_new_critical: default_no_new_critical_weight(),
        }
    }
}

impl ComponentWeights {
    pub fn is_valid_weight(weight: f64) -> bool {
        (0.0..=1.0).contains(&weight)
    }

    pub fn validate_weight(weight: f64, name: &str) -> Result<(), String> {
        if Self::is_valid_weight(weight) {
            Ok(())
        } else {
            Err(format!("{} weight must be between 0.0 and 1.0", name))
        }
    }

    fn sum(&self) -> f64 {
        self.critical_resolution
            + self.overall_improvement
            + self.complexity_reduction
            + self.no_new_critical
    }

    /// Validate each weight's range and that at least one weight is non-zero.
    pub fn validate(&self) -> Result<(), String> {
        Self::validate_weight(self.critical_resolution, "Critical resolution")?;
        Self::validate_weight(self.overall_improvement, "Overall improvement")?;
        Self::validate_weight(self.complexity_reduction, "Complexity reduction")?;
        Self::validate_weight(self.no_new_critical, "No new critical")?;

        if self.sum() <= 0.0 {
            return Err("at least one component weight must be positive".to_string());
        }
        Ok(())
    }

    /// Rescale weights so they sum to exactly 1.0.
    pub fn normalize(&mut self) {
        let sum = self.sum();
        if sum > 0.0 && (sum - 1.0).abs() > 0.001 {
            self.critical_resolution /= sum;
            self.overall_improvement /= sum;
            self.complexity_reduction /= sum;
            self.no_new_critical /= sum;
        }
    }
}

fn default_critical_resolution_weight() -> f64 {
    0.4
}

fn default_overall_improvement_weight() -> f64 {
    0.3
}

fn default_complexity_reduction_weight() -> f64 {
    0.2
}

fn default_no_new_critical_weight() -> f64 {
    0.1
}
