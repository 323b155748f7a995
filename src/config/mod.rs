//! Configuration for snapshot comparison and improvement validation.
//!
//! One [`ValidationConfig`] carries every tunable the pipeline uses:
//! priority cutoffs, the unchanged-score tolerance, identity sensitivity,
//! component weights, the new-critical penalty, status cutoffs and gap caps.
//! It is passed by reference into every stage.
//!
//! Configuration is read from `.debtmap-validate.toml`:
//!
//! ```toml
//! new_critical_penalty = 25.0
//! matching = "function"
//!
//! [thresholds]
//! critical = 8.0
//! high = 6.0
//! medium = 4.0
//!
//! [tolerance]
//! mode = "absolute"
//! value = 0.01
//! ```

pub mod loader;
pub mod scoring;
pub mod thresholds;

pub use loader::{load_config, load_config_from_path, parse_and_validate_config};
pub use scoring::ComponentWeights;
pub use thresholds::{
    Priority, PriorityThresholds, ScoreTolerance, StatusThresholds, ThresholdPreset,
};

use serde::{Deserialize, Serialize};

use crate::errors::ValidateError;

/// Which identity fields take part in cross-snapshot matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSensitivity {
    /// file + function; survives line shifts caused by unrelated edits
    #[default]
    Function,
    /// file + function + line
    Exact,
}

/// Maximum number of gap records emitted per gap kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapLimits {
    #[serde(default = "default_critical_remaining")]
    pub critical_remaining: usize,

    #[serde(default = "default_insufficient_reduction")]
    pub insufficient_reduction: usize,

    #[serde(default = "default_regressions")]
    pub regressions: usize,

    #[serde(default = "default_new_critical")]
    pub new_critical: usize,
}

impl Default for GapLimits {
    fn default() -> Self {
        Self {
            critical_remaining: default_critical_remaining(),
            insufficient_reduction: default_insufficient_reduction(),
            regressions: default_regressions(),
            new_critical: default_new_critical(),
        }
    }
}

fn default_critical_remaining() -> usize {
    3
}

fn default_insufficient_reduction() -> usize {
    2
}

fn default_regressions() -> usize {
    2
}

fn default_new_critical() -> usize {
    2
}

/// Complete validation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub thresholds: PriorityThresholds,

    #[serde(default)]
    pub tolerance: ScoreTolerance,

    #[serde(default)]
    pub matching: MatchSensitivity,

    #[serde(default)]
    pub weights: ComponentWeights,

    /// Points deducted from the no-new-critical sub-score per new critical item
    #[serde(default = "default_new_critical_penalty")]
    pub new_critical_penalty: f64,

    #[serde(default)]
    pub status: StatusThresholds,

    #[serde(default)]
    pub gaps: GapLimits,

    /// Coverage percentage assumed for items whose report carries none
    #[serde(default = "default_assumed_coverage")]
    pub assumed_coverage: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            thresholds: PriorityThresholds::default(),
            tolerance: ScoreTolerance::default(),
            matching: MatchSensitivity::default(),
            weights: ComponentWeights::default(),
            new_critical_penalty: default_new_critical_penalty(),
            status: StatusThresholds::default(),
            gaps: GapLimits::default(),
            assumed_coverage: default_assumed_coverage(),
        }
    }
}

fn default_new_critical_penalty() -> f64 {
    25.0
}

fn default_assumed_coverage() -> f64 {
    100.0
}

impl ValidationConfig {
    /// Replace the priority cutoffs with a named preset.
    pub fn with_preset(mut self, preset: ThresholdPreset) -> Self {
        self.thresholds = preset.thresholds();
        self
    }

    pub fn with_matching(mut self, matching: MatchSensitivity) -> Self {
        self.matching = matching;
        self
    }

    /// Check every section and normalize the component weights.
    pub fn validated(mut self) -> Result<Self, ValidateError> {
        self.thresholds.validate().map_err(ValidateError::Config)?;
        self.status.validate().map_err(ValidateError::Config)?;
        self.tolerance.validate().map_err(ValidateError::Config)?;
        self.weights.validate().map_err(ValidateError::Config)?;

        if !(self.new_critical_penalty.is_finite() && self.new_critical_penalty >= 0.0) {
            return Err(ValidateError::Config(format!(
                "new_critical_penalty must be non-negative, got {}",
                self.new_critical_penalty
            )));
        }
        if !(0.0..=100.0).contains(&self.assumed_coverage) {
            return Err(ValidateError::Config(format!(
                "assumed_coverage must lie within 0..=100, got {}",
                self.assumed_coverage
            )));
        }

        self.weights.normalize();
        Ok(self)
    }
}
