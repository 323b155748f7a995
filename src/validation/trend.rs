//! Trend analysis against a previous validation attempt.

use super::types::{TrendAnalysis, TrendDirection, ValidationReport};

/// Completion changes within this many points count as stable.
const STABLE_BAND: f64 = 5.0;

/// Pure: Compare the current completion score to a previous report.
pub fn calculate_trend_analysis(previous: &ValidationReport, current_score: f64) -> TrendAnalysis {
    let previous_completion = previous.completion_percentage;
    let change = current_score - previous_completion;

    let (direction, recommendation) = if change < -STABLE_BAND {
        (
            TrendDirection::Regression,
            "CRITICAL: Stop refactoring. Return to original plan and complete remaining items.",
        )
    } else if change > STABLE_BAND {
        (
            TrendDirection::Progress,
            "Continue completing remaining plan items.",
        )
    } else {
        (
            TrendDirection::Stable,
            "Progress stalled. Focus on completing specific plan items rather than refactoring.",
        )
    };

    TrendAnalysis {
        direction,
        previous_completion: Some(previous_completion),
        change: Some(change),
        recommendation: recommendation.to_string(),
    }
}

/// Pure: Attempt number following a previous report (first attempt is 1).
pub fn next_attempt_number(previous: &ValidationReport) -> u32 {
    previous.attempt_number.unwrap_or(1).saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn previous(score: f64, attempt: Option<u32>) -> ValidationReport {
        let mut report = ValidationReport::failure("", "");
        report.completion_percentage = score;
        report.attempt_number = attempt;
        report
    }

    #[test]
    fn test_trend_directions() {
        let prev = previous(50.0, None);
        assert_eq!(
            calculate_trend_analysis(&prev, 60.0).direction,
            TrendDirection::Progress
        );
        assert_eq!(
            calculate_trend_analysis(&prev, 40.0).direction,
            TrendDirection::Regression
        );
        assert_eq!(
            calculate_trend_analysis(&prev, 54.0).direction,
            TrendDirection::Stable
        );
    }

    #[test]
    fn test_trend_records_change() {
        let trend = calculate_trend_analysis(&previous(30.0, None), 80.0);
        assert_eq!(trend.previous_completion, Some(30.0));
        assert_eq!(trend.change, Some(50.0));
        assert!(trend.recommendation.starts_with("Continue"));
    }

    #[test]
    fn test_next_attempt_number() {
        assert_eq!(next_attempt_number(&previous(0.0, None)), 2);
        assert_eq!(next_attempt_number(&previous(0.0, Some(3))), 4);
    }

    #[test]
    fn test_next_attempt_number_saturates() {
        assert_eq!(next_attempt_number(&previous(0.0, Some(u32::MAX))), u32::MAX);
    }
}
