//! JSON and Markdown formatting for validation reports.

use anyhow::{Context, Result};

use crate::validation::ValidationReport;

/// Pure: Format a report as pretty-printed JSON.
pub fn format_json(report: &ValidationReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize validation report")
}

/// Pure: Format a report as Markdown.
pub fn format_markdown(report: &ValidationReport) -> String {
    let mut output = String::new();

    output.push_str("# Debt Improvement Validation\n\n");
    output.push_str(&format!(
        "**Completion**: {:.1}%\n",
        report.completion_percentage
    ));
    output.push_str(&format!("**Status**: {}\n", report.status));
    if let Some(attempt) = report.attempt_number {
        output.push_str(&format!("**Attempt**: {}\n", attempt));
    }
    output.push('\n');

    output.push_str("## Summary\n\n");
    output.push_str("| Metric | Before | After |\n");
    output.push_str("|---|---|---|\n");
    let (b, a) = (&report.before_summary, &report.after_summary);
    let rows = [
        ("Total items", b.total_items.to_string(), a.total_items.to_string()),
        ("Critical items", b.critical_items.to_string(), a.critical_items.to_string()),
        (
            "High priority items",
            b.high_priority_items.to_string(),
            a.high_priority_items.to_string(),
        ),
        ("Total score", format!("{:.2}", b.total_score), format!("{:.2}", a.total_score)),
        ("Average score", format!("{:.2}", b.average_score), format!("{:.2}", a.average_score)),
        (
            "Average complexity",
            format!("{:.2}", b.average_complexity),
            format!("{:.2}", a.average_complexity),
        ),
    ];
    for (metric, before, after) in rows {
        output.push_str(&format!("| {} | {} | {} |\n", metric, before, after));
    }
    output.push('\n');

    if !report.improvements.is_empty() {
        output.push_str("## Improvements\n\n");
        for improvement in &report.improvements {
            output.push_str(&format!("- {}\n", improvement));
        }
        output.push('\n');
    }

    if !report.remaining_issues.is_empty() {
        output.push_str("## Remaining Issues\n\n");
        for issue in &report.remaining_issues {
            output.push_str(&format!("- {}\n", issue));
        }
        output.push('\n');
    }

    if !report.gaps.is_empty() {
        output.push_str("## Gaps\n\n");
        for (key, gap) in &report.gaps {
            output.push_str(&format!("### {}\n\n", key));
            output.push_str(&format!("- **Description**: {}\n", gap.description));
            output.push_str(&format!("- **Location**: {}\n", gap.location));
            output.push_str(&format!("- **Severity**: {}\n", gap.severity));
            output.push_str(&format!("- **Suggested Fix**: {}\n", gap.suggested_fix));
            if let Some(target) = gap.target_score {
                output.push_str(&format!("- **Target Score**: {:.1}\n", target));
            }
            output.push('\n');
        }
    }

    if let Some(trend) = &report.trend_analysis {
        output.push_str("## Trend\n\n");
        output.push_str(&format!(
            "- **Direction**: {}\n- **Recommendation**: {}\n\n",
            trend.direction, trend.recommendation
        ));
    }

    if let Some(error) = &report.error {
        output.push_str("## Error\n\n");
        output.push_str(&format!("```\n{}\n```\n", error));
    }

    output
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{GapDetail, Severity, Status};

    fn create_test_report() -> ValidationReport {
        let mut report = ValidationReport::failure("unused", "unused");
        report.completion_percentage = 62.5;
        report.status = Status::Incomplete;
        report.improvements = vec!["Resolved 2 critical debt items".to_string()];
        report.remaining_issues = vec!["1 items worsened".to_string()];
        report.error = None;
        report
    }

    #[test]
    fn test_format_markdown_includes_headers() {
        let output = format_markdown(&create_test_report());

        assert!(output.contains("# Debt Improvement Validation"));
        assert!(output.contains("**Completion**: 62.5%"));
        assert!(output.contains("**Status**: incomplete"));
        assert!(output.contains("## Improvements"));
        assert!(output.contains("## Remaining Issues"));
        assert!(!output.contains("## Error"));
    }

    #[test]
    fn test_format_markdown_includes_gaps() {
        let mut report = create_test_report();
        report.gaps.insert(
            "regression_detected:src/a.rs:f".to_string(),
            GapDetail {
                description: "Debt score increased during refactoring".to_string(),
                location: "src/a.rs:f:10".to_string(),
                severity: Severity::High,
                suggested_fix: "Review changes".to_string(),
                original_score: Some(4.0),
                current_score: Some(9.0),
                target_score: None,
            },
        );

        let output = format_markdown(&report);

        assert!(output.contains("## Gaps"));
        assert!(output.contains("### regression_detected:src/a.rs:f"));
        assert!(output.contains("- **Severity**: high"));
    }

    #[test]
    fn test_format_json_parses_back() {
        let report = create_test_report();
        let json = format_json(&report).unwrap();
        let parsed: ValidationReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.completion_percentage, 62.5);
        assert_eq!(parsed.status, Status::Incomplete);
    }
}
