//! Colored terminal summary.

use colored::*;

use crate::validation::{Severity, Status, ValidationReport};

fn status_label(status: Status) -> ColoredString {
    let label = status.to_string().to_uppercase();
    match status {
        Status::Complete => label.bright_green().bold(),
        Status::Incomplete => label.bright_yellow().bold(),
        Status::Failed => label.bright_red().bold(),
    }
}

fn severity_label(severity: Severity) -> ColoredString {
    let label = severity.to_string();
    match severity {
        Severity::Critical => label.red().bold(),
        Severity::High => label.red(),
        Severity::Medium => label.yellow(),
        Severity::Low => label.normal(),
    }
}

/// Pure: Format a report for terminal display.
pub fn format_terminal(report: &ValidationReport) -> String {
    let mut output = String::new();
    let divider = "=".repeat(44);

    output.push_str(&format!("{}\n", divider.bright_blue()));
    output.push_str(&format!("    {}\n", "Debt Improvement Validation".bright_white().bold()));
    output.push_str(&format!("{}\n", divider.bright_blue()));
    output.push_str(&format!(
        "Completion: {}\n",
        format!("{:.1}%", report.completion_percentage).bold()
    ));
    output.push_str(&format!("Status: {}\n", status_label(report.status)));

    let (b, a) = (&report.before_summary, &report.after_summary);
    output.push_str(&format!(
        "Items: {} -> {}   Critical: {} -> {}   Total score: {:.2} -> {:.2}\n\n",
        b.total_items, a.total_items, b.critical_items, a.critical_items, b.total_score, a.total_score
    ));

    if !report.improvements.is_empty() {
        output.push_str(&format!("{}\n", "✓ Improvements:".green()));
        for improvement in &report.improvements {
            output.push_str(&format!("  • {}\n", improvement));
        }
        output.push('\n');
    }

    if !report.remaining_issues.is_empty() {
        output.push_str(&format!("{}\n", "⚠ Remaining Issues:".yellow()));
        for issue in &report.remaining_issues {
            output.push_str(&format!("  • {}\n", issue));
        }
        output.push('\n');
    }

    if !report.gaps.is_empty() {
        output.push_str(&format!("{}\n", "Gaps:".bold()));
        for gap in report.gaps.values() {
            output.push_str(&format!(
                "  [{}] {} ({})\n      {}\n",
                severity_label(gap.severity),
                gap.description,
                gap.location.dimmed(),
                gap.suggested_fix
            ));
        }
    }

    if let Some(trend) = &report.trend_analysis {
        output.push_str(&format!("\nTrend: {}\n", trend.recommendation));
    }

    output
}
