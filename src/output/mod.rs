//! Report rendering.
//!
//! Each formatter is a pure function from a [`ValidationReport`] to a string;
//! writing the string anywhere is the caller's business.

mod formatters;
mod terminal;

pub use formatters::{format_json, format_markdown};
pub use terminal::format_terminal;

use anyhow::Result;
use clap::ValueEnum;

use crate::validation::ValidationReport;

/// Output format for validation reports.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
    Terminal,
}

/// Pure: Render a report in the requested format.
pub fn format_report(report: &ValidationReport, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => format_json(report)?,
        OutputFormat::Terminal => format_terminal(report),
        OutputFormat::Markdown => format_markdown(report),
    })
}
