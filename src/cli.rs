use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{MatchSensitivity, ThresholdPreset};
use crate::output::OutputFormat;

/// Default report location used by the automation workflow.
pub const DEFAULT_OUTPUT: &str = ".prodigy/debtmap-validation.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PresetArg {
    /// Critical 8, high 6, medium 4 (default)
    Standard,
    /// Critical 80, high 60, medium 40 for 10x-scaled reports
    Scaled,
}

impl From<PresetArg> for ThresholdPreset {
    fn from(p: PresetArg) -> Self {
        match p {
            PresetArg::Standard => ThresholdPreset::Standard,
            PresetArg::Scaled => ThresholdPreset::Scaled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatchArg {
    /// Match on file and function; tolerates line shifts
    Function,
    /// Match on file, function and line
    Exact,
}

impl From<MatchArg> for MatchSensitivity {
    fn from(m: MatchArg) -> Self {
        match m {
            MatchArg::Function => MatchSensitivity::Function,
            MatchArg::Exact => MatchSensitivity::Exact,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "debtmap-validate")]
#[command(about = "Compare two debt reports and validate the improvement", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the improvement between a before and an after debt report
    Validate {
        /// Debt report captured before the change
        #[arg(long)]
        before: PathBuf,

        /// Debt report captured after the change
        #[arg(long)]
        after: PathBuf,

        /// Where to write the validation report
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Report format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Configuration file (defaults to .debtmap-validate.toml discovery)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Priority threshold preset
        #[arg(long = "threshold-preset", value_enum)]
        threshold_preset: Option<PresetArg>,

        /// Identity fields used to match items across reports
        #[arg(long = "match", value_enum)]
        match_mode: Option<MatchArg>,

        /// Previous validation report, for trend analysis
        #[arg(long)]
        previous: Option<PathBuf>,

        /// Successful fix attempts reported by the pipeline
        #[arg(long, env = "PRODIGY_FIX_SUCCESSFUL")]
        successful: Option<u32>,

        /// Failed fix attempts reported by the pipeline
        #[arg(long, env = "PRODIGY_FIX_FAILED")]
        failed: Option<u32>,

        /// Total fix attempts reported by the pipeline
        #[arg(long, env = "PRODIGY_FIX_TOTAL")]
        total: Option<u32>,

        /// Exit with status 1 unless the validation is complete
        #[arg(long)]
        strict: bool,

        /// Suppress the console summary
        #[arg(short, long)]
        quiet: bool,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Validate many independent before/after pairs listed in a manifest
    Batch {
        /// JSON list of {name, before, after, output}
        #[arg(long)]
        manifest: PathBuf,

        /// Configuration file applied to every pair
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Priority threshold preset
        #[arg(long = "threshold-preset", value_enum)]
        threshold_preset: Option<PresetArg>,

        /// Report format for every pair
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Number of worker threads (0 = all cores)
        #[arg(short = 'j', long = "jobs", default_value = "0")]
        jobs: usize,

        /// Exit with status 1 unless every pair is complete
        #[arg(long)]
        strict: bool,

        /// Suppress per-pair summary lines
        #[arg(short, long)]
        quiet: bool,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },
}

/// Check if running in automation mode (Prodigy workflow)
pub fn is_automation_mode() -> bool {
    env_flag("PRODIGY_AUTOMATION") || env_flag("PRODIGY_VALIDATION")
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .unwrap_or_default()
        .eq_ignore_ascii_case("true")
}
