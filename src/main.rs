use anyhow::Result;
use clap::Parser;
use debtmap_validate::cli::{is_automation_mode, Cli, Commands};
use debtmap_validate::commands::{run_batch, validate_improvement, BatchConfig, ValidateConfig};
use debtmap_validate::observability::{init_tracing, install_panic_hook};
use debtmap_validate::validation::FixAttempts;

fn main() -> Result<()> {
    install_panic_hook();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            before,
            after,
            output,
            format,
            config,
            threshold_preset,
            match_mode,
            previous,
            successful,
            failed,
            total,
            strict,
            quiet,
            verbosity,
        } => {
            init_tracing(verbosity);
            let validate_config = ValidateConfig {
                before,
                after,
                output,
                format,
                config,
                preset: threshold_preset.map(Into::into),
                matching: match_mode.map(Into::into),
                previous,
                fix_attempts: FixAttempts::from_counts(successful, failed, total),
                quiet: quiet || is_automation_mode(),
            };
            let report = validate_improvement(validate_config)?;
            if strict && !report.is_complete() {
                std::process::exit(1);
            }
        }
        Commands::Batch {
            manifest,
            config,
            threshold_preset,
            format,
            jobs,
            strict,
            quiet,
            verbosity,
        } => {
            init_tracing(verbosity);
            let outcomes = run_batch(BatchConfig {
                manifest,
                config,
                preset: threshold_preset.map(Into::into),
                format,
                jobs,
                quiet: quiet || is_automation_mode(),
            })?;
            if strict && !outcomes.iter().all(|o| o.is_complete()) {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
