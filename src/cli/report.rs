//! Run summary formatting.
//!
//! Diagnostics go through `tracing`; this module prints the user-facing
//! outcome of a command.

use std::{
    error::Error,
    io::{self, Write},
};

use colored::Colorize;

use super::commands::{
    CommandResult, CommandSummary, InitSummary, TranslateOutcome, TranslateSummary,
};
use crate::core::{JobReport, RunSummary};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print the result of a command to stdout.
pub fn print(result: &CommandResult, verbose: bool) {
    print_to(result, verbose, &mut io::stdout().lock());
}

/// Print the result of a command to a custom writer.
pub fn print_to<W: Write>(result: &CommandResult, verbose: bool, writer: &mut W) {
    match &result.summary {
        CommandSummary::Translate(summary) => print_translate(summary, verbose, writer),
        CommandSummary::Init(summary) => print_init(summary, writer),
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

fn counts(report: &JobReport, dry_run: bool) -> String {
    format!(
        "{} {}, {} from cache, {} from override",
        report.translated,
        if dry_run { "to translate" } else { "translated" },
        report.from_cache,
        report.from_override
    )
}

fn print_translate<W: Write>(summary: &TranslateSummary, verbose: bool, writer: &mut W) {
    match &summary.outcome {
        TranslateOutcome::Skipped { reason } => {
            let _ = writeln!(writer, "{} {}", "warning:".bold().yellow(), reason);
        }
        TranslateOutcome::MissingSourceDir => {
            let _ = writeln!(
                writer,
                "{} Source directory {} does not exist, nothing to translate",
                "warning:".bold().yellow(),
                summary.source_dir.display()
            );
        }
        TranslateOutcome::NoSources => {
            let _ = writeln!(
                writer,
                "{} No source bundles found in {}",
                "warning:".bold().yellow(),
                summary.source_dir.display()
            );
        }
        TranslateOutcome::Completed(run) => print_run(run, verbose, writer),
    }
}

fn print_run<W: Write>(run: &RunSummary, verbose: bool, writer: &mut W) {
    for skipped in &run.skipped {
        let _ = writeln!(
            writer,
            "{} {} (override file for '{}')",
            "skipped".dimmed(),
            skipped.path.display(),
            skipped.language
        );
    }

    for outcome in &run.outcomes {
        match &outcome.result {
            Ok(report) => {
                let _ = writeln!(
                    writer,
                    "{} {}: {}",
                    SUCCESS_MARK.green(),
                    outcome.spec.label().bold(),
                    counts(report, run.dry_run)
                );
                if verbose && !run.dry_run {
                    let _ = writeln!(
                        writer,
                        "    {} {}",
                        "-->".blue(),
                        outcome.spec.target_path.display()
                    );
                }
            }
            Err(error) => {
                let _ = writeln!(
                    writer,
                    "{} {}: {}",
                    FAILURE_MARK.red(),
                    outcome.spec.label().bold(),
                    error
                );
                let mut source = error.source();
                while let Some(cause) = source {
                    let _ = writeln!(writer, "    {} {}", "caused by:".dimmed(), cause);
                    source = cause.source();
                }
            }
        }
    }

    let totals = run.totals();
    let failed = run.failed();
    let _ = writeln!(writer);

    if failed > 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            FAILURE_MARK.red(),
            format!(
                "{} of {} failed",
                plural(failed, "job"),
                run.outcomes.len()
            )
            .red()
        );
    }

    let headline = if run.dry_run {
        format!("Dry run of {}", plural(run.succeeded(), "job"))
    } else {
        format!("Finished {}", plural(run.succeeded(), "job"))
    };
    let calls = if run.dry_run {
        String::new()
    } else {
        format!(", {}", plural(totals.provider_calls, "provider call"))
    };
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!("{}: {}{}", headline, counts(&totals, run.dry_run), calls).green()
    );
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", summary.path.display()).green()
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {} already exists",
            "error:".bold().red(),
            summary.path.display()
        );
    }
}
