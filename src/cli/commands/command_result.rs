use std::path::PathBuf;

use crate::{cli::exit_status::ExitStatus, core::RunSummary};

#[derive(Debug)]
pub enum CommandSummary {
    Translate(TranslateSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct TranslateSummary {
    pub source_dir: PathBuf,
    pub outcome: TranslateOutcome,
}

#[derive(Debug)]
pub enum TranslateOutcome {
    /// Nothing was attempted, e.g. no provider credentials.
    Skipped { reason: String },
    /// The source directory does not exist and that is allowed.
    MissingSourceDir,
    /// The source directory holds no matching bundles.
    NoSources,
    Completed(RunSummary),
}

#[derive(Debug)]
pub struct InitSummary {
    pub path: PathBuf,
    /// False when a config file was already there.
    pub created: bool,
}

/// Result of running a propbabel command
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
}

impl CommandResult {
    pub fn exit_status(&self) -> ExitStatus {
        match &self.summary {
            CommandSummary::Translate(TranslateSummary {
                outcome: TranslateOutcome::Completed(run),
                ..
            }) if run.has_failures() => ExitStatus::Failure,
            CommandSummary::Init(InitSummary { created: false, .. }) => ExitStatus::Failure,
            _ => ExitStatus::Success,
        }
    }
}
