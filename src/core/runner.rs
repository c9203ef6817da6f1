//! Execution of planned jobs.
//!
//! Jobs touch disjoint files, so they run in parallel on rayon's pool. The
//! provider is shared by reference; outcomes keep the planning order.

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::debug;

use super::{
    job::{JobError, JobReport, JobSettings, JobSpec, TranslationJob},
    plan::{JobPlan, SkippedSource},
    protect::PatternProtector,
};
use crate::provider::TranslationProvider;

#[derive(Clone, Copy)]
pub enum RunMode<'a> {
    Translate(&'a dyn TranslationProvider),
    /// Load and partition only; nothing is translated or written.
    DryRun,
}

pub struct RunOptions {
    pub settings: JobSettings,
    /// Worker threads; `None` uses rayon's global pool.
    pub threads: Option<usize>,
}

#[derive(Debug)]
pub struct JobOutcome {
    pub spec: JobSpec,
    pub result: Result<JobReport, JobError>,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<JobOutcome>,
    pub skipped: Vec<SkippedSource>,
    pub dry_run: bool,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&JobSpec, &JobError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.spec, e)))
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Counters summed over the successful jobs.
    pub fn totals(&self) -> JobReport {
        let mut totals = JobReport::default();
        for report in self.outcomes.iter().filter_map(|o| o.result.as_ref().ok()) {
            totals += *report;
        }
        totals
    }
}

fn run_one(
    spec: &JobSpec,
    mode: RunMode<'_>,
    protector: &PatternProtector,
    settings: &JobSettings,
) -> Result<JobReport, JobError> {
    let mut job = TranslationJob::new(spec, protector, settings);
    let result = match mode {
        RunMode::Translate(provider) => job.run(provider),
        RunMode::DryRun => job.dry_run(),
    };
    if let Err(e) = &result {
        debug!("Translation of {} failed: {}", spec, e);
    }
    result
}

pub fn run_jobs(
    plan: JobPlan,
    mode: RunMode<'_>,
    protector: &PatternProtector,
    options: &RunOptions,
) -> Result<RunSummary> {
    let JobPlan { jobs, skipped } = plan;
    let execute = || -> Vec<JobOutcome> {
        jobs.into_par_iter()
            .map(|spec| {
                let result = run_one(&spec, mode, protector, &options.settings);
                JobOutcome { spec, result }
            })
            .collect()
    };

    let outcomes = match options.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Failed to start worker threads")?
            .install(execute),
        None => execute(),
    };

    Ok(RunSummary {
        outcomes,
        skipped,
        dry_run: matches!(mode, RunMode::DryRun),
    })
}
