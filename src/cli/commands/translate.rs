use std::{num::NonZeroUsize, path::Path};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use super::{CommandResult, CommandSummary, TranslateOutcome, TranslateSummary};
use crate::{
    cli::args::TranslateCommand,
    config::{Config, load_config},
    core::{
        JobSettings, PatternProtector, RunMode, RunOptions,
        batch::BatchLimits,
        plan::{Layout, plan_jobs},
        run_jobs,
        scanner::scan_source_bundles,
    },
    provider::{self, ProviderSetupError},
};

fn finish(source_dir: &Path, outcome: TranslateOutcome) -> CommandResult {
    CommandResult {
        summary: CommandSummary::Translate(TranslateSummary {
            source_dir: source_dir.to_path_buf(),
            outcome,
        }),
    }
}

pub fn translate(cmd: TranslateCommand, root: &Path) -> Result<CommandResult> {
    let loaded = load_config(root)?;
    if let Some(path) = &loaded.path {
        info!("Using config file {}", path.display());
    }
    let mut config = loaded.config;
    cmd.apply_overrides(&mut config);
    config.validate()?;

    let protector = PatternProtector::new(&config.no_translate_patterns)?;
    for pattern in protector.patterns() {
        info!("Will not translate content matching {}", pattern);
    }
    let source_dir = config.source_dir_path(root)?;

    let provider = if cmd.dry_run {
        None
    } else {
        match provider::build(
            config.provider,
            config.api_key.as_deref(),
            config.api_url.as_deref(),
        ) {
            Ok(provider) => Some(provider),
            Err(ProviderSetupError::MissingCredentials(_)) => {
                return Ok(finish(
                    &source_dir,
                    TranslateOutcome::Skipped {
                        reason: "Translation will not be performed because there is no API key available"
                            .to_string(),
                    },
                ));
            }
            Err(e) => return Err(e).context("Failed to set up the translation provider"),
        }
    };

    check_cache_dir(&config, root)?;

    if !source_dir.is_dir() {
        if config.fail_on_missing_source_dir {
            bail!("Source directory {} does not exist", source_dir.display());
        }
        return Ok(finish(&source_dir, TranslateOutcome::MissingSourceDir));
    }

    let scan = scan_source_bundles(
        &source_dir,
        &config.includes,
        &config.excludes,
        config.recurse,
        &config.source_language,
    )?;
    if scan.skipped_count > 0 {
        warn!("{} path(s) under {} could not be read", scan.skipped_count, source_dir.display());
    }
    if scan.bundles.is_empty() {
        return Ok(finish(&source_dir, TranslateOutcome::NoSources));
    }

    let layout = Layout {
        target_dir: config.target_dir_path(root)?,
        cache_dir: config.project_cache_dir(root)?,
    };
    let plan = plan_jobs(&scan.bundles, &config.languages, &layout);

    let options = RunOptions {
        settings: JobSettings {
            source_language: config.source_language.clone(),
            limits: BatchLimits {
                character_budget: config.character_budget,
                max_segments: config.max_batch_segments,
            },
            prune_cache: config.prune_cache,
        },
        threads: cmd.jobs.map(NonZeroUsize::get),
    };
    let mode = match &provider {
        Some(provider) => RunMode::Translate(provider),
        None => RunMode::DryRun,
    };

    let summary = run_jobs(plan, mode, &protector, &options)?;
    Ok(finish(&source_dir, TranslateOutcome::Completed(summary)))
}

/// The cache namespace must exist unless `failOnMissingCacheDir` is off.
fn check_cache_dir(config: &Config, root: &Path) -> Result<()> {
    let namespace = config.cache_namespace_dir(root)?;
    if namespace.is_dir() {
        return Ok(());
    }
    if config.fail_on_missing_cache_dir {
        bail!(
            "Cache directory {} does not exist (create it or set failOnMissingCacheDir to false)",
            namespace.display()
        );
    }
    warn!(
        "Cache directory {} does not exist; it will be created",
        namespace.display()
    );
    Ok(())
}
