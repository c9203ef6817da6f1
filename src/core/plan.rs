//! Expansion of discovered bundles into per-language jobs.

use std::path::{Path, PathBuf};

use tracing::info;

use super::{
    job::{JobSpec, bundle_path},
    scanner::SourceBundle,
};

/// Output locations shared by every job of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub target_dir: PathBuf,
    /// Project cache directory; cache files mirror the source layout below it.
    pub cache_dir: PathBuf,
}

/// A source file left out because its name already carries a target language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSource {
    pub path: PathBuf,
    pub language: String,
}

#[derive(Debug, Default)]
pub struct JobPlan {
    pub jobs: Vec<JobSpec>,
    pub skipped: Vec<SkippedSource>,
}

/// The target language `base_name` is already suffixed with, if any.
fn override_language<'a>(base_name: &str, languages: &'a [String]) -> Option<&'a String> {
    languages.iter().find(|language| {
        base_name
            .strip_suffix(language.as_str())
            .is_some_and(|rest| rest.ends_with('_'))
    })
}

pub fn plan_jobs(bundles: &[SourceBundle], languages: &[String], layout: &Layout) -> JobPlan {
    let mut plan = JobPlan::default();

    for bundle in bundles {
        if let Some(language) = override_language(&bundle.base_name, languages) {
            info!(
                "Skipping {}: it is a {} override file",
                bundle.path.display(),
                language
            );
            plan.skipped.push(SkippedSource {
                path: bundle.path.clone(),
                language: language.clone(),
            });
            continue;
        }

        let source_dir = bundle.path.parent().unwrap_or(Path::new(""));
        let cache_dir = layout.cache_dir.join(&bundle.relative_dir);
        let target_dir = layout.target_dir.join(&bundle.relative_dir);

        for language in languages {
            plan.jobs.push(JobSpec {
                base_name: bundle.base_name.clone(),
                language: language.clone(),
                relative_dir: bundle.relative_dir.clone(),
                source_path: bundle.path.clone(),
                override_path: bundle_path(source_dir, &bundle.base_name, language),
                cache_path: bundle_path(&cache_dir, &bundle.base_name, language),
                target_path: bundle_path(&target_dir, &bundle.base_name, language),
            });
        }
    }

    plan
}
