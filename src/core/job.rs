//! Translation of one source bundle into one target language.

use std::{
    collections::HashMap,
    fmt,
    ops::AddAssign,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info};

use super::{
    batch::{BatchLimits, BatchResult, BatchTranslator},
    bundle::{self, Bundle, BundleRole, StorageError},
    cache::{CacheLookup, TranslationCache},
    protect::{PatternProtector, ProtectError, Protected, RestoreMap},
};
use crate::provider::{ProviderError, TranslationProvider};

pub const TARGET_HEADER: &str =
    "Generated by propbabel. Edit the source bundle or add an override file instead.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Loading,
    Partitioning,
    Translating,
    Merging,
    Writing,
    Done,
}

/// Files involved in translating one bundle into one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub base_name: String,
    pub language: String,
    /// Directory of the source bundle relative to the source root.
    pub relative_dir: PathBuf,
    pub source_path: PathBuf,
    pub override_path: PathBuf,
    pub cache_path: PathBuf,
    pub target_path: PathBuf,
}

impl JobSpec {
    /// `<relative dir>/<base>_<language>` with `/` separators.
    pub fn label(&self) -> String {
        let name = format!("{}_{}", self.base_name, self.language);
        if self.relative_dir.as_os_str().is_empty() {
            return name;
        }
        let dir = self
            .relative_dir
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}", dir, name)
    }
}

impl fmt::Display for JobSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobReport {
    pub keys: usize,
    pub from_override: usize,
    pub from_cache: usize,
    /// Keys sent to the provider (or that would be, in a dry run).
    pub translated: usize,
    pub provider_calls: usize,
    pub pruned: usize,
    pub cache_written: bool,
}

impl AddAssign for JobReport {
    fn add_assign(&mut self, other: Self) {
        self.keys += other.keys;
        self.from_override += other.from_override;
        self.from_cache += other.from_cache;
        self.translated += other.translated;
        self.provider_calls += other.provider_calls;
        self.pruned += other.pruned;
        self.cache_written |= other.cache_written;
    }
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("failed to protect value of key '{key}'")]
    Protect {
        key: String,
        #[source]
        source: ProtectError,
    },
    #[error("no translation was produced for key '{0}'")]
    MissingTranslation(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSettings {
    pub source_language: String,
    pub limits: BatchLimits,
    pub prune_cache: bool,
}

enum Disposition {
    Override(String),
    Cached(String),
    Translate(Protected),
}

struct Loaded {
    source: Bundle,
    overrides: Bundle,
    cache: TranslationCache,
}

pub struct TranslationJob<'a> {
    spec: &'a JobSpec,
    protector: &'a PatternProtector,
    settings: &'a JobSettings,
    state: JobState,
}

impl<'a> TranslationJob<'a> {
    pub fn new(spec: &'a JobSpec, protector: &'a PatternProtector, settings: &'a JobSettings) -> Self {
        Self {
            spec,
            protector,
            settings,
            state: JobState::Loading,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Run every stage and write the target bundle.
    ///
    /// Any error leaves both the target and the cache file untouched.
    pub fn run(&mut self, provider: &dyn TranslationProvider) -> Result<JobReport, JobError> {
        info!("Translating {} into {}", self.spec.source_path.display(), self.spec.language);

        let mut report = JobReport::default();
        let Loaded {
            source,
            overrides,
            mut cache,
        } = self.load()?;
        let dispositions = self.partition(&source, &overrides, &cache, &mut report)?;
        report.translated = pending_translations(&dispositions);

        self.advance(JobState::Translating);
        let (spec, settings) = (self.spec, self.settings);
        let mut batch = BatchTranslator::new(
            provider,
            &settings.source_language,
            &spec.language,
            settings.limits,
        );
        let mut slots: Vec<Option<String>> = Vec::with_capacity(dispositions.len());
        let mut waiting: HashMap<String, (usize, RestoreMap)> = HashMap::new();

        for (key, disposition) in dispositions {
            let slot = slots.len();
            match disposition {
                Disposition::Override(value) | Disposition::Cached(value) => {
                    slots.push(Some(value));
                }
                Disposition::Translate(protected) => {
                    slots.push(None);
                    waiting.insert(key.clone(), (slot, protected.restore));
                    let results = batch.enqueue(key, protected.text)?;
                    self.absorb(results, &mut waiting, &mut slots, &mut cache)?;
                }
            }
        }
        let results = batch.flush()?;
        self.absorb(results, &mut waiting, &mut slots, &mut cache)?;
        report.provider_calls = batch.provider_calls();

        self.advance(JobState::Merging);
        let mut target = Bundle::new();
        for (key, slot) in source.keys().zip(slots) {
            let value = slot.ok_or_else(|| JobError::MissingTranslation(key.to_string()))?;
            target.insert(key, value);
        }
        if settings.prune_cache {
            report.pruned = cache.prune(|key| source.contains_key(key));
            if report.pruned > 0 {
                info!("Pruned {} stale cache entries for {}", report.pruned, spec);
            }
        }

        self.advance(JobState::Writing);
        bundle::save(&spec.target_path, &target, TARGET_HEADER)?;
        report.cache_written = cache.flush()?;

        self.advance(JobState::Done);
        Ok(report)
    }

    /// Load and partition only, reporting what a real run would do.
    pub fn dry_run(&mut self) -> Result<JobReport, JobError> {
        let mut report = JobReport::default();
        let loaded = self.load()?;
        let dispositions =
            self.partition(&loaded.source, &loaded.overrides, &loaded.cache, &mut report)?;
        report.translated = pending_translations(&dispositions);

        self.advance(JobState::Done);
        Ok(report)
    }

    fn advance(&mut self, next: JobState) {
        debug!(job = %self.spec, from = ?self.state, to = ?next, "job state");
        self.state = next;
    }

    fn load(&mut self) -> Result<Loaded, JobError> {
        self.advance(JobState::Loading);
        Ok(Loaded {
            source: bundle::load(&self.spec.source_path, BundleRole::Source)?,
            overrides: bundle::load(&self.spec.override_path, BundleRole::Override)?,
            cache: TranslationCache::load(&self.spec.cache_path)?,
        })
    }

    fn partition(
        &mut self,
        source: &Bundle,
        overrides: &Bundle,
        cache: &TranslationCache,
        report: &mut JobReport,
    ) -> Result<Vec<(String, Disposition)>, JobError> {
        self.advance(JobState::Partitioning);
        report.keys = source.len();

        let mut dispositions = Vec::with_capacity(source.len());
        for (key, text) in source.iter() {
            if let Some(value) = overrides.get(key) {
                debug!(key, "using override");
                report.from_override += 1;
                dispositions.push((key.to_string(), Disposition::Override(value.to_string())));
                continue;
            }

            let protected = self
                .protector
                .pre_process(text)
                .map_err(|source| JobError::Protect {
                    key: key.to_string(),
                    source,
                })?;

            let disposition = match cache.lookup(key, &protected.text) {
                CacheLookup::Hit(entry) => {
                    debug!(key, "cache hit");
                    report.from_cache += 1;
                    Disposition::Cached(
                        self.protector
                            .post_process(&entry.translated, &protected.restore),
                    )
                }
                CacheLookup::Stale => {
                    info!("Change detected in key {} of {}", key, self.spec);
                    Disposition::Translate(protected)
                }
                CacheLookup::Miss => {
                    debug!(key, "cache miss");
                    Disposition::Translate(protected)
                }
            };
            dispositions.push((key.to_string(), disposition));
        }

        Ok(dispositions)
    }

    fn absorb(
        &self,
        results: Vec<BatchResult>,
        waiting: &mut HashMap<String, (usize, RestoreMap)>,
        slots: &mut [Option<String>],
        cache: &mut TranslationCache,
    ) -> Result<(), JobError> {
        for result in results {
            let (slot, restore) = waiting
                .remove(&result.key)
                .ok_or_else(|| JobError::MissingTranslation(result.key.clone()))?;
            slots[slot] = Some(self.protector.post_process(&result.translated, &restore));
            cache.update(&result.key, &result.protected, &result.translated);
        }
        Ok(())
    }
}

fn pending_translations(dispositions: &[(String, Disposition)]) -> usize {
    dispositions
        .iter()
        .filter(|(_, d)| matches!(d, Disposition::Translate(_)))
        .count()
}

/// Path of the `<base>_<language>.properties` file in `dir`.
pub fn bundle_path(dir: &Path, base_name: &str, language: &str) -> PathBuf {
    dir.join(format!("{}_{}.properties", base_name, language))
}
