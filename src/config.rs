use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use directories::BaseDirs;
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    core::batch::{DEFAULT_CHARACTER_BUDGET, DEFAULT_MAX_SEGMENTS},
    provider::ProviderKind,
};

pub const CONFIG_FILE_NAME: &str = ".propbabelrc.json";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_source_dir")]
    pub source_dir: String,
    #[serde(default = "default_target_dir")]
    pub target_dir: String,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_project: Option<String>,
    #[serde(default = "default_source_language")]
    pub source_language: String,
    /// Either a JSON array or a comma separated string.
    #[serde(
        default = "default_languages",
        deserialize_with = "deserialize_languages"
    )]
    pub languages: Vec<String>,
    #[serde(default)]
    pub no_translate_patterns: Vec<String>,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default)]
    pub recurse: bool,
    #[serde(default = "default_true")]
    pub fail_on_missing_cache_dir: bool,
    #[serde(default)]
    pub fail_on_missing_source_dir: bool,
    #[serde(default = "default_character_budget")]
    pub character_budget: usize,
    #[serde(default = "default_max_batch_segments")]
    pub max_batch_segments: usize,
    #[serde(default)]
    pub prune_cache: bool,
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

fn default_source_dir() -> String {
    "src/main/resources".to_string()
}

fn default_target_dir() -> String {
    "target/classes".to_string()
}

fn default_cache_dir() -> String {
    "~/.i18n_cache".to_string()
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_languages() -> Vec<String> {
    ["es", "fr", "nl", "it", "pl"].map(String::from).to_vec()
}

fn default_true() -> bool {
    true
}

fn default_character_budget() -> usize {
    DEFAULT_CHARACTER_BUDGET
}

fn default_max_batch_segments() -> usize {
    DEFAULT_MAX_SEGMENTS
}

/// Split `"es, fr,nl"` into language codes, dropping blanks.
pub fn split_languages(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(String::from)
        .collect()
}

fn deserialize_languages<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Languages {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Languages::deserialize(deserializer)? {
        Languages::List(list) => list.iter().flat_map(|l| split_languages(l)).collect(),
        Languages::Joined(joined) => split_languages(&joined),
    })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            target_dir: default_target_dir(),
            cache_dir: default_cache_dir(),
            cache_group: None,
            cache_tag: None,
            cache_project: None,
            source_language: default_source_language(),
            languages: default_languages(),
            no_translate_patterns: Vec::new(),
            includes: Vec::new(),
            excludes: Vec::new(),
            recurse: false,
            fail_on_missing_cache_dir: true,
            fail_on_missing_source_dir: false,
            character_budget: DEFAULT_CHARACTER_BUDGET,
            max_batch_segments: DEFAULT_MAX_SEGMENTS,
            prune_cache: false,
            provider: ProviderKind::default(),
            api_key: None,
            api_url: None,
        }
    }
}

fn is_language_code(code: &str) -> bool {
    !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error for invalid regexes or glob patterns, malformed
    /// language codes and zero batch limits.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.no_translate_patterns {
            Regex::new(pattern).with_context(|| {
                format!("Invalid regex in 'noTranslatePatterns': \"{}\"", pattern)
            })?;
        }

        for (field, patterns) in [("includes", &self.includes), ("excludes", &self.excludes)] {
            for pattern in patterns {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in '{}': \"{}\"", field, pattern)
                })?;
            }
        }

        if !is_language_code(&self.source_language) {
            bail!("Invalid 'sourceLanguage': \"{}\"", self.source_language);
        }
        if self.languages.is_empty() {
            bail!("'languages' must name at least one target language");
        }
        for language in &self.languages {
            if !is_language_code(language) {
                bail!("Invalid language code in 'languages': \"{}\"", language);
            }
            if *language == self.source_language {
                bail!(
                    "'languages' must not contain the source language \"{}\"",
                    language
                );
            }
        }

        if self.character_budget == 0 {
            bail!("'characterBudget' must be greater than zero");
        }
        if self.max_batch_segments == 0 {
            bail!("'maxBatchSegments' must be greater than zero");
        }

        Ok(())
    }

    pub fn source_dir_path(&self, root: &Path) -> Result<PathBuf> {
        resolve_dir(root, &self.source_dir)
    }

    pub fn target_dir_path(&self, root: &Path) -> Result<PathBuf> {
        resolve_dir(root, &self.target_dir)
    }

    /// `cacheDir[/cacheGroup][/cacheTag]`, the directory that must exist
    /// when `failOnMissingCacheDir` is set.
    pub fn cache_namespace_dir(&self, root: &Path) -> Result<PathBuf> {
        let mut dir = resolve_dir(root, &self.cache_dir)?;
        for part in [&self.cache_group, &self.cache_tag].into_iter().flatten() {
            dir.push(part);
        }
        Ok(dir)
    }

    /// Cache namespace plus `cacheProject`, where cache bundles live.
    pub fn project_cache_dir(&self, root: &Path) -> Result<PathBuf> {
        let mut dir = self.cache_namespace_dir(root)?;
        if let Some(project) = &self.cache_project {
            dir.push(project);
        }
        Ok(dir)
    }
}

/// Resolve a configured directory: `~` expands to the home directory and
/// relative paths are taken from `root`.
pub fn resolve_dir(root: &Path, dir: &str) -> Result<PathBuf> {
    let home_relative = if dir == "~" {
        Some("")
    } else {
        dir.strip_prefix("~/")
    };

    if let Some(rest) = home_relative {
        let base_dirs = BaseDirs::new()
            .with_context(|| format!("Cannot expand \"{}\": no home directory", dir))?;
        return Ok(base_dirs.home_dir().join(rest));
    }

    Ok(root.join(dir))
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Path of the file the config came from, `None` when using defaults.
    pub path: Option<PathBuf>,
}

/// Load the nearest config file, or defaults when there is none.
///
/// Validation is left to the caller so command line overrides can be
/// applied first.
pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
