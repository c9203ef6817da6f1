//! Discovery of source bundles under the source directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use tracing::{debug, warn};
use walkdir::WalkDir;

const PROPERTIES_EXTENSION: &str = ".properties";

/// A source bundle found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBundle {
    pub path: PathBuf,
    /// Directory containing the bundle, relative to the source root.
    pub relative_dir: PathBuf,
    /// File name without `.properties` and without the source language suffix.
    pub base_name: String,
}

/// Result of scanning the source directory.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub bundles: Vec<SourceBundle>,
    pub skipped_count: usize,
}

/// Include selectors used when none are configured.
pub fn default_includes(source_language: &str, recurse: bool) -> Vec<String> {
    let top_level = format!("*_{}{}", source_language, PROPERTIES_EXTENSION);
    if recurse {
        vec![top_level.clone(), format!("**/{}", top_level)]
    } else {
        vec![top_level]
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid glob pattern '{}'", p)))
        .collect()
}

/// Strip `.properties` and a trailing `_<source_language>` from a file name.
pub fn base_name(file_name: &str, source_language: &str) -> String {
    let stem = file_name
        .strip_suffix(PROPERTIES_EXTENSION)
        .unwrap_or(file_name);
    stem.strip_suffix(&format!("_{}", source_language))
        .unwrap_or(stem)
        .to_string()
}

/// Slash-separated form of a relative path, as matched by the selectors.
fn to_selector_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn scan_source_bundles(
    source_dir: &Path,
    includes: &[String],
    excludes: &[String],
    recurse: bool,
    source_language: &str,
) -> Result<ScanResult> {
    let includes = if includes.is_empty() {
        compile(&default_includes(source_language, recurse))?
    } else {
        compile(includes)?
    };
    let excludes = compile(excludes)?;
    let options = MatchOptions {
        require_literal_separator: true,
        ..MatchOptions::new()
    };

    let mut result = ScanResult::default();

    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                result.skipped_count += 1;
                warn!("Cannot access path: {}", e);
                continue;
            }
        };

        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy();
        if !entry.file_type().is_file() || !file_name.ends_with(PROPERTIES_EXTENSION) {
            continue;
        }

        let Ok(relative) = path.strip_prefix(source_dir) else {
            continue;
        };
        let selector_path = to_selector_path(relative);

        if !includes.iter().any(|p| p.matches_with(&selector_path, options)) {
            continue;
        }
        if excludes.iter().any(|p| p.matches_with(&selector_path, options)) {
            debug!("Excluded {}", selector_path);
            continue;
        }

        result.bundles.push(SourceBundle {
            path: path.to_path_buf(),
            relative_dir: relative.parent().map(Path::to_path_buf).unwrap_or_default(),
            base_name: base_name(&file_name, source_language),
        });
    }

    Ok(result)
}
