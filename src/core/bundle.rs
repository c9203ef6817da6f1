//! Ordered key/value bundles and their persistence.

use std::{
    collections::HashMap,
    fmt, fs, io,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{info, warn};

use super::properties::{self, PropertiesError};

/// Ordered mapping from key to text.
///
/// Iteration follows insertion order. Re-inserting an existing key replaces
/// its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&position| self.entries[position].1.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keep only the entries whose key satisfies `keep`; returns how many were removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(key, _)| keep(key));
        let removed = before - self.entries.len();
        if removed > 0 {
            self.index = self
                .entries
                .iter()
                .enumerate()
                .map(|(position, (key, _))| (key.clone(), position))
                .collect();
        }
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Bundle {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut bundle = Bundle::new();
        for (key, value) in iter {
            bundle.insert(key, value);
        }
        bundle
    }
}

/// What a bundle file is used for; only affects logging of missing files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleRole {
    Source,
    Override,
    Cache,
}

impl fmt::Display for BundleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BundleRole::Source => write!(f, "source"),
            BundleRole::Override => write!(f, "override"),
            BundleRole::Cache => write!(f, "cache"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {role} file {}", path.display())]
    Read {
        role: BundleRole,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {role} file {}", path.display())]
    Parse {
        role: BundleRole,
        path: PathBuf,
        #[source]
        source: PropertiesError,
    },
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Load a bundle file; a missing file yields an empty bundle.
///
/// A missing cache file means every key of the job will be translated.
pub fn load(path: &Path, role: BundleRole) -> Result<Bundle, StorageError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if role == BundleRole::Cache {
                warn!(
                    "Could not find cache file {} so a complete translation will be performed",
                    path.display()
                );
            }
            return Ok(Bundle::new());
        }
        Err(source) => {
            return Err(StorageError::Read {
                role,
                path: path.to_path_buf(),
                source,
            });
        }
    };

    info!("Loading {} file {}", role, path.display());

    let entries = properties::parse(&content).map_err(|source| StorageError::Parse {
        role,
        path: path.to_path_buf(),
        source,
    })?;

    Ok(entries.into_iter().collect())
}

/// Replace the file at `path` with `bundle`, creating parent directories.
///
/// The content goes to a temporary file in the same directory which is then
/// renamed over `path`, so readers never observe a half-written bundle.
pub fn save(path: &Path, bundle: &Bundle, header: &str) -> Result<(), StorageError> {
    let write_error = |source: io::Error| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(write_error)?;

    let content = properties::serialize(bundle.iter(), Some(header));
    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(content.as_bytes()).map_err(write_error)?;
    set_readable(&file).map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;

    Ok(())
}

#[cfg(unix)]
fn set_readable(file: &NamedTempFile) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.as_file()
        .set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_readable(_file: &NamedTempFile) -> io::Result<()> {
    Ok(())
}
