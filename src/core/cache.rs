//! Per (bundle, language) translation cache.
//!
//! Stored as an ordinary bundle whose values read
//! `<md5 of protected source>|<protected translation>`.

use std::path::{Path, PathBuf};

use super::bundle::{self, Bundle, BundleRole, StorageError};

pub const CACHE_HEADER: &str = "propbabel translation cache. Values are <md5 of source>|<translation>.";

/// Content fingerprint of a protected source text.
pub fn fingerprint(text: &str) -> String {
    format!("{:x}", md5::compute(text.as_bytes()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub fingerprint: String,
    pub translated: String,
}

impl CacheEntry {
    /// Parse a stored value; `None` when the separator is missing.
    pub fn parse(value: &str) -> Option<Self> {
        let (fingerprint, translated) = value.split_once('|')?;
        Some(Self {
            fingerprint: fingerprint.to_string(),
            translated: translated.to_string(),
        })
    }

    pub fn encode(&self) -> String {
        format!("{}|{}", self.fingerprint, self.translated)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Hit(CacheEntry),
    /// An entry exists but was computed from different source text.
    Stale,
    Miss,
}

#[derive(Debug)]
pub struct TranslationCache {
    path: PathBuf,
    entries: Bundle,
    dirty: bool,
}

impl TranslationCache {
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        let entries = bundle::load(path, BundleRole::Cache)?;
        Ok(Self::from_bundle(path, entries))
    }

    pub fn from_bundle(path: &Path, entries: Bundle) -> Self {
        Self {
            path: path.to_path_buf(),
            entries,
            dirty: false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, key: &str, protected_text: &str) -> CacheLookup {
        let Some(value) = self.entries.get(key) else {
            return CacheLookup::Miss;
        };
        match CacheEntry::parse(value) {
            Some(entry) if entry.fingerprint == fingerprint(protected_text) => CacheLookup::Hit(entry),
            Some(_) => CacheLookup::Stale,
            None => CacheLookup::Miss,
        }
    }

    pub fn update(&mut self, key: &str, protected_text: &str, translated: &str) {
        let entry = CacheEntry {
            fingerprint: fingerprint(protected_text),
            translated: translated.to_string(),
        }
        .encode();

        if self.entries.get(key) != Some(entry.as_str()) {
            self.entries.insert(key, entry);
            self.dirty = true;
        }
    }

    /// Drop entries whose key is not retained; returns how many were removed.
    pub fn prune(&mut self, retain: impl FnMut(&str) -> bool) -> usize {
        let removed = self.entries.retain(retain);
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the cache file if anything changed since loading.
    pub fn flush(&mut self) -> Result<bool, StorageError> {
        if !self.dirty {
            return Ok(false);
        }
        bundle::save(&self.path, &self.entries, CACHE_HEADER)?;
        self.dirty = false;
        Ok(true)
    }
}
