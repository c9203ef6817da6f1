//! Size-bounded batching of provider requests.

use tracing::info;

use crate::provider::{ProviderError, TranslationProvider};

pub const DEFAULT_CHARACTER_BUDGET: usize = 4000;
/// Google Translate v2 accepts at most 128 segments per request.
pub const DEFAULT_MAX_SEGMENTS: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    pub character_budget: usize,
    pub max_segments: usize,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            character_budget: DEFAULT_CHARACTER_BUDGET,
            max_segments: DEFAULT_MAX_SEGMENTS,
        }
    }
}

#[derive(Debug, Default)]
struct PendingBatch {
    keys: Vec<String>,
    texts: Vec<String>,
    characters: usize,
}

impl PendingBatch {
    fn len(&self) -> usize {
        self.keys.len()
    }

    fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// One translated segment, paired back with the key and protected source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub key: String,
    pub protected: String,
    pub translated: String,
}

pub struct BatchTranslator<'a> {
    provider: &'a dyn TranslationProvider,
    source_language: &'a str,
    target_language: &'a str,
    limits: BatchLimits,
    pending: PendingBatch,
    calls: usize,
}

impl<'a> BatchTranslator<'a> {
    pub fn new(
        provider: &'a dyn TranslationProvider,
        source_language: &'a str,
        target_language: &'a str,
        limits: BatchLimits,
    ) -> Self {
        Self {
            provider,
            source_language,
            target_language,
            limits,
            pending: PendingBatch::default(),
            calls: 0,
        }
    }

    /// Queue a segment, flushing once the batch exceeds its limits.
    ///
    /// Returns the results of that flush, or nothing if the batch is still open.
    pub fn enqueue(
        &mut self,
        key: impl Into<String>,
        protected_text: impl Into<String>,
    ) -> Result<Vec<BatchResult>, ProviderError> {
        let text = protected_text.into();
        self.pending.characters += text.chars().count();
        self.pending.keys.push(key.into());
        self.pending.texts.push(text);

        if self.pending.characters > self.limits.character_budget
            || self.pending.len() >= self.limits.max_segments
        {
            return self.flush();
        }
        Ok(Vec::new())
    }

    /// Send the pending batch, if any, as a single provider call.
    pub fn flush(&mut self) -> Result<Vec<BatchResult>, ProviderError> {
        if self.pending.is_empty() {
            return Ok(Vec::new());
        }

        let batch = std::mem::take(&mut self.pending);
        info!(
            "Translating {} characters ({} segments) to {} with {}",
            batch.characters,
            batch.len(),
            self.target_language,
            self.provider.name()
        );

        let translations =
            self.provider
                .translate(&batch.texts, self.source_language, self.target_language)?;
        self.calls += 1;

        if translations.len() != batch.len() {
            return Err(ProviderError::LengthMismatch {
                expected: batch.len(),
                actual: translations.len(),
            });
        }

        Ok(batch
            .keys
            .into_iter()
            .zip(batch.texts)
            .zip(translations)
            .map(|((key, protected), translated)| BatchResult {
                key,
                protected,
                translated,
            })
            .collect())
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn provider_calls(&self) -> usize {
        self.calls
    }
}
