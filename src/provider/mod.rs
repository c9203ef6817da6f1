//! Translation providers.
//!
//! A provider receives an ordered list of texts and must answer with an
//! ordered list of translations of the same length. The pipeline never talks
//! to a provider through global state: each job is handed a reference to one.
//!
//! ## Module Structure
//!
//! - `google`: Google Translate v2 over HTTP
//! - `pseudo`: deterministic offline pseudo-localization

pub mod google;
pub mod pseudo;

use clap::ValueEnum;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use google::{DEFAULT_API_URL, GoogleTranslateProvider};
pub use pseudo::PseudoProvider;

/// Failure of a single provider call.
///
/// Any of these aborts the job that issued the call.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to translation provider failed")]
    Http(#[from] reqwest::Error),
    #[error("translation provider answered with status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("invalid response from translation provider: {0}")]
    InvalidResponse(String),
    #[error("translation provider returned {actual} translations for {expected} texts")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("translation provider rejected the request: {0}")]
    Rejected(String),
}

/// Errors raised while constructing a provider from configuration.
#[derive(Debug, Error)]
pub enum ProviderSetupError {
    /// No credentials are available; the run is skipped rather than failed.
    #[error("no API key available for the {0} provider")]
    MissingCredentials(ProviderKind),
    #[error("failed to create HTTP client")]
    Client(#[from] reqwest::Error),
}

/// Ordered request/response contract of a translation backend.
#[enum_dispatch]
pub trait TranslationProvider: Send + Sync {
    /// Human readable provider name, used in logs and reports.
    fn name(&self) -> &str;

    /// Translate `texts` from `source_language` into `target_language`.
    ///
    /// Implementations must return exactly one translation per input text,
    /// in input order.
    fn translate(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError>;
}

/// The configured provider, dispatched statically.
#[enum_dispatch(TranslationProvider)]
#[derive(Debug)]
pub enum Provider {
    Google(GoogleTranslateProvider),
    Pseudo(PseudoProvider),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Translate API v2 (needs an API key)
    #[default]
    Google,
    /// Offline pseudo-localization, useful for testing layouts
    Pseudo,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Google => write!(f, "google"),
            ProviderKind::Pseudo => write!(f, "pseudo"),
        }
    }
}

/// Build the provider selected by configuration.
///
/// A blank API key counts as missing.
pub fn build(
    kind: ProviderKind,
    api_key: Option<&str>,
    api_url: Option<&str>,
) -> Result<Provider, ProviderSetupError> {
    match kind {
        ProviderKind::Pseudo => Ok(PseudoProvider::new().into()),
        ProviderKind::Google => {
            let api_key = api_key
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .ok_or(ProviderSetupError::MissingCredentials(kind))?;
            let provider = GoogleTranslateProvider::new(api_key)?;
            Ok(match api_url {
                Some(url) => provider.with_base_url(url),
                None => provider,
            }
            .into())
        }
    }
}
