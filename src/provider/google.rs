//! Google Translate API v2 provider.
//!
//! Texts are sent in a single POST per batch:
//!
//! ```json
//! { "q": ["Hello", "Bye"], "source": "en", "target": "fr", "format": "text" }
//! ```
//!
//! and the translations are read back from `data.translations[*].translatedText`,
//! which the API returns in request order.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{Value, json};
use tracing::debug;

use super::{ProviderError, TranslationProvider};

pub const DEFAULT_API_URL: &str = "https://translation.googleapis.com/language/translate/v2";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct GoogleTranslateProvider {
    api_key: String,
    client: Client,
    base_url: String,
}

impl GoogleTranslateProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("propbabel/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            api_key: api_key.into(),
            client,
            base_url: DEFAULT_API_URL.to_string(),
        })
    }

    /// Point the provider at another endpoint (a proxy or a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl std::fmt::Debug for GoogleTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateProvider")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl TranslationProvider for GoogleTranslateProvider {
    fn name(&self) -> &str {
        "Google Translate"
    }

    fn translate(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let body = json!({
            "q": texts,
            "source": source_language,
            "target": target_language,
            "format": "text"
        });

        debug!(
            segments = texts.len(),
            source_language, target_language, "Sending translation request"
        );

        let response = self
            .client
            .post(&self.base_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = response.json()?;
        parse_translations(&json)
    }
}

/// Extract the ordered `translatedText` values from an API response body.
fn parse_translations(json: &Value) -> Result<Vec<String>, ProviderError> {
    let translations = json["data"]["translations"].as_array().ok_or_else(|| {
        ProviderError::InvalidResponse("missing 'data.translations' array".to_string())
    })?;

    translations
        .iter()
        .enumerate()
        .map(|(index, translation)| {
            translation["translatedText"]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| {
                    ProviderError::InvalidResponse(format!(
                        "translation {} has no 'translatedText'",
                        index
                    ))
                })
        })
        .collect()
}
