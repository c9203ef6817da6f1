//! Shielding of no-translate spans.
//!
//! Every match of the configured patterns is swapped for a single
//! private-use character before the text goes to a provider, and swapped back
//! afterwards. Providers pass these characters through untouched in practice;
//! a provider that drops or alters one leaves that span unrestored.

use std::collections::HashMap;

use regex::Regex;
use thiserror::Error;

const TOKEN_RANGE: std::ops::RangeInclusive<u32> = 0xE000..=0xF8FF;

#[derive(Debug, Error)]
pub enum ProtectError {
    #[error("invalid no-translate pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("text has more protected spans than available placeholder tokens")]
    TokenSpaceExhausted,
}

/// Token to original substring, scoped to a single value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreMap {
    spans: HashMap<char, String>,
}

impl RestoreMap {
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Replace every known token in `text` with the span it stands for.
    pub fn restore(&self, text: &str) -> String {
        if self.spans.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match self.spans.get(&c) {
                Some(original) => out.push_str(original),
                None => out.push(c),
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protected {
    pub text: String,
    pub restore: RestoreMap,
}

#[derive(Debug, Clone, Default)]
pub struct PatternProtector {
    patterns: Vec<String>,
    combined: Option<Regex>,
}

impl PatternProtector {
    /// Compile `patterns` into a single alternation, keeping their order.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ProtectError> {
        let patterns: Vec<String> = patterns.iter().map(|p| p.as_ref().to_string()).collect();

        for pattern in &patterns {
            Regex::new(pattern).map_err(|source| ProtectError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
        }

        let combined = if patterns.is_empty() {
            None
        } else {
            let alternation = patterns
                .iter()
                .map(|p| format!("(?:{})", p))
                .collect::<Vec<_>>()
                .join("|");
            Some(
                Regex::new(&alternation).map_err(|source| ProtectError::InvalidPattern {
                    pattern: alternation.clone(),
                    source,
                })?,
            )
        };

        Ok(Self { patterns, combined })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Replace each non-empty match with a fresh placeholder token.
    pub fn pre_process(&self, text: &str) -> Result<Protected, ProtectError> {
        let Some(combined) = &self.combined else {
            return Ok(Protected {
                text: text.to_string(),
                restore: RestoreMap::default(),
            });
        };

        let mut tokens = TOKEN_RANGE
            .filter_map(char::from_u32)
            .filter(|c| !text.contains(*c));
        let mut restore = RestoreMap::default();
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for m in combined.find_iter(text) {
            if m.is_empty() {
                continue;
            }
            let token = tokens.next().ok_or(ProtectError::TokenSpaceExhausted)?;
            out.push_str(&text[last..m.start()]);
            out.push(token);
            restore.spans.insert(token, m.as_str().to_string());
            last = m.end();
        }
        out.push_str(&text[last..]);

        Ok(Protected { text: out, restore })
    }

    pub fn post_process(&self, text: &str, restore: &RestoreMap) -> String {
        restore.restore(text)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn placeholders() -> PatternProtector {
        PatternProtector::new(&[r"\{\d+\}"]).unwrap()
    }

    #[test]
    fn test_pre_process_replaces_matches_with_tokens() {
        let protected = placeholders().pre_process("Hello {0}, you have {1} messages").unwrap();

        assert_eq!(protected.text, "Hello \u{E000}, you have \u{E001} messages");
        assert_eq!(protected.restore.len(), 2);
    }

    #[test]
    fn test_round_trip_restores_text() {
        let protector = PatternProtector::new(&[r"\{\d+\}", r"<[^>]+>", r"%s"]).unwrap();
        for text in [
            "Hello {0}",
            "<b>{0}</b> of %s",
            "{0}{1}{2}",
            "no spans here",
            "",
            "{0} and {0}",
        ] {
            let protected = protector.pre_process(text).unwrap();
            assert_eq!(protector.post_process(&protected.text, &protected.restore), text);
        }
    }

    #[test]
    fn test_no_patterns_is_identity() {
        let protector = PatternProtector::new::<&str>(&[]).unwrap();
        let protected = protector.pre_process("Hello {0}").unwrap();

        assert_eq!(protected.text, "Hello {0}");
        assert!(protected.restore.is_empty());
    }

    #[test]
    fn test_tokens_skip_characters_present_in_text() {
        let protected = placeholders().pre_process("\u{E000} {0}").unwrap();

        assert_eq!(protected.text, "\u{E000} \u{E001}");
        assert_eq!(
            placeholders().post_process(&protected.text, &protected.restore),
            "\u{E000} {0}"
        );
    }

    #[test]
    fn test_post_process_survives_reordering() {
        let protector = placeholders();
        let protected = protector.pre_process("{0} sent {1}").unwrap();

        // The provider moved the tokens around.
        let translated = "\u{E001} fue enviado por \u{E000}";
        assert_eq!(
            protector.post_process(translated, &protected.restore),
            "{1} fue enviado por {0}"
        );
    }

    #[test]
    fn test_post_process_leaves_corrupted_token() {
        let protector = placeholders();
        let protected = protector.pre_process("Hello {0}").unwrap();

        assert_eq!(protector.post_process("Hola ?", &protected.restore), "Hola ?");
    }

    #[test]
    fn test_empty_matches_are_ignored() {
        let protector = PatternProtector::new(&[r"x*"]).unwrap();
        let protected = protector.pre_process("axxb").unwrap();

        assert_eq!(protected.text, "a\u{E000}b");
        assert_eq!(protector.post_process(&protected.text, &protected.restore), "axxb");
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PatternProtector::new(&[r"\{\d+\}", r"(unclosed"]).unwrap_err();
        assert!(matches!(
            err,
            ProtectError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"
        ));
    }

    #[test]
    fn test_patterns_keep_order() {
        let protector = PatternProtector::new(&["b", "a"]).unwrap();
        assert_eq!(protector.patterns(), ["b", "a"]);
    }
}
