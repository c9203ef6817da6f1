//! Pseudo-localization provider.
//!
//! Swaps letters and digits for look-alike characters so untranslated or
//! truncated strings stand out in a running application, without any network
//! access. Brace placeholders whose digit got swapped (`{Ó}`) are put back
//! (`{0}`) so formatting keeps working even without no-translate patterns.

use std::sync::LazyLock;

use regex::Regex;

use super::{ProviderError, TranslationProvider};

static MANGLED_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([AÊîÓ])\}").expect("valid placeholder regex"));

#[derive(Debug, Clone, Copy, Default)]
pub struct PseudoProvider;

impl PseudoProvider {
    pub fn new() -> Self {
        Self
    }

    /// Pseudo-localize a single text.
    pub fn pseudo_localize(text: &str) -> String {
        let substituted: String = text.chars().map(substitute).collect();
        MANGLED_PLACEHOLDER
            .replace_all(&substituted, |caps: &regex::Captures<'_>| {
                let digit = match &caps[1] {
                    "A" => "4",
                    "Ê" => "3",
                    "î" => "1",
                    _ => "0",
                };
                format!("{{{}}}", digit)
            })
            .into_owned()
    }
}

fn substitute(c: char) -> char {
    match c {
        'A' | 'a' => '4',
        'E' | 'e' => '3',
        'I' | 'i' => '1',
        'O' | 'o' => '0',
        'U' | 'u' => 'û',
        'M' => 'm',
        'N' => 'Ñ',
        'n' => 'ñ',
        'C' => 'Ç',
        'c' => 'ç',
        '4' => 'A',
        '3' => 'Ê',
        '1' => 'î',
        '0' => 'Ó',
        other => other,
    }
}

impl TranslationProvider for PseudoProvider {
    fn name(&self) -> &str {
        "pseudo"
    }

    fn translate(
        &self,
        texts: &[String],
        _source_language: &str,
        _target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        Ok(texts.iter().map(|text| Self::pseudo_localize(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_pseudo_localize_letters() {
        assert_eq!(PseudoProvider::pseudo_localize("Bye"), "By3");
        assert_eq!(PseudoProvider::pseudo_localize("Cancel"), "Ç4ñç3l");
        assert_eq!(PseudoProvider::pseudo_localize("Menu"), "m3ñû");
    }

    #[test]
    fn test_pseudo_localize_swaps_digits() {
        assert_eq!(PseudoProvider::pseudo_localize("10 items"), "îÓ 1t3ms");
    }

    #[test]
    fn test_pseudo_localize_restores_brace_placeholders() {
        assert_eq!(PseudoProvider::pseudo_localize("Hello {0}"), "H3ll0 {0}");
        assert_eq!(
            PseudoProvider::pseudo_localize("{1} of {3} and {4}"),
            "{1} 0f {3} 4ñd {4}"
        );
    }

    #[test]
    fn test_pseudo_leaves_private_use_tokens_alone() {
        assert_eq!(
            PseudoProvider::pseudo_localize("Hello \u{E000}"),
            "H3ll0 \u{E000}"
        );
    }

    #[test]
    fn test_translate_preserves_order_and_length() {
        let texts = vec!["one".to_string(), "two".to_string(), String::new()];
        let result = PseudoProvider::new().translate(&texts, "en", "fr").unwrap();
        assert_eq!(result, vec!["0ñ3", "tw0", ""]);
    }
}
