//! Deterministic in-process backend for tests and offline runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::{Language, TranslateError, Translation, TranslationProvider};

const LANGUAGES: &[Language] = &[
    Language { code: "en", name: "English" },
    Language { code: "es", name: "Spanish" },
    Language { code: "fr", name: "French" },
    Language { code: "de", name: "German" },
];

/// What the mock does with input that passed validation.
pub enum MockBehavior {
    /// Append `:<target>` to the input.
    Suffix,
    /// Answer from a fixed `(text, target)` table, erroring on misses.
    Mappings(HashMap<(String, String), String>),
    /// Echo the input unchanged.
    Echo,
    /// Fail every call with this message.
    Fail(String),
}

pub struct MockProvider {
    name: &'static str,
    limit: usize,
    behavior: MockBehavior,
    delay: Duration,
    languages: &'static [Language],
    default_source: &'static str,
    default_target: &'static str,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(name: &'static str, limit: usize, behavior: MockBehavior) -> Self {
        Self {
            name,
            limit,
            behavior,
            delay: Duration::ZERO,
            languages: LANGUAGES,
            default_source: "en",
            default_target: "es",
            calls: AtomicUsize::new(0),
        }
    }

    /// Make each call take this long, to simulate a slow backend.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_languages(
        mut self,
        languages: &'static [Language],
        default_source: &'static str,
        default_target: &'static str,
    ) -> Self {
        self.languages = languages;
        self.default_source = default_source;
        self.default_target = default_target;
        self
    }

    /// How many calls made it past input validation, i.e. would have
    /// reached the network on a real backend.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn limit(&self) -> usize {
        self.limit
    }

    fn languages(&self) -> &'static [Language] {
        self.languages
    }

    fn pairs(&self, source: &str) -> Vec<Language> {
        self.languages
            .iter()
            .copied()
            .filter(|l| l.code != source)
            .collect()
    }

    fn default_source(&self) -> &'static str {
        self.default_source
    }

    fn default_target(&self) -> &'static str {
        self.default_target
    }

    async fn translate(
        &self,
        source: &str,
        target: &str,
        text: &str,
    ) -> Result<Translation, TranslateError> {
        self.validate_input(text)?;
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let translated = match &self.behavior {
            MockBehavior::Suffix => format!("{text}:{target}"),
            MockBehavior::Mappings(map) => map
                .get(&(text.to_string(), target.to_string()))
                .cloned()
                .ok_or_else(|| {
                    TranslateError::Api(format!("no mapping for {text:?} -> {target}"))
                })?,
            MockBehavior::Echo => text.to_string(),
            MockBehavior::Fail(message) => {
                return Err(TranslateError::Api(message.clone()));
            }
        };

        Ok(Translation {
            text: translated,
            from: source.to_string(),
            to: target.to_string(),
            provider: self.name,
            detected_source: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn suffix_mode_tags_the_target() {
        let provider = MockProvider::new("mock", 100, MockBehavior::Suffix);

        let translation = provider.translate("en", "fr", "hello").await.unwrap();
        assert_eq!(translation.text, "hello:fr");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn mapping_misses_are_errors() {
        let mut map = HashMap::new();
        map.insert(
            ("hello".to_string(), "es".to_string()),
            "hola".to_string(),
        );
        let provider = MockProvider::new("mock", 100, MockBehavior::Mappings(map));

        let ok = provider.translate("en", "es", "hello").await.unwrap();
        assert_eq!(ok.text, "hola");

        let err = provider.translate("en", "fr", "hello").await.unwrap_err();
        assert!(matches!(err, TranslateError::Api(_)));
    }

    #[tokio::test]
    async fn rejected_input_is_not_counted_as_a_call() {
        let provider = MockProvider::new("mock", 5, MockBehavior::Echo);

        assert!(provider.translate("en", "es", "   ").await.is_err());
        assert!(provider.translate("en", "es", "too long!").await.is_err());
        assert_eq!(provider.calls(), 0);
    }
}
