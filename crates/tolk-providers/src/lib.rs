//! Translation backends behind one trait.
//!
//! The rest of the system only ever sees [`TranslationProvider`]; adding a
//! backend means one new module plus a [`ProviderKind`] variant.

pub mod google;
pub mod libre;
pub mod mock;
pub mod yandex;

pub use google::GoogleTranslate;
pub use libre::LibreTranslate;
pub use mock::{MockBehavior, MockProvider};
pub use yandex::YandexTranslate;

pub type LanguageCode = String;

/// A language a backend can translate from or to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

/// Translation provider interface
#[async_trait::async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Display name, also the key the provider is registered under.
    fn name(&self) -> &'static str;

    /// Longest input the backend accepts, in characters.
    fn limit(&self) -> usize;

    /// Every language the backend knows about.
    fn languages(&self) -> &'static [Language];

    /// Admissible target languages for the given source code.
    fn pairs(&self, source: &str) -> Vec<Language>;

    /// Built-in language pair, used when settings carry none.
    fn default_source(&self) -> &'static str;
    fn default_target(&self) -> &'static str;

    /// Translate text from source to target language
    async fn translate(
        &self,
        source: &str,
        target: &str,
        text: &str,
    ) -> Result<Translation, TranslateError>;

    /// Input checks every backend runs before any network traffic.
    fn validate_input(&self, text: &str) -> Result<(), TranslateError> {
        if text.trim().is_empty() {
            return Err(TranslateError::EmptyText);
        }

        let len = text.chars().count();
        if len > self.limit() {
            return Err(TranslateError::TooLong {
                len,
                limit: self.limit(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub from: LanguageCode,
    pub to: LanguageCode,
    pub provider: &'static str,
    /// Source language the backend detected, when it reports one.
    pub detected_source: Option<LanguageCode>,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("there is nothing to translate")]
    EmptyText,

    #[error("text is too long: {len} of at most {limit} characters")]
    TooLong { len: usize, limit: usize },

    #[error("API error: {0}")]
    Api(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{provider} answered HTTP {status}")]
    Http { provider: &'static str, status: u16 },

    #[error("rate or quota limit exceeded")]
    RateLimitExceeded,

    #[error("invalid or missing API key")]
    Authentication,

    #[error("unsupported language pair: {from} -> {to}")]
    UnsupportedPair { from: String, to: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// The closed set of built-in backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Google,
    Yandex,
    LibreTranslate,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::Google,
        ProviderKind::Yandex,
        ProviderKind::LibreTranslate,
    ];

    /// Registry key of the backend this kind stands for.
    pub fn name(self) -> &'static str {
        match self {
            ProviderKind::Google => google::NAME,
            ProviderKind::Yandex => yandex::NAME,
            ProviderKind::LibreTranslate => libre::NAME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_rejects_blank_input() {
        let provider = MockProvider::new("mock", 100, MockBehavior::Echo);

        assert!(matches!(
            provider.validate_input("   \n\t "),
            Err(TranslateError::EmptyText)
        ));
    }

    #[test]
    fn validation_counts_characters_not_bytes() {
        let provider = MockProvider::new("mock", 3, MockBehavior::Echo);

        // Three multibyte characters are exactly at the limit.
        assert!(provider.validate_input("äöü").is_ok());
        assert!(matches!(
            provider.validate_input("äöüß"),
            Err(TranslateError::TooLong { len: 4, limit: 3 })
        ));
    }

    #[test]
    fn kind_names_match_backend_registry_keys() {
        assert_eq!(ProviderKind::Google.name(), "Google");
        assert_eq!(ProviderKind::Yandex.name(), "Yandex");
        assert_eq!(ProviderKind::LibreTranslate.name(), "LibreTranslate");
    }
}
