//! Lookup helpers over a provider's language catalog.

use tolk_providers::TranslationProvider;

/// Display name for `code`, falling back to the raw code so unknown
/// entries still render somehow.
pub fn display_name(provider: &dyn TranslationProvider, code: &str) -> String {
    provider
        .languages()
        .iter()
        .find(|l| l.code == code)
        .map(|l| l.name.to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Whether the provider knows `code` at all.
pub fn supports(provider: &dyn TranslationProvider, code: &str) -> bool {
    provider.languages().iter().any(|l| l.code == code)
}

/// Whether `source -> target` is a direction the provider serves.
pub fn valid_pair(provider: &dyn TranslationProvider, source: &str, target: &str) -> bool {
    supports(provider, source) && provider.pairs(source).iter().any(|l| l.code == target)
}
