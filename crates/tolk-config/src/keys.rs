//! Settings keys shared by the session, the provider manager and the
//! settings stores.
//!
//! The flat keys mirror the desktop schema. Per-provider preferences are
//! namespaced as `providers.<name>.<pref>` so each backend keeps its own
//! language memory.

pub const INSTANT_TRANSLATION: &str = "instant-translation";
pub const REMEMBER_LAST_TRANSLATOR: &str = "remember-last-translator";
pub const DEFAULT_TRANSLATOR: &str = "default-translator";
pub const LAST_TRANSLATOR: &str = "last-translator";
pub const SHOW_ICON: &str = "show-icon";
pub const ENABLE_SHORTCUTS: &str = "enable-shortcuts";
pub const OPEN_TRANSLATOR: &str = "open-translator";
pub const TRANSLATE_FROM_CLIPBOARD: &str = "translate-from-clipboard";
pub const TRANSLATE_FROM_SELECTION: &str = "translate-from-selection";

pub const PREF_DEFAULT_SOURCE: &str = "default-source";
pub const PREF_DEFAULT_TARGET: &str = "default-target";
pub const PREF_LAST_SOURCE: &str = "last-source";
pub const PREF_LAST_TARGET: &str = "last-target";
pub const PREF_REMEMBER_LAST_LANG: &str = "remember-last-lang";

/// Key under which `pref` is stored for the given provider.
pub fn provider_pref(provider: &str, pref: &str) -> String {
    format!("providers.{provider}.{pref}")
}
