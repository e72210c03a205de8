use std::env;

use serde::{Deserialize, Serialize};

fn default_translator() -> String {
    "Google".to_string()
}

fn default_instant_translation() -> bool {
    false
}

fn default_instant_delay_ms() -> u64 {
    900
}

fn default_remember_last_translator() -> bool {
    false
}

/// Behavior of the translate session itself. These values seed the
/// settings store on first run; afterwards the store is authoritative.
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslateConfig {
    /// Provider selected when nothing else is remembered.
    #[serde(default = "default_translator")]
    pub default_translator: String,
    /// Translate automatically while the user types.
    #[serde(default = "default_instant_translation")]
    pub instant_translation: bool,
    /// Quiet period after the last keystroke before an instant translate.
    #[serde(default = "default_instant_delay_ms")]
    pub instant_delay_ms: u64,
    /// Reopen with the provider that was active last time.
    #[serde(default = "default_remember_last_translator")]
    pub remember_last_translator: bool,
}

impl TranslateConfig {
    pub fn new() -> Self {
        let instant_delay_ms = env::var("TOLK_INSTANT_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_instant_delay_ms);

        Self {
            instant_delay_ms,
            ..Self::default()
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            default_translator: default_translator(),
            instant_translation: default_instant_translation(),
            instant_delay_ms: default_instant_delay_ms(),
            remember_last_translator: default_remember_last_translator(),
        }
    }
}
