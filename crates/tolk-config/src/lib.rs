use serde::{Deserialize, Serialize};

use self::providers::ProvidersConfig;
use self::translate::TranslateConfig;
use self::ui::UiConfig;

pub mod keys;
pub mod providers;
pub mod translate;
pub mod ui;

#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub translate: TranslateConfig,
    pub ui: UiConfig,
    pub providers: ProvidersConfig,
}

impl Config {
    pub fn new() -> Self {
        Config {
            translate: TranslateConfig::new(),
            ui: UiConfig::default(),
            providers: ProvidersConfig::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
