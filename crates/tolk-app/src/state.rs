use std::sync::Arc;

use tolk_config::{Config, keys};

use crate::settings::FileSettings;

pub struct AppState {
    pub config: Config,
    pub settings: Arc<FileSettings>,
}

impl AppState {
    /// Config values seed the settings store on first run; afterwards the
    /// stored values are authoritative, so seeding never overwrites.
    pub fn new(config: Config, settings: Arc<FileSettings>) -> Self {
        settings.seed_bool(keys::INSTANT_TRANSLATION, config.translate.instant_translation);
        settings.seed_bool(
            keys::REMEMBER_LAST_TRANSLATOR,
            config.translate.remember_last_translator,
        );
        settings.seed_string(keys::DEFAULT_TRANSLATOR, &config.translate.default_translator);
        settings.seed_bool(keys::SHOW_ICON, config.ui.show_icon);
        settings.seed_bool(keys::ENABLE_SHORTCUTS, config.ui.enable_shortcuts);
        settings.seed_string(keys::OPEN_TRANSLATOR, &config.ui.open_shortcut);
        settings.seed_string(keys::TRANSLATE_FROM_CLIPBOARD, &config.ui.clipboard_shortcut);
        settings.seed_string(keys::TRANSLATE_FROM_SELECTION, &config.ui.selection_shortcut);

        Self { config, settings }
    }
}
