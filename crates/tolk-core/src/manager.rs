use std::sync::Arc;
use std::time::Duration;

use tolk_config::keys;
use tolk_config::providers::ProvidersConfig;
use tolk_providers::{
    GoogleTranslate, LibreTranslate, ProviderKind, TranslationProvider, YandexTranslate,
};

use crate::ports::SettingsStore;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ManagerError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("provider registered twice: {0}")]
    DuplicateProvider(String),

    #[error("no providers registered")]
    NoProviders,
}

/// Owns every registered backend plus the current, last-used and default
/// bookkeeping around them. Indices stay stable because the set is fixed
/// at construction.
pub struct ProviderManager {
    providers: Vec<Arc<dyn TranslationProvider>>,
    settings: Arc<dyn SettingsStore>,
    current: usize,
    last_used: Option<usize>,
}

impl std::fmt::Debug for ProviderManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderManager")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("current", &self.current)
            .field("last_used", &self.last_used)
            .finish_non_exhaustive()
    }
}

impl ProviderManager {
    /// Build a manager over an explicit provider set. The configured
    /// default becomes current; the first registered provider when the
    /// settings name nothing usable.
    pub fn new(
        providers: Vec<Arc<dyn TranslationProvider>>,
        settings: Arc<dyn SettingsStore>,
    ) -> Result<Self, ManagerError> {
        if providers.is_empty() {
            return Err(ManagerError::NoProviders);
        }

        for (i, provider) in providers.iter().enumerate() {
            if providers[..i].iter().any(|p| p.name() == provider.name()) {
                return Err(ManagerError::DuplicateProvider(provider.name().to_string()));
            }
        }

        let mut manager = Self {
            providers,
            settings,
            current: 0,
            last_used: None,
        };
        manager.current = manager.default_index();

        Ok(manager)
    }

    /// Build the full built-in set from backend configuration.
    pub fn from_config(
        config: &ProvidersConfig,
        settings: Arc<dyn SettingsStore>,
    ) -> Result<Self, ManagerError> {
        let timeout = Duration::from_secs(config.http_timeout_secs);

        let providers = ProviderKind::ALL
            .iter()
            .map(|kind| -> Arc<dyn TranslationProvider> {
                match kind {
                    ProviderKind::Google => Arc::new(GoogleTranslate::new(timeout)),
                    ProviderKind::Yandex => {
                        Arc::new(YandexTranslate::new(config.yandex_api_key.clone(), timeout))
                    }
                    ProviderKind::LibreTranslate => Arc::new(LibreTranslate::new(
                        config.libre_endpoint.clone(),
                        config.libre_api_key.clone(),
                        timeout,
                    )),
                }
            })
            .collect();

        Self::new(providers, settings)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.providers.iter().position(|p| p.name() == name)
    }

    fn default_index(&self) -> usize {
        let configured = self.settings.get_string(keys::DEFAULT_TRANSLATOR);

        match configured.as_deref().and_then(|name| self.index_of(name)) {
            Some(index) => index,
            None => {
                if let Some(name) = configured {
                    tracing::warn!(
                        "default translator {name:?} is not registered, using the first one"
                    );
                }
                0
            }
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn get(&self, name: &str) -> Result<&Arc<dyn TranslationProvider>, ManagerError> {
        self.index_of(name)
            .map(|i| &self.providers[i])
            .ok_or_else(|| ManagerError::UnknownProvider(name.to_string()))
    }

    pub fn current(&self) -> &Arc<dyn TranslationProvider> {
        &self.providers[self.current]
    }

    pub fn last_used(&self) -> Option<&Arc<dyn TranslationProvider>> {
        self.last_used.map(|i| &self.providers[i])
    }

    pub fn default_provider(&self) -> &Arc<dyn TranslationProvider> {
        &self.providers[self.default_index()]
    }

    /// Make `name` current. The previously current provider becomes
    /// last-used and the switch is persisted.
    pub fn set_current(&mut self, name: &str) -> Result<(), ManagerError> {
        let index = self
            .index_of(name)
            .ok_or_else(|| ManagerError::UnknownProvider(name.to_string()))?;

        self.last_used = Some(self.current);
        self.current = index;
        self.settings.set_string(keys::LAST_TRANSLATOR, name);

        Ok(())
    }

    /// Stored language preferences for one provider, with the provider's
    /// built-in pair filling the gaps.
    pub fn prefs(&self, name: &str) -> Result<ProviderPrefs, ManagerError> {
        let provider = self.get(name)?;

        let string_pref = |pref: &str| self.settings.get_string(&keys::provider_pref(name, pref));

        Ok(ProviderPrefs {
            default_source: string_pref(keys::PREF_DEFAULT_SOURCE)
                .unwrap_or_else(|| provider.default_source().to_string()),
            default_target: string_pref(keys::PREF_DEFAULT_TARGET)
                .unwrap_or_else(|| provider.default_target().to_string()),
            last_source: string_pref(keys::PREF_LAST_SOURCE),
            last_target: string_pref(keys::PREF_LAST_TARGET),
            remember_last_lang: self
                .settings
                .get_bool(&keys::provider_pref(name, keys::PREF_REMEMBER_LAST_LANG))
                .unwrap_or(false),
        })
    }

    /// Persist the pair that was last active for `name`.
    pub fn remember_languages(&self, name: &str, source: &str, target: &str) {
        self.settings
            .set_string(&keys::provider_pref(name, keys::PREF_LAST_SOURCE), source);
        self.settings
            .set_string(&keys::provider_pref(name, keys::PREF_LAST_TARGET), target);
    }
}

/// Stored language preferences of one provider.
#[derive(Debug, Clone)]
pub struct ProviderPrefs {
    pub default_source: String,
    pub default_target: String,
    pub last_source: Option<String>,
    pub last_target: Option<String>,
    pub remember_last_lang: bool,
}

impl ProviderPrefs {
    /// The pair a session starts from: the remembered one when the user
    /// opted in and one exists, the defaults otherwise.
    pub fn initial_languages(&self) -> (String, String) {
        if self.remember_last_lang {
            (
                self.last_source
                    .clone()
                    .unwrap_or_else(|| self.default_source.clone()),
                self.last_target
                    .clone()
                    .unwrap_or_else(|| self.default_target.clone()),
            )
        } else {
            (self.default_source.clone(), self.default_target.clone())
        }
    }
}
