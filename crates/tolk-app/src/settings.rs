//! JSON file-backed settings store.
//!
//! Wraps the in-memory store from `tolk-core` and writes the whole state
//! back to disk after every mutation. The schema is small enough that
//! rewriting the file beats tracking dirty keys.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tolk_core::ports::{ChangeHandler, SettingsStore, SubscriptionId};
use tolk_core::settings::{MemorySettings, SettingsSnapshot};

/// On-disk shape. Sorted maps keep the file diffable.
#[derive(Serialize, Deserialize, Default)]
struct StoredSettings {
    #[serde(default)]
    strings: BTreeMap<String, String>,
    #[serde(default)]
    bools: BTreeMap<String, bool>,
}

impl From<SettingsSnapshot> for StoredSettings {
    fn from(snapshot: SettingsSnapshot) -> Self {
        Self {
            strings: snapshot.strings.into_iter().collect(),
            bools: snapshot.bools.into_iter().collect(),
        }
    }
}

impl From<StoredSettings> for SettingsSnapshot {
    fn from(stored: StoredSettings) -> Self {
        Self {
            strings: stored.strings.into_iter().collect(),
            bools: stored.bools.into_iter().collect(),
        }
    }
}

pub struct FileSettings {
    inner: MemorySettings,
    path: PathBuf,
}

impl FileSettings {
    /// Load the store from `path`, starting empty when the file does not
    /// exist yet. A file that exists but does not parse is an error; the
    /// caller decides whether to bail or start over.
    pub fn load(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();

        let inner = if path.exists() {
            let data = fs::read_to_string(&path)?;
            let stored: StoredSettings = serde_json::from_str(&data)?;
            MemorySettings::from_snapshot(stored.into())
        } else {
            MemorySettings::new()
        };

        Ok(Self { inner, path })
    }

    /// Store a default without overwriting user state. Seeds are derived
    /// from config on every start, so they are not persisted.
    pub fn seed_bool(&self, key: &str, value: bool) {
        self.inner.seed_bool(key, value);
    }

    /// See [`FileSettings::seed_bool`].
    pub fn seed_string(&self, key: &str, value: &str) {
        self.inner.seed_string(key, value);
    }

    fn persist(&self) {
        let stored = StoredSettings::from(self.inner.snapshot());

        let result = (|| -> anyhow::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
            Ok(())
        })();

        if let Err(e) = result {
            tracing::error!("cannot persist settings to {}: {e}", self.path.display());
        }
    }
}

impl SettingsStore for FileSettings {
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.inner.get_bool(key)
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.inner.get_string(key)
    }

    fn set_bool(&self, key: &str, value: bool) {
        self.inner.set_bool(key, value);
        self.persist();
    }

    fn set_string(&self, key: &str, value: &str) {
        self.inner.set_string(key, value);
        self.persist();
    }

    fn on_change(&self, key: &str, handler: ChangeHandler) -> SubscriptionId {
        self.inner.on_change(key, handler)
    }

    fn disconnect(&self, id: SubscriptionId) {
        self.inner.disconnect(id)
    }
}

/// `$XDG_CONFIG_HOME/tolk/settings.json`, with the usual `~/.config`
/// fallback. Last resort is the working directory.
pub fn default_settings_path() -> PathBuf {
    let config_dir = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")));

    match config_dir {
        Some(dir) => dir.join("tolk").join("settings.json"),
        None => PathBuf::from("tolk-settings.json"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let settings = FileSettings::load(dir.path().join("settings.json")).unwrap();

        assert_eq!(settings.get_string("last-translator"), None);
        assert_eq!(settings.get_bool("instant-translation"), None);
    }

    #[test]
    fn values_survive_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = FileSettings::load(&path).unwrap();
        settings.set_string("last-translator", "Google");
        settings.set_bool("instant-translation", true);
        settings.set_bool("instant-translation", false);
        drop(settings);

        let reloaded = FileSettings::load(&path).unwrap();
        assert_eq!(
            reloaded.get_string("last-translator").as_deref(),
            Some("Google")
        );
        assert_eq!(reloaded.get_bool("instant-translation"), Some(false));
    }

    #[test]
    fn seeds_are_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = FileSettings::load(&path).unwrap();
        settings.seed_bool("show-icon", true);
        assert_eq!(settings.get_bool("show-icon"), Some(true));
        drop(settings);

        // Nothing was set, so nothing was written.
        assert!(!path.exists());
    }

    #[test]
    fn missing_parent_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join("settings.json");

        let settings = FileSettings::load(&path).unwrap();
        settings.set_bool("show-icon", false);

        assert!(path.exists());
    }

    #[test]
    fn garbage_on_disk_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json at all").unwrap();

        assert!(FileSettings::load(&path).is_err());
    }

    #[test]
    fn change_handlers_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        let settings = FileSettings::load(dir.path().join("settings.json")).unwrap();
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        let id = settings.on_change(
            "show-icon",
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        settings.set_bool("show-icon", true);
        settings.disconnect(id);
        settings.set_bool("show-icon", false);

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
