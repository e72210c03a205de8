use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::ports::{ChangeHandler, SettingsStore, SubscriptionId};

/// Everything a store holds, for persistence and seeding.
#[derive(Debug, Clone, Default)]
pub struct SettingsSnapshot {
    pub strings: HashMap<String, String>,
    pub bools: HashMap<String, bool>,
}

struct Subscriber {
    id: SubscriptionId,
    key: String,
    handler: ChangeHandler,
}

/// In-memory settings store. Used directly in tests and as the working
/// set behind the file-backed store in the app.
#[derive(Default)]
pub struct MemorySettings {
    strings: Mutex<HashMap<String, String>>,
    bools: Mutex<HashMap<String, bool>>,
    subscribers: Mutex<Vec<Subscriber>>,
    next_subscription: AtomicU64,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: SettingsSnapshot) -> Self {
        Self {
            strings: Mutex::new(snapshot.strings),
            bools: Mutex::new(snapshot.bools),
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            strings: self.strings.lock().unwrap().clone(),
            bools: self.bools.lock().unwrap().clone(),
        }
    }

    /// Store a default without overwriting an existing value and without
    /// waking subscribers.
    pub fn seed_bool(&self, key: &str, value: bool) {
        self.bools
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_insert(value);
    }

    /// See [`MemorySettings::seed_bool`].
    pub fn seed_string(&self, key: &str, value: &str) {
        self.strings
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
    }

    fn notify(&self, key: &str) {
        // Handlers run outside the subscriber lock so they may register
        // or remove subscriptions themselves.
        let handlers: Vec<ChangeHandler> = {
            let subscribers = self.subscribers.lock().unwrap();
            subscribers
                .iter()
                .filter(|s| s.key == key)
                .map(|s| s.handler.clone())
                .collect()
        };

        for handler in handlers {
            handler(key);
        }
    }
}

impl SettingsStore for MemorySettings {
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.bools.lock().unwrap().get(key).copied()
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.strings.lock().unwrap().get(key).cloned()
    }

    fn set_bool(&self, key: &str, value: bool) {
        let previous = self.bools.lock().unwrap().insert(key.to_string(), value);
        if previous != Some(value) {
            self.notify(key);
        }
    }

    fn set_string(&self, key: &str, value: &str) {
        let previous = self
            .strings
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        if previous.as_deref() != Some(value) {
            self.notify(key);
        }
    }

    fn on_change(&self, key: &str, handler: ChangeHandler) -> SubscriptionId {
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed);
        self.subscribers.lock().unwrap().push(Subscriber {
            id,
            key: key.to_string(),
            handler,
        });
        id
    }

    fn disconnect(&self, id: SubscriptionId) {
        self.subscribers.lock().unwrap().retain(|s| s.id != id);
    }
}
