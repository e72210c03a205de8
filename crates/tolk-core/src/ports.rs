//! Interfaces the session talks through instead of owning any front end
//! or platform resource directly. The app wires real implementations,
//! tests wire recording ones.

use std::sync::Arc;
use std::time::Duration;

use tolk_types::{MessageId, SelectionKind, Severity};

pub type SubscriptionId = u64;

/// Change handlers receive the key that changed.
pub type ChangeHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Persistent key/value settings. The schema only needs strings and
/// booleans, so the interface stays that narrow.
pub trait SettingsStore: Send + Sync {
    fn get_bool(&self, key: &str) -> Option<bool>;
    fn get_string(&self, key: &str) -> Option<String>;

    fn set_bool(&self, key: &str, value: bool);
    fn set_string(&self, key: &str, value: &str);

    /// Watch one key. The handler runs on every effective change until
    /// the returned id is passed to [`SettingsStore::disconnect`].
    fn on_change(&self, key: &str, handler: ChangeHandler) -> SubscriptionId;
    fn disconnect(&self, id: SubscriptionId);
}

/// Transient banner messages shown next to the dialog.
pub trait StatusSink: Send + Sync {
    /// Post a message. A `duration` of `None` keeps it up until it is
    /// removed explicitly; `busy` marks it as an activity indicator.
    fn add_message(
        &self,
        text: &str,
        duration: Option<Duration>,
        severity: Severity,
        busy: bool,
    ) -> MessageId;

    fn remove_message(&self, id: MessageId);
}

/// The two text boxes of the dialog.
pub trait TextSurface: Send + Sync {
    fn source_text(&self) -> String;

    /// Replace the source text. Implementations emit a `TextChanged`
    /// event for every change, including this programmatic one.
    fn set_source_text(&self, text: &str);

    /// Cap what the source box accepts, in characters.
    fn set_max_length(&self, limit: usize);

    fn output_text(&self) -> String;
    fn set_output(&self, text: &str);
    fn clear_output(&self);
}

/// Clipboard and primary selection access.
#[async_trait::async_trait]
pub trait SelectionSource: Send + Sync {
    /// Read a selection buffer. `None` means empty or unreadable.
    async fn text(&self, kind: SelectionKind) -> Option<String>;

    /// Write the clipboard. Fire and forget.
    fn set_text(&self, text: &str);
}
