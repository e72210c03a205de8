//! arboard-backed clipboard and primary-selection access.
//!
//! arboard talks to the display server synchronously, so reads go through
//! `spawn_blocking` to keep the event loop responsive. A connection is
//! opened per access; keeping one around would pin the display connection
//! for the whole process lifetime.

use arboard::Clipboard;
use async_trait::async_trait;
use tolk_core::ports::SelectionSource;
use tolk_types::SelectionKind;

pub struct SystemSelection;

impl SystemSelection {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemSelection {
    fn default() -> Self {
        Self::new()
    }
}

fn read(kind: SelectionKind) -> Option<String> {
    let mut clipboard = match Clipboard::new() {
        Ok(clipboard) => clipboard,
        Err(e) => {
            tracing::warn!("clipboard unavailable: {e}");
            return None;
        }
    };

    let result = match kind {
        SelectionKind::Clipboard => clipboard.get_text(),
        SelectionKind::Primary => read_primary(&mut clipboard),
    };

    match result {
        Ok(text) => Some(text),
        Err(e) => {
            // An empty buffer reports as an error in arboard.
            tracing::debug!(?kind, "selection read failed: {e}");
            None
        }
    }
}

#[cfg(target_os = "linux")]
fn read_primary(clipboard: &mut Clipboard) -> Result<String, arboard::Error> {
    use arboard::{GetExtLinux, LinuxClipboardKind};

    clipboard.get().clipboard(LinuxClipboardKind::Primary).text()
}

#[cfg(not(target_os = "linux"))]
fn read_primary(clipboard: &mut Clipboard) -> Result<String, arboard::Error> {
    // No primary selection outside Linux; the clipboard is the nearest
    // equivalent.
    clipboard.get_text()
}

#[async_trait]
impl SelectionSource for SystemSelection {
    async fn text(&self, kind: SelectionKind) -> Option<String> {
        tokio::task::spawn_blocking(move || read(kind))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("selection read task failed: {e}");
                None
            })
    }

    fn set_text(&self, text: &str) {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(text) {
                    tracing::warn!("clipboard write failed: {e}");
                }
            }
            Err(e) => tracing::warn!("clipboard unavailable: {e}"),
        });
    }
}
