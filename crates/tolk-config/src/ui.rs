use serde::{Deserialize, Serialize};

fn default_show_icon() -> bool {
    true
}

fn default_enable_shortcuts() -> bool {
    true
}

fn default_open_shortcut() -> String {
    "<Super>t".to_string()
}

fn default_clipboard_shortcut() -> String {
    "<Super><Shift>t".to_string()
}

fn default_selection_shortcut() -> String {
    "<Super><Alt>t".to_string()
}

/// Front-end toggles. The terminal shell only reports most of these; a
/// desktop front end maps them to a panel icon and real keybindings.
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    #[serde(default = "default_show_icon")]
    pub show_icon: bool,
    #[serde(default = "default_enable_shortcuts")]
    pub enable_shortcuts: bool,
    /// Binding that opens the translator dialog.
    #[serde(default = "default_open_shortcut")]
    pub open_shortcut: String,
    /// Binding that opens the dialog preloaded with the clipboard.
    #[serde(default = "default_clipboard_shortcut")]
    pub clipboard_shortcut: String,
    /// Binding that opens the dialog preloaded with the primary selection.
    #[serde(default = "default_selection_shortcut")]
    pub selection_shortcut: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_icon: default_show_icon(),
            enable_shortcuts: default_enable_shortcuts(),
            open_shortcut: default_open_shortcut(),
            clipboard_shortcut: default_clipboard_shortcut(),
            selection_shortcut: default_selection_shortcut(),
        }
    }
}
