use uuid::Uuid;

/// Events consumed by the single application loop. Everything that can
/// happen to a session, whether a shell action, a settings change or a
/// finished background task, arrives through this enum.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The translator dialog was opened.
    Open,
    /// The source entry changed, by keystroke or programmatic set.
    TextChanged,
    /// Explicit translate action.
    TranslateRequested,
    /// A provider call finished. `request_id` ties the result back to the
    /// request that spawned it so superseded results can be discarded.
    TranslationArrived {
        request_id: u64,
        outcome: TranslationOutcome,
    },
    /// The instant-translation timer fired.
    DebounceElapsed { generation: u64 },
    SwapLanguages,
    ResetLanguages,
    SetProvider(String),
    SetSourceLanguage(String),
    SetTargetLanguage(String),
    CopyTranslation,
    TranslateFromClipboard,
    TranslateFromSelection,
    /// An asynchronous clipboard or primary-selection read finished.
    SelectionText {
        kind: SelectionKind,
        text: Option<String>,
    },
    /// A watched settings key changed outside the session.
    SettingChanged(String),
    Shutdown,
}

/// Normalized result of a single provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Success { text: String },
    Failure { message: String },
}

/// Which selection buffer a text is read from or written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Clipboard,
    Primary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// Handle for a posted status message so it can be removed later.
pub type MessageId = Uuid;

pub fn new_message_id() -> MessageId {
    Uuid::new_v4()
}
