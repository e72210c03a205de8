use std::sync::Arc;

use kanal::AsyncReceiver;
use tolk_core::session::Session;
use tolk_types::{AppEvent, SelectionKind};

use crate::shell::Shell;

/// The single consumer: owns the session and applies every event in
/// arrival order. Ends on `Shutdown` or when the channel closes, tearing
/// the session down either way.
pub async fn event_loop(
    mut session: Session,
    events: AsyncReceiver<AppEvent>,
    shell: Arc<Shell>,
) -> anyhow::Result<()> {
    session.open();
    shell.refresh(&session);

    loop {
        let Ok(event) = events.recv().await else {
            tracing::debug!("event channel closed");
            session.shutdown();
            return Ok(());
        };

        tracing::trace!(?event, "handling event");
        match event {
            AppEvent::Open => session.open(),
            AppEvent::TextChanged => session.on_text_changed(),
            AppEvent::TranslateRequested => session.translate(),
            AppEvent::TranslationArrived {
                request_id,
                outcome,
            } => session.on_translation_arrived(request_id, outcome),
            AppEvent::DebounceElapsed { generation } => session.on_debounce_elapsed(generation),
            AppEvent::SwapLanguages => session.swap_languages(),
            AppEvent::ResetLanguages => session.reset_languages(),
            AppEvent::SetProvider(name) => session.set_provider(&name),
            AppEvent::SetSourceLanguage(code) => session.set_source_language(&code),
            AppEvent::SetTargetLanguage(code) => session.set_target_language(&code),
            AppEvent::CopyTranslation => session.copy_translation(),
            AppEvent::TranslateFromClipboard => {
                session.translate_from_selection(SelectionKind::Clipboard)
            }
            AppEvent::TranslateFromSelection => {
                session.translate_from_selection(SelectionKind::Primary)
            }
            AppEvent::SelectionText { kind, text } => session.on_selection_text(kind, text),
            AppEvent::SettingChanged(key) => {
                tracing::debug!(%key, "setting changed");
            }
            AppEvent::Shutdown => {
                session.shutdown();
                return Ok(());
            }
        }

        shell.refresh(&session);
    }
}
