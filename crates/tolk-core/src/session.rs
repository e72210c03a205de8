//! The dialog-side state machine: one session owns the provider manager,
//! the language pair, the busy indicator and every in-flight request.
//!
//! All mutation happens on the single event-loop task. Anything slow
//! (provider calls, the instant-translation timer, selection reads) runs
//! in a spawned task that reports back through the event channel, tagged
//! so late results can be told apart from current ones.

use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tolk_config::keys;
use tolk_types::{AppEvent, MessageId, SelectionKind, Severity, TranslationOutcome};

use crate::languages;
use crate::manager::ProviderManager;
use crate::ports::{SelectionSource, SettingsStore, StatusSink, TextSurface};

const BUSY_MESSAGE: &str = "Translating...";

const ERROR_STATUS_DURATION: Duration = Duration::from_millis(4000);
const COPY_STATUS_DURATION: Duration = Duration::from_millis(1500);
const EMPTY_SELECTION_STATUS_DURATION: Duration = Duration::from_millis(2000);

/// Lifecycle of the translate action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Translating,
}

pub struct Session {
    manager: ProviderManager,
    settings: Arc<dyn SettingsStore>,
    status: Arc<dyn StatusSink>,
    surface: Arc<dyn TextSurface>,
    selection: Arc<dyn SelectionSource>,
    events: AsyncSender<AppEvent>,
    cancel: CancellationToken,

    phase: Phase,
    source_lang: String,
    target_lang: String,
    /// Id handed to the most recent provider call. A completion only
    /// counts when it carries exactly this id.
    request_seq: u64,
    busy_message: Option<MessageId>,

    instant_delay: Duration,
    /// Stamp of the live debounce timer; older timer wakeups are stale.
    debounce_generation: u64,
    debounce_timer: Option<JoinHandle<()>>,
    /// Text changes to ignore before debouncing again, so programmatic
    /// inserts do not double-translate.
    suppressed_debounces: u32,
}

impl Session {
    pub fn new(
        manager: ProviderManager,
        settings: Arc<dyn SettingsStore>,
        status: Arc<dyn StatusSink>,
        surface: Arc<dyn TextSurface>,
        selection: Arc<dyn SelectionSource>,
        events: AsyncSender<AppEvent>,
        instant_delay: Duration,
    ) -> Self {
        let mut session = Self {
            manager,
            settings,
            status,
            surface,
            selection,
            events,
            cancel: CancellationToken::new(),
            phase: Phase::Idle,
            source_lang: String::new(),
            target_lang: String::new(),
            request_seq: 0,
            busy_message: None,
            instant_delay,
            debounce_generation: 0,
            debounce_timer: None,
            suppressed_debounces: 0,
        };
        session.apply_current_provider();
        session
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn source_language(&self) -> &str {
        &self.source_lang
    }

    pub fn target_language(&self) -> &str {
        &self.target_lang
    }

    pub fn provider_name(&self) -> &'static str {
        self.manager.current().name()
    }

    /// Input cap of the current provider, in characters.
    pub fn effective_limit(&self) -> usize {
        self.manager.current().limit()
    }

    pub fn manager(&self) -> &ProviderManager {
        &self.manager
    }

    /// The dialog was opened. Picks the provider to start with: the
    /// last-used one when the user opted into that, the default one
    /// otherwise.
    pub fn open(&mut self) {
        let remember = self
            .settings
            .get_bool(keys::REMEMBER_LAST_TRANSLATOR)
            .unwrap_or(false);

        let name = if remember {
            self.manager
                .last_used()
                .unwrap_or_else(|| self.manager.default_provider())
                .name()
        } else {
            self.manager.default_provider().name()
        };

        self.set_provider(name);
    }

    /// Issue a translate for the current entry text. Blank input is a
    /// silent no-op; anything else supersedes whatever was in flight.
    pub fn translate(&mut self) {
        let text = self.surface.source_text();
        if text.trim().is_empty() {
            return;
        }

        self.surface.clear_output();
        if let Some(old) = self.busy_message.take() {
            self.status.remove_message(old);
        }
        self.busy_message =
            Some(self.status.add_message(BUSY_MESSAGE, None, Severity::Info, true));
        self.phase = Phase::Translating;

        self.request_seq += 1;
        let request_id = self.request_seq;
        let provider = Arc::clone(self.manager.current());
        let source = self.source_lang.clone();
        let target = self.target_lang.clone();
        let events = self.events.clone();
        let cancel = self.cancel.child_token();

        tracing::debug!(
            provider = provider.name(),
            %source,
            %target,
            request_id,
            "issuing translate request"
        );

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                result = provider.translate(&source, &target, &text) => {
                    let outcome = match result {
                        Ok(translation) => TranslationOutcome::Success {
                            text: translation.text,
                        },
                        Err(e) => TranslationOutcome::Failure {
                            message: e.to_string(),
                        },
                    };
                    if let Err(e) = events
                        .send(AppEvent::TranslationArrived { request_id, outcome })
                        .await
                    {
                        tracing::debug!("translation result dropped, loop gone: {e}");
                    }
                }
            }
        });
    }

    /// A provider call finished. Superseded completions are discarded
    /// wholesale; the current one closes the busy indicator and either
    /// writes the output or reports the failure. A failure only posts a
    /// banner; it never touches the output box itself.
    pub fn on_translation_arrived(&mut self, request_id: u64, outcome: TranslationOutcome) {
        if request_id != self.request_seq {
            tracing::debug!(
                request_id,
                current = self.request_seq,
                "discarding superseded translation"
            );
            return;
        }

        if let Some(busy) = self.busy_message.take() {
            self.status.remove_message(busy);
        }
        self.phase = Phase::Idle;

        match outcome {
            TranslationOutcome::Success { text } => self.surface.set_output(&text),
            TranslationOutcome::Failure { message } => {
                tracing::warn!("translation failed: {message}");
                self.status.add_message(
                    &message,
                    Some(ERROR_STATUS_DURATION),
                    Severity::Error,
                    false,
                );
            }
        }
    }

    /// The source entry changed. With instant translation enabled this
    /// (re)arms the debounce timer; each keystroke pushes the deadline
    /// out again.
    pub fn on_text_changed(&mut self) {
        if !self.instant_translation_enabled() {
            return;
        }

        if self.suppressed_debounces > 0 {
            self.suppressed_debounces -= 1;
            return;
        }

        self.cancel_debounce();
        self.debounce_generation += 1;
        let generation = self.debounce_generation;
        let delay = self.instant_delay;
        let events = self.events.clone();

        self.debounce_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = events.send(AppEvent::DebounceElapsed { generation }).await {
                tracing::debug!("debounce wakeup dropped, loop gone: {e}");
            }
        }));
    }

    /// The debounce timer fired. Only the newest generation may trigger
    /// a translate; wakeups racing a later keystroke are ignored.
    pub fn on_debounce_elapsed(&mut self, generation: u64) {
        if generation != self.debounce_generation {
            return;
        }
        self.debounce_timer = None;
        self.translate();
    }

    /// Switch the current provider. Unknown names are rejected with a
    /// warning and leave everything untouched. A switch abandons any
    /// in-flight request so its result cannot land in the new context.
    pub fn set_provider(&mut self, name: &str) {
        if let Err(e) = self.manager.set_current(name) {
            tracing::warn!("provider switch rejected: {e}");
            return;
        }
        self.invalidate_pending();
        self.apply_current_provider();
    }

    pub fn set_source_language(&mut self, code: &str) {
        let provider = Arc::clone(self.manager.current());
        if !languages::supports(provider.as_ref(), code) {
            tracing::warn!(provider = provider.name(), %code, "unknown source language");
            return;
        }
        self.source_lang = code.to_string();
        self.remember_current_languages();
    }

    pub fn set_target_language(&mut self, code: &str) {
        let provider = Arc::clone(self.manager.current());
        if !languages::valid_pair(provider.as_ref(), &self.source_lang, code) {
            tracing::warn!(
                provider = provider.name(),
                source = %self.source_lang,
                target = %code,
                "unsupported language pair"
            );
            return;
        }
        self.target_lang = code.to_string();
        self.remember_current_languages();
    }

    /// Exchange source and target. Applying it twice restores the
    /// original pair.
    pub fn swap_languages(&mut self) {
        std::mem::swap(&mut self.source_lang, &mut self.target_lang);
        self.remember_current_languages();
        tracing::debug!(
            source = %self.source_lang,
            target = %self.target_lang,
            "languages swapped"
        );
    }

    /// Back to the provider's configured default pair.
    pub fn reset_languages(&mut self) {
        let name = self.manager.current().name();
        match self.manager.prefs(name) {
            Ok(prefs) => {
                self.source_lang = prefs.default_source;
                self.target_lang = prefs.default_target;
                self.remember_current_languages();
            }
            Err(e) => tracing::warn!("cannot reset languages: {e}"),
        }
    }

    /// Put the current translation on the clipboard, reporting either
    /// way.
    pub fn copy_translation(&mut self) {
        let text = self.surface.output_text();
        if text.trim().is_empty() {
            self.status.add_message(
                "There is nothing to copy.",
                Some(COPY_STATUS_DURATION),
                Severity::Error,
                false,
            );
            return;
        }

        self.selection.set_text(&text);
        self.status.add_message(
            "Translated text copied to clipboard.",
            Some(COPY_STATUS_DURATION),
            Severity::Info,
            false,
        );
    }

    /// Kick off an asynchronous read of the given selection buffer; the
    /// result comes back as a `SelectionText` event.
    pub fn translate_from_selection(&mut self, kind: SelectionKind) {
        let selection = Arc::clone(&self.selection);
        let events = self.events.clone();
        let cancel = self.cancel.child_token();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                text = selection.text(kind) => {
                    if let Err(e) = events.send(AppEvent::SelectionText { kind, text }).await {
                        tracing::debug!("selection text dropped, loop gone: {e}");
                    }
                }
            }
        });
    }

    /// A selection read finished. Empty buffers are reported; anything
    /// else lands in the entry and is translated right away, with the
    /// echoing `TextChanged` exempted from debouncing.
    pub fn on_selection_text(&mut self, kind: SelectionKind, text: Option<String>) {
        let text = text.unwrap_or_default();
        if text.trim().is_empty() {
            let message = match kind {
                SelectionKind::Clipboard => "Clipboard is empty.",
                SelectionKind::Primary => "Primary selection is empty.",
            };
            self.status.add_message(
                message,
                Some(EMPTY_SELECTION_STATUS_DURATION),
                Severity::Error,
                false,
            );
            return;
        }

        if self.instant_translation_enabled() {
            self.suppressed_debounces = self.suppressed_debounces.saturating_add(1);
        }
        self.surface.set_source_text(&text);
        self.translate();
    }

    /// Ordered teardown: stop the debounce timer first, then cancel every
    /// outstanding task so no completion is delivered afterwards.
    pub fn shutdown(&mut self) {
        self.cancel_debounce();
        self.cancel.cancel();
        self.invalidate_pending();
        tracing::debug!("session shut down");
    }

    fn instant_translation_enabled(&self) -> bool {
        self.settings
            .get_bool(keys::INSTANT_TRANSLATION)
            .unwrap_or(false)
    }

    fn cancel_debounce(&mut self) {
        if let Some(timer) = self.debounce_timer.take() {
            timer.abort();
        }
    }

    /// Forget the in-flight request, if any: its id can no longer match,
    /// and the busy indicator it opened is closed here.
    fn invalidate_pending(&mut self) {
        self.request_seq += 1;
        if let Some(busy) = self.busy_message.take() {
            self.status.remove_message(busy);
        }
        self.phase = Phase::Idle;
    }

    /// Impose the current provider on the surface and load its language
    /// pair.
    fn apply_current_provider(&mut self) {
        let provider = Arc::clone(self.manager.current());
        self.surface.set_max_length(provider.limit());

        match self.manager.prefs(provider.name()) {
            Ok(prefs) => {
                let (source, target) = prefs.initial_languages();
                self.source_lang = source;
                self.target_lang = target;
                self.remember_current_languages();
            }
            Err(e) => tracing::warn!("cannot load provider prefs: {e}"),
        }
    }

    fn remember_current_languages(&self) {
        let name = self.manager.current().name();
        self.manager
            .remember_languages(name, &self.source_lang, &self.target_lang);
    }
}
