use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tolk_config::keys;
use tolk_core::manager::ProviderManager;
use tolk_core::ports::{SelectionSource, SettingsStore, SubscriptionId};
use tolk_core::session::Session;
use tolk_io::SystemSelection;
use tolk_providers::{MockBehavior, MockProvider, TranslationProvider};
use tolk_types::AppEvent;

use crate::events::event_loop;
use crate::shell::{Shell, input_loop};
use crate::state::AppState;

/// Centralized channel management
pub struct ChannelSet {
    pub events: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            events: kanal::bounded_async(64), // shell interactions plus task completions
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
    subscriptions: Vec<SubscriptionId>,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
            subscriptions: Vec::new(),
        }
    }

    pub fn spawn_tasks(&mut self, offline: bool) -> anyhow::Result<JoinSet<anyhow::Result<()>>> {
        let tx = self.channels.events.0.clone();
        let rx = self.channels.events.1.clone();
        let settings: Arc<dyn SettingsStore> = self.state.settings.clone();

        let manager = if offline {
            let provider: Arc<dyn TranslationProvider> =
                Arc::new(MockProvider::new("Mock", 5000, MockBehavior::Suffix));
            ProviderManager::new(vec![provider], settings.clone())?
        } else {
            ProviderManager::from_config(&self.state.config.providers, settings.clone())?
        };

        let shell = Arc::new(Shell::new(tx.clone()));
        let selection: Arc<dyn SelectionSource> = Arc::new(SystemSelection::new());

        let session = Session::new(
            manager,
            settings.clone(),
            shell.clone(),
            shell.clone(),
            selection,
            tx.clone(),
            Duration::from_millis(self.state.config.translate.instant_delay_ms),
        );

        // Surface external settings flips in the loop's log.
        for key in [
            keys::INSTANT_TRANSLATION,
            keys::SHOW_ICON,
            keys::ENABLE_SHORTCUTS,
        ] {
            let notify = tx.clone();
            self.subscriptions.push(settings.on_change(
                key,
                Arc::new(move |key| {
                    let _ = notify.try_send(AppEvent::SettingChanged(key.to_string()));
                }),
            ));
        }

        let mut tasks = JoinSet::new();

        // Event loop
        tasks.spawn(event_loop(session, rx, shell.clone()));

        // Shell input
        tasks.spawn(input_loop(
            shell,
            settings,
            tx,
            self.cancel_token.child_token(),
        ));

        Ok(tasks)
    }

    /// Ordered teardown: stop feeding the loop, detach the settings
    /// watchers, then let the loop run the session's own shutdown.
    pub async fn shutdown(&self) {
        self.cancel_token.cancel();
        for id in &self.subscriptions {
            self.state.settings.disconnect(*id);
        }
        let _ = self.channels.events.0.send(AppEvent::Shutdown).await;
    }
}
