mod event_flow_tests;
mod shutdown_tests;

/// Shared wiring: a real event loop over a mock backend, with the shell
/// as surface and status sink.
mod harness {
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::time::Duration;

    use kanal::AsyncSender;
    use tokio::task::JoinHandle;
    use tolk_core::manager::ProviderManager;
    use tolk_core::ports::SelectionSource;
    use tolk_core::session::Session;
    use tolk_core::settings::MemorySettings;
    use tolk_providers::{MockProvider, TranslationProvider};
    use tolk_types::{AppEvent, SelectionKind};

    use crate::events::event_loop;
    use crate::shell::Shell;

    /// Instant-translation delay used by the harness; short so tests can
    /// run against the wall clock.
    pub const INSTANT_DELAY: Duration = Duration::from_millis(50);

    #[derive(Default)]
    pub struct ScriptedSelection {
        pub clipboard: Mutex<Option<String>>,
        pub primary: Mutex<Option<String>>,
        pub written: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl SelectionSource for ScriptedSelection {
        async fn text(&self, kind: SelectionKind) -> Option<String> {
            match kind {
                SelectionKind::Clipboard => self.clipboard.lock().unwrap().clone(),
                SelectionKind::Primary => self.primary.lock().unwrap().clone(),
            }
        }

        fn set_text(&self, text: &str) {
            self.written.lock().unwrap().push(text.to_string());
        }
    }

    pub struct App {
        pub tx: AsyncSender<AppEvent>,
        pub shell: Arc<Shell>,
        pub settings: Arc<MemorySettings>,
        pub selection: Arc<ScriptedSelection>,
        pub providers: Vec<Arc<MockProvider>>,
        pub loop_handle: JoinHandle<anyhow::Result<()>>,
    }

    pub fn spawn_app(providers: Vec<Arc<MockProvider>>) -> App {
        spawn_app_with_settings(providers, Arc::new(MemorySettings::new()))
    }

    pub fn spawn_app_with_settings(
        providers: Vec<Arc<MockProvider>>,
        settings: Arc<MemorySettings>,
    ) -> App {
        let (tx, rx) = kanal::bounded_async(64);
        let shell = Arc::new(Shell::new(tx.clone()));
        let selection = Arc::new(ScriptedSelection::default());

        let dyn_providers = providers
            .iter()
            .map(|p| Arc::clone(p) as Arc<dyn TranslationProvider>)
            .collect();
        let manager = ProviderManager::new(dyn_providers, settings.clone()).unwrap();

        let session = Session::new(
            manager,
            settings.clone(),
            shell.clone(),
            shell.clone(),
            selection.clone(),
            tx.clone(),
            INSTANT_DELAY,
        );

        let loop_handle = tokio::spawn(event_loop(session, rx, shell.clone()));

        App {
            tx,
            shell,
            settings,
            selection,
            providers,
            loop_handle,
        }
    }

    pub async fn wait_until(what: &str, predicate: impl Fn() -> bool) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while !predicate() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {what}"));
    }
}
