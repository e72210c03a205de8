use std::sync::Arc;
use std::time::Duration;

use tolk_config::keys;
use tolk_core::ports::{SettingsStore, TextSurface};
use tolk_providers::{MockBehavior, MockProvider};
use tolk_types::AppEvent;

use super::harness::{INSTANT_DELAY, spawn_app, spawn_app_with_settings, wait_until};

#[tokio::test]
async fn typed_text_translates_through_the_loop() {
    let app = spawn_app(vec![Arc::new(MockProvider::new(
        "Mock",
        100,
        MockBehavior::Suffix,
    ))]);

    // What the shell does for a plain input line.
    app.shell.set_source_text("hello");
    app.tx.send(AppEvent::TranslateRequested).await.unwrap();

    let shell = app.shell.clone();
    wait_until("the translation to land", move || {
        shell.output_text() == "hello:es"
    })
    .await;
    assert_eq!(app.providers[0].calls(), 1);
    assert_eq!(app.shell.view().provider, "Mock");
}

#[tokio::test]
async fn provider_switch_updates_the_view() {
    let app = spawn_app(vec![
        Arc::new(MockProvider::new("A", 1000, MockBehavior::Suffix)),
        Arc::new(MockProvider::new("B", 200, MockBehavior::Suffix)),
    ]);

    let shell = app.shell.clone();
    wait_until("the loop to start on A", move || {
        shell.view().provider == "A" && shell.view().limit == 1000
    })
    .await;

    app.tx
        .send(AppEvent::SetProvider("B".to_string()))
        .await
        .unwrap();

    let shell = app.shell.clone();
    wait_until("the switch to B", move || {
        let view = shell.view();
        view.provider == "B" && view.limit == 200
    })
    .await;
    assert_eq!(app.shell.view().providers, ["A", "B"]);
}

#[tokio::test]
async fn language_commands_flow_to_the_session() {
    let app = spawn_app(vec![Arc::new(MockProvider::new(
        "Mock",
        100,
        MockBehavior::Suffix,
    ))]);

    app.tx
        .send(AppEvent::SetSourceLanguage("fr".to_string()))
        .await
        .unwrap();
    app.tx
        .send(AppEvent::SetTargetLanguage("de".to_string()))
        .await
        .unwrap();
    app.tx.send(AppEvent::SwapLanguages).await.unwrap();

    let shell = app.shell.clone();
    wait_until("the swapped pair", move || {
        let view = shell.view();
        view.source == "de" && view.target == "fr"
    })
    .await;

    app.tx.send(AppEvent::ResetLanguages).await.unwrap();

    let shell = app.shell.clone();
    wait_until("the default pair", move || {
        let view = shell.view();
        view.source == "en" && view.target == "es"
    })
    .await;
}

#[tokio::test]
async fn clipboard_translates_exactly_once_bypassing_debounce() {
    let settings = Arc::new(tolk_core::settings::MemorySettings::new());
    settings.set_bool(keys::INSTANT_TRANSLATION, true);
    let app = spawn_app_with_settings(
        vec![Arc::new(MockProvider::new("Mock", 100, MockBehavior::Suffix))],
        settings,
    );

    *app.selection.clipboard.lock().unwrap() = Some("hola".to_string());
    app.tx.send(AppEvent::TranslateFromClipboard).await.unwrap();

    let shell = app.shell.clone();
    wait_until("the clipboard translation", move || {
        shell.output_text() == "hola:es"
    })
    .await;
    assert_eq!(app.providers[0].calls(), 1);

    // The insert's TextChanged echo was exempted from debouncing, so no
    // second translate may fire after the instant delay.
    tokio::time::sleep(INSTANT_DELAY * 4).await;
    assert_eq!(app.providers[0].calls(), 1);
}

#[tokio::test]
async fn instant_mode_translates_after_typing_pauses() {
    let settings = Arc::new(tolk_core::settings::MemorySettings::new());
    settings.set_bool(keys::INSTANT_TRANSLATION, true);
    let app = spawn_app_with_settings(
        vec![Arc::new(MockProvider::new("Mock", 100, MockBehavior::Suffix))],
        settings,
    );

    // A keystroke: the surface change echoes TextChanged into the loop.
    app.shell.set_source_text("hej");

    let shell = app.shell.clone();
    wait_until("the debounced translation", move || {
        shell.output_text() == "hej:es"
    })
    .await;
    assert_eq!(app.providers[0].calls(), 1);
}

#[tokio::test]
async fn copy_command_writes_the_clipboard() {
    let app = spawn_app(vec![Arc::new(MockProvider::new(
        "Mock",
        100,
        MockBehavior::Suffix,
    ))]);

    app.shell.set_source_text("hello");
    app.tx.send(AppEvent::TranslateRequested).await.unwrap();

    let shell = app.shell.clone();
    wait_until("the translation", move || !shell.output_text().is_empty()).await;

    app.tx.send(AppEvent::CopyTranslation).await.unwrap();

    let selection = app.selection.clone();
    wait_until("the clipboard write", move || {
        selection.written.lock().unwrap().as_slice() == ["hello:es".to_string()]
    })
    .await;
}

#[tokio::test]
async fn failures_keep_the_loop_responsive() {
    let app = spawn_app(vec![Arc::new(MockProvider::new(
        "Mock",
        100,
        MockBehavior::Fail("backend acting up".to_string()),
    ))]);

    app.shell.set_source_text("hello");
    app.tx.send(AppEvent::TranslateRequested).await.unwrap();

    let shell = app.shell.clone();
    wait_until("the failed request to finish", move || {
        shell.finished_translations() == 1
    })
    .await;
    assert_eq!(app.shell.output_text(), "");

    // The next event still gets handled.
    app.tx.send(AppEvent::SwapLanguages).await.unwrap();
    let shell = app.shell.clone();
    wait_until("the swap after the failure", move || {
        shell.view().source == "es"
    })
    .await;
}

#[tokio::test]
async fn external_setting_changes_reach_the_loop() {
    let app = spawn_app(vec![Arc::new(MockProvider::new(
        "Mock",
        100,
        MockBehavior::Suffix,
    ))]);

    // What the controller's settings watcher does.
    let tx = app.tx.clone();
    app.settings.on_change(
        keys::INSTANT_TRANSLATION,
        Arc::new(move |key| {
            let _ = tx.try_send(AppEvent::SettingChanged(key.to_string()));
        }),
    );
    app.settings.set_bool(keys::INSTANT_TRANSLATION, true);

    // The loop only logs the change, but it must not fall over; prove it
    // by doing real work afterwards.
    app.shell.set_source_text("hej");
    let shell = app.shell.clone();
    wait_until("an instant translation after the toggle", move || {
        shell.output_text() == "hej:es"
    })
    .await;
}
