use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tolk_core::ports::TextSurface;
use tolk_providers::{MockBehavior, MockProvider};
use tolk_types::AppEvent;

use super::harness::{spawn_app, wait_until};

#[tokio::test]
async fn shutdown_event_ends_the_loop() {
    let app = spawn_app(vec![Arc::new(MockProvider::new(
        "Mock",
        100,
        MockBehavior::Suffix,
    ))]);

    app.tx.send(AppEvent::Shutdown).await.unwrap();

    let result = timeout(Duration::from_secs(2), app.loop_handle)
        .await
        .expect("loop did not stop");
    assert!(result.unwrap().is_ok());
}

#[tokio::test]
async fn late_completions_do_not_land_after_shutdown() {
    let app = spawn_app(vec![Arc::new(
        MockProvider::new("Mock", 100, MockBehavior::Suffix)
            .with_delay(Duration::from_millis(300)),
    )]);

    app.shell.set_source_text("pending");
    app.tx.send(AppEvent::TranslateRequested).await.unwrap();

    // Let the request spawn, then pull the plug while it is in flight.
    let providers = app.providers.clone();
    wait_until("the request to reach the backend", move || {
        providers[0].calls() == 1
    })
    .await;
    app.tx.send(AppEvent::Shutdown).await.unwrap();

    timeout(Duration::from_secs(2), app.loop_handle)
        .await
        .expect("loop did not stop")
        .unwrap()
        .unwrap();

    // The backend finishes long after teardown; nothing may surface.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(app.shell.output_text(), "");
}

#[tokio::test]
async fn unknown_provider_leaves_the_loop_running() {
    let app = spawn_app(vec![Arc::new(MockProvider::new(
        "Mock",
        100,
        MockBehavior::Suffix,
    ))]);

    app.tx
        .send(AppEvent::SetProvider("Nope".to_string()))
        .await
        .unwrap();

    app.shell.set_source_text("still alive");
    app.tx.send(AppEvent::TranslateRequested).await.unwrap();

    let shell = app.shell.clone();
    wait_until("a translation on the unchanged provider", move || {
        shell.output_text() == "still alive:es"
    })
    .await;
    assert_eq!(app.shell.view().provider, "Mock");
}
