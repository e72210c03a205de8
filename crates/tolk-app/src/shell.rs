//! Terminal stand-in for the popup dialog.
//!
//! The [`Shell`] implements the session's text surface and status sink
//! over stdout/stderr and turns typed lines into application events. A
//! desktop front end would back the same ports with the dialog widgets.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use kanal::AsyncSender;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tolk_config::keys;
use tolk_core::languages;
use tolk_core::ports::{SettingsStore, StatusSink, TextSurface};
use tolk_core::session::Session;
use tolk_types::{AppEvent, MessageId, Severity};

/// What the informational commands show about the session. Refreshed by
/// the event loop after every handled event.
#[derive(Debug, Clone, Default)]
pub struct ShellView {
    pub provider: String,
    pub source: String,
    pub source_name: String,
    pub target: String,
    pub target_name: String,
    pub limit: usize,
    pub providers: Vec<String>,
    pub languages: Vec<(String, String)>,
}

pub struct Shell {
    events: AsyncSender<AppEvent>,
    source: Mutex<String>,
    output: Mutex<String>,
    max_length: AtomicUsize,
    view: Mutex<ShellView>,
    /// Busy messages still on screen; used to notice when a translate
    /// action has run its course.
    open_busy: Mutex<HashSet<MessageId>>,
    finished: AtomicUsize,
}

impl Shell {
    pub fn new(events: AsyncSender<AppEvent>) -> Self {
        Self {
            events,
            source: Mutex::new(String::new()),
            output: Mutex::new(String::new()),
            max_length: AtomicUsize::new(0),
            view: Mutex::new(ShellView::default()),
            open_busy: Mutex::new(HashSet::new()),
            finished: AtomicUsize::new(0),
        }
    }

    pub fn refresh(&self, session: &Session) {
        let manager = session.manager();
        let provider = manager.current();

        *self.view.lock().unwrap() = ShellView {
            provider: provider.name().to_string(),
            source: session.source_language().to_string(),
            source_name: languages::display_name(provider.as_ref(), session.source_language()),
            target: session.target_language().to_string(),
            target_name: languages::display_name(provider.as_ref(), session.target_language()),
            limit: provider.limit(),
            providers: manager.names().iter().map(|n| n.to_string()).collect(),
            languages: provider
                .languages()
                .iter()
                .map(|l| (l.code.to_string(), l.name.to_string()))
                .collect(),
        };
    }

    pub fn view(&self) -> ShellView {
        self.view.lock().unwrap().clone()
    }

    /// How many translate actions have closed their busy indicator.
    pub fn finished_translations(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    fn print_status(&self) {
        let view = self.view();
        println!(
            "{}: {} [{}] -> {} [{}] (limit {} chars)",
            view.provider, view.source_name, view.source, view.target_name, view.target, view.limit
        );
    }

    fn print_providers(&self) {
        let view = self.view();
        for name in &view.providers {
            let marker = if *name == view.provider { "*" } else { " " };
            println!("{marker} {name}");
        }
    }

    fn print_languages(&self) {
        let view = self.view();
        for (code, name) in &view.languages {
            println!("{code:8} {name}");
        }
    }
}

impl TextSurface for Shell {
    fn source_text(&self) -> String {
        self.source.lock().unwrap().clone()
    }

    fn set_source_text(&self, text: &str) {
        let limit = self.max_length.load(Ordering::Relaxed);
        let text = if limit > 0 && text.chars().count() > limit {
            // The entry caps input like the dialog's text box does.
            text.chars().take(limit).collect()
        } else {
            text.to_string()
        };
        *self.source.lock().unwrap() = text;

        // Contract of the port: every source change, including this
        // programmatic one, echoes as TextChanged.
        if let Err(e) = self.events.try_send(AppEvent::TextChanged) {
            tracing::debug!("TextChanged echo dropped: {e}");
        }
    }

    fn set_max_length(&self, limit: usize) {
        self.max_length.store(limit, Ordering::Relaxed);
    }

    fn output_text(&self) -> String {
        self.output.lock().unwrap().clone()
    }

    fn set_output(&self, text: &str) {
        *self.output.lock().unwrap() = text.to_string();
        println!("=> {text}");
    }

    fn clear_output(&self) {
        self.output.lock().unwrap().clear();
    }
}

impl StatusSink for Shell {
    fn add_message(
        &self,
        text: &str,
        _duration: Option<Duration>,
        severity: Severity,
        busy: bool,
    ) -> MessageId {
        let id = tolk_types::new_message_id();

        match severity {
            Severity::Info if busy => {
                self.open_busy.lock().unwrap().insert(id);
                eprintln!(".. {text}");
            }
            Severity::Info => eprintln!("[info] {text}"),
            Severity::Error => eprintln!("[error] {text}"),
        }

        id
    }

    fn remove_message(&self, id: MessageId) {
        // Durations are the front end's business; a line-based shell has
        // nothing to expire, so only busy bookkeeping remains.
        if self.open_busy.lock().unwrap().remove(&id) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Translate,
    Type(String),
    Providers,
    Use(String),
    Languages,
    Source(String),
    Target(String),
    Swap,
    Reset,
    Copy,
    Clipboard,
    Selection,
    Instant(bool),
    Status,
    Help,
    Quit,
    Unknown(String),
}

#[derive(Debug)]
pub enum Input {
    Text(String),
    Command(SlashCommand),
    Empty,
}

pub fn parse_input(input: &str) -> Input {
    let input = input.trim();

    if input.is_empty() {
        return Input::Empty;
    }

    input
        .strip_prefix('/')
        .map_or_else(|| Input::Text(input.to_string()), parse_slash_command)
}

fn parse_slash_command(cmd: &str) -> Input {
    let (head, rest) = match cmd.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (cmd, ""),
    };

    let command = match head {
        "translate" | "t" => SlashCommand::Translate,
        "type" => SlashCommand::Type(rest.to_string()),
        "providers" => SlashCommand::Providers,
        "use" if !rest.is_empty() => SlashCommand::Use(rest.to_string()),
        "languages" | "langs" => SlashCommand::Languages,
        "source" if !rest.is_empty() => SlashCommand::Source(rest.to_string()),
        "target" if !rest.is_empty() => SlashCommand::Target(rest.to_string()),
        "swap" => SlashCommand::Swap,
        "reset" => SlashCommand::Reset,
        "copy" => SlashCommand::Copy,
        "clipboard" => SlashCommand::Clipboard,
        "selection" => SlashCommand::Selection,
        "instant" => match rest {
            "on" => SlashCommand::Instant(true),
            "off" => SlashCommand::Instant(false),
            _ => SlashCommand::Unknown(cmd.to_string()),
        },
        "status" => SlashCommand::Status,
        "help" => SlashCommand::Help,
        "quit" | "exit" | "q" => SlashCommand::Quit,
        _ => SlashCommand::Unknown(cmd.to_string()),
    };

    Input::Command(command)
}

fn print_help() {
    println!("Type text to translate it. Commands:");
    println!("  /translate        translate the current text again");
    println!("  /type TEXT        set the text without translating (instant mode picks it up)");
    println!("  /providers        list backends, * marks the current one");
    println!("  /use NAME         switch backend");
    println!("  /languages        list the current backend's languages");
    println!("  /source CODE      set the source language");
    println!("  /target CODE      set the target language");
    println!("  /swap             exchange source and target");
    println!("  /reset            back to the backend's default pair");
    println!("  /copy             copy the translation to the clipboard");
    println!("  /clipboard        translate the clipboard contents");
    println!("  /selection        translate the primary selection");
    println!("  /instant on|off   toggle translate-as-you-type");
    println!("  /status           show backend, language pair and limit");
    println!("  /quit             exit");
}

/// Read stdin until it closes or `/quit` arrives. When stdin is not a
/// terminal the whole input is treated as one text to translate.
pub async fn input_loop(
    shell: Arc<Shell>,
    settings: Arc<dyn SettingsStore>,
    events: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    if !atty::is(atty::Stream::Stdin) {
        return pipe_mode(shell, events).await;
    }

    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            // stdin closed
            events.send(AppEvent::Shutdown).await?;
            return Ok(());
        };

        if !handle_line(&shell, &settings, &events, &line).await? {
            return Ok(());
        }
    }
}

/// Dispatch one input line. Returns `false` when the loop should stop.
async fn handle_line(
    shell: &Shell,
    settings: &Arc<dyn SettingsStore>,
    events: &AsyncSender<AppEvent>,
    line: &str,
) -> anyhow::Result<bool> {
    match parse_input(line) {
        Input::Empty => {}
        Input::Text(text) => {
            shell.set_source_text(&text);
            // With instant translation on, the TextChanged echo already
            // schedules the translate.
            if !settings.get_bool(keys::INSTANT_TRANSLATION).unwrap_or(false) {
                events.send(AppEvent::TranslateRequested).await?;
            }
        }
        Input::Command(command) => match command {
            SlashCommand::Translate => events.send(AppEvent::TranslateRequested).await?,
            SlashCommand::Type(text) => shell.set_source_text(&text),
            SlashCommand::Providers => shell.print_providers(),
            SlashCommand::Use(name) => events.send(AppEvent::SetProvider(name)).await?,
            SlashCommand::Languages => shell.print_languages(),
            SlashCommand::Source(code) => events.send(AppEvent::SetSourceLanguage(code)).await?,
            SlashCommand::Target(code) => events.send(AppEvent::SetTargetLanguage(code)).await?,
            SlashCommand::Swap => events.send(AppEvent::SwapLanguages).await?,
            SlashCommand::Reset => events.send(AppEvent::ResetLanguages).await?,
            SlashCommand::Copy => events.send(AppEvent::CopyTranslation).await?,
            SlashCommand::Clipboard => events.send(AppEvent::TranslateFromClipboard).await?,
            SlashCommand::Selection => events.send(AppEvent::TranslateFromSelection).await?,
            SlashCommand::Instant(enabled) => {
                settings.set_bool(keys::INSTANT_TRANSLATION, enabled)
            }
            SlashCommand::Status => shell.print_status(),
            SlashCommand::Help => print_help(),
            SlashCommand::Quit => {
                events.send(AppEvent::Shutdown).await?;
                return Ok(false);
            }
            SlashCommand::Unknown(cmd) => eprintln!("unknown command: /{cmd}, see /help"),
        },
    }

    Ok(true)
}

const PIPE_DEADLINE: Duration = Duration::from_secs(30);

/// One-shot mode for `echo text | tolk`: translate stdin, print, exit.
async fn pipe_mode(shell: Arc<Shell>, events: AsyncSender<AppEvent>) -> anyhow::Result<()> {
    let mut text = String::new();
    tokio::io::stdin().read_to_string(&mut text).await?;

    if text.trim().is_empty() {
        events.send(AppEvent::Shutdown).await?;
        return Ok(());
    }

    shell.set_source_text(text.trim_end());
    events.send(AppEvent::TranslateRequested).await?;

    let outcome = tokio::time::timeout(PIPE_DEADLINE, async {
        while shell.finished_translations() == 0 {
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    })
    .await;
    if outcome.is_err() {
        tracing::warn!("no translation within {PIPE_DEADLINE:?}, giving up");
    }

    events.send(AppEvent::Shutdown).await?;
    Ok(())
}
