//! A terminal chat demonstrating the News Nest conversation screen.

#[macro_use]
extern crate tracing;

use std::collections::HashMap;
use std::env;
use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use news_nest::Persona;
use news_nest_api::{ApiClient, ApiConfigBuilder};
use news_nest_core::{ScreenBuilder, ScreenEvent};
use news_nest_model::{Message, MessageKind, SessionStore};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Ok(base_url) = env::var("NEWS_NEST_API_URL") else {
        eprintln!("NEWS_NEST_API_URL environment variable is not set");
        return;
    };
    let mut config = ApiConfigBuilder::with_base_url(base_url);
    if let Ok(api_key) = env::var("NEWS_NEST_API_KEY") {
        config = config.with_api_key(api_key);
    }
    let client = ApiClient::new(config.build());

    let persona_id = env::args().nth(1).unwrap_or_else(|| "polly".to_owned());
    let Some(persona) = Persona::find(&persona_id) else {
        eprintln!("unknown persona: {persona_id}");
        return;
    };

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    // Sessions persist only when the session keys are provided.
    let session_keys = match (env::var("NEWS_NEST_USER"), env::var("NEWS_NEST_SESSION")) {
        (Ok(user), Ok(session)) => Some((user, session)),
        _ => None,
    };
    let store = session_keys.as_ref().map(|_| Arc::new(client.clone()));

    let mut builder = ScreenBuilder::with_backend(client, persona.id)
        .with_welcome(persona.welcome, Some(persona.name.to_owned()))
        .on_event(move |event| {
            event_tx.send(event).ok();
        });
    if let (Some((user, session)), Some(store)) = (&session_keys, &store) {
        builder = builder.with_store(store.clone(), user.clone(), session.clone());
    }
    let screen = builder.build();

    if let (Some((user, session)), Some(store)) = (&session_keys, &store) {
        match store.load_session(user, session).await {
            Ok(turns) if !turns.is_empty() => screen.load_session(turns),
            Ok(_) => {}
            Err(err) => error!("failed to load previous session: {err}"),
        }
    }

    for message in screen.messages().await {
        print_bubble(&message);
    }

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    // Text already printed per bubble, so reveal updates print only the
    // new suffix.
    let mut printed: HashMap<String, usize> = HashMap::new();

    'outer: loop {
        print!("> ");
        std::io::stdout().flush().unwrap();

        let Some(line) = read_line().await else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        // Events that arrived while sitting at the prompt (e.g. the idle
        // notification of a session load) are stale by now.
        while event_rx.try_recv().is_ok() {}
        screen.send_message(line);

        let mut progress_bar = None;

        loop {
            // Create a new progress bar if it has been finished.
            progress_bar
                .get_or_insert_with(|| {
                    let progress_bar = ProgressBar::new_spinner();
                    progress_bar.set_style(progress_style.clone());
                    progress_bar.set_message("🪶 Thinking...");
                    progress_bar
                })
                .inc(1);

            let sleep = sleep(Duration::from_millis(100));
            let event = select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        break 'outer;
                    };
                    event
                },
                _ = sleep => {
                    continue;
                }
            };

            // Finish the progress bar before printing anything else.
            if let Some(progress_bar) = &progress_bar {
                progress_bar.finish_and_clear();
            }
            progress_bar = None;

            match event {
                ScreenEvent::BubbleAdded(message) => {
                    printed.insert(message.id.clone(), message.text.len());
                    print_bubble(&message);
                }
                ScreenEvent::BubbleUpdated { id, text } => {
                    let seen = printed.get(&id).copied().unwrap_or(0);
                    println!(
                        "{}{}",
                        BAR_CHAR.bright_cyan(),
                        text[seen..].trim_start().bright_white()
                    );
                    printed.insert(id, text.len());
                }
                ScreenEvent::Idle => {
                    break;
                }
                ScreenEvent::Busy(_) | ScreenEvent::SessionLoaded(_) => {}
            }
        }
    }

    // Persists the session when a store is bound.
    screen.finish().await;
}

fn print_bubble(message: &Message) {
    match message.kind {
        MessageKind::User => {}
        MessageKind::System => {
            println!("{}{}", BAR_CHAR.bright_yellow(), message.text.yellow());
        }
        MessageKind::Agent => {
            let name = message.agent_name.as_deref().unwrap_or("News Nest");
            if message.is_routing {
                println!(
                    "{}{}",
                    BAR_CHAR.bright_magenta(),
                    message.text.dimmed()
                );
            } else {
                println!(
                    "{}🪶 {}: {}",
                    BAR_CHAR.bright_cyan(),
                    name.bright_green().bold(),
                    message.text.bright_white()
                );
                // Structured payloads have no terminal rendering yet.
                if message.has_attachments() {
                    println!(
                        "{}{}",
                        BAR_CHAR.bright_cyan(),
                        "(this reply includes charts or cards)".dimmed()
                    );
                }
            }
        }
    }
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
