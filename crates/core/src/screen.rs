//! The conversation screen: owns the visible message list and drives
//! the send → chunk → reveal → persist pipeline.

mod builder;
mod state;

use tokio::sync::{mpsc, oneshot};
use tracing::Instrument;

use news_nest_model::{HistoryTurn, Message};

pub use builder::{ScreenBuilder, ScreenConfig};
use state::{Command, ScreenState};

/// Notifications the screen emits to whatever renders it.
#[derive(Debug)]
pub enum ScreenEvent {
    /// A new bubble entered the message list.
    BubbleAdded(Message),
    /// An existing bubble's text grew during a reveal.
    BubbleUpdated {
        /// Id of the bubble that changed.
        id: String,
        /// Its full current text.
        text: String,
    },
    /// A chat request went in flight (`true`) or settled (`false`).
    Busy(bool),
    /// The message list was replaced wholesale by a loaded session.
    SessionLoaded(Vec<Message>),
    /// No request is in flight and all reveal loops have finished.
    Idle,
}

/// Handle to a running conversation screen.
///
/// The screen runs as its own task and processes commands in order; all
/// message-list mutation happens there, so reveal loops and the
/// network task never race each other. Commands dispatched to the
/// screen are handled immediately no matter what it is currently
/// doing; a send that arrives while a request is in flight is ignored
/// rather than queued, matching the input box being disabled while the
/// previous response is pending.
pub struct ConversationScreen {
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl ConversationScreen {
    /// Submits a user message: the history is encoded and the request
    /// dispatched to the backend, and the response is revealed
    /// progressively as it is chunked.
    pub fn send_message<S: Into<String>>(&self, text: S) {
        self.cmd_tx
            .send(Command::Send(text.into()))
            .expect("screen task has been dropped too early");
    }

    /// Replaces the current conversation with a persisted session.
    ///
    /// In-flight reveal loops are cancelled and a pending response, if
    /// any, is discarded when it arrives.
    pub fn load_session(&self, turns: Vec<HistoryTurn>) {
        self.cmd_tx
            .send(Command::LoadSession(turns))
            .expect("screen task has been dropped too early");
    }

    /// Returns a snapshot of the current message list.
    pub async fn messages(&self) -> Vec<Message> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Snapshot(tx))
            .expect("screen task has been dropped too early");
        rx.await.expect("screen task has been dropped too early")
    }

    /// Tears the screen down: cancels reveal loops and persists the
    /// session when it contains at least one complete exchange.
    ///
    /// Persistence failures are logged and swallowed; this method
    /// always completes.
    pub async fn finish(self) {
        let (tx, rx) = oneshot::channel();
        if self.cmd_tx.send(Command::Finish(tx)).is_err() {
            return;
        }
        rx.await.ok();
    }

    pub(crate) fn spawn_from_builder(builder: ScreenBuilder) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let state = ScreenState::from_builder(builder, cmd_tx.clone());
        tokio::spawn(run_screen(state, cmd_rx).instrument(trace_span!("screen")));
        Self { cmd_tx }
    }
}

async fn run_screen(mut state: ScreenState, mut cmd_rx: mpsc::UnboundedReceiver<Command>) {
    debug!("started");
    while let Some(cmd) = cmd_rx.recv().await {
        trace!("received command: {cmd:?}");
        let is_finish = matches!(cmd, Command::Finish(_));
        state.handle(cmd).await;
        if is_finish {
            break;
        }
    }
    // Reached on finish or when the handle is dropped; either way no
    // reveal loop may keep running against the torn-down screen.
    state.cancel_reveals();
    debug!("will terminate");
}
