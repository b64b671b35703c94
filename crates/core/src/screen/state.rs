use std::collections::VecDeque;

use tokio::sync::{mpsc, oneshot};

use news_nest_model::{
    ChatBackendError, ChatRequest, ErrorKind, HistoryTurn, Message, Role,
};

use super::ScreenEvent;
use super::builder::{ScreenBuilder, ScreenConfig, StoreBinding};
use crate::client::{ChatClient, SendChatResult};
use crate::reveal::{self, RevealHandle, Step};
use crate::{chunking, codec};

#[derive(Debug)]
pub(crate) enum Command {
    Send(String),
    LoadSession(Vec<HistoryTurn>),
    Snapshot(oneshot::Sender<Vec<Message>>),
    Finish(oneshot::Sender<()>),
    ResponseArrived {
        epoch: u64,
        result: SendChatResult,
    },
    AppendSentence {
        epoch: u64,
        id: String,
        sentence: String,
    },
    StreamFinished {
        epoch: u64,
    },
    PushBubble {
        epoch: u64,
        bubble: Message,
    },
    QueueFinished {
        epoch: u64,
    },
}

pub(crate) struct ScreenState {
    client: ChatClient,
    agent_id: String,
    store: Option<StoreBinding>,
    user_name: Option<String>,
    parrot_name: Option<String>,
    welcome: Option<Message>,
    config: ScreenConfig,
    on_event: Option<Box<dyn Fn(ScreenEvent) + Send + Sync>>,
    cmd_tx: mpsc::UnboundedSender<Command>,

    messages: Vec<Message>,
    busy: bool,
    // Bumped whenever in-flight loops are cancelled; commands stamped
    // with an older epoch are discarded instead of mutating state.
    reveal_epoch: u64,
    stream_handle: Option<RevealHandle>,
    queue_handle: Option<RevealHandle>,
}

impl ScreenState {
    pub(crate) fn from_builder(
        builder: ScreenBuilder,
        cmd_tx: mpsc::UnboundedSender<Command>,
    ) -> Self {
        let ScreenBuilder {
            client,
            agent_id,
            store,
            user_name,
            parrot_name,
            welcome,
            config,
            on_event,
        } = builder;

        let messages = welcome.clone().into_iter().collect();
        Self {
            client,
            agent_id,
            store,
            user_name,
            parrot_name,
            welcome,
            config,
            on_event,
            cmd_tx,
            messages,
            busy: false,
            reveal_epoch: 0,
            stream_handle: None,
            queue_handle: None,
        }
    }

    pub(crate) async fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Send(text) => self.handle_send(text),
            Command::LoadSession(turns) => self.handle_load_session(turns),
            Command::Snapshot(tx) => {
                tx.send(self.messages.clone()).ok();
            }
            Command::Finish(tx) => {
                self.handle_finish().await;
                tx.send(()).ok();
            }
            Command::ResponseArrived { epoch, result } => self.handle_response(epoch, result),
            Command::AppendSentence {
                epoch,
                id,
                sentence,
            } => self.append_sentence(epoch, id, sentence),
            Command::StreamFinished { epoch } => {
                if epoch == self.reveal_epoch {
                    self.stream_handle = None;
                    self.maybe_idle();
                }
            }
            Command::PushBubble { epoch, bubble } => self.push_revealed_bubble(epoch, bubble),
            Command::QueueFinished { epoch } => {
                if epoch == self.reveal_epoch {
                    self.queue_handle = None;
                    self.maybe_idle();
                }
            }
        }
    }

    fn handle_send(&mut self, text: String) {
        let text = text.trim().to_owned();
        if text.is_empty() {
            return;
        }
        if self.busy {
            warn!("ignoring send while a request is in flight");
            return;
        }
        self.cancel_reveals();

        // The history excludes the message being sent; it travels in
        // the `message` field instead.
        let history = codec::encode_history(&self.messages);
        let user_msg = Message::user(text.clone());
        self.emit(ScreenEvent::BubbleAdded(user_msg.clone()));
        self.messages.push(user_msg);
        self.busy = true;
        self.emit(ScreenEvent::Busy(true));

        let request = ChatRequest {
            agent: self.agent_id.clone(),
            message: text,
            conversation_history: history,
            user_name: self.user_name.clone(),
            parrot_name: self.parrot_name.clone(),
        };
        let epoch = self.reveal_epoch;
        let client = self.client.clone();
        let cmd_tx = self.cmd_tx.clone();
        tokio::spawn(async move {
            let result = client.send(request).await;
            cmd_tx.send(Command::ResponseArrived { epoch, result }).ok();
        });
    }

    fn handle_response(&mut self, epoch: u64, result: SendChatResult) {
        if epoch != self.reveal_epoch {
            debug!("discarding response for a superseded send");
            return;
        }
        self.busy = false;
        self.emit(ScreenEvent::Busy(false));

        let resp = match result {
            Ok(resp) => resp,
            Err(err) => {
                let notice = Message::system(error_notice(err.as_ref()));
                self.emit(ScreenEvent::BubbleAdded(notice.clone()));
                self.messages.push(notice);
                self.maybe_idle();
                return;
            }
        };

        if let Some(routing) = resp.routing_message.clone() {
            let name = resp.routed_from.clone().unwrap_or_else(|| resp.agent.clone());
            let mut bubble = Message::agent(routing, Some(name));
            bubble.is_routing = true;
            self.emit(ScreenEvent::BubbleAdded(bubble.clone()));
            self.messages.push(bubble);
        }

        let chunks = chunking::split_into_message_chunks(&resp.response, &self.config.chunk_policy);
        let (first, queued) = chunks
            .split_first()
            .expect("chunker never returns an empty list");

        let split = chunking::initial_chunk(first, &self.config.chunk_policy);
        let mut first_msg = Message::agent(split.initial, Some(resp.agent.clone()));
        first_msg.has_article_reference = resp.has_article_reference;
        first_msg.article_cards = resp.articles;
        first_msg.chart = resp.chart;
        first_msg.timeline = resp.timeline;
        first_msg.scoreboard = resp.scoreboard;
        let first_id = first_msg.id.clone();
        self.emit(ScreenEvent::BubbleAdded(first_msg.clone()));
        self.messages.push(first_msg);

        if !split.remaining.is_empty() {
            self.start_sentence_stream(first_id, split.remaining);
        }
        if !queued.is_empty() {
            let bubbles = queued
                .iter()
                .map(|chunk| Message::agent(chunk.clone(), Some(resp.agent.clone())))
                .collect();
            self.start_bubble_queue(bubbles);
        }
        self.maybe_idle();
    }

    fn append_sentence(&mut self, epoch: u64, id: String, sentence: String) {
        if epoch != self.reveal_epoch {
            trace!("discarding stale reveal tick");
            return;
        }
        let Some(msg) = self.messages.iter_mut().find(|m| m.id == id) else {
            warn!("reveal tick targets unknown message {id}");
            return;
        };
        if !msg.text.is_empty() {
            msg.text.push(' ');
        }
        msg.text.push_str(&sentence);
        let text = msg.text.clone();
        self.emit(ScreenEvent::BubbleUpdated { id, text });
    }

    fn push_revealed_bubble(&mut self, epoch: u64, bubble: Message) {
        if epoch != self.reveal_epoch {
            trace!("discarding stale queued bubble");
            return;
        }
        self.emit(ScreenEvent::BubbleAdded(bubble.clone()));
        self.messages.push(bubble);
    }

    fn handle_load_session(&mut self, turns: Vec<HistoryTurn>) {
        self.cancel_reveals();
        self.busy = false;

        let mut messages: Vec<Message> = self.welcome.clone().into_iter().collect();
        messages.extend(codec::decode_history_with(&turns, &self.config.chunk_policy));
        self.messages = messages;
        self.emit(ScreenEvent::SessionLoaded(self.messages.clone()));
        self.maybe_idle();
    }

    async fn handle_finish(&mut self) {
        self.cancel_reveals();
        self.persist().await;
    }

    /// Persists the conversation, but only once it contains at least
    /// one complete exchange. Failures never propagate: navigation
    /// away from the screen must proceed regardless.
    async fn persist(&self) {
        let Some(binding) = &self.store else {
            return;
        };
        let turns = codec::encode_history(&self.messages);
        let has_user = turns.iter().any(|t| t.role == Role::User);
        let has_model = turns.iter().any(|t| t.role == Role::Model);
        if !has_user || !has_model {
            debug!("skipping persist: no complete exchange yet");
            return;
        }
        if let Err(err) = binding
            .store
            .save_session(&binding.user, &binding.session_id, &turns)
            .await
        {
            error!("failed to persist session: {err}");
        }
    }

    pub(crate) fn cancel_reveals(&mut self) {
        self.reveal_epoch += 1;
        if let Some(handle) = self.stream_handle.take() {
            handle.cancel();
        }
        if let Some(handle) = self.queue_handle.take() {
            handle.cancel();
        }
    }

    fn start_sentence_stream(&mut self, id: String, remaining: String) {
        let epoch = self.reveal_epoch;
        let cmd_tx = self.cmd_tx.clone();
        let mut rest = remaining;
        let handle = reveal::spawn(self.config.stream_interval, move || {
            let next = chunking::next_chunk(&rest);
            if next.chunk.is_empty() {
                cmd_tx.send(Command::StreamFinished { epoch }).ok();
                return Step::Done;
            }
            rest = next.remaining;
            cmd_tx
                .send(Command::AppendSentence {
                    epoch,
                    id: id.clone(),
                    sentence: next.chunk,
                })
                .ok();
            Step::Continue
        });
        self.stream_handle = Some(handle);
    }

    fn start_bubble_queue(&mut self, bubbles: Vec<Message>) {
        let epoch = self.reveal_epoch;
        let cmd_tx = self.cmd_tx.clone();
        let mut queue = VecDeque::from(bubbles);
        let handle = reveal::spawn(self.config.queue_interval, move || {
            let Some(bubble) = queue.pop_front() else {
                cmd_tx.send(Command::QueueFinished { epoch }).ok();
                return Step::Done;
            };
            cmd_tx.send(Command::PushBubble { epoch, bubble }).ok();
            if queue.is_empty() {
                cmd_tx.send(Command::QueueFinished { epoch }).ok();
                return Step::Done;
            }
            Step::Continue
        });
        self.queue_handle = Some(handle);
    }

    fn maybe_idle(&self) {
        if !self.busy && self.stream_handle.is_none() && self.queue_handle.is_none() {
            self.emit(ScreenEvent::Idle);
        }
    }

    fn emit(&self, event: ScreenEvent) {
        if let Some(on_event) = &self.on_event {
            on_event(event);
        }
    }
}

fn error_notice(err: &dyn ChatBackendError) -> String {
    match err.kind() {
        ErrorKind::Moderated => {
            "That message can't be sent here. Try rephrasing it.".to_owned()
        }
        ErrorKind::RateLimitExceeded => {
            "The birds are swamped right now. Give it a moment and try again.".to_owned()
        }
        ErrorKind::Other => {
            "Something went wrong sending your message. Please try again.".to_owned()
        }
    }
}
