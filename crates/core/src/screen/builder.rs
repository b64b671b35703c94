use std::sync::Arc;
use std::time::Duration;

use news_nest_model::{ChatBackend, Message, SessionStore};

use super::{ConversationScreen, ScreenEvent};
use crate::chunking::ChunkPolicy;
use crate::client::ChatClient;

/// Tuning for chunk sizing and reveal pacing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScreenConfig {
    /// How responses are split into bubbles.
    pub chunk_policy: ChunkPolicy,
    /// Delay between revealed sentences of the visible bubble.
    pub stream_interval: Duration,
    /// Delay between queued bubbles of a multi-bubble response.
    pub queue_interval: Duration,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            chunk_policy: ChunkPolicy::default(),
            stream_interval: Duration::from_millis(800),
            queue_interval: Duration::from_millis(1000),
        }
    }
}

/// Binds a session store to the keys of one session.
pub(crate) struct StoreBinding {
    pub store: Arc<dyn SessionStore>,
    pub user: String,
    pub session_id: String,
}

/// [`ConversationScreen`] builder.
pub struct ScreenBuilder {
    pub(crate) client: ChatClient,
    pub(crate) agent_id: String,
    pub(crate) store: Option<StoreBinding>,
    pub(crate) user_name: Option<String>,
    pub(crate) parrot_name: Option<String>,
    pub(crate) welcome: Option<Message>,
    pub(crate) config: ScreenConfig,
    pub(crate) on_event: Option<Box<dyn Fn(ScreenEvent) + Send + Sync>>,
}

impl ScreenBuilder {
    /// Creates a builder for a conversation with the given persona id,
    /// backed by the given chat backend.
    #[inline]
    pub fn with_backend<B: ChatBackend + 'static>(backend: B, agent_id: impl Into<String>) -> Self {
        Self {
            client: ChatClient::new(backend),
            agent_id: agent_id.into(),
            store: None,
            user_name: None,
            parrot_name: None,
            welcome: None,
            config: ScreenConfig::default(),
            on_event: None,
        }
    }

    /// Attaches a session store keyed by user email and session id;
    /// the screen persists into it on [`ConversationScreen::finish`].
    #[inline]
    pub fn with_store(
        mut self,
        store: Arc<dyn SessionStore>,
        user: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        self.store = Some(StoreBinding {
            store,
            user: user.into(),
            session_id: session_id.into(),
        });
        self
    }

    /// Sets the user's display name, forwarded with every request.
    #[inline]
    pub fn with_user_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = Some(name.into());
        self
    }

    /// Sets the user's chosen bird name, forwarded with every request.
    #[inline]
    pub fn with_parrot_name(mut self, name: impl Into<String>) -> Self {
        self.parrot_name = Some(name.into());
        self
    }

    /// Opens the conversation with a synthetic welcome bubble. It is
    /// shown again when a session is loaded and never persisted.
    #[inline]
    pub fn with_welcome(mut self, text: impl Into<String>, agent_name: Option<String>) -> Self {
        self.welcome = Some(Message::welcome(text, agent_name));
        self
    }

    /// Overrides chunking and reveal pacing.
    #[inline]
    pub fn with_config(mut self, config: ScreenConfig) -> Self {
        self.config = config;
        self
    }

    /// Attaches a callback invoked for every [`ScreenEvent`].
    #[inline]
    pub fn on_event(mut self, on_event: impl Fn(ScreenEvent) + Send + Sync + 'static) -> Self {
        self.on_event = Some(Box::new(on_event));
        self
    }

    /// Builds the screen and starts its task.
    #[inline]
    pub fn build(self) -> ConversationScreen {
        ConversationScreen::spawn_from_builder(self)
    }
}
