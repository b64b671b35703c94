use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::{ArticleCard, ChartData, Scoreboard, TimelineData};

/// Well-known id of the synthetic welcome bubble that opens every
/// session. Messages with this id are never persisted.
pub const WELCOME_MESSAGE_ID: &str = "welcome";

static NEXT_MESSAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Who authored a message bubble.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Typed by the user.
    User,
    /// Produced by a bird persona.
    Agent,
    /// A local notice (e.g. a send failure), never sent upstream.
    System,
}

/// One chat bubble as the UI sees it.
///
/// A single backend response may fan out into several `Agent` bubbles;
/// within that set, at most one bubble carries the structured
/// attachments and all bubbles share the same `agent_name`. The text is
/// partial while a reveal loop is still appending to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Opaque unique id, assigned at construction and never changed.
    pub id: String,
    /// Author of the bubble.
    pub kind: MessageKind,
    /// Currently displayed text.
    pub text: String,
    /// Display name of the persona that authored the bubble.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    /// Marks a transient routing notice; excluded from persisted history.
    #[serde(default)]
    pub is_routing: bool,
    /// The response referenced articles even without inline cards.
    #[serde(default)]
    pub has_article_reference: bool,
    /// Inline article reference cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_cards: Option<Vec<ArticleCard>>,
    /// Inline chart visualization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartData>,
    /// Inline timeline visualization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<TimelineData>,
    /// Inline sports scoreboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoreboard: Option<Scoreboard>,
}

impl Message {
    fn with_kind(kind: MessageKind, text: String) -> Self {
        let id = NEXT_MESSAGE_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            id: format!("msg-{id}"),
            kind,
            text,
            agent_name: None,
            is_routing: false,
            has_article_reference: false,
            article_cards: None,
            chart: None,
            timeline: None,
            scoreboard: None,
        }
    }

    /// Creates a user bubble with the raw typed text.
    #[inline]
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self::with_kind(MessageKind::User, text.into())
    }

    /// Creates an agent bubble.
    #[inline]
    pub fn agent<S: Into<String>>(text: S, agent_name: Option<String>) -> Self {
        let mut msg = Self::with_kind(MessageKind::Agent, text.into());
        msg.agent_name = agent_name;
        msg
    }

    /// Creates a local system notice.
    #[inline]
    pub fn system<S: Into<String>>(text: S) -> Self {
        Self::with_kind(MessageKind::System, text.into())
    }

    /// Creates the synthetic welcome bubble with its well-known id.
    pub fn welcome<S: Into<String>>(text: S, agent_name: Option<String>) -> Self {
        let mut msg = Self::with_kind(MessageKind::Agent, text.into());
        msg.id = WELCOME_MESSAGE_ID.to_owned();
        msg.agent_name = agent_name;
        msg
    }

    /// Whether this bubble carries any structured attachment.
    pub fn has_attachments(&self) -> bool {
        self.article_cards.is_some()
            || self.chart.is_some()
            || self.timeline.is_some()
            || self.scoreboard.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_ids() {
        let a = Message::user("hi");
        let b = Message::user("hi");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_welcome_id_is_well_known() {
        let msg = Message::welcome("Good morning!", None);
        assert_eq!(msg.id, WELCOME_MESSAGE_ID);
        assert_eq!(msg.kind, MessageKind::Agent);
    }
}
