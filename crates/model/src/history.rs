use serde::{Deserialize, Serialize};

/// Role of a persisted conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The user's side of the conversation.
    User,
    /// The model's side of the conversation.
    Model,
}

/// One persisted conversation turn in the flat session format.
///
/// `parts` always holds exactly one text blob today; the list shape is
/// kept for forward compatibility with the upstream format. A `model`
/// turn's text folds the structured attachments into bracket-tagged
/// blocks; see the codec in `news-nest-core` for the grammar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    /// Who produced the turn.
    pub role: Role,
    /// Ordered text parts; exactly one element in practice.
    pub parts: Vec<String>,
}

impl HistoryTurn {
    /// Creates a user turn.
    #[inline]
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::User,
            parts: vec![text.into()],
        }
    }

    /// Creates a model turn.
    #[inline]
    pub fn model<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::Model,
            parts: vec![text.into()],
        }
    }

    /// Returns the single text part, or the empty string when the turn
    /// arrived with no parts.
    #[inline]
    pub fn text(&self) -> &str {
        self.parts.first().map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let turn = HistoryTurn::model("Scores are in.");
        let json = serde_json::to_string(&turn).unwrap();
        assert_eq!(json, r#"{"role":"model","parts":["Scores are in."]}"#);
    }

    #[test]
    fn test_empty_parts_tolerated() {
        let turn: HistoryTurn = serde_json::from_str(r#"{"role":"user","parts":[]}"#).unwrap();
        assert_eq!(turn.text(), "");
    }
}
