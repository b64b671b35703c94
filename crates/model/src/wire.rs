use serde::{Deserialize, Serialize};

use crate::{ArticleCard, ChartData, HistoryTurn, Scoreboard, TimelineData};

/// Request body for the chat endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Id of the persona to talk to (e.g. `polly`).
    pub agent: String,
    /// The user's new message, verbatim.
    pub message: String,
    /// Prior turns, excluding the message being sent.
    pub conversation_history: Vec<HistoryTurn>,
    /// The user's display name, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// The user's chosen name for their companion bird.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parrot_name: Option<String>,
}

/// Response body from the chat endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Display name of the persona that answered.
    pub agent: String,
    /// The full response text, to be chunked client-side.
    pub response: String,
    /// Transient notice shown when the request was routed to a
    /// different persona.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_message: Option<String>,
    /// Persona the request was routed away from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routed_from: Option<String>,
    /// True when the answer drew on articles even without inline cards.
    #[serde(default)]
    pub has_article_reference: bool,
    /// Inline article reference cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub articles: Option<Vec<ArticleCard>>,
    /// Inline chart payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartData>,
    /// Inline timeline payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<TimelineData>,
    /// Inline scoreboard payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoreboard: Option<Scoreboard>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_response_parses() {
        let json = r#"{"agent":"Polly the Parrot","response":"Hello!"}"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.agent, "Polly the Parrot");
        assert!(!resp.has_article_reference);
        assert!(resp.articles.is_none());
    }

    #[test]
    fn test_request_omits_absent_names() {
        let req = ChatRequest {
            agent: "flynn".to_owned(),
            message: "Who won?".to_owned(),
            conversation_history: vec![],
            user_name: None,
            parrot_name: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("user_name"));
        assert!(!json.contains("parrot_name"));
    }
}
