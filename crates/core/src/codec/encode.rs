use news_nest_model::{HistoryTurn, Message, MessageKind, WELCOME_MESSAGE_ID};

use super::blocks::format_article_lines;
use super::{ARTICLES_TAG, CHART_TAG, SCOREBOARD_TAG, TIMELINE_TAG};

/// Encodes the message list into the persisted turn format.
///
/// The synthetic welcome bubble, routing notices, and local system
/// notices are skipped. Consecutive agent bubbles collapse into one
/// `model` turn: their texts joined by single spaces, the first
/// bubble's attachments serialized as bracket-tagged blocks after the
/// joined text, and the run's most recent agent name appended as a
/// trailing tag. The blocks go last so a later bubble's prose never
/// lands inside an `[ARTICLES]` line list. Each user message becomes
/// its own verbatim `user` turn.
pub fn encode_history(messages: &[Message]) -> Vec<HistoryTurn> {
    let mut turns = Vec::new();
    let mut run = ModelRun::default();

    for msg in messages {
        if msg.id == WELCOME_MESSAGE_ID || msg.is_routing {
            continue;
        }
        match msg.kind {
            MessageKind::System => {}
            MessageKind::Agent => {
                if run.buffer.is_empty() {
                    run.blocks = attachment_blocks(msg);
                }
                if let Some(name) = &msg.agent_name {
                    run.agent_name = Some(name.clone());
                }
                run.buffer.push(msg.text.clone());
            }
            MessageKind::User => {
                run.flush_into(&mut turns);
                turns.push(HistoryTurn::user(msg.text.clone()));
            }
        }
    }
    run.flush_into(&mut turns);
    turns
}

/// One run of consecutive agent bubbles being collapsed.
#[derive(Default)]
struct ModelRun {
    buffer: Vec<String>,
    blocks: String,
    agent_name: Option<String>,
}

impl ModelRun {
    fn flush_into(&mut self, turns: &mut Vec<HistoryTurn>) {
        if self.buffer.is_empty() {
            return;
        }
        let mut text = self.buffer.join(" ");
        text.push_str(&self.blocks);
        if let Some(name) = self.agent_name.take() {
            text.push_str(&format!(" [Agent: {name}]"));
        }
        self.buffer.clear();
        self.blocks.clear();
        turns.push(HistoryTurn::model(text));
    }
}

/// Serializes the attachments of the first bubble of a response, in the
/// fixed order chart, timeline, scoreboard, articles.
fn attachment_blocks(msg: &Message) -> String {
    let mut out = String::new();
    if let Some(chart) = &msg.chart {
        push_json_block(&mut out, CHART_TAG, chart);
    }
    if let Some(timeline) = &msg.timeline {
        push_json_block(&mut out, TIMELINE_TAG, timeline);
    }
    if let Some(scoreboard) = &msg.scoreboard {
        push_json_block(&mut out, SCOREBOARD_TAG, scoreboard);
    }
    if let Some(cards) = &msg.article_cards {
        if !cards.is_empty() {
            out.push_str(&format!(
                "\n\n{ARTICLES_TAG}\n{}",
                format_article_lines(cards)
            ));
        }
    }
    out
}

fn push_json_block<T: serde::Serialize>(out: &mut String, tag: &str, payload: &T) {
    match serde_json::to_string(payload) {
        Ok(json) => out.push_str(&format!("\n\n{tag}\n{json}")),
        Err(err) => warn!("failed to serialize {tag} block, dropping it: {err}"),
    }
}
