use serde::de::DeserializeOwned;

use news_nest_model::{
    ArticleCard, ChartData, HistoryTurn, Message, Role, Scoreboard, TimelineData,
};

use super::blocks::{find_articles_block, find_tagged_json, strip_agent_tag};
use super::{CHART_TAG, SCOREBOARD_TAG, TIMELINE_TAG};
use crate::chunking::{self, ChunkPolicy};

/// Decodes persisted turns back into displayable messages with the
/// default chunk policy.
pub fn decode_history(turns: &[HistoryTurn]) -> Vec<Message> {
    decode_history_with(turns, &ChunkPolicy::default())
}

/// Decodes persisted turns back into displayable messages.
///
/// Model turns go through the fixed pipeline: strip the trailing agent
/// tag, extract the bracket-tagged chart/timeline/scoreboard/article
/// blocks (fail-open on malformed payloads), then re-chunk the cleaned
/// text so the multi-bubble presentation is reconstructed. Attachments
/// land on the first chunk only; every chunk of a turn shares the
/// resolved agent name. Turns that omit the agent tag inherit the last
/// seen name.
pub fn decode_history_with(turns: &[HistoryTurn], policy: &ChunkPolicy) -> Vec<Message> {
    let mut messages = Vec::new();
    let mut last_agent_name: Option<String> = None;

    for turn in turns {
        match turn.role {
            Role::User => messages.push(Message::user(turn.text())),
            Role::Model => {
                decode_model_turn(turn.text(), &mut last_agent_name, policy, &mut messages);
            }
        }
    }
    messages
}

fn decode_model_turn(
    text: &str,
    last_agent_name: &mut Option<String>,
    policy: &ChunkPolicy,
    messages: &mut Vec<Message>,
) {
    let (mut text, tagged_name) = strip_agent_tag(text);
    if tagged_name.is_some() {
        *last_agent_name = tagged_name;
    }
    let agent_name = last_agent_name.clone();

    let chart: Option<ChartData> = extract_json_block(&mut text, CHART_TAG);
    let timeline: Option<TimelineData> = extract_json_block(&mut text, TIMELINE_TAG);
    let scoreboard: Option<Scoreboard> = extract_json_block(&mut text, SCOREBOARD_TAG);
    let articles = extract_articles(&mut text);

    let chunks = chunking::split_into_message_chunks(&text, policy);
    for (i, chunk) in chunks.into_iter().enumerate() {
        let mut msg = Message::agent(chunk, agent_name.clone());
        if i == 0 {
            msg.chart = chart.clone();
            msg.timeline = timeline.clone();
            msg.scoreboard = scoreboard.clone();
            msg.has_article_reference = articles.is_some();
            msg.article_cards = articles.clone();
        }
        messages.push(msg);
    }
}

/// Removes every occurrence of `marker` and its payload from `text`,
/// returning the first payload that parsed. A payload that fails to
/// parse is still removed; the visible text must never show raw blocks.
fn extract_json_block<T: DeserializeOwned>(text: &mut String, marker: &str) -> Option<T> {
    let mut found: Option<T> = None;
    while let Some(tagged) = find_tagged_json(text, marker) {
        if let Some(json_range) = &tagged.json {
            if found.is_none() {
                match serde_json::from_str(&text[json_range.clone()]) {
                    Ok(payload) => found = Some(payload),
                    Err(err) => {
                        warn!("dropping malformed {marker} block: {err}");
                    }
                }
            }
        } else {
            warn!("dropping unterminated {marker} block");
        }
        let end = skip_trailing_whitespace(text, tagged.block.end);
        text.replace_range(tagged.block.start..end, "");
    }
    found
}

fn extract_articles(text: &mut String) -> Option<Vec<ArticleCard>> {
    let mut found: Option<Vec<ArticleCard>> = None;
    while let Some(block) = find_articles_block(text) {
        if found.is_none() && !block.cards.is_empty() {
            found = Some(block.cards);
        }
        let end = skip_trailing_whitespace(text, block.block.end);
        text.replace_range(block.block.start..end, "");
    }
    found
}

fn skip_trailing_whitespace(text: &str, mut end: usize) -> usize {
    for c in text[end..].chars() {
        if !c.is_whitespace() {
            break;
        }
        end += c.len_utf8();
    }
    end
}
