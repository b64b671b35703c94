//! Low-level scanning of bracket-tagged blocks inside persisted text.

use std::ops::Range;

use news_nest_model::ArticleCard;

use super::{AGENT_TAG_PREFIX, ARTICLES_TAG};

/// A located bracket-tagged block.
pub(crate) struct TaggedJson {
    /// The whole block, marker included, to be removed from the text.
    pub block: Range<usize>,
    /// The JSON object inside the block, when a balanced one was found.
    pub json: Option<Range<usize>>,
}

/// Locates the first `marker` occurrence and the JSON object following
/// it.
///
/// The object is found by brace-depth scanning aware of strings and
/// escapes, since the payload may contain nested braces or quoted
/// braces. When no balanced object follows the marker, the block spans
/// from the marker to the end of the text (the malformed payload is the
/// tail by construction) so that fail-open removal never leaves marker
/// residue visible.
pub(crate) fn find_tagged_json(text: &str, marker: &str) -> Option<TaggedJson> {
    let marker_start = text.find(marker)?;
    let after_marker = marker_start + marker.len();

    let mut open = None;
    for (i, c) in text[after_marker..].char_indices() {
        if c == '{' {
            open = Some(after_marker + i);
            break;
        }
        if !c.is_whitespace() {
            break;
        }
    }
    let Some(open) = open else {
        // Marker without a payload: remove just the marker.
        return Some(TaggedJson {
            block: marker_start..after_marker,
            json: None,
        });
    };

    match scan_json_object(text, open) {
        Some(close) => Some(TaggedJson {
            block: marker_start..close,
            json: Some(open..close),
        }),
        None => Some(TaggedJson {
            block: marker_start..text.len(),
            json: None,
        }),
    }
}

/// Scans a JSON object starting at the `{` at byte `open`, returning
/// the exclusive end index of its matching `}`.
fn scan_json_object(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in text[open..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

/// Strips a trailing `[Agent: <name>]` tag, returning the remaining
/// text and the captured name.
pub(crate) fn strip_agent_tag(text: &str) -> (String, Option<String>) {
    let trimmed = text.trim_end();
    if trimmed.ends_with(']') {
        if let Some(pos) = trimmed.rfind(AGENT_TAG_PREFIX) {
            let inner = &trimmed[pos + AGENT_TAG_PREFIX.len()..trimmed.len() - 1];
            if !inner.contains([']', '[']) {
                let name = inner.trim();
                let rest = trimmed[..pos].trim_end().to_owned();
                let name = (!name.is_empty()).then(|| name.to_owned());
                return (rest, name);
            }
        }
    }
    (text.to_owned(), None)
}

/// A located `[ARTICLES]` block.
pub(crate) struct ArticlesBlock {
    /// The whole block, marker and lines included.
    pub block: Range<usize>,
    /// The parsed cards, in order.
    pub cards: Vec<ArticleCard>,
}

/// Locates and parses the first `[ARTICLES]` block: the marker line
/// followed by numbered lines of the form
/// `N. Headline — Source [tags: a, b] (url)` where source, tags, and
/// URL are all optional.
pub(crate) fn find_articles_block(text: &str) -> Option<ArticlesBlock> {
    let marker_start = text.find(ARTICLES_TAG)?;
    let mut end = marker_start + ARTICLES_TAG.len();
    let mut cards = Vec::new();

    let mut rest = &text[end..];
    loop {
        let (line, line_len) = match rest.find('\n') {
            Some(pos) => (&rest[..pos], pos + 1),
            None => (rest, rest.len()),
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if line_len == 0 {
                break;
            }
        } else if let Some(card) = parse_article_line(trimmed) {
            cards.push(card);
        } else {
            break;
        }
        end += line_len;
        rest = &text[end..];
        if rest.is_empty() {
            break;
        }
    }

    Some(ArticlesBlock {
        block: marker_start..end,
        cards,
    })
}

/// Parses one numbered article line. Trailing patterns are stripped
/// left to right: the `(url)` suffix first, then the `[tags: ...]`
/// suffix, then an em-dash split into headline and source.
fn parse_article_line(line: &str) -> Option<ArticleCard> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let mut rest = line[digits..].strip_prefix('.')?.trim();

    let mut url = None;
    if rest.ends_with(')') {
        if let Some(pos) = rest.rfind('(') {
            let inner = rest[pos + 1..rest.len() - 1].trim();
            if !inner.is_empty() {
                url = Some(inner.to_owned());
            }
            rest = rest[..pos].trim_end();
        }
    }

    let mut tags = None;
    if rest.ends_with(']') {
        if let Some(pos) = rest.rfind("[tags:") {
            let inner = &rest[pos + "[tags:".len()..rest.len() - 1];
            let list: Vec<String> = inner
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned)
                .collect();
            if !list.is_empty() {
                tags = Some(list);
            }
            rest = rest[..pos].trim_end();
        }
    }

    let (headline, source_name) = match rest.rfind('—') {
        Some(pos) => {
            let source = rest[pos + '—'.len_utf8()..].trim();
            let headline = rest[..pos].trim();
            (
                headline.to_owned(),
                (!source.is_empty()).then(|| source.to_owned()),
            )
        }
        None => (rest.trim().to_owned(), None),
    };
    if headline.is_empty() {
        return None;
    }

    Some(ArticleCard {
        headline,
        source_name,
        url,
        tags,
    })
}

/// Serializes article cards as the numbered-line block body.
pub(crate) fn format_article_lines(cards: &[ArticleCard]) -> String {
    let mut out = String::new();
    for (i, card) in cards.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{}. {}", i + 1, card.headline));
        if let Some(source) = &card.source_name {
            out.push_str(&format!(" — {source}"));
        }
        if let Some(tags) = &card.tags {
            if !tags.is_empty() {
                out.push_str(&format!(" [tags: {}]", tags.join(", ")));
            }
        }
        if let Some(url) = &card.url {
            out.push_str(&format!(" ({url})"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_handles_nested_and_quoted_braces() {
        let text = r#"before [CHART]
{"title":"a {weird} one","nested":{"k":"v"},"s":"\"}"}
after"#;
        let found = find_tagged_json(text, "[CHART]").unwrap();
        let json = &text[found.json.unwrap()];
        assert!(serde_json::from_str::<serde_json::Value>(json).is_ok());
        assert!(text[found.block.end..].contains("after"));
    }

    #[test]
    fn test_unbalanced_json_consumes_tail() {
        let text = "story text\n\n[CHART]\n{\"title\":\"oops\"";
        let found = find_tagged_json(text, "[CHART]").unwrap();
        assert!(found.json.is_none());
        assert_eq!(found.block.end, text.len());
    }

    #[test]
    fn test_strip_agent_tag() {
        let (rest, name) = strip_agent_tag("Scores are in. [Agent: Flynn the Falcon]");
        assert_eq!(rest, "Scores are in.");
        assert_eq!(name.as_deref(), Some("Flynn the Falcon"));
    }

    #[test]
    fn test_agent_tag_must_be_trailing() {
        let (rest, name) = strip_agent_tag("[Agent: Polly] said hi");
        assert_eq!(rest, "[Agent: Polly] said hi");
        assert!(name.is_none());
    }

    #[test]
    fn test_article_line_full_form() {
        let card = parse_article_line("1. Big Win — Daily Times [tags: sports, finals] (https://example.com/a)").unwrap();
        assert_eq!(card.headline, "Big Win");
        assert_eq!(card.source_name.as_deref(), Some("Daily Times"));
        assert_eq!(card.tags.as_deref(), Some(&["sports".to_owned(), "finals".to_owned()][..]));
        assert_eq!(card.url.as_deref(), Some("https://example.com/a"));
    }

    #[test]
    fn test_article_line_headline_only() {
        let card = parse_article_line("2. Just a headline").unwrap();
        assert_eq!(card.headline, "Just a headline");
        assert!(card.source_name.is_none());
        assert!(card.tags.is_none());
        assert!(card.url.is_none());
    }

    #[test]
    fn test_articles_block_ends_at_prose() {
        let text = "[ARTICLES]\n1. One — A\n2. Two — B\nAnd then prose resumes.";
        let block = find_articles_block(text).unwrap();
        assert_eq!(block.cards.len(), 2);
        assert!(text[block.block.end..].starts_with("And then"));
    }
}
