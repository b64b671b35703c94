//! Splits long agent responses into bubble-sized chunks.
//!
//! Paragraph boundaries take precedence over sentence grouping: a
//! response with blank-line breaks becomes one bubble per paragraph.
//! Otherwise sentences are greedily grouped under a length bound. The
//! same sentence tokenizer drives the word-by-word style reveal of a
//! single bubble via [`initial_chunk`] and [`next_chunk`].

/// Tuning knobs for chunk sizing.
///
/// The bounds are display heuristics carried over from the production
/// UI; they have no semantic meaning beyond "fits in one bubble".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkPolicy {
    /// Soft upper bound on a chunk's length in bytes.
    pub max_chunk_len: usize,
    /// Close a chunk after this many sentences.
    pub sentences_per_chunk: usize,
    /// Sentence budget of the initial excerpt of a streamed bubble.
    pub initial_sentences: usize,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self {
            max_chunk_len: 150,
            sentences_per_chunk: 2,
            initial_sentences: 2,
        }
    }
}

/// The short excerpt shown immediately plus the tail left to stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitialChunk {
    /// Text to display right away.
    pub initial: String,
    /// Text still to be revealed; empty when nothing is left.
    pub remaining: String,
}

/// One popped sentence plus the rest of the text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NextChunk {
    /// The next sentence, or empty when the text is exhausted.
    pub chunk: String,
    /// Everything after the popped sentence.
    pub remaining: String,
}

/// Splits `text` into an ordered sequence of bubble-sized chunks.
///
/// The result is never empty; text that resists splitting comes back as
/// a single trimmed chunk.
pub fn split_into_message_chunks(text: &str, policy: &ChunkPolicy) -> Vec<String> {
    let paragraphs = split_paragraphs(text);
    if paragraphs.len() > 1 {
        return paragraphs;
    }

    let sents = sentences(text);
    if sents.len() <= policy.sentences_per_chunk {
        return vec![text.trim().to_owned()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    for (i, sentence) in sents.iter().enumerate() {
        let over_len =
            !current.is_empty() && current.len() + 1 + sentence.len() > policy.max_chunk_len;
        let at_boundary = i > 0 && i % policy.sentences_per_chunk == 0;
        if !current.is_empty() && (over_len || at_boundary) {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(sentence);
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    if chunks.is_empty() {
        vec![text.trim().to_owned()]
    } else {
        chunks
    }
}

/// Splits off the short excerpt to show immediately.
pub fn initial_chunk(text: &str, policy: &ChunkPolicy) -> InitialChunk {
    let sents = sentences(text);
    let mut initial = String::new();
    let mut taken = 0;
    for sentence in &sents {
        if taken >= policy.initial_sentences {
            break;
        }
        if !initial.is_empty() && initial.len() + 1 + sentence.len() > policy.max_chunk_len {
            break;
        }
        if !initial.is_empty() {
            initial.push(' ');
        }
        initial.push_str(sentence);
        taken += 1;
    }
    let remaining = sents[taken..].join(" ");

    // A single overlong sentence cannot be split on punctuation; cut it
    // at the nearest period-space or space before the length bound.
    if remaining.is_empty() {
        let trimmed = text.trim();
        if trimmed.len() > policy.max_chunk_len {
            let cut = raw_cut_index(trimmed, policy.max_chunk_len);
            return InitialChunk {
                initial: trimmed[..cut].trim().to_owned(),
                remaining: trimmed[cut..].trim().to_owned(),
            };
        }
    }

    InitialChunk { initial, remaining }
}

/// Pops the next sentence off the front of `text`.
///
/// An empty `chunk` signals the caller to stop streaming.
pub fn next_chunk(text: &str) -> NextChunk {
    let sents = sentences(text);
    match sents.split_first() {
        Some((first, rest)) => NextChunk {
            chunk: (*first).to_owned(),
            remaining: rest.join(" "),
        },
        None => NextChunk {
            chunk: String::new(),
            remaining: String::new(),
        },
    }
}

/// Tokenizes `text` into trimmed sentences: maximal runs of
/// non-terminator characters followed by one or more of `.`, `!`, `?`.
/// An unterminated tail counts as one sentence.
fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_terminator = false;
    for (i, c) in text.char_indices() {
        let is_terminator = matches!(c, '.' | '!' | '?');
        if in_terminator && !is_terminator {
            let sentence = text[start..i].trim();
            if !sentence.is_empty() {
                out.push(sentence);
            }
            start = i;
        }
        in_terminator = is_terminator;
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}

/// Splits `text` on blank-line boundaries (two or more newlines, blank
/// whitespace between them allowed), dropping empty paragraphs.
fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '\n' {
            continue;
        }
        let mut newlines = 1;
        let mut sep_end = i + 1;
        while let Some(&(j, next)) = chars.peek() {
            match next {
                '\n' => newlines += 1,
                ' ' | '\t' | '\r' => {}
                _ => break,
            }
            chars.next();
            sep_end = j + next.len_utf8();
        }
        if newlines >= 2 {
            let paragraph = text[start..i].trim();
            if !paragraph.is_empty() {
                paragraphs.push(paragraph.to_owned());
            }
            start = sep_end;
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        paragraphs.push(tail.to_owned());
    }
    paragraphs
}

/// Finds a byte index at or before `limit` suitable for a hard cut:
/// after a period-space if one exists, else at a space, else at the
/// nearest char boundary.
fn raw_cut_index(text: &str, limit: usize) -> usize {
    let mut boundary = limit.min(text.len());
    while !text.is_char_boundary(boundary) {
        boundary -= 1;
    }
    let head = &text[..boundary];
    if let Some(pos) = head.rfind(". ") {
        return pos + 1;
    }
    if let Some(pos) = head.rfind(' ') {
        return pos;
    }
    boundary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ChunkPolicy {
        ChunkPolicy::default()
    }

    #[test]
    fn test_paragraph_split_wins() {
        let text = "Headline one happened. Here's why it matters. \n\nIn other news, headline two happened too.";
        let chunks = split_into_message_chunks(text, &policy());
        assert_eq!(
            chunks,
            vec![
                "Headline one happened. Here's why it matters.",
                "In other news, headline two happened too.",
            ]
        );
    }

    #[test]
    fn test_two_sentences_stay_whole() {
        let text = "Scores are in. The Hawks won!";
        assert_eq!(split_into_message_chunks(text, &policy()), vec![text]);
    }

    #[test]
    fn test_sentence_grouping_every_two() {
        let text = "One. Two. Three. Four. Five.";
        let chunks = split_into_message_chunks(text, &policy());
        assert_eq!(chunks, vec!["One. Two.", "Three. Four.", "Five."]);
    }

    #[test]
    fn test_length_bound_closes_chunk() {
        let long_a = format!("{}.", "a".repeat(120));
        let long_b = format!("{}.", "b".repeat(120));
        let text = format!("{long_a} {long_b} Short one. Done.");
        let chunks = split_into_message_chunks(&text, &policy());
        assert_eq!(chunks[0], long_a);
        assert_eq!(chunks[1], long_b);
    }

    #[test]
    fn test_no_punctuation_is_one_sentence() {
        let text = "no terminal punctuation here";
        assert_eq!(split_into_message_chunks(text, &policy()), vec![text]);
        let next = next_chunk(text);
        assert_eq!(next.chunk, text);
        assert_eq!(next.remaining, "");
    }

    #[test]
    fn test_initial_chunk_reconstructs() {
        let text = "First sentence. Second sentence. Third sentence. Fourth sentence.";
        let split = initial_chunk(text, &policy());
        assert_eq!(split.initial, "First sentence. Second sentence.");
        let rejoined = format!("{} {}", split.initial, split.remaining);
        assert_eq!(rejoined, text);
    }

    #[test]
    fn test_initial_chunk_raw_cut_fallback() {
        let text = "word ".repeat(60);
        let split = initial_chunk(&text, &policy());
        assert!(!split.initial.is_empty());
        assert!(!split.remaining.is_empty());
        assert!(split.initial.len() <= 150);
        // No content lost, modulo the whitespace the cut collapsed.
        let rejoined = format!("{} {}", split.initial, split.remaining);
        assert_eq!(
            rejoined.split_whitespace().count(),
            text.split_whitespace().count()
        );
    }

    #[test]
    fn test_initial_chunk_short_text_has_no_remainder() {
        let split = initial_chunk("Quick update.", &policy());
        assert_eq!(split.initial, "Quick update.");
        assert_eq!(split.remaining, "");
    }

    #[test]
    fn test_next_chunk_drains_in_order() {
        let text = "One! Two? Three.";
        let mut rest = text.to_owned();
        let mut seen = Vec::new();
        loop {
            let next = next_chunk(&rest);
            if next.chunk.is_empty() {
                break;
            }
            seen.push(next.chunk);
            rest = next.remaining;
        }
        assert_eq!(seen, vec!["One!", "Two?", "Three."]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(split_into_message_chunks("", &policy()), vec![""]);
        let next = next_chunk("");
        assert_eq!(next.chunk, "");
    }
}
