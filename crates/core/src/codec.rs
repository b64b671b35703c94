//! Bidirectional mapping between in-memory message lists and the flat
//! persisted `{role, parts}` turn format.
//!
//! The persisted format folds structured data into the text of a model
//! turn as bracket-tagged blocks:
//!
//! ```text
//! <chunk texts joined by spaces>
//!
//! [CHART]
//! {...json...}
//!
//! [ARTICLES]
//! 1. Headline — Source [tags: a, b] (url)
//!  [Agent: Name]
//! ```
//!
//! Decoding is fail-open: a malformed block is removed from the visible
//! text and its payload dropped, but hydration of the rest of the
//! session always proceeds. Bubble boundaries are re-derived on every
//! decode, so the round trip preserves content and attachments but not
//! necessarily the original bubble count.

mod blocks;
mod decode;
mod encode;
#[cfg(test)]
mod tests;

pub use decode::{decode_history, decode_history_with};
pub use encode::encode_history;

/// Marker introducing an embedded chart block.
pub(crate) const CHART_TAG: &str = "[CHART]";
/// Marker introducing an embedded timeline block.
pub(crate) const TIMELINE_TAG: &str = "[TIMELINE]";
/// Marker introducing an embedded scoreboard block.
pub(crate) const SCOREBOARD_TAG: &str = "[SCOREBOARD]";
/// Marker introducing the article reference list.
pub(crate) const ARTICLES_TAG: &str = "[ARTICLES]";
/// Prefix of the trailing agent name tag.
pub(crate) const AGENT_TAG_PREFIX: &str = "[Agent:";
