//! Core logic of the News Nest conversation screen: response chunking,
//! the reveal scheduler, the history codec, and the screen orchestration
//! that ties them to a chat backend and session store.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

pub mod chunking;
mod client;
pub mod codec;
pub mod reveal;
mod screen;

pub use client::{ChatClient, SendChatResult};
pub use screen::{ConversationScreen, ScreenBuilder, ScreenConfig, ScreenEvent};
