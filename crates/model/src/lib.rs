//! Data model for the News Nest conversation subsystem.
//!
//! This crate establishes the shared vocabulary between the conversation
//! engines and the remote services: the in-memory message model, the
//! structured attachment payloads, the persisted turn format, and the
//! wire types of the chat endpoint.
//!
//! Types in this crate don't define any behavior beyond construction
//! helpers; the encoding/decoding and scheduling logic lives in the
//! `news-nest-core` crate.

#![deny(missing_docs)]

mod attachment;
mod backend;
mod error;
mod history;
mod message;
mod store;
mod wire;

pub use attachment::*;
pub use backend::*;
pub use error::*;
pub use history::*;
pub use message::*;
pub use store::*;
pub use wire::*;
