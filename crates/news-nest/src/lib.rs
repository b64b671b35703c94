//! The News Nest conversation engine, packaged for host apps.
//!
//! The crate includes a CLI tool for chatting in the terminal. And you can
//! also use it as a library to bring the conversation screen into your own
//! host apps.

#![deny(missing_docs)]

mod persona;

pub use persona::{PERSONAS, Persona};

/// Re-exports of [`news_nest_core`] crate.
pub mod core {
    pub use news_nest_core::*;
}
