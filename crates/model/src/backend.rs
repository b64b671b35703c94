use std::error::Error;

use crate::error::ErrorKind;
use crate::wire::{ChatRequest, ChatResponse};

/// The error type for a chat backend.
pub trait ChatBackendError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that can answer chat requests, typically the remote AI/news
/// API.
///
/// Once created, the backend should behave like a stateless object. It
/// can still have internal state, but callers should not rely on it,
/// and the backend should be prepared for being dropped anytime.
pub trait ChatBackend: Send + Sync {
    /// The error type that may be returned by the backend.
    type Error: ChatBackendError;

    /// Sends one chat request and resolves with the complete response.
    ///
    /// There is no client-side retry; a failure surfaces directly to
    /// the caller.
    fn send_chat(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, Self::Error>> + Send + 'static;
}
