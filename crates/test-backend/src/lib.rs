//! A local fake chat backend and session store for testing purpose.

mod preset;
mod store;

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::time::Duration;

use tokio::time::sleep;

use news_nest_model::{ChatBackend, ChatBackendError, ChatRequest, ChatResponse, ErrorKind};

pub use preset::PresetReply;
pub use store::MemoryStore;

/// Error type for [`TestBackend`].
#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl StdError for Error {}

impl ChatBackendError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// A local fake chat backend for testing purpose.
///
/// Before sending requests, set up the reply script: the reply is
/// selected by how many completed exchanges the request's history
/// carries (each exchange adds a user and a model turn). When the
/// script runs out, an error is returned.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy
/// memory copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestBackend {
    replies: Vec<PresetReply>,
    delay: Option<Duration>,
    fail_kind: Option<ErrorKind>,
}

impl TestBackend {
    /// Appends a scripted reply for the next exchange.
    #[inline]
    pub fn add_reply(&mut self, reply: PresetReply) {
        self.replies.push(reply);
    }

    /// Adds an artificial delay before every reply.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Makes every request fail with the given kind.
    #[inline]
    pub fn fail_with(&mut self, kind: ErrorKind) {
        self.fail_kind = Some(kind);
    }
}

impl ChatBackend for TestBackend {
    type Error = Error;

    fn send_chat(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, Self::Error>> + Send + 'static {
        let exchange_idx = req.conversation_history.len() / 2;
        let reply = self.replies.get(exchange_idx).cloned();
        let delay = self.delay;
        let fail_kind = self.fail_kind;
        async move {
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            if let Some(kind) = fail_kind {
                return Err(Error {
                    message: "scripted failure",
                    kind,
                });
            }
            match reply {
                Some(reply) => Ok(reply.into()),
                None => Err(Error {
                    message: "no more scripted replies",
                    kind: ErrorKind::Other,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use news_nest_model::HistoryTurn;

    use super::*;

    fn request(history: Vec<HistoryTurn>) -> ChatRequest {
        ChatRequest {
            agent: "polly".to_owned(),
            message: "hi".to_owned(),
            conversation_history: history,
            user_name: None,
            parrot_name: None,
        }
    }

    #[tokio::test]
    async fn test_replies_follow_history_length() {
        let mut backend = TestBackend::default();
        backend.add_reply(PresetReply::text("Polly the Parrot", "first"));
        backend.add_reply(PresetReply::text("Polly the Parrot", "second"));

        let resp = backend.send_chat(&request(vec![])).await.unwrap();
        assert_eq!(resp.response, "first");

        let history = vec![
            HistoryTurn::user("hi"),
            HistoryTurn::model("first [Agent: Polly the Parrot]"),
        ];
        let resp = backend.send_chat(&request(history)).await.unwrap();
        assert_eq!(resp.response, "second");
    }

    #[tokio::test]
    async fn test_exhausted_script_errors() {
        let backend = TestBackend::default();
        let res = backend.send_chat(&request(vec![])).await;
        assert!(res.is_err());
    }
}
