use std::pin::Pin;
use std::sync::Arc;

use tracing::Instrument;

use news_nest_model::{ChatBackend, ChatBackendError, ChatRequest, ChatResponse};

/// Result of one chat request through the type-erased client.
pub type SendChatResult = Result<ChatResponse, Box<dyn ChatBackendError>>;
type BoxedSendChatFuture = Pin<Box<dyn Future<Output = SendChatResult> + Send>>;
#[rustfmt::skip]
type HandlerFn = Arc<
    dyn Fn(ChatRequest) -> BoxedSendChatFuture + Send + Sync
>;

/// A wrapper around a chat backend that provides a type-erased
/// interface for the screen, so the screen itself doesn't need a
/// generic parameter.
#[derive(Clone)]
pub struct ChatClient {
    handler_fn: HandlerFn,
}

impl ChatClient {
    /// Wraps the given backend.
    #[inline]
    pub fn new<B: ChatBackend + 'static>(backend: B) -> Self {
        // We have to erase the type `B`, since `ChatClient` doesn't
        // have a generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            trace!("got a request: {:?}", req);
            let fut = backend.send_chat(&req);
            Box::pin(
                async move {
                    let resp_or_err = fut.await;
                    if let Err(err) = &resp_or_err {
                        error!("got an error: {err}");
                    }
                    resp_or_err.map_err(|err| Box::new(err) as Box<dyn ChatBackendError>)
                }
                .instrument(trace_span!("chat client req")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a request and returns the complete response.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe; dropping the returned future simply
    /// abandons the underlying request.
    #[inline]
    pub async fn send(&self, req: ChatRequest) -> SendChatResult {
        (self.handler_fn)(req).await
    }
}

#[cfg(test)]
mod tests {
    use news_nest_test_backend::{PresetReply, TestBackend};

    use super::*;

    fn request(history: Vec<news_nest_model::HistoryTurn>) -> ChatRequest {
        ChatRequest {
            agent: "polly".to_owned(),
            message: "hi".to_owned(),
            conversation_history: history,
            user_name: None,
            parrot_name: None,
        }
    }

    #[tokio::test]
    async fn test_send_request() {
        let mut backend = TestBackend::default();
        backend.add_reply(PresetReply::text("Polly the Parrot", "Hello there!"));

        let client = ChatClient::new(backend);
        let resp = client.send(request(vec![])).await.unwrap();
        assert_eq!(resp.agent, "Polly the Parrot");
        assert_eq!(resp.response, "Hello there!");
    }

    #[tokio::test]
    async fn test_error_handling() {
        let backend = TestBackend::default();
        let client = ChatClient::new(backend);
        let resp_or_err = client.send(request(vec![])).await;
        assert!(resp_or_err.is_err());
    }
}
