//! A chat backend and session store backed by the News Nest HTTP API.

#[macro_use]
extern crate tracing;

mod config;
mod store;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use mime::Mime;
use news_nest_model::{
    ChatBackend, ChatBackendError, ChatRequest, ChatResponse, ErrorKind,
};
use reqwest::{Client, Response, StatusCode, header};

pub use config::{ApiConfig, ApiConfigBuilder};

/// Error type for [`ApiClient`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ChatBackendError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// News Nest API client, implementing both [`ChatBackend`] and
/// [`news_nest_model::SessionStore`].
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    config: Arc<ApiConfig>,
}

impl ApiClient {
    /// Creates a new `ApiClient` with the given configuration.
    #[inline]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => req.header(header::AUTHORIZATION, format!("Bearer {key}")),
            None => req,
        }
    }
}

impl ChatBackend for ApiClient {
    type Error = Error;

    fn send_chat(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, Self::Error>> + Send + 'static
    {
        debug!(agent = %req.agent, history_turns = req.conversation_history.len(), "sending chat request");
        let resp_fut = self
            .authorize(self.client.post(self.endpoint("/agents/chat")))
            .header(header::CONTENT_TYPE, "application/json")
            .json(req)
            .send();

        async move {
            let resp = check_status(resp_fut.await)?;

            if !is_json_content_type(&resp) {
                return Err(Error::new(
                    format!(
                        "Unexpected content type: {:?}",
                        resp.headers().get(header::CONTENT_TYPE)
                    ),
                    ErrorKind::Other,
                ));
            }

            resp.json::<ChatResponse>()
                .await
                .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))
        }
    }
}

/// Maps HTTP failures to error kinds the conversation screen can phrase
/// a notice for.
fn check_status(result: reqwest::Result<Response>) -> Result<Response, Error> {
    let resp = match result {
        Ok(resp) => resp,
        Err(err) => {
            return Err(Error::new(format!("{err}"), ErrorKind::Other));
        }
    };
    let kind = match resp.status() {
        StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimitExceeded,
        StatusCode::FORBIDDEN | StatusCode::UNAVAILABLE_FOR_LEGAL_REASONS => {
            ErrorKind::Moderated
        }
        _ => ErrorKind::Other,
    };
    resp.error_for_status()
        .map_err(|err| Error::new(format!("{err}"), kind))
}

fn is_json_content_type(resp: &Response) -> bool {
    resp.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .map(|m: Mime| m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_path() {
        let client = ApiClient::new(
            ApiConfigBuilder::with_base_url("http://localhost:8000/").build(),
        );
        assert_eq!(
            client.endpoint("/agents/chat"),
            "http://localhost:8000/agents/chat"
        );
    }
}
