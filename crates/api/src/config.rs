use std::fmt::Debug;

/// Builder for [`ApiConfig`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ApiConfigBuilder {
    base_url: String,
    api_key: Option<String>,
}

impl ApiConfigBuilder {
    /// Creates a builder targeting the given backend base URL.
    #[inline]
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
        }
    }

    /// Sets the API key to send with each request.
    #[inline]
    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.trim_end_matches('/').to_owned(),
            api_key: self.api_key,
        }
    }
}

impl Debug for ApiConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfigBuilder")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<deducted>"))
            .finish()
    }
}

/// Configuration for the News Nest backend client.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ApiConfig {
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
}

impl Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<deducted>"))
            .finish()
    }
}
