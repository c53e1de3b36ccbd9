//! Messages API client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::GeneratorConfig;

use super::error::{ApiErrorResponse, GeneratorError};
use super::types::{MessagesRequest, MessagesResponse};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Messages API client.
#[derive(Clone)]
pub struct AnthropicClient {
    inner: Arc<AnthropicClientInner>,
}

struct AnthropicClientInner {
    client: reqwest::Client,
    model: String,
}

impl AnthropicClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::InvalidApiKey` if the key contains characters
    /// that cannot go in a header, or `GeneratorError::Http` if the HTTP
    /// client cannot be built.
    pub fn new(config: &GeneratorConfig) -> Result<Self, GeneratorError> {
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|_| GeneratorError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-api-key", api_key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(AnthropicClientInner {
                client,
                model: config.model.clone(),
            }),
        })
    }

    /// The configured model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Send a request and return the complete response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers with an
    /// error status.
    #[instrument(skip(self, request), fields(model = %self.inner.model))]
    pub async fn messages(
        &self,
        request: &MessagesRequest,
    ) -> Result<MessagesResponse, GeneratorError> {
        let response = self
            .inner
            .client
            .post(ANTHROPIC_API_URL)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| GeneratorError::Parse(format!("Failed to parse response: {e}")))
    }
}

/// Turn an error status into a [`GeneratorError`].
async fn handle_error_status(
    status: reqwest::StatusCode,
    response: reqwest::Response,
) -> GeneratorError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return GeneratorError::RateLimited(retry_after);
    }

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return GeneratorError::Unauthorized("Invalid API key".to_string());
    }

    match response.text().await {
        Ok(body) => serde_json::from_str::<ApiErrorResponse>(&body).map_or_else(
            |_| GeneratorError::Api {
                error_type: status.to_string(),
                message: body.chars().take(500).collect(),
            },
            |api_error| GeneratorError::Api {
                error_type: api_error.error.error_type,
                message: api_error.error.message,
            },
        ),
        Err(e) => GeneratorError::Http(e),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn config(key: &str) -> GeneratorConfig {
        GeneratorConfig {
            api_key: SecretString::from(key.to_owned()),
            model: "claude-sonnet-4-20250514".to_owned(),
        }
    }

    #[test]
    fn test_client_keeps_model() {
        let client = AnthropicClient::new(&config("sk-ant-test")).unwrap();
        assert_eq!(client.model(), "claude-sonnet-4-20250514");
    }

    #[test]
    fn test_rejects_key_with_newline() {
        assert!(matches!(
            AnthropicClient::new(&config("sk-ant\nbad")),
            Err(GeneratorError::InvalidApiKey)
        ));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<AnthropicClient>();
    }
}
