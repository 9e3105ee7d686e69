//! JSON-over-HTTPS client shared by the vendor adapters.
//!
//! Every request body and every response body is JSON. The raw text of the
//! most recent response is kept so adapters can surface it when nothing
//! better is available (a proxy error page, an `Unauthorized` body).

use serde_json::Value;
use std::time::Duration;
use termchat_application::ProviderError;
use termchat_domain::UNKNOWN_ERROR_MESSAGE;
use termchat_domain::util::log_preview;
use tracing::debug;

/// HTTP client with per-adapter default headers and an optional bearer token.
pub struct ChatHttpClient {
    client: reqwest::Client,
    headers: Vec<(String, String)>,
    bearer: Option<String>,
    last_response: String,
}

impl ChatHttpClient {
    /// Build a client. `timeout` bounds each whole request; `None` keeps the
    /// reqwest default (no timeout).
    pub fn new(timeout: Option<Duration>) -> Result<Self, ProviderError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            headers: Vec::new(),
            bearer: None,
            last_response: String::new(),
        })
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Send `Authorization: Bearer <token>` from now on.
    pub fn set_bearer(&mut self, token: impl Into<String>) {
        self.bearer = Some(token.into());
    }

    /// Raw body of the most recent response; empty if the last request never
    /// got one.
    pub fn last_response(&self) -> &str {
        &self.last_response
    }

    /// The last raw response, or the generic error text when there is none.
    pub fn last_response_or_unknown(&self) -> String {
        if self.last_response.is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_string()
        } else {
            self.last_response.clone()
        }
    }

    /// POST `body` to `url` and parse the reply as JSON.
    ///
    /// The HTTP status is not checked: vendors put their `error` objects in
    /// 4xx bodies, and callers decide what a parsed body means.
    pub async fn post_json(&mut self, url: &str, body: &Value) -> Result<Value, ProviderError> {
        self.last_response.clear();

        let mut request = self.client.post(url).json(body);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        self.last_response = response
            .text()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        debug!(
            url,
            status = status.as_u16(),
            bytes = self.last_response.len(),
            "Received provider response"
        );

        serde_json::from_str(&self.last_response).map_err(|e| ProviderError::InvalidJson {
            error: e.to_string(),
            raw: log_preview(&self.last_response, 200),
        })
    }
}

/// Pull the assistant text out of a chat-completions response.
///
/// An `error` key wins over everything else: its `message` (or the sibling
/// `error_description`, or the bare string) becomes
/// [`ProviderError::FromProvider`].
pub fn extract_completion(json: &Value) -> Result<String, ProviderError> {
    if let Some(error) = json.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| json.get("error_description").and_then(Value::as_str))
            .or_else(|| error.as_str())
            .unwrap_or(UNKNOWN_ERROR_MESSAGE);
        return Err(ProviderError::FromProvider(message.to_string()));
    }

    json.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ProviderError::MissingField("choices[0].message.content".to_string()))
}
