use std::time::Duration;

use anyhow::Context;

use reqwest::{Client, StatusCode};

use serde::{Deserialize, Serialize};

use secrecy::Secret;

use url::Url;

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Chat gateway rate limit exceeded")]
    RateLimited,
    #[error("Chat gateway requires payment")]
    PaymentRequired,
    #[error("Chat gateway returned {status}: {body}")]
    Upstream { status: StatusCode, body: String },
    #[error("Chat gateway did not answer in time")]
    Timeout,
    #[error("Failed to reach chat gateway")]
    Request(#[from] reqwest::Error),
}

/// Client for an OpenAI-compatible chat-completion gateway
#[derive(Debug)]
pub struct ChatClient {
    client: Client,
    model: String,
    api_timeout: Duration,

    api_completions_url: Url,
    api_key: Secret<String>,
}

impl ChatClient {
    pub fn new(
        model: &str,
        api_timeout: Duration,
        api_base_url: Url,
        api_key: Secret<String>,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build http client")?;

        let api_completions_url = api_base_url
            .join("chat/completions")
            .context("Failed to create chat completions endpoint URL")?;

        Ok(Self {
            client,
            model: model.to_string(),
            api_timeout,
            api_completions_url,
            api_key,
        })
    }

    /// Request a streamed completion.
    ///
    /// Resolves once the gateway has answered with a success status, the body
    /// is left unread so the caller can relay it chunk by chunk.
    #[tracing::instrument(name = "Request a streamed chat completion", skip(self, messages), fields(model = %self.model, turns = messages.len()))]
    pub async fn stream(&self, messages: &[ChatMessage]) -> Result<reqwest::Response, ChatError> {
        use secrecy::ExposeSecret;

        let body = CompletionRequest {
            model: &self.model,
            messages,
            stream: true,
        };

        let response = tokio::time::timeout(
            self.api_timeout,
            self.client
                .post(self.api_completions_url.clone())
                .bearer_auth(self.api_key.expose_secret())
                .json(&body)
                .send(),
        )
        .await
        .map_err(|_| ChatError::Timeout)??;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::TOO_MANY_REQUESTS => Err(ChatError::RateLimited),
            StatusCode::PAYMENT_REQUIRED => Err(ChatError::PaymentRequired),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ChatError::Upstream { status, body })
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}
