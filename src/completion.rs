use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::config::Config;
use crate::error::{AssistantError, Result};
use crate::prompts::{ChatMessage, MessagePair};

// Structures matching the OpenAI /chat/completions endpoint
#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize, Debug)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    // Usage, ids, etc. are ignored
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completion API.
#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl CompletionClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AssistantError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        })
    }

    /// Send one message pair and return the text of the first choice.
    #[instrument(skip(self, messages))]
    pub async fn complete(&self, messages: &MessagePair, model: &str) -> Result<String> {
        let payload = CompletionRequest {
            model,
            messages: messages.to_messages(),
        };

        debug!(system = %messages.system, user = %messages.user, "Sending completion request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, endpoint = %self.endpoint, "Completion request could not be sent");
                AssistantError::Upstream(format!("failed to reach {}: {}", self.endpoint, e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(%status, %error_body, "Completion API request failed");
            return Err(AssistantError::Upstream(format!(
                "completion API returned {}: {}",
                status, error_body
            )));
        }

        let completion = response
            .json::<CompletionResponse>()
            .await
            .map_err(|e| AssistantError::Upstream(format!("failed to decode completion response: {e}")))?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AssistantError::Upstream("completion response contained no choices".to_string()))?;

        debug!(response = %text, "Received completion");
        Ok(text)
    }
}
