use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{ClientError, ensure_success, trim_base_url};

const SERVICE: &str = "LLM";

/// A chat-completion backend that answers with a JSON document.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends the prompts and returns the model's answer parsed as JSON.
    async fn complete_json(&self, system_prompt: &str, user_prompt: &str) -> Result<Value, ClientError>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for OpenAI-compatible `/chat/completions` endpoints.
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiClient {
    pub fn new(client: Client, base_url: &str, api_key: Option<String>, model: &str) -> Self {
        Self {
            client,
            base_url: trim_base_url(base_url),
            api_key,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete_json(&self, system_prompt: &str, user_prompt: &str) -> Result<Value, ClientError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ClientError::InvalidConfiguration("LLM API key is not configured".to_string())
        })?;

        let payload = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system_prompt },
                ChatMessage { role: "user", content: user_prompt },
            ],
            response_format: ResponseFormat { kind: "json_object" },
            temperature: 0.7,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(url = %url, model = %self.model, "Requesting chat completion");
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;
        let completion: ChatResponse = ensure_success(SERVICE, response).await?.json().await?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ClientError::UnexpectedResponse {
                service: SERVICE,
                reason: "completion has no message content".to_string(),
            })?;

        serde_json::from_str(&content).map_err(|e| ClientError::UnexpectedResponse {
            service: SERVICE,
            reason: format!("completion is not valid JSON: {e}"),
        })
    }
}
