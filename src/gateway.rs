//! Completion gateway for the OpenRouter chat-completion API
//!
//! Both demo apps talk to the hosted model through this seam.
//! Uses a long-lived reqwest::Client for connection pooling.

use crate::error::AppError;
use crate::session::Turn;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

/// Sampling parameters for one completion call
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Trait for chat-completion backends (hosted API or mock)
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Send the turns to the model and return the reply text
    async fn complete(
        &self,
        model: &str,
        turns: &[Turn],
        params: GenerationParams,
    ) -> Result<String>;
}

/// Connection settings for the OpenRouter API
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: String,
    pub base_url: String,
    /// Sent as the HTTP-Referer attribution header
    pub referer: String,
    /// Sent as the X-Title attribution header
    pub app_title: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            referer: "http://localhost:3000".to_string(),
            app_title: "GenerationGap".to_string(),
        }
    }
}

/// Reusable OpenRouter client (connection-pooled)
pub struct OpenRouterClient {
    client: Client,
    config: OpenRouterConfig,
}

impl OpenRouterClient {
    pub fn new(config: OpenRouterConfig) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, config }
    }
}

#[async_trait]
impl CompletionGateway for OpenRouterClient {
    async fn complete(
        &self,
        model: &str,
        turns: &[Turn],
        params: GenerationParams,
    ) -> Result<String> {
        if self.config.api_key.is_empty() {
            return Err(AppError::Gateway(
                "OPENROUTER_API_KEY not configured".to_string(),
            ));
        }

        let url = format!("{}/chat/completions", self.config.base_url);

        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages: turns.to_vec(),
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        info!("Calling OpenRouter API (model: {}, turns: {})", model, turns.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.app_title)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("OpenRouter request failed: {}", e);
                AppError::Gateway(format!("OpenRouter request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("OpenRouter error response ({}): {}", status, body);
            return Err(AppError::GatewayStatus {
                status: status.as_u16(),
                message: body,
            });
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!("Failed to parse OpenRouter response: {}", e);
            AppError::Gateway(format!("OpenRouter parse error: {}", e))
        })?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Gateway("No completion choices returned".to_string()))?;

        debug!("Completion received (finish_reason: {:?})", choice.finish_reason);
        if let Some(usage) = completion.usage {
            debug!(
                "Token usage: prompt={:?} completion={:?} total={:?}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        Ok(choice.message.content)
    }
}

/// Mock gateway for development & testing
/// Keeps both apps functional without an LLM dependency
pub struct MockGateway {
    reply: String,
}

impl MockGateway {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl CompletionGateway for MockGateway {
    async fn complete(
        &self,
        _model: &str,
        _turns: &[Turn],
        _params: GenerationParams,
    ) -> Result<String> {
        Ok(self.reply.clone())
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Turn>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: Option<i64>,
    completion_tokens: Option<i64>,
    total_tokens: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;

    #[test]
    fn test_request_serialization() {
        let request = ChatCompletionRequest {
            model: "google/gemini-2.0-flash-exp:free".to_string(),
            messages: vec![
                Turn::new(Role::System, "You are a therapist"),
                Turn::new(Role::User, "Hello"),
            ],
            temperature: 0.7,
            max_tokens: 500,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("google/gemini-2.0-flash-exp:free"));
        assert!(json.contains(r#""role":"system""#));
        assert!(json.contains(r#""content":"Hello""#));
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "choices": [{
                "message": {"content": "Hello!"},
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 10,
                "completion_tokens": 5,
                "total_tokens": 15
            }
        }"#;

        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content, "Hello!");
        assert_eq!(response.choices[0].finish_reason.as_deref(), Some("stop"));
        assert!(response.usage.is_some());
    }

    #[tokio::test]
    async fn test_missing_api_key_short_circuits() {
        let client = OpenRouterClient::new(OpenRouterConfig::default());
        let turns = vec![Turn::new(Role::User, "hi")];

        let result = client
            .complete(
                "google/gemini-2.0-flash-exp:free",
                &turns,
                GenerationParams {
                    temperature: 0.7,
                    max_tokens: 500,
                },
            )
            .await;

        let error = result.unwrap_err().to_string();
        assert!(error.contains("not configured"));
    }

    #[tokio::test]
    async fn test_mock_gateway_returns_canned_reply() {
        let gateway = MockGateway::new("canned reply");
        let turns = vec![Turn::new(Role::User, "hi")];

        let reply = gateway
            .complete(
                "any-model",
                &turns,
                GenerationParams {
                    temperature: 0.0,
                    max_tokens: 10,
                },
            )
            .await
            .unwrap();

        assert_eq!(reply, "canned reply");
    }
}
