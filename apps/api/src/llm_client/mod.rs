/// LLM Client — the single point of entry for all model calls in Vitae.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// All LLM interactions MUST go through this module.
///
/// Callers hold the client as `Arc<dyn Gateway>` so tests can substitute a
/// canned or failing backend without touching the network.
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Default model when `ANTHROPIC_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;

/// Sampling temperature for tasks that must be reproducible
/// (section detection, scoring).
pub const TEMP_DETERMINISTIC: f32 = 0.3;
/// Sampling temperature for generative tasks (feedback, rewriting).
pub const TEMP_GENERATIVE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// The model gateway boundary. One call type: system instruction + user
/// content + temperature in, raw response text out. Every analysis step that
/// needs judgment goes through this trait; a call fails exactly once — there
/// are no retries anywhere, and each caller converts its own failure into a
/// documented neutral default.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// The single LLM client used by all analysis steps.
/// Wraps the Anthropic Messages API. One attempt per call; a failed call is
/// final for the step that made it.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a raw call to the messages API, returning the full response.
    pub async fn call(
        &self,
        prompt: &str,
        system: &str,
        temperature: f32,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }
}

#[async_trait]
impl Gateway for LlmClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let response = self.call(user, system, temperature).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        Ok(text.to_string())
    }
}

/// Calls the gateway and deserializes the text response as JSON.
/// The prompt must instruct the model to return valid JSON.
pub async fn complete_json<T: DeserializeOwned>(
    gateway: &dyn Gateway,
    system: &str,
    user: &str,
    temperature: f32,
) -> Result<T, LlmError> {
    let text = gateway.complete(system, user, temperature).await?;

    // Strip markdown code fences if the model wraps JSON in them
    let text = strip_json_fences(&text);

    serde_json::from_str(text).map_err(LlmError::Parse)
}

/// The structured-request contract shared by all four gateway-backed steps:
/// build request → parse JSON → on ANY failure, log once and substitute the
/// caller's fallback. The fallback closure receives the error so callers can
/// surface a user-safe reason.
pub async fn complete_json_or_else<T, F>(
    gateway: &dyn Gateway,
    system: &str,
    user: &str,
    temperature: f32,
    fallback: F,
) -> T
where
    T: DeserializeOwned,
    F: FnOnce(LlmError) -> T,
{
    match complete_json(gateway, system, user, temperature).await {
        Ok(value) => value,
        Err(e) => {
            warn!("Gateway call failed, substituting fallback: {e}");
            fallback(e)
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    /// Gateway stub that always returns the same text.
    pub struct StaticGateway(pub String);

    #[async_trait]
    impl Gateway for StaticGateway {
        async fn complete(&self, _: &str, _: &str, _: f32) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    /// Gateway stub that always fails as if the transport died.
    pub struct FailingGateway;

    #[async_trait]
    impl Gateway for FailingGateway {
        async fn complete(&self, _: &str, _: &str, _: f32) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 500,
                message: "connection reset".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_complete_json_parses_fenced_payload() {
        let gw = StaticGateway("```json\n{\"n\": 3}\n```".to_string());
        #[derive(Deserialize)]
        struct P {
            n: i32,
        }
        let p: P = complete_json(&gw, "sys", "user", 0.3).await.unwrap();
        assert_eq!(p.n, 3);
    }

    #[tokio::test]
    async fn test_complete_json_or_else_uses_fallback_on_garbage() {
        let gw = StaticGateway("not json at all".to_string());
        let v: serde_json::Value =
            complete_json_or_else(&gw, "sys", "user", 0.3, |_| serde_json::json!({"ok": false}))
                .await;
        assert_eq!(v["ok"], false);
    }

    #[tokio::test]
    async fn test_complete_json_or_else_fallback_sees_error() {
        let gw = FailingGateway;
        let msg: String = complete_json_or_else(&gw, "sys", "user", 0.3, |e| e.to_string()).await;
        assert!(msg.contains("500"));
    }
}
