//! LLM client: the single point of entry for all AI gateway calls in Brandcast.
//!
//! ARCHITECTURAL RULE: No other module may call the AI gateway directly.
//! All LLM interactions MUST go through this module.
//!
//! The gateway speaks the OpenAI-compatible chat-completions protocol. Structured
//! output is obtained by forcing a single function call whose JSON schema
//! describes the expected payload.
//!
//! Calls are never retried; failures go back to the caller as-is.

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

/// Model used for per-platform post generation.
pub const GENERATION_MODEL: &str = "google/gemini-3-flash-preview";
/// Model used for free-text summarisation (brand guideline parsing).
pub const SUMMARY_MODEL: &str = "google/gemini-2.5-flash";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by the AI gateway")]
    RateLimited,

    #[error("AI credits exhausted")]
    QuotaExhausted,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned no tool call for '{0}'")]
    MissingToolCall(String),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM output rejected: {0}")]
    Invalid(String),
}

/// A function the model is forced to call. `parameters` is a JSON schema.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolDefinition<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ToolDefinition<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    function: FunctionDefinition<'a>,
}

#[derive(Debug, Serialize)]
struct FunctionDefinition<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ToolChoice<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    function: ToolChoiceFunction<'a>,
}

#[derive(Debug, Serialize)]
struct ToolChoiceFunction<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize)]
pub struct ToolCall {
    pub function: FunctionCall,
}

#[derive(Debug, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded arguments, as a string.
    pub arguments: String,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text content of the first choice, if non-empty.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Raw JSON arguments of the first call to `name` in the first choice.
    pub fn tool_arguments(&self, name: &str) -> Option<&str> {
        self.choices
            .first()?
            .message
            .tool_calls
            .iter()
            .find(|call| call.function.name == name)
            .map(|call| call.function.arguments.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct GatewayError {
    error: GatewayErrorBody,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    message: String,
}

/// The single LLM client used by all services in Brandcast.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_url: String, api_key: String) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }

    /// Makes one chat-completion call. Non-success statuses are classified
    /// into [`LlmError`] variants; nothing is retried.
    pub async fn call(
        &self,
        model: &str,
        system: &str,
        user: &str,
        tool: Option<&ToolSpec>,
    ) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            tools: tool.map(|t| {
                vec![ToolDefinition {
                    kind: "function",
                    function: FunctionDefinition {
                        name: t.name,
                        description: t.description,
                        parameters: &t.parameters,
                    },
                }]
            }),
            tool_choice: tool.map(|t| ToolChoice {
                kind: "function",
                function: ToolChoiceFunction { name: t.name },
            }),
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("AI gateway returned {status}: {body}");
            return Err(classify_failure(status, body));
        }

        let chat: ChatResponse = response.json().await?;

        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: model={model}, prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat)
    }

    /// Calls the model for free text and returns the first choice's content.
    pub async fn call_text(&self, model: &str, system: &str, user: &str) -> Result<String, LlmError> {
        let response = self.call(model, system, user, None).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    /// Forces a call to `tool` and deserializes its arguments as `T`.
    pub async fn call_tool<T: DeserializeOwned>(
        &self,
        model: &str,
        system: &str,
        user: &str,
        tool: &ToolSpec,
    ) -> Result<T, LlmError> {
        let response = self.call(model, system, user, Some(tool)).await?;
        parse_tool_arguments(&response, tool.name)
    }
}

fn classify_failure(status: StatusCode, body: String) -> LlmError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited,
        StatusCode::PAYMENT_REQUIRED => LlmError::QuotaExhausted,
        _ => {
            let message = serde_json::from_str::<GatewayError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            LlmError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

fn parse_tool_arguments<T: DeserializeOwned>(
    response: &ChatResponse,
    tool_name: &str,
) -> Result<T, LlmError> {
    let arguments = response
        .tool_arguments(tool_name)
        .ok_or_else(|| LlmError::MissingToolCall(tool_name.to_string()))?;
    serde_json::from_str(arguments).map_err(LlmError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool_response(name: &str, arguments: &str) -> ChatResponse {
        serde_json::from_value(serde_json::json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": name, "arguments": arguments }
                    }]
                }
            }],
            "usage": { "prompt_tokens": 12, "completion_tokens": 34 }
        }))
        .unwrap()
    }

    #[test]
    fn test_classify_429_as_rate_limited() {
        let err = classify_failure(StatusCode::TOO_MANY_REQUESTS, String::new());
        assert!(matches!(err, LlmError::RateLimited));
    }

    #[test]
    fn test_classify_402_as_quota_exhausted() {
        let err = classify_failure(StatusCode::PAYMENT_REQUIRED, String::new());
        assert!(matches!(err, LlmError::QuotaExhausted));
    }

    #[test]
    fn test_classify_other_status_extracts_gateway_message() {
        let body = r#"{"error": {"message": "model overloaded"}}"#.to_string();
        match classify_failure(StatusCode::SERVICE_UNAVAILABLE, body) {
            LlmError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "model overloaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_classify_keeps_raw_body_when_not_json() {
        match classify_failure(StatusCode::BAD_GATEWAY, "upstream reset".to_string()) {
            LlmError::Api { message, .. } => assert_eq!(message, "upstream reset"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_tool_arguments() {
        #[derive(Deserialize)]
        struct Payload {
            value: u32,
        }
        let response = tool_response("emit", r#"{"value": 7}"#);
        let payload: Payload = parse_tool_arguments(&response, "emit").unwrap();
        assert_eq!(payload.value, 7);
    }

    #[test]
    fn test_missing_tool_call_is_an_error() {
        let response = tool_response("other_tool", "{}");
        let result: Result<serde_json::Value, _> = parse_tool_arguments(&response, "emit");
        assert!(matches!(result, Err(LlmError::MissingToolCall(_))));
    }

    #[test]
    fn test_text_ignores_blank_content() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [{ "message": { "content": "   " } }]
        }))
        .unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_tool_request_forces_function_choice() {
        let tool = ToolSpec {
            name: "emit",
            description: "Emit a value",
            parameters: serde_json::json!({"type": "object"}),
        };
        let request = ChatRequest {
            model: GENERATION_MODEL,
            messages: vec![],
            tools: Some(vec![ToolDefinition {
                kind: "function",
                function: FunctionDefinition {
                    name: tool.name,
                    description: tool.description,
                    parameters: &tool.parameters,
                },
            }]),
            tool_choice: Some(ToolChoice {
                kind: "function",
                function: ToolChoiceFunction { name: tool.name },
            }),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["tool_choice"]["function"]["name"], "emit");
        assert_eq!(json["tools"][0]["type"], "function");
    }
}
