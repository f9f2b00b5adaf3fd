//! OpenAI-compatible chat completions backend
//!
//! Talks to any server that speaks the `/chat/completions` protocol with
//! function calling. One request per generation; the engine decides what
//! to do with the answer.

use async_trait::async_trait;
use crew_application::ports::decision_backend::{BackendError, DecisionBackend};
use crew_domain::session::{ContextMessage, Generation, GenerationContext, Role};
use crew_domain::tool::ToolCall;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::tools::FunctionSchemaConverter;

/// Backend that calls an OpenAI-compatible HTTP API.
#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: Option<f32>,
}

impl OpenAiBackend {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Use a preconfigured HTTP client (proxies, custom timeouts).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn build_request(&self, context: &GenerationContext) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(context.messages.len() + 1);
        if !context.system_prompt.trim().is_empty() {
            messages.push(ChatMessage::plain("system", &context.system_prompt, None));
        }
        let mut pending_call_id = None;
        for (index, message) in context.messages.iter().enumerate() {
            messages.push(ChatMessage::from_context(message, index, &mut pending_call_id));
        }

        let tools = if context.offers_tools() {
            Some(FunctionSchemaConverter.tools_schema(&context.tools))
        } else {
            None
        };

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            tools,
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl DecisionBackend for OpenAiBackend {
    async fn generate(&self, context: &GenerationContext) -> Result<Generation, BackendError> {
        let request = self.build_request(context);
        debug!(
            requester = %context.requester,
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, Vec::len),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(map_http_error(status, &body));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| BackendError::MalformedResponse(format!("invalid JSON body: {}", e)))?;

        parse_response(parsed)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// ==================== Wire types ====================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl ChatMessage {
    fn plain(role: &'static str, content: &str, name: Option<&str>) -> Self {
        Self {
            role,
            content: Some(content.to_string()),
            name: name.map(sanitize_name),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Tool requests without a backend id get a positional one, and the
    /// matching tool result reuses it.
    fn from_context(
        message: &ContextMessage,
        index: usize,
        pending_call_id: &mut Option<String>,
    ) -> Self {
        match message.role {
            Role::System => Self::plain("system", &message.content, None),
            Role::User => Self::plain("user", &message.content, message.name.as_deref()),
            Role::Assistant => match &message.tool_call {
                Some(call) => {
                    let id = call.id.clone().unwrap_or_else(|| format!("call_{}", index));
                    *pending_call_id = Some(id.clone());
                    Self {
                        role: "assistant",
                        content: None,
                        name: None,
                        tool_calls: Some(vec![WireToolCall {
                            id,
                            kind: "function".to_string(),
                            function: WireFunction {
                                name: call.tool_name.clone(),
                                arguments: call.arguments_json().to_string(),
                            },
                        }]),
                        tool_call_id: None,
                    }
                }
                None => Self::plain("assistant", &message.content, message.name.as_deref()),
            },
            Role::Tool => Self {
                role: "tool",
                content: Some(message.content.clone()),
                name: None,
                tool_calls: None,
                tool_call_id: message
                    .tool_call_id
                    .clone()
                    .or_else(|| pending_call_id.take()),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: WireFunction,
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunction {
    name: String,
    /// JSON-encoded argument object
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// ==================== Mapping ====================

/// The API only accepts `[a-zA-Z0-9_-]` in message author names.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn parse_response(response: ChatCompletionResponse) -> Result<Generation, BackendError> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| BackendError::MalformedResponse("response has no choices".to_string()))?;

    // Only one capability runs per turn; extra requests are dropped.
    if let Some(wire) = message.tool_calls.into_iter().next() {
        return parse_tool_call(wire).map(Generation::ToolCall);
    }

    match message.content {
        Some(content) => Ok(Generation::text(content)),
        None => Err(BackendError::MalformedResponse(
            "response has neither content nor tool calls".to_string(),
        )),
    }
}

fn parse_tool_call(wire: WireToolCall) -> Result<ToolCall, BackendError> {
    let arguments = if wire.function.arguments.trim().is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_str::<Value>(&wire.function.arguments).map_err(|e| {
            BackendError::MalformedResponse(format!(
                "arguments for '{}' are not valid JSON: {}",
                wire.function.name, e
            ))
        })?
    };

    let Value::Object(map) = arguments else {
        return Err(BackendError::MalformedResponse(format!(
            "arguments for '{}' must be a JSON object",
            wire.function.name
        )));
    };

    Ok(map.into_iter().fold(
        ToolCall::new(wire.function.name).with_id(wire.id),
        |call, (key, value)| call.with_arg(key, value),
    ))
}

fn map_transport_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout
    } else if err.is_connect() {
        BackendError::Unavailable(err.to_string())
    } else {
        BackendError::RequestFailed(err.to_string())
    }
}

fn map_http_error(status: StatusCode, body: &str) -> BackendError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());
    let message = format!("HTTP {}: {}", status.as_u16(), message);

    match status {
        StatusCode::TOO_MANY_REQUESTS => BackendError::RateLimited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => BackendError::Timeout,
        s if s.is_server_error() => BackendError::Unavailable(message),
        _ => BackendError::RequestFailed(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::care;
    use crew_domain::participant::ParticipantId;
    use crew_domain::session::Requester;

    fn backend() -> OpenAiBackend {
        OpenAiBackend::new("https://api.example.com/v1/", "sk-test", "gpt-4o")
    }

    fn robot() -> Requester {
        Requester::Participant(ParticipantId::try_new("NavigationRobot").unwrap())
    }

    #[test]
    fn test_endpoint_trims_slash() {
        assert_eq!(
            backend().endpoint(),
            "https://api.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_with_tools_and_reflection() {
        let call = ToolCall::new(care::NAVIGATION_TOOL)
            .with_arg("ID", "80")
            .with_arg("room", "ER-12");
        let context = GenerationContext::new(robot(), "You navigate.")
            .with_message(ContextMessage::user("Guide HCW #80").with_name("Planning Agent"))
            .with_message(ContextMessage::tool_request(call))
            .with_message(ContextMessage::tool_result(None, "navigation_tool returned: {}"))
            .with_tools(vec![care::navigation_tool_definition()]);

        let json = serde_json::to_value(backend().build_request(&context)).unwrap();
        let messages = json["messages"].as_array().unwrap();

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["name"], "Planning_Agent");
        assert_eq!(messages[2]["tool_calls"][0]["id"], "call_1");
        assert_eq!(
            messages[2]["tool_calls"][0]["function"]["arguments"],
            r#"{"ID":"80","room":"ER-12"}"#
        );
        assert_eq!(messages[3]["role"], "tool");
        assert_eq!(messages[3]["tool_call_id"], "call_1");
        assert_eq!(json["tools"][0]["function"]["name"], "navigation_tool");
    }

    #[test]
    fn test_request_without_tools_omits_field() {
        let context = GenerationContext::new(Requester::Selector, "")
            .with_message(ContextMessage::user("Select an agent"));
        let json = serde_json::to_value(backend().build_request(&context)).unwrap();

        assert!(json.get("tools").is_none());
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_parse_text_response() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"1. NavigationRobot : go"}}]}"#,
        )
        .unwrap();
        let generation = parse_response(response).unwrap();
        assert_eq!(generation.as_text(), Some("1. NavigationRobot : go"));
    }

    #[test]
    fn test_parse_tool_call_response() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":null,"tool_calls":[
                {"id":"call_9","type":"function","function":{"name":"collection_tool","arguments":"{\"ID\":\"90\"}"}}
            ]}}]}"#,
        )
        .unwrap();
        let generation = parse_response(response).unwrap();
        let call = generation.as_tool_call().unwrap();
        assert_eq!(call.tool_name, "collection_tool");
        assert_eq!(call.id.as_deref(), Some("call_9"));
        assert_eq!(call.get_string("ID"), Some("90"));
    }

    #[test]
    fn test_parse_bad_arguments() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"tool_calls":[
                {"id":"c","function":{"name":"display_tool","arguments":"[1,2]"}}
            ]}}]}"#,
        )
        .unwrap();
        assert!(matches!(
            parse_response(response),
            Err(BackendError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_empty_choices() {
        let response = ChatCompletionResponse { choices: vec![] };
        assert!(matches!(
            parse_response(response),
            Err(BackendError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_map_http_error() {
        let body = r#"{"error":{"message":"Slow down"}}"#;
        assert_eq!(
            map_http_error(StatusCode::TOO_MANY_REQUESTS, body),
            BackendError::RateLimited("HTTP 429: Slow down".to_string())
        );
        assert!(matches!(
            map_http_error(StatusCode::BAD_GATEWAY, "upstream"),
            BackendError::Unavailable(_)
        ));
        assert!(matches!(
            map_http_error(StatusCode::UNAUTHORIZED, "nope"),
            BackendError::RequestFailed(_)
        ));
        assert_eq!(
            map_http_error(StatusCode::GATEWAY_TIMEOUT, ""),
            BackendError::Timeout
        );
    }
}
