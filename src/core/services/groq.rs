//! Lyrics interpretation through the Groq chat completions API.
//!
//! The model is offered exactly one tool, `interpret_lyrics`, and the
//! interpretation is read from the arguments of its first tool call. A model
//! that answers in free text instead produces no interpretation at all.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{InterpretationError, Result, VerseenError};

pub const INTERPRET_TOOL_NAME: &str = "interpret_lyrics";

/// Cap on generated tokens per interpretation
pub const MAX_TOKENS: u32 = 500;

pub const SYSTEM_PROMPT: &str = "\
- Interpret the song lyrics provided by the user.
- If the artist is given, take it into account.
- Respond only by calling the interpret_lyrics tool.
- Keep the interpretation within 500 tokens.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    pub interpretation: String,
}

#[async_trait]
pub trait Interpreter: Send + Sync {
    /// `Ok(None)` when the model chose not to call the tool.
    async fn interpret(
        &self,
        lyrics: &str,
        artist: Option<&str>,
    ) -> std::result::Result<Option<Interpretation>, InterpretationError>;
}

pub struct GroqClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GroqClient {
    /// Fails with a configuration error when `GROQ_API_KEY` is not set.
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.require_groq_api_key()?.to_string();

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| VerseenError::Internal(e.into()))?;

        Ok(Self {
            client,
            base_url: config.groq_api_url.trim_end_matches('/').to_string(),
            model: config.groq_model.clone(),
            api_key,
        })
    }

    fn build_request(&self, lyrics: &str, artist: Option<&str>) -> ChatRequest {
        let user_content = match artist {
            Some(artist) => format!("Artist: {}\n\n{}", artist, lyrics),
            None => lyrics.to_string(),
        };

        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_content,
                },
            ],
            tools: vec![interpret_tool()],
            tool_choice: "auto",
            max_tokens: MAX_TOKENS,
        }
    }
}

#[async_trait]
impl Interpreter for GroqClient {
    async fn interpret(
        &self,
        lyrics: &str,
        artist: Option<&str>,
    ) -> std::result::Result<Option<Interpretation>, InterpretationError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = self.build_request(lyrics, artist);

        info!(model = %self.model, "Requesting lyrics interpretation");

        let response = self.client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(InterpretationError::from_request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Groq API returned {}: {}", status, body);
            return Err(InterpretationError::InterpretationServiceError {
                status: Some(status.as_u16()),
                reason: if body.trim().is_empty() {
                    status.to_string()
                } else {
                    body
                },
            });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            InterpretationError::InterpretationServiceError {
                status: Some(status.as_u16()),
                reason: format!("unreadable completion response: {}", e),
            }
        })?;

        extract_interpretation(chat)
    }
}

fn interpret_tool() -> ToolDefinition {
    ToolDefinition {
        tool_type: "function",
        function: FunctionDefinition {
            name: INTERPRET_TOOL_NAME,
            description: "Interpret the song lyrics provided by the user.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "interpretation": {
                        "type": "string",
                        "description": "The interpretation of the song lyrics."
                    }
                },
                "required": ["interpretation"]
            }),
        },
    }
}

/// Arguments of the first tool call of the first choice, if there is one.
fn extract_interpretation(
    response: ChatResponse,
) -> std::result::Result<Option<Interpretation>, InterpretationError> {
    let Some(tool_call) = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.tool_calls)
        .and_then(|calls| calls.into_iter().next())
    else {
        debug!("Model answered without calling {}", INTERPRET_TOOL_NAME);
        return Ok(None);
    };

    let interpretation: Interpretation = serde_json::from_str(&tool_call.function.arguments)
        .map_err(InterpretationError::MalformedToolResponse)?;

    Ok(Some(interpretation))
}

// Groq API types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    tools: Vec<ToolDefinition>,
    tool_choice: &'static str,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ToolDefinition {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: FunctionDefinition,
}

#[derive(Debug, Serialize)]
struct FunctionDefinition {
    name: &'static str,
    description: &'static str,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    arguments: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::error::ConfigError;
    use crate::test_support::spawn_mock;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    const HONEY: &str = "Honey just put your sweet lips on my lips";
    const PARTNER_PAST: &str = "A song about accepting a partner without judging their past.";

    #[derive(Clone, Default)]
    struct Captured {
        body: Arc<Mutex<Option<Value>>>,
        authorization: Arc<Mutex<Option<String>>>,
    }

    fn tool_call_response(arguments: &str) -> Value {
        json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "interpret_lyrics", "arguments": arguments}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        })
    }

    async fn spawn_groq(status: StatusCode, reply: Value) -> (String, Captured) {
        let captured = Captured::default();
        let app = Router::new()
            .route(
                "/chat/completions",
                post(
                    move |State(captured): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            *captured.body.lock().unwrap() = Some(body);
                            *captured.authorization.lock().unwrap() = headers
                                .get("authorization")
                                .and_then(|v| v.to_str().ok())
                                .map(str::to_string);
                            (status, Json(reply)).into_response()
                        }
                    },
                ),
            )
            .with_state(captured.clone());

        (spawn_mock(app).await, captured)
    }

    fn client_for(base_url: &str) -> GroqClient {
        let config = ConfigBuilder::new()
            .groq_api_url(base_url)
            .unwrap()
            .groq_api_key(Some("gsk_test"))
            .build()
            .unwrap();
        GroqClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_interpret_returns_tool_arguments() {
        let arguments = json!({ "interpretation": PARTNER_PAST }).to_string();
        let (base_url, captured) = spawn_groq(StatusCode::OK, tool_call_response(&arguments)).await;

        let result = client_for(&base_url).interpret(HONEY, None).await.unwrap();
        assert_eq!(result.unwrap().interpretation, PARTNER_PAST);

        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(body["model"], "deepseek-r1-distill-llama-70b");
        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["tools"].as_array().unwrap().len(), 1);
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "interpret_lyrics");
        assert_eq!(
            body["tools"][0]["function"]["parameters"]["required"],
            json!(["interpretation"])
        );
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], HONEY);

        assert_eq!(
            captured.authorization.lock().unwrap().as_deref(),
            Some("Bearer gsk_test")
        );
    }

    #[tokio::test]
    async fn test_interpret_includes_artist() {
        let arguments = json!({ "interpretation": PARTNER_PAST }).to_string();
        let (base_url, captured) = spawn_groq(StatusCode::OK, tool_call_response(&arguments)).await;

        client_for(&base_url)
            .interpret(HONEY, Some("Vance Joy"))
            .await
            .unwrap();

        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(
            body["messages"][1]["content"],
            format!("Artist: Vance Joy\n\n{}", HONEY)
        );
    }

    #[tokio::test]
    async fn test_interpret_without_tool_call() {
        let reply = json!({
            "choices": [{
                "message": {"role": "assistant", "content": "I'd rather not.", "tool_calls": []},
                "finish_reason": "stop"
            }]
        });
        let (base_url, _) = spawn_groq(StatusCode::OK, reply).await;

        let result = client_for(&base_url).interpret(HONEY, None).await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_interpret_malformed_arguments() {
        let (base_url, _) =
            spawn_groq(StatusCode::OK, tool_call_response("{\"meaning\": 42}")).await;

        let err = client_for(&base_url).interpret(HONEY, None).await.unwrap_err();
        assert!(matches!(err, InterpretationError::MalformedToolResponse(_)));
    }

    #[tokio::test]
    async fn test_interpret_service_error() {
        let reply = json!({"error": {"message": "Invalid API Key", "type": "invalid_request_error"}});
        let (base_url, _) = spawn_groq(StatusCode::UNAUTHORIZED, reply).await;

        let err = client_for(&base_url).interpret(HONEY, None).await.unwrap_err();
        match err {
            InterpretationError::InterpretationServiceError { status, reason } => {
                assert_eq!(status, Some(401));
                assert!(reason.contains("Invalid API Key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_interpret_times_out() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async {
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                Json(tool_call_response("{}"))
            }),
        );
        let base_url = spawn_mock(app).await;

        let config = ConfigBuilder::new()
            .groq_api_url(base_url)
            .unwrap()
            .request_timeout_seconds(1)
            .unwrap()
            .groq_api_key(Some("gsk_test"))
            .build()
            .unwrap();

        let err = GroqClient::new(&config)
            .unwrap()
            .interpret(HONEY, None)
            .await
            .unwrap_err();
        match err {
            InterpretationError::InterpretationServiceError { status, reason } => {
                assert_eq!(status, None);
                assert_eq!(reason, crate::error::REQUEST_TIMED_OUT);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extract_interpretation_edge_cases() {
        let empty: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert_eq!(extract_interpretation(empty).unwrap(), None);

        let null_calls: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "text", "tool_calls": null}}]
        }))
        .unwrap();
        assert_eq!(extract_interpretation(null_calls).unwrap(), None);

        let not_json: ChatResponse =
            serde_json::from_value(tool_call_response("interpretation: sad")).unwrap();
        assert!(matches!(
            extract_interpretation(not_json),
            Err(InterpretationError::MalformedToolResponse(_))
        ));
    }

    #[test]
    fn test_missing_key_fails_fast() {
        let config = ConfigBuilder::new().build().unwrap();
        assert!(matches!(
            GroqClient::new(&config),
            Err(VerseenError::Config(ConfigError::MissingField { ref field })) if field == "GROQ_API_KEY"
        ));
    }
}
