/// LLM Client — the single point of entry for all chat-completion calls in ResumeFit.
///
/// ARCHITECTURAL RULE: No other module may call the provider API directly.
/// Callers depend on the `ChatCompletion` trait; `LlmClient` is the real backend.
///
/// Model: gpt-4.1-mini (hardcoded — do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

/// The model used for all LLM calls in ResumeFit.
pub const MODEL: &str = "gpt-4.1-mini";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned no completion content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

/// Token accounting. Only logged, so compatible providers may omit either count.
#[derive(Debug, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the content of the first completion choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// A chat-completion backend. `AppState` carries it as `Arc<dyn ChatCompletion>`
/// so handlers never construct a client per request.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Sends one system + user message pair and returns the first choice's raw text.
    async fn complete(&self, system: &str, prompt: &str, temperature: f32)
        -> Result<String, LlmError>;
}

/// The provider client shared by all handlers.
/// Wraps the OpenAI-compatible `/chat/completions` endpoint. No retries.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.llm_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_key: config.openai_api_key.clone(),
            endpoint: format!("{}/chat/completions", config.openai_base_url),
        })
    }

    /// Makes a raw call to the provider, returning the full response object.
    pub async fn call(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {status}");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: provider_error_message(body),
            });
        }

        let chat_response: ChatResponse = response.json().await?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat_response)
    }
}

#[async_trait]
impl ChatCompletion for LlmClient {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let response = self.call(system, prompt, temperature).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Pulls `error.message` out of a provider error body, falling back to the raw body.
fn provider_error_message(body: String) -> String {
    serde_json::from_str::<ProviderError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}



#[cfg(test)]
mod http_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::State,
        http::{header, HeaderMap, StatusCode},
        routing::post,
        Router,
    };
    use serde_json::Value;

    use super::*;

    /// A recorded provider call: the Authorization header and the JSON body.
    type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    #[derive(Clone)]
    struct StubProvider {
        status: StatusCode,
        body: &'static str,
        seen: Seen,
    }

    async fn stub_completions(
        State(stub): State<StubProvider>,
        headers: HeaderMap,
        body: String,
    ) -> (StatusCode, String) {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let json = serde_json::from_str(&body).unwrap_or(Value::Null);
        stub.seen.lock().unwrap().push((auth, json));
        (stub.status, stub.body.to_string())
    }

    /// Serves `body` with `status` on a local port; returns a client pointed at it.
    async fn client_against_stub(status: StatusCode, body: &'static str) -> (LlmClient, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/v1/chat/completions", post(stub_completions))
            .with_state(StubProvider {
                status,
                body,
                seen: seen.clone(),
            });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/v1", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = Config::from_lookup(move |key| match key {
            "OPENAI_BASE_URL" => Some(base_url.clone()),
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            _ => None,
        })
        .unwrap();

        (LlmClient::new(&config).unwrap(), seen)
    }

    const SUCCESS_BODY: &str = r#"{
        "choices": [{"index": 0, "message": {"role": "assistant", "content": "Score: 85..."}}],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5}
    }"#;

    #[tokio::test]
    async fn test_complete_posts_chat_request_with_bearer_key() {
        let (client, seen) = client_against_stub(StatusCode::OK, SUCCESS_BODY).await;

        let text = client
            .complete("You are an expert resume reviewer.", "the prompt", 0.7)
            .await
            .unwrap();
        assert_eq!(text, "Score: 85...");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (auth, body) = &seen[0];
        assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
        assert_eq!(body["model"], MODEL);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are an expert resume reviewer.");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "the prompt");
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_api_error_with_provider_message() {
        let (client, _) = client_against_stub(
            StatusCode::UNAUTHORIZED,
            r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#,
        )
        .await;

        let err = client.complete("sys", "prompt", 0.7).await.unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_is_not_retried() {
        let (client, seen) =
            client_against_stub(StatusCode::TOO_MANY_REQUESTS, "slow down").await;

        let err = client.complete("sys", "prompt", 0.7).await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 429, ref message } if message == "slow down"));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_an_error() {
        let (client, _) = client_against_stub(StatusCode::OK, "definitely not json").await;

        let err = client.complete("sys", "prompt", 0.7).await.unwrap_err();
        assert!(matches!(err, LlmError::Http(_)));
    }

    #[tokio::test]
    async fn test_empty_choices_is_empty_content() {
        let (client, _) = client_against_stub(StatusCode::OK, r#"{"choices": []}"#).await;

        let err = client.complete("sys", "prompt", 0.7).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }
}
