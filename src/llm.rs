//! Direct LLM chat provider (OpenAI-compatible chat.completions).
//!
//! Used instead of the backend proxy when OPENAI_API_KEY is set. Keeps the
//! running conversation so each call carries the system prompt plus history.
//! Calls log model, latency and token usage, never message contents.
//!
//! NOTE: We never log the API key.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::backend::BackendError;
use crate::config::LlmConfig;
use crate::tutor::ChatProvider;
use crate::util::trunc_for_log;

pub struct OpenAiTutor {
  client: reqwest::Client,
  api_key: String,
  base_url: String,
  model: String,
  system_prompt: String,
  history: Mutex<Vec<ChatMessageReq>>,
}

impl OpenAiTutor {
  pub fn new(cfg: &LlmConfig, system_prompt: &str, timeout: Duration) -> Result<Self, BackendError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self {
      client,
      api_key: cfg.api_key.clone(),
      base_url: cfg.base_url.trim_end_matches('/').to_string(),
      model: cfg.model.clone(),
      system_prompt: system_prompt.to_string(),
      history: Mutex::new(Vec::new()),
    })
  }

  fn request_for(&self, history: &[ChatMessageReq], message: &str) -> ChatCompletionRequest {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessageReq { role: "system".into(), content: self.system_prompt.clone() });
    messages.extend(history.iter().cloned());
    messages.push(ChatMessageReq { role: "user".into(), content: message.into() });
    ChatCompletionRequest { model: self.model.clone(), messages, temperature: 0.7 }
  }
}

#[async_trait]
impl ChatProvider for OpenAiTutor {
  #[instrument(level = "info", skip(self, message), fields(model = %self.model))]
  async fn reply(&self, message: &str) -> Result<String, BackendError> {
    // Held for the whole exchange so turns stay in order.
    let mut history = self.history.lock().await;
    let url = format!("{}/chat/completions", self.base_url);
    let req = self.request_for(&history, message);

    let start = Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "lumina-client/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_openai_error(&body).unwrap_or_else(|| trunc_for_log(&body, 200));
      return Err(BackendError::Provider(format!("HTTP {}: {}", status, msg)));
    }

    let body: ChatCompletionResponse = res.json().await?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, elapsed = ?start.elapsed(), "LLM usage");
    }
    let text = body.choices.first()
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default().trim().to_string();

    history.push(ChatMessageReq { role: "user".into(), content: message.into() });
    history.push(ChatMessageReq { role: "assistant".into(), content: text.clone() });
    Ok(text)
  }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
}
#[derive(Clone, Debug, PartialEq, Serialize)]
struct ChatMessageReq { role: String, content: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
}

/// Try to extract a clean error message from an OpenAI-style error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::{http::StatusCode, routing::post, Json, Router};
  use serde_json::{json, Value};
  use std::sync::Arc;

  async fn spawn_llm(seen: Arc<std::sync::Mutex<Vec<Value>>>) -> String {
    let app = Router::new()
      .route("/v1/chat/completions", post(move |Json(body): Json<Value>| {
        let seen = seen.clone();
        async move {
          let n = body["messages"].as_array().map(|m| m.len()).unwrap_or(0);
          seen.lock().unwrap().push(body);
          Json(json!({
            "choices": [{"message": {"content": format!(" reply {n} ")}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 2}
          }))
        }
      }))
      .route("/bad/chat/completions", post(|| async {
        (StatusCode::UNAUTHORIZED, Json(json!({"error": {"message": "invalid key"}})))
      }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
  }

  fn tutor(base_url: String) -> OpenAiTutor {
    let cfg = LlmConfig { api_key: "sk-test".into(), base_url, model: "m".into() };
    OpenAiTutor::new(&cfg, "be kind", Duration::from_secs(5)).unwrap()
  }

  #[tokio::test]
  async fn history_grows_with_each_turn() {
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let base = spawn_llm(seen.clone()).await;
    let t = tutor(format!("{base}/v1"));

    assert_eq!(t.reply("first").await.unwrap(), "reply 2");
    assert_eq!(t.reply("second").await.unwrap(), "reply 4");

    let seen = seen.lock().unwrap();
    assert_eq!(seen[1]["messages"][0]["content"], json!("be kind"));
    assert_eq!(seen[1]["messages"][1]["content"], json!("first"));
    assert_eq!(seen[1]["messages"][2]["role"], json!("assistant"));
  }

  #[tokio::test]
  async fn provider_error_message_is_extracted() {
    let base = spawn_llm(Arc::default()).await;
    let err = tutor(format!("{base}/bad")).reply("hi").await.unwrap_err();
    match err {
      BackendError::Provider(msg) => assert!(msg.contains("invalid key")),
      other => panic!("unexpected: {other:?}"),
    }
  }
}
