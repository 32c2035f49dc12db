//! AI tutor widget: an append-only chat log with a single in-flight send.
//!
//! The widget never talks to the network itself. `Tutor::send` decides
//! whether a request should go out; the runtime runs it through a
//! `ChatProvider` and hands the outcome back to `Tutor::receive`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::backend::types::{ChatIn, ChatOut};
use crate::backend::{BackendError, Call, DataSource};
use crate::domain::{ChatMessage, ChatRole};
use crate::util::non_blank;

pub const EMPTY_REPLY: &str = "Sorry, I could not come up with an answer just now.";

/// Anything that turns one user message into one assistant reply.
#[async_trait]
pub trait ChatProvider: Send + Sync {
  async fn reply(&self, message: &str) -> Result<String, BackendError>;
}

/// Proxies through the backend's `/api/chat`; the backend keeps any session.
pub struct BackendChat {
  source: Arc<dyn DataSource>,
}

impl BackendChat {
  pub fn new(source: Arc<dyn DataSource>) -> Self {
    Self { source }
  }
}

#[async_trait]
impl ChatProvider for BackendChat {
  #[instrument(level = "info", skip(self, message), fields(len = message.len()))]
  async fn reply(&self, message: &str) -> Result<String, BackendError> {
    let body = serde_json::to_value(ChatIn { message: message.to_string() }).ok();
    let call = Call::post("/api/chat", body);
    let v = self.source.send(&call).await?;
    let out: ChatOut = serde_json::from_value(v).map_err(|e| BackendError::Decode(e.to_string()))?;
    Ok(out.response)
  }
}

#[derive(Clone, Debug, Serialize)]
pub struct Tutor {
  log: Vec<ChatMessage>,
  in_flight: bool,
  open: bool,
  expanded: bool,
}

impl Tutor {
  pub fn new(greeting: &str) -> Self {
    Self {
      log: vec![ChatMessage::new(ChatRole::Assistant, greeting)],
      in_flight: false,
      open: false,
      expanded: false,
    }
  }

  #[cfg(test)]
  pub fn log(&self) -> &[ChatMessage] {
    &self.log
  }

  pub fn in_flight(&self) -> bool {
    self.in_flight
  }

  /// Accept a user message. Returns the text to send, or `None` when the
  /// text is blank or a previous send has not come back yet.
  pub fn send(&mut self, text: &str) -> Option<String> {
    if self.in_flight {
      return None;
    }
    let text = non_blank(text)?.to_string();
    self.log.push(ChatMessage::new(ChatRole::User, text.clone()));
    self.in_flight = true;
    Some(text)
  }

  pub fn receive(&mut self, result: Result<String, BackendError>) {
    match result {
      Ok(reply) => {
        let text = non_blank(&reply).unwrap_or(EMPTY_REPLY).to_string();
        info!(target: "tutor", len = text.len(), "Assistant replied");
        self.log.push(ChatMessage::new(ChatRole::Assistant, text));
      }
      Err(e) => {
        error!(target: "tutor", error = %e, "Chat request failed");
      }
    }
    self.in_flight = false;
  }

  pub fn toggle_open(&mut self) {
    self.open = !self.open;
  }

  pub fn toggle_expanded(&mut self) {
    self.expanded = !self.expanded;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::fake::{FakeSource, Reply};
  use serde_json::json;

  #[test]
  fn starts_with_greeting() {
    let t = Tutor::new("hi there");
    assert_eq!(t.log().len(), 1);
    assert_eq!(t.log()[0].role, ChatRole::Assistant);
    assert_eq!(t.log()[0].text, "hi there");
  }

  #[test]
  fn blank_and_reentrant_sends_are_refused() {
    let mut t = Tutor::new("hi");
    assert_eq!(t.send("   "), None);
    assert_eq!(t.send(" how? "), Some("how?".to_string()));
    assert!(t.in_flight());
    assert_eq!(t.send("again"), None);
    assert_eq!(t.log().len(), 2);
  }

  #[test]
  fn failure_appends_nothing_but_clears_in_flight() {
    let mut t = Tutor::new("hi");
    t.send("q").unwrap();
    t.receive(Err(BackendError::Status { status: 502, path: "/api/chat".into() }));
    assert!(!t.in_flight());
    assert_eq!(t.log().len(), 2);
    assert_eq!(t.log()[1].role, ChatRole::User);
  }

  #[test]
  fn empty_reply_becomes_placeholder() {
    let mut t = Tutor::new("hi");
    t.send("q").unwrap();
    t.receive(Ok("  ".into()));
    assert_eq!(t.log().last().unwrap().text, EMPTY_REPLY);
  }

  #[tokio::test]
  async fn backend_chat_posts_message_and_reads_response() {
    let src = Arc::new(FakeSource::new().route("POST /api/chat", Reply::json(json!({"response": "Use 'study'."}))));
    let chat = BackendChat::new(src.clone());
    assert_eq!(chat.reply("which verb?").await.unwrap(), "Use 'study'.");
    assert_eq!(src.count("POST /api/chat"), 1);
  }
}
