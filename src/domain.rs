//! Domain models shared by the shell: views, load modes, and chat messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which top-level page is mounted?
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
  #[default]
  Intro,
  Dashboard,
  Practice,
  Analysis,
  Settings,
  Foundation,
  Weakness,
}

impl View {
  #[cfg(test)]
  pub const ALL: [View; 7] = [
    View::Intro,
    View::Dashboard,
    View::Practice,
    View::Analysis,
    View::Settings,
    View::Foundation,
    View::Weakness,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      View::Intro => "intro",
      View::Dashboard => "dashboard",
      View::Practice => "practice",
      View::Analysis => "analysis",
      View::Settings => "settings",
      View::Foundation => "foundation",
      View::Weakness => "weakness",
    }
  }
}

impl std::fmt::Display for View {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// How a page presents itself before its remote data settles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
  /// Render fallback content immediately and upgrade silently.
  #[default]
  FallbackFirst,
  /// Show a loading indicator until every collection has settled.
  BlockOnLoad,
}

/// Who wrote a chat message?
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
  User,
  Assistant,
}

/// One entry in the tutor's append-only log.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
  pub id: String,
  pub role: ChatRole,
  pub text: String,
  pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
  pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      role,
      text: text.into(),
      timestamp: Utc::now(),
    }
  }
}
