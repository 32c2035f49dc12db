//! Configuration: environment variables first, then an optional TOML file,
//! then built-in defaults.
//!
//! Environment:
//!   LUMINA_API_BASE_URL         : backend base URL (default "http://localhost:8000")
//!   LUMINA_REQUEST_TIMEOUT_SECS : per-request timeout (default 15)
//!   LUMINA_CONFIG_PATH          : TOML file with [backend], [tutor], [pages]
//!   OPENAI_API_KEY              : enables direct LLM chat instead of the backend proxy
//!   OPENAI_BASE_URL             : default "https://api.openai.com/v1"
//!   OPENAI_MODEL                : default "gpt-4o-mini"

use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::LoadMode;
use crate::seeds::TUTOR_GREETING;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

const TUTOR_SYSTEM_PROMPT: &str = "You are Lumina, an expert IELTS preparation tutor. \
Help the student raise their IELTS band score. Talk with the student in Chinese, but keep \
English example sentences and corrections in English. Be professional, encouraging and warm, \
like a high-end personal coach. Focus on grammar, vocabulary and logical flow. Keep answers \
short unless the student asks for a detailed explanation.";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
  pub greeting: String,
  pub system_prompt: String,
}

impl Default for TutorConfig {
  fn default() -> Self {
    Self { greeting: TUTOR_GREETING.into(), system_prompt: TUTOR_SYSTEM_PROMPT.into() }
  }
}

/// Per-page choice between rendering fallback first and blocking on load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageModes {
  pub dashboard: LoadMode,
  pub analysis: LoadMode,
  pub foundation: LoadMode,
  pub weakness: LoadMode,
  pub practice: LoadMode,
}

impl Default for PageModes {
  fn default() -> Self {
    Self {
      dashboard: LoadMode::FallbackFirst,
      analysis: LoadMode::BlockOnLoad,
      foundation: LoadMode::FallbackFirst,
      weakness: LoadMode::FallbackFirst,
      practice: LoadMode::FallbackFirst,
    }
  }
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
  pub api_base_url: String,
  pub request_timeout: Duration,
  pub llm: Option<LlmConfig>,
  pub tutor: TutorConfig,
  pub pages: PageModes,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self::resolve(FileConfig::default(), |_| None)
  }
}

#[derive(Clone, Debug, Default, Deserialize)]
struct BackendFile {
  #[serde(default)] base_url: Option<String>,
  #[serde(default)] timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FileConfig {
  #[serde(default)] backend: BackendFile,
  #[serde(default)] tutor: TutorConfig,
  #[serde(default)] pages: PageModes,
}

impl AppConfig {
  pub fn from_env() -> Self {
    let file = load_file_config_from_env().unwrap_or_default();
    Self::resolve(file, |k| std::env::var(k).ok())
  }

  /// Merge env (via `env`) over the file over defaults.
  pub fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
    let env = |k: &str| env(k).filter(|v| !v.trim().is_empty());

    let api_base_url = env("LUMINA_API_BASE_URL")
      .or(file.backend.base_url)
      .unwrap_or_else(|| DEFAULT_API_BASE_URL.into());
    let timeout_secs = env("LUMINA_REQUEST_TIMEOUT_SECS")
      .and_then(|s| s.parse::<u64>().ok())
      .or(file.backend.timeout_secs)
      .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let llm = env("OPENAI_API_KEY").map(|api_key| LlmConfig {
      api_key,
      base_url: env("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_LLM_BASE_URL.into()),
      model: env("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.into()),
    });

    Self {
      api_base_url,
      request_timeout: Duration::from_secs(timeout_secs.max(1)),
      llm,
      tutor: file.tutor,
      pages: file.pages,
    }
  }
}

/// Attempt to load `FileConfig` from LUMINA_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_file_config_from_env() -> Option<FileConfig> {
  let path = std::env::var("LUMINA_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<FileConfig>(&s) {
      Ok(cfg) => {
        info!(target: "lumina", %path, "Loaded config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "lumina", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "lumina", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
