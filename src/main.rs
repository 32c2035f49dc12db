//! Lumina · IELTS preparation client shell
//!
//! - Navigation between pages with stale-response suppression
//! - Per-page resilient loading: fallback content, live upgrade, one warning per failure
//! - AI tutor chat via the backend, or directly via an OpenAI-compatible API
//! - Headless JSON-lines driver on stdin/stdout (logs go to stderr)
//!
//! Important env variables:
//!   LUMINA_API_BASE_URL         : backend base URL (default "http://localhost:8000")
//!   LUMINA_REQUEST_TIMEOUT_SECS : per-request timeout in seconds (default 15)
//!   LUMINA_CONFIG_PATH          : path to TOML config (tutor prompt, per-page load modes)
//!   OPENAI_API_KEY              : enables direct LLM chat if present
//!   OPENAI_BASE_URL             : default "https://api.openai.com/v1"
//!   OPENAI_MODEL                : default "gpt-4o-mini"
//!   LOG_LEVEL                   : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT                  : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod seeds;
mod settings;
mod backend;
mod loader;
mod pages;
mod nav;
mod tutor;
mod llm;
mod app;
mod runtime;
mod protocol;
mod driver;

use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, warn};

use crate::app::App;
use crate::backend::http::HttpBackend;
use crate::backend::DataSource;
use crate::config::AppConfig;
use crate::llm::OpenAiTutor;
use crate::runtime::Runtime;
use crate::tutor::{BackendChat, ChatProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let config = AppConfig::from_env();
  info!(target: "lumina", base_url = %config.api_base_url, timeout = ?config.request_timeout, "Backend configured");

  let source: Arc<dyn DataSource> = Arc::new(HttpBackend::new(&config.api_base_url, config.request_timeout)?);

  // Direct LLM when a key is configured; otherwise proxy through the backend.
  let chat: Arc<dyn ChatProvider> = match &config.llm {
    Some(llm) => match OpenAiTutor::new(llm, &config.tutor.system_prompt, config.request_timeout) {
      Ok(t) => {
        info!(target: "lumina", model = %llm.model, "Tutor uses direct LLM");
        Arc::new(t)
      }
      Err(e) => {
        warn!(target: "lumina", error = %e, "LLM client init failed; tutor uses backend chat");
        Arc::new(BackendChat::new(source.clone()))
      }
    },
    None => Arc::new(BackendChat::new(source.clone())),
  };

  let mut runtime = Runtime::new(App::new(&config), source, chat);
  driver::run(&mut runtime, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
  Ok(())
}
