//! reqwest-backed `DataSource` talking to the real backend.
//!
//! One shared client with an explicit timeout; single attempt per call, no
//! retry. We log method, path, status and latency, never bodies beyond a short
//! truncated preview on failure.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde_json::Value;
use tracing::{debug, instrument};

use super::{BackendError, Call, DataSource, Method};
use crate::util::trunc_for_log;

#[derive(Clone)]
pub struct HttpBackend {
  pub client: reqwest::Client,
  pub base_url: String,
}

impl HttpBackend {
  pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
  }
}

#[async_trait]
impl DataSource for HttpBackend {
  #[instrument(level = "debug", skip(self, call), fields(method = call.method.as_str(), path = %call.path))]
  async fn send(&self, call: &Call) -> Result<Value, BackendError> {
    let url = format!("{}{}", self.base_url, call.path);
    let mut req = match call.method {
      Method::Get => self.client.get(&url),
      Method::Post => self.client.post(&url),
      Method::Delete => self.client.delete(&url),
    };
    req = req.header(USER_AGENT, "lumina-client/0.1").header(ACCEPT, "application/json");
    if !call.query.is_empty() {
      req = req.query(&call.query);
    }
    if let Some(body) = &call.body {
      req = req.json(body);
    }

    let start = Instant::now();
    let res = req.send().await?;
    let status = res.status();
    if !status.is_success() {
      let body = res.text().await.unwrap_or_default();
      debug!(target: "lumina", status = status.as_u16(), elapsed = ?start.elapsed(), body = %trunc_for_log(&body, 160), "Backend returned non-success");
      return Err(BackendError::Status { status: status.as_u16(), path: call.path.clone() });
    }

    let text = res.text().await?;
    debug!(target: "lumina", status = status.as_u16(), elapsed = ?start.elapsed(), bytes = text.len(), "Backend response received");
    if text.trim().is_empty() {
      return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| BackendError::Decode(e.to_string()))
  }
}
