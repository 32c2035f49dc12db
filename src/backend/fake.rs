//! In-memory `DataSource` for tests: a route table plus a call log.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Semaphore;

use super::{BackendError, Call, DataSource};

#[derive(Clone, Debug)]
pub enum Reply {
  Json(Value),
  Status(u16),
}

impl Reply {
  pub fn json(v: Value) -> Self {
    Reply::Json(v)
  }
}

/// Routes are keyed by `"METHOD /path"` (query ignored). Unknown routes are 404.
#[derive(Default)]
pub struct FakeSource {
  routes: HashMap<String, Reply>,
  calls: Mutex<Vec<String>>,
  gate: Option<Arc<Semaphore>>,
}

impl FakeSource {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn route(mut self, key: &str, reply: Reply) -> Self {
    self.routes.insert(key.to_string(), reply);
    self
  }

  /// Hold every reply until the returned semaphore gets a permit per call.
  pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
    let gate = Arc::new(Semaphore::new(0));
    self.gate = Some(gate.clone());
    (self, gate)
  }

  pub fn count(&self, key: &str) -> usize {
    self.calls.lock().unwrap().iter().filter(|c| c.as_str() == key).count()
  }

  pub fn total_calls(&self) -> usize {
    self.calls.lock().unwrap().len()
  }
}

#[async_trait]
impl DataSource for FakeSource {
  async fn send(&self, call: &Call) -> Result<Value, BackendError> {
    let key = format!("{} {}", call.method.as_str(), call.path);
    self.calls.lock().unwrap().push(key.clone());
    if let Some(gate) = &self.gate {
      gate.acquire().await.expect("gate closed").forget();
    }
    match self.routes.get(&key) {
      Some(Reply::Json(v)) => Ok(v.clone()),
      Some(Reply::Status(status)) => Err(BackendError::Status { status: *status, path: call.path.clone() }),
      None => Err(BackendError::Status { status: 404, path: call.path.clone() }),
    }
  }
}
