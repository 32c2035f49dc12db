//! Backend collaborator: the `DataSource` seam, typed requests, and their responses.
//!
//! A `DataSource` only moves JSON. Every typed endpoint the pages need is a
//! `Request` value; `Request::execute` turns it into a `Call`, sends it, and
//! decodes into the matching `Response` variant. Pages never see transport.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

pub mod http;
pub mod types;

#[cfg(test)]
pub mod fake;

use types::*;

#[derive(Debug, Error)]
pub enum BackendError {
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("HTTP {status} from {path}")]
  Status { status: u16, path: String },
  #[error("JSON decode failed: {0}")]
  Decode(String),
  #[error("chat provider error: {0}")]
  Provider(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
  Get,
  Post,
  Delete,
}

impl Method {
  pub fn as_str(self) -> &'static str {
    match self {
      Method::Get => "GET",
      Method::Post => "POST",
      Method::Delete => "DELETE",
    }
  }
}

/// One HTTP exchange, described without a client.
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
  pub method: Method,
  pub path: String,
  pub query: Vec<(&'static str, String)>,
  pub body: Option<Value>,
}

impl Call {
  pub fn get(path: impl Into<String>) -> Self {
    Self { method: Method::Get, path: path.into(), query: Vec::new(), body: None }
  }

  pub fn post(path: impl Into<String>, body: Option<Value>) -> Self {
    Self { method: Method::Post, path: path.into(), query: Vec::new(), body }
  }

  pub fn delete(path: impl Into<String>) -> Self {
    Self { method: Method::Delete, path: path.into(), query: Vec::new(), body: None }
  }

  pub fn param(mut self, key: &'static str, value: impl ToString) -> Self {
    self.query.push((key, value.to_string()));
    self
  }
}

/// The backend API as seen by the shell. Non-2xx statuses must come back as
/// `BackendError::Status`; an empty body decodes as `Value::Null`.
#[async_trait]
pub trait DataSource: Send + Sync {
  async fn send(&self, call: &Call) -> Result<Value, BackendError>;
}

async fn fetch<T: DeserializeOwned>(src: &dyn DataSource, call: &Call) -> Result<T, BackendError> {
  let v = src.send(call).await?;
  serde_json::from_value(v).map_err(|e| BackendError::Decode(format!("{} {}: {}", call.method.as_str(), call.path, e)))
}

fn to_body<T: serde::Serialize>(v: &T) -> Option<Value> {
  serde_json::to_value(v).ok()
}

/// Every backend operation a page can issue.
#[derive(Clone, Debug, PartialEq)]
pub enum Request {
  Dashboard,
  Recommendations,
  Errors { limit: u32 },
  Skills,
  LearningStats,
  Improvements,
  GenerateSimilar { error_id: i64 },
  Foundation,
  Vocabulary,
  AddWord(NewWord),
  DeleteWord { id: i64 },
  Weakness,
  Practice,
  QuestionCount { category: Option<String> },
  CreateSession(NewSession),
  SubmitAnswer { session_id: i64, answer: AnswerIn },
  CompleteSession { session_id: i64, time_spent: i64 },
}

#[derive(Debug)]
pub enum Response {
  Dashboard(Result<DashboardData, BackendError>),
  Recommendations(Result<Vec<Recommendation>, BackendError>),
  Errors(Result<Vec<ErrorRecord>, BackendError>),
  Skills(Result<SkillRadarData, BackendError>),
  LearningStats(Result<LearningStats, BackendError>),
  Improvements(Result<Vec<Improvement>, BackendError>),
  GenerateSimilar { error_id: i64, result: Result<SimilarQuestion, BackendError> },
  Foundation(Result<FoundationOverview, BackendError>),
  Vocabulary(Result<Vec<VocabularyEntry>, BackendError>),
  AddWord(Result<VocabularyEntry, BackendError>),
  DeleteWord { id: i64, result: Result<(), BackendError> },
  Weakness(Result<WeaknessOverview, BackendError>),
  Practice(Result<PracticeOverview, BackendError>),
  QuestionCount(Result<QuestionCount, BackendError>),
  CreateSession(Result<PracticeSession, BackendError>),
  SubmitAnswer(Result<AnswerVerdict, BackendError>),
  CompleteSession(Result<PracticeSession, BackendError>),
}

impl Request {
  /// Short name used in logs.
  pub fn label(&self) -> &'static str {
    match self {
      Request::Dashboard => "dashboard",
      Request::Recommendations => "recommendations",
      Request::Errors { .. } => "errors",
      Request::Skills => "skills",
      Request::LearningStats => "learning_stats",
      Request::Improvements => "improvements",
      Request::GenerateSimilar { .. } => "generate_similar",
      Request::Foundation => "foundation",
      Request::Vocabulary => "vocabulary",
      Request::AddWord(_) => "add_word",
      Request::DeleteWord { .. } => "delete_word",
      Request::Weakness => "weakness",
      Request::Practice => "practice",
      Request::QuestionCount { .. } => "question_count",
      Request::CreateSession(_) => "create_session",
      Request::SubmitAnswer { .. } => "submit_answer",
      Request::CompleteSession { .. } => "complete_session",
    }
  }

  pub fn call(&self) -> Call {
    match self {
      Request::Dashboard => Call::get("/api/ui/dashboard"),
      Request::Recommendations => Call::get("/api/analysis/recommendations"),
      Request::Errors { limit } => Call::get("/api/analysis/errors").param("limit", limit),
      Request::Skills => Call::get("/api/analysis/skills"),
      Request::LearningStats => Call::get("/api/analysis/stats"),
      Request::Improvements => Call::get("/api/analysis/improvements"),
      Request::GenerateSimilar { error_id } => {
        Call::post(format!("/api/analysis/errors/{error_id}/generate-similar"), None)
      }
      Request::Foundation => Call::get("/api/ui/foundation"),
      Request::Vocabulary => Call::get("/api/vocabulary"),
      Request::AddWord(w) => Call::post("/api/vocabulary", to_body(w)),
      Request::DeleteWord { id } => Call::delete(format!("/api/vocabulary/{id}")),
      Request::Weakness => Call::get("/api/ui/weakness"),
      Request::Practice => Call::get("/api/ui/practice"),
      Request::QuestionCount { category } => {
        let c = Call::get("/api/questions/count");
        match category {
          Some(cat) => c.param("category", cat),
          None => c,
        }
      }
      Request::CreateSession(s) => Call::post("/api/practice/sessions", to_body(s)),
      Request::SubmitAnswer { session_id, answer } => {
        Call::post(format!("/api/practice/sessions/{session_id}/submit"), to_body(answer))
      }
      Request::CompleteSession { session_id, time_spent } => {
        Call::post(format!("/api/practice/sessions/{session_id}/complete"), None).param("time_spent", time_spent)
      }
    }
  }

  /// Run against `src`. Never panics; every failure lands inside the response.
  #[instrument(level = "debug", skip(self, src), fields(request = self.label()))]
  pub async fn execute(self, src: &dyn DataSource) -> Response {
    let call = self.call();
    match self {
      Request::Dashboard => Response::Dashboard(fetch(src, &call).await),
      Request::Recommendations => Response::Recommendations(fetch(src, &call).await),
      Request::Errors { .. } => Response::Errors(fetch(src, &call).await),
      Request::Skills => Response::Skills(fetch(src, &call).await),
      Request::LearningStats => Response::LearningStats(fetch(src, &call).await),
      Request::Improvements => Response::Improvements(fetch(src, &call).await),
      Request::GenerateSimilar { error_id } => Response::GenerateSimilar { error_id, result: fetch(src, &call).await },
      Request::Foundation => Response::Foundation(fetch(src, &call).await),
      Request::Vocabulary => Response::Vocabulary(fetch(src, &call).await),
      Request::AddWord(_) => Response::AddWord(fetch(src, &call).await),
      Request::DeleteWord { id } => Response::DeleteWord { id, result: src.send(&call).await.map(|_| ()) },
      Request::Weakness => Response::Weakness(fetch(src, &call).await),
      Request::Practice => Response::Practice(fetch(src, &call).await),
      Request::QuestionCount { .. } => Response::QuestionCount(fetch(src, &call).await),
      Request::CreateSession(_) => Response::CreateSession(fetch(src, &call).await),
      Request::SubmitAnswer { .. } => Response::SubmitAnswer(fetch(src, &call).await),
      Request::CompleteSession { .. } => Response::CompleteSession(fetch(src, &call).await),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::fake::{FakeSource, Reply};
  use super::*;
  use serde_json::json;

  #[test]
  fn calls_carry_paths_queries_and_bodies() {
    let c = Request::Errors { limit: 10 }.call();
    assert_eq!(c.method, Method::Get);
    assert_eq!(c.path, "/api/analysis/errors");
    assert_eq!(c.query, vec![("limit", "10".to_string())]);

    let c = Request::GenerateSimilar { error_id: 7 }.call();
    assert_eq!(c.method, Method::Post);
    assert_eq!(c.path, "/api/analysis/errors/7/generate-similar");

    let c = Request::SubmitAnswer {
      session_id: 3,
      answer: AnswerIn { question_id: 4, user_answer: "NOT GIVEN".into() },
    }
    .call();
    assert_eq!(c.body, Some(json!({"question_id": 4, "user_answer": "NOT GIVEN"})));

    let c = Request::QuestionCount { category: None }.call();
    assert!(c.query.is_empty());
  }

  #[tokio::test]
  async fn execute_decodes_partial_payloads() {
    let src = FakeSource::new().route("GET /api/ui/foundation", Reply::json(json!({"review_count": 7})));
    match Request::Foundation.execute(&src).await {
      Response::Foundation(Ok(f)) => {
        assert_eq!(f.review_count, Some(7));
        assert!(f.memory_curve.is_empty());
      }
      other => panic!("unexpected: {other:?}"),
    }
  }

  #[tokio::test]
  async fn execute_reports_shape_mismatch_as_decode_error() {
    let src = FakeSource::new().route("GET /api/analysis/errors", Reply::json(json!({"oops": true})));
    match (Request::Errors { limit: 10 }).execute(&src).await {
      Response::Errors(Err(BackendError::Decode(msg))) => assert!(msg.contains("/api/analysis/errors")),
      other => panic!("unexpected: {other:?}"),
    }
  }

  #[tokio::test]
  async fn execute_keeps_error_id_on_failure() {
    let src = FakeSource::new().route("POST /api/analysis/errors/7/generate-similar", Reply::Status(500));
    match (Request::GenerateSimilar { error_id: 7 }).execute(&src).await {
      Response::GenerateSimilar { error_id, result: Err(BackendError::Status { status, .. }) } => {
        assert_eq!(error_id, 7);
        assert_eq!(status, 500);
      }
      other => panic!("unexpected: {other:?}"),
    }
  }
}
