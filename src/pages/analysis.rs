//! Error analysis: the error log with a detail panel, skill radar, time and
//! accuracy stats, improvement suggestions, and "generate similar question".
//!
//! Four requests go out together on mount; `time` and `accuracy` both come
//! from the stats request but merge independently.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{unexpected, Intent, Rendered};
use crate::backend::types::{AccuracyStat, ErrorRecord, Improvement, SkillScore, TimeStat};
use crate::backend::{Request, Response};
use crate::domain::{LoadMode, View};
use crate::loader::{report_failure, ActionSlot, Collection};
use crate::seeds;
use crate::util::non_blank;

pub const ERROR_LIMIT: u32 = 10;
pub const GENERATION_EMPTY: &str = "Generation failed, please retry.";
pub const GENERATION_FAILED: &str = "Generation failed. Make sure the backend service is running.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisTab {
  #[default]
  Diagnosis,
  Stats,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkillAxis {
  pub subject: String,
  pub value: i64,
  pub full_mark: i64,
}

impl From<&SkillScore> for SkillAxis {
  fn from(s: &SkillScore) -> Self {
    Self { subject: format!("{} ({})", s.name_cn, s.name), value: s.score, full_mark: s.full_mark }
  }
}

#[derive(Debug)]
pub struct AnalysisPage {
  mode: LoadMode,
  tab: AnalysisTab,
  errors: Collection<Vec<ErrorRecord>>,
  selected: Option<i64>,
  skills: Collection<Vec<SkillScore>>,
  time: Collection<Vec<TimeStat>>,
  accuracy: Collection<Vec<AccuracyStat>>,
  improvements: Collection<Vec<Improvement>>,
  similar: ActionSlot<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AnalysisView {
  pub tab: AnalysisTab,
  pub errors: Vec<ErrorRecord>,
  pub selected: Option<ErrorRecord>,
  pub skills: Vec<SkillAxis>,
  pub time_stats: Vec<TimeStat>,
  pub accuracy_stats: Vec<AccuracyStat>,
  pub improvements: Vec<Improvement>,
  pub similar: ActionSlot<String>,
  pub can_generate: bool,
}

impl AnalysisPage {
  pub fn mount(mode: LoadMode) -> (Self, Vec<Request>) {
    let page = Self {
      mode,
      tab: AnalysisTab::default(),
      errors: Collection::non_empty("errors", seeds::error_records()),
      selected: None,
      skills: Collection::non_empty("skills", seeds::skill_scores()),
      time: Collection::non_empty("time_stats", seeds::time_stats()),
      accuracy: Collection::non_empty("accuracy_stats", seeds::accuracy_stats()),
      improvements: Collection::non_empty("improvements", seeds::improvements()),
      similar: ActionSlot::default(),
    };
    let reqs = vec![
      Request::Errors { limit: ERROR_LIMIT },
      Request::Skills,
      Request::LearningStats,
      Request::Improvements,
    ];
    (page, reqs)
  }

  pub fn apply(&mut self, response: Response) {
    match response {
      Response::Errors(result) => {
        match result {
          Ok(list) => {
            self.errors.settle(Some(list));
          }
          Err(e) => {
            report_failure(View::Analysis, "errors", &e);
            self.errors.fail();
          }
        }
        // Whichever list is active now, start from its first entry.
        self.selected = self.errors.current().first().map(|r| r.id);
      }
      Response::Skills(Ok(data)) => {
        self.skills.settle(Some(data.skills));
      }
      Response::Skills(Err(e)) => {
        report_failure(View::Analysis, "skills", &e);
        self.skills.fail();
      }
      Response::LearningStats(Ok(stats)) => {
        self.time.settle(Some(stats.time_stats));
        self.accuracy.settle(Some(stats.accuracy_stats));
      }
      Response::LearningStats(Err(e)) => {
        report_failure(View::Analysis, "learning_stats", &e);
        self.time.fail();
        self.accuracy.fail();
      }
      Response::Improvements(Ok(list)) => {
        self.improvements.settle(Some(list));
      }
      Response::Improvements(Err(e)) => {
        report_failure(View::Analysis, "improvements", &e);
        self.improvements.fail();
      }
      Response::GenerateSimilar { error_id, .. } if self.selected_error().map(|r| r.id) != Some(error_id) => {
        debug!(target: "lumina", error_id, "Similar question for an error no longer selected; dropped");
        self.similar.abandon();
      }
      Response::GenerateSimilar { error_id, result } => match result {
        Ok(q) => {
          let text = q.similar_question.as_deref().and_then(non_blank).map(str::to_string);
          info!(target: "lumina", error_id, generated = text.is_some(), "Similar question generated");
          self.similar.succeed(text.unwrap_or_else(|| GENERATION_EMPTY.to_string()));
        }
        Err(e) => {
          warn!(target: "lumina", error_id, error = %e, "Generate similar failed");
          self.similar.fail(GENERATION_FAILED);
        }
      },
      other => unexpected(View::Analysis, &other),
    }
  }

  pub fn handle(&mut self, intent: Intent) -> Result<Vec<Request>, Intent> {
    match intent {
      Intent::AnalysisTab { tab } => {
        self.tab = tab;
        Ok(Vec::new())
      }
      Intent::SelectError { id } => {
        self.select(id);
        Ok(Vec::new())
      }
      Intent::GenerateSimilar => Ok(self.generate_similar().into_iter().collect()),
      other => Err(other),
    }
  }

  /// Local only. Unknown ids leave the selection as it was.
  pub fn select(&mut self, id: i64) {
    if self.selected == Some(id) || !self.errors.current().iter().any(|r| r.id == id) {
      return;
    }
    self.selected = Some(id);
    self.similar.clear();
  }

  pub fn selected_error(&self) -> Option<&ErrorRecord> {
    let list = self.errors.current();
    self.selected
      .and_then(|id| list.iter().find(|r| r.id == id))
      .or_else(|| list.first())
  }

  fn generate_similar(&mut self) -> Option<Request> {
    let error_id = self.selected_error()?.id;
    if !self.similar.begin() {
      return None;
    }
    Some(Request::GenerateSimilar { error_id })
  }

  fn pending(&self) -> bool {
    self.errors.is_pending()
      || self.skills.is_pending()
      || self.time.is_pending()
      || self.accuracy.is_pending()
      || self.improvements.is_pending()
  }

  pub fn render(&self) -> Rendered<AnalysisView> {
    Rendered::present(self.mode, self.pending(), || AnalysisView {
      tab: self.tab,
      errors: self.errors.current().clone(),
      selected: self.selected_error().cloned(),
      skills: self.skills.current().iter().map(SkillAxis::from).collect(),
      time_stats: self.time.current().clone(),
      accuracy_stats: self.accuracy.current().clone(),
      improvements: self.improvements.current().clone(),
      similar: self.similar.clone(),
      can_generate: !self.similar.in_flight() && self.selected_error().is_some(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::fake::{FakeSource, Reply};
  use crate::backend::types::SimilarQuestion;
  use crate::backend::BackendError;
  use crate::loader::Outcome;
  use serde_json::json;

  fn record(id: i64) -> ErrorRecord {
    ErrorRecord { id, title: format!("error {id}"), ..seeds::error_records().remove(0) }
  }

  fn loaded(errors: Vec<ErrorRecord>) -> AnalysisPage {
    let (mut page, _) = AnalysisPage::mount(LoadMode::BlockOnLoad);
    page.apply(Response::Errors(Ok(errors)));
    page.apply(Response::Skills(Ok(Default::default())));
    page.apply(Response::LearningStats(Ok(Default::default())));
    page.apply(Response::Improvements(Ok(vec![])));
    page
  }

  #[test]
  fn blocks_until_every_collection_settles() {
    let (mut page, reqs) = AnalysisPage::mount(LoadMode::BlockOnLoad);
    assert_eq!(reqs.len(), 4);
    assert!(page.render().loading);
    page.apply(Response::Errors(Ok(vec![])));
    page.apply(Response::Skills(Ok(Default::default())));
    page.apply(Response::LearningStats(Err(BackendError::Status { status: 500, path: "/api/analysis/stats".into() })));
    assert!(page.render().loading);
    page.apply(Response::Improvements(Ok(vec![])));
    let r = page.render();
    assert!(!r.loading);
    let v = r.body.unwrap();
    assert_eq!(v.time_stats, seeds::time_stats());
    assert_eq!(v.errors, seeds::error_records());
  }

  #[test]
  fn selection_defaults_to_first_live_entry_and_is_local() {
    let mut page = loaded(vec![record(3), record(5)]);
    assert_eq!(page.selected_error().map(|r| r.id), Some(3));
    assert!(page.handle(Intent::SelectError { id: 5 }).unwrap().is_empty());
    assert_eq!(page.selected_error().map(|r| r.id), Some(5));
    page.select(99);
    assert_eq!(page.selected_error().map(|r| r.id), Some(5));
  }

  #[test]
  fn selection_falls_back_to_fallback_first_entry() {
    let page = loaded(vec![]);
    assert_eq!(page.selected_error().map(|r| r.id), Some(1));
  }

  #[test]
  fn generate_is_guarded_while_in_flight() {
    let mut page = loaded(vec![record(7)]);
    let first = page.handle(Intent::GenerateSimilar).unwrap();
    assert_eq!(first, vec![Request::GenerateSimilar { error_id: 7 }]);
    assert!(page.handle(Intent::GenerateSimilar).unwrap().is_empty());
    assert!(!page.render().body.unwrap().can_generate);
  }

  #[test]
  fn blank_generation_shows_retry_text() {
    let mut page = loaded(vec![record(7)]);
    page.handle(Intent::GenerateSimilar).unwrap();
    page.apply(Response::GenerateSimilar { error_id: 7, result: Ok(Default::default()) });
    assert_eq!(page.similar.outcome(), Some(&Outcome::Done(GENERATION_EMPTY.to_string())));
  }

  #[test]
  fn similar_question_for_a_deselected_error_is_not_shown() {
    let mut page = loaded(vec![record(7), record(8)]);
    page.handle(Intent::GenerateSimilar).unwrap();
    page.handle(Intent::SelectError { id: 8 }).unwrap();
    assert!(page.similar.in_flight());

    page.apply(Response::GenerateSimilar {
      error_id: 7,
      result: Ok(SimilarQuestion { similar_question: Some("About error 7".into()) }),
    });
    let v = page.render().body.unwrap();
    assert_eq!(v.selected.map(|r| r.id), Some(8));
    assert_eq!(v.similar.outcome(), None);
    assert!(v.can_generate);
    assert_eq!(page.handle(Intent::GenerateSimilar).unwrap(), vec![Request::GenerateSimilar { error_id: 8 }]);
  }

  #[tokio::test]
  async fn analysis_with_partially_empty_payload() {
    let src = FakeSource::new()
      .route("GET /api/analysis/errors", Reply::json(json!([])))
      .route(
        "GET /api/analysis/skills",
        Reply::json(json!({"skills": [{"name": "Vocab", "name_cn": "词汇", "score": 100, "full_mark": 150}]})),
      )
      .route("GET /api/analysis/stats", Reply::json(json!({"time_stats": [], "accuracy_stats": []})))
      .route("GET /api/analysis/improvements", Reply::json(json!([])));

    let (mut page, reqs) = AnalysisPage::mount(LoadMode::BlockOnLoad);
    for r in reqs {
      page.apply(r.execute(&src).await);
    }

    let v = page.render().body.expect("settled");
    assert_eq!(v.skills, vec![SkillAxis { subject: "词汇 (Vocab)".into(), value: 100, full_mark: 150 }]);
    assert_eq!(v.time_stats, seeds::time_stats());
    assert_eq!(v.accuracy_stats, seeds::accuracy_stats());
  }

  #[tokio::test]
  async fn generate_similar_against_server_error() {
    let src = FakeSource::new().route("POST /api/analysis/errors/7/generate-similar", Reply::Status(500));
    let mut page = loaded(vec![record(7)]);

    let reqs = page.handle(Intent::GenerateSimilar).unwrap();
    assert_eq!(reqs.len(), 1);
    for r in reqs {
      page.apply(r.execute(&src).await);
    }

    let v = page.render().body.unwrap();
    assert_eq!(v.similar.outcome(), Some(&Outcome::Failed(GENERATION_FAILED.to_string())));
    assert!(!v.similar.in_flight());
    assert!(v.can_generate);
    assert_eq!(src.count("POST /api/analysis/errors/7/generate-similar"), 1);
  }
}
