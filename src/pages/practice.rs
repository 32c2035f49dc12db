//! Practice: module selection, the reading exam, and its review.
//!
//! Stage machine: `Selection -> Exam -> Review -> Selection`. Only the reading
//! module opens the exam. The verdict is always computed locally; when the
//! backend handed us a session, the answer is also submitted and leaving the
//! exam completes the session with the elapsed seconds.
//!
//! A new round only opens once every reply of the previous one has landed;
//! all three session replies share the mount ticket, so nothing else tells
//! them apart.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{unexpected, Intent, Rendered};
use crate::backend::types::{AiDrill, AnswerIn, AnswerVerdict, NewSession, PracticeModule, PracticeSession, ReadingExam};
use crate::backend::{Request, Response};
use crate::domain::{LoadMode, View};
use crate::loader::{report_failure, ActionSlot, Collection, Outcome};
use crate::seeds;

pub const UNDER_CONSTRUCTION: &str = "This module is under construction. Only Reading offers a full simulation right now.";
pub const SESSION_FAILED: &str = "Could not start a practice session. Answers are checked locally.";
pub const SUBMIT_FAILED: &str = "Could not submit the answer. Make sure the backend service is running.";
pub const COMPLETE_FAILED: &str = "Could not complete the session. Make sure the backend service is running.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
  #[default]
  Selection,
  Exam,
  Review,
}

#[derive(Debug)]
pub struct PracticePage {
  mode: LoadMode,
  stage: Stage,
  modules: Collection<Vec<PracticeModule>>,
  reading_exam: Collection<ReadingExam>,
  ai_drills: Collection<Vec<AiDrill>>,
  question_count: Collection<i64>,
  selected_answer: Option<String>,
  notice: Option<String>,
  started_at: Option<DateTime<Utc>>,
  submitted: bool,
  session: ActionSlot<PracticeSession>,
  submission: ActionSlot<AnswerVerdict>,
  completion: ActionSlot<PracticeSession>,
}

/// The exam as shown to the student; the key is revealed only in review.
#[derive(Clone, Debug, Serialize)]
pub struct ExamView {
  pub title: String,
  pub passage: String,
  pub question_id: i64,
  pub question: String,
  pub options: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub correct: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub analysis: Option<String>,
  pub keywords: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PracticeView {
  pub stage: Stage,
  pub modules: Vec<PracticeModule>,
  pub ai_drills: Vec<AiDrill>,
  pub question_count: i64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub exam: Option<ExamView>,
  pub selected_answer: Option<String>,
  pub is_correct: Option<bool>,
  pub notice: Option<String>,
  pub can_open: bool,
  pub session: ActionSlot<PracticeSession>,
  pub submission: ActionSlot<AnswerVerdict>,
  pub completion: ActionSlot<PracticeSession>,
}

impl PracticePage {
  pub fn mount(mode: LoadMode) -> (Self, Vec<Request>) {
    let page = Self {
      mode,
      stage: Stage::Selection,
      modules: Collection::non_empty("modules", seeds::practice_modules()),
      reading_exam: Collection::always("reading_exam", seeds::reading_exam()),
      ai_drills: Collection::non_empty("ai_drills", seeds::ai_drills()),
      question_count: Collection::always("question_count", seeds::QUESTION_COUNT),
      selected_answer: None,
      notice: None,
      started_at: None,
      submitted: false,
      session: ActionSlot::default(),
      submission: ActionSlot::default(),
      completion: ActionSlot::default(),
    };
    let reqs = vec![
      Request::Practice,
      Request::QuestionCount { category: Some(seeds::EXAM_MODULE.to_string()) },
    ];
    (page, reqs)
  }

  #[cfg(test)]
  pub fn stage(&self) -> Stage {
    self.stage
  }

  pub fn apply(&mut self, response: Response) {
    match response {
      Response::Practice(Ok(overview)) => {
        self.modules.settle(Some(overview.modules));
        self.reading_exam.settle(overview.reading_exam);
        self.ai_drills.settle(Some(overview.ai_drills));
      }
      Response::Practice(Err(e)) => {
        report_failure(View::Practice, "practice", &e);
        self.modules.fail();
        self.reading_exam.fail();
        self.ai_drills.fail();
      }
      Response::QuestionCount(Ok(c)) => {
        self.question_count.settle(Some(c.count));
      }
      Response::QuestionCount(Err(e)) => {
        report_failure(View::Practice, "question_count", &e);
        self.question_count.fail();
      }
      Response::CreateSession(Ok(s)) => {
        info!(target: "lumina", session_id = s.id, "Practice session started");
        self.session.succeed(s);
      }
      Response::CreateSession(Err(e)) => {
        warn!(target: "lumina", error = %e, "Create session failed");
        self.session.fail(SESSION_FAILED);
      }
      Response::SubmitAnswer(Ok(v)) => {
        self.submission.succeed(v);
      }
      Response::SubmitAnswer(Err(e)) => {
        warn!(target: "lumina", error = %e, "Submit answer failed");
        self.submission.fail(SUBMIT_FAILED);
      }
      Response::CompleteSession(Ok(s)) => {
        info!(target: "lumina", session_id = s.id, seconds = s.time_spent_seconds, "Practice session completed");
        self.completion.succeed(s);
      }
      Response::CompleteSession(Err(e)) => {
        warn!(target: "lumina", error = %e, "Complete session failed");
        self.completion.fail(COMPLETE_FAILED);
      }
      other => unexpected(View::Practice, &other),
    }
  }

  pub fn handle(&mut self, intent: Intent) -> Result<Vec<Request>, Intent> {
    let reqs = match intent {
      Intent::OpenModule { id } => self.open_module(&id),
      Intent::ChooseAnswer { option } => {
        if self.stage == Stage::Exam && self.reading_exam.current().question.options.contains(&option) {
          self.selected_answer = Some(option);
        }
        Vec::new()
      }
      Intent::SubmitAnswer => self.submit(),
      Intent::LeaveExam => self.leave(),
      other => return Err(other),
    };
    Ok(reqs)
  }

  fn open_module(&mut self, id: &str) -> Vec<Request> {
    if self.stage != Stage::Selection {
      return Vec::new();
    }
    if id != seeds::EXAM_MODULE {
      self.notice = Some(UNDER_CONSTRUCTION.to_string());
      return Vec::new();
    }
    if self.busy() {
      debug!(target: "lumina", "Previous practice round still settling; open refused");
      return Vec::new();
    }

    self.stage = Stage::Exam;
    self.notice = None;
    self.selected_answer = None;
    self.started_at = Some(Utc::now());
    self.submitted = false;
    self.submission.clear();
    self.completion.clear();
    self.session.clear();
    self.session.begin();
    vec![Request::CreateSession(NewSession {
      category: seeds::EXAM_MODULE.to_string(),
      title: Some(self.reading_exam.current().title.clone()),
    })]
  }

  /// Any session reply still outstanding?
  fn busy(&self) -> bool {
    self.session.in_flight() || self.submission.in_flight() || self.completion.in_flight()
  }

  fn session_id(&self) -> Option<i64> {
    match self.session.outcome() {
      Some(Outcome::Done(s)) => Some(s.id),
      _ => None,
    }
  }

  fn submit(&mut self) -> Vec<Request> {
    if self.stage != Stage::Exam {
      return Vec::new();
    }
    let Some(answer) = self.selected_answer.clone() else { return Vec::new() };
    self.stage = Stage::Review;

    let Some(session_id) = self.session_id() else { return Vec::new() };
    if !self.submission.begin() {
      return Vec::new();
    }
    self.submitted = true;
    let question_id = self.reading_exam.current().question.id;
    vec![Request::SubmitAnswer { session_id, answer: AnswerIn { question_id, user_answer: answer } }]
  }

  fn leave(&mut self) -> Vec<Request> {
    if self.stage == Stage::Selection {
      return Vec::new();
    }
    let reviewed = self.stage == Stage::Review;
    self.stage = Stage::Selection;
    self.selected_answer = None;
    let started = self.started_at.take();

    // Only a session that received the answer gets completed.
    if !reviewed || !std::mem::take(&mut self.submitted) {
      return Vec::new();
    }
    let Some(session_id) = self.session_id() else { return Vec::new() };
    if !self.completion.begin() {
      return Vec::new();
    }
    let time_spent = started.map(|t| (Utc::now() - t).num_seconds().max(0)).unwrap_or(0);
    vec![Request::CompleteSession { session_id, time_spent }]
  }

  /// Local verdict; the backend's answer only decorates it.
  pub fn is_correct(&self) -> Option<bool> {
    if self.stage != Stage::Review {
      return None;
    }
    let correct = &self.reading_exam.current().question.correct;
    self.selected_answer.as_ref().map(|a| a == correct)
  }

  fn exam_view(&self) -> Option<ExamView> {
    if self.stage == Stage::Selection {
      return None;
    }
    let exam = self.reading_exam.current();
    let reveal = self.stage == Stage::Review;
    Some(ExamView {
      title: exam.title.clone(),
      passage: exam.passage.clone(),
      question_id: exam.question.id,
      question: exam.question.text.clone(),
      options: exam.question.options.clone(),
      correct: reveal.then(|| exam.question.correct.clone()),
      analysis: reveal.then(|| exam.question.analysis.clone()),
      keywords: exam.question.keywords.clone(),
    })
  }

  pub fn render(&self) -> Rendered<PracticeView> {
    let pending = self.modules.is_pending() || self.question_count.is_pending();
    Rendered::present(self.mode, pending, || PracticeView {
      stage: self.stage,
      modules: self.modules.current().clone(),
      ai_drills: self.ai_drills.current().clone(),
      question_count: *self.question_count.current(),
      exam: self.exam_view(),
      selected_answer: self.selected_answer.clone(),
      is_correct: self.is_correct(),
      notice: self.notice.clone(),
      can_open: self.stage == Stage::Selection && !self.busy(),
      session: self.session.clone(),
      submission: self.submission.clone(),
      completion: self.completion.clone(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::types::{PracticeOverview, QuestionCount};
  use crate::backend::BackendError;

  fn session(id: i64) -> PracticeSession {
    PracticeSession {
      id,
      category: "reading".into(),
      title: None,
      total_questions: 0,
      correct_count: 0,
      time_spent_seconds: 0,
      score: None,
      started_at: String::new(),
      completed_at: None,
    }
  }

  fn mounted() -> PracticePage {
    let (mut page, _) = PracticePage::mount(LoadMode::FallbackFirst);
    page.apply(Response::Practice(Ok(PracticeOverview::default())));
    page.apply(Response::QuestionCount(Ok(QuestionCount { category: Some("reading".into()), count: 40 })));
    page
  }

  #[test]
  fn empty_overview_keeps_fallbacks() {
    let page = mounted();
    let v = page.render().body.unwrap();
    assert_eq!(v.modules, seeds::practice_modules());
    assert_eq!(v.ai_drills, seeds::ai_drills());
    assert_eq!(v.question_count, 40);
    assert!(v.exam.is_none());
  }

  #[test]
  fn non_reading_modules_only_show_a_notice() {
    let mut page = mounted();
    assert!(page.handle(Intent::OpenModule { id: "writing".into() }).unwrap().is_empty());
    assert_eq!(page.stage(), Stage::Selection);
    assert_eq!(page.render().body.unwrap().notice.as_deref(), Some(UNDER_CONSTRUCTION));
  }

  #[test]
  fn full_session_round() {
    let mut page = mounted();
    let reqs = page.handle(Intent::OpenModule { id: "reading".into() }).unwrap();
    assert!(matches!(&reqs[..], [Request::CreateSession(NewSession { category, .. })] if category == "reading"));
    assert_eq!(page.stage(), Stage::Exam);
    assert!(page.render().body.unwrap().exam.unwrap().correct.is_none());
    page.apply(Response::CreateSession(Ok(session(9))));

    // Options outside the question are ignored.
    page.handle(Intent::ChooseAnswer { option: "MAYBE".into() }).unwrap();
    assert!(page.handle(Intent::SubmitAnswer).unwrap().is_empty());
    assert_eq!(page.stage(), Stage::Exam);

    page.handle(Intent::ChooseAnswer { option: "NOT GIVEN".into() }).unwrap();
    let reqs = page.handle(Intent::SubmitAnswer).unwrap();
    assert_eq!(
      reqs,
      vec![Request::SubmitAnswer { session_id: 9, answer: AnswerIn { question_id: 4, user_answer: "NOT GIVEN".into() } }]
    );
    assert_eq!(page.stage(), Stage::Review);
    assert_eq!(page.is_correct(), Some(true));
    assert_eq!(page.render().body.unwrap().exam.unwrap().correct.as_deref(), Some("NOT GIVEN"));

    page.apply(Response::SubmitAnswer(Err(BackendError::Status { status: 500, path: "/x".into() })));
    assert_eq!(page.submission.outcome(), Some(&Outcome::Failed(SUBMIT_FAILED.to_string())));
    assert_eq!(page.is_correct(), Some(true));

    let reqs = page.handle(Intent::LeaveExam).unwrap();
    assert!(matches!(&reqs[..], [Request::CompleteSession { session_id: 9, time_spent }] if *time_spent >= 0));
    assert_eq!(page.stage(), Stage::Selection);
  }

  #[test]
  fn without_a_session_answers_are_local_only() {
    let mut page = mounted();
    page.handle(Intent::OpenModule { id: "reading".into() }).unwrap();
    page.apply(Response::CreateSession(Err(BackendError::Status { status: 503, path: "/api/practice/sessions".into() })));
    page.handle(Intent::ChooseAnswer { option: "TRUE".into() }).unwrap();
    assert!(page.handle(Intent::SubmitAnswer).unwrap().is_empty());
    assert_eq!(page.is_correct(), Some(false));
    assert!(page.handle(Intent::LeaveExam).unwrap().is_empty());
    assert_eq!(page.stage(), Stage::Selection);
  }

  #[test]
  fn reopening_waits_for_the_previous_round_to_settle() {
    let mut page = mounted();
    assert_eq!(page.handle(Intent::OpenModule { id: "reading".into() }).unwrap().len(), 1);
    page.handle(Intent::LeaveExam).unwrap();
    assert!(!page.render().body.unwrap().can_open);

    // First create is still out: no second one, no new round.
    assert!(page.handle(Intent::OpenModule { id: "reading".into() }).unwrap().is_empty());
    assert_eq!(page.stage(), Stage::Selection);

    page.apply(Response::CreateSession(Ok(session(1))));
    assert!(page.render().body.unwrap().can_open);
    assert_eq!(page.handle(Intent::OpenModule { id: "reading".into() }).unwrap().len(), 1);
    page.apply(Response::CreateSession(Ok(session(2))));

    page.handle(Intent::ChooseAnswer { option: "TRUE".into() }).unwrap();
    assert!(matches!(&page.handle(Intent::SubmitAnswer).unwrap()[..], [Request::SubmitAnswer { session_id: 2, .. }]));
  }

  #[test]
  fn late_submit_reply_cannot_leak_into_the_next_round() {
    let mut page = mounted();
    page.handle(Intent::OpenModule { id: "reading".into() }).unwrap();
    page.apply(Response::CreateSession(Ok(session(3))));
    page.handle(Intent::ChooseAnswer { option: "NOT GIVEN".into() }).unwrap();
    page.handle(Intent::SubmitAnswer).unwrap();
    let reqs = page.handle(Intent::LeaveExam).unwrap();
    assert!(matches!(&reqs[..], [Request::CompleteSession { session_id: 3, .. }]));

    assert!(page.handle(Intent::OpenModule { id: "reading".into() }).unwrap().is_empty());
    page.apply(Response::SubmitAnswer(Err(BackendError::Status { status: 500, path: "/x".into() })));
    assert!(page.handle(Intent::OpenModule { id: "reading".into() }).unwrap().is_empty());
    page.apply(Response::CompleteSession(Ok(session(3))));

    assert_eq!(page.handle(Intent::OpenModule { id: "reading".into() }).unwrap().len(), 1);
    let v = page.render().body.unwrap();
    assert!(v.submission.outcome().is_none());
    assert!(v.completion.outcome().is_none());
  }

  #[test]
  fn answer_before_the_session_arrives_is_never_completed() {
    let mut page = mounted();
    page.handle(Intent::OpenModule { id: "reading".into() }).unwrap();
    page.handle(Intent::ChooseAnswer { option: "NOT GIVEN".into() }).unwrap();
    assert!(page.handle(Intent::SubmitAnswer).unwrap().is_empty());
    assert_eq!(page.is_correct(), Some(true));

    page.apply(Response::CreateSession(Ok(session(5))));
    assert!(page.handle(Intent::LeaveExam).unwrap().is_empty());
    assert_eq!(page.stage(), Stage::Selection);
  }

  #[test]
  fn leaving_before_submitting_skips_completion() {
    let mut page = mounted();
    page.handle(Intent::OpenModule { id: "reading".into() }).unwrap();
    page.apply(Response::CreateSession(Ok(session(2))));
    assert!(page.handle(Intent::LeaveExam).unwrap().is_empty());
    assert_eq!(page.stage(), Stage::Selection);
  }
}
