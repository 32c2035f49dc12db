//! Foundation: vocabulary memory curve, recent words, syntax notes, and the
//! vocabulary book (list / add / delete).

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{unexpected, Intent, Rendered};
use crate::backend::types::{MemoryCurvePoint, NewWord, RecentWord, SyntaxEntry, VocabularyEntry};
use crate::backend::{Request, Response};
use crate::domain::{LoadMode, View};
use crate::loader::{report_failure, ActionSlot, Collection, Status};
use crate::seeds;
use crate::util::non_blank;

pub const SAVE_FAILED: &str = "Could not save the word. Make sure the backend service is running.";
pub const DELETE_FAILED: &str = "Could not remove the word. Make sure the backend service is running.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoundationTab {
  #[default]
  Vocab,
  Syntax,
}

#[derive(Debug)]
pub struct FoundationPage {
  mode: LoadMode,
  tab: FoundationTab,
  review_count: Collection<i64>,
  memory_curve: Collection<Vec<MemoryCurvePoint>>,
  recent_words: Collection<Vec<RecentWord>>,
  syntax_entries: Collection<Vec<SyntaxEntry>>,
  saved_words: Collection<Vec<VocabularyEntry>>,
  vocab_action: ActionSlot<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct FoundationView {
  pub tab: FoundationTab,
  pub review_count: i64,
  pub memory_curve: Vec<MemoryCurvePoint>,
  pub recent_words: Vec<RecentWord>,
  pub syntax_entries: Vec<SyntaxEntry>,
  pub saved_words: Vec<VocabularyEntry>,
  pub saved_words_status: Status,
  pub vocab_action: ActionSlot<String>,
}

impl FoundationPage {
  pub fn mount(mode: LoadMode) -> (Self, Vec<Request>) {
    let page = Self {
      mode,
      tab: FoundationTab::default(),
      review_count: Collection::always("review_count", seeds::REVIEW_COUNT),
      memory_curve: Collection::non_empty("memory_curve", seeds::memory_curve()),
      recent_words: Collection::non_empty("recent_words", seeds::recent_words()),
      syntax_entries: Collection::non_empty("syntax_entries", seeds::syntax_entries()),
      saved_words: Collection::always("saved_words", Vec::new()),
      vocab_action: ActionSlot::default(),
    };
    (page, vec![Request::Foundation, Request::Vocabulary])
  }

  pub fn apply(&mut self, response: Response) {
    match response {
      Response::Foundation(Ok(overview)) => {
        self.review_count.settle(overview.review_count);
        self.memory_curve.settle(Some(overview.memory_curve));
        self.recent_words.settle(Some(overview.recent_words));
        self.syntax_entries.settle(Some(overview.syntax_entries));
      }
      Response::Foundation(Err(e)) => {
        report_failure(View::Foundation, "foundation", &e);
        self.review_count.fail();
        self.memory_curve.fail();
        self.recent_words.fail();
        self.syntax_entries.fail();
      }
      Response::Vocabulary(Ok(words)) => {
        self.saved_words.settle(Some(words));
      }
      Response::Vocabulary(Err(e)) => {
        report_failure(View::Foundation, "vocabulary", &e);
        self.saved_words.fail();
      }
      Response::AddWord(Ok(entry)) => {
        info!(target: "lumina", id = entry.id, word = %entry.word, "Word saved");
        self.vocab_action.succeed(format!("Saved \"{}\"", entry.word));
        self.saved_words.amend(|words| {
          words.retain(|w| w.id != entry.id);
          words.insert(0, entry);
        });
      }
      Response::AddWord(Err(e)) => {
        warn!(target: "lumina", error = %e, "Add word failed");
        self.vocab_action.fail(SAVE_FAILED);
      }
      Response::DeleteWord { id, result: Ok(()) } => {
        self.saved_words.amend(|words| words.retain(|w| w.id != id));
        self.vocab_action.succeed(format!("Removed word #{id}"));
      }
      Response::DeleteWord { id, result: Err(e) } => {
        warn!(target: "lumina", id, error = %e, "Delete word failed");
        self.vocab_action.fail(DELETE_FAILED);
      }
      other => unexpected(View::Foundation, &other),
    }
  }

  pub fn handle(&mut self, intent: Intent) -> Result<Vec<Request>, Intent> {
    match intent {
      Intent::FoundationTab { tab } => {
        self.tab = tab;
        Ok(Vec::new())
      }
      Intent::AddWord { word, definition } => {
        let Some(word) = non_blank(&word) else { return Ok(Vec::new()) };
        if !self.vocab_action.begin() {
          return Ok(Vec::new());
        }
        let definition = definition.as_deref().and_then(non_blank).map(str::to_string);
        Ok(vec![Request::AddWord(NewWord { word: word.to_string(), definition })])
      }
      Intent::DeleteWord { id } => {
        if !self.vocab_action.begin() {
          return Ok(Vec::new());
        }
        Ok(vec![Request::DeleteWord { id }])
      }
      other => Err(other),
    }
  }

  pub fn render(&self) -> Rendered<FoundationView> {
    let pending = self.memory_curve.is_pending();
    Rendered::present(self.mode, pending, || FoundationView {
      tab: self.tab,
      review_count: *self.review_count.current(),
      memory_curve: self.memory_curve.current().clone(),
      recent_words: self.recent_words.current().clone(),
      syntax_entries: self.syntax_entries.current().clone(),
      saved_words: self.saved_words.current().clone(),
      saved_words_status: self.saved_words.status(),
      vocab_action: self.vocab_action.clone(),
    })
  }
}
