//! Mounted pages: one variant per view, each owning its own view-model.
//!
//! A page is built by `Page::mount`, which also returns the requests to issue
//! concurrently. Responses come back through `Page::apply` (the navigator has
//! already checked they belong to this mount). User intents arrive through
//! `Page::handle` and may produce further requests.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::{Request, Response};
use crate::config::PageModes;
use crate::domain::{LoadMode, View};

pub mod analysis;
pub mod dashboard;
pub mod foundation;
pub mod practice;
pub mod weakness;

pub use analysis::{AnalysisPage, AnalysisTab, AnalysisView};
pub use dashboard::{DashboardPage, DashboardView};
pub use foundation::{FoundationPage, FoundationTab, FoundationView};
pub use practice::{PracticePage, PracticeView};
pub use weakness::{WeaknessPage, WeaknessView};

/// Local user intent addressed to the mounted page.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Intent {
  // analysis
  SelectError { id: i64 },
  AnalysisTab { tab: AnalysisTab },
  GenerateSimilar,
  // foundation
  FoundationTab { tab: FoundationTab },
  AddWord { word: String, #[serde(default)] definition: Option<String> },
  DeleteWord { id: i64 },
  // weakness
  SelectModule { id: String },
  // practice
  OpenModule { id: String },
  ChooseAnswer { option: String },
  SubmitAnswer,
  LeaveExam,
}

/// Rendered body of a page plus its loading flag.
///
/// Block-on-load pages withhold the body while anything is pending;
/// fallback-first pages always carry one.
#[derive(Clone, Debug, Serialize)]
pub struct Rendered<B> {
  pub loading: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub body: Option<B>,
}

impl<B> Rendered<B> {
  pub fn present(mode: LoadMode, pending: bool, body: impl FnOnce() -> B) -> Self {
    match mode {
      LoadMode::BlockOnLoad if pending => Self { loading: true, body: None },
      _ => Self { loading: false, body: Some(body()) },
    }
  }
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum PageView {
  Intro,
  Dashboard(Rendered<DashboardView>),
  Practice(Rendered<PracticeView>),
  Analysis(Rendered<AnalysisView>),
  Settings,
  Foundation(Rendered<FoundationView>),
  Weakness(Rendered<WeaknessView>),
}

#[derive(Debug)]
pub enum Page {
  Intro,
  Dashboard(DashboardPage),
  Practice(PracticePage),
  Analysis(AnalysisPage),
  Settings,
  Foundation(FoundationPage),
  Weakness(WeaknessPage),
}

impl Page {
  pub fn mount(view: View, modes: &PageModes) -> (Page, Vec<Request>) {
    match view {
      View::Intro => (Page::Intro, Vec::new()),
      View::Settings => (Page::Settings, Vec::new()),
      View::Dashboard => {
        let (p, reqs) = DashboardPage::mount(modes.dashboard);
        (Page::Dashboard(p), reqs)
      }
      View::Practice => {
        let (p, reqs) = PracticePage::mount(modes.practice);
        (Page::Practice(p), reqs)
      }
      View::Analysis => {
        let (p, reqs) = AnalysisPage::mount(modes.analysis);
        (Page::Analysis(p), reqs)
      }
      View::Foundation => {
        let (p, reqs) = FoundationPage::mount(modes.foundation);
        (Page::Foundation(p), reqs)
      }
      View::Weakness => {
        let (p, reqs) = WeaknessPage::mount(modes.weakness);
        (Page::Weakness(p), reqs)
      }
    }
  }

  pub fn view(&self) -> View {
    match self {
      Page::Intro => View::Intro,
      Page::Dashboard(_) => View::Dashboard,
      Page::Practice(_) => View::Practice,
      Page::Analysis(_) => View::Analysis,
      Page::Settings => View::Settings,
      Page::Foundation(_) => View::Foundation,
      Page::Weakness(_) => View::Weakness,
    }
  }

  pub fn apply(&mut self, response: Response) {
    match self {
      Page::Dashboard(p) => p.apply(response),
      Page::Practice(p) => p.apply(response),
      Page::Analysis(p) => p.apply(response),
      Page::Foundation(p) => p.apply(response),
      Page::Weakness(p) => p.apply(response),
      Page::Intro | Page::Settings => {
        debug!(target: "nav", view = %self.view(), "Page has no data; response dropped");
      }
    }
  }

  pub fn handle(&mut self, intent: Intent) -> Vec<Request> {
    let view = self.view();
    let out = match self {
      Page::Analysis(p) => p.handle(intent),
      Page::Foundation(p) => p.handle(intent),
      Page::Weakness(p) => p.handle(intent),
      Page::Practice(p) => p.handle(intent),
      Page::Dashboard(_) | Page::Intro | Page::Settings => Err(intent),
    };
    out.unwrap_or_else(|intent| {
      debug!(target: "nav", %view, ?intent, "Intent not meant for this page; ignored");
      Vec::new()
    })
  }

  pub fn render(&self) -> PageView {
    match self {
      Page::Intro => PageView::Intro,
      Page::Settings => PageView::Settings,
      Page::Dashboard(p) => PageView::Dashboard(p.render()),
      Page::Practice(p) => PageView::Practice(p.render()),
      Page::Analysis(p) => PageView::Analysis(p.render()),
      Page::Foundation(p) => PageView::Foundation(p.render()),
      Page::Weakness(p) => PageView::Weakness(p.render()),
    }
  }
}

/// Log a response that does not belong to this page type.
pub(crate) fn unexpected(view: View, response: &Response) {
  debug!(target: "nav", %view, ?response, "Unexpected response for page; ignored");
}
