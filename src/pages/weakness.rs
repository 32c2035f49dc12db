//! Weakness breakdown per IELTS module.

use serde::Serialize;

use super::{unexpected, Intent, Rendered};
use crate::backend::types::{DetailedStats, Suggestions, WeaknessModule, WeaknessStat, WeaknessSuggestion};
use crate::backend::{Request, Response};
use crate::domain::{LoadMode, View};
use crate::loader::{report_failure, Collection};
use crate::seeds;

#[derive(Debug)]
pub struct WeaknessPage {
  mode: LoadMode,
  active: String,
  modules: Collection<Vec<WeaknessModule>>,
  detailed: Collection<DetailedStats>,
  suggestions: Collection<Suggestions>,
}

#[derive(Clone, Debug, Serialize)]
pub struct WeaknessView {
  pub active_module: String,
  pub modules: Vec<WeaknessModule>,
  pub current_stats: Vec<WeaknessStat>,
  pub current_suggestion: Option<WeaknessSuggestion>,
}

impl WeaknessPage {
  pub fn mount(mode: LoadMode) -> (Self, Vec<Request>) {
    let page = Self {
      mode,
      active: seeds::DEFAULT_WEAK_MODULE.to_string(),
      modules: Collection::non_empty("modules", seeds::weakness_modules()),
      detailed: Collection::always("detailed_stats", seeds::detailed_stats()),
      suggestions: Collection::always("suggestions", seeds::suggestions()),
    };
    (page, vec![Request::Weakness])
  }

  pub fn apply(&mut self, response: Response) {
    match response {
      Response::Weakness(Ok(overview)) => {
        if self.modules.settle(Some(overview.modules)) {
          let modules = self.modules.current();
          if !modules.iter().any(|m| m.id == self.active) {
            if let Some(first) = modules.first() {
              self.active = first.id.clone();
            }
          }
        }
        self.detailed.settle(overview.detailed_stats);
        self.suggestions.settle(overview.suggestions);
      }
      Response::Weakness(Err(e)) => {
        report_failure(View::Weakness, "weakness", &e);
        self.modules.fail();
        self.detailed.fail();
        self.suggestions.fail();
      }
      other => unexpected(View::Weakness, &other),
    }
  }

  pub fn handle(&mut self, intent: Intent) -> Result<Vec<Request>, Intent> {
    match intent {
      Intent::SelectModule { id } => {
        if self.modules.current().iter().any(|m| m.id == id) {
          self.active = id;
        }
        Ok(Vec::new())
      }
      other => Err(other),
    }
  }

  pub fn render(&self) -> Rendered<WeaknessView> {
    Rendered::present(self.mode, self.modules.is_pending(), || WeaknessView {
      active_module: self.active.clone(),
      modules: self.modules.current().clone(),
      current_stats: self.detailed.current().get(&self.active).cloned().unwrap_or_default(),
      current_suggestion: self.suggestions.current().get(&self.active).cloned(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::types::WeaknessOverview;
  use std::collections::BTreeMap;

  fn module(id: &str) -> WeaknessModule {
    WeaknessModule { id: id.into(), name: id.into(), score: 6.0, weak_point: "x".into() }
  }

  #[test]
  fn fallback_shows_reading_details() {
    let (page, _) = WeaknessPage::mount(LoadMode::FallbackFirst);
    let v = page.render().body.unwrap();
    assert_eq!(v.active_module, "Reading");
    assert_eq!(v.current_stats[0].kind, "True/False/NG");
    assert_eq!(v.current_suggestion.unwrap().priority, "High Priority");
  }

  #[test]
  fn live_modules_without_active_switch_to_first() {
    let (mut page, _) = WeaknessPage::mount(LoadMode::FallbackFirst);
    page.apply(Response::Weakness(Ok(WeaknessOverview {
      modules: vec![module("Writing")],
      detailed_stats: Some(BTreeMap::new()),
      suggestions: None,
    })));
    let v = page.render().body.unwrap();
    assert_eq!(v.active_module, "Writing");
    // An empty map is a present value and replaces the fallback.
    assert!(v.current_stats.is_empty());
    assert_eq!(v.current_suggestion.unwrap().priority, "Critical Alert");
  }

  #[test]
  fn selecting_unknown_module_is_ignored() {
    let (mut page, _) = WeaknessPage::mount(LoadMode::FallbackFirst);
    page.handle(Intent::SelectModule { id: "Chess".into() }).unwrap();
    assert_eq!(page.render().body.unwrap().active_module, "Reading");
    page.handle(Intent::SelectModule { id: "Speaking".into() }).unwrap();
    assert_eq!(page.render().body.unwrap().active_module, "Speaking");
  }
}
