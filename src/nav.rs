//! Navigation: one mutable "current view" slot and the mounted page.
//!
//! Every mount bumps a generation counter. Requests leave with a `Ticket`
//! naming the mount that issued them; a response whose ticket is not the
//! current one belongs to an unmounted page and is dropped untouched.

use serde::Serialize;
use tracing::{debug, info};

use crate::backend::{Request, Response};
use crate::config::PageModes;
use crate::domain::View;
use crate::pages::{Intent, Page};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Ticket {
  pub generation: u64,
  pub view: View,
}

#[derive(Debug)]
pub struct Navigator {
  generation: u64,
  page: Page,
  modes: PageModes,
}

impl Navigator {
  /// Starts on the intro view, which fetches nothing.
  pub fn new(modes: PageModes) -> Self {
    let (page, _) = Page::mount(View::Intro, &modes);
    Self { generation: 0, page, modes }
  }

  pub fn current(&self) -> View {
    self.page.view()
  }

  pub fn ticket(&self) -> Ticket {
    Ticket { generation: self.generation, view: self.current() }
  }

  pub fn page(&self) -> &Page {
    &self.page
  }

  /// Unmount the current page and mount `target`. Already on `target`: no-op.
  pub fn navigate(&mut self, target: View) -> Vec<(Ticket, Request)> {
    if target == self.current() {
      debug!(target: "nav", view = %target, "Already active; nothing to do");
      return Vec::new();
    }
    let from = self.current();
    let (page, requests) = Page::mount(target, &self.modes);
    self.page = page;
    self.generation += 1;
    info!(target: "nav", %from, to = %target, generation = self.generation, requests = requests.len(), "Navigated");
    self.stamp(requests)
  }

  pub fn handle(&mut self, intent: Intent) -> Vec<(Ticket, Request)> {
    let requests = self.page.handle(intent);
    self.stamp(requests)
  }

  /// Apply a response if its ticket still names the mounted page.
  /// Returns false when it was stale and dropped.
  pub fn deliver(&mut self, ticket: Ticket, response: Response) -> bool {
    if ticket != self.ticket() {
      debug!(target: "nav", issued = ?ticket, current = ?self.ticket(), "Stale response dropped");
      return false;
    }
    self.page.apply(response);
    true
  }

  fn stamp(&self, requests: Vec<Request>) -> Vec<(Ticket, Request)> {
    let t = self.ticket();
    requests.into_iter().map(|r| (t, r)).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::types::SkillRadarData;
  use crate::pages::PageView;

  fn nav() -> Navigator {
    Navigator::new(PageModes::default())
  }

  fn render_json(n: &Navigator) -> String {
    serde_json::to_string(&n.page().render()).unwrap()
  }

  #[test]
  fn starts_on_intro() {
    let n = nav();
    assert_eq!(n.current(), View::Intro);
    assert!(matches!(n.page().render(), PageView::Intro));
  }

  #[test]
  fn mount_issues_all_requests_under_one_ticket() {
    let mut n = nav();
    let out = n.navigate(View::Analysis);
    assert_eq!(out.len(), 4);
    assert!(out.iter().all(|(t, _)| *t == n.ticket()));
    assert_eq!(n.ticket().generation, 1);
  }

  #[test]
  fn navigating_to_active_view_changes_nothing() {
    let mut n = nav();
    n.navigate(View::Dashboard);
    let before = render_json(&n);
    let ticket = n.ticket();
    assert!(n.navigate(View::Dashboard).is_empty());
    assert_eq!(n.ticket(), ticket);
    assert_eq!(render_json(&n), before);
  }

  #[test]
  fn late_response_after_unmount_is_ignored() {
    let mut n = nav();
    let issued = n.navigate(View::Analysis);
    let (old_ticket, _) = issued[0].clone();
    n.navigate(View::Settings);
    let before = render_json(&n);

    let applied = n.deliver(old_ticket, Response::Skills(Ok(SkillRadarData::default())));
    assert!(!applied);
    assert_eq!(render_json(&n), before);
  }

  #[test]
  fn returning_to_a_view_does_not_revive_old_tickets() {
    let mut n = nav();
    let (old, _) = n.navigate(View::Analysis)[0].clone();
    n.navigate(View::Dashboard);
    n.navigate(View::Analysis);
    assert_eq!(old.view, n.ticket().view);
    assert!(!n.deliver(old, Response::Improvements(Ok(vec![]))));
  }
}
