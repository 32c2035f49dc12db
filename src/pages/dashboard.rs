//! Dashboard: learning pulse, error fingerprint and recommendations.

use serde::Serialize;

use super::{unexpected, Rendered};
use crate::backend::types::{DashboardData, ErrorMetric, PulsePoint, Recommendation};
use crate::backend::{Request, Response};
use crate::domain::{LoadMode, View};
use crate::loader::{report_failure, Collection};
use crate::seeds;

#[derive(Debug)]
pub struct DashboardPage {
  mode: LoadMode,
  pulse_points: Collection<Vec<PulsePoint>>,
  predicted_score: Collection<f64>,
  weekly_delta: Collection<f64>,
  error_metrics: Collection<Vec<ErrorMetric>>,
  pending_count: Collection<i64>,
  recommendations: Collection<Vec<Recommendation>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardView {
  pub predicted_score: f64,
  pub weekly_delta: String,
  pub pulse_points: Vec<PulsePoint>,
  pub error_metrics: Vec<ErrorMetric>,
  pub pending_count: i64,
  pub recommendations: Vec<Recommendation>,
  pub recommendations_loading: bool,
}

impl DashboardPage {
  pub fn mount(mode: LoadMode) -> (Self, Vec<Request>) {
    let page = Self {
      mode,
      pulse_points: Collection::non_empty("pulse_points", seeds::pulse_points()),
      predicted_score: Collection::always("predicted_score", seeds::PREDICTED_SCORE),
      weekly_delta: Collection::always("weekly_delta", seeds::WEEKLY_DELTA),
      error_metrics: Collection::non_empty("error_metrics", seeds::error_metrics()),
      pending_count: Collection::always("pending_count", seeds::PENDING_ERRORS),
      recommendations: Collection::non_empty("recommendations", seeds::recommendations()),
    };
    (page, vec![Request::Dashboard, Request::Recommendations])
  }

  pub fn apply(&mut self, response: Response) {
    match response {
      Response::Dashboard(Ok(DashboardData { learning_pulse, error_metrics, .. })) => {
        self.pulse_points.settle(Some(learning_pulse.points));
        self.predicted_score.settle(learning_pulse.predicted_score);
        self.weekly_delta.settle(learning_pulse.weekly_delta);
        self.error_metrics.settle(Some(error_metrics.metrics));
        self.pending_count.settle(error_metrics.pending_count);
      }
      Response::Dashboard(Err(e)) => {
        report_failure(View::Dashboard, "dashboard", &e);
        self.pulse_points.fail();
        self.predicted_score.fail();
        self.weekly_delta.fail();
        self.error_metrics.fail();
        self.pending_count.fail();
      }
      Response::Recommendations(Ok(list)) => {
        self.recommendations.settle(Some(list));
      }
      Response::Recommendations(Err(e)) => {
        report_failure(View::Dashboard, "recommendations", &e);
        self.recommendations.fail();
      }
      other => unexpected(View::Dashboard, &other),
    }
  }

  fn pending(&self) -> bool {
    self.pulse_points.is_pending() || self.recommendations.is_pending()
  }

  pub fn render(&self) -> Rendered<DashboardView> {
    Rendered::present(self.mode, self.pending(), || DashboardView {
      predicted_score: *self.predicted_score.current(),
      weekly_delta: format!("{:+}", self.weekly_delta.current()),
      pulse_points: self.pulse_points.current().clone(),
      error_metrics: self.error_metrics.current().clone(),
      pending_count: *self.pending_count.current(),
      recommendations: self.recommendations.current().clone(),
      recommendations_loading: self.recommendations.is_pending(),
    })
  }
}
