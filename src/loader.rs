//! Resilient collection loading and user-triggered action slots.
//!
//! A [`Collection`] always has something to render: its fallback literal until
//! a live value is accepted by the merge predicate. Failures keep the
//! fallback; the page logs one diagnostic per failed request through
//! [`report_failure`].
//!
//! An [`ActionSlot`] is the in-flight guard plus display slot behind a button
//! such as "generate similar question".

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::backend::BackendError;
use crate::domain::View;

/// Merge predicate: should this live value replace the fallback?
pub type Accept<T> = fn(&T) -> bool;

/// Values with a natural notion of "nothing to show".
pub trait Substantive {
    fn is_substantive(&self) -> bool;
}

impl<T> Substantive for Vec<T> {
    fn is_substantive(&self) -> bool {
        !self.is_empty()
    }
}

impl<K, V> Substantive for std::collections::BTreeMap<K, V> {
    fn is_substantive(&self) -> bool {
        !self.is_empty()
    }
}

pub fn non_empty<T: Substantive>(v: &T) -> bool {
    v.is_substantive()
}

pub fn always<T>(_: &T) -> bool {
    true
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    Live,
    Fallback,
}

#[derive(Clone)]
pub struct Collection<T> {
    name: &'static str,
    fallback: T,
    live: Option<T>,
    accept: Accept<T>,
    status: Status,
}

impl<T: fmt::Debug> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("status", &self.status)
            .field("current", self.current())
            .finish()
    }
}

impl<T> Collection<T> {
    pub fn new(name: &'static str, fallback: T, accept: Accept<T>) -> Self {
        Self { name, fallback, live: None, accept, status: Status::Pending }
    }

    /// Replace only when the live list has at least one entry.
    pub fn non_empty(name: &'static str, fallback: T) -> Self
    where
        T: Substantive,
    {
        Self::new(name, fallback, non_empty::<T>)
    }

    /// Replace whenever a value is present.
    pub fn always(name: &'static str, fallback: T) -> Self {
        Self::new(name, fallback, always::<T>)
    }

    pub fn current(&self) -> &T {
        self.live.as_ref().unwrap_or(&self.fallback)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }

    #[cfg(test)]
    pub fn is_live(&self) -> bool {
        self.status == Status::Live
    }

    /// Successful fetch. `None` means the field was absent from the payload.
    /// Returns true when the live value replaced the fallback.
    pub fn settle(&mut self, value: Option<T>) -> bool {
        match value {
            Some(v) if (self.accept)(&v) => {
                self.live = Some(v);
                self.status = Status::Live;
                debug!(target: "loader", collection = self.name, "Live data accepted");
                true
            }
            _ => {
                self.live = None;
                self.status = Status::Fallback;
                debug!(target: "loader", collection = self.name, "Live data empty; keeping fallback");
                false
            }
        }
    }

    /// Failed fetch: keep showing the fallback.
    pub fn fail(&mut self) {
        self.live = None;
        self.status = Status::Fallback;
    }

    /// Edit the shown value in place after a local write went through. The
    /// edited value is live from then on.
    pub fn amend(&mut self, edit: impl FnOnce(&mut T))
    where
        T: Clone,
    {
        let mut value = self.current().clone();
        edit(&mut value);
        self.live = Some(value);
        self.status = Status::Live;
    }
}

/// The single diagnostic emitted for one failed request.
pub fn report_failure(view: View, request: &'static str, err: &BackendError) {
    warn!(target: "loader", %view, request, error = %err, "Fetch failed; keeping fallback data");
}

/// In-flight flag and result slot for a user-triggered action.
#[derive(Clone, Debug, Serialize)]
pub struct ActionSlot<T> {
    in_flight: bool,
    outcome: Option<Outcome<T>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Outcome<T> {
    Done(T),
    Failed(String),
}

impl<T> Default for ActionSlot<T> {
    fn default() -> Self {
        Self { in_flight: false, outcome: None }
    }
}

impl<T> ActionSlot<T> {
    /// Claim the slot. Returns false (and changes nothing) while a prior
    /// trigger is still in flight; the control is disabled in that state.
    pub fn begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        self.outcome = None;
        true
    }

    pub fn succeed(&mut self, value: T) {
        self.outcome = Some(Outcome::Done(value));
        self.in_flight = false;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.outcome = Some(Outcome::Failed(message.into()));
        self.in_flight = false;
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn outcome(&self) -> Option<&Outcome<T>> {
        self.outcome.as_ref()
    }

    /// Drop the shown outcome. An in-flight claim stays claimed.
    pub fn clear(&mut self) {
        self.outcome = None;
    }

    /// Release the claim without recording anything; the reply that just
    /// landed no longer has a place to be shown.
    pub fn abandon(&mut self) {
        self.in_flight = false;
        self.outcome = None;
    }
}
