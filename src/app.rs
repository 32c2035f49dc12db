//! Root application state and its update function.
//!
//! This module owns:
//!   - the settings object and the ambience derived from it
//!   - the navigator (current view + mounted page)
//!   - the always-mounted tutor widget
//!
//! `App::update` is synchronous and never touches I/O: it folds one `Msg`
//! into state and returns the `Cmd`s the runtime should execute.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::backend::{BackendError, Request, Response};
use crate::config::AppConfig;
use crate::domain::View;
use crate::nav::{Navigator, Ticket};
use crate::pages::{Intent, PageView};
use crate::settings::{Ambience, Settings, SettingsPatch};
use crate::tutor::Tutor;

#[derive(Debug)]
pub enum Msg {
    /// Intro screen's "start" button.
    Start,
    Navigate(View),
    ChangeSettings(SettingsPatch),
    Page(Intent),
    SendChat(String),
    ToggleTutor,
    ToggleTutorSize,
    Loaded { ticket: Ticket, response: Response },
    ChatReplied(Result<String, BackendError>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Cmd {
    Fetch { ticket: Ticket, request: Request },
    Chat { text: String },
}

/// Everything a renderer needs, in one serializable value.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub view: View,
    pub generation: u64,
    pub settings: Settings,
    pub ambience: Ambience,
    pub page: PageView,
    pub tutor: Tutor,
}

#[derive(Debug)]
pub struct App {
    settings: Settings,
    ambience: Ambience,
    nav: Navigator,
    tutor: Tutor,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        let settings = Settings::default();
        Self {
            settings,
            ambience: Ambience::from_settings(&settings),
            nav: Navigator::new(config.pages),
            tutor: Tutor::new(&config.tutor.greeting),
        }
    }

    #[cfg(test)]
    pub fn tutor(&self) -> &Tutor {
        &self.tutor
    }

    #[instrument(level = "debug", skip_all)]
    pub fn update(&mut self, msg: Msg) -> Vec<Cmd> {
        match msg {
            Msg::Start => fetches(self.nav.navigate(View::Dashboard)),
            Msg::Navigate(view) => fetches(self.nav.navigate(view)),
            Msg::ChangeSettings(patch) => {
                self.settings.merge(&patch);
                self.ambience.sync(&self.settings);
                Vec::new()
            }
            Msg::Page(intent) => fetches(self.nav.handle(intent)),
            Msg::SendChat(text) => match self.tutor.send(&text) {
                Some(text) => vec![Cmd::Chat { text }],
                None => {
                    debug!(target: "tutor", in_flight = self.tutor.in_flight(), "Send refused");
                    Vec::new()
                }
            },
            Msg::ToggleTutor => {
                self.tutor.toggle_open();
                Vec::new()
            }
            Msg::ToggleTutorSize => {
                self.tutor.toggle_expanded();
                Vec::new()
            }
            Msg::Loaded { ticket, response } => {
                self.nav.deliver(ticket, response);
                Vec::new()
            }
            Msg::ChatReplied(result) => {
                self.tutor.receive(result);
                Vec::new()
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let ticket = self.nav.ticket();
        Snapshot {
            view: ticket.view,
            generation: ticket.generation,
            settings: self.settings,
            ambience: self.ambience,
            page: self.nav.page().render(),
            tutor: self.tutor.clone(),
        }
    }
}

fn fetches(stamped: Vec<(Ticket, Request)>) -> Vec<Cmd> {
    stamped
        .into_iter()
        .map(|(ticket, request)| Cmd::Fetch { ticket, request })
        .collect()
}
