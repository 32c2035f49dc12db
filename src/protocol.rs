//! Public protocol structs for the JSON-lines driver (serde ready).
//! Keep this small and stable so renderers can evolve independently.

use serde::{Deserialize, Serialize};

use crate::app::{Msg, Snapshot};
use crate::domain::View;
use crate::pages::Intent;
use crate::settings::SettingsPatch;

/// Lines a renderer can send on stdin.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    Ping,
    Snapshot,
    Start,
    Navigate {
        view: View,
    },
    /// Partial settings: `{"type":"settings","isDarkMode":true}`.
    Settings(SettingsPatch),
    /// Page intent: `{"type":"page","action":"select_error","id":7}`.
    Page(Intent),
    SendChat {
        text: String,
    },
    ToggleTutor,
    ToggleTutorSize,
    Quit,
}

impl ClientCommand {
    /// The update message this command carries, if any.
    pub fn into_msg(self) -> Option<Msg> {
        match self {
            ClientCommand::Start => Some(Msg::Start),
            ClientCommand::Navigate { view } => Some(Msg::Navigate(view)),
            ClientCommand::Settings(patch) => Some(Msg::ChangeSettings(patch)),
            ClientCommand::Page(intent) => Some(Msg::Page(intent)),
            ClientCommand::SendChat { text } => Some(Msg::SendChat(text)),
            ClientCommand::ToggleTutor => Some(Msg::ToggleTutor),
            ClientCommand::ToggleTutorSize => Some(Msg::ToggleTutorSize),
            ClientCommand::Ping | ClientCommand::Snapshot | ClientCommand::Quit => None,
        }
    }
}

/// Lines the driver writes on stdout.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Pong,
    Snapshot { snapshot: Box<Snapshot> },
    Error { message: String },
}
