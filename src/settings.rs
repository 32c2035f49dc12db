//! Process-wide presentation settings and the declarative effects they drive.
//!
//! `Settings` has exactly one writer: [`Settings::merge`], called from the
//! update loop. `Ambience` is recomputed from settings after every merge and
//! never feeds back into navigation or data loading.

use serde::{Deserialize, Serialize};
use tracing::info;

pub const NOISE_VOLUME: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub is_dark_mode: bool,
    pub show_particles: bool,
    pub play_noise: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            is_dark_mode: false,
            show_particles: true,
            play_noise: false,
        }
    }
}

/// Partial update: only the keys that changed are present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_dark_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_particles: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_noise: Option<bool>,
}

impl Settings {
    /// Field-by-field merge. Absent keys are left untouched.
    pub fn merge(&mut self, patch: &SettingsPatch) {
        if let Some(v) = patch.is_dark_mode {
            self.is_dark_mode = v;
        }
        if let Some(v) = patch.show_particles {
            self.show_particles = v;
        }
        if let Some(v) = patch.play_noise {
            self.play_noise = v;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Audio {
    Paused,
    Playing { volume: f32 },
}

/// Decorative layers the root keeps in sync with settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Ambience {
    pub theme: Theme,
    pub particles_mounted: bool,
    pub audio: Audio,
}

impl Ambience {
    pub fn from_settings(s: &Settings) -> Self {
        Self {
            theme: if s.is_dark_mode { Theme::Dark } else { Theme::Light },
            particles_mounted: s.show_particles,
            audio: if s.play_noise {
                Audio::Playing { volume: NOISE_VOLUME }
            } else {
                Audio::Paused
            },
        }
    }

    /// Move to the state implied by `s`, logging each layer that changed.
    pub fn sync(&mut self, s: &Settings) {
        let next = Self::from_settings(s);
        if next.theme != self.theme {
            info!(target: "lumina", theme = ?next.theme, "Theme switched");
        }
        if next.particles_mounted != self.particles_mounted {
            info!(target: "lumina", mounted = next.particles_mounted, "Particle background toggled");
        }
        if next.audio != self.audio {
            info!(target: "lumina", audio = ?next.audio, "Ambient audio toggled");
        }
        *self = next;
    }
}
