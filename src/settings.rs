//! Player settings and preferences
//!
//! Persisted as one opaque blob, separate from high scores.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistError};
use crate::platform::Storage;

/// Particle cap when effects are enabled
const MAX_PARTICLES: usize = 400;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound effects on/off
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Visual Effects ===
    /// Particle bursts on food and death
    pub particles: bool,
    /// Draw grid lines under the playfield
    pub show_grid: bool,

    // === Accessibility ===
    /// Reduced motion (no particle bursts)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,

            particles: true,
            show_grid: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "canvas_arcade_settings";

    /// Volume actually applied to sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.sound {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Effective particles (respects reduced_motion)
    pub fn particles_enabled(&self) -> bool {
        self.particles && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if self.particles_enabled() {
            MAX_PARTICLES
        } else {
            0
        }
    }

    /// Load settings, falling back to defaults when absent or unreadable
    pub fn load(storage: &dyn Storage) -> Self {
        let settings = persistence::load_or_default(storage, Self::STORAGE_KEY);
        log::info!("Settings loaded");
        settings
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), PersistError> {
        persistence::save(storage, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
