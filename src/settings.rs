//! Player preferences
//!
//! A snapshot read from the store when a run starts, so the core never
//! reaches into the store on its own.

use serde::{Deserialize, Serialize};

use crate::persistence::{PersistError, Scalar, Store, keys};

/// Car every player owns
pub const DEFAULT_CAR: &str = "car";

/// Preference snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Play sound effects
    pub sound_effects: bool,
    /// Play ambient biome tracks
    pub music: bool,
    /// Garage car driven this run
    pub selected_car: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_effects: true,
            music: true,
            selected_car: DEFAULT_CAR.to_string(),
        }
    }
}

impl Settings {
    /// Read preferences; stored flags are "disabled" flags, so absent means on
    pub fn load(store: &impl Store) -> Self {
        Self {
            sound_effects: !store.get_bool(keys::SOUND_EFFECTS_DISABLED),
            music: !store.get_bool(keys::MUSIC_DISABLED),
            selected_car: store
                .get_text(keys::SELECTED_CAR)
                .unwrap_or_else(|| DEFAULT_CAR.to_string()),
        }
    }

    pub fn save(&self, store: &mut impl Store) -> Result<(), PersistError> {
        store.set(keys::SOUND_EFFECTS_DISABLED, Scalar::Bool(!self.sound_effects))?;
        store.set(keys::MUSIC_DISABLED, Scalar::Bool(!self.music))?;
        store.set(keys::SELECTED_CAR, Scalar::Text(self.selected_car.clone()))?;
        log::info!("Settings saved");
        Ok(())
    }

    pub fn toggle_sound_effects(&mut self) {
        self.sound_effects = !self.sound_effects;
    }

    pub fn toggle_music(&mut self) {
        self.music = !self.music;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_when_store_empty() {
        let settings = Settings::load(&MemoryStore::new());
        assert_eq!(settings, Settings::default());
        assert!(settings.sound_effects);
        assert!(settings.music);
        assert_eq!(settings.selected_car, DEFAULT_CAR);
    }

    #[test]
    fn test_disabled_flags_round_trip() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        settings.toggle_music();
        settings.selected_car = "car4".into();
        settings.save(&mut store).unwrap();

        assert!(store.get_bool(keys::MUSIC_DISABLED));
        assert!(!store.get_bool(keys::SOUND_EFFECTS_DISABLED));
        assert_eq!(Settings::load(&store), settings);
    }
}
