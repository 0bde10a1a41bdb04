//! Audio routing
//!
//! Maps run events onto fire-and-forget sound effects and per-biome ambient
//! tracks. Playback itself belongs to an `AudioBackend`; the director only
//! decides what to play and honors the player's mute toggles.

use crate::settings::Settings;
use crate::sim::biome::{self, BiomeKind};
use crate::sim::{GameEvent, PowerupKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Coin or cash picked up
    Coin,
    /// Shield picked up
    Shield,
    /// Shield ran out
    ShieldOff,
    /// Shield spent on an obstacle
    ShieldedBlock,
    /// Boost picked up
    Boost,
    /// Unshielded collision
    Crash,
    /// Menu button
    Click,
    /// Garage purchase
    Buy,
    /// Garage purchase refused
    NotEnoughMoney,
}

impl SoundEffect {
    /// Asset file for this effect
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundEffect::Coin => "coin.wav",
            SoundEffect::Shield => "shield.wav",
            SoundEffect::ShieldOff => "shield_off.wav",
            SoundEffect::ShieldedBlock => "shielded_block.wav",
            SoundEffect::Boost => "boost.wav",
            SoundEffect::Crash => "crash.wav",
            SoundEffect::Click => "click.wav",
            SoundEffect::Buy => "buy.wav",
            SoundEffect::NotEnoughMoney => "not_enough_money.wav",
        }
    }
}

/// Effect for a run event, if it has one
pub fn effect_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::CurrencyCollected { .. } => Some(SoundEffect::Coin),
        GameEvent::PowerupCollected { kind, .. } => Some(match kind {
            PowerupKind::Shield => SoundEffect::Shield,
            PowerupKind::Boost => SoundEffect::Boost,
        }),
        GameEvent::ShieldBroken { .. } => Some(SoundEffect::ShieldedBlock),
        GameEvent::ShieldExpired { .. } => Some(SoundEffect::ShieldOff),
        GameEvent::Crash { .. } => Some(SoundEffect::Crash),
        _ => None,
    }
}

/// Playback side (asset loading and mixing live behind this)
pub trait AudioBackend {
    fn play_effect(&mut self, effect: SoundEffect);
    fn crossfade_ambient(&mut self, track: &'static str);
    fn stop_ambient(&mut self);
}

/// Backend that only logs what would play
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play_effect(&mut self, effect: SoundEffect) {
        log::debug!("play {}", effect.file_name());
    }

    fn crossfade_ambient(&mut self, track: &'static str) {
        log::debug!("ambient -> {track}");
    }

    fn stop_ambient(&mut self) {
        log::debug!("ambient stopped");
    }
}

/// Routes events to a backend
pub struct AudioDirector<B: AudioBackend> {
    backend: B,
    sound_effects: bool,
    music: bool,
    ambient: Option<&'static str>,
}

impl<B: AudioBackend> AudioDirector<B> {
    pub fn new(backend: B, settings: &Settings) -> Self {
        Self {
            backend,
            sound_effects: settings.sound_effects,
            music: settings.music,
            ambient: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Track currently playing
    pub fn ambient(&self) -> Option<&'static str> {
        self.ambient
    }

    /// Pick up toggles changed mid-session
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sound_effects = settings.sound_effects;
        if self.music && !settings.music && self.ambient.take().is_some() {
            self.backend.stop_ambient();
        }
        self.music = settings.music;
    }

    pub fn play(&mut self, effect: SoundEffect) {
        if self.sound_effects {
            self.backend.play_effect(effect);
        }
    }

    /// Cross-fade to the biome's track unless it is already playing
    pub fn play_biome(&mut self, kind: BiomeKind) {
        if !self.music {
            return;
        }
        let track = biome::biome(biome::index_of(kind)).music;
        if self.ambient == Some(track) {
            return;
        }
        self.ambient = Some(track);
        self.backend.crossfade_ambient(track);
    }

    pub fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::RunStarted { biome } => self.play_biome(*biome),
            GameEvent::BiomeCommitted { biome, .. } => self.play_biome(*biome),
            other => {
                if let Some(effect) = effect_for(other) {
                    self.play(effect);
                }
            }
        }
    }
}
