//! Biome transition manager
//!
//! `Stable -> Transitioning` when the change interval has elapsed. While
//! transitioning, the first road segment to wrap gets the cross-fade texture;
//! the next wrap commits the new biome. Pairs without a cross-fade commit on
//! the first wrap.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::biome::{self, BIOMES, Biome, RoadTexture};

/// Lifecycle of one biome cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionPhase {
    Stable,
    Transitioning,
}

/// What a wrapping road segment should show, and whether the biome committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapResult {
    pub texture: RoadTexture,
    /// New current biome index when this wrap committed the transition
    pub committed: Option<usize>,
}

/// Biome transition state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiomeTransition {
    pub current: usize,
    pub next: usize,
    pub transitioning: bool,
    /// Cross-fade segment already handed out this cycle
    pub segment_placed: bool,
    pub last_change: f64,
    pub interval: f64,
}

impl BiomeTransition {
    pub fn new(start_biome: usize, now: f64, interval: f64) -> Self {
        let current = start_biome.min(BIOMES.len() - 1);
        Self {
            current,
            next: current,
            transitioning: false,
            segment_placed: false,
            last_change: now,
            interval,
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        if self.transitioning {
            TransitionPhase::Transitioning
        } else {
            TransitionPhase::Stable
        }
    }

    pub fn current_biome(&self) -> &'static Biome {
        biome::biome(self.current)
    }

    pub fn next_biome(&self) -> &'static Biome {
        biome::biome(self.next)
    }

    /// Whether a new transition should begin at `now`
    pub fn is_due(&self, now: f64) -> bool {
        !self.transitioning && now - self.last_change > self.interval
    }

    /// Enter `Transitioning` and draw the next biome. Returns its index.
    pub fn begin<R: Rng>(&mut self, now: f64, rng: &mut R) -> usize {
        self.transitioning = true;
        self.segment_placed = false;
        self.last_change = now;
        self.next = pick_next_biome(self.current, rng);
        self.next
    }

    /// A road segment wrapped to the top; decide its texture
    pub fn on_segment_wrap(&mut self) -> WrapResult {
        if !self.transitioning {
            return WrapResult {
                texture: self.current_biome().road_texture(),
                committed: None,
            };
        }

        if !self.segment_placed {
            if let Some(texture) = self.current_biome().transition_texture(self.next_biome()) {
                self.segment_placed = true;
                return WrapResult {
                    texture,
                    committed: None,
                };
            }
        }

        let texture = self.next_biome().road_texture();
        let committed = self.commit();
        WrapResult {
            texture,
            committed: Some(committed),
        }
    }

    /// Make the next biome current and return to `Stable`
    fn commit(&mut self) -> usize {
        self.current = self.next;
        self.transitioning = false;
        self.segment_placed = false;
        self.current
    }

    /// Abandon an in-flight transition (run ended)
    pub fn abort(&mut self) {
        self.transitioning = false;
        self.segment_placed = false;
        self.next = self.current;
    }
}

/// Draw a biome other than `current` that may legally follow it
pub fn pick_next_biome<R: Rng>(current: usize, rng: &mut R) -> usize {
    let from = biome::biome(current).kind;
    loop {
        let candidate = rng.random_range(0..BIOMES.len());
        if candidate != current && !biome::incompatible(from, BIOMES[candidate].kind) {
            return candidate;
        }
    }
}
