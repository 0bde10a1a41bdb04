//! Game state and core simulation types
//!
//! Everything a run owns lives here: the live entity sets, the car, the
//! scrolling road, run and biome state, the RNG and outgoing events.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::biome::{BiomeKind, RoadTexture};
use super::collision::BroadPhase;
use super::entity::{Collectible, CollectibleKind, Obstacle, PowerupKind};
use super::lanes::LaneGrid;
use super::run::{RunState, RunSummary};
use super::transition::BiomeTransition;
use crate::consts::*;
use crate::profile::Profile;
use crate::tuning::Tuning;

/// Events emitted during a tick.
/// The presentation layer drains these for effects, sound and persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted {
        biome: BiomeKind,
    },
    CurrencyCollected {
        kind: CollectibleKind,
        pos: Vec2,
        value: u64,
        total_currency: u64,
    },
    PowerupCollected {
        kind: PowerupKind,
        pos: Vec2,
    },
    /// Shield spent on an obstacle
    ShieldBroken {
        pos: Vec2,
    },
    /// Shield ran out on its own
    ShieldExpired {
        pos: Vec2,
    },
    BoostEnded,
    SpeedIncreased {
        base_speed: f32,
    },
    RoadTextureChanged {
        segment: usize,
        texture: RoadTexture,
    },
    BiomeTransitionStarted {
        from: BiomeKind,
        to: BiomeKind,
    },
    BiomeCommitted {
        biome: BiomeKind,
        color: [f32; 4],
    },
    TireSmoke {
        pos: Vec2,
    },
    PileUp {
        a: u32,
        b: u32,
    },
    Crash {
        pos: Vec2,
    },
    GameOver(RunSummary),
}

/// The player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    pub pos: Vec2,
    pub size: Vec2,
    /// Visual tilt (radians), derived from drag velocity
    pub tilt: f32,
    pub touching: bool,
    /// Cosmetic id chosen in the garage
    pub skin: String,
}

impl Car {
    pub fn new(track_width: f32, skin: &str) -> Self {
        Self {
            pos: Vec2::new(track_width / 2.0, CAR_Y),
            size: Vec2::new(CAR_WIDTH, CAR_HEIGHT),
            tilt: 0.0,
            touching: false,
            skin: skin.to_string(),
        }
    }
}

/// One tile of the scrolling road (anchored at its bottom edge)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    pub y: f32,
    pub texture: RoadTexture,
}

/// Live entities, kept per category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    pub collectibles: Vec<Collectible>,
    pub obstacles: Vec<Obstacle>,
}

impl World {
    pub fn collectible(&self, id: u32) -> Option<&Collectible> {
        self.collectibles.iter().find(|c| c.id == id)
    }

    pub fn obstacle(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn obstacle_mut(&mut self, id: u32) -> Option<&mut Obstacle> {
        self.obstacles.iter_mut().find(|o| o.id == id)
    }

    pub fn take_collectible(&mut self, id: u32) -> Option<Collectible> {
        let idx = self.collectibles.iter().position(|c| c.id == id)?;
        Some(self.collectibles.swap_remove(idx))
    }

    pub fn take_obstacle(&mut self, id: u32) -> Option<Obstacle> {
        let idx = self.obstacles.iter().position(|o| o.id == id)?;
        Some(self.obstacles.swap_remove(idx))
    }

    pub fn len(&self) -> usize {
        self.collectibles.len() + self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub lanes: LaneGrid,
    /// Track height (points)
    pub track_height: f32,
    /// Simulation clock (seconds since run start)
    pub time: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub car: Car,
    pub road: Vec<RoadSegment>,
    pub world: World,
    pub run: RunState,
    pub biome: BiomeTransition,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    pub(crate) broad_phase: BroadPhase,
    pub(crate) last_smoke: f64,
    next_id: u32,
}

impl GameState {
    /// Start a run with an explicit seed. Invalid tuning is replaced by defaults.
    pub fn new(seed: u64, tuning: Tuning, profile: &Profile, skin: &str) -> Self {
        let tuning = tuning.validated_or_default();
        let lanes = LaneGrid::new(TRACK_WIDTH, LANE_COUNT);
        let biome = BiomeTransition::new(0, 0.0, tuning.biome_change_interval);
        let texture = biome.current_biome().road_texture();
        let road = (0..ROAD_SEGMENTS)
            .map(|i| RoadSegment {
                y: TRACK_HEIGHT * i as f32,
                texture,
            })
            .collect();

        let mut run = RunState::new(profile, &tuning);
        run.start(0.0, &tuning);

        log::info!(
            "Run started (seed {seed}, best {}, wallet {})",
            run.high_score,
            run.total_currency
        );

        Self {
            car: Car::new(lanes.track_width(), skin),
            lanes,
            track_height: TRACK_HEIGHT,
            time: 0.0,
            time_ticks: 0,
            road,
            world: World::default(),
            events: vec![GameEvent::RunStarted {
                biome: biome.current_biome().kind,
            }],
            biome,
            run,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            broad_phase: BroadPhase::default(),
            last_smoke: f64::NEG_INFINITY,
            next_id: 1,
        }
    }

    /// Start a run with a fresh random seed
    pub fn start(tuning: Tuning, profile: &Profile, skin: &str) -> Self {
        Self::new(rand::random(), tuning, profile, skin)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_game_over(&self) -> bool {
        self.run.is_game_over()
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Offset speed multiplier of the active biome
    pub fn biome_obstacle_speed(&self) -> f32 {
        self.biome.current_biome().obstacle_speed
    }
}
