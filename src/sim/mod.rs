//! Simulation core
//!
//! All gameplay logic lives here:
//! - Fixed timestep only, one `tick` per frame in a fixed order
//! - Owned RNG (seedable for tests)
//! - No rendering, audio or storage dependencies; side effects leave as `GameEvent`s

pub mod biome;
pub mod collision;
pub mod entity;
pub mod lanes;
pub mod motion;
pub mod run;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timers;
pub mod transition;

pub use biome::{BIOMES, Biome, BiomeKind, RoadTexture};
pub use collision::{BodyRef, BroadPhase, Contact, ContactDetector, resolve_contact};
pub use entity::{Collectible, CollectibleKind, Drift, Obstacle, ObstacleKind, PowerupKind};
pub use lanes::LaneGrid;
pub use run::{RunPhase, RunState, RunSummary};
pub use state::{Car, GameEvent, GameState, RoadSegment, World};
pub use tick::{TickInput, tick, tick_with};
pub use timers::{Scheduler, TaskKind};
pub use transition::{BiomeTransition, TransitionPhase};
