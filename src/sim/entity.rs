//! Live entities on the track
//!
//! Collectibles (coins, cash, powerups) and obstacles each live in their own
//! collection on the world, addressed by a run-unique id.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::biome::Biome;
use crate::consts::{COLLECTIBLE_SIZE, OBSTACLE_BASE_LENGTH, OBSTACLE_WIDTH_FILL};

/// Contact category bits reported to the broad-phase detector
pub mod category {
    pub const CAR: u32 = 1 << 0;
    pub const COIN: u32 = 1 << 1;
    pub const OBSTACLE: u32 = 1 << 2;
    pub const CASH: u32 = 1 << 3;
    pub const POWERUP: u32 = 1 << 4;
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    Shield,
    Boost,
}

/// Anything the car can pick up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Coin,
    /// Worth five coins
    Cash,
    Powerup(PowerupKind),
}

impl CollectibleKind {
    /// Score and currency awarded on pickup
    pub fn value(&self) -> u64 {
        match self {
            CollectibleKind::Coin => 1,
            CollectibleKind::Cash => 5,
            CollectibleKind::Powerup(_) => 0,
        }
    }

    pub fn category(&self) -> u32 {
        match self {
            CollectibleKind::Coin => category::COIN,
            CollectibleKind::Cash => category::CASH,
            CollectibleKind::Powerup(_) => category::POWERUP,
        }
    }

    pub fn texture(&self) -> &'static str {
        match self {
            CollectibleKind::Coin => "coin",
            CollectibleKind::Cash => "cash",
            CollectibleKind::Powerup(PowerupKind::Shield) => "shield",
            CollectibleKind::Powerup(PowerupKind::Boost) => "boost",
        }
    }
}

/// A collectible entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    pub lane: usize,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Collectible {
    pub fn new(id: u32, kind: CollectibleKind, lane: usize, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            lane,
            pos,
            size: Vec2::splat(COLLECTIBLE_SIZE),
        }
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    SmallObstacle,
    SmallCar,
    Truck,
    Log,
    WideTruck,
    Boulder,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 6] = [
        ObstacleKind::SmallObstacle,
        ObstacleKind::SmallCar,
        ObstacleKind::Truck,
        ObstacleKind::Log,
        ObstacleKind::WideTruck,
        ObstacleKind::Boulder,
    ];

    pub fn width_in_lanes(&self) -> usize {
        match self {
            ObstacleKind::SmallObstacle | ObstacleKind::SmallCar | ObstacleKind::Truck => 1,
            ObstacleKind::WideTruck => 2,
            ObstacleKind::Log | ObstacleKind::Boulder => 3,
        }
    }

    pub fn length_multiplier(&self) -> f32 {
        match self {
            ObstacleKind::SmallObstacle => 1.4,
            ObstacleKind::SmallCar => 1.8,
            ObstacleKind::Truck => 4.0,
            ObstacleKind::Log => 1.0,
            ObstacleKind::WideTruck | ObstacleKind::Boulder => 3.0,
        }
    }

    pub fn speed_multiplier(&self) -> f32 {
        match self {
            ObstacleKind::SmallObstacle => 0.6,
            ObstacleKind::SmallCar => 0.38,
            ObstacleKind::Truck => 0.5,
            ObstacleKind::Log | ObstacleKind::WideTruck | ObstacleKind::Boulder => 0.7692,
        }
    }

    /// Scrolls at exactly road speed instead of the offset formula
    pub fn moves_with_road(&self) -> bool {
        matches!(
            self,
            ObstacleKind::Log | ObstacleKind::WideTruck | ObstacleKind::Boulder
        )
    }

    /// Texture for this kind in a biome, picking a random variant where several exist
    pub fn texture_name<R: Rng>(&self, biome: &Biome, rng: &mut R) -> String {
        let prefix = biome.texture_prefix;
        match self {
            ObstacleKind::SmallObstacle => {
                format!("{prefix}_small_obstacle{}", rng.random_range(1..=3))
            }
            ObstacleKind::SmallCar => format!("{prefix}_car{}", rng.random_range(1..=4)),
            ObstacleKind::Truck => format!("{prefix}_truck{}", rng.random_range(1..=4)),
            ObstacleKind::Log => format!("{prefix}_log"),
            ObstacleKind::WideTruck => format!("{prefix}_widetruck"),
            ObstacleKind::Boulder => format!("{prefix}_boulder"),
        }
    }

    /// Footprint for a lane width
    pub fn size(&self, lane_width: f32) -> Vec2 {
        Vec2::new(
            lane_width * self.width_in_lanes() as f32 * OBSTACLE_WIDTH_FILL,
            OBSTACLE_BASE_LENGTH * self.length_multiplier(),
        )
    }
}

/// Lateral drift direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Drift {
    Left,
    Right,
}

impl Drift {
    pub fn sign(&self) -> f32 {
        match self {
            Drift::Left => -1.0,
            Drift::Right => 1.0,
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            Drift::Left => Drift::Right,
            Drift::Right => Drift::Left,
        }
    }
}

/// An obstacle entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub start_lane: usize,
    pub pos: Vec2,
    pub size: Vec2,
    /// Per-instance speed multiplier (zeroed by a pile-up)
    pub speed_multiplier: f32,
    /// Only drifting logs carry a direction
    pub drift: Option<Drift>,
    /// Sprite is flipped horizontally
    pub mirrored: bool,
    /// Frozen by an obstacle/obstacle contact
    pub piled_up: bool,
    pub texture: String,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, start_lane: usize, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            kind,
            start_lane,
            pos,
            size,
            speed_multiplier: kind.speed_multiplier(),
            drift: None,
            mirrored: false,
            piled_up: false,
            texture: String::new(),
        }
    }

    /// Attach a drift direction; only logs drift
    pub fn with_drift(mut self, drift: Drift) -> Self {
        if self.kind == ObstacleKind::Log {
            self.drift = Some(drift);
            self.mirrored = drift == Drift::Left;
        }
        self
    }

    pub fn with_texture(mut self, texture: String) -> Self {
        self.texture = texture;
        self
    }

    pub fn width_in_lanes(&self) -> usize {
        self.kind.width_in_lanes()
    }

    /// Freeze after hitting another obstacle. Idempotent.
    pub fn pile_up(&mut self) {
        self.speed_multiplier = 0.0;
        self.drift = None;
        self.piled_up = true;
    }

    /// Set drift heading and keep the sprite facing it
    pub fn set_drift(&mut self, drift: Drift) {
        self.drift = Some(drift);
        self.mirrored = drift == Drift::Left;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_kinds_move_with_road() {
        assert!(ObstacleKind::Log.moves_with_road());
        assert!(ObstacleKind::WideTruck.moves_with_road());
        assert!(ObstacleKind::Boulder.moves_with_road());
        assert!(!ObstacleKind::SmallCar.moves_with_road());
        assert!(!ObstacleKind::Truck.moves_with_road());
    }

    #[test]
    fn test_drift_only_on_logs() {
        let truck = Obstacle::new(1, ObstacleKind::Truck, 2, Vec2::ZERO, Vec2::ONE)
            .with_drift(Drift::Left);
        assert_eq!(truck.drift, None);

        let log = Obstacle::new(2, ObstacleKind::Log, 0, Vec2::ZERO, Vec2::ONE)
            .with_drift(Drift::Left);
        assert_eq!(log.drift, Some(Drift::Left));
        assert!(log.mirrored);
    }

    #[test]
    fn test_pile_up_is_idempotent() {
        let mut log = Obstacle::new(3, ObstacleKind::Log, 0, Vec2::ZERO, Vec2::ONE)
            .with_drift(Drift::Right);
        log.pile_up();
        log.pile_up();
        assert_eq!(log.speed_multiplier, 0.0);
        assert_eq!(log.drift, None);
        assert!(log.piled_up);
    }

    #[test]
    fn test_cash_worth_five_coins() {
        assert_eq!(CollectibleKind::Cash.value(), 5 * CollectibleKind::Coin.value());
        assert_eq!(CollectibleKind::Powerup(PowerupKind::Boost).value(), 0);
    }

    #[test]
    fn test_obstacle_size_scales_with_lanes() {
        let size = ObstacleKind::Boulder.size(65.0);
        assert!((size.x - 65.0 * 3.0 * 0.8).abs() < 1e-4);
        assert_eq!(size.y, 150.0);
    }
}
