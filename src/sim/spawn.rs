//! Spawn director
//!
//! Decides what enters the track, in which lane, and how often. Lane choice
//! for obstacles is constrained per biome so no layout is impossible to dodge.

use glam::Vec2;
use rand::Rng;

use super::biome::BiomeKind;
use super::entity::{Collectible, CollectibleKind, Drift, Obstacle, ObstacleKind, PowerupKind};
use super::lanes::LaneGrid;
use super::state::GameState;
use crate::consts::COLLECTIBLE_SIZE;

/// Where an obstacle may start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanePolicy {
    /// One of a fixed set (filtered to legal lanes), else `fallback`
    Fixed {
        lanes: &'static [usize],
        fallback: usize,
    },
    /// Any legal start lane
    Any,
    /// Any lane except the two outermost
    Interior,
}

/// Map a 1..=100 roll onto the obstacle distribution (25/30/20/10/10/5)
pub fn obstacle_kind_for_roll(roll: u32) -> ObstacleKind {
    match roll {
        0..=25 => ObstacleKind::SmallObstacle,
        26..=55 => ObstacleKind::SmallCar,
        56..=75 => ObstacleKind::Truck,
        76..=85 => ObstacleKind::Log,
        86..=95 => ObstacleKind::WideTruck,
        _ => ObstacleKind::Boulder,
    }
}

pub fn choose_obstacle_kind<R: Rng>(rng: &mut R) -> ObstacleKind {
    obstacle_kind_for_roll(rng.random_range(1..=100))
}

/// Placement rule for an obstacle kind in a biome
pub fn lane_policy(biome: BiomeKind, kind: ObstacleKind) -> LanePolicy {
    use ObstacleKind::*;

    match (biome, kind) {
        (BiomeKind::Winter, WideTruck) => LanePolicy::Fixed {
            lanes: &[0, 4],
            fallback: 0,
        },
        (BiomeKind::Winter, Boulder) => LanePolicy::Fixed {
            lanes: &[0, 3],
            fallback: 0,
        },
        (BiomeKind::Winter, _) => LanePolicy::Any,
        (BiomeKind::Forest, Truck) => LanePolicy::Fixed {
            lanes: &[2, 3],
            fallback: 2,
        },
        (BiomeKind::Forest, WideTruck | Boulder) => LanePolicy::Fixed {
            lanes: &[0, 3, 4, 5],
            fallback: 0,
        },
        (BiomeKind::Desert, WideTruck) => LanePolicy::Fixed {
            lanes: &[0, 4],
            fallback: 0,
        },
        (BiomeKind::Highway, _) => LanePolicy::Any,
        (_, SmallCar | Truck) => LanePolicy::Interior,
        _ => LanePolicy::Any,
    }
}

/// Pick a start lane so the whole span stays on the track
pub fn choose_start_lane<R: Rng>(
    biome: BiomeKind,
    kind: ObstacleKind,
    lanes: &LaneGrid,
    rng: &mut R,
) -> usize {
    let max = lanes.max_start_lane(kind.width_in_lanes());

    match lane_policy(biome, kind) {
        LanePolicy::Fixed {
            lanes: allowed,
            fallback,
        } => {
            let legal: Vec<usize> = allowed.iter().copied().filter(|&l| l <= max).collect();
            if legal.is_empty() {
                fallback.min(max)
            } else {
                legal[rng.random_range(0..legal.len())]
            }
        }
        LanePolicy::Any => rng.random_range(0..=max),
        LanePolicy::Interior => {
            let hi = lanes.lane_count().saturating_sub(2).min(max);
            if hi < 1 {
                1.min(max)
            } else {
                rng.random_range(1..=hi)
            }
        }
    }
}

/// Spawn point just past the leading edge for an entity of `height`
fn entry_y(state: &GameState, height: f32) -> f32 {
    state.track_height + height
}

fn push_collectible(state: &mut GameState, kind: CollectibleKind) -> u32 {
    let lane = state.rng.random_range(0..state.lanes.lane_count());
    let pos = Vec2::new(
        state.lanes.lane_center(lane),
        entry_y(state, COLLECTIBLE_SIZE),
    );
    let id = state.next_entity_id();
    state
        .world
        .collectibles
        .push(Collectible::new(id, kind, lane, pos));
    id
}

/// Drop a coin (or, occasionally, cash) into a random lane
pub fn spawn_coin_or_cash(state: &mut GameState) -> Option<u32> {
    if state.is_game_over() {
        return None;
    }
    let kind = if state.rng.random_bool(state.tuning.cash_chance) {
        CollectibleKind::Cash
    } else {
        CollectibleKind::Coin
    };
    Some(push_collectible(state, kind))
}

/// Attempt a powerup spawn; most attempts are gated away
pub fn spawn_powerup(state: &mut GameState) -> Option<u32> {
    if state.is_game_over() {
        return None;
    }
    if !state.rng.random_bool(state.tuning.powerup_spawn_gate) {
        return None;
    }
    let kind = if state.rng.random_bool(0.5) {
        PowerupKind::Shield
    } else {
        PowerupKind::Boost
    };
    let id = push_collectible(state, CollectibleKind::Powerup(kind));
    log::debug!("Spawned {kind:?} powerup #{id}");
    Some(id)
}

/// Spawn one obstacle, unless the run is over or the biome is changing
pub fn spawn_obstacle(state: &mut GameState) -> Option<u32> {
    if state.is_game_over() || state.biome.transitioning {
        return None;
    }

    let kind = choose_obstacle_kind(&mut state.rng);
    let biome = state.biome.current_biome();
    let start_lane = choose_start_lane(biome.kind, kind, &state.lanes, &mut state.rng);

    let size = kind.size(state.lanes.lane_width());
    let pos = Vec2::new(
        state.lanes.span_center(start_lane, kind.width_in_lanes()),
        entry_y(state, size.y),
    );
    let texture = kind.texture_name(biome, &mut state.rng);

    let id = state.next_entity_id();
    let mut obstacle = Obstacle::new(id, kind, start_lane, pos, size).with_texture(texture);
    if biome.kind == BiomeKind::Desert && kind == ObstacleKind::Log {
        let drift = if state.rng.random_bool(0.5) {
            Drift::Right
        } else {
            Drift::Left
        };
        obstacle = obstacle.with_drift(drift);
    }

    log::debug!(
        "Spawned {kind:?} #{id} at lane {start_lane} in {}",
        biome.name
    );
    state.world.obstacles.push(obstacle);
    Some(id)
}
