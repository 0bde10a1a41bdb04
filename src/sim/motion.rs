//! Kinematics for the road, entities and the car
//!
//! Everything scrolls toward the trailing edge (decreasing y). Speeds are in
//! points per second.

use super::entity::{Collectible, Obstacle};
use super::state::{Car, GameEvent, GameState};
use crate::tuning::Tuning;

/// Vertical speed of an obstacle for the current road speed
pub fn obstacle_speed(
    obstacle: &Obstacle,
    road_speed: f32,
    biome_multiplier: f32,
    tuning: &Tuning,
) -> f32 {
    if obstacle.speed_multiplier <= 0.0 || obstacle.kind.moves_with_road() {
        road_speed
    } else {
        (road_speed + tuning.obstacle_speed_offset) * biome_multiplier * obstacle.speed_multiplier
    }
}

/// Scroll road segments and recycle any that left the track
pub fn scroll_road(state: &mut GameState, dt: f32) {
    let height = state.track_height;
    let span = height * state.road.len() as f32;
    let step = state.run.current_speed * dt;

    for segment in 0..state.road.len() {
        state.road[segment].y -= step;
        if state.road[segment].y >= -height {
            continue;
        }
        state.road[segment].y += span;

        let wrap = state.biome.on_segment_wrap();
        if state.road[segment].texture != wrap.texture {
            state.road[segment].texture = wrap.texture;
            state.events.push(GameEvent::RoadTextureChanged {
                segment,
                texture: wrap.texture,
            });
        }

        if wrap.committed.is_some() {
            let biome = state.biome.current_biome();
            log::info!("Entered {} biome", biome.name);
            state.events.push(GameEvent::BiomeCommitted {
                biome: biome.kind,
                color: biome.color,
            });
            state.run.resume_obstacles(state.time, &state.tuning);
        }
    }
}

/// Scroll pickups at road speed and drop those past the trailing edge
pub fn move_collectibles(collectibles: &mut Vec<Collectible>, road_speed: f32, dt: f32) {
    for c in collectibles.iter_mut() {
        c.pos.y -= road_speed * dt;
    }
    collectibles.retain(|c| c.pos.y >= -c.size.y);
}

/// Move obstacles (scroll plus drift) and drop those past the trailing edge.
/// Drifting only happens while `drift_enabled` (the desert biome is current).
pub fn move_obstacles(
    obstacles: &mut Vec<Obstacle>,
    road_speed: f32,
    biome_multiplier: f32,
    drift_enabled: bool,
    track_width: f32,
    tuning: &Tuning,
    dt: f32,
) {
    for o in obstacles.iter_mut() {
        o.pos.y -= obstacle_speed(o, road_speed, biome_multiplier, tuning) * dt;

        if drift_enabled && o.speed_multiplier > 0.0 {
            if let Some(drift) = o.drift {
                o.pos.x += drift.sign() * tuning.drift_speed * dt;
                let half = o.size.x / 2.0;
                if o.pos.x + half > track_width {
                    o.pos.x = track_width - half;
                    o.set_drift(drift.flipped());
                } else if o.pos.x - half < 0.0 {
                    o.pos.x = half;
                    o.set_drift(drift.flipped());
                }
            }
        }
    }
    obstacles.retain(|o| o.pos.y >= -o.size.y);
}

/// Apply drag input to the car and relax tilt when released.
/// Returns true when the car was dragged this tick.
pub fn steer_car(
    car: &mut Car,
    touching: bool,
    drag_dx: f32,
    track_width: f32,
    tuning: &Tuning,
    dt: f32,
) -> bool {
    car.touching = touching;

    if touching && drag_dx != 0.0 {
        let half = car.size.x / 2.0;
        car.pos.x = (car.pos.x + drag_dx).clamp(half, track_width - half);
        car.tilt = (-drag_dx * tuning.tilt_per_point).clamp(-tuning.max_tilt, tuning.max_tilt);
        return true;
    }

    if !touching {
        let relax = tuning.tilt_return_speed * dt;
        car.tilt = if car.tilt > 0.0 {
            (car.tilt - relax).max(0.0)
        } else {
            (car.tilt + relax).min(0.0)
        };
    }
    false
}
