//! Fixed timestep simulation tick
//!
//! One tick runs, in order: due timers (spawns and powerup expiries), car
//! steering, road and entity motion, the biome clock, the opportunistic
//! powerup roll, then contact detection and resolution. All motion for a tick
//! lands before any contact is resolved.

use rand::Rng;

use super::biome::BiomeKind;
use super::collision::{ContactDetector, resolve_contacts};
use super::motion;
use super::spawn;
use super::state::{GameEvent, GameState};
use super::timers::TaskKind;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// A finger is on the screen
    pub touching: bool,
    /// Horizontal drag since the previous tick (points)
    pub drag_dx: f32,
}

impl TickInput {
    pub fn drag(dx: f32) -> Self {
        Self {
            touching: true,
            drag_dx: dx,
        }
    }
}

/// Advance the game state by one timestep using the built-in detector
pub fn tick(state: &mut GameState, input: &TickInput, dt: f64) {
    let mut detector = std::mem::take(&mut state.broad_phase);
    tick_with(state, input, dt, &mut detector);
    state.broad_phase = detector;
}

/// Advance the game state by one timestep with a caller-supplied detector
pub fn tick_with<D: ContactDetector>(
    state: &mut GameState,
    input: &TickInput,
    dt: f64,
    detector: &mut D,
) {
    // GameOver is terminal
    if state.is_game_over() {
        return;
    }

    state.time_ticks += 1;
    state.time += dt;
    let now = state.time;

    run_due_tasks(state, now);

    let step = dt as f32;
    let track_width = state.lanes.track_width();
    let dragged = motion::steer_car(
        &mut state.car,
        input.touching,
        input.drag_dx,
        track_width,
        &state.tuning,
        step,
    );
    if dragged && now - state.last_smoke > state.tuning.smoke_interval {
        state.last_smoke = now;
        state.events.push(GameEvent::TireSmoke { pos: state.car.pos });
    }

    motion::scroll_road(state, step);
    let speed = state.run.current_speed;
    motion::move_collectibles(&mut state.world.collectibles, speed, step);
    let biome_multiplier = state.biome_obstacle_speed();
    let drift_enabled = state.biome.current_biome().kind == BiomeKind::Desert;
    motion::move_obstacles(
        &mut state.world.obstacles,
        speed,
        biome_multiplier,
        drift_enabled,
        track_width,
        &state.tuning,
        step,
    );

    if state.biome.is_due(now) {
        let from = state.biome.current_biome().kind;
        state.biome.begin(now, &mut state.rng);
        state.run.suspend_obstacles();
        let to = state.biome.next_biome().kind;
        log::info!("Biome transition {from:?} -> {to:?}");
        state
            .events
            .push(GameEvent::BiomeTransitionStarted { from, to });
    }

    if state.rng.random_bool(state.tuning.powerup_roll_chance) {
        spawn::spawn_powerup(state);
    }

    let contacts = detector.detect(&state.car, &state.world);
    resolve_contacts(state, &contacts);
}

/// Dispatch timers that came due, in time order
fn run_due_tasks(state: &mut GameState, now: f64) {
    for task in state.run.tasks.take_due(now) {
        match task {
            TaskKind::CoinSpawn => {
                spawn::spawn_coin_or_cash(state);
            }
            TaskKind::ObstacleSpawn => {
                spawn::spawn_obstacle(state);
            }
            TaskKind::ShieldExpiry => {
                if state.run.expire_shield() {
                    state.events.push(GameEvent::ShieldExpired { pos: state.car.pos });
                }
            }
            TaskKind::BoostExpiry => {
                if state.run.expire_boost() {
                    state.events.push(GameEvent::BoostEnded);
                }
            }
        }
    }
}
