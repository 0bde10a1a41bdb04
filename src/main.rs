//! Road Rush headless runner
//!
//! Drives one run with a simple autopilot through the fixed-timestep loop,
//! routing events to audio and persistence, then prints the result.
//!
//! Usage: `road-rush [--store PATH] [--max-seconds N] [--tuning PATH] [--seed N]`

use std::path::PathBuf;

use clap::Parser;
use road_rush::audio::{AudioDirector, LogBackend};
use road_rush::consts::*;
use road_rush::garage;
use road_rush::persistence::{JsonFileStore, MemoryStore, Store};
use road_rush::sim::{GameEvent, GameState, RunSummary, TickInput, tick};
use road_rush::{Profile, Settings, Tuning};

const DEFAULT_STORE: &str = "road_rush_save.json";
const DEFAULT_MAX_SECONDS: f64 = 120.0;
/// Simulated display refresh; deliberately off the tick rate
const FRAME_DT: f64 = 1.0 / 45.0;
/// How far ahead of the car the autopilot looks (points)
const LOOKAHEAD: f32 = 260.0;
/// Autopilot drag per tick (points)
const STEER_STEP: f32 = 6.0;

#[derive(Debug, Parser)]
#[command(name = "road-rush", version)]
#[command(about = "Drive one headless Road Rush run with the autopilot")]
struct Args {
    /// JSON file holding the high score, wallet and preferences
    #[arg(long, default_value = DEFAULT_STORE)]
    store: PathBuf,

    /// Stop the run after this many simulated seconds
    #[arg(long, default_value_t = DEFAULT_MAX_SECONDS, value_parser = parse_seconds)]
    max_seconds: f64,

    /// Balance overrides (JSON); missing fields keep their defaults
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Fixed RNG seed instead of a random one
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_seconds(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("must be a positive number of seconds (got {s})"))
    }
}

fn load_tuning(path: Option<&PathBuf>) -> Tuning {
    let Some(path) = path else {
        return Tuning::default();
    };
    match std::fs::read_to_string(path) {
        Ok(json) => Tuning::from_json_or_default(&json),
        Err(e) => {
            log::warn!("Could not read {}: {e}; using default tuning", path.display());
            Tuning::default()
        }
    }
}

/// One run plus the collaborators fed from its events
struct Game<'a, S: Store> {
    state: GameState,
    accumulator: f64,
    audio: AudioDirector<LogBackend>,
    profile: Profile,
    store: &'a mut S,
    summary: Option<RunSummary>,
}

impl<'a, S: Store> Game<'a, S> {
    fn new(store: &'a mut S, tuning: Tuning, seed: Option<u64>) -> Self {
        let settings = Settings::load(&*store);
        let profile = Profile::load(&*store);
        let car = garage::driveable_car(&settings, &*store);
        let state = match seed {
            Some(seed) => GameState::new(seed, tuning, &profile, car),
            None => GameState::start(tuning, &profile, car),
        };
        Self {
            state,
            accumulator: 0.0,
            audio: AudioDirector::new(LogBackend, &settings),
            profile,
            store,
            summary: None,
        }
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, dt: f64) {
        self.accumulator += dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = autopilot(&self.state);
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
            self.dispatch_events();
            if self.state.is_game_over() {
                self.accumulator = 0.0;
                break;
            }
        }
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            self.audio.handle(&event);
            if let Err(e) = self.profile.record(&event, &mut *self.store) {
                log::warn!("Failed to persist progress: {e}");
            }
            match &event {
                GameEvent::SpeedIncreased { base_speed } => {
                    log::debug!("Speed up to {base_speed:.0} pt/s");
                }
                GameEvent::BiomeCommitted { biome, .. } => {
                    log::debug!("Now driving through {biome:?}");
                }
                GameEvent::GameOver(summary) => self.summary = Some(*summary),
                _ => {}
            }
        }
    }
}

/// Steer toward the closest lane with nothing ahead of the car
fn autopilot(state: &GameState) -> TickInput {
    let car = &state.car;
    let lanes = &state.lanes;
    let lane_blocked = |lane: usize| {
        let x = lanes.lane_center(lane);
        let half_w = lanes.lane_width() / 2.0;
        state.world.obstacles.iter().any(|o| {
            let ahead = o.pos.y - o.size.y / 2.0 - (car.pos.y + car.size.y / 2.0);
            (o.pos.x - x).abs() < o.size.x / 2.0 + half_w
                && ahead < LOOKAHEAD
                && o.pos.y + o.size.y / 2.0 > car.pos.y - car.size.y / 2.0
        })
    };

    let current = ((car.pos.x / lanes.lane_width()) as usize).min(lanes.lane_count() - 1);
    let target = (0..lanes.lane_count())
        .filter(|&lane| !lane_blocked(lane))
        .min_by_key(|&lane| lane.abs_diff(current))
        .unwrap_or(current);

    let dx = lanes.lane_center(target) - car.pos.x;
    if dx.abs() < 1.0 {
        TickInput::default()
    } else {
        TickInput::drag(dx.clamp(-STEER_STEP, STEER_STEP))
    }
}

fn run<S: Store>(store: &mut S, tuning: Tuning, args: &Args) -> Option<RunSummary> {
    let max_seconds = args.max_seconds;
    let mut game = Game::new(store, tuning, args.seed);
    game.dispatch_events();

    let mut elapsed = 0.0;
    while !game.state.is_game_over() && elapsed < max_seconds {
        game.update(FRAME_DT);
        elapsed += FRAME_DT;
    }

    if game.summary.is_none() {
        log::info!("Time limit reached after {max_seconds:.0}s");
    }
    game.summary
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Road Rush (headless) starting...");

    let args = Args::parse();
    let tuning = load_tuning(args.tuning.as_ref());

    let result = match JsonFileStore::open(&args.store) {
        Ok(mut store) => run(&mut store, tuning, &args),
        Err(e) => {
            log::warn!(
                "Could not open {}: {e}; progress will not be saved",
                args.store.display()
            );
            run(&mut MemoryStore::new(), tuning, &args)
        }
    };

    match result {
        Some(summary) => {
            println!("Game over: score {}", summary.score);
            println!("Best: {}", summary.high_score);
            if summary.new_record {
                println!("New record!");
            }
            println!("Currency earned: {}", summary.currency_earned);
        }
        None => println!("Still driving when time ran out"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation core is a library on the web; the host drives `tick`
}
