//! Run state machine
//!
//! Scoring, currency, speed progression and powerup timers for a single run.
//! `GameOver` is terminal: a new run builds a fresh `RunState`.

use serde::{Deserialize, Serialize};

use super::timers::{Scheduler, TaskKind};
use crate::profile::Profile;
use crate::tuning::Tuning;

/// Currency earned per speed step
pub const CURRENCY_PER_SPEED_STEP: u64 = 10;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Playing,
    GameOver,
}

/// Outcome reported once when the run ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub high_score: u64,
    pub new_record: bool,
    pub currency_earned: u64,
}

/// Per-run counters and timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub phase: RunPhase,
    pub score: u64,
    /// Lifetime currency (persists across runs)
    pub total_currency: u64,
    /// Currency earned in this run only
    pub run_currency: u64,
    /// Best score (persists, raised only on game over)
    pub high_score: u64,
    pub base_speed: f32,
    pub current_speed: f32,
    pub shield_active: bool,
    pub shield_expires_at: Option<f64>,
    pub boost_active: bool,
    pub boost_expires_at: Option<f64>,
    /// Pending spawn and expiry tasks
    pub tasks: Scheduler,
}

impl RunState {
    pub fn new(profile: &Profile, tuning: &Tuning) -> Self {
        Self {
            phase: RunPhase::Playing,
            score: 0,
            total_currency: profile.total_currency,
            run_currency: 0,
            high_score: profile.high_score,
            base_speed: tuning.base_scroll_speed,
            current_speed: tuning.base_scroll_speed,
            shield_active: false,
            shield_expires_at: None,
            boost_active: false,
            boost_expires_at: None,
            tasks: Scheduler::new(),
        }
    }

    /// Start the repeating spawn timers
    pub fn start(&mut self, now: f64, tuning: &Tuning) {
        self.tasks
            .schedule_repeating(TaskKind::CoinSpawn, now, tuning.coin_spawn_interval);
        self.tasks
            .schedule_repeating(TaskKind::ObstacleSpawn, now, tuning.obstacle_spawn_interval);
    }

    pub fn is_playing(&self) -> bool {
        self.phase == RunPhase::Playing
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == RunPhase::GameOver
    }

    /// Award a pickup worth `value`. Returns how many speed steps it triggered.
    pub fn collect(&mut self, value: u64, tuning: &Tuning) -> u64 {
        if !self.is_playing() || value == 0 {
            return 0;
        }
        let before = self.run_currency / CURRENCY_PER_SPEED_STEP;
        self.score += value;
        self.total_currency += value;
        self.run_currency += value;
        let steps = self.run_currency / CURRENCY_PER_SPEED_STEP - before;

        if steps > 0 {
            self.base_speed += tuning.speed_increment * steps as f32;
            if !self.boost_active {
                self.current_speed = self.base_speed;
            } else {
                self.current_speed = self.base_speed + tuning.boost_speed_offset;
            }
        }
        steps
    }

    /// Turn the shield on, replacing any pending expiry
    pub fn activate_shield(&mut self, now: f64, tuning: &Tuning) {
        self.shield_active = true;
        self.shield_expires_at = Some(now + tuning.shield_duration);
        self.tasks
            .schedule_once(TaskKind::ShieldExpiry, now, tuning.shield_duration);
    }

    /// Spend the shield on an obstacle. Returns false if no shield was up.
    pub fn absorb_hit(&mut self) -> bool {
        if !self.shield_active {
            return false;
        }
        self.clear_shield();
        true
    }

    /// Timed shield expiry. Returns false if the shield was already gone.
    pub fn expire_shield(&mut self) -> bool {
        if !self.shield_active {
            return false;
        }
        self.clear_shield();
        true
    }

    fn clear_shield(&mut self) {
        self.shield_active = false;
        self.shield_expires_at = None;
        self.tasks.cancel(TaskKind::ShieldExpiry);
    }

    /// Boost road speed, replacing any pending expiry
    pub fn activate_boost(&mut self, now: f64, tuning: &Tuning) {
        self.boost_active = true;
        self.boost_expires_at = Some(now + tuning.boost_duration);
        self.current_speed = self.base_speed + tuning.boost_speed_offset;
        self.tasks
            .schedule_once(TaskKind::BoostExpiry, now, tuning.boost_duration);
    }

    /// Timed boost expiry. Returns false if no boost was active.
    pub fn expire_boost(&mut self) -> bool {
        if !self.boost_active {
            return false;
        }
        self.boost_active = false;
        self.boost_expires_at = None;
        self.current_speed = self.base_speed;
        self.tasks.cancel(TaskKind::BoostExpiry);
        true
    }

    /// Stop obstacle spawning (biome transition in progress)
    pub fn suspend_obstacles(&mut self) {
        self.tasks.cancel(TaskKind::ObstacleSpawn);
    }

    /// Restart obstacle spawning after a transition commits
    pub fn resume_obstacles(&mut self, now: f64, tuning: &Tuning) {
        if self.is_playing() {
            self.tasks
                .schedule_repeating(TaskKind::ObstacleSpawn, now, tuning.obstacle_spawn_interval);
        }
    }

    /// Transition to `GameOver`. Only the first call has any effect.
    pub fn end(&mut self) -> Option<RunSummary> {
        if self.is_game_over() {
            return None;
        }
        self.phase = RunPhase::GameOver;
        self.tasks.cancel_all();
        self.shield_active = false;
        self.shield_expires_at = None;
        self.boost_active = false;
        self.boost_expires_at = None;
        self.current_speed = self.base_speed;

        let new_record = self.score > self.high_score;
        if new_record {
            self.high_score = self.score;
        }

        Some(RunSummary {
            score: self.score,
            high_score: self.high_score,
            new_record,
            currency_earned: self.run_currency,
        })
    }
}
