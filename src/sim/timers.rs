//! Scheduled task table
//!
//! Replaces keyed, cancelable timer actions. Each task kind holds at most one
//! entry; scheduling a kind again replaces the old entry, and a canceled or
//! replaced entry is gone from the table so it can never fire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Task kinds, fired in this order when due at the same instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskKind {
    CoinSpawn,
    ObstacleSpawn,
    ShieldExpiry,
    BoostExpiry,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct ScheduledTask {
    due: f64,
    /// Repeat period; one-shot when `None`
    every: Option<f64>,
}

/// Table of pending tasks keyed by kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    tasks: BTreeMap<TaskKind, ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire once at `now + delay`, replacing any pending task of this kind
    pub fn schedule_once(&mut self, kind: TaskKind, now: f64, delay: f64) {
        self.tasks.insert(
            kind,
            ScheduledTask {
                due: now + delay,
                every: None,
            },
        );
    }

    /// Fire now and then every `interval`, replacing any pending task of this kind
    pub fn schedule_repeating(&mut self, kind: TaskKind, now: f64, interval: f64) {
        self.tasks.insert(
            kind,
            ScheduledTask {
                due: now,
                every: Some(interval.max(f64::EPSILON)),
            },
        );
    }

    /// Drop a pending task. Returns whether one was pending.
    pub fn cancel(&mut self, kind: TaskKind) -> bool {
        self.tasks.remove(&kind).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_scheduled(&self, kind: TaskKind) -> bool {
        self.tasks.contains_key(&kind)
    }

    /// When the task of this kind fires next
    pub fn due_at(&self, kind: TaskKind) -> Option<f64> {
        self.tasks.get(&kind).map(|t| t.due)
    }

    /// Pop every firing due at or before `now`, in time order.
    ///
    /// Repeating tasks are rescheduled and may appear several times if `now`
    /// jumped over more than one period; one-shot tasks are removed.
    pub fn take_due(&mut self, now: f64) -> Vec<TaskKind> {
        let mut fired: Vec<(f64, TaskKind)> = Vec::new();
        let mut finished: Vec<TaskKind> = Vec::new();

        for (&kind, task) in self.tasks.iter_mut() {
            while task.due <= now {
                fired.push((task.due, kind));
                match task.every {
                    Some(every) => task.due += every,
                    None => {
                        finished.push(kind);
                        break;
                    }
                }
            }
        }

        for kind in finished {
            self.tasks.remove(&kind);
        }

        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        fired.into_iter().map(|(_, kind)| kind).collect()
    }
}
