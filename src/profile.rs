//! Lifetime player counters
//!
//! Loaded from the store at run start; written back as run events report
//! currency changes and new best scores.

use serde::{Deserialize, Serialize};

use crate::persistence::{PersistError, Scalar, Store, keys};
use crate::sim::GameEvent;

/// Values that outlive a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Best score ever reached
    pub high_score: u64,
    /// Currency available to spend in the garage
    pub total_currency: u64,
}

impl Profile {
    pub fn load(store: &impl Store) -> Self {
        let profile = Self {
            high_score: store.get_u64(keys::HIGH_SCORE),
            total_currency: store.get_u64(keys::TOTAL_COINS),
        };
        log::info!(
            "Profile loaded (best {}, wallet {})",
            profile.high_score,
            profile.total_currency
        );
        profile
    }

    pub fn save(&self, store: &mut impl Store) -> Result<(), PersistError> {
        store.set(keys::HIGH_SCORE, Scalar::Int(self.high_score))?;
        store.set(keys::TOTAL_COINS, Scalar::Int(self.total_currency))?;
        Ok(())
    }

    /// Fold a run event into the profile, persisting what changed.
    /// Returns true if anything was written.
    pub fn record(&mut self, event: &GameEvent, store: &mut impl Store) -> Result<bool, PersistError> {
        match event {
            GameEvent::CurrencyCollected { total_currency, .. } => {
                self.total_currency = *total_currency;
                store.set(keys::TOTAL_COINS, Scalar::Int(self.total_currency))?;
                Ok(true)
            }
            GameEvent::GameOver(summary) if summary.new_record => {
                self.high_score = summary.high_score;
                store.set(keys::HIGH_SCORE, Scalar::Int(self.high_score))?;
                log::info!("New high score {} saved", self.high_score);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::RunSummary;
    use crate::sim::entity::CollectibleKind;
    use glam::Vec2;

    #[test]
    fn test_load_missing_is_zeroed() {
        let store = MemoryStore::new();
        assert_eq!(Profile::load(&store), Profile::default());
    }

    #[test]
    fn test_currency_written_on_collect() {
        let mut store = MemoryStore::new();
        let mut profile = Profile::default();
        let event = GameEvent::CurrencyCollected {
            kind: CollectibleKind::Cash,
            pos: Vec2::ZERO,
            value: 5,
            total_currency: 105,
        };
        assert!(profile.record(&event, &mut store).unwrap());
        assert_eq!(store.get_u64(keys::TOTAL_COINS), 105);
        assert_eq!(Profile::load(&store).total_currency, 105);
    }

    #[test]
    fn test_high_score_only_on_new_record() {
        let mut store = MemoryStore::new();
        let mut profile = Profile {
            high_score: 40,
            total_currency: 0,
        };
        let beaten = GameEvent::GameOver(RunSummary {
            score: 10,
            high_score: 40,
            new_record: false,
            currency_earned: 10,
        });
        assert!(!profile.record(&beaten, &mut store).unwrap());
        assert_eq!(store.get(keys::HIGH_SCORE), None);

        let record = GameEvent::GameOver(RunSummary {
            score: 55,
            high_score: 55,
            new_record: true,
            currency_earned: 55,
        });
        assert!(profile.record(&record, &mut store).unwrap());
        assert_eq!(store.get_u64(keys::HIGH_SCORE), 55);
    }

    #[test]
    fn test_unrelated_events_ignored() {
        let mut store = MemoryStore::new();
        let mut profile = Profile::default();
        assert!(!profile.record(&GameEvent::BoostEnded, &mut store).unwrap());
        assert!(store.is_empty());
    }
}
