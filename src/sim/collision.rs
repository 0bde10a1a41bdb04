//! Contact detection and resolution
//!
//! Broad-phase detection only reports which bodies started touching; the
//! narrow-phase policy below decides what each contact means for the run.
//! Any detector that yields `Contact`s (e.g. an external physics engine) can
//! drive `resolve_contact`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::entity::{CollectibleKind, PowerupKind, category};
use super::state::{Car, GameEvent, GameState, World};
use crate::rects_overlap;

/// A body taking part in a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BodyRef {
    Car,
    Collectible(u32),
    Obstacle(u32),
}

/// A contact-begin event between two bodies (stored in canonical order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contact {
    pub a: BodyRef,
    pub b: BodyRef,
}

impl Contact {
    pub fn new(a: BodyRef, b: BodyRef) -> Self {
        if a <= b { Self { a, b } } else { Self { a: b, b: a } }
    }
}

/// Whether bodies of these categories report contacts with each other
pub fn reports_contact(a: u32, b: u32) -> bool {
    contact_test_mask(a) & b != 0 || contact_test_mask(b) & a != 0
}

fn contact_test_mask(cat: u32) -> u32 {
    match cat {
        category::CAR => {
            category::COIN | category::OBSTACLE | category::CASH | category::POWERUP
        }
        category::COIN | category::CASH | category::POWERUP => category::CAR,
        category::OBSTACLE => category::CAR | category::OBSTACLE,
        _ => 0,
    }
}

/// Source of contact-begin events for a tick
pub trait ContactDetector {
    fn detect(&mut self, car: &Car, world: &World) -> Vec<Contact>;
}

/// Rectangle-overlap detector reporting each pair once per continuous touch
#[derive(Debug, Clone, Default)]
pub struct BroadPhase {
    touching: HashSet<Contact>,
}

impl ContactDetector for BroadPhase {
    fn detect(&mut self, car: &Car, world: &World) -> Vec<Contact> {
        let mut now_touching = HashSet::new();

        for c in &world.collectibles {
            if reports_contact(category::CAR, c.kind.category())
                && rects_overlap(car.pos, car.size, c.pos, c.size)
            {
                now_touching.insert(Contact::new(BodyRef::Car, BodyRef::Collectible(c.id)));
            }
        }

        for (i, o) in world.obstacles.iter().enumerate() {
            if rects_overlap(car.pos, car.size, o.pos, o.size) {
                now_touching.insert(Contact::new(BodyRef::Car, BodyRef::Obstacle(o.id)));
            }
            for other in &world.obstacles[i + 1..] {
                if reports_contact(category::OBSTACLE, category::OBSTACLE)
                    && rects_overlap(o.pos, o.size, other.pos, other.size)
                {
                    now_touching.insert(Contact::new(
                        BodyRef::Obstacle(o.id),
                        BodyRef::Obstacle(other.id),
                    ));
                }
            }
        }

        let mut began: Vec<Contact> = now_touching
            .iter()
            .filter(|c| !self.touching.contains(c))
            .copied()
            .collect();
        // HashSet order is arbitrary; resolve car contacts first, then by id
        began.sort_by_key(|c| (c.a, c.b));

        self.touching = now_touching;
        began
    }
}

/// Apply every contact in order
pub fn resolve_contacts(state: &mut GameState, contacts: &[Contact]) {
    for contact in contacts {
        resolve_contact(state, *contact);
    }
}

/// Narrow-phase policy for one contact
pub fn resolve_contact(state: &mut GameState, contact: Contact) {
    if state.is_game_over() {
        return;
    }

    match (contact.a, contact.b) {
        (BodyRef::Car, BodyRef::Collectible(id)) => collect(state, id),
        (BodyRef::Car, BodyRef::Obstacle(id)) => car_hits_obstacle(state, id),
        (BodyRef::Obstacle(a), BodyRef::Obstacle(b)) if a != b => pile_up(state, a, b),
        _ => {}
    }
}

fn collect(state: &mut GameState, id: u32) {
    let Some(item) = state.world.take_collectible(id) else {
        return;
    };

    match item.kind {
        CollectibleKind::Coin | CollectibleKind::Cash => {
            let value = item.kind.value();
            let steps = state.run.collect(value, &state.tuning);
            state.events.push(GameEvent::CurrencyCollected {
                kind: item.kind,
                pos: item.pos,
                value,
                total_currency: state.run.total_currency,
            });
            if steps > 0 {
                state.events.push(GameEvent::SpeedIncreased {
                    base_speed: state.run.base_speed,
                });
            }
        }
        CollectibleKind::Powerup(kind) => {
            match kind {
                PowerupKind::Shield => state.run.activate_shield(state.time, &state.tuning),
                PowerupKind::Boost => state.run.activate_boost(state.time, &state.tuning),
            }
            state
                .events
                .push(GameEvent::PowerupCollected { kind, pos: item.pos });
        }
    }
}

fn car_hits_obstacle(state: &mut GameState, id: u32) {
    if state.world.obstacle(id).is_none() {
        return;
    }

    if state.run.absorb_hit() {
        state.world.take_obstacle(id);
        state.events.push(GameEvent::ShieldBroken { pos: state.car.pos });
        log::debug!("Shield absorbed obstacle #{id}");
    } else {
        game_over(state);
    }
}

fn pile_up(state: &mut GameState, a: u32, b: u32) {
    let mut hit = false;
    for id in [a, b] {
        if let Some(obstacle) = state.world.obstacle_mut(id) {
            obstacle.pile_up();
            hit = true;
        }
    }
    if hit {
        log::debug!("Pile-up between #{a} and #{b}");
        state.events.push(GameEvent::PileUp { a, b });
    }
}

/// End the run. Later calls are no-ops.
pub fn game_over(state: &mut GameState) {
    let Some(summary) = state.run.end() else {
        return;
    };
    state.biome.abort();
    state.events.push(GameEvent::Crash { pos: state.car.pos });
    state.events.push(GameEvent::GameOver(summary));

    if summary.new_record {
        log::info!("Game over - new best score {}", summary.score);
    } else {
        log::info!(
            "Game over - score {} (best {})",
            summary.score,
            summary.high_score
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;
    use crate::sim::entity::{Collectible, Obstacle, ObstacleKind};
    use crate::sim::run::RunPhase;
    use crate::sim::timers::TaskKind;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn state() -> GameState {
        let mut state = GameState::new(11, Tuning::default(), &Profile::default(), "car");
        state.drain_events();
        state
    }

    fn add_obstacle(state: &mut GameState, kind: ObstacleKind, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        let size = kind.size(state.lanes.lane_width());
        state
            .world
            .obstacles
            .push(Obstacle::new(id, kind, 0, pos, size));
        id
    }

    fn add_collectible(state: &mut GameState, kind: CollectibleKind) -> u32 {
        let id = state.next_entity_id();
        let pos = state.car.pos;
        state
            .world
            .collectibles
            .push(Collectible::new(id, kind, 0, pos));
        id
    }

    #[test]
    fn test_contact_canonical_order() {
        let c1 = Contact::new(BodyRef::Obstacle(3), BodyRef::Car);
        let c2 = Contact::new(BodyRef::Car, BodyRef::Obstacle(3));
        assert_eq!(c1, c2);
        assert_eq!(c1.a, BodyRef::Car);
    }

    #[test]
    fn test_category_masks() {
        assert!(reports_contact(category::CAR, category::COIN));
        assert!(reports_contact(category::OBSTACLE, category::OBSTACLE));
        assert!(!reports_contact(category::COIN, category::OBSTACLE));
        assert!(!reports_contact(category::COIN, category::CASH));
    }

    #[test]
    fn test_coin_and_cash_award() {
        let mut state = state();
        let coin = add_collectible(&mut state, CollectibleKind::Coin);
        let cash = add_collectible(&mut state, CollectibleKind::Cash);
        resolve_contact(&mut state, Contact::new(BodyRef::Car, BodyRef::Collectible(coin)));
        resolve_contact(&mut state, Contact::new(BodyRef::Car, BodyRef::Collectible(cash)));
        assert_eq!(state.run.score, 6);
        assert_eq!(state.run.total_currency, 6);
        assert!(state.world.collectibles.is_empty());

        // Repeat contact on a consumed coin is ignored
        resolve_contact(&mut state, Contact::new(BodyRef::Car, BodyRef::Collectible(coin)));
        assert_eq!(state.run.score, 6);
    }

    #[test]
    fn test_shield_absorbs_obstacle() {
        let mut state = state();
        let shield = add_collectible(&mut state, CollectibleKind::Powerup(PowerupKind::Shield));
        resolve_contact(&mut state, Contact::new(BodyRef::Car, BodyRef::Collectible(shield)));
        assert!(state.run.shield_active);

        let pos = state.car.pos;
        let id = add_obstacle(&mut state, ObstacleKind::Truck, pos);
        resolve_contact(&mut state, Contact::new(BodyRef::Car, BodyRef::Obstacle(id)));

        assert!(!state.run.shield_active);
        assert!(!state.run.tasks.is_scheduled(TaskKind::ShieldExpiry));
        assert!(state.world.obstacle(id).is_none());
        assert_eq!(state.run.phase, RunPhase::Playing);
        assert_eq!(state.run.score, 0);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::ShieldBroken { .. }))
        );
    }

    #[test]
    fn test_unshielded_hit_ends_run_once() {
        let mut state = state();
        let pos = state.car.pos;
        let a = add_obstacle(&mut state, ObstacleKind::SmallCar, pos);
        let b = add_obstacle(&mut state, ObstacleKind::SmallObstacle, pos);
        resolve_contact(&mut state, Contact::new(BodyRef::Car, BodyRef::Obstacle(a)));
        resolve_contact(&mut state, Contact::new(BodyRef::Car, BodyRef::Obstacle(b)));

        assert!(state.is_game_over());
        let game_overs = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver(_)))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_boost_pickup_raises_speed() {
        let mut state = state();
        let boost = add_collectible(&mut state, CollectibleKind::Powerup(PowerupKind::Boost));
        resolve_contact(&mut state, Contact::new(BodyRef::Car, BodyRef::Collectible(boost)));
        assert!(state.run.boost_active);
        assert_eq!(
            state.run.current_speed,
            state.run.base_speed + state.tuning.boost_speed_offset
        );
    }

    #[test]
    fn test_pile_up_freezes_both() {
        let mut state = state();
        let a = add_obstacle(&mut state, ObstacleKind::Truck, Vec2::new(100.0, 500.0));
        let b = add_obstacle(&mut state, ObstacleKind::SmallCar, Vec2::new(100.0, 520.0));
        let contact = Contact::new(BodyRef::Obstacle(a), BodyRef::Obstacle(b));
        resolve_contact(&mut state, contact);
        resolve_contact(&mut state, contact);
        for id in [a, b] {
            let o = state.world.obstacle(id).unwrap();
            assert_eq!(o.speed_multiplier, 0.0);
            assert!(o.piled_up);
        }
    }

    #[test]
    fn test_broad_phase_reports_begin_only() {
        let mut state = state();
        let pos = state.car.pos;
        let id = add_obstacle(&mut state, ObstacleKind::Truck, pos);
        let mut bp = BroadPhase::default();
        let first = bp.detect(&state.car, &state.world);
        assert_eq!(first, vec![Contact::new(BodyRef::Car, BodyRef::Obstacle(id))]);
        assert!(bp.detect(&state.car, &state.world).is_empty());

        // Separate, then touch again
        state.world.obstacle_mut(id).unwrap().pos.y += 1000.0;
        assert!(bp.detect(&state.car, &state.world).is_empty());
        state.world.obstacle_mut(id).unwrap().pos.y -= 1000.0;
        assert_eq!(bp.detect(&state.car, &state.world).len(), 1);
    }

    #[test]
    fn test_broad_phase_ignores_collectible_pairs() {
        let mut state = state();
        add_collectible(&mut state, CollectibleKind::Coin);
        add_collectible(&mut state, CollectibleKind::Cash);
        // Both collectibles overlap each other but not the car
        state.car.pos.x = 10_000.0;
        let mut bp = BroadPhase::default();
        assert!(bp.detect(&state.car, &state.world).is_empty());
    }
}
