//! Cosmetic car catalog
//!
//! Cars are bought with lifetime currency. A purchase debits the wallet, sets
//! the unlock flag and selects the car. Free cars are always owned.

use thiserror::Error;

use crate::audio::SoundEffect;
use crate::persistence::{PersistError, Scalar, Store, keys};
use crate::profile::Profile;
use crate::settings::Settings;

/// A car in the garage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarModel {
    pub name: &'static str,
    pub price: u64,
}

pub const CARS: [CarModel; 12] = [
    CarModel { name: "car", price: 0 },
    CarModel { name: "car2", price: 200 },
    CarModel { name: "car3", price: 400 },
    CarModel { name: "car4", price: 600 },
    CarModel { name: "car5", price: 800 },
    CarModel { name: "car6", price: 1000 },
    CarModel { name: "car7", price: 1200 },
    CarModel { name: "car8", price: 1400 },
    CarModel { name: "car9", price: 1600 },
    CarModel { name: "car10", price: 1800 },
    CarModel { name: "car11", price: 2000 },
    CarModel { name: "car12", price: 2200 },
];

#[derive(Debug, Error)]
pub enum GarageError {
    #[error("Unknown car: {0}")]
    UnknownCar(String),
    #[error("Not enough currency for {car}: costs {price}, have {available}")]
    InsufficientFunds {
        car: &'static str,
        price: u64,
        available: u64,
    },
    #[error("Car {0} is locked")]
    Locked(&'static str),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Outcome of choosing a car
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purchase {
    /// Already owned, just selected
    Selected,
    /// Bought and selected
    Bought { price: u64 },
}

pub fn find(name: &str) -> Option<&'static CarModel> {
    CARS.iter().find(|c| c.name == name)
}

pub fn is_unlocked(store: &impl Store, car: &CarModel) -> bool {
    car.price == 0 || store.get_bool(&keys::car_unlocked(car.name))
}

/// Select `name`, buying it first when it is still locked
pub fn purchase(
    name: &str,
    profile: &mut Profile,
    settings: &mut Settings,
    store: &mut impl Store,
) -> Result<Purchase, GarageError> {
    let car = find(name).ok_or_else(|| GarageError::UnknownCar(name.to_string()))?;

    if is_unlocked(&*store, car) {
        select(car, settings, store)?;
        return Ok(Purchase::Selected);
    }

    if profile.total_currency < car.price {
        return Err(GarageError::InsufficientFunds {
            car: car.name,
            price: car.price,
            available: profile.total_currency,
        });
    }

    profile.total_currency -= car.price;
    store.set(keys::TOTAL_COINS, Scalar::Int(profile.total_currency))?;
    store.set(&keys::car_unlocked(car.name), Scalar::Bool(true))?;
    select(car, settings, store)?;
    log::info!("Bought {} for {}", car.name, car.price);
    Ok(Purchase::Bought { price: car.price })
}

fn select(
    car: &'static CarModel,
    settings: &mut Settings,
    store: &mut impl Store,
) -> Result<(), GarageError> {
    if !is_unlocked(&*store, car) {
        return Err(GarageError::Locked(car.name));
    }
    settings.selected_car = car.name.to_string();
    store.set(keys::SELECTED_CAR, Scalar::Text(car.name.to_string()))?;
    Ok(())
}

/// Sound for the outcome of a garage tap
pub fn purchase_sound(result: &Result<Purchase, GarageError>) -> Option<SoundEffect> {
    match result {
        Ok(Purchase::Selected) => Some(SoundEffect::Click),
        Ok(Purchase::Bought { .. }) => Some(SoundEffect::Buy),
        Err(GarageError::InsufficientFunds { .. }) => Some(SoundEffect::NotEnoughMoney),
        Err(_) => None,
    }
}

/// Car to drive: the selected one if it is still owned, else the free car
pub fn driveable_car(settings: &Settings, store: &impl Store) -> &'static str {
    match find(&settings.selected_car) {
        Some(car) if is_unlocked(store, car) => car.name,
        _ => CARS[0].name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_catalog_prices() {
        assert_eq!(CARS.len(), 12);
        for (i, car) in CARS.iter().enumerate() {
            assert_eq!(car.price, i as u64 * 200);
        }
    }

    #[test]
    fn test_free_car_always_owned() {
        let store = MemoryStore::new();
        assert!(is_unlocked(&store, &CARS[0]));
        assert!(!is_unlocked(&store, &CARS[1]));
    }

    #[test]
    fn test_purchase_debits_and_selects() {
        let mut store = MemoryStore::new();
        let mut profile = Profile {
            high_score: 0,
            total_currency: 450,
        };
        let mut settings = Settings::default();

        let result = purchase("car3", &mut profile, &mut settings, &mut store).unwrap();
        assert_eq!(result, Purchase::Bought { price: 400 });
        assert_eq!(profile.total_currency, 50);
        assert_eq!(store.get_u64(keys::TOTAL_COINS), 50);
        assert!(store.get_bool("car_car3_unlocked"));
        assert_eq!(settings.selected_car, "car3");
        assert_eq!(store.get_text(keys::SELECTED_CAR).as_deref(), Some("car3"));

        // Owned now: choosing it again is free
        let again = purchase("car3", &mut profile, &mut settings, &mut store).unwrap();
        assert_eq!(again, Purchase::Selected);
        assert_eq!(profile.total_currency, 50);
    }

    #[test]
    fn test_insufficient_funds_leaves_state() {
        let mut store = MemoryStore::new();
        let mut profile = Profile {
            high_score: 0,
            total_currency: 199,
        };
        let mut settings = Settings::default();
        let err = purchase("car2", &mut profile, &mut settings, &mut store).unwrap_err();
        assert!(matches!(
            err,
            GarageError::InsufficientFunds {
                price: 200,
                available: 199,
                ..
            }
        ));
        assert_eq!(profile.total_currency, 199);
        assert_eq!(settings.selected_car, "car");
        assert!(store.is_empty());
    }

    #[test]
    fn test_unknown_car() {
        let mut store = MemoryStore::new();
        let mut profile = Profile::default();
        let mut settings = Settings::default();
        assert!(matches!(
            purchase("hovercraft", &mut profile, &mut settings, &mut store),
            Err(GarageError::UnknownCar(_))
        ));
    }

    #[test]
    fn test_purchase_sounds() {
        let mut store = MemoryStore::new();
        let mut profile = Profile {
            high_score: 0,
            total_currency: 250,
        };
        let mut settings = Settings::default();

        let bought = purchase("car2", &mut profile, &mut settings, &mut store);
        assert_eq!(purchase_sound(&bought), Some(SoundEffect::Buy));
        let selected = purchase("car", &mut profile, &mut settings, &mut store);
        assert_eq!(purchase_sound(&selected), Some(SoundEffect::Click));
        let broke = purchase("car12", &mut profile, &mut settings, &mut store);
        assert_eq!(purchase_sound(&broke), Some(SoundEffect::NotEnoughMoney));
        let unknown = purchase("bus", &mut profile, &mut settings, &mut store);
        assert_eq!(purchase_sound(&unknown), None);
    }

    #[test]
    fn test_driveable_falls_back_when_locked() {
        let store = MemoryStore::new();
        let settings = Settings {
            selected_car: "car9".into(),
            ..Settings::default()
        };
        assert_eq!(driveable_car(&settings, &store), "car");
    }
}
