//! Named scalar persistence
//!
//! The core only ever reads and writes a handful of scalars (best score,
//! lifetime currency, unlock flags, selected car, audio toggles). `Store` is the
//! narrow interface for that; `MemoryStore` backs tests and `JsonFileStore`
//! keeps a versioned JSON envelope on disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Well-known keys
pub mod keys {
    pub const HIGH_SCORE: &str = "highScore";
    pub const TOTAL_COINS: &str = "totalCoins";
    pub const SELECTED_CAR: &str = "selectedCar";
    pub const SOUND_EFFECTS_DISABLED: &str = "soundEffectsDisabled";
    pub const MUSIC_DISABLED: &str = "musicDisabled";

    /// Unlock flag for a garage car
    pub fn car_unlocked(name: &str) -> String {
        format!("car_{name}_unlocked")
    }
}

/// Current on-disk envelope version
pub const STORE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported store version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

/// A stored value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(u64),
    Text(String),
}

impl Scalar {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Scalar::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// Get/set of named scalars
pub trait Store {
    fn get(&self, key: &str) -> Option<Scalar>;
    fn set(&mut self, key: &str, value: Scalar) -> Result<(), PersistError>;

    /// Integer value, 0 when missing or mistyped
    fn get_u64(&self, key: &str) -> u64 {
        self.get(key).and_then(|v| v.as_u64()).unwrap_or(0)
    }

    /// Flag value, false when missing or mistyped
    fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    fn get_text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|v| v.as_text().map(str::to_string))
    }
}

/// Volatile store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, Scalar>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<Scalar> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Scalar) -> Result<(), PersistError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    values: BTreeMap<String, Scalar>,
}

/// JSON file store, rewritten through a temp file on every set
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, Scalar>,
}

impl JsonFileStore {
    /// Open `path`, starting empty if the file does not exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let text = fs::read_to_string(&path)?;
            let envelope: Envelope = serde_json::from_str(&text)?;
            if envelope.version != STORE_VERSION {
                return Err(PersistError::UnsupportedVersion {
                    found: envelope.version,
                    expected: STORE_VERSION,
                });
            }
            log::info!("Loaded {} stored values from {}", envelope.values.len(), path.display());
            envelope.values
        } else {
            log::info!("No store at {}, starting fresh", path.display());
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<(), PersistError> {
        let envelope = Envelope {
            version: STORE_VERSION,
            values: self.values.clone(),
        };
        let json = serde_json::to_string_pretty(&envelope)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Store for JsonFileStore {
    fn get(&self, key: &str) -> Option<Scalar> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Scalar) -> Result<(), PersistError> {
        if self.values.get(key) == Some(&value) {
            return Ok(());
        }
        self.values.insert(key.to_string(), value);
        self.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("road_rush_{name}_{}.json", std::process::id()))
    }

    #[test]
    fn test_memory_store_defaults() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_u64(keys::HIGH_SCORE), 0);
        assert!(!store.get_bool(keys::MUSIC_DISABLED));
        assert_eq!(store.get_text(keys::SELECTED_CAR), None);

        store.set(keys::HIGH_SCORE, Scalar::Int(12)).unwrap();
        assert_eq!(store.get_u64(keys::HIGH_SCORE), 12);
        // Mistyped reads fall back
        assert!(!store.get_bool(keys::HIGH_SCORE));
    }

    #[test]
    fn test_unlock_key_format() {
        assert_eq!(keys::car_unlocked("car7"), "car_car7_unlocked");
    }

    #[test]
    fn test_scalar_json_shape() {
        let json = serde_json::to_string(&vec![
            Scalar::Bool(true),
            Scalar::Int(5),
            Scalar::Text("car2".into()),
        ])
        .unwrap();
        assert_eq!(json, r#"[true,5,"car2"]"#);
        let back: Vec<Scalar> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[1], Scalar::Int(5));
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let path = temp_path("reopen");
        let _ = fs::remove_file(&path);

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set(keys::TOTAL_COINS, Scalar::Int(250)).unwrap();
        store
            .set(keys::SELECTED_CAR, Scalar::Text("car3".into()))
            .unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get_u64(keys::TOTAL_COINS), 250);
        assert_eq!(reopened.get_text(keys::SELECTED_CAR).as_deref(), Some("car3"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_rejects_unknown_version() {
        let path = temp_path("version");
        fs::write(&path, r#"{"version":99,"values":{}}"#).unwrap();
        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(
            err,
            PersistError::UnsupportedVersion { found: 99, .. }
        ));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_reports_corruption() {
        let path = temp_path("corrupt");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            JsonFileStore::open(&path),
            Err(PersistError::Json(_))
        ));
        let _ = fs::remove_file(&path);
    }
}
