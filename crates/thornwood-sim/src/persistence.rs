//! Durable upgrade stats and the first-run flag.
//!
//! The simulation talks to storage through `KeyValueStore`; the app crate
//! supplies a file-backed implementation. Failures never reach the tick loop:
//! callers log them and carry on with defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use thornwood_core::constants::{HELP_SEEN_KEY, UPGRADES_KEY};
use thornwood_core::player::PlayerStats;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stored value under {key} has the wrong shape")]
    Malformed { key: String },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// String key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Volatile store for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The stats that survive between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedUpgrades {
    pub bullet_damage: f32,
    pub bullet_size: f32,
    /// Written for completeness; never restored.
    pub multishot: u32,
    pub knockback: f32,
    pub speed: f32,
    pub max_health: f32,
    pub passive_rate: u32,
    pub manual_rate: u32,
}

impl PersistedUpgrades {
    pub fn from_stats(stats: &PlayerStats) -> Self {
        Self {
            bullet_damage: stats.bullet_damage,
            bullet_size: stats.bullet_size,
            multishot: stats.multishot,
            knockback: stats.knockback,
            speed: stats.speed,
            max_health: stats.max_health,
            passive_rate: stats.passive_rate,
            manual_rate: stats.manual_rate,
        }
    }

    /// Read a stored record field by field. Anything missing or unusable
    /// falls back to the default stat.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let value: Value = serde_json::from_str(raw)?;
        let fields = value.as_object().ok_or_else(|| StoreError::Malformed {
            key: UPGRADES_KEY.to_string(),
        })?;
        let defaults = PlayerStats::default();

        Ok(Self {
            bullet_damage: positive(fields, "bulletDamage").unwrap_or(defaults.bullet_damage),
            bullet_size: positive(fields, "bulletSize").unwrap_or(defaults.bullet_size),
            multishot: defaults.multishot,
            knockback: non_negative(fields, "knockback").unwrap_or(defaults.knockback),
            speed: positive(fields, "speed").unwrap_or(defaults.speed),
            max_health: positive(fields, "maxHealth").unwrap_or(defaults.max_health),
            passive_rate: rate(fields, "passiveRate").unwrap_or(defaults.passive_rate),
            manual_rate: rate(fields, "manualRate").unwrap_or(defaults.manual_rate),
        })
    }

    /// Overwrite the persisted subset of `stats`. Multishot is earned per run.
    pub fn apply_to(&self, stats: &mut PlayerStats) {
        stats.bullet_damage = self.bullet_damage;
        stats.bullet_size = self.bullet_size;
        stats.knockback = self.knockback;
        stats.speed = self.speed;
        stats.max_health = self.max_health;
        stats.passive_rate = self.passive_rate;
        stats.manual_rate = self.manual_rate;
    }
}

fn finite(fields: &Map<String, Value>, name: &str) -> Option<f64> {
    fields.get(name).and_then(Value::as_f64).filter(|v| v.is_finite())
}

fn positive(fields: &Map<String, Value>, name: &str) -> Option<f32> {
    finite(fields, name).filter(|v| *v > 0.0).map(|v| v as f32)
}

fn non_negative(fields: &Map<String, Value>, name: &str) -> Option<f32> {
    finite(fields, name).filter(|v| *v >= 0.0).map(|v| v as f32)
}

fn rate(fields: &Map<String, Value>, name: &str) -> Option<u32> {
    finite(fields, name)
        .filter(|v| *v >= 1.0 && *v <= u32::MAX as f64)
        .map(|v| v.floor() as u32)
}

pub fn save_upgrades(store: &mut dyn KeyValueStore, stats: &PlayerStats) -> Result<(), StoreError> {
    let json = serde_json::to_string(&PersistedUpgrades::from_stats(stats))?;
    store.set(UPGRADES_KEY, &json)
}

pub fn load_upgrades(store: &dyn KeyValueStore) -> Result<Option<PersistedUpgrades>, StoreError> {
    match store.get(UPGRADES_KEY)? {
        Some(raw) => PersistedUpgrades::parse(&raw).map(Some),
        None => Ok(None),
    }
}

/// Defaults overlaid with whatever the store holds. Errors are logged.
pub fn restore_stats(store: &dyn KeyValueStore) -> PlayerStats {
    let mut stats = PlayerStats::default();
    match load_upgrades(store) {
        Ok(Some(saved)) => {
            saved.apply_to(&mut stats);
            tracing::debug!(?saved, "restored saved upgrades");
        }
        Ok(None) => {}
        Err(err) => tracing::warn!(%err, "ignoring saved upgrades"),
    }
    stats
}

pub fn help_seen(store: &dyn KeyValueStore) -> Result<bool, StoreError> {
    Ok(store.get(HELP_SEEN_KEY)?.is_some())
}

pub fn mark_help_seen(store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
    store.set(HELP_SEEN_KEY, "true")
}
