//! Player stats and per-run player state.
//!
//! `PlayerStats` is everything an upgrade can change; `PlayerState` adds the
//! transient values the simulation mutates every tick.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::types::Position;

/// Upgradeable player attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub radius: f32,
    pub speed: f32,
    pub max_health: f32,
    /// Ticks between passive aura shots.
    pub passive_rate: u32,
    /// Ticks between manual shots.
    pub manual_rate: u32,
    pub aura_radius: f32,
    pub bullet_damage: f32,
    pub bullet_size: f32,
    pub multishot: u32,
    /// Extra knockback on top of the base impulse.
    pub knockback: f32,
    /// XP orb attraction radius.
    pub magnet_range: f32,
    pub projectile_speed: f32,
    /// Enemies each bullet can pass through.
    pub pierce: u32,
    pub explode: bool,
    pub orbiting_shield: bool,
    pub life_steal: bool,
    pub chain_lightning: bool,
    pub critical_strike: bool,
    pub level_up_invuln: bool,
    pub time_stop: bool,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            radius: PLAYER_RADIUS,
            speed: PLAYER_SPEED,
            max_health: PLAYER_MAX_HEALTH,
            passive_rate: PLAYER_PASSIVE_RATE,
            manual_rate: PLAYER_MANUAL_RATE,
            aura_radius: PLAYER_AURA_RADIUS,
            bullet_damage: PLAYER_BULLET_DAMAGE,
            bullet_size: PLAYER_BULLET_SIZE,
            multishot: PLAYER_MULTISHOT,
            knockback: PLAYER_KNOCKBACK,
            magnet_range: MAGNET_RANGE,
            projectile_speed: PLAYER_PROJECTILE_SPEED,
            pierce: 0,
            explode: false,
            orbiting_shield: false,
            life_steal: false,
            chain_lightning: false,
            critical_strike: false,
            level_up_invuln: false,
            time_stop: false,
        }
    }
}

/// The player during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Position,
    pub health: f32,
    /// Ticks until the aura may fire again. Never negative.
    pub passive_cooldown: u32,
    /// Ticks until a manual shot is allowed. Never negative.
    pub manual_cooldown: u32,
    pub stats: PlayerStats,
    /// Fire calls made this run (drives critical strike).
    pub shots_fired: u32,
    /// Kills this run (drives life steal).
    pub kills: u32,
    /// Remaining ticks of damage immunity.
    pub invuln_ticks: u32,
}

impl PlayerState {
    /// A fresh player at `position` with full health.
    pub fn new(position: Position, stats: PlayerStats) -> Self {
        Self {
            position,
            health: stats.max_health,
            passive_cooldown: 0,
            manual_cooldown: 0,
            stats,
            shots_fired: 0,
            kills: 0,
            invuln_ticks: 0,
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invuln_ticks > 0
    }

    /// Subtract damage, clamped at zero. Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        if self.is_invulnerable() || amount <= 0.0 {
            return 0.0;
        }
        let before = self.health;
        self.health = (self.health - amount).max(0.0);
        before - self.health
    }

    /// Restore health, capped at max health. A dead player stays dead until
    /// the run restarts.
    pub fn heal(&mut self, amount: f32) {
        if self.is_dead() {
            return;
        }
        self.health = (self.health + amount.max(0.0)).min(self.stats.max_health);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn health_percent(&self) -> f32 {
        if self.stats.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.stats.max_health * 100.0).clamp(0.0, 100.0)
    }
}
