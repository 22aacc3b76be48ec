//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// A hostile creature. Paired with `Position`, `Knockback` and `HitFlash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Spawn order; collision and reward dispatch iterate in this order.
    pub seq: u64,
    pub radius: f32,
    /// Movement per tick.
    pub speed: f32,
    pub health: f32,
    /// Damage dealt to the player on contact (the enemy is consumed).
    pub contact_damage: f32,
    pub xp_value: u32,
    /// Set exactly once, when health first drops to zero.
    pub dead: bool,
}

/// Boss-only state, attached alongside `Enemy`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossState {
    pub max_health: f32,
    pub phase: BossPhase,
    pub attack_timer: u32,
    pub attack_cooldown: u32,
    /// Difficulty bracket, wave / 10.
    pub tier: u32,
}

/// Transient knockback impulse applied each tick and decayed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Knockback {
    pub x: f32,
    pub y: f32,
}

/// Hit-flash intensity (1.0 on hit, decays toward 0).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HitFlash(pub f32);

/// Projectile. Paired with `Position` and `Velocity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub seq: u64,
    pub source: BulletSource,
    pub damage: f32,
    pub size: f32,
    /// Further enemies this bullet may pass through.
    pub pierce_left: u32,
    /// Enemy sequence numbers already struck (pierce only).
    pub hit_enemies: Vec<u64>,
}

/// Cosmetic particle. Paired with `Position` and `Velocity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    /// Remaining life in ticks.
    pub life: f32,
    pub size: f32,
}

/// Experience pickup. Paired with `Position`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XpOrb {
    pub value: u32,
    /// Remaining lifetime in ticks.
    pub lifetime: u32,
    pub size: f32,
    pub collected: bool,
}
