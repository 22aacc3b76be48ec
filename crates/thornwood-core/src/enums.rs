//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Enemy archetype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Basic,
    Fast,
    Tank,
    Elite,
    Boss,
}

/// Who fired a bullet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletSource {
    /// Aura auto-fire: weak, jittered, aimed at the nearest enemy.
    #[default]
    Passive,
    /// Cursor-aimed player shot.
    Manual,
    /// Boss projectile, hostile to the player.
    Boss,
}

/// Wave director state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveState {
    /// Spawning the wave quota.
    #[default]
    Active,
    /// Countdown between waves.
    Preparing,
    /// Countdown before a boss spawns.
    BossWarning,
    /// Boss alive.
    BossFight,
}

/// Boss phase. Ordered so that `phase >= BossPhase::Two` reads naturally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BossPhase {
    #[default]
    One,
    Two,
    /// Enraged.
    Three,
}

impl BossPhase {
    pub fn number(self) -> u8 {
        match self {
            BossPhase::One => 1,
            BossPhase::Two => 2,
            BossPhase::Three => 3,
        }
    }
}

/// Top-level simulation phase. Only `Running` advances the world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    #[default]
    Running,
    /// Instructions overlay open.
    Paused,
    /// Level-up offers are on screen.
    AwaitingUpgradeChoice,
    GameOver,
}

/// Upgrade quality bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn is_epic_or_better(self) -> bool {
        self >= Rarity::Epic
    }
}

/// Every upgrade in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeId {
    // common
    Damage,
    MoveSpeed,
    FireRate,
    MaxHealth,
    AuraRange,
    // rare
    Pierce,
    ProjectileSpeed,
    AutoFire,
    Knockback,
    BulletSize,
    // epic
    Explode,
    Multishot,
    OrbitingShield,
    LifeSteal,
    Magnet,
    // legendary
    ChainLightning,
    CriticalStrike,
    SecondWind,
    TimeFreeze,
}

/// Cosmetic particle category; presentation maps each to a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    XpPickup,
    EnemyHit,
    EnemyDeath,
    EnemyDebris,
    PlayerHurt,
    Shockwave,
}
