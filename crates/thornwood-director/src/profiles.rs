//! Enemy archetype profiles and spawn selection.
//!
//! Consolidates per-archetype parameters and the pressure-biased spawn table.

use rand::Rng;

use thornwood_core::constants::*;
use thornwood_core::enums::EnemyKind;

/// Base parameters for a regular enemy archetype.
#[derive(Debug, Clone, Copy)]
pub struct EnemyProfile {
    pub xp_value: u32,
    /// Base movement per tick.
    pub speed: f32,
    pub health: f32,
    pub radius: f32,
    /// Base spawn weight before pressure adjustment.
    pub spawn_chance: f32,
    pub contact_damage: f32,
}

/// Boss parameters for a tier.
#[derive(Debug, Clone, Copy)]
pub struct BossProfile {
    pub health: f32,
    pub radius: f32,
    pub speed: f32,
    pub contact_damage: f32,
    pub xp_value: u32,
    pub attack_cooldown: u32,
}

/// Get the profile for a regular archetype. `Boss` maps to the tier-0 boss
/// with zero spawn weight; bosses come from `boss_profile`.
pub fn get_profile(kind: EnemyKind) -> EnemyProfile {
    match kind {
        EnemyKind::Basic => EnemyProfile {
            xp_value: 10,
            speed: 1.0,
            health: 1.0,
            radius: 12.0,
            spawn_chance: 0.65,
            contact_damage: ENEMY_CONTACT_DAMAGE,
        },
        EnemyKind::Fast => EnemyProfile {
            xp_value: 15,
            speed: 2.0,
            health: 1.0,
            radius: 8.0,
            spawn_chance: 0.2,
            contact_damage: ENEMY_CONTACT_DAMAGE,
        },
        EnemyKind::Tank => EnemyProfile {
            xp_value: 25,
            speed: 0.7,
            health: 3.0,
            radius: 20.0,
            spawn_chance: 0.1,
            contact_damage: ENEMY_CONTACT_DAMAGE,
        },
        EnemyKind::Elite => EnemyProfile {
            xp_value: 50,
            speed: 1.2,
            health: 9.0,
            radius: 16.0,
            spawn_chance: 0.05,
            contact_damage: ELITE_CONTACT_DAMAGE,
        },
        EnemyKind::Boss => {
            let boss = boss_profile(0);
            EnemyProfile {
                xp_value: boss.xp_value,
                speed: boss.speed,
                health: boss.health,
                radius: boss.radius,
                spawn_chance: 0.0,
                contact_damage: boss.contact_damage,
            }
        }
    }
}

/// Boss stats scale linearly with tier.
pub fn boss_profile(tier: u32) -> BossProfile {
    let t = tier as f32;
    BossProfile {
        health: BOSS_BASE_HEALTH + BOSS_HEALTH_PER_TIER * t,
        radius: BOSS_BASE_RADIUS + BOSS_RADIUS_PER_TIER * t,
        speed: BOSS_BASE_SPEED + BOSS_SPEED_PER_TIER * t,
        contact_damage: BOSS_BASE_DAMAGE + BOSS_DAMAGE_PER_TIER * t,
        xp_value: BOSS_BASE_XP + BOSS_XP_PER_TIER * tier,
        attack_cooldown: BOSS_BASE_ATTACK_COOLDOWN
            .saturating_sub(BOSS_ATTACK_COOLDOWN_PER_TIER.saturating_mul(tier)),
    }
}

/// Elite spawn weight: base chance plus up to +10% at full pressure.
pub fn elite_chance(pressure: f32) -> f32 {
    get_profile(EnemyKind::Elite).spawn_chance + pressure_fraction(pressure) * PRESSURE_ELITE_BONUS
}

/// Normalised spawn table for the given pressure (0..=100).
pub fn spawn_weights(pressure: f32) -> [(EnemyKind, f32); 4] {
    let p = pressure_fraction(pressure);
    let mut table = [
        (
            EnemyKind::Basic,
            get_profile(EnemyKind::Basic).spawn_chance - p * PRESSURE_BASIC_PENALTY,
        ),
        (EnemyKind::Fast, get_profile(EnemyKind::Fast).spawn_chance),
        (
            EnemyKind::Tank,
            get_profile(EnemyKind::Tank).spawn_chance + p * PRESSURE_TANK_BONUS,
        ),
        (EnemyKind::Elite, elite_chance(pressure)),
    ];
    let total: f32 = table.iter().map(|(_, w)| w).sum();
    if total > 0.0 {
        for entry in &mut table {
            entry.1 /= total;
        }
    }
    table
}

/// Roll an archetype from the pressure-adjusted table.
pub fn pick_enemy_kind<R: Rng + ?Sized>(rng: &mut R, pressure: f32) -> EnemyKind {
    weighted_pick(rng, &spawn_weights(pressure)).unwrap_or(EnemyKind::Basic)
}

/// Cumulative-weight pick. Returns `None` for an empty or zero-weight table.
pub fn weighted_pick<T: Copy, R: Rng + ?Sized>(rng: &mut R, table: &[(T, f32)]) -> Option<T> {
    let total: f32 = table.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }
    let roll = rng.gen::<f32>() * total;
    let mut cumulative = 0.0;
    for &(item, weight) in table {
        cumulative += weight.max(0.0);
        if roll < cumulative {
            return Some(item);
        }
    }
    table.last().map(|&(item, _)| item)
}

fn pressure_fraction(pressure: f32) -> f32 {
    (pressure / MAX_PRESSURE).clamp(0.0, 1.0)
}
