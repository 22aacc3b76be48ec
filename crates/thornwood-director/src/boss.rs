//! Boss behavior finite state machine.
//!
//! Pure functions that compute phase transitions and attack selection for a
//! boss based on its tier, current phase, and health. Phases only move
//! forward: One → Two below 60% health, Two → Three (enrage) below 30%.

use thornwood_core::constants::*;
use thornwood_core::enums::BossPhase;

/// Input to the boss FSM for a single tick.
#[derive(Debug, Clone, Copy)]
pub struct BossContext {
    pub tier: u32,
    pub phase: BossPhase,
    pub health: f32,
    pub max_health: f32,
    pub attack_timer: u32,
    pub attack_cooldown: u32,
    pub speed: f32,
}

/// Attack the boss performs this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossAttack {
    /// Lunge toward the player.
    Charge,
    /// Area damage around the boss.
    Shockwave,
    /// Lunge plus a three-way projectile burst.
    ChargeWithBurst,
}

/// Output from the boss FSM.
#[derive(Debug, Clone, Copy)]
pub struct BossUpdate {
    pub phase: BossPhase,
    pub attack_timer: u32,
    pub attack_cooldown: u32,
    pub speed: f32,
    pub phase_changed: bool,
    pub attack: Option<BossAttack>,
}

/// Evaluate the FSM for one boss. Advances the attack timer, applies at most
/// one phase transition, and fires an attack when the timer reaches the
/// cooldown.
pub fn evaluate(ctx: &BossContext) -> BossUpdate {
    let mut update = BossUpdate {
        phase: ctx.phase,
        attack_timer: ctx.attack_timer.saturating_add(1),
        attack_cooldown: ctx.attack_cooldown,
        speed: ctx.speed,
        phase_changed: false,
        attack: None,
    };

    let health_fraction = if ctx.max_health > 0.0 {
        ctx.health / ctx.max_health
    } else {
        0.0
    };

    if health_fraction < BOSS_PHASE_3_THRESHOLD && ctx.phase == BossPhase::Two {
        update.phase = BossPhase::Three;
        update.attack_cooldown = ctx
            .attack_cooldown
            .saturating_sub(BOSS_PHASE_3_COOLDOWN_CUT)
            .max(BOSS_PHASE_3_COOLDOWN_FLOOR);
        update.speed = ctx.speed * BOSS_ENRAGE_SPEED_MULT;
        update.phase_changed = true;
    } else if health_fraction < BOSS_PHASE_2_THRESHOLD && ctx.phase == BossPhase::One {
        update.phase = BossPhase::Two;
        update.attack_cooldown = ctx
            .attack_cooldown
            .saturating_sub(BOSS_PHASE_2_COOLDOWN_CUT)
            .max(BOSS_PHASE_2_COOLDOWN_FLOOR);
        update.phase_changed = true;
    }

    if update.attack_timer >= update.attack_cooldown {
        update.attack_timer = 0;
        update.attack = Some(choose_attack(ctx.tier, update.phase));
    }

    update
}

/// Attack pattern by tier and phase.
pub fn choose_attack(tier: u32, phase: BossPhase) -> BossAttack {
    match tier {
        0 => BossAttack::Charge,
        1 if phase >= BossPhase::Two => BossAttack::Shockwave,
        1 => BossAttack::Charge,
        _ if phase >= BossPhase::Two => BossAttack::ChargeWithBurst,
        _ => BossAttack::Charge,
    }
}
