//! Risk and pressure scaling.
//!
//! Pressure is a slow gauge of how crowded the player has been; risk is a
//! short-lived bonus for fast kills and dangerous surroundings. Both multiply
//! XP at the moment an orb is created.

use hecs::World;

use thornwood_core::components::Enemy;
use thornwood_core::constants::*;
use thornwood_core::enums::EnemyKind;
use thornwood_core::types::Position;

/// Enemy counts around the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Surroundings {
    /// Live enemies within `DENSITY_RADIUS`.
    pub nearby_enemies: usize,
    /// Live elites within `ELITE_CLUSTER_RADIUS`.
    pub nearby_elites: usize,
}

/// Count live enemies near `center`.
pub fn survey(world: &World, center: &Position) -> Surroundings {
    let mut out = Surroundings::default();
    for (_entity, (enemy, pos)) in world.query::<(&Enemy, &Position)>().iter() {
        if enemy.dead {
            continue;
        }
        let distance = center.range_to(pos);
        if distance < DENSITY_RADIUS {
            out.nearby_enemies += 1;
        }
        if enemy.kind == EnemyKind::Elite && distance < ELITE_CLUSTER_RADIUS {
            out.nearby_elites += 1;
        }
    }
    out
}

/// Crowding gauge in `[0, MAX_PRESSURE]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PressureGauge {
    pub pressure: f32,
}

impl PressureGauge {
    /// One tick of build-up or decay, clamped after each step.
    pub fn update(&mut self, surroundings: &Surroundings, kill_combo: u32) {
        let delta = if surroundings.nearby_enemies >= HIGH_DENSITY_COUNT {
            PRESSURE_HIGH_DENSITY_GAIN
        } else if surroundings.nearby_enemies >= MID_DENSITY_COUNT {
            PRESSURE_MID_DENSITY_GAIN
        } else {
            -PRESSURE_DECAY
        };
        self.pressure = (self.pressure + delta).clamp(0.0, MAX_PRESSURE);

        if kill_combo > PRESSURE_COMBO_THRESHOLD {
            self.pressure = (self.pressure + PRESSURE_COMBO_GAIN).min(MAX_PRESSURE);
        }
    }

    /// Up to +30% XP at full pressure.
    pub fn xp_multiplier(&self) -> f64 {
        1.0 + (self.pressure / MAX_PRESSURE) as f64 * PRESSURE_XP_BONUS
    }

    pub fn elite_chance(&self) -> f32 {
        thornwood_director::profiles::elite_chance(self.pressure)
    }

    pub fn reset(&mut self) {
        self.pressure = 0.0;
    }
}

/// Kill-streak tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskTracker {
    pub recent_kills: u32,
    /// Ticks until one recent kill decays. Goes negative while idle.
    pub kill_timer: i32,
}

impl RiskTracker {
    pub fn on_kill(&mut self) {
        self.recent_kills += 1;
        self.kill_timer = RISK_DECAY_TICKS;
    }

    pub fn update(&mut self) {
        if self.recent_kills > 0 && self.kill_timer <= 0 {
            self.recent_kills -= 1;
            self.kill_timer = RISK_DECAY_TICKS;
        }
        self.kill_timer = self.kill_timer.saturating_sub(1);
    }

    /// Additive bonuses on a base of 1.0. Uncapped.
    pub fn multiplier(&self, surroundings: &Surroundings) -> f64 {
        let mut multiplier = 1.0;
        if surroundings.nearby_enemies >= HIGH_DENSITY_COUNT {
            multiplier += RISK_DENSITY_BONUS;
        }
        if self.recent_kills >= RISK_STREAK_KILLS {
            multiplier += RISK_STREAK_BONUS;
        }
        if surroundings.nearby_elites >= RISK_ELITE_COUNT {
            multiplier += RISK_ELITE_BONUS;
        }
        multiplier
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// XP carried by the orb an enemy drops.
pub fn kill_reward(
    base_xp: u32,
    kind: EnemyKind,
    wave: u32,
    pressure_mult: f64,
    risk_mult: f64,
) -> u32 {
    let mut xp = base_xp as f64;
    if kind == EnemyKind::Basic && wave > BASIC_XP_PENALTY_AFTER_WAVE {
        xp = (xp * BASIC_XP_PENALTY_MULT).floor();
    }
    (xp * pressure_mult * risk_mult).floor().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crowd(nearby_enemies: usize, nearby_elites: usize) -> Surroundings {
        Surroundings {
            nearby_enemies,
            nearby_elites,
        }
    }

    #[test]
    fn test_pressure_saturates_at_max() {
        let mut gauge = PressureGauge::default();
        for _ in 0..1_000 {
            gauge.update(&crowd(8, 0), 10);
        }
        assert_eq!(gauge.pressure, MAX_PRESSURE);
        assert!((gauge.xp_multiplier() - 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_pressure_floors_at_zero() {
        let mut gauge = PressureGauge { pressure: 0.5 };
        gauge.update(&crowd(0, 0), 0);
        assert!((gauge.pressure - 0.2).abs() < 1e-6);
        gauge.update(&crowd(0, 0), 0);
        assert_eq!(gauge.pressure, 0.0);
    }

    #[test]
    fn test_pressure_mid_density_and_combo() {
        let mut gauge = PressureGauge::default();
        gauge.update(&crowd(3, 0), 4);
        assert!((gauge.pressure - 0.5).abs() < 1e-6);
        gauge.update(&crowd(3, 0), 3);
        assert!((gauge.pressure - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_risk_decays_one_kill_per_window() {
        let mut risk = RiskTracker::default();
        for _ in 0..3 {
            risk.on_kill();
        }
        assert!((risk.multiplier(&crowd(0, 0)) - 1.15).abs() < 1e-9);

        // The full window must elapse before the first decay.
        for _ in 0..RISK_DECAY_TICKS {
            risk.update();
        }
        assert_eq!(risk.recent_kills, 3);
        risk.update();
        assert_eq!(risk.recent_kills, 2);
        assert_eq!(risk.multiplier(&crowd(0, 0)), 1.0);
    }

    #[test]
    fn test_risk_multiplier_stacks() {
        let mut risk = RiskTracker::default();
        for _ in 0..5 {
            risk.on_kill();
        }
        let m = risk.multiplier(&crowd(6, 2));
        assert!((m - 1.45).abs() < 1e-9);
    }

    #[test]
    fn test_kill_reward_basic_penalty() {
        assert_eq!(kill_reward(10, EnemyKind::Basic, 5, 1.0, 1.0), 10);
        assert_eq!(kill_reward(10, EnemyKind::Basic, 6, 1.0, 1.0), 9);
        assert_eq!(kill_reward(10, EnemyKind::Fast, 6, 1.0, 1.0), 10);
        assert_eq!(kill_reward(50, EnemyKind::Elite, 1, 1.3, 1.45), 94);
        assert_eq!(kill_reward(100, EnemyKind::Boss, 10, 1.0, 1.25), 125);
    }
}
