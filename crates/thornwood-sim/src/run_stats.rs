//! Per-run bookkeeping owned by the engine, NOT stored as ECS entities.

use thornwood_core::constants::*;
use thornwood_core::events::{GameEvent, SoundEvent};

/// Running score and kill tallies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub score: u64,
    /// Kills since the player last took damage.
    pub kill_combo: u32,
    pub total_kills: u32,
    pub bosses_defeated: u32,
    /// Running ticks survived this run.
    pub survival_ticks: u64,
}

impl RunStats {
    pub fn record_kill(&mut self) {
        self.score += SCORE_PER_KILL;
        self.kill_combo += 1;
        self.total_kills += 1;
    }

    pub fn record_boss_kill(&mut self) {
        self.score += SCORE_PER_BOSS;
        self.bosses_defeated += 1;
    }

    /// Taking damage breaks the combo.
    pub fn record_damage(&mut self) {
        self.kill_combo = 0;
    }
}

/// Screen-space feedback intensities.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenEffects {
    pub screen_shake: f32,
    pub hit_flash: f32,
}

impl ScreenEffects {
    /// Shake never stacks; the strongest request wins.
    pub fn add_shake(&mut self, amount: f32) {
        self.screen_shake = self.screen_shake.max(amount);
    }

    pub fn add_flash(&mut self, amount: f32) {
        self.hit_flash = (self.hit_flash + amount).min(1.0);
    }

    pub fn decay(&mut self) {
        self.screen_shake *= SCREEN_SHAKE_DECAY;
        if self.screen_shake < SCREEN_SHAKE_MIN {
            self.screen_shake = 0.0;
        }
        self.hit_flash *= SCREEN_FLASH_DECAY;
        if self.hit_flash < SCREEN_FLASH_MIN {
            self.hit_flash = 0.0;
        }
    }
}

/// Timers and orbit state for upgrade modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ModifierTimers {
    /// Remaining ticks of half-speed enemies.
    pub time_stop_ticks: u32,
    /// Orbiting shield angle (radians).
    pub orbit_angle: f32,
    /// Ticks until the shield may strike again.
    pub shield_cooldown: u32,
}

impl ModifierTimers {
    pub fn time_stop_active(&self) -> bool {
        self.time_stop_ticks > 0
    }
}

/// Sounds and UI events produced during one tick.
#[derive(Debug, Clone, Default)]
pub struct Feedback {
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
}

impl Feedback {
    pub fn sound(&mut self, sound: SoundEvent) {
        self.sounds.push(sound);
    }

    pub fn event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain everything queued since the last snapshot.
    pub fn take(&mut self) -> (Vec<SoundEvent>, Vec<GameEvent>) {
        (
            std::mem::take(&mut self.sounds),
            std::mem::take(&mut self.events),
        )
    }

    pub fn clear(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }
}
