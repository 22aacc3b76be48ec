//! Experience and leveling.
//!
//! XP only arrives through orb collection. A single large pickup may cross
//! several thresholds; each crossing queues one level-up, and the engine
//! resolves them one at a time through the upgrade menu.

use std::collections::VecDeque;

use thornwood_core::constants::*;

/// Requirement step by wave: harder after wave 5, again after 10 and 15.
pub fn difficulty_multiplier(wave: u32) -> f64 {
    match wave {
        0..=5 => 1.0,
        6..=10 => 1.1,
        11..=15 => 1.2,
        _ => 1.3,
    }
}

/// XP needed to clear `level`, using the wave and fatigue at call time.
pub fn xp_required(level: u32, wave: u32, fatigue: u32) -> u32 {
    let base = (BASE_XP * (level as f64).powf(XP_LEVEL_EXPONENT)).floor();
    let fatigue_mult = 1.0 + FATIGUE_PER_LEVEL * fatigue as f64;
    (base * difficulty_multiplier(wave) * fatigue_mult).floor() as u32
}

/// Per-run progression state.
#[derive(Debug, Clone, PartialEq)]
pub struct Progression {
    pub current_xp: u32,
    pub level: u32,
    pub xp_to_next_level: u32,
    /// Level-ups this run; raises every later requirement by 5%.
    pub fatigue: u32,
    /// Levels reached but not yet resolved through an upgrade choice.
    pending_level_ups: VecDeque<u32>,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            current_xp: 0,
            level: 1,
            xp_to_next_level: xp_required(1, 1, 0),
            fatigue: 0,
            pending_level_ups: VecDeque::new(),
        }
    }
}

impl Progression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add XP and drain it through as many thresholds as it covers.
    /// Returns the number of levels gained.
    pub fn add_xp(&mut self, amount: u32, wave: u32) -> u32 {
        self.current_xp = self.current_xp.saturating_add(amount);
        tracing::debug!(amount, total = self.current_xp, "xp added");

        let mut gained = 0;
        while self.current_xp >= self.xp_to_next_level {
            self.current_xp -= self.xp_to_next_level;
            self.level += 1;
            self.fatigue += 1;
            self.xp_to_next_level = xp_required(self.level, wave, self.fatigue).max(1);
            self.pending_level_ups.push_back(self.level);
            gained += 1;
            tracing::info!(
                level = self.level,
                fatigue = self.fatigue,
                next = self.xp_to_next_level,
                "level up"
            );
        }
        gained
    }

    /// Pop the oldest unresolved level-up.
    pub fn take_level_up(&mut self) -> Option<u32> {
        self.pending_level_ups.pop_front()
    }

    pub fn pending_level_ups(&self) -> usize {
        self.pending_level_ups.len()
    }

    /// Fill of the XP bar, 0..=100.
    pub fn xp_percent(&self) -> f32 {
        if self.xp_to_next_level == 0 {
            return 0.0;
        }
        (self.current_xp as f32 / self.xp_to_next_level as f32 * 100.0).clamp(0.0, 100.0)
    }

    pub fn level_label(&self) -> String {
        format!("Level {}", self.level)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
