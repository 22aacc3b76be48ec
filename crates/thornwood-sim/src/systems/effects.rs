//! End-of-tick housekeeping: screen effects, survival score, modifier timers.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use thornwood_core::constants::SURVIVAL_SCORE_CHANCE;
use thornwood_core::player::PlayerState;

use crate::run_stats::{ModifierTimers, RunStats, ScreenEffects};

pub fn run(
    rng: &mut ChaCha8Rng,
    player: &mut PlayerState,
    stats: &mut RunStats,
    effects: &mut ScreenEffects,
    modifiers: &mut ModifierTimers,
) {
    effects.decay();

    if rng.gen_bool(SURVIVAL_SCORE_CHANCE) {
        stats.score += 1;
    }
    stats.survival_ticks += 1;

    player.invuln_ticks = player.invuln_ticks.saturating_sub(1);
    modifiers.time_stop_ticks = modifiers.time_stop_ticks.saturating_sub(1);
}
