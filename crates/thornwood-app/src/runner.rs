//! Drive a full session with the autopilot, either as fast as possible or
//! paced by the game loop thread.

use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;

use thornwood_core::enums::SimPhase;
use thornwood_core::state::GameStateSnapshot;
use thornwood_sim::engine::{SimConfig, SimulationEngine};
use thornwood_sim::persistence::KeyValueStore;

use crate::autopilot::Autopilot;
use crate::game_loop::{self, TICK_DURATION};

/// Outcome of one driven session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub ticks: u64,
    pub wave: u32,
    pub level: u32,
    pub score: u64,
    pub upgrades_taken: u32,
    pub game_over: bool,
}

impl RunSummary {
    fn from_snapshot(seed: u64, snap: &GameStateSnapshot, pilot: &Autopilot) -> Self {
        Self {
            seed,
            ticks: snap.time.tick,
            wave: snap.wave.wave,
            level: snap.hud.level,
            score: snap.final_score.unwrap_or(snap.hud.score),
            upgrades_taken: pilot.upgrades_taken(),
            game_over: snap.phase == SimPhase::GameOver,
        }
    }
}

/// Step the engine directly until `max_ticks` simulated ticks or game over.
pub fn run_headless(
    config: SimConfig,
    store: Box<dyn KeyValueStore + Send>,
    max_ticks: u64,
) -> RunSummary {
    let seed = config.seed;
    let mut engine = SimulationEngine::with_store(config, store);
    let mut pilot = Autopilot::new();
    let mut snap = engine.tick();

    // Menus don't advance time, so bound total steps as well.
    let step_limit = max_ticks.saturating_mul(2).max(16);
    let mut steps = 0u64;
    while snap.time.tick < max_ticks && snap.phase != SimPhase::GameOver && steps < step_limit {
        engine.queue_commands(pilot.next_commands(&snap));
        snap = engine.tick();
        steps += 1;
    }

    let summary = RunSummary::from_snapshot(seed, &snap, &pilot);
    tracing::info!(?summary, "headless run finished");
    summary
}

/// Run on the 60Hz game loop thread, feeding the autopilot from polled snapshots.
pub fn run_realtime(
    config: SimConfig,
    store: Box<dyn KeyValueStore + Send>,
    max_ticks: u64,
) -> Result<RunSummary> {
    let seed = config.seed;
    let handle = game_loop::spawn_game_loop(config, store)
        .context("failed to spawn game loop thread")?;
    let mut pilot = Autopilot::new();
    let started = Instant::now();
    let wall_limit = TICK_DURATION * (max_ticks.saturating_mul(2).min(u32::MAX as u64) as u32);

    let mut last_seen: Option<(u64, SimPhase)> = None;
    let mut last_snap = GameStateSnapshot::default();
    loop {
        std::thread::sleep(TICK_DURATION);
        let Some(snap) = handle.latest() else {
            continue;
        };

        let key = (snap.time.tick, snap.phase);
        if last_seen != Some(key) || snap.show_instructions {
            last_seen = Some(key);
            for command in pilot.next_commands(&snap) {
                if !handle.send(command) {
                    anyhow::bail!("game loop exited unexpectedly");
                }
            }
        }

        let done = snap.time.tick >= max_ticks
            || snap.phase == SimPhase::GameOver
            || started.elapsed() > wall_limit;
        last_snap = snap;
        if done {
            break;
        }
    }
    handle.shutdown();

    let summary = RunSummary::from_snapshot(seed, &last_snap, &pilot);
    tracing::info!(?summary, "realtime run finished");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use thornwood_sim::MemoryStore;

    fn config(seed: u64) -> SimConfig {
        SimConfig {
            seed,
            ..Default::default()
        }
    }

    #[test]
    fn headless_runs_are_reproducible() {
        let a = run_headless(config(7), Box::new(MemoryStore::new()), 900);
        let b = run_headless(config(7), Box::new(MemoryStore::new()), 900);
        assert_eq!(a, b);
    }

    #[test]
    fn headless_run_gets_past_instructions() {
        let summary = run_headless(config(3), Box::new(MemoryStore::new()), 300);
        assert!(summary.ticks > 0);
        assert!(summary.wave >= 1);
    }
}
