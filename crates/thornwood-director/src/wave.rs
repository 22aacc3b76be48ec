//! Wave director state machine.
//!
//! Active → Preparing → (next wave) Active, with every tenth wave detouring
//! through BossWarning → BossFight → Preparing. The director never touches
//! the world: it reads a `DirectorContext` and answers with `DirectorEvent`s
//! that the engine turns into spawns and UI feedback.

use thornwood_core::constants::*;
use thornwood_core::enums::WaveState;

/// What the director needs to know about the world this tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectorContext {
    /// Live enemies, bosses included.
    pub enemies_alive: usize,
    /// Whether any boss-tagged enemy is alive.
    pub boss_alive: bool,
}

/// Spawn requests and transitions produced by the director.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectorEvent {
    WaveStarted { wave: u32 },
    BossWarning { wave: u32 },
    /// Spawn one regular enemy.
    SpawnEnemy,
    /// Spawn exactly one boss of the given tier.
    SpawnBoss { tier: u32 },
    WaveCleared { wave: u32 },
    BossDefeated { wave: u32 },
}

/// Wave progression state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveDirector {
    pub current_wave: u32,
    pub state: WaveState,
    /// Quota still to be spawned this wave.
    pub enemies_to_spawn: u32,
    /// Quota not yet defeated (informational).
    pub enemies_remaining: u32,
    /// Ticks left in the Preparing countdown.
    pub countdown: u32,
    /// Ticks left in the BossWarning countdown.
    pub boss_warning_timer: u32,
    pub spawn_timer: u32,
    /// Ticks between spawns during the current wave.
    pub spawn_rate: u32,
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self {
            current_wave: 1,
            state: WaveState::Active,
            enemies_to_spawn: 0,
            enemies_remaining: 0,
            countdown: 0,
            boss_warning_timer: 0,
            spawn_timer: 0,
            spawn_rate: WAVE_BASE_SPAWN_RATE,
        }
    }
}

/// Enemies spawned during a regular wave.
pub fn quota_for(wave: u32) -> u32 {
    WAVE_BASE_QUOTA + wave * WAVE_QUOTA_PER_WAVE
}

/// Ticks between spawns, shrinking with the wave number down to a floor.
pub fn spawn_rate_for(wave: u32) -> u32 {
    WAVE_BASE_SPAWN_RATE
        .saturating_sub(wave.saturating_mul(WAVE_SPAWN_RATE_STEP))
        .max(WAVE_MIN_SPAWN_RATE)
}

pub fn is_boss_wave(wave: u32) -> bool {
    wave > 0 && wave % BOSS_WAVE_INTERVAL == 0
}

/// Boss difficulty bracket for a wave.
pub fn boss_tier(wave: u32) -> u32 {
    wave / BOSS_WAVE_INTERVAL
}

impl WaveDirector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin the current wave. Boss waves go to BossWarning instead of Active.
    pub fn start_wave(&mut self) -> DirectorEvent {
        if is_boss_wave(self.current_wave) {
            self.state = WaveState::BossWarning;
            self.boss_warning_timer = BOSS_WARNING_TICKS;
            tracing::info!(wave = self.current_wave, "boss incoming");
            return DirectorEvent::BossWarning {
                wave: self.current_wave,
            };
        }

        let quota = quota_for(self.current_wave);
        self.state = WaveState::Active;
        self.enemies_to_spawn = quota;
        self.enemies_remaining = quota;
        self.spawn_timer = 0;
        self.spawn_rate = spawn_rate_for(self.current_wave);
        tracing::info!(
            wave = self.current_wave,
            quota,
            spawn_rate = self.spawn_rate,
            "wave started"
        );
        DirectorEvent::WaveStarted {
            wave: self.current_wave,
        }
    }

    /// Enter the between-waves countdown.
    pub fn start_preparation(&mut self) {
        self.state = WaveState::Preparing;
        self.countdown = WAVE_PREPARE_TICKS;
    }

    /// Advance the state machine by one tick.
    pub fn update(&mut self, ctx: &DirectorContext) -> Vec<DirectorEvent> {
        let mut events = Vec::new();

        match self.state {
            WaveState::BossWarning => {
                self.boss_warning_timer = self.boss_warning_timer.saturating_sub(1);
                if self.boss_warning_timer == 0 {
                    self.state = WaveState::BossFight;
                    events.push(DirectorEvent::SpawnBoss {
                        tier: boss_tier(self.current_wave),
                    });
                }
            }
            WaveState::Preparing => {
                self.countdown = self.countdown.saturating_sub(1);
                if self.countdown == 0 {
                    self.current_wave += 1;
                    events.push(self.start_wave());
                }
            }
            WaveState::BossFight => {
                if !ctx.boss_alive {
                    events.push(DirectorEvent::BossDefeated {
                        wave: self.current_wave,
                    });
                    self.current_wave += 1;
                    self.start_preparation();
                }
            }
            WaveState::Active => {
                let mut spawned = false;
                if self.enemies_to_spawn > 0 {
                    self.spawn_timer += 1;
                    if self.spawn_timer >= self.spawn_rate {
                        self.spawn_timer = 0;
                        self.enemies_to_spawn -= 1;
                        spawned = true;
                        events.push(DirectorEvent::SpawnEnemy);
                    }
                }

                if self.enemies_to_spawn == 0 && ctx.enemies_alive == 0 && !spawned {
                    events.push(DirectorEvent::WaveCleared {
                        wave: self.current_wave,
                    });
                    self.start_preparation();
                }
            }
        }

        events
    }

    /// Record one defeated enemy against the wave quota.
    pub fn enemy_defeated(&mut self) {
        self.enemies_remaining = self.enemies_remaining.saturating_sub(1);
    }

    /// Whole seconds left on whichever countdown is running.
    pub fn countdown_secs(&self) -> u32 {
        let ticks = match self.state {
            WaveState::Preparing => self.countdown,
            WaveState::BossWarning => self.boss_warning_timer,
            WaveState::Active | WaveState::BossFight => 0,
        };
        ticks.div_ceil(TICK_RATE)
    }

    /// Back to wave 1, not yet started.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
