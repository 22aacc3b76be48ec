//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands,
//! runs all systems, and produces `GameStateSnapshot`s. Completely headless,
//! enabling deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use thornwood_core::commands::PlayerCommand;
use thornwood_core::components::{BossState, Enemy};
use thornwood_core::constants::*;
use thornwood_core::enums::SimPhase;
use thornwood_core::events::{GameEvent, SoundEvent};
use thornwood_core::player::PlayerState;
use thornwood_core::state::{GameStateSnapshot, UpgradeOffer};
use thornwood_core::types::{Arena, SimTime};

use thornwood_director::profiles::pick_enemy_kind;
use thornwood_director::wave::{DirectorContext, DirectorEvent, WaveDirector};

use crate::persistence::{self, KeyValueStore, MemoryStore};
use crate::pressure::{self, PressureGauge, RiskTracker};
use crate::progression::Progression;
use crate::run_stats::{Feedback, ModifierTimers, RunStats, ScreenEffects};
use crate::systems;
use crate::systems::combat::RewardContext;
use crate::systems::player_control::InputState;
use crate::systems::snapshot::SnapshotContext;
use crate::upgrades;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub arena_width: f32,
    pub arena_height: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
        }
    }
}

impl SimConfig {
    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_height)
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: SimPhase,
    arena: Arena,
    rng: ChaCha8Rng,
    next_seq: u64,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    store: Box<dyn KeyValueStore + Send>,

    player: PlayerState,
    input: InputState,
    director: WaveDirector,
    progression: Progression,
    pressure: PressureGauge,
    risk: RiskTracker,
    stats: RunStats,
    effects: ScreenEffects,
    modifiers: ModifierTimers,
    offers: Vec<UpgradeOffer>,
    feedback: Feedback,
    show_instructions: bool,
    final_score: Option<u64>,
}

impl SimulationEngine {
    /// Create a new simulation engine with an in-memory store.
    pub fn new(config: SimConfig) -> Self {
        Self::with_store(config, Box::new(MemoryStore::new()))
    }

    /// Create a new simulation engine backed by `store`. Saved upgrades are
    /// applied, and a first run opens with the instructions overlay.
    pub fn with_store(config: SimConfig, store: Box<dyn KeyValueStore + Send>) -> Self {
        let arena = config.arena();
        let mut engine = Self {
            world: World::new(),
            time: SimTime::default(),
            phase: SimPhase::Running,
            arena,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            next_seq: 0,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            store,
            player: PlayerState::new(arena.center(), Default::default()),
            input: InputState::new(&arena),
            director: WaveDirector::new(),
            progression: Progression::new(),
            pressure: PressureGauge::default(),
            risk: RiskTracker::default(),
            stats: RunStats::default(),
            effects: ScreenEffects::default(),
            modifiers: ModifierTimers::default(),
            offers: Vec::new(),
            feedback: Feedback::default(),
            show_instructions: false,
            final_score: None,
        };

        engine.reset_run();

        let first_run = match persistence::help_seen(&*engine.store) {
            Ok(seen) => !seen,
            Err(err) => {
                tracing::warn!(%err, "could not read first-run flag");
                false
            }
        };
        if first_run {
            engine.phase = SimPhase::Paused;
            engine.show_instructions = true;
        }

        tracing::info!(seed = config.seed, first_run, "simulation ready");
        engine
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == SimPhase::Running {
            self.run_systems();
            self.time.advance();

            if self.player.is_dead() {
                self.game_over();
            } else if self.progression.pending_level_ups() > 0 {
                self.present_next_level_up();
            }
        }

        self.build_snapshot()
    }

    /// Get the current phase.
    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn director(&self) -> &WaveDirector {
        &self.director
    }

    pub fn run_stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn pressure(&self) -> &PressureGauge {
        &self.pressure
    }

    /// Offers on screen while awaiting an upgrade choice.
    pub fn offers(&self) -> &[UpgradeOffer] {
        &self.offers
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        &*self.store
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    #[cfg(test)]
    pub fn progression_mut(&mut self) -> &mut Progression {
        &mut self.progression
    }

    #[cfg(test)]
    pub fn director_mut(&mut self) -> &mut WaveDirector {
        &mut self.director
    }

    #[cfg(test)]
    pub fn modifiers_mut(&mut self) -> &mut ModifierTimers {
        &mut self.modifiers
    }

    /// Spawn a bullet with the engine's sequence counter (for tests).
    #[cfg(test)]
    pub fn spawn_test_bullet(
        &mut self,
        source: thornwood_core::enums::BulletSource,
        position: thornwood_core::types::Position,
        damage: f32,
    ) -> Entity {
        world_setup::spawn_bullet(
            &mut self.world,
            position,
            thornwood_core::types::Velocity::default(),
            source,
            damage,
            PLAYER_BULLET_SIZE,
            0,
            &mut self.next_seq,
        )
    }

    /// Spawn an enemy of `kind` at a fixed position (for tests).
    #[cfg(test)]
    pub fn spawn_test_enemy(
        &mut self,
        kind: thornwood_core::enums::EnemyKind,
        position: thornwood_core::types::Position,
    ) -> Entity {
        let entity = world_setup::spawn_enemy(
            &mut self.world,
            &mut self.rng,
            &self.arena,
            kind,
            self.director.current_wave,
            &mut self.next_seq,
        );
        if let Ok(mut pos) = self.world.get::<&mut thornwood_core::types::Position>(entity) {
            *pos = position;
        }
        entity
    }

    /// Fresh run: empty world, default player with saved upgrades, wave 1.
    fn reset_run(&mut self) {
        self.world.clear();
        self.time = SimTime::default();
        self.next_seq = 0;
        self.despawn_buffer.clear();
        self.player = PlayerState::new(self.arena.center(), persistence::restore_stats(&*self.store));
        self.input = InputState::new(&self.arena);
        self.director.reset();
        self.progression.reset();
        self.pressure.reset();
        self.risk.reset();
        self.stats = RunStats::default();
        self.effects = ScreenEffects::default();
        self.modifiers = ModifierTimers::default();
        self.offers.clear();
        self.feedback.clear();
        self.final_score = None;
        self.phase = SimPhase::Running;

        let event = self.director.start_wave();
        self.handle_director_event(event);
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::SetMoveIntent {
                up,
                down,
                left,
                right,
            } => {
                self.input.intent = thornwood_core::commands::MoveIntent {
                    up,
                    down,
                    left,
                    right,
                };
            }
            PlayerCommand::SetCursor { x, y } => {
                self.input.cursor = thornwood_core::types::Position::new(x, y);
            }
            PlayerCommand::FireManual => {
                if self.phase == SimPhase::Running {
                    self.input.fire_requested = true;
                } else {
                    tracing::debug!(phase = ?self.phase, "fire ignored");
                }
            }
            PlayerCommand::SelectUpgrade { index } => self.select_upgrade(index),
            PlayerCommand::ToggleInstructions => match self.phase {
                SimPhase::Running => {
                    self.phase = SimPhase::Paused;
                    self.show_instructions = true;
                }
                SimPhase::Paused => {
                    self.phase = SimPhase::Running;
                    self.show_instructions = false;
                }
                other => tracing::debug!(phase = ?other, "instructions toggle ignored"),
            },
            PlayerCommand::DismissInstructions => {
                self.show_instructions = false;
                if self.phase == SimPhase::Paused {
                    self.phase = SimPhase::Running;
                }
                if let Err(err) = persistence::mark_help_seen(&mut *self.store) {
                    tracing::warn!(%err, "could not record first-run flag");
                }
            }
            PlayerCommand::Restart => {
                tracing::info!(score = self.stats.score, "restarting run");
                self.show_instructions = false;
                self.reset_run();
            }
        }
    }

    fn select_upgrade(&mut self, index: usize) {
        if self.phase != SimPhase::AwaitingUpgradeChoice {
            tracing::debug!(index, phase = ?self.phase, "upgrade selection outside level-up");
            return;
        }
        let Some(offer) = self.offers.get(index).cloned() else {
            tracing::debug!(index, offered = self.offers.len(), "upgrade index out of range");
            return;
        };

        upgrades::apply_to_player(offer.id, &mut self.player);
        if let Err(err) = persistence::save_upgrades(&mut *self.store, &self.player.stats) {
            tracing::warn!(%err, "could not save upgrades");
        }
        tracing::info!(upgrade = ?offer.id, rarity = ?offer.rarity, "upgrade chosen");
        self.feedback.event(GameEvent::UpgradeChosen {
            upgrade: offer.id,
            rarity: offer.rarity,
        });

        if self.player.stats.level_up_invuln {
            self.player.invuln_ticks = LEVEL_UP_INVULN_TICKS;
        }
        if self.player.stats.time_stop {
            self.modifiers.time_stop_ticks = TIME_STOP_TICKS;
        }

        self.offers.clear();
        self.phase = SimPhase::Running;
        if self.progression.pending_level_ups() > 0 {
            self.present_next_level_up();
        }
    }

    /// Freeze the run and put the next queued level-up on screen.
    fn present_next_level_up(&mut self) {
        let Some(level) = self.progression.take_level_up() else {
            return;
        };
        // Offers follow the level being resolved, not the level reached.
        self.offers = upgrades::draw_offers(&mut self.rng, level, self.director.current_wave);
        self.phase = SimPhase::AwaitingUpgradeChoice;
        self.feedback.sound(SoundEvent::LevelUp);
        self.feedback.event(GameEvent::LevelUp { level });
    }

    fn game_over(&mut self) {
        self.phase = SimPhase::GameOver;
        self.final_score = Some(self.stats.score);
        self.offers.clear();
        self.feedback.event(GameEvent::GameOver {
            final_score: self.stats.score,
        });
        tracing::info!(
            score = self.stats.score,
            wave = self.director.current_wave,
            level = self.progression.level,
            kills = self.stats.total_kills,
            "game over"
        );
    }

    fn director_context(&self) -> DirectorContext {
        let mut ctx = DirectorContext::default();
        for (_entity, (enemy, boss)) in self.world.query::<(&Enemy, Option<&BossState>)>().iter() {
            if enemy.dead {
                continue;
            }
            ctx.enemies_alive += 1;
            ctx.boss_alive |= boss.is_some();
        }
        ctx
    }

    fn handle_director_event(&mut self, event: DirectorEvent) {
        match event {
            DirectorEvent::WaveStarted { wave } => {
                self.feedback.event(GameEvent::WaveStarted { wave });
            }
            DirectorEvent::BossWarning { wave } => {
                self.feedback.sound(SoundEvent::Boss);
                self.feedback.event(GameEvent::BossWarning { wave });
            }
            DirectorEvent::SpawnEnemy => {
                let kind = pick_enemy_kind(&mut self.rng, self.pressure.pressure);
                world_setup::spawn_enemy(
                    &mut self.world,
                    &mut self.rng,
                    &self.arena,
                    kind,
                    self.director.current_wave,
                    &mut self.next_seq,
                );
            }
            DirectorEvent::SpawnBoss { tier } => {
                world_setup::spawn_boss(&mut self.world, &self.arena, tier, &mut self.next_seq);
                self.effects.add_shake(SHAKE_BOSS_SPAWN);
                self.feedback.event(GameEvent::BossSpawned { tier });
                tracing::info!(tier, "boss spawned");
            }
            DirectorEvent::WaveCleared { wave } => {
                tracing::info!(wave, score = self.stats.score, "wave cleared");
                self.feedback.event(GameEvent::WaveCleared { wave });
            }
            DirectorEvent::BossDefeated { wave } => {
                self.feedback.event(GameEvent::BossDefeated { wave });
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // 1. Wave director
        let ctx = self.director_context();
        for event in self.director.update(&ctx) {
            self.handle_director_event(event);
        }
        // 2. Player movement
        systems::player_control::run(&mut self.player, &self.input.intent, &self.arena);
        // 3. Weapons (passive aura, manual shot)
        systems::weapons::run(
            &mut self.world,
            &mut self.rng,
            &mut self.player,
            &mut self.input,
            &mut self.next_seq,
            &mut self.effects,
            &mut self.feedback,
        );
        // 4. Bullet integration and out-of-bounds cull
        systems::movement::run_bullets(&mut self.world, &self.arena, &mut self.despawn_buffer);
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        // 5. Knockback and hit flash
        systems::movement::apply_knockback(&mut self.world);
        // 6. Enemy AI (seek, boss FSM)
        let speed_factor = if self.modifiers.time_stop_active() {
            TIME_STOP_SLOW_FACTOR
        } else {
            1.0
        };
        systems::enemy_ai::run(
            &mut self.world,
            &mut self.rng,
            &mut self.player,
            speed_factor,
            &mut self.next_seq,
            &mut self.effects,
            &mut self.feedback,
        );
        // 7. Combat
        systems::combat::resolve_contacts(
            &mut self.world,
            &mut self.rng,
            &mut self.player,
            &mut self.stats,
            &mut self.effects,
            &mut self.feedback,
            &mut self.despawn_buffer,
        );
        systems::combat::resolve_boss_bullets(
            &mut self.world,
            &mut self.player,
            &mut self.stats,
            &mut self.feedback,
            &mut self.despawn_buffer,
        );
        // Enemies consumed by contact no longer count toward the risk bonus.
        let reward = RewardContext {
            wave: self.director.current_wave,
            pressure_mult: self.pressure.xp_multiplier(),
            surroundings: pressure::survey(&self.world, &self.player.position),
        };
        let kills = systems::combat::resolve_player_hits(
            &mut self.world,
            &mut self.rng,
            &self.player,
            &mut self.modifiers,
            &mut self.feedback,
            &mut self.despawn_buffer,
        );
        systems::combat::dispatch_kills(
            &mut self.world,
            &mut self.rng,
            &kills,
            &reward,
            &mut self.player,
            &mut self.stats,
            &mut self.risk,
            &mut self.director,
            &mut self.feedback,
        );
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        // 8. Particles, screen effects, timers
        systems::movement::run_particles(&mut self.world, &mut self.despawn_buffer);
        systems::effects::run(
            &mut self.rng,
            &mut self.player,
            &mut self.stats,
            &mut self.effects,
            &mut self.modifiers,
        );
        // 9. Pressure and risk
        let surroundings = pressure::survey(&self.world, &self.player.position);
        self.pressure.update(&surroundings, self.stats.kill_combo);
        self.risk.update();
        // 10. XP orbs
        systems::orbs::run(
            &mut self.world,
            &mut self.rng,
            &self.player,
            &mut self.progression,
            self.director.current_wave,
            &mut self.feedback,
            &mut self.despawn_buffer,
        );
        // 11. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }

    fn build_snapshot(&mut self) -> GameStateSnapshot {
        let (sounds, events) = self.feedback.take();
        let ctx = SnapshotContext {
            time: self.time,
            phase: self.phase,
            player: &self.player,
            cursor: self.input.cursor,
            modifiers: &self.modifiers,
            progression: &self.progression,
            director: &self.director,
            stats: &self.stats,
            pressure: &self.pressure,
            effects: &self.effects,
            offers: &self.offers,
            final_score: self.final_score,
            show_instructions: self.show_instructions,
        };
        systems::snapshot::build_snapshot(&self.world, &ctx, sounds, events)
    }
}
