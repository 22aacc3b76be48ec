//! Tests for the simulation engine, combat pipeline, progression and persistence.

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use thornwood_core::commands::{MoveIntent, PlayerCommand};
use thornwood_core::components::{BossState, Bullet, Enemy, HitFlash, Knockback, XpOrb};
use thornwood_core::constants::*;
use thornwood_core::enums::*;
use thornwood_core::events::{GameEvent, SoundEvent};
use thornwood_core::player::PlayerState;
use thornwood_core::types::{Arena, Position, Velocity};

use thornwood_director::wave::WaveDirector;

use crate::engine::{SimConfig, SimulationEngine};
use crate::persistence;
use crate::pressure::{self, RiskTracker, Surroundings};
use crate::progression::Progression;
use crate::run_stats::{Feedback, ModifierTimers, RunStats, ScreenEffects};
use crate::systems::combat::{self, Kill, RewardContext};
use crate::systems::{orbs, player_control, weapons};
use crate::world_setup;

/// An engine past the first-run instructions overlay.
fn running_engine(seed: u64) -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig {
        seed,
        ..Default::default()
    });
    engine.queue_command(PlayerCommand::DismissInstructions);
    engine.tick();
    assert_eq!(engine.phase(), SimPhase::Running);
    engine
}

fn enemy_count(engine: &SimulationEngine) -> usize {
    let mut q = engine.world().query::<&Enemy>();
    q.iter().count()
}

fn beside_player(engine: &SimulationEngine, dx: f32, dy: f32) -> Position {
    let p = engine.player().position;
    Position::new(p.x + dx, p.y + dy)
}

fn test_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(7)
}

fn centre_player() -> PlayerState {
    PlayerState::new(Position::new(400.0, 300.0), Default::default())
}

fn place_enemy(world: &mut World, seq: u64, position: Position, health: f32) -> Entity {
    world.spawn((
        Enemy {
            kind: EnemyKind::Basic,
            seq,
            radius: 12.0,
            speed: 1.0,
            health,
            contact_damage: ENEMY_CONTACT_DAMAGE,
            xp_value: 10,
            dead: false,
        },
        position,
        Knockback::default(),
        HitFlash::default(),
    ))
}

fn place_bullet(world: &mut World, seq: u64, position: Position, damage: f32, pierce: u32) -> Entity {
    world.spawn((
        Bullet {
            seq,
            source: BulletSource::Manual,
            damage,
            size: PLAYER_BULLET_SIZE,
            pierce_left: pierce,
            hit_enemies: Vec::new(),
        },
        position,
        Velocity::default(),
    ))
}

/// One pass of player hit resolution. Returns kills and the despawn buffer.
fn resolve_hits(
    world: &mut World,
    player: &PlayerState,
    modifiers: &mut ModifierTimers,
) -> (Vec<Kill>, Vec<Entity>) {
    let mut rng = test_rng();
    let mut feedback = Feedback::default();
    let mut despawn = Vec::new();
    let kills =
        combat::resolve_player_hits(world, &mut rng, player, modifiers, &mut feedback, &mut despawn);
    (kills, despawn)
}

fn health_of(world: &World, entity: Entity) -> f32 {
    world.get::<&Enemy>(entity).unwrap().health
}

fn basic_kill() -> Kill {
    Kill {
        kind: EnemyKind::Basic,
        position: Position::new(100.0, 100.0),
        xp_value: 10,
    }
}

fn reward_context() -> RewardContext {
    RewardContext {
        wave: 1,
        pressure_mult: 1.0,
        surroundings: Surroundings::default(),
    }
}

fn dispatch(world: &mut World, player: &mut PlayerState, stats: &mut RunStats, kills: &[Kill]) {
    let mut rng = test_rng();
    let mut risk = RiskTracker::default();
    let mut director = WaveDirector::new();
    let mut feedback = Feedback::default();
    combat::dispatch_kills(
        world,
        &mut rng,
        kills,
        &reward_context(),
        player,
        stats,
        &mut risk,
        &mut director,
        &mut feedback,
    );
}

/// Bullets in the world, oldest first.
fn bullets_by_seq(world: &World) -> Vec<(Bullet, Velocity, Position)> {
    let mut q = world.query::<(&Bullet, &Velocity, &Position)>();
    let mut out: Vec<(Bullet, Velocity, Position)> = q
        .iter()
        .map(|(_, (b, v, p))| (b.clone(), *v, *p))
        .collect();
    out.sort_by_key(|(b, _, _)| b.seq);
    out
}

fn orb_count(world: &World) -> usize {
    let mut q = world.query::<&XpOrb>();
    q.iter().count()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = running_engine(12345);
    let mut engine_b = running_engine(12345);

    for _ in 0..600 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = running_engine(111);
    let mut engine_b = running_engine(222);

    let mut diverged = false;
    for _ in 0..600 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();
        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

// ---- Run control ----

#[test]
fn test_first_run_opens_with_instructions() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    assert_eq!(engine.phase(), SimPhase::Paused);

    let snap = engine.tick();
    assert!(snap.show_instructions);
    assert_eq!(snap.time.tick, 0, "Paused run must not advance");

    engine.queue_command(PlayerCommand::DismissInstructions);
    let snap = engine.tick();
    assert!(!snap.show_instructions);
    assert_eq!(engine.phase(), SimPhase::Running);
    assert_eq!(snap.time.tick, 1);
    assert!(persistence::help_seen(engine.store()).unwrap());
}

#[test]
fn test_tick_timing_60_ticks_one_second() {
    let mut engine = running_engine(42);
    let start = engine.time().tick;
    for _ in 0..TICK_RATE {
        engine.tick();
    }
    assert_eq!(engine.time().tick - start, TICK_RATE as u64);
    assert!((engine.time().elapsed_secs - (1.0 + 1.0 / 60.0)).abs() < 1e-9);
}

#[test]
fn test_pause_stops_simulation() {
    let mut engine = running_engine(42);
    for _ in 0..30 {
        engine.tick();
    }

    engine.queue_command(PlayerCommand::ToggleInstructions);
    let paused = engine.tick();
    assert_eq!(paused.phase, SimPhase::Paused);
    let frozen_tick = paused.time.tick;
    let frozen_enemies = paused.enemies.len();

    for _ in 0..100 {
        let snap = engine.tick();
        assert_eq!(snap.time.tick, frozen_tick);
        assert_eq!(snap.enemies.len(), frozen_enemies);
    }

    engine.queue_command(PlayerCommand::ToggleInstructions);
    let resumed = engine.tick();
    assert_eq!(resumed.phase, SimPhase::Running);
    assert_eq!(resumed.time.tick, frozen_tick + 1);
}

#[test]
fn test_fire_ignored_while_paused() {
    let mut engine = running_engine(42);
    engine.queue_command(PlayerCommand::ToggleInstructions);
    engine.tick();

    engine.queue_command(PlayerCommand::FireManual);
    engine.queue_command(PlayerCommand::ToggleInstructions);
    engine.tick();

    let manual = {
        let mut q = engine.world().query::<&Bullet>();
        q.iter().filter(|(_, b)| b.source == BulletSource::Manual).count()
    };
    assert_eq!(manual, 0, "Fire queued while paused must be dropped");
}

#[test]
fn test_select_upgrade_ignored_outside_level_up() {
    let mut engine = running_engine(42);
    let before = engine.player().stats.clone();
    engine.queue_command(PlayerCommand::SelectUpgrade { index: 0 });
    engine.tick();
    assert_eq!(engine.phase(), SimPhase::Running);
    assert_eq!(engine.player().stats, before);
}

// ---- Player ----

#[test]
fn test_player_clamped_to_arena() {
    let arena = Arena::default();
    let mut player = PlayerState::new(arena.center(), Default::default());
    let intent = MoveIntent {
        up: true,
        left: true,
        ..Default::default()
    };
    for _ in 0..300 {
        player_control::run(&mut player, &intent, &arena);
    }
    assert_eq!(player.position.x, PLAYER_RADIUS);
    assert_eq!(player.position.y, PLAYER_RADIUS);

    let intent = MoveIntent {
        down: true,
        right: true,
        ..Default::default()
    };
    for _ in 0..300 {
        player_control::run(&mut player, &intent, &arena);
    }
    assert_eq!(player.position.x, arena.width - PLAYER_RADIUS);
    assert_eq!(player.position.y, arena.height - PLAYER_RADIUS);
}

#[test]
fn test_manual_fire_spawns_bullet_toward_cursor() {
    let mut engine = running_engine(42);
    let p = engine.player().position;
    engine.queue_command(PlayerCommand::SetCursor {
        x: p.x,
        y: p.y - 200.0,
    });
    engine.queue_command(PlayerCommand::FireManual);
    let snap = engine.tick();

    let manual: Vec<Position> = {
        let mut q = engine.world().query::<(&Bullet, &Position)>();
        q.iter()
            .filter(|(_, (b, _))| b.source == BulletSource::Manual)
            .map(|(_, (_, pos))| *pos)
            .collect()
    };
    assert_eq!(manual.len(), 1);
    assert!(manual[0].y < p.y, "Bullet should travel toward the cursor");
    assert!(snap.effects.screen_shake > 0.0);
    assert_eq!(engine.player().manual_cooldown, engine.player().stats.manual_rate - 1);
}

// ---- Contact and combat ----

#[test]
fn test_contact_damages_player_and_consumes_enemy() {
    let mut engine = running_engine(42);
    let on_player = engine.player().position;
    let entity = engine.spawn_test_enemy(EnemyKind::Basic, on_player);

    let snap = engine.tick();
    assert!(engine.world().get::<&Enemy>(entity).is_err(), "Enemy should be consumed");
    assert_eq!(engine.player().health, PLAYER_MAX_HEALTH - ENEMY_CONTACT_DAMAGE);
    assert_eq!(engine.run_stats().total_kills, 0, "Contact is not a kill");
    assert_eq!(engine.run_stats().kill_combo, 0);
    assert!(snap.effects.hit_flash > 0.0);
}

#[test]
fn test_invulnerable_player_ignores_contact() {
    let mut engine = running_engine(42);
    engine.player_mut().invuln_ticks = 10;
    let on_player = engine.player().position;
    let entity = engine.spawn_test_enemy(EnemyKind::Tank, on_player);

    engine.tick();
    assert!(engine.world().get::<&Enemy>(entity).is_err());
    assert_eq!(engine.player().health, PLAYER_MAX_HEALTH);
    assert_eq!(engine.player().invuln_ticks, 9);
}

#[test]
fn test_health_never_below_zero_and_game_over() {
    let mut engine = running_engine(42);
    engine.player_mut().health = 5.0;
    let on_player = engine.player().position;
    engine.spawn_test_enemy(EnemyKind::Elite, on_player);

    let snap = engine.tick();
    assert_eq!(engine.player().health, 0.0);
    assert_eq!(snap.phase, SimPhase::GameOver);
    assert_eq!(snap.final_score, Some(engine.run_stats().score));
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::GameOver { .. })));

    let frozen = snap.time.tick;
    for _ in 0..10 {
        assert_eq!(engine.tick().time.tick, frozen);
    }
}

#[test]
fn test_death_is_not_undone_by_same_tick_boss_heal() {
    let mut engine = running_engine(42);
    engine.player_mut().health = 5.0;
    let on_player = engine.player().position;
    engine.spawn_test_enemy(EnemyKind::Basic, on_player);

    let near = beside_player(&engine, 60.0, 0.0);
    let boss = engine.spawn_test_enemy(EnemyKind::Basic, near);
    {
        let mut enemy = engine.world_mut().get::<&mut Enemy>(boss).unwrap();
        enemy.kind = EnemyKind::Boss;
        enemy.health = 0.5;
    }
    engine.spawn_test_bullet(BulletSource::Manual, near, 1.0);

    let snap = engine.tick();
    assert_eq!(engine.run_stats().bosses_defeated, 1, "Boss should die this tick");
    assert_eq!(engine.player().health, 0.0, "Boss heal must not revive");
    assert_eq!(snap.phase, SimPhase::GameOver);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::GameOver { .. })));
}

#[test]
fn test_aura_kills_enemy_and_scores() {
    let mut engine = running_engine(42);
    let pos = beside_player(&engine, 80.0, 0.0);
    let entity = engine.spawn_test_enemy(EnemyKind::Basic, pos);
    engine.world_mut().get::<&mut Enemy>(entity).unwrap().health = 1.0;

    for _ in 0..30 {
        engine.tick();
    }
    assert!(engine.world().get::<&Enemy>(entity).is_err());
    assert!(engine.run_stats().total_kills >= 1);
    assert!(engine.run_stats().score >= SCORE_PER_KILL);
    assert_eq!(engine.player().health, PLAYER_MAX_HEALTH);
}

#[test]
fn test_enemies_sorted_by_seq_in_snapshot() {
    let mut engine = running_engine(42);
    let far = beside_player(&engine, 300.0, 200.0);
    engine.spawn_test_enemy(EnemyKind::Tank, far);
    engine.spawn_test_enemy(EnemyKind::Fast, far);
    engine.spawn_test_enemy(EnemyKind::Basic, far);

    let snap = engine.tick();
    let seqs: Vec<u64> = snap.enemies.iter().map(|e| e.seq).collect();
    let mut sorted = seqs.clone();
    sorted.sort_unstable();
    assert_eq!(seqs, sorted);
}

// ---- Progression ----

#[test]
fn test_multi_level_pickup_queues_choices() {
    let mut engine = running_engine(42);
    let gained = engine.progression_mut().add_xp(50 + 148 + 10, 1);
    assert_eq!(gained, 2);
    assert_eq!(engine.progression().level, 3);
    assert_eq!(engine.progression().current_xp, 10);
    assert_eq!(engine.progression().pending_level_ups(), 2);

    let snap = engine.tick();
    assert_eq!(snap.phase, SimPhase::AwaitingUpgradeChoice);
    assert_eq!(snap.upgrade_offers.len(), 3);
    assert!(snap.sounds.contains(&SoundEvent::LevelUp));
    assert_eq!(engine.progression().pending_level_ups(), 1);

    let frozen = snap.time.tick;
    assert_eq!(engine.tick().time.tick, frozen, "Level-up freezes the run");

    engine.queue_command(PlayerCommand::SelectUpgrade { index: 0 });
    let snap = engine.tick();
    assert_eq!(snap.phase, SimPhase::AwaitingUpgradeChoice, "Second level-up follows");
    assert_eq!(engine.progression().pending_level_ups(), 0);

    engine.queue_command(PlayerCommand::SelectUpgrade { index: 2 });
    let snap = engine.tick();
    assert_eq!(snap.phase, SimPhase::Running);
    assert!(snap.upgrade_offers.is_empty());
    assert_eq!(snap.time.tick, frozen + 1);
}

#[test]
fn test_queued_level_ups_draw_offers_for_their_own_level() {
    for seed in 0..200 {
        let mut engine = running_engine(seed);
        // Level 1 straight to 4.
        assert_eq!(engine.progression_mut().add_xp(50 + 148 + 284, 1), 3);

        let snap = engine.tick();
        assert!(snap
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::LevelUp { level: 2 })));
        assert!(
            snap.upgrade_offers.iter().all(|o| o.rarity != Rarity::Legendary),
            "seed {seed}: legendary offered on the level-2 menu"
        );

        engine.queue_command(PlayerCommand::SelectUpgrade { index: 0 });
        let snap = engine.tick();
        assert!(snap
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::LevelUp { level: 3 })));
        assert!(
            snap.upgrade_offers.iter().all(|o| o.rarity != Rarity::Legendary),
            "seed {seed}: legendary offered on the level-3 menu"
        );
        assert_eq!(engine.progression().pending_level_ups(), 1);
    }
}

#[test]
fn test_out_of_range_selection_keeps_menu_open() {
    let mut engine = running_engine(42);
    engine.progression_mut().add_xp(50, 1);
    engine.tick();
    assert_eq!(engine.phase(), SimPhase::AwaitingUpgradeChoice);

    engine.queue_command(PlayerCommand::SelectUpgrade { index: 7 });
    engine.tick();
    assert_eq!(engine.phase(), SimPhase::AwaitingUpgradeChoice);
    assert_eq!(engine.offers().len(), 3);
}

// ---- Persistence ----

#[test]
fn test_upgrade_choice_persists_and_survives_restart() {
    let mut engine = running_engine(42);
    engine.progression_mut().add_xp(50, 1);
    engine.tick();
    engine.queue_command(PlayerCommand::SelectUpgrade { index: 0 });
    engine.tick();

    let saved = persistence::load_upgrades(engine.store()).unwrap();
    assert!(saved.is_some(), "Choosing an upgrade should save stats");

    engine.queue_command(PlayerCommand::Restart);
    engine.tick();
    assert_eq!(engine.player().stats, persistence::restore_stats(engine.store()));
    assert_eq!(engine.player().stats.multishot, PLAYER_MULTISHOT);
}

#[test]
fn test_restart_resets_run() {
    let mut engine = running_engine(42);
    for _ in 0..200 {
        engine.tick();
    }
    engine.player_mut().health = 40.0;
    engine.progression_mut().add_xp(30, 1);

    engine.queue_command(PlayerCommand::Restart);
    let snap = engine.tick();
    assert_eq!(snap.phase, SimPhase::Running);
    assert_eq!(snap.time.tick, 1);
    assert_eq!(snap.wave.wave, 1);
    assert_eq!(snap.final_score, None);
    assert_eq!(engine.progression().level, 1);
    assert_eq!(engine.progression().current_xp, 0);
    assert_eq!(engine.player().health, engine.player().stats.max_health);
    assert_eq!(engine.run_stats().total_kills, 0);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::WaveStarted { wave: 1 })));
}

// ---- Waves and bosses ----

#[test]
fn test_boss_wave_spawns_single_boss() {
    let mut engine = running_engine(42);
    {
        let director = engine.director_mut();
        director.current_wave = 9;
        director.state = WaveState::Preparing;
        director.countdown = 1;
    }

    let snap = engine.tick();
    assert_eq!(snap.wave.wave, 10);
    assert_eq!(snap.wave.state, WaveState::BossWarning);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::BossWarning { wave: 10 })));

    let mut spawned = None;
    for _ in 0..BOSS_WARNING_TICKS {
        let snap = engine.tick();
        if snap
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::BossSpawned { tier: 1 }))
        {
            spawned = Some(snap);
            break;
        }
    }
    let snap = spawned.expect("Boss should spawn after the warning");
    assert_eq!(snap.wave.state, WaveState::BossFight);

    let bosses = {
        let mut q = engine.world().query::<&BossState>();
        q.iter().count()
    };
    assert_eq!(bosses, 1);
    assert!(enemy_count(&engine) >= 1);
    assert!(snap.effects.screen_shake > 0.0);
}

// ---- Hit resolution ----

#[test]
fn test_overlapping_bullets_reward_a_kill_once() {
    let mut world = World::new();
    let player = centre_player();
    let mut modifiers = ModifierTimers::default();
    let spot = Position::new(100.0, 100.0);
    let enemy = place_enemy(&mut world, 0, spot, 1.0);
    let older = place_bullet(&mut world, 0, spot, 5.0, 0);
    let newer = place_bullet(&mut world, 1, spot, 5.0, 0);

    let (kills, despawn) = resolve_hits(&mut world, &player, &mut modifiers);
    assert_eq!(kills.len(), 1);
    assert_eq!(despawn.iter().filter(|e| **e == enemy).count(), 1);
    assert!(despawn.contains(&newer), "Newest bullet takes the hit");
    assert!(!despawn.contains(&older));

    // The corpse stays in the world until cleanup; it must not die twice.
    let (again, _) = resolve_hits(&mut world, &player, &mut modifiers);
    assert!(again.is_empty());

    let mut player = centre_player();
    let mut stats = RunStats::default();
    dispatch(&mut world, &mut player, &mut stats, &kills);
    assert_eq!(stats.total_kills, 1);
    assert_eq!(stats.score, SCORE_PER_KILL);
    assert_eq!(orb_count(&world), 1);
}

#[test]
fn test_explode_splash_kill_is_not_hit_again() {
    let mut world = World::new();
    let mut player = centre_player();
    player.stats.explode = true;
    let mut modifiers = ModifierTimers::default();

    let first = place_enemy(&mut world, 0, Position::new(100.0, 100.0), 1.0);
    let second = place_enemy(&mut world, 1, Position::new(110.0, 100.0), 1.0);
    let direct = place_bullet(&mut world, 0, Position::new(110.0, 100.0), 4.0, 0);
    let splash = place_bullet(&mut world, 1, Position::new(100.0, 100.0), 4.0, 0);

    let (kills, despawn) = resolve_hits(&mut world, &player, &mut modifiers);
    assert_eq!(kills.len(), 2);
    assert_eq!(despawn.iter().filter(|e| **e == first).count(), 1);
    assert_eq!(despawn.iter().filter(|e| **e == second).count(), 1);
    assert!(despawn.contains(&splash));
    assert!(
        !despawn.contains(&direct),
        "A bullet over an enemy already killed by splash passes through"
    );
}

#[test]
fn test_pierce_skips_enemies_already_struck() {
    let mut world = World::new();
    let player = centre_player();
    let mut modifiers = ModifierTimers::default();

    let struck = place_enemy(&mut world, 0, Position::new(100.0, 100.0), 10.0);
    let old_shot = place_bullet(&mut world, 0, Position::new(100.0, 100.0), 2.0, 1);
    world.get::<&mut Bullet>(old_shot).unwrap().hit_enemies.push(0);

    let fresh = place_enemy(&mut world, 1, Position::new(300.0, 100.0), 10.0);
    let new_shot = place_bullet(&mut world, 1, Position::new(300.0, 100.0), 2.0, 1);

    let (kills, despawn) = resolve_hits(&mut world, &player, &mut modifiers);
    assert!(kills.is_empty());
    assert!(despawn.is_empty(), "Piercing bullets survive their hit");
    assert_eq!(health_of(&world, struck), 10.0);
    assert_eq!(health_of(&world, fresh), 8.0);
    {
        let bullet = world.get::<&Bullet>(new_shot).unwrap();
        assert_eq!(bullet.pierce_left, 0);
        assert_eq!(bullet.hit_enemies, vec![1]);
    }

    // Still overlapping on the next pass, but already struck.
    resolve_hits(&mut world, &player, &mut modifiers);
    assert_eq!(health_of(&world, fresh), 8.0);
}

#[test]
fn test_chain_lightning_jumps_to_nearest() {
    let mut world = World::new();
    let mut player = centre_player();
    player.stats.chain_lightning = true;
    let mut modifiers = ModifierTimers::default();

    let hit = place_enemy(&mut world, 0, Position::new(100.0, 100.0), 10.0);
    let far = place_enemy(&mut world, 1, Position::new(160.0, 100.0), 10.0);
    let near = place_enemy(&mut world, 2, Position::new(130.0, 100.0), 10.0);
    place_bullet(&mut world, 0, Position::new(100.0, 100.0), 4.0, 0);

    resolve_hits(&mut world, &player, &mut modifiers);
    assert_eq!(health_of(&world, hit), 6.0);
    assert_eq!(health_of(&world, near), 8.0);
    assert_eq!(health_of(&world, far), 10.0);
}

#[test]
fn test_orbiting_shield_waits_twenty_ticks_between_strikes() {
    fn next_shield(player: &PlayerState, modifiers: &ModifierTimers) -> Position {
        let mut next = *modifiers;
        next.orbit_angle = (next.orbit_angle + SHIELD_ORBIT_SPEED) % std::f32::consts::TAU;
        combat::shield_position(player, &next)
    }

    let mut world = World::new();
    let mut player = centre_player();
    player.stats.orbiting_shield = true;
    let mut modifiers = ModifierTimers::default();

    let enemy = place_enemy(&mut world, 0, next_shield(&player, &modifiers), 10.0);
    resolve_hits(&mut world, &player, &mut modifiers);
    assert_eq!(health_of(&world, enemy), 9.0);
    assert_eq!(modifiers.shield_cooldown, SHIELD_HIT_COOLDOWN);

    // Keep the enemy on the shield; it is spared until the cooldown runs out.
    for _ in 1..SHIELD_HIT_COOLDOWN {
        *world.get::<&mut Position>(enemy).unwrap() = next_shield(&player, &modifiers);
        resolve_hits(&mut world, &player, &mut modifiers);
        assert_eq!(health_of(&world, enemy), 9.0);
    }

    *world.get::<&mut Position>(enemy).unwrap() = next_shield(&player, &modifiers);
    resolve_hits(&mut world, &player, &mut modifiers);
    assert_eq!(health_of(&world, enemy), 8.0);
    assert_eq!(modifiers.shield_cooldown, SHIELD_HIT_COOLDOWN);
}

#[test]
fn test_consumed_enemies_leave_the_risk_survey() {
    let mut world = World::new();
    let mut player = centre_player();
    for seq in 0..5 {
        place_enemy(&mut world, seq, player.position, 3.0);
    }
    assert_eq!(pressure::survey(&world, &player.position).nearby_enemies, 5);

    let mut rng = test_rng();
    let mut stats = RunStats::default();
    let mut effects = ScreenEffects::default();
    let mut feedback = Feedback::default();
    let mut despawn = Vec::new();
    combat::resolve_contacts(
        &mut world,
        &mut rng,
        &mut player,
        &mut stats,
        &mut effects,
        &mut feedback,
        &mut despawn,
    );

    assert_eq!(player.health, PLAYER_MAX_HEALTH - 5.0 * ENEMY_CONTACT_DAMAGE);
    assert_eq!(despawn.len(), 5);
    assert_eq!(pressure::survey(&world, &player.position).nearby_enemies, 0);
}

// ---- Kill rewards ----

#[test]
fn test_life_steal_heals_every_tenth_kill() {
    let mut world = World::new();
    let mut player = centre_player();
    player.stats.life_steal = true;
    player.health = 50.0;
    let mut stats = RunStats::default();

    dispatch(&mut world, &mut player, &mut stats, &[basic_kill(); 9]);
    assert_eq!(player.health, 50.0);
    dispatch(&mut world, &mut player, &mut stats, &[basic_kill()]);
    assert_eq!(player.health, 50.0 + LIFE_STEAL_HEAL);

    dispatch(&mut world, &mut player, &mut stats, &[basic_kill(); 9]);
    assert_eq!(player.health, 50.0 + LIFE_STEAL_HEAL);
    dispatch(&mut world, &mut player, &mut stats, &[basic_kill()]);
    assert_eq!(player.health, 50.0 + 2.0 * LIFE_STEAL_HEAL);
    assert_eq!(stats.total_kills, 20);
}

#[test]
fn test_boss_kill_heals_only_a_living_player() {
    let boss_kill = Kill {
        kind: EnemyKind::Boss,
        position: Position::new(200.0, 200.0),
        xp_value: BOSS_BASE_XP,
    };

    let mut world = World::new();
    let mut player = centre_player();
    player.health = 50.0;
    let mut stats = RunStats::default();
    dispatch(&mut world, &mut player, &mut stats, &[boss_kill]);
    assert_eq!(player.health, 80.0);
    assert_eq!(stats.bosses_defeated, 1);
    assert_eq!(stats.score, SCORE_PER_KILL + SCORE_PER_BOSS);

    player.health = 0.0;
    dispatch(&mut world, &mut player, &mut stats, &[boss_kill]);
    assert_eq!(player.health, 0.0);
}

// ---- Weapons ----

#[test]
fn test_manual_and_passive_shot_asymmetry() {
    let mut world = World::new();
    let mut player = centre_player();
    let mut seq = 0;
    weapons::fire(&mut world, &mut player, BulletSource::Manual, 0.0, &mut seq);
    weapons::fire(&mut world, &mut player, BulletSource::Passive, 0.0, &mut seq);

    let bullets = bullets_by_seq(&world);
    let (manual, passive) = (&bullets[0].0, &bullets[1].0);
    assert_eq!(manual.source, BulletSource::Manual);
    assert!((manual.damage - PLAYER_BULLET_DAMAGE * 2.0).abs() < 1e-6);
    assert!((manual.size - PLAYER_BULLET_SIZE).abs() < 1e-6);
    assert_eq!(passive.source, BulletSource::Passive);
    assert!((passive.damage - PLAYER_BULLET_DAMAGE * 0.5).abs() < 1e-6);
    assert!((passive.size - PLAYER_BULLET_SIZE * 0.7).abs() < 1e-6);
}

#[test]
fn test_multishot_fans_around_aim() {
    let mut world = World::new();
    let mut player = centre_player();
    player.stats.multishot = 3;
    let mut seq = 0;
    weapons::fire(&mut world, &mut player, BulletSource::Manual, 0.5, &mut seq);

    let bullets = bullets_by_seq(&world);
    assert_eq!(bullets.len(), 3);
    for ((_, vel, pos), expected) in bullets.iter().zip([0.2f32, 0.5, 0.8]) {
        assert!((vel.y.atan2(vel.x) - expected).abs() < 1e-5);
        assert!((vel.speed() - player.stats.projectile_speed).abs() < 1e-4);
        assert!((player.position.range_to(pos) - player.stats.radius).abs() < 1e-4);
    }

    let mut world = World::new();
    player.stats.multishot = 2;
    weapons::fire(&mut world, &mut player, BulletSource::Manual, 0.5, &mut seq);
    let angles: Vec<f32> = bullets_by_seq(&world)
        .iter()
        .map(|(_, vel, _)| vel.y.atan2(vel.x))
        .collect();
    assert!((angles[0] - 0.35).abs() < 1e-5);
    assert!((angles[1] - 0.65).abs() < 1e-5);
}

#[test]
fn test_critical_strike_every_fifth_fire() {
    let mut world = World::new();
    let mut player = centre_player();
    player.stats.critical_strike = true;
    let mut seq = 0;
    for _ in 0..10 {
        weapons::fire(&mut world, &mut player, BulletSource::Manual, 0.0, &mut seq);
    }
    assert_eq!(player.shots_fired, 10);

    let damages: Vec<f32> = bullets_by_seq(&world).iter().map(|(b, _, _)| b.damage).collect();
    for (i, damage) in damages.iter().enumerate() {
        let expected = if (i + 1) % 5 == 0 { 6.0 } else { 2.0 };
        assert_eq!(*damage, expected, "shot {}", i + 1);
    }
}

// ---- Time stop ----

#[test]
fn test_time_stop_halves_enemy_speed() {
    let mut engine = running_engine(42);
    let spot = beside_player(&engine, 0.0, -250.0);
    let enemy = engine.spawn_test_enemy(EnemyKind::Basic, spot);
    let speed = engine.world().get::<&Enemy>(enemy).unwrap().speed;

    engine.modifiers_mut().time_stop_ticks = 30;
    let before = *engine.world().get::<&Position>(enemy).unwrap();
    engine.tick();
    let after = *engine.world().get::<&Position>(enemy).unwrap();
    assert!((before.range_to(&after) - speed * TIME_STOP_SLOW_FACTOR).abs() < 1e-3);

    engine.modifiers_mut().time_stop_ticks = 0;
    engine.tick();
    let last = *engine.world().get::<&Position>(enemy).unwrap();
    assert!((after.range_to(&last) - speed).abs() < 1e-3);
}

// ---- XP orbs ----

fn orb_pass(
    world: &mut World,
    player: &PlayerState,
    progression: &mut Progression,
    feedback: &mut Feedback,
    despawn: &mut Vec<Entity>,
) -> u32 {
    let mut rng = test_rng();
    orbs::run(world, &mut rng, player, progression, 1, feedback, despawn)
}

#[test]
fn test_orb_expires_after_lifetime() {
    let mut world = World::new();
    let player = centre_player();
    let mut progression = Progression::new();
    let mut feedback = Feedback::default();
    let mut despawn = Vec::new();
    let orb = world_setup::spawn_xp_orb(&mut world, Position::new(100.0, 100.0), 10);

    for _ in 1..XP_ORB_LIFETIME {
        orb_pass(&mut world, &player, &mut progression, &mut feedback, &mut despawn);
    }
    assert!(despawn.is_empty());
    assert_eq!(world.get::<&XpOrb>(orb).unwrap().lifetime, 1);

    orb_pass(&mut world, &player, &mut progression, &mut feedback, &mut despawn);
    assert_eq!(despawn, vec![orb]);
    assert_eq!(progression.current_xp, 0);
}

#[test]
fn test_magnet_pulls_only_inside_range() {
    let mut world = World::new();
    let player = centre_player();
    let mut progression = Progression::new();
    let mut feedback = Feedback::default();
    let mut despawn = Vec::new();
    let inside = world_setup::spawn_xp_orb(&mut world, Position::new(450.0, 300.0), 10);
    let outside = world_setup::spawn_xp_orb(&mut world, Position::new(400.0, 300.0 + MAGNET_RANGE + 1.0), 10);

    orb_pass(&mut world, &player, &mut progression, &mut feedback, &mut despawn);
    let pulled = *world.get::<&Position>(inside).unwrap();
    assert!((player.position.range_to(&pulled) - (50.0 - XP_ORB_PULL_SPEED)).abs() < 1e-3);
    let resting = *world.get::<&Position>(outside).unwrap();
    assert_eq!(resting, Position::new(400.0, 300.0 + MAGNET_RANGE + 1.0));
    assert!(despawn.is_empty());
}

#[test]
fn test_orb_collection_uses_distance_before_pull() {
    let mut world = World::new();
    let player = centre_player();
    let mut progression = Progression::new();
    let mut feedback = Feedback::default();
    let mut despawn = Vec::new();
    // Radius 15 + orb size 3 = 18: just out of reach, pulled to 17.
    let orb = world_setup::spawn_xp_orb(&mut world, Position::new(420.0, 300.0), 10);

    let levels = orb_pass(&mut world, &player, &mut progression, &mut feedback, &mut despawn);
    assert_eq!(levels, 0);
    assert!(!world.get::<&XpOrb>(orb).unwrap().collected);
    assert_eq!(progression.current_xp, 0);
    assert!(!feedback.sounds.contains(&SoundEvent::Xp));

    orb_pass(&mut world, &player, &mut progression, &mut feedback, &mut despawn);
    assert!(world.get::<&XpOrb>(orb).unwrap().collected);
    assert_eq!(despawn, vec![orb]);
    assert_eq!(progression.current_xp, 10);
    assert_eq!(feedback.sounds, vec![SoundEvent::Xp]);

    world_setup::spawn_xp_orb(&mut world, Position::new(405.0, 300.0), 40);
    let levels = orb_pass(&mut world, &player, &mut progression, &mut feedback, &mut despawn);
    assert_eq!(levels, 1);
    assert_eq!(progression.level, 2);
}
