//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use thornwood_core::components::*;
use thornwood_core::constants::TICK_RATE;
use thornwood_core::enums::SimPhase;
use thornwood_core::events::{GameEvent, SoundEvent};
use thornwood_core::player::PlayerState;
use thornwood_core::state::*;
use thornwood_core::types::{Position, SimTime};

use thornwood_director::wave::WaveDirector;

use crate::pressure::PressureGauge;
use crate::progression::Progression;
use crate::run_stats::{ModifierTimers, RunStats, ScreenEffects};
use crate::systems::combat::shield_position;

/// Everything outside the world that the snapshot reads.
pub struct SnapshotContext<'a> {
    pub time: SimTime,
    pub phase: SimPhase,
    pub player: &'a PlayerState,
    pub cursor: Position,
    pub modifiers: &'a ModifierTimers,
    pub progression: &'a Progression,
    pub director: &'a WaveDirector,
    pub stats: &'a RunStats,
    pub pressure: &'a PressureGauge,
    pub effects: &'a ScreenEffects,
    pub offers: &'a [UpgradeOffer],
    pub final_score: Option<u64>,
    pub show_instructions: bool,
}

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    ctx: &SnapshotContext<'_>,
    sounds: Vec<SoundEvent>,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: ctx.time,
        phase: ctx.phase,
        player: build_player(ctx),
        hud: HudView {
            health_percent: ctx.player.health_percent(),
            xp_percent: ctx.progression.xp_percent(),
            level: ctx.progression.level,
            level_label: ctx.progression.level_label(),
            score: ctx.stats.score,
            pressure: ctx.pressure.pressure,
            kill_combo: ctx.stats.kill_combo,
        },
        wave: WaveView {
            state: ctx.director.state,
            wave: ctx.director.current_wave,
            countdown_secs: ctx.director.countdown_secs(),
        },
        enemies: build_enemies(world),
        bullets: build_bullets(world),
        particles: build_particles(world),
        orbs: build_orbs(world),
        upgrade_offers: ctx.offers.to_vec(),
        sounds,
        events,
        effects: EffectsView {
            screen_shake: ctx.effects.screen_shake,
            hit_flash: ctx.effects.hit_flash,
        },
        final_score: ctx.final_score,
        show_instructions: ctx.show_instructions,
    }
}

fn build_player(ctx: &SnapshotContext<'_>) -> PlayerView {
    let player = ctx.player;
    PlayerView {
        position: player.position,
        radius: player.stats.radius,
        health: player.health,
        max_health: player.stats.max_health,
        aura_radius: player.stats.aura_radius,
        aim_angle: player.position.angle_to(&ctx.cursor),
        invulnerable: player.is_invulnerable(),
        shield: player
            .stats
            .orbiting_shield
            .then(|| shield_position(player, ctx.modifiers)),
    }
}

/// Enemy views in spawn order.
fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&Enemy, &Position, &HitFlash, Option<&BossState>)>()
        .iter()
        .filter(|(_, (enemy, _, _, _))| !enemy.dead)
        .map(|(_, (enemy, pos, flash, boss))| EnemyView {
            seq: enemy.seq,
            kind: enemy.kind,
            position: *pos,
            radius: enemy.radius,
            health: enemy.health,
            hit_flash: flash.0,
            boss: boss.map(|b| BossView {
                health_fraction: if b.max_health > 0.0 {
                    (enemy.health / b.max_health).clamp(0.0, 1.0)
                } else {
                    0.0
                },
                phase: b.phase,
                tier: b.tier,
            }),
        })
        .collect();
    enemies.sort_by_key(|e| e.seq);
    enemies
}

fn build_bullets(world: &World) -> Vec<BulletView> {
    let mut bullets: Vec<(u64, BulletView)> = world
        .query::<(&Bullet, &Position)>()
        .iter()
        .map(|(_, (bullet, pos))| {
            (
                bullet.seq,
                BulletView {
                    position: *pos,
                    size: bullet.size,
                    source: bullet.source,
                },
            )
        })
        .collect();
    bullets.sort_by_key(|(seq, _)| *seq);
    bullets.into_iter().map(|(_, view)| view).collect()
}

fn build_particles(world: &World) -> Vec<ParticleView> {
    world
        .query::<(&Particle, &Position)>()
        .iter()
        .map(|(_, (particle, pos))| ParticleView {
            position: *pos,
            kind: particle.kind,
            size: particle.size,
            life: particle.life,
        })
        .collect()
}

fn build_orbs(world: &World) -> Vec<OrbView> {
    world
        .query::<(&XpOrb, &Position)>()
        .iter()
        .filter(|(_, (orb, _))| !orb.collected)
        .map(|(_, (orb, pos))| OrbView {
            position: *pos,
            size: orb.size,
            alpha: (orb.lifetime as f32 / TICK_RATE as f32).min(1.0),
        })
        .collect()
}
