//! Combat resolution: contact damage, boss projectiles, player hits, and
//! reward dispatch.
//!
//! Enemies are resolved in spawn order and bullets newest-first, so the same
//! world always produces the same hits and the same kill order. Component
//! state is copied out, resolved, then written back in one pass.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use thornwood_core::components::{Bullet, Enemy, HitFlash, Knockback};
use thornwood_core::constants::*;
use thornwood_core::enums::{BulletSource, EnemyKind, ParticleKind};
use thornwood_core::events::SoundEvent;
use thornwood_core::player::PlayerState;
use thornwood_core::types::Position;

use thornwood_director::wave::WaveDirector;

use crate::pressure::{kill_reward, RiskTracker, Surroundings};
use crate::run_stats::{Feedback, ModifierTimers, RunStats, ScreenEffects};
use crate::world_setup;

/// An enemy whose health reached zero this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub kind: EnemyKind,
    pub position: Position,
    pub xp_value: u32,
}

/// Values that shape the XP of every kill this tick.
#[derive(Debug, Clone, Copy)]
pub struct RewardContext {
    pub wave: u32,
    pub pressure_mult: f64,
    pub surroundings: Surroundings,
}

/// Enemies that touch the player deal their contact damage once and are
/// removed, bosses included. While invulnerable the enemy is still removed.
#[allow(clippy::too_many_arguments)]
pub fn resolve_contacts(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    player: &mut PlayerState,
    stats: &mut RunStats,
    effects: &mut ScreenEffects,
    feedback: &mut Feedback,
    despawn_buffer: &mut Vec<Entity>,
) {
    let mut touching: Vec<(u64, Entity, f32)> = Vec::new();
    for (entity, (enemy, pos)) in world.query_mut::<(&mut Enemy, &Position)>() {
        if enemy.dead {
            continue;
        }
        if player.position.range_to(pos) < player.stats.radius + enemy.radius {
            // Consumed, not killed: no reward follows.
            enemy.dead = true;
            touching.push((enemy.seq, entity, enemy.contact_damage));
        }
    }
    touching.sort_by_key(|(seq, _, _)| *seq);

    for (_seq, entity, damage) in touching {
        despawn_buffer.push(entity);
        if player.take_damage(damage) <= 0.0 {
            continue;
        }
        stats.record_damage();
        effects.add_shake(SHAKE_CONTACT);
        effects.add_flash(FLASH_CONTACT);
        world_setup::spawn_particles(world, rng, player.position, ParticleKind::PlayerHurt, HURT_PARTICLES);
        feedback.sound(SoundEvent::Damage);
    }
}

/// Boss projectiles only ever hurt the player.
pub fn resolve_boss_bullets(
    world: &mut World,
    player: &mut PlayerState,
    stats: &mut RunStats,
    feedback: &mut Feedback,
    despawn_buffer: &mut Vec<Entity>,
) {
    let mut hits: Vec<(u64, Entity, f32)> = Vec::new();
    for (entity, (bullet, pos)) in world.query::<(&Bullet, &Position)>().iter() {
        if bullet.source != BulletSource::Boss {
            continue;
        }
        if player.position.range_to(pos) < player.stats.radius + bullet.size {
            hits.push((bullet.seq, entity, bullet.damage));
        }
    }
    hits.sort_by_key(|(seq, _, _)| *seq);

    for (_seq, entity, damage) in hits {
        despawn_buffer.push(entity);
        if player.take_damage(damage) > 0.0 {
            stats.record_damage();
            feedback.sound(SoundEvent::Damage);
        }
    }
}

/// Working copy of an enemy during hit resolution.
struct Target {
    entity: Entity,
    seq: u64,
    kind: EnemyKind,
    position: Position,
    radius: f32,
    health: f32,
    xp_value: u32,
    dead: bool,
    impulse: (f32, f32),
    flashed: bool,
}

/// Working copy of a player bullet.
struct Shot {
    entity: Entity,
    seq: u64,
    position: Position,
    size: f32,
    damage: f32,
    pierce_left: u32,
    hit_enemies: Vec<u64>,
    consumed: bool,
    pierced: bool,
}

fn strike(targets: &mut [Target], index: usize, amount: f32, kills: &mut Vec<usize>) {
    let target = &mut targets[index];
    if target.dead {
        return;
    }
    target.health -= amount;
    if target.health <= 0.0 {
        target.dead = true;
        kills.push(index);
    }
}

/// Player bullets and the orbiting shield against enemies. Returns kills in
/// the order they happened.
pub fn resolve_player_hits(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    player: &PlayerState,
    modifiers: &mut ModifierTimers,
    feedback: &mut Feedback,
    despawn_buffer: &mut Vec<Entity>,
) -> Vec<Kill> {
    let stats = &player.stats;

    let mut targets: Vec<Target> = world
        .query::<(&Enemy, &Position)>()
        .iter()
        .filter(|(_, (enemy, _))| !enemy.dead)
        .map(|(entity, (enemy, pos))| Target {
            entity,
            seq: enemy.seq,
            kind: enemy.kind,
            position: *pos,
            radius: enemy.radius,
            health: enemy.health,
            xp_value: enemy.xp_value,
            dead: false,
            impulse: (0.0, 0.0),
            flashed: false,
        })
        .collect();
    targets.sort_by_key(|t| t.seq);

    let mut shots: Vec<Shot> = world
        .query::<(&Bullet, &Position)>()
        .iter()
        .filter(|(_, (bullet, _))| bullet.source != BulletSource::Boss)
        .map(|(entity, (bullet, pos))| Shot {
            entity,
            seq: bullet.seq,
            position: *pos,
            size: bullet.size,
            damage: bullet.damage,
            pierce_left: bullet.pierce_left,
            hit_enemies: bullet.hit_enemies.clone(),
            consumed: false,
            pierced: false,
        })
        .collect();
    shots.sort_by_key(|s| std::cmp::Reverse(s.seq));

    let mut kills: Vec<usize> = Vec::new();
    let mut hit_sites: Vec<Position> = Vec::new();

    for i in 0..targets.len() {
        if targets[i].dead {
            continue;
        }
        let (seq, position, radius) = (targets[i].seq, targets[i].position, targets[i].radius);

        let Some(shot) = shots.iter_mut().find(|s| {
            !s.consumed
                && !s.hit_enemies.contains(&seq)
                && s.position.range_to(&position) < radius + s.size
        }) else {
            continue;
        };

        let damage = shot.damage;
        let knock_angle = shot.position.angle_to(&position);
        if shot.pierce_left > 0 {
            shot.pierce_left -= 1;
            shot.hit_enemies.push(seq);
            shot.pierced = true;
        } else {
            shot.consumed = true;
        }

        let force = BASE_KNOCKBACK + stats.knockback;
        let target = &mut targets[i];
        target.impulse.0 += knock_angle.cos() * force;
        target.impulse.1 += knock_angle.sin() * force;
        target.flashed = true;
        hit_sites.push(position);
        feedback.sound(SoundEvent::Hit);

        strike(&mut targets, i, damage, &mut kills);

        if stats.explode {
            let splash = damage * EXPLODE_DAMAGE_FRACTION;
            for j in 0..targets.len() {
                if j != i && targets[j].position.range_to(&position) < EXPLODE_RADIUS {
                    strike(&mut targets, j, splash, &mut kills);
                }
            }
        }

        if stats.chain_lightning {
            let mut nearest: Option<(usize, f32)> = None;
            for (j, other) in targets.iter().enumerate() {
                if j == i || other.dead {
                    continue;
                }
                let distance = other.position.range_to(&position);
                if distance < CHAIN_RANGE && nearest.map_or(true, |(_, d)| distance < d) {
                    nearest = Some((j, distance));
                }
            }
            if let Some((j, _)) = nearest {
                strike(&mut targets, j, damage * CHAIN_DAMAGE_FRACTION, &mut kills);
            }
        }
    }

    if stats.orbiting_shield {
        modifiers.orbit_angle = (modifiers.orbit_angle + SHIELD_ORBIT_SPEED) % std::f32::consts::TAU;
        modifiers.shield_cooldown = modifiers.shield_cooldown.saturating_sub(1);
        if modifiers.shield_cooldown == 0 {
            let shield = shield_position(player, modifiers);
            let mut struck = false;
            for j in 0..targets.len() {
                if !targets[j].dead
                    && targets[j].position.range_to(&shield) < targets[j].radius + SHIELD_SIZE
                {
                    targets[j].flashed = true;
                    strike(&mut targets, j, stats.bullet_damage, &mut kills);
                    struck = true;
                }
            }
            if struck {
                modifiers.shield_cooldown = SHIELD_HIT_COOLDOWN;
                feedback.sound(SoundEvent::Hit);
            }
        }
    }

    // Write back.
    for target in &targets {
        if let Ok(mut enemy) = world.get::<&mut Enemy>(target.entity) {
            enemy.health = target.health;
            if target.dead {
                enemy.dead = true;
            }
        }
        if target.impulse != (0.0, 0.0) {
            if let Ok(mut knockback) = world.get::<&mut Knockback>(target.entity) {
                knockback.x += target.impulse.0;
                knockback.y += target.impulse.1;
            }
        }
        if target.flashed {
            if let Ok(mut flash) = world.get::<&mut HitFlash>(target.entity) {
                flash.0 = 1.0;
            }
        }
        if target.dead {
            despawn_buffer.push(target.entity);
        }
    }

    for shot in &shots {
        if shot.consumed {
            despawn_buffer.push(shot.entity);
        } else if shot.pierced {
            if let Ok(mut bullet) = world.get::<&mut Bullet>(shot.entity) {
                bullet.pierce_left = shot.pierce_left;
                bullet.hit_enemies = shot.hit_enemies.clone();
            }
        }
    }

    for site in hit_sites {
        world_setup::spawn_particles(world, rng, site, ParticleKind::EnemyHit, HIT_PARTICLES);
    }

    kills
        .into_iter()
        .map(|index| {
            let target = &targets[index];
            Kill {
                kind: target.kind,
                position: target.position,
                xp_value: target.xp_value,
            }
        })
        .collect()
}

/// Where the orbiting shield sits this tick.
pub fn shield_position(player: &PlayerState, modifiers: &ModifierTimers) -> Position {
    let mut pos = player.position;
    pos.step(modifiers.orbit_angle, SHIELD_ORBIT_RADIUS);
    pos
}

/// Score, heal, and drop XP for each kill, in order.
#[allow(clippy::too_many_arguments)]
pub fn dispatch_kills(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    kills: &[Kill],
    reward: &RewardContext,
    player: &mut PlayerState,
    stats: &mut RunStats,
    risk: &mut RiskTracker,
    director: &mut WaveDirector,
    feedback: &mut Feedback,
) {
    for kill in kills {
        stats.record_kill();
        risk.on_kill();
        director.enemy_defeated();

        player.kills += 1;
        if player.stats.life_steal && player.kills % LIFE_STEAL_KILLS == 0 {
            player.heal(LIFE_STEAL_HEAL);
        }

        let xp = kill_reward(
            kill.xp_value,
            kill.kind,
            reward.wave,
            reward.pressure_mult,
            risk.multiplier(&reward.surroundings),
        );

        if kill.kind == EnemyKind::Boss {
            stats.record_boss_kill();
            player.heal((player.stats.max_health * BOSS_KILL_HEAL_FRACTION).floor());
            feedback.sound(SoundEvent::Boss);
            tracing::info!(xp, score = stats.score, "boss defeated");
        } else {
            feedback.sound(SoundEvent::Kill);
        }

        world_setup::spawn_xp_orb(world, kill.position, xp);
        world_setup::spawn_particles(world, rng, kill.position, ParticleKind::EnemyDeath, DEATH_PARTICLES);
        world_setup::spawn_particles(world, rng, kill.position, ParticleKind::EnemyDebris, DEBRIS_PARTICLES);
    }
}
