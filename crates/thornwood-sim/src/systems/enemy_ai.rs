//! Enemy AI system: seek the player, and run the boss FSM.
//!
//! Calls the boss FSM from thornwood-director for phase and attack decisions,
//! then applies the results to ECS components. Spawns caused by attacks are
//! collected and made after the query ends.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use thornwood_core::components::{BossState, Enemy};
use thornwood_core::constants::*;
use thornwood_core::enums::{BulletSource, ParticleKind};
use thornwood_core::events::GameEvent;
use thornwood_core::player::PlayerState;
use thornwood_core::types::{Position, Velocity};

use thornwood_director::boss::{evaluate, BossAttack, BossContext};

use crate::run_stats::{Feedback, ScreenEffects};
use crate::world_setup;

/// Run enemy movement for one tick. `speed_factor` slows everyone while
/// time stop is active.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    player: &mut PlayerState,
    speed_factor: f32,
    seq_counter: &mut u64,
    effects: &mut ScreenEffects,
    feedback: &mut Feedback,
) {
    let target = player.position;
    let mut bursts: Vec<Position> = Vec::new();
    let mut shockwaves: Vec<Position> = Vec::new();

    for (_entity, (enemy, pos, boss)) in
        world.query_mut::<(&mut Enemy, &mut Position, Option<&mut BossState>)>()
    {
        if enemy.dead {
            continue;
        }

        if let Some(boss) = boss {
            let update = evaluate(&BossContext {
                tier: boss.tier,
                phase: boss.phase,
                health: enemy.health,
                max_health: boss.max_health,
                attack_timer: boss.attack_timer,
                attack_cooldown: boss.attack_cooldown,
                speed: enemy.speed,
            });

            boss.phase = update.phase;
            boss.attack_timer = update.attack_timer;
            boss.attack_cooldown = update.attack_cooldown;
            enemy.speed = update.speed;

            if update.phase_changed {
                tracing::info!(tier = boss.tier, phase = update.phase.number(), "boss phase change");
                feedback.event(GameEvent::BossPhaseChanged {
                    phase: update.phase,
                });
            }

            match update.attack {
                Some(BossAttack::Charge) => {
                    charge(pos, &target, enemy.speed * speed_factor);
                    effects.add_shake(SHAKE_CHARGE);
                }
                Some(BossAttack::Shockwave) => {
                    shockwaves.push(*pos);
                    if pos.range_to(&target) < BOSS_SHOCKWAVE_RADIUS {
                        player.take_damage(BOSS_SHOCKWAVE_DAMAGE);
                        effects.add_shake(SHAKE_SHOCKWAVE);
                    }
                }
                Some(BossAttack::ChargeWithBurst) => {
                    bursts.push(*pos);
                    charge(pos, &target, enemy.speed * speed_factor);
                    effects.add_shake(SHAKE_CHARGE_LATE);
                }
                None => {}
            }
        }

        let angle = pos.angle_to(&target);
        pos.step(angle, enemy.speed * speed_factor);
    }

    for origin in shockwaves {
        world_setup::spawn_particles(world, rng, origin, ParticleKind::Shockwave, SHOCKWAVE_PARTICLES);
    }

    for origin in bursts {
        let step = std::f32::consts::TAU / BOSS_BURST_COUNT as f32;
        for i in 0..BOSS_BURST_COUNT {
            let angle = step * i as f32 + rng.gen::<f32>() * BOSS_BURST_JITTER;
            world_setup::spawn_bullet(
                world,
                origin,
                Velocity::from_angle(angle, BOSS_BURST_SPEED),
                BulletSource::Boss,
                BOSS_BURST_DAMAGE,
                BOSS_BURST_SIZE,
                0,
                seq_counter,
            );
        }
    }
}

fn charge(pos: &mut Position, target: &Position, speed: f32) {
    let angle = pos.angle_to(target);
    pos.step(angle, speed * BOSS_CHARGE_MULT);
}
