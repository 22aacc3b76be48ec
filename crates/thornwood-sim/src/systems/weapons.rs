//! Weapons system: passive aura fire and manual cursor shots.
//!
//! Both weapons share one fire routine; they differ in aim, damage and size
//! multipliers, and cooldown.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use thornwood_core::components::Enemy;
use thornwood_core::constants::*;
use thornwood_core::enums::BulletSource;
use thornwood_core::events::SoundEvent;
use thornwood_core::player::PlayerState;
use thornwood_core::types::{Position, Velocity};

use crate::run_stats::{Feedback, ScreenEffects};
use crate::systems::player_control::InputState;
use crate::world_setup;

/// Nearest live enemy strictly inside the aura.
pub fn nearest_in_aura(world: &World, player: &PlayerState) -> Option<Position> {
    let mut best: Option<(f32, u64, Position)> = None;
    for (_entity, (enemy, pos)) in world.query::<(&Enemy, &Position)>().iter() {
        if enemy.dead {
            continue;
        }
        let distance = player.position.range_to(pos);
        if distance >= player.stats.aura_radius {
            continue;
        }
        let closer = match best {
            None => true,
            Some((d, seq, _)) => distance < d || (distance == d && enemy.seq < seq),
        };
        if closer {
            best = Some((distance, enemy.seq, *pos));
        }
    }
    best.map(|(_, _, pos)| pos)
}

/// Fire one volley along `base_angle`. Multishot fans bullets evenly around it.
pub fn fire(
    world: &mut World,
    player: &mut PlayerState,
    source: BulletSource,
    base_angle: f32,
    seq_counter: &mut u64,
) {
    let stats = &player.stats;
    let (damage_mult, size_mult) = match source {
        BulletSource::Manual => (MANUAL_DAMAGE_MULT, MANUAL_SIZE_MULT),
        _ => (PASSIVE_DAMAGE_MULT, PASSIVE_SIZE_MULT),
    };

    player.shots_fired += 1;
    let critical =
        stats.critical_strike && player.shots_fired % CRITICAL_STRIKE_INTERVAL == 0;
    let mut damage = stats.bullet_damage * damage_mult;
    if critical {
        damage *= CRITICAL_STRIKE_MULT;
    }
    let size = stats.bullet_size * size_mult;

    let count = stats.multishot.max(1);
    let center = (count - 1) as f32 / 2.0;
    for i in 0..count {
        let angle = base_angle + (i as f32 - center) * MULTISHOT_SPREAD;
        let mut origin = player.position;
        origin.step(angle, stats.radius);
        world_setup::spawn_bullet(
            world,
            origin,
            Velocity::from_angle(angle, stats.projectile_speed),
            source,
            damage,
            size,
            stats.pierce,
            seq_counter,
        );
    }
}

/// Tick both weapons.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    player: &mut PlayerState,
    input: &mut InputState,
    seq_counter: &mut u64,
    effects: &mut ScreenEffects,
    feedback: &mut Feedback,
) {
    // Passive aura: only fires with something to shoot at.
    player.passive_cooldown = player.passive_cooldown.saturating_sub(1);
    if player.passive_cooldown == 0 {
        if let Some(target) = nearest_in_aura(world, player) {
            let jitter = (rng.gen::<f32>() - 0.5) * 2.0 * PASSIVE_AIM_JITTER;
            let angle = player.position.angle_to(&target) + jitter;
            fire(world, player, BulletSource::Passive, angle, seq_counter);
            player.passive_cooldown = player.stats.passive_rate;
            feedback.sound(SoundEvent::Shoot);
        }
    }

    // Manual shot, independent of the aura.
    if std::mem::take(&mut input.fire_requested) && player.manual_cooldown == 0 {
        let angle = player.position.angle_to(&input.cursor);
        fire(world, player, BulletSource::Manual, angle, seq_counter);
        player.manual_cooldown = player.stats.manual_rate;
        effects.add_shake(SHAKE_MANUAL_FIRE);
        feedback.sound(SoundEvent::Shoot);
    }
    player.manual_cooldown = player.manual_cooldown.saturating_sub(1);
}
