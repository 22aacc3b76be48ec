//! XP orb lifecycle: expiry, magnet pull, and collection.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use thornwood_core::components::XpOrb;
use thornwood_core::constants::*;
use thornwood_core::enums::ParticleKind;
use thornwood_core::events::SoundEvent;
use thornwood_core::player::PlayerState;
use thornwood_core::types::Position;

use crate::progression::Progression;
use crate::run_stats::Feedback;
use crate::world_setup;

/// Age, attract and collect orbs. Returns the number of levels gained.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    player: &PlayerState,
    progression: &mut Progression,
    wave: u32,
    feedback: &mut Feedback,
    despawn_buffer: &mut Vec<Entity>,
) -> u32 {
    let mut collected: Vec<(Position, u32)> = Vec::new();

    for (entity, (orb, pos)) in world.query_mut::<(&mut XpOrb, &mut Position)>() {
        if orb.collected {
            continue;
        }
        orb.lifetime = orb.lifetime.saturating_sub(1);
        if orb.lifetime == 0 {
            despawn_buffer.push(entity);
            continue;
        }

        // Collection uses the distance before this tick's pull.
        let distance = pos.range_to(&player.position);
        if distance >= player.stats.magnet_range {
            continue;
        }
        if distance > 0.0 {
            let angle = pos.angle_to(&player.position);
            pos.step(angle, XP_ORB_PULL_SPEED);
        }
        if distance < player.stats.radius + orb.size {
            orb.collected = true;
            collected.push((*pos, orb.value));
            despawn_buffer.push(entity);
        }
    }

    let mut levels = 0;
    for (pos, value) in collected {
        levels += progression.add_xp(value, wave);
        world_setup::spawn_particles(world, rng, pos, ParticleKind::XpPickup, XP_PICKUP_PARTICLES);
        feedback.sound(SoundEvent::Xp);
    }
    levels
}
