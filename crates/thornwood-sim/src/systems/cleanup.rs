//! Cleanup system: removes dead enemies, collected orbs, and anything queued
//! in the despawn buffer.

use hecs::{Entity, World};

use thornwood_core::components::{Enemy, XpOrb};

/// Despawn everything flagged this tick. Entities queued twice are ignored
/// the second time.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    for (entity, enemy) in world.query_mut::<&Enemy>() {
        if enemy.dead {
            despawn_buffer.push(entity);
        }
    }

    for (entity, orb) in world.query_mut::<&XpOrb>() {
        if orb.collected {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
