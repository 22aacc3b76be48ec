//! Kinematic integration.
//!
//! Velocities are in units per tick, so integration is a plain add.
//! Bullets leaving the arena and expired particles go to the despawn buffer.

use hecs::{Entity, World};

use thornwood_core::components::{Bullet, HitFlash, Knockback, Particle};
use thornwood_core::constants::*;
use thornwood_core::types::{Arena, Position, Velocity};

/// Advance bullets and cull any that left the arena.
pub fn run_bullets(world: &mut World, arena: &Arena, despawn_buffer: &mut Vec<Entity>) {
    for (entity, (_bullet, pos, vel)) in world.query_mut::<(&Bullet, &mut Position, &Velocity)>() {
        pos.x += vel.x;
        pos.y += vel.y;
        if !arena.contains(pos) {
            despawn_buffer.push(entity);
        }
    }
}

/// Advance particles with drag and age them out.
pub fn run_particles(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    for (entity, (particle, pos, vel)) in
        world.query_mut::<(&mut Particle, &mut Position, &mut Velocity)>()
    {
        pos.x += vel.x;
        pos.y += vel.y;
        particle.life -= 1.0;
        vel.x *= PARTICLE_DRAG;
        vel.y *= PARTICLE_DRAG;
        if particle.life <= 0.0 {
            despawn_buffer.push(entity);
        }
    }
}

/// Apply knockback impulses and fade hit flashes.
pub fn apply_knockback(world: &mut World) {
    for (_entity, (pos, knockback, flash)) in
        world.query_mut::<(&mut Position, &mut Knockback, &mut HitFlash)>()
    {
        pos.x += knockback.x;
        knockback.x = decay_axis(knockback.x);
        pos.y += knockback.y;
        knockback.y = decay_axis(knockback.y);

        if flash.0 > 0.0 {
            flash.0 *= HIT_FLASH_DECAY;
            if flash.0 < HIT_FLASH_MIN {
                flash.0 = 0.0;
            }
        }
    }
}

fn decay_axis(value: f32) -> f32 {
    let next = value * KNOCKBACK_DECAY;
    if next.abs() < KNOCKBACK_MIN {
        0.0
    } else {
        next
    }
}
