//! Entity spawn factories for the simulation world.
//!
//! Creates enemies, bosses, bullets, particles and XP orbs with their
//! component bundles. Every enemy and bullet takes the next value of the
//! engine's sequence counter so iteration can be made order-stable.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use thornwood_core::components::*;
use thornwood_core::constants::*;
use thornwood_core::enums::*;
use thornwood_core::types::{Arena, Position, Velocity};

use thornwood_director::profiles::{boss_profile, get_profile};

/// Hand out the next sequence number.
pub fn next_seq(counter: &mut u64) -> u64 {
    let seq = *counter;
    *counter += 1;
    seq
}

/// A point just outside a random arena edge.
pub fn random_edge_position(rng: &mut ChaCha8Rng, arena: &Arena) -> Position {
    match rng.gen_range(0..4) {
        0 => Position::new(rng.gen::<f32>() * arena.width, -SPAWN_MARGIN),
        1 => Position::new(arena.width + SPAWN_MARGIN, rng.gen::<f32>() * arena.height),
        2 => Position::new(rng.gen::<f32>() * arena.width, arena.height + SPAWN_MARGIN),
        _ => Position::new(-SPAWN_MARGIN, rng.gen::<f32>() * arena.height),
    }
}

/// Spawn a regular enemy of `kind` on a random edge, scaled for `wave`.
pub fn spawn_enemy(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    arena: &Arena,
    kind: EnemyKind,
    wave: u32,
    seq_counter: &mut u64,
) -> Entity {
    let position = random_edge_position(rng, arena);
    let profile = get_profile(kind);

    let enemy = Enemy {
        kind,
        seq: next_seq(seq_counter),
        radius: profile.radius + rng.gen::<f32>() * ENEMY_RADIUS_JITTER,
        speed: profile.speed + rng.gen::<f32>() * ENEMY_SPEED_JITTER + wave as f32 * ENEMY_SPEED_PER_WAVE,
        health: profile.health + (wave / ENEMY_HEALTH_WAVE_STEP) as f32,
        contact_damage: profile.contact_damage,
        xp_value: profile.xp_value,
        dead: false,
    };

    world.spawn((enemy, position, Knockback::default(), HitFlash::default()))
}

/// Spawn the boss for `tier` at the top centre of the arena.
pub fn spawn_boss(world: &mut World, arena: &Arena, tier: u32, seq_counter: &mut u64) -> Entity {
    let profile = boss_profile(tier);

    let enemy = Enemy {
        kind: EnemyKind::Boss,
        seq: next_seq(seq_counter),
        radius: profile.radius,
        speed: profile.speed,
        health: profile.health,
        contact_damage: profile.contact_damage,
        xp_value: profile.xp_value,
        dead: false,
    };
    let boss = BossState {
        max_health: profile.health,
        phase: BossPhase::One,
        attack_timer: 0,
        attack_cooldown: profile.attack_cooldown,
        tier,
    };

    world.spawn((
        enemy,
        boss,
        Position::new(arena.width / 2.0, BOSS_SPAWN_Y),
        Knockback::default(),
        HitFlash::default(),
    ))
}

/// Spawn a projectile.
#[allow(clippy::too_many_arguments)]
pub fn spawn_bullet(
    world: &mut World,
    position: Position,
    velocity: Velocity,
    source: BulletSource,
    damage: f32,
    size: f32,
    pierce: u32,
    seq_counter: &mut u64,
) -> Entity {
    world.spawn((
        Bullet {
            seq: next_seq(seq_counter),
            source,
            damage,
            size,
            pierce_left: pierce,
            hit_enemies: Vec::new(),
        },
        position,
        velocity,
    ))
}

/// A ring of `count` particles bursting out of `origin`.
pub fn spawn_particles(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    origin: Position,
    kind: ParticleKind,
    count: usize,
) {
    if count == 0 {
        return;
    }
    let step = std::f32::consts::TAU / count as f32;
    for i in 0..count {
        let angle = step * i as f32 + rng.gen::<f32>() * PARTICLE_ANGLE_JITTER;
        let speed = PARTICLE_MIN_SPEED + rng.gen::<f32>() * PARTICLE_SPEED_RANGE;
        let particle = Particle {
            kind,
            life: PARTICLE_MIN_LIFE + rng.gen::<f32>() * PARTICLE_LIFE_RANGE,
            size: PARTICLE_MIN_SIZE + rng.gen::<f32>() * PARTICLE_SIZE_RANGE,
        };
        world.spawn((particle, origin, Velocity::from_angle(angle, speed)));
    }
}

/// Orb size grows with its value, within fixed bounds.
pub fn orb_size(value: u32) -> f32 {
    (value as f32 / XP_ORB_SIZE_DIVISOR).clamp(XP_ORB_MIN_SIZE, XP_ORB_MAX_SIZE)
}

/// Drop an XP orb where an enemy died.
pub fn spawn_xp_orb(world: &mut World, position: Position, value: u32) -> Entity {
    world.spawn((
        XpOrb {
            value,
            lifetime: XP_ORB_LIFETIME,
            size: orb_size(value),
            collected: false,
        },
        position,
    ))
}
