//! Simulation constants and tuning parameters.
//!
//! All rates are per tick unless the name says otherwise.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Arena ---

/// Default arena width (pixels).
pub const ARENA_WIDTH: f32 = 800.0;

/// Default arena height (pixels).
pub const ARENA_HEIGHT: f32 = 600.0;

/// Distance outside the arena edge at which regular enemies appear.
pub const SPAWN_MARGIN: f32 = 30.0;

// --- Player ---

pub const PLAYER_RADIUS: f32 = 15.0;
pub const PLAYER_SPEED: f32 = 4.0;
pub const PLAYER_MAX_HEALTH: f32 = 100.0;
pub const PLAYER_PASSIVE_RATE: u32 = 25;
pub const PLAYER_MANUAL_RATE: u32 = 12;
pub const PLAYER_AURA_RADIUS: f32 = 150.0;
pub const PLAYER_BULLET_DAMAGE: f32 = 1.0;
pub const PLAYER_BULLET_SIZE: f32 = 4.0;
pub const PLAYER_MULTISHOT: u32 = 1;
pub const PLAYER_KNOCKBACK: f32 = 0.0;
pub const PLAYER_PROJECTILE_SPEED: f32 = 10.0;

// --- Weapons ---

/// Passive aim jitter: the shot angle is offset by up to ±this value.
pub const PASSIVE_AIM_JITTER: f32 = 0.4;

/// Angular spacing between multishot bullets (radians).
pub const MULTISHOT_SPREAD: f32 = 0.3;

pub const MANUAL_DAMAGE_MULT: f32 = 2.0;
pub const MANUAL_SIZE_MULT: f32 = 1.0;
pub const PASSIVE_DAMAGE_MULT: f32 = 0.5;
pub const PASSIVE_SIZE_MULT: f32 = 0.7;

/// Every Nth fire call deals critical damage when critical strike is owned.
pub const CRITICAL_STRIKE_INTERVAL: u32 = 5;
pub const CRITICAL_STRIKE_MULT: f32 = 3.0;

// --- Combat ---

pub const BASE_KNOCKBACK: f32 = 2.0;
pub const KNOCKBACK_DECAY: f32 = 0.9;
pub const KNOCKBACK_MIN: f32 = 0.5;
pub const HIT_FLASH_DECAY: f32 = 0.85;
pub const HIT_FLASH_MIN: f32 = 0.1;

pub const SCORE_PER_KILL: u64 = 10;
pub const SCORE_PER_BOSS: u64 = 100;

/// Chance per tick of the +1 survival score trickle.
pub const SURVIVAL_SCORE_CHANCE: f64 = 0.02;

/// Fraction of max health restored when a boss dies.
pub const BOSS_KILL_HEAL_FRACTION: f32 = 0.3;

pub const EXPLODE_RADIUS: f32 = 40.0;
pub const EXPLODE_DAMAGE_FRACTION: f32 = 0.5;
pub const CHAIN_RANGE: f32 = 120.0;
pub const CHAIN_DAMAGE_FRACTION: f32 = 0.5;

/// Kills needed per life-steal heal.
pub const LIFE_STEAL_KILLS: u32 = 10;
pub const LIFE_STEAL_HEAL: f32 = 1.0;

pub const SHIELD_ORBIT_RADIUS: f32 = 50.0;
pub const SHIELD_ORBIT_SPEED: f32 = 0.08;
pub const SHIELD_SIZE: f32 = 8.0;
pub const SHIELD_HIT_COOLDOWN: u32 = 20;

pub const LEVEL_UP_INVULN_TICKS: u32 = 120;
pub const TIME_STOP_TICKS: u32 = 120;
pub const TIME_STOP_SLOW_FACTOR: f32 = 0.5;

// --- Enemies ---

pub const ELITE_CONTACT_DAMAGE: f32 = 20.0;
pub const ENEMY_CONTACT_DAMAGE: f32 = 10.0;
pub const ENEMY_RADIUS_JITTER: f32 = 4.0;
pub const ENEMY_SPEED_JITTER: f32 = 0.5;
pub const ENEMY_SPEED_PER_WAVE: f32 = 0.05;
/// Enemy health grows by one every this many waves.
pub const ENEMY_HEALTH_WAVE_STEP: u32 = 4;

// --- Boss ---

pub const BOSS_SPAWN_Y: f32 = 100.0;
pub const BOSS_BASE_HEALTH: f32 = 60.0;
pub const BOSS_HEALTH_PER_TIER: f32 = 15.0;
pub const BOSS_BASE_RADIUS: f32 = 30.0;
pub const BOSS_RADIUS_PER_TIER: f32 = 5.0;
pub const BOSS_BASE_SPEED: f32 = 0.8;
pub const BOSS_SPEED_PER_TIER: f32 = 0.1;
pub const BOSS_BASE_DAMAGE: f32 = 15.0;
pub const BOSS_DAMAGE_PER_TIER: f32 = 5.0;
pub const BOSS_BASE_XP: u32 = 100;
pub const BOSS_XP_PER_TIER: u32 = 25;
pub const BOSS_BASE_ATTACK_COOLDOWN: u32 = 120;
pub const BOSS_ATTACK_COOLDOWN_PER_TIER: u32 = 10;

pub const BOSS_PHASE_2_THRESHOLD: f32 = 0.6;
pub const BOSS_PHASE_3_THRESHOLD: f32 = 0.3;
pub const BOSS_PHASE_2_COOLDOWN_CUT: u32 = 15;
pub const BOSS_PHASE_2_COOLDOWN_FLOOR: u32 = 80;
pub const BOSS_PHASE_3_COOLDOWN_CUT: u32 = 20;
pub const BOSS_PHASE_3_COOLDOWN_FLOOR: u32 = 60;
pub const BOSS_ENRAGE_SPEED_MULT: f32 = 1.5;

/// Charge attack moves the boss this many times its speed in one tick.
pub const BOSS_CHARGE_MULT: f32 = 3.0;
pub const BOSS_SHOCKWAVE_RADIUS: f32 = 150.0;
pub const BOSS_SHOCKWAVE_DAMAGE: f32 = 5.0;
pub const BOSS_BURST_COUNT: u32 = 3;
pub const BOSS_BURST_SPEED: f32 = 4.0;
pub const BOSS_BURST_DAMAGE: f32 = 10.0;
pub const BOSS_BURST_SIZE: f32 = 6.0;
pub const BOSS_BURST_JITTER: f32 = 0.5;

// --- Waves ---

pub const WAVE_BASE_QUOTA: u32 = 5;
pub const WAVE_QUOTA_PER_WAVE: u32 = 3;
pub const WAVE_BASE_SPAWN_RATE: u32 = 60;
pub const WAVE_SPAWN_RATE_STEP: u32 = 2;
pub const WAVE_MIN_SPAWN_RATE: u32 = 30;
pub const WAVE_PREPARE_TICKS: u32 = 180;
pub const BOSS_WARNING_TICKS: u32 = 180;
/// Every Nth wave is a boss wave.
pub const BOSS_WAVE_INTERVAL: u32 = 10;

// --- Progression ---

pub const BASE_XP: f64 = 50.0;
pub const XP_LEVEL_EXPONENT: f64 = 1.5;
pub const FATIGUE_PER_LEVEL: f64 = 0.05;
pub const XP_ORB_LIFETIME: u32 = 600;
pub const XP_ORB_MIN_SIZE: f32 = 3.0;
pub const XP_ORB_MAX_SIZE: f32 = 8.0;
pub const XP_ORB_SIZE_DIVISOR: f32 = 5.0;
pub const XP_ORB_PULL_SPEED: f32 = 3.0;
pub const MAGNET_RANGE: f32 = 60.0;

/// Basic-enemy XP is cut after this wave.
pub const BASIC_XP_PENALTY_AFTER_WAVE: u32 = 5;
pub const BASIC_XP_PENALTY_MULT: f64 = 0.9;

// --- Risk / pressure ---

pub const DENSITY_RADIUS: f32 = 150.0;
pub const ELITE_CLUSTER_RADIUS: f32 = 200.0;
pub const MAX_PRESSURE: f32 = 100.0;
pub const PRESSURE_HIGH_DENSITY_GAIN: f32 = 0.5;
pub const PRESSURE_MID_DENSITY_GAIN: f32 = 0.2;
pub const PRESSURE_DECAY: f32 = 0.3;
pub const PRESSURE_COMBO_GAIN: f32 = 0.3;
/// Kill combo must exceed this for the combo pressure bonus.
pub const PRESSURE_COMBO_THRESHOLD: u32 = 3;
pub const HIGH_DENSITY_COUNT: usize = 5;
pub const MID_DENSITY_COUNT: usize = 3;
pub const PRESSURE_XP_BONUS: f64 = 0.3;
pub const PRESSURE_ELITE_BONUS: f32 = 0.1;
pub const PRESSURE_BASIC_PENALTY: f32 = 0.1;
pub const PRESSURE_TANK_BONUS: f32 = 0.05;

pub const RISK_DECAY_TICKS: i32 = 180;
pub const RISK_DENSITY_BONUS: f64 = 0.2;
pub const RISK_STREAK_BONUS: f64 = 0.15;
pub const RISK_STREAK_KILLS: u32 = 3;
pub const RISK_ELITE_BONUS: f64 = 0.1;
pub const RISK_ELITE_COUNT: usize = 2;

// --- Upgrades ---

/// Legendary upgrades are offered from this player level on.
pub const LEGENDARY_MIN_LEVEL: u32 = 4;
/// Rarity weights shift toward common after this wave.
pub const RARITY_SHIFT_AFTER_WAVE: u32 = 5;
pub const UPGRADE_OFFER_COUNT: usize = 3;

// --- Effects ---

pub const SCREEN_SHAKE_DECAY: f32 = 0.85;
pub const SCREEN_SHAKE_MIN: f32 = 0.5;
pub const SCREEN_FLASH_DECAY: f32 = 0.9;
pub const SCREEN_FLASH_MIN: f32 = 0.05;
pub const PARTICLE_DRAG: f32 = 0.95;
pub const PARTICLE_MIN_SPEED: f32 = 2.0;
pub const PARTICLE_SPEED_RANGE: f32 = 3.0;
pub const PARTICLE_MIN_LIFE: f32 = 30.0;
pub const PARTICLE_LIFE_RANGE: f32 = 20.0;
pub const PARTICLE_MIN_SIZE: f32 = 2.0;
pub const PARTICLE_SIZE_RANGE: f32 = 3.0;
/// Random angular offset added to each particle of a burst.
pub const PARTICLE_ANGLE_JITTER: f32 = 0.5;

pub const HIT_PARTICLES: usize = 5;
pub const DEATH_PARTICLES: usize = 15;
pub const DEBRIS_PARTICLES: usize = 8;
pub const HURT_PARTICLES: usize = 8;
pub const XP_PICKUP_PARTICLES: usize = 5;
pub const SHOCKWAVE_PARTICLES: usize = 20;

pub const SHAKE_MANUAL_FIRE: f32 = 3.0;
pub const SHAKE_CONTACT: f32 = 6.0;
pub const FLASH_CONTACT: f32 = 0.4;
pub const SHAKE_BOSS_SPAWN: f32 = 10.0;
pub const SHAKE_CHARGE: f32 = 5.0;
pub const SHAKE_CHARGE_LATE: f32 = 6.0;
pub const SHAKE_SHOCKWAVE: f32 = 8.0;

// --- Persistence keys ---

pub const UPGRADES_KEY: &str = "thornwood_upgrades";
pub const HELP_SEEN_KEY: &str = "thornwood_help_seen";
