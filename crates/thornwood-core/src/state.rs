//! Game state snapshot: the complete visible state handed to presentation each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{GameEvent, SoundEvent};
use crate::types::{Position, SimTime};

/// Complete game state broadcast after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: SimPhase,
    pub player: PlayerView,
    pub hud: HudView,
    pub wave: WaveView,
    pub enemies: Vec<EnemyView>,
    pub bullets: Vec<BulletView>,
    pub particles: Vec<ParticleView>,
    pub orbs: Vec<OrbView>,
    /// Non-empty only while `phase == AwaitingUpgradeChoice`.
    pub upgrade_offers: Vec<UpgradeOffer>,
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
    pub effects: EffectsView,
    /// Set once the run has ended.
    pub final_score: Option<u64>,
    /// Whether the instructions overlay should be shown.
    pub show_instructions: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Position,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    pub aura_radius: f32,
    /// Aim direction toward the cursor (radians).
    pub aim_angle: f32,
    pub invulnerable: bool,
    /// Orbiting shield position, if owned.
    pub shield: Option<Position>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HudView {
    pub health_percent: f32,
    pub xp_percent: f32,
    pub level: u32,
    /// e.g. "Level 3".
    pub level_label: String,
    pub score: u64,
    pub pressure: f32,
    pub kill_combo: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    pub state: WaveState,
    pub wave: u32,
    /// Seconds left on the active countdown (preparing or boss warning).
    pub countdown_secs: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub seq: u64,
    pub kind: EnemyKind,
    pub position: Position,
    pub radius: f32,
    pub health: f32,
    pub hit_flash: f32,
    /// Boss health fraction and phase.
    pub boss: Option<BossView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossView {
    pub health_fraction: f32,
    pub phase: BossPhase,
    pub tier: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletView {
    pub position: Position,
    pub size: f32,
    pub source: BulletSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleView {
    pub position: Position,
    pub kind: ParticleKind,
    pub size: f32,
    pub life: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbView {
    pub position: Position,
    pub size: f32,
    /// 0..1 alpha; fades out during the last second of its lifetime.
    pub alpha: f32,
}

/// One card of the level-up menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeOffer {
    pub id: UpgradeId,
    pub rarity: Rarity,
    pub name: String,
    pub description: String,
}

/// Screen-space feedback intensities.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EffectsView {
    pub screen_shake: f32,
    pub hit_flash: f32,
}
