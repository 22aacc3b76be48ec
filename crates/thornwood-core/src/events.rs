//! Events emitted by the simulation for audio and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Sound cues for the audio backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEvent {
    Shoot,
    Hit,
    Kill,
    LevelUp,
    Xp,
    Damage,
    Boss,
}

/// Gameplay transitions for UI feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    WaveStarted { wave: u32 },
    BossWarning { wave: u32 },
    BossSpawned { tier: u32 },
    BossPhaseChanged { phase: BossPhase },
    BossDefeated { wave: u32 },
    WaveCleared { wave: u32 },
    LevelUp { level: u32 },
    UpgradeChosen { upgrade: UpgradeId, rarity: Rarity },
    GameOver { final_score: u64 },
}
