//! Player movement from held directions.

use thornwood_core::commands::MoveIntent;
use thornwood_core::player::PlayerState;
use thornwood_core::types::{Arena, Position};

/// Latest input received through commands.
#[derive(Debug, Clone, Copy)]
pub struct InputState {
    pub intent: MoveIntent,
    /// Cursor in arena coordinates.
    pub cursor: Position,
    /// Set by `FireManual`, consumed by the weapons system.
    pub fire_requested: bool,
}

impl InputState {
    pub fn new(arena: &Arena) -> Self {
        Self {
            intent: MoveIntent::default(),
            cursor: arena.center(),
            fire_requested: false,
        }
    }
}

/// Move each held axis by the player's speed, then keep the player inside.
/// Diagonals are not normalised.
pub fn run(player: &mut PlayerState, intent: &MoveIntent, arena: &Arena) {
    let speed = player.stats.speed;
    let mut pos = player.position;
    if intent.up {
        pos.y -= speed;
    }
    if intent.down {
        pos.y += speed;
    }
    if intent.left {
        pos.x -= speed;
    }
    if intent.right {
        pos.x += speed;
    }
    player.position = arena.clamp_circle(pos, player.stats.radius);
}
