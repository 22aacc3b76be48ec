//! Player commands sent from the input layer to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Input ---
    /// Replace the held movement directions.
    SetMoveIntent {
        up: bool,
        down: bool,
        left: bool,
        right: bool,
    },
    /// Cursor moved (arena coordinates).
    SetCursor { x: f32, y: f32 },
    /// Manual fire trigger (press edge). Ignored while on cooldown.
    FireManual,

    // --- Upgrade menu ---
    /// Pick one of the offered upgrades by index.
    SelectUpgrade { index: usize },

    // --- Run control ---
    /// Open or close the instructions overlay.
    ToggleInstructions,
    /// Close the instructions overlay and remember it was seen.
    DismissInstructions,
    /// Full reset into a new run.
    Restart,
}

/// Held movement directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}
