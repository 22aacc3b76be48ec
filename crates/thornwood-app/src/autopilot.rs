//! Scripted player for headless runs.
//!
//! Reads each snapshot and answers with the commands a cautious player would
//! send: aim at the nearest enemy, keep firing, back away from anything close,
//! and drift toward XP orbs otherwise.

use thornwood_core::commands::{MoveIntent, PlayerCommand};
use thornwood_core::enums::SimPhase;
use thornwood_core::state::{GameStateSnapshot, UpgradeOffer};
use thornwood_core::types::Position;

/// Enemies inside this range make the pilot retreat.
const DANGER_RANGE: f32 = 120.0;
/// Dead zone so the pilot stops jittering on top of its goal.
const ARRIVE_RANGE: f32 = 8.0;

#[derive(Debug, Default)]
pub struct Autopilot {
    intent: MoveIntent,
    upgrades_taken: u32,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upgrades_taken(&self) -> u32 {
        self.upgrades_taken
    }

    /// Commands to queue before the next tick.
    pub fn next_commands(&mut self, snap: &GameStateSnapshot) -> Vec<PlayerCommand> {
        if snap.show_instructions {
            return vec![PlayerCommand::DismissInstructions];
        }

        match snap.phase {
            SimPhase::AwaitingUpgradeChoice => match best_offer(&snap.upgrade_offers) {
                Some(index) => {
                    self.upgrades_taken += 1;
                    tracing::debug!(offer = ?snap.upgrade_offers[index].id, "autopilot picks upgrade");
                    vec![PlayerCommand::SelectUpgrade { index }]
                }
                None => Vec::new(),
            },
            SimPhase::Running => self.steer(snap),
            SimPhase::Paused | SimPhase::GameOver => Vec::new(),
        }
    }

    fn steer(&mut self, snap: &GameStateSnapshot) -> Vec<PlayerCommand> {
        let me = snap.player.position;
        let mut commands = Vec::new();

        let nearest_enemy = snap
            .enemies
            .iter()
            .map(|e| (me.range_to(&e.position), e.position))
            .min_by(|a, b| a.0.total_cmp(&b.0));

        if let Some((_, target)) = nearest_enemy {
            commands.push(PlayerCommand::SetCursor {
                x: target.x,
                y: target.y,
            });
            commands.push(PlayerCommand::FireManual);
        }

        let intent = match nearest_enemy {
            Some((range, threat)) if range < DANGER_RANGE => away_from(me, threat),
            _ => {
                let goal = snap
                    .orbs
                    .iter()
                    .map(|o| o.position)
                    .min_by(|a, b| me.range_to(a).total_cmp(&me.range_to(b)));
                match goal {
                    Some(orb) => toward(me, orb),
                    None => MoveIntent::default(),
                }
            }
        };

        if intent != self.intent {
            self.intent = intent;
            commands.push(PlayerCommand::SetMoveIntent {
                up: intent.up,
                down: intent.down,
                left: intent.left,
                right: intent.right,
            });
        }
        commands
    }
}

/// Highest rarity wins; the leftmost card breaks ties.
fn best_offer(offers: &[UpgradeOffer]) -> Option<usize> {
    offers
        .iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| a.rarity.cmp(&b.rarity).then(ib.cmp(ia)))
        .map(|(index, _)| index)
}

fn toward(from: Position, to: Position) -> MoveIntent {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    MoveIntent {
        up: dy < -ARRIVE_RANGE,
        down: dy > ARRIVE_RANGE,
        left: dx < -ARRIVE_RANGE,
        right: dx > ARRIVE_RANGE,
    }
}

fn away_from(from: Position, threat: Position) -> MoveIntent {
    let dx = from.x - threat.x;
    let dy = from.y - threat.y;
    MoveIntent {
        up: dy < 0.0,
        down: dy >= 0.0,
        left: dx < 0.0,
        right: dx >= 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thornwood_core::enums::{Rarity, UpgradeId};

    fn offer(id: UpgradeId, rarity: Rarity) -> UpgradeOffer {
        UpgradeOffer {
            id,
            rarity,
            name: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn dismisses_instructions_first() {
        let mut pilot = Autopilot::new();
        let snap = GameStateSnapshot {
            phase: SimPhase::Paused,
            show_instructions: true,
            ..Default::default()
        };
        let commands = pilot.next_commands(&snap);
        assert!(matches!(commands.as_slice(), [PlayerCommand::DismissInstructions]));
    }

    #[test]
    fn picks_rarest_offer() {
        let offers = vec![
            offer(UpgradeId::Damage, Rarity::Common),
            offer(UpgradeId::Explode, Rarity::Epic),
            offer(UpgradeId::Pierce, Rarity::Rare),
        ];
        assert_eq!(best_offer(&offers), Some(1));

        let ties = vec![
            offer(UpgradeId::Damage, Rarity::Common),
            offer(UpgradeId::MoveSpeed, Rarity::Common),
        ];
        assert_eq!(best_offer(&ties), Some(0));
        assert_eq!(best_offer(&[]), None);
    }

    #[test]
    fn retreats_from_close_enemy() {
        let intent = away_from(Position::new(100.0, 100.0), Position::new(120.0, 90.0));
        assert!(intent.left && !intent.right);
        assert!(intent.down && !intent.up);
    }

    #[test]
    fn idle_when_nothing_to_do() {
        let mut pilot = Autopilot::new();
        let commands = pilot.next_commands(&GameStateSnapshot::default());
        assert!(commands.is_empty());
    }
}
