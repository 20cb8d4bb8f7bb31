#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits tower attack commands from targeting data.

use bastion_core::{Command, GamePhase, TowerTarget, TowerView};
use tracing::trace;

/// Tower combat system that queues attack commands for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireTower` entries for targeted towers whose cooldown
    /// has elapsed.
    pub fn handle(
        &mut self,
        phase: GamePhase,
        towers: &TowerView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if phase != GamePhase::Combat || tower_targets.is_empty() {
            return;
        }

        self.scratch.clear();

        for target in tower_targets {
            let Some(snapshot) = towers.get(target.tower) else {
                continue;
            };
            if !snapshot.ready_in.is_zero() {
                continue;
            }
            trace!(
                tower = target.tower.get(),
                enemy = target.enemy.get(),
                "tower ready to fire"
            );
            self.scratch.push(Command::FireTower {
                tower: target.tower,
                target: target.enemy,
            });
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_core::{EnemyId, SlotId, TowerId, TowerKind, TowerSnapshot};
    use glam::Vec2;
    use std::time::Duration;

    #[test]
    fn building_phase_is_silent() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![snapshot(1, Duration::ZERO)]);
        let targets = vec![target(1, 7)];
        let mut out = Vec::new();

        system.handle(GamePhase::Building, &towers, &targets, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn firing_respects_cooldown_readiness() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![
            snapshot(2, Duration::ZERO),
            snapshot(5, Duration::ZERO),
        ]);
        let targets = vec![target(2, 4), target(5, 1)];
        let mut out = Vec::new();

        system.handle(GamePhase::Combat, &towers, &targets, &mut out);

        assert_eq!(
            out,
            vec![
                Command::FireTower {
                    tower: TowerId::new(2),
                    target: EnemyId::new(4),
                },
                Command::FireTower {
                    tower: TowerId::new(5),
                    target: EnemyId::new(1),
                },
            ],
        );
    }

    #[test]
    fn cooling_or_missing_towers_are_skipped() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![
            snapshot(3, Duration::from_millis(250)),
            snapshot(8, Duration::ZERO),
        ]);
        let targets = vec![target(3, 9), target(8, 2), target(42, 3)];
        let mut out = Vec::new();

        system.handle(GamePhase::Combat, &towers, &targets, &mut out);

        assert_eq!(
            out,
            vec![Command::FireTower {
                tower: TowerId::new(8),
                target: EnemyId::new(2),
            }],
        );
    }

    fn snapshot(tower: u32, ready_in: Duration) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(tower),
            kind: TowerKind::Archer,
            slot: SlotId::new(tower),
            position: Vec2::ZERO,
            ready_in,
        }
    }

    fn target(tower: u32, enemy: u32) -> TowerTarget {
        TowerTarget {
            tower: TowerId::new(tower),
            enemy: EnemyId::new(enemy),
            distance: 1.0,
        }
    }
}
