#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use std::cmp::Ordering;

use bastion_core::{EnemyId, EnemyView, GamePhase, TowerId, TowerTarget, TowerView};
use glam::Vec2;

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    tower_workspace: Vec<TowerWorkspace>,
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// Each tower selects the nearest live enemy inside its attack range.
    /// Equal distances prefer the enemy with less health left, then the
    /// lower identifier. The output buffer is cleared before populating it
    /// with the latest assignments.
    pub fn handle(
        &mut self,
        phase: GamePhase,
        towers: &TowerView,
        enemies: &EnemyView,
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();

        if phase != GamePhase::Combat {
            return;
        }

        if towers.iter().next().is_none() || enemies.is_empty() {
            return;
        }

        self.prepare_tower_workspace(towers);
        self.prepare_enemy_workspace(enemies);
        if self.enemy_workspace.is_empty() {
            return;
        }

        for tower in &self.tower_workspace {
            let mut best: Option<BestCandidate> = None;

            for candidate in &self.enemy_workspace {
                let distance = tower.position.distance(candidate.position);
                if distance > tower.range {
                    continue;
                }

                let current = BestCandidate {
                    distance,
                    health: candidate.health,
                    enemy: candidate.id,
                };

                match &mut best {
                    Some(existing) => {
                        if current.precedes(existing) {
                            *existing = current;
                        }
                    }
                    None => best = Some(current),
                }
            }

            if let Some(best_candidate) = best {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: best_candidate.enemy,
                    distance: best_candidate.distance,
                });
            }
        }
    }

    fn prepare_tower_workspace(&mut self, towers: &TowerView) {
        self.tower_workspace.clear();
        self.tower_workspace
            .extend(towers.iter().map(|snapshot| TowerWorkspace {
                id: snapshot.id,
                position: snapshot.position,
                range: snapshot.kind.stats().attack_range,
            }));
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());

        for snapshot in enemies.iter() {
            if snapshot.health <= 0.0 {
                continue;
            }
            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
                health: snapshot.health,
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TowerWorkspace {
    id: TowerId,
    position: Vec2,
    range: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Vec2,
    health: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance: f32,
    health: f32,
    enemy: EnemyId,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        let order = self
            .distance
            .total_cmp(&other.distance)
            .then(self.health.total_cmp(&other.health))
            .then(self.enemy.cmp(&other.enemy));
        order == Ordering::Less
    }
}

#[cfg(test)]
mod tests {
    use super::{TowerTarget, TowerTargeting};
    use bastion_core::{
        EnemyId, EnemyKind, EnemySnapshot, EnemyView, GamePhase, SlotId, TowerId, TowerKind,
        TowerSnapshot, TowerView,
    };
    use glam::Vec2;
    use std::time::Duration;

    fn tower_snapshot(id: u32, kind: TowerKind, position: Vec2) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            kind,
            slot: SlotId::new(id),
            position,
            ready_in: Duration::ZERO,
        }
    }

    fn enemy_snapshot(id: u32, position: Vec2, health: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Grunt,
            position,
            health,
            max_health: 100.0,
            stunned: false,
            waypoint: 0,
        }
    }

    fn towers(snapshots: Vec<TowerSnapshot>) -> TowerView {
        TowerView::from_snapshots(snapshots)
    }

    fn enemies(snapshots: Vec<EnemySnapshot>) -> EnemyView {
        EnemyView::from_snapshots(snapshots)
    }

    #[test]
    fn targets_enemy_within_range() {
        let mut system = TowerTargeting::new();
        let towers = towers(vec![tower_snapshot(1, TowerKind::Archer, Vec2::ZERO)]);
        let enemies = enemies(vec![enemy_snapshot(2, Vec2::new(6.0, 8.0), 100.0)]);

        let mut out = Vec::new();
        system.handle(GamePhase::Combat, &towers, &enemies, &mut out);

        assert_eq!(
            out,
            vec![TowerTarget {
                tower: TowerId::new(1),
                enemy: EnemyId::new(2),
                distance: 10.0,
            }]
        );
    }

    #[test]
    fn enemy_outside_range_is_ignored() {
        let mut system = TowerTargeting::new();
        let towers = towers(vec![tower_snapshot(1, TowerKind::Bombard, Vec2::ZERO)]);
        let enemies = enemies(vec![enemy_snapshot(2, Vec2::new(8.5, 0.0), 100.0)]);

        let mut out = Vec::new();
        system.handle(GamePhase::Combat, &towers, &enemies, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn nearest_enemy_wins() {
        let mut system = TowerTargeting::new();
        let towers = towers(vec![tower_snapshot(1, TowerKind::Archer, Vec2::ZERO)]);
        let enemies = enemies(vec![
            enemy_snapshot(1, Vec2::new(7.0, 0.0), 10.0),
            enemy_snapshot(2, Vec2::new(0.0, 3.0), 100.0),
        ]);

        let mut out = Vec::new();
        system.handle(GamePhase::Combat, &towers, &enemies, &mut out);

        assert_eq!(out[0].enemy, EnemyId::new(2));
    }

    #[test]
    fn equal_distance_prefers_weaker_enemy_then_lower_id() {
        let mut system = TowerTargeting::new();
        let towers = towers(vec![tower_snapshot(1, TowerKind::Archer, Vec2::ZERO)]);

        let weaker = enemies(vec![
            enemy_snapshot(3, Vec2::new(4.0, 0.0), 80.0),
            enemy_snapshot(7, Vec2::new(-4.0, 0.0), 20.0),
        ]);
        let mut out = Vec::new();
        system.handle(GamePhase::Combat, &towers, &weaker, &mut out);
        assert_eq!(out[0].enemy, EnemyId::new(7));

        let identical = enemies(vec![
            enemy_snapshot(9, Vec2::new(0.0, 4.0), 50.0),
            enemy_snapshot(5, Vec2::new(0.0, -4.0), 50.0),
        ]);
        system.handle(GamePhase::Combat, &towers, &identical, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].enemy, EnemyId::new(5));
    }

    #[test]
    fn each_tower_uses_its_own_range() {
        let mut system = TowerTargeting::new();
        let towers = towers(vec![
            tower_snapshot(1, TowerKind::Bombard, Vec2::ZERO),
            tower_snapshot(2, TowerKind::Marksman, Vec2::ZERO),
        ]);
        let enemies = enemies(vec![enemy_snapshot(4, Vec2::new(11.0, 0.0), 100.0)]);

        let mut out = Vec::new();
        system.handle(GamePhase::Combat, &towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tower, TowerId::new(2));
    }

    #[test]
    fn building_phase_clears_output() {
        let mut system = TowerTargeting::new();
        let towers = towers(vec![tower_snapshot(1, TowerKind::Archer, Vec2::ZERO)]);
        let enemies = enemies(vec![enemy_snapshot(1, Vec2::ONE, 100.0)]);

        let mut out = vec![TowerTarget {
            tower: TowerId::new(99),
            enemy: EnemyId::new(99),
            distance: 0.0,
        }];

        system.handle(GamePhase::Building, &towers, &enemies, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn empty_collections_produce_no_targets() {
        let mut system = TowerTargeting::new();
        let no_towers = towers(Vec::new());
        let some_enemies = enemies(vec![enemy_snapshot(1, Vec2::ONE, 100.0)]);

        let mut out = Vec::new();
        system.handle(GamePhase::Combat, &no_towers, &some_enemies, &mut out);
        assert!(out.is_empty());

        let some_towers = towers(vec![tower_snapshot(1, TowerKind::Archer, Vec2::ZERO)]);
        let no_enemies = enemies(Vec::new());
        system.handle(GamePhase::Combat, &some_towers, &no_enemies, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn removing_enemies_does_not_select_out_of_range_candidates() {
        let mut system = TowerTargeting::new();
        let towers = towers(vec![tower_snapshot(1, TowerKind::Archer, Vec2::ZERO)]);
        let both = enemies(vec![
            enemy_snapshot(1, Vec2::new(2.0, 0.0), 100.0),
            enemy_snapshot(2, Vec2::new(20.0, 0.0), 100.0),
        ]);
        let mut out = Vec::new();
        system.handle(GamePhase::Combat, &towers, &both, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].enemy, EnemyId::new(1));

        let far = enemies(vec![enemy_snapshot(2, Vec2::new(20.0, 0.0), 100.0)]);
        system.handle(GamePhase::Combat, &towers, &far, &mut out);
        assert!(out.is_empty(), "far enemy should not be targeted when alone");
    }
}
