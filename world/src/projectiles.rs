//! Projectile flight and hit resolution.

use std::time::Duration;

use bastion_core::{EnemyId, ProjectileId, ProjectileKind, TowerId};
use glam::Vec2;

/// Distance travelled by a projectile per second.
pub(crate) const PROJECTILE_SPEED: f32 = 10.0;

/// Flight time after which an unspent projectile disappears.
pub(crate) const PROJECTILE_LIFETIME: Duration = Duration::from_secs(5);

/// Distance from an enemy at which a projectile connects.
pub(crate) const HIT_RADIUS: f32 = 0.5;

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) tower: TowerId,
    pub(crate) kind: ProjectileKind,
    position: Vec2,
    direction: Vec2,
    age: Duration,
}

impl Projectile {
    pub(crate) fn launch(
        id: ProjectileId,
        tower: TowerId,
        kind: ProjectileKind,
        position: Vec2,
        direction: Vec2,
    ) -> Self {
        Self {
            id,
            tower,
            kind,
            position,
            direction,
            age: Duration::ZERO,
        }
    }

    /// Moves the projectile and returns the segment it swept.
    pub(crate) fn advance(&mut self, dt: Duration) -> (Vec2, Vec2) {
        let start = self.position;
        self.position += self.direction * PROJECTILE_SPEED * dt.as_secs_f32();
        self.age = self.age.saturating_add(dt);
        (start, self.position)
    }

    pub(crate) fn expired(&self) -> bool {
        self.age >= PROJECTILE_LIFETIME
    }
}

/// Finds the enemy a projectile sweeping from `start` to `end` strikes first.
///
/// Candidates closer than [`HIT_RADIUS`] to the segment are ordered by how
/// far along the segment their closest point lies, then by identifier.
pub(crate) fn first_hit<I>(start: Vec2, end: Vec2, candidates: I) -> Option<EnemyId>
where
    I: IntoIterator<Item = (EnemyId, Vec2)>,
{
    let segment = end - start;
    let length_squared = segment.length_squared();

    candidates
        .into_iter()
        .filter_map(|(id, position)| {
            let along = if length_squared > 0.0 {
                ((position - start).dot(segment) / length_squared).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let closest = start + segment * along;
            (closest.distance(position) <= HIT_RADIUS).then_some((along, id))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
        .map(|(_, id)| id)
}

/// Selects up to `count` enemies other than `struck` within `range` of
/// `origin`, nearest first.
pub(crate) fn chain_victims<I>(
    origin: Vec2,
    struck: EnemyId,
    range: f32,
    count: u32,
    candidates: I,
) -> Vec<EnemyId>
where
    I: IntoIterator<Item = (EnemyId, Vec2)>,
{
    let mut nearby: Vec<(f32, EnemyId)> = candidates
        .into_iter()
        .filter(|(id, _)| *id != struck)
        .map(|(id, position)| (origin.distance(position), id))
        .filter(|(distance, _)| *distance <= range)
        .collect();
    nearby.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    nearby
        .into_iter()
        .take(count as usize)
        .map(|(_, id)| id)
        .collect()
}
