//! Enemy lifecycle: health, stuns, movement and the single death transition.

use std::time::Duration;

use bastion_core::{EnemyId, EnemyKind, EnemySnapshot, WaveIndex};
use glam::Vec2;

use crate::navigation::{NavigationError, Navigator};

/// Result of applying damage to an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum DamageOutcome {
    /// The damage had no effect.
    Ignored,
    /// The enemy survived with the provided health.
    Wounded { health: f32 },
    /// The enemy died from this hit. Returned at most once per enemy.
    Killed,
}

/// Rule modifiers that apply to every hit.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct DamageRules {
    pub(crate) instant_kill: bool,
    pub(crate) immune: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) wave: WaveIndex,
    pub(crate) position: Vec2,
    health: f32,
    max_health: f32,
    bounty: u32,
    navigator: Navigator,
    stun: Option<Duration>,
    dead: bool,
}

impl Enemy {
    pub(crate) fn spawn(id: EnemyId, kind: EnemyKind, wave: WaveIndex, position: Vec2) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            wave,
            position,
            health: stats.max_health,
            max_health: stats.max_health,
            bounty: stats.bounty,
            navigator: Navigator::new(stats.speed),
            stun: None,
            dead: false,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        !self.dead
    }

    pub(crate) fn health(&self) -> f32 {
        self.health
    }

    pub(crate) fn max_health(&self) -> f32 {
        self.max_health
    }

    pub(crate) fn bounty(&self) -> u32 {
        self.bounty
    }

    pub(crate) fn is_stunned(&self) -> bool {
        self.stun.is_some()
    }

    pub(crate) fn set_route(&mut self, waypoints: Vec<Vec2>) -> Result<(), NavigationError> {
        self.navigator.set_waypoints(waypoints)
    }

    pub(crate) fn set_speed(&mut self, speed: f32) {
        self.navigator.set_speed(speed);
    }

    pub(crate) fn set_stopped(&mut self, stopped: bool) {
        self.navigator.set_stopped(stopped);
    }

    /// Removes health, honouring the immunity and instant-kill rules.
    ///
    /// Health never drops below zero and the enemy transitions to dead on
    /// the first hit that empties it. Every later hit is ignored.
    pub(crate) fn take_damage(&mut self, amount: f32, rules: DamageRules) -> DamageOutcome {
        if self.dead || rules.immune {
            return DamageOutcome::Ignored;
        }

        self.health = (self.health - amount.max(0.0)).max(0.0);
        if self.health <= 0.0 || rules.instant_kill {
            self.die();
            return DamageOutcome::Killed;
        }

        DamageOutcome::Wounded {
            health: self.health,
        }
    }

    /// Starts a stun unless the kind resists stuns or one is already active.
    pub(crate) fn stun(&mut self, duration: Duration) -> bool {
        if self.dead || !self.kind.stunnable() || self.stun.is_some() {
            return false;
        }
        self.stun = Some(duration);
        true
    }

    /// Counts down an active stun. Returns the part of `dt` left after the
    /// stun wore off, or `None` when no stun ended this tick.
    pub(crate) fn tick_stun(&mut self, dt: Duration) -> Option<Duration> {
        let remaining = self.stun?;
        if dt >= remaining {
            self.stun = None;
            Some(dt - remaining)
        } else {
            self.stun = Some(remaining - dt);
            None
        }
    }

    /// Walks along the route unless stunned. Returns `true` on arrival.
    pub(crate) fn advance(&mut self, dt: Duration) -> bool {
        if self.dead || self.stun.is_some() {
            return false;
        }
        self.navigator.advance(&mut self.position, dt)
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            stunned: self.is_stunned(),
            waypoint: self.navigator.waypoint_index(),
        }
    }

    fn die(&mut self) {
        self.dead = true;
        self.health = 0.0;
        self.stun = None;
        self.navigator.set_stopped(true);
    }
}
