//! Waypoint steering that moves enemies along their route.

use std::time::Duration;

use glam::Vec2;
use thiserror::Error;

/// Distance at which a waypoint counts as reached.
pub(crate) const STOPPING_DISTANCE: f32 = 0.1;

/// Reasons a route assignment may be refused.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub(crate) enum NavigationError {
    /// The provided route contained no waypoints.
    #[error("route contains no waypoints")]
    EmptyRoute,
}

/// Drives a single entity along an ordered list of waypoints.
///
/// The navigator owns the route and the progress along it while the caller
/// owns the position, so the same navigator logic can steer any entity.
/// Arrival at the final waypoint is reported exactly once per route.
#[derive(Clone, Debug)]
pub(crate) struct Navigator {
    waypoints: Vec<Vec2>,
    index: usize,
    speed: f32,
    stopped: bool,
    arrived: bool,
}

impl Navigator {
    /// Creates a navigator without a route that travels at `speed`.
    pub(crate) fn new(speed: f32) -> Self {
        Self {
            waypoints: Vec::new(),
            index: 0,
            speed,
            stopped: false,
            arrived: false,
        }
    }

    /// Assigns a new route and restarts travel toward its first waypoint.
    pub(crate) fn set_waypoints(&mut self, waypoints: Vec<Vec2>) -> Result<(), NavigationError> {
        if waypoints.is_empty() {
            return Err(NavigationError::EmptyRoute);
        }

        self.waypoints = waypoints;
        self.index = 0;
        self.arrived = false;
        Ok(())
    }

    pub(crate) fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    pub(crate) fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    /// Index of the waypoint currently travelled toward.
    pub(crate) fn waypoint_index(&self) -> usize {
        self.index
    }

    /// Moves `position` toward the route for `dt` of travel.
    ///
    /// Travel left over after reaching a waypoint carries on toward the next
    /// one. Returns `true` on the call that reaches the final waypoint and
    /// `false` on every other call, including all calls after arrival.
    pub(crate) fn advance(&mut self, position: &mut Vec2, dt: Duration) -> bool {
        if self.stopped || self.arrived || self.waypoints.is_empty() {
            return false;
        }

        let mut budget = self.speed * dt.as_secs_f32();
        loop {
            let target = self.waypoints[self.index];
            let offset = target - *position;
            let distance = offset.length();

            if distance <= STOPPING_DISTANCE {
                if self.index + 1 < self.waypoints.len() {
                    self.index += 1;
                    continue;
                }
                self.arrived = true;
                return true;
            }

            if budget <= 0.0 {
                return false;
            }

            if budget >= distance {
                *position = target;
                budget -= distance;
            } else {
                *position += offset / distance * budget;
                budget = 0.0;
            }
        }
    }
}
