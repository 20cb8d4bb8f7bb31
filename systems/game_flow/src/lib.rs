#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Build and combat phase cycling driven by a timed build countdown.

use std::time::Duration;

use bastion_core::{Command, Event, GamePhase};
use tracing::{debug, info};

/// Configuration parameters required to construct the game flow system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    build_duration: Duration,
}

impl Config {
    /// Creates a new configuration with the time granted for each build phase.
    #[must_use]
    pub const fn new(build_duration: Duration) -> Self {
        Self { build_duration }
    }
}

/// Pure system that alternates between building and combat.
///
/// Every time the world enters the building phase a countdown is armed,
/// replacing any countdown still running. When it reaches zero the system
/// requests combat. A completed wave returns the game to building. Winning
/// or losing stops all further transitions.
#[derive(Debug)]
pub struct GameFlow {
    build_duration: Duration,
    phase: GamePhase,
    countdown: Option<Duration>,
    finished: bool,
}

impl GameFlow {
    /// Creates a new game flow system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            build_duration: config.build_duration,
            phase: GamePhase::None,
            countdown: None,
            finished: false,
        }
    }

    /// Requests the first building phase.
    pub fn start(&self, out: &mut Vec<Command>) {
        if self.finished {
            return;
        }
        out.push(Command::SetGamePhase {
            phase: GamePhase::Building,
        });
    }

    /// Consumes world events, emitting phase requests and countdown updates.
    pub fn handle(
        &mut self,
        events: &[Event],
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        for event in events {
            match event {
                Event::GamePhaseChanged { phase } => self.enter(*phase, out_events),
                Event::TimeAdvanced { dt } => self.count_down(*dt, out_commands, out_events),
                Event::WaveCompleted { wave } => {
                    if self.phase == GamePhase::Combat && !self.finished {
                        info!(wave = wave.number(), "returning to building");
                        out_commands.push(Command::SetGamePhase {
                            phase: GamePhase::Building,
                        });
                    }
                }
                Event::GameWon | Event::GameOver => {
                    self.finished = true;
                    self.countdown = None;
                }
                _ => {}
            }
        }
    }

    /// Phase most recently reported by the world.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Time left in the running build countdown, if any.
    #[must_use]
    pub fn build_time_left(&self) -> Option<Duration> {
        self.countdown
    }

    /// Reports whether the game has been won or lost.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn enter(&mut self, phase: GamePhase, out_events: &mut Vec<Event>) {
        self.phase = phase;
        match phase {
            GamePhase::Building if !self.finished => {
                if self.countdown.is_some() {
                    debug!("build countdown restarted");
                }
                self.countdown = Some(self.build_duration);
                out_events.push(Event::BuildCountdown {
                    remaining: self.build_duration,
                });
            }
            _ => self.countdown = None,
        }
    }

    fn count_down(
        &mut self,
        dt: Duration,
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        let Some(remaining) = self.countdown else {
            return;
        };

        let remaining = remaining.saturating_sub(dt);
        out_events.push(Event::BuildCountdown { remaining });
        if remaining.is_zero() {
            self.countdown = None;
            info!("build time over");
            out_commands.push(Command::SetGamePhase {
                phase: GamePhase::Combat,
            });
        } else {
            self.countdown = Some(remaining);
        }
    }
}
