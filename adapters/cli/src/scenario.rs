//! Scenario files describing a level, its waves and a scripted build order.

use std::{fs, path::Path, time::Duration};

use bastion_core::{
    seconds, DebugToggles, EnemyKind, EnemySet, LevelLayout, SlotId, TowerKind, WaveConfig,
};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a scenario file.
#[derive(Debug, Error)]
pub(crate) enum ScenarioError {
    #[error("failed to read scenario {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("scenario is not valid JSON")]
    Parse(#[from] serde_json::Error),
    #[error("scenario defines no waves")]
    NoWaves,
    #[error("scenario route has no waypoints")]
    EmptyRoute,
    #[error("build round {round} refers to slot {slot}, but the level has {slots} slots")]
    UnknownSlot { round: usize, slot: u32, slots: usize },
}

/// A single scripted player action performed during a build phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub(crate) enum BuildAction {
    Place { kind: TowerKind, slot: SlotId },
    Upgrade { slot: SlotId },
    Sell { slot: SlotId },
}

impl BuildAction {
    fn slot(self) -> SlotId {
        match self {
            Self::Place { slot, .. } | Self::Upgrade { slot } | Self::Sell { slot } => slot,
        }
    }
}

/// Everything needed to run one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Scenario {
    pub(crate) layout: LevelLayout,
    #[serde(default = "default_money")]
    pub(crate) starting_money: u32,
    #[serde(default = "default_lives")]
    pub(crate) starting_lives: u32,
    #[serde(with = "seconds", default = "default_build_duration")]
    pub(crate) build_duration: Duration,
    pub(crate) waves: Vec<WaveConfig>,
    /// Actions performed at the start of each build phase, one round per phase.
    #[serde(default)]
    pub(crate) build_rounds: Vec<Vec<BuildAction>>,
    #[serde(default)]
    pub(crate) debug: DebugToggles,
}

fn default_money() -> u32 {
    500
}

fn default_lives() -> u32 {
    10
}

fn default_build_duration() -> Duration {
    Duration::from_secs(10)
}

impl Scenario {
    /// Reads and validates a scenario from disk.
    pub(crate) fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    pub(crate) fn parse(text: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = serde_json::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if self.waves.is_empty() {
            return Err(ScenarioError::NoWaves);
        }
        if self.layout.waypoints.is_empty() {
            return Err(ScenarioError::EmptyRoute);
        }
        let slots = self.layout.slots.len();
        for (round, actions) in self.build_rounds.iter().enumerate() {
            for action in actions {
                let slot = action.slot();
                if slot.get() as usize >= slots {
                    return Err(ScenarioError::UnknownSlot {
                        round,
                        slot: slot.get(),
                        slots,
                    });
                }
            }
        }
        Ok(())
    }

    /// Level shipped with the binary.
    pub(crate) fn builtin() -> Self {
        let set = |kind, count, delay_ms| EnemySet {
            kind,
            count,
            spawn_delay: Duration::from_millis(delay_ms),
        };
        let place = |kind, slot| BuildAction::Place {
            kind,
            slot: SlotId::new(slot),
        };

        Self {
            layout: LevelLayout {
                spawn: Vec2::new(0.0, -2.0),
                waypoints: vec![
                    Vec2::new(0.0, 10.0),
                    Vec2::new(15.0, 10.0),
                    Vec2::new(15.0, 20.0),
                    Vec2::new(30.0, 20.0),
                ],
                slots: vec![
                    Vec2::new(3.0, 5.0),
                    Vec2::new(-3.0, 12.0),
                    Vec2::new(8.0, 13.0),
                    Vec2::new(12.0, 7.0),
                    Vec2::new(18.0, 15.0),
                    Vec2::new(24.0, 23.0),
                ],
            },
            starting_money: default_money(),
            starting_lives: default_lives(),
            build_duration: default_build_duration(),
            waves: vec![
                WaveConfig {
                    sets: vec![set(EnemyKind::Grunt, 5, 1_500)],
                    set_cooldown: Duration::from_secs(5),
                },
                WaveConfig {
                    sets: vec![
                        set(EnemyKind::Grunt, 4, 1_000),
                        set(EnemyKind::Runner, 4, 750),
                    ],
                    set_cooldown: Duration::from_secs(4),
                },
                WaveConfig {
                    sets: vec![
                        set(EnemyKind::Runner, 6, 500),
                        set(EnemyKind::Tank, 3, 2_000),
                    ],
                    set_cooldown: Duration::from_secs(5),
                },
            ],
            build_rounds: vec![
                vec![
                    place(TowerKind::Archer, 0),
                    place(TowerKind::Archer, 2),
                    place(TowerKind::Bombard, 3),
                ],
                vec![
                    BuildAction::Upgrade {
                        slot: SlotId::new(0),
                    },
                    place(TowerKind::Tesla, 4),
                ],
                vec![place(TowerKind::Archer, 1), place(TowerKind::Archer, 5)],
            ],
            debug: DebugToggles::default(),
        }
    }
}
