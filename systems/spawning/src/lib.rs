#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave spawning system that sequences enemy sets and detects wave completion.

use std::{collections::BTreeSet, time::Duration};

use bastion_core::{Command, EnemyId, Event, GamePhase, WaveConfig, WaveIndex};
use tracing::{debug, info, warn};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Debug, Default)]
pub struct Config {
    waves: Vec<WaveConfig>,
}

impl Config {
    /// Creates a new configuration from the ordered wave list.
    #[must_use]
    pub fn new(waves: Vec<WaveConfig>) -> Self {
        Self { waves }
    }
}

/// Progress through the sets of the wave being spawned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cursor {
    set: usize,
    spawned_in_set: u32,
    wait: Duration,
}

/// Lifecycle of the spawner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Spawning(Cursor),
    Clearing,
    AllWavesComplete,
    Halted,
}

/// Pure system that releases wave enemies over time and reports when each
/// wave has been dealt with.
///
/// A wave starts whenever the game enters combat. Enemies of a set spawn
/// one `spawn_delay` apart with the first released immediately, and the
/// wave's `set_cooldown` separates consecutive sets. The wave completes
/// once spawning finished, every spawn was confirmed by the world and
/// every confirmed enemy has died or escaped.
#[derive(Debug)]
pub struct Spawning {
    waves: Vec<WaveConfig>,
    next_wave: usize,
    active: Option<WaveIndex>,
    state: State,
    awaiting_confirmation: u32,
    live: BTreeSet<EnemyId>,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            waves: config.waves,
            next_wave: 0,
            active: None,
            state: State::Idle,
            awaiting_confirmation: 0,
            live: BTreeSet::new(),
        }
    }

    /// Consumes events to emit spawn and wave lifecycle commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::GamePhaseChanged {
                    phase: GamePhase::Combat,
                } => self.start_next_wave(out),
                Event::TimeAdvanced { dt } => self.release(*dt, out),
                Event::EnemySpawned { enemy, wave, .. } => self.confirm_spawn(*enemy, *wave),
                Event::EnemyDied { enemy, .. } | Event::EnemyEscaped { enemy } => {
                    self.forget(*enemy);
                }
                Event::GameWon | Event::GameOver => {
                    if self.state != State::AllWavesComplete {
                        self.state = State::Halted;
                    }
                }
                _ => {}
            }
            self.check_completion(out);
        }
    }

    /// Wave currently being spawned or cleared, if any.
    #[must_use]
    pub fn active_wave(&self) -> Option<WaveIndex> {
        self.active
    }

    /// Number of confirmed enemies of the active wave still alive.
    #[must_use]
    pub fn live_enemies(&self) -> usize {
        self.live.len()
    }

    /// Number of waves that have not started yet.
    #[must_use]
    pub fn waves_remaining(&self) -> usize {
        self.waves.len().saturating_sub(self.next_wave)
    }

    /// Total number of configured waves.
    #[must_use]
    pub fn wave_count(&self) -> usize {
        self.waves.len()
    }

    /// Reports whether every wave has been cleared.
    #[must_use]
    pub fn all_waves_complete(&self) -> bool {
        self.state == State::AllWavesComplete
    }

    fn start_next_wave(&mut self, out: &mut Vec<Command>) {
        match self.state {
            State::Spawning(_) | State::Clearing => {
                info!(wave = ?self.active.map(|w| w.number()), "wave already in progress");
                return;
            }
            State::AllWavesComplete | State::Halted => {
                info!("no waves remaining");
                return;
            }
            State::Idle => {}
        }
        if self.next_wave >= self.waves.len() {
            info!("no waves remaining");
            return;
        }

        let wave = WaveIndex::new(self.next_wave as u32);
        self.active = Some(wave);
        self.awaiting_confirmation = 0;
        self.live.clear();
        self.state = State::Spawning(Cursor {
            set: 0,
            spawned_in_set: 0,
            wait: Duration::ZERO,
        });

        info!(
            wave = wave.number(),
            enemies = self.waves[self.next_wave].enemy_count(),
            "spawning wave"
        );
        out.push(Command::BeginWave { wave });
        self.release(Duration::ZERO, out);
    }

    fn release(&mut self, dt: Duration, out: &mut Vec<Command>) {
        let State::Spawning(mut cursor) = self.state else {
            return;
        };
        let Some(wave_index) = self.active else {
            return;
        };
        let Some(wave) = self.waves.get(wave_index.get() as usize) else {
            return;
        };

        let mut budget = dt;
        let finished = loop {
            let Some(set) = wave.sets.get(cursor.set) else {
                break true;
            };

            if cursor.spawned_in_set >= set.count {
                cursor.set += 1;
                cursor.spawned_in_set = 0;
                if cursor.set < wave.sets.len() {
                    cursor.wait = cursor.wait.saturating_add(wave.set_cooldown);
                    debug!(wave = wave_index.number(), set = cursor.set, "set finished");
                }
                continue;
            }

            if cursor.wait > budget {
                cursor.wait -= budget;
                break false;
            }

            budget -= cursor.wait;
            out.push(Command::SpawnEnemy {
                kind: set.kind,
                wave: wave_index,
            });
            self.awaiting_confirmation = self.awaiting_confirmation.saturating_add(1);
            cursor.spawned_in_set += 1;
            cursor.wait = set.spawn_delay;
        };

        self.state = if finished {
            debug!(wave = wave_index.number(), "wave finished spawning");
            State::Clearing
        } else {
            State::Spawning(cursor)
        };
    }

    fn confirm_spawn(&mut self, enemy: EnemyId, wave: WaveIndex) {
        if self.active != Some(wave) {
            return;
        }
        self.awaiting_confirmation = self.awaiting_confirmation.saturating_sub(1);
        let _ = self.live.insert(enemy);
    }

    fn forget(&mut self, enemy: EnemyId) {
        if !self.live.remove(&enemy) {
            warn!(enemy = enemy.get(), "enemy was not spawned by the active wave");
        }
    }

    fn check_completion(&mut self, out: &mut Vec<Command>) {
        if self.state != State::Clearing
            || self.awaiting_confirmation > 0
            || !self.live.is_empty()
        {
            return;
        }
        let Some(wave) = self.active.take() else {
            return;
        };

        self.next_wave += 1;
        if self.next_wave >= self.waves.len() {
            info!(wave = wave.number(), "final wave cleared");
            self.state = State::AllWavesComplete;
            out.push(Command::DeclareVictory);
        } else {
            info!(wave = wave.number(), "wave cleared");
            self.state = State::Idle;
            out.push(Command::CompleteWave { wave });
        }
    }
}
