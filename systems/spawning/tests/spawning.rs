use std::time::Duration;

use bastion_core::{
    Command, EnemyId, EnemyKind, EnemySet, Event, GameOutcome, GamePhase, LevelLayout, WaveConfig,
    WaveIndex,
};
use bastion_system_spawning::{Config, Spawning};
use bastion_world::{self as world, query, World};
use glam::Vec2;

struct Harness {
    world: World,
    spawning: Spawning,
    emitted: Vec<(Duration, Command)>,
}

impl Harness {
    fn new(waves: Vec<WaveConfig>, exit: Vec2) -> Self {
        let mut harness = Self {
            world: World::new(),
            spawning: Spawning::new(Config::new(waves)),
            emitted: Vec::new(),
        };
        harness.submit(Command::ConfigureLevel {
            layout: LevelLayout {
                spawn: Vec2::ZERO,
                waypoints: vec![exit],
                slots: Vec::new(),
            },
            starting_money: 500,
            starting_lives: 10,
        });
        harness
    }

    fn submit(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.pump(events);
    }

    fn pump(&mut self, mut events: Vec<Event>) {
        while !events.is_empty() {
            let mut commands = Vec::new();
            self.spawning.handle(&events, &mut commands);
            events.clear();
            for command in commands {
                self.emitted
                    .push((query::elapsed(&self.world), command.clone()));
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }

    fn enter_combat(&mut self) {
        self.submit(Command::SetGamePhase {
            phase: GamePhase::Combat,
        });
    }

    fn tick(&mut self, dt: Duration) {
        self.submit(Command::Tick { dt });
    }

    fn kill(&mut self, enemy: u32) {
        self.submit(Command::DamageEnemy {
            enemy: EnemyId::new(enemy),
            amount: 1_000.0,
        });
    }

    fn count(&self, predicate: impl Fn(&Command) -> bool) -> usize {
        self.emitted
            .iter()
            .filter(|(_, command)| predicate(command))
            .count()
    }
}

fn wave(kind: EnemyKind, count: u32) -> WaveConfig {
    WaveConfig {
        sets: vec![EnemySet {
            kind,
            count,
            spawn_delay: Duration::from_secs(1),
        }],
        set_cooldown: Duration::from_secs(5),
    }
}

fn far_exit() -> Vec2 {
    Vec2::new(100.0, 0.0)
}

fn is_spawn(command: &Command) -> bool {
    matches!(command, Command::SpawnEnemy { .. })
}

#[test]
fn three_enemies_spawn_one_second_apart_and_complete_once() {
    let mut harness = Harness::new(
        vec![wave(EnemyKind::Grunt, 3), wave(EnemyKind::Grunt, 1)],
        far_exit(),
    );
    harness.enter_combat();
    for _ in 0..6 {
        harness.tick(Duration::from_millis(500));
    }

    let spawn_times: Vec<Duration> = harness
        .emitted
        .iter()
        .filter(|(_, command)| is_spawn(command))
        .map(|(at, _)| *at)
        .collect();
    assert_eq!(
        spawn_times,
        vec![
            Duration::ZERO,
            Duration::from_secs(1),
            Duration::from_secs(2),
        ]
    );

    let completions = |harness: &Harness| {
        harness.count(|command| matches!(command, Command::CompleteWave { .. }))
    };

    harness.kill(0);
    harness.kill(1);
    assert_eq!(completions(&harness), 0);

    harness.kill(2);
    harness.kill(2);
    harness.tick(Duration::from_secs(1));
    assert_eq!(completions(&harness), 1);
    assert!(harness.emitted.iter().any(|(_, command)| *command
        == Command::CompleteWave {
            wave: WaveIndex::new(0)
        }));
    assert_eq!(harness.spawning.active_wave(), None);
    assert_eq!(harness.spawning.waves_remaining(), 1);
}

#[test]
fn clearing_the_final_wave_declares_victory() {
    let mut harness = Harness::new(vec![wave(EnemyKind::Runner, 1)], far_exit());
    harness.enter_combat();
    harness.kill(0);

    assert_eq!(harness.count(|c| *c == Command::DeclareVictory), 1);
    assert_eq!(
        harness.count(|c| matches!(c, Command::CompleteWave { .. })),
        0
    );
    assert!(harness.spawning.all_waves_complete());
    assert_eq!(query::outcome(&harness.world), Some(GameOutcome::Won));
}

#[test]
fn escaped_enemies_also_clear_the_wave() {
    let mut harness = Harness::new(
        vec![wave(EnemyKind::Runner, 1), wave(EnemyKind::Tank, 1)],
        Vec2::new(2.0, 0.0),
    );
    harness.enter_combat();
    harness.tick(Duration::from_secs(1));

    assert_eq!(query::lives(&harness.world), 9);
    assert_eq!(
        harness.count(|c| matches!(c, Command::CompleteWave { .. })),
        1
    );
}

#[test]
fn starting_while_a_wave_runs_is_ignored() {
    let mut harness = Harness::new(
        vec![wave(EnemyKind::Grunt, 2), wave(EnemyKind::Grunt, 2)],
        far_exit(),
    );
    harness.enter_combat();
    harness.submit(Command::SetGamePhase {
        phase: GamePhase::Building,
    });
    harness.enter_combat();

    assert_eq!(
        harness.count(|c| matches!(c, Command::BeginWave { .. })),
        1
    );
    assert_eq!(harness.spawning.active_wave(), Some(WaveIndex::new(0)));
}

#[test]
fn empty_wave_completes_as_soon_as_it_starts() {
    let mut harness = Harness::new(
        vec![
            WaveConfig {
                sets: Vec::new(),
                set_cooldown: Duration::from_secs(5),
            },
            wave(EnemyKind::Grunt, 1),
        ],
        far_exit(),
    );
    harness.enter_combat();

    let commands: Vec<Command> = harness
        .emitted
        .iter()
        .map(|(_, command)| command.clone())
        .collect();
    assert_eq!(
        commands,
        vec![
            Command::BeginWave {
                wave: WaveIndex::new(0)
            },
            Command::CompleteWave {
                wave: WaveIndex::new(0)
            },
        ]
    );
}

#[test]
fn large_ticks_release_every_due_spawn() {
    let mut harness = Harness::new(vec![wave(EnemyKind::Grunt, 5)], far_exit());
    harness.enter_combat();
    harness.tick(Duration::from_secs(10));

    assert_eq!(harness.count(is_spawn), 5);
    assert_eq!(query::enemy_view(&harness.world).len(), 5);
    assert_eq!(harness.spawning.live_enemies(), 5);
}

#[test]
fn exhausted_spawner_ignores_further_combat() {
    let mut spawning = Spawning::new(Config::new(Vec::new()));
    let mut commands = Vec::new();
    spawning.handle(
        &[Event::GamePhaseChanged {
            phase: GamePhase::Combat,
        }],
        &mut commands,
    );
    assert!(commands.is_empty());
    assert_eq!(spawning.wave_count(), 0);
}

#[test]
fn unknown_enemies_are_ignored() {
    let mut spawning = Spawning::new(Config::new(vec![wave(EnemyKind::Grunt, 1)]));
    let mut commands = Vec::new();
    spawning.handle(
        &[
            Event::GamePhaseChanged {
                phase: GamePhase::Combat,
            },
            Event::EnemyDied {
                enemy: EnemyId::new(42),
                bounty: 100,
                position: Vec2::ZERO,
            },
        ],
        &mut commands,
    );
    assert_eq!(
        commands,
        vec![
            Command::BeginWave {
                wave: WaveIndex::new(0)
            },
            Command::SpawnEnemy {
                kind: EnemyKind::Grunt,
                wave: WaveIndex::new(0)
            },
        ]
    );
}
