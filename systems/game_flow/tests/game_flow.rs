use std::time::Duration;

use bastion_core::{Command, Event, GamePhase, LevelLayout, WaveIndex};
use bastion_system_game_flow::{Config, GameFlow};
use bastion_world::{self as world, query, World};

struct Harness {
    world: World,
    flow: GameFlow,
    requests: Vec<GamePhase>,
    countdown: Vec<Duration>,
}

impl Harness {
    fn new() -> Self {
        let mut harness = Self {
            world: World::new(),
            flow: GameFlow::new(Config::new(Duration::from_secs(10))),
            requests: Vec::new(),
            countdown: Vec::new(),
        };
        harness.submit(Command::ConfigureLevel {
            layout: LevelLayout::default(),
            starting_money: 500,
            starting_lives: 10,
        });
        let mut commands = Vec::new();
        harness.flow.start(&mut commands);
        for command in commands {
            harness.submit(command);
        }
        harness
    }

    fn submit(&mut self, command: Command) {
        if let Command::SetGamePhase { phase } = command {
            self.requests.push(phase);
        }
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.pump(events);
    }

    fn pump(&mut self, events: Vec<Event>) {
        let mut commands = Vec::new();
        let mut flow_events = Vec::new();
        self.flow.handle(&events, &mut commands, &mut flow_events);
        for event in flow_events {
            if let Event::BuildCountdown { remaining } = event {
                self.countdown.push(remaining);
            }
        }
        for command in commands {
            self.submit(command);
        }
    }

    fn tick_seconds(&mut self, seconds: u64) {
        for _ in 0..seconds {
            self.submit(Command::Tick {
                dt: Duration::from_secs(1),
            });
        }
    }

    fn combat_requests(&self) -> usize {
        self.requests
            .iter()
            .filter(|phase| **phase == GamePhase::Combat)
            .count()
    }
}

#[test]
fn build_phase_hands_over_to_combat_after_countdown() {
    let mut harness = Harness::new();
    assert_eq!(query::game_phase(&harness.world), GamePhase::Building);

    harness.tick_seconds(9);
    assert_eq!(harness.combat_requests(), 0);
    assert_eq!(harness.flow.build_time_left(), Some(Duration::from_secs(1)));

    harness.tick_seconds(1);
    assert_eq!(harness.combat_requests(), 1);
    assert_eq!(query::game_phase(&harness.world), GamePhase::Combat);
    assert_eq!(harness.flow.build_time_left(), None);

    let shown: Vec<u64> = harness.countdown.iter().map(Duration::as_secs).collect();
    assert_eq!(shown, vec![10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
}

#[test]
fn completed_wave_returns_to_building() {
    let mut harness = Harness::new();
    harness.tick_seconds(10);
    harness.submit(Command::CompleteWave {
        wave: WaveIndex::new(0),
    });

    assert_eq!(query::game_phase(&harness.world), GamePhase::Building);
    assert_eq!(
        harness.flow.build_time_left(),
        Some(Duration::from_secs(10))
    );
}

#[test]
fn restarting_the_countdown_requests_combat_once() {
    let mut flow = GameFlow::new(Config::new(Duration::from_secs(10)));
    let mut commands = Vec::new();
    let mut events = Vec::new();
    let building = Event::GamePhaseChanged {
        phase: GamePhase::Building,
    };
    let tick = |seconds| Event::TimeAdvanced {
        dt: Duration::from_secs(seconds),
    };

    flow.handle(&[building.clone(), tick(6)], &mut commands, &mut events);
    flow.handle(&[building, tick(6)], &mut commands, &mut events);
    assert!(commands.is_empty(), "restart must cancel the first countdown");

    flow.handle(&[tick(4), tick(4), tick(10)], &mut commands, &mut events);
    assert_eq!(
        commands,
        vec![Command::SetGamePhase {
            phase: GamePhase::Combat
        }]
    );
}

#[test]
fn victory_cancels_pending_countdown() {
    let mut harness = Harness::new();
    harness.tick_seconds(3);
    harness.submit(Command::DeclareVictory);
    harness.tick_seconds(20);

    assert_eq!(harness.combat_requests(), 0);
    assert!(harness.flow.is_finished());
    assert_eq!(harness.flow.phase(), GamePhase::Building);
}
