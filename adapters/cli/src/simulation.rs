//! Fixed-step game loop wiring the world to every gameplay system.

use std::{collections::VecDeque, time::Duration};

use bastion_core::{Command, Event, GameOutcome, GamePhase, TowerTarget, WaveIndex};
use bastion_system_builder::{Builder, BuilderInput};
use bastion_system_game_flow::{self as game_flow, GameFlow};
use bastion_system_spawning::{self as spawning, Spawning};
use bastion_system_tower_combat::TowerCombat;
use bastion_system_tower_targeting::TowerTargeting;
use bastion_world::{self as world, query, World};
use tracing::{debug, info, warn};

use crate::{
    hud::Hud,
    scenario::{BuildAction, Scenario},
};

/// Summary of a finished or interrupted run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Report {
    pub(crate) outcome: Option<GameOutcome>,
    pub(crate) wave: Option<WaveIndex>,
    pub(crate) elapsed: Duration,
    pub(crate) balance: u32,
    pub(crate) lives: u32,
}

/// Owns the world and the systems and pumps messages between them.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    flow: GameFlow,
    spawning: Spawning,
    builder: Builder,
    targeting: TowerTargeting,
    combat: TowerCombat,
    hud: Hud,
    build_rounds: VecDeque<Vec<BuildAction>>,
    pending_actions: Vec<BuildAction>,
    targets: Vec<TowerTarget>,
}

impl Simulation {
    pub(crate) fn new(scenario: Scenario) -> Self {
        let mut simulation = Self {
            world: World::new(),
            flow: GameFlow::new(game_flow::Config::new(scenario.build_duration)),
            spawning: Spawning::new(spawning::Config::new(scenario.waves)),
            builder: Builder::new(),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            hud: Hud::default(),
            build_rounds: scenario.build_rounds.into(),
            pending_actions: Vec::new(),
            targets: Vec::new(),
        };

        simulation.dispatch(vec![
            Command::ConfigureLevel {
                layout: scenario.layout,
                starting_money: scenario.starting_money,
                starting_lives: scenario.starting_lives,
            },
            Command::ConfigureDebug {
                toggles: scenario.debug,
            },
        ]);
        info!(
            waves = simulation.spawning.wave_count(),
            rounds = simulation.build_rounds.len(),
            "scenario loaded"
        );
        let mut start = Vec::new();
        simulation.flow.start(&mut start);
        simulation.dispatch(start);
        simulation.perform_build_actions();
        simulation
    }

    /// Advances the game by `dt`, returning `true` once an outcome is reached.
    pub(crate) fn step(&mut self, dt: Duration) -> bool {
        self.dispatch(vec![Command::Tick { dt }]);
        self.perform_build_actions();

        let phase = query::game_phase(&self.world);
        let towers = query::tower_view(&self.world);
        self.targeting.handle(
            phase,
            &towers,
            &query::enemy_view(&self.world),
            &mut self.targets,
        );
        let mut attacks = Vec::new();
        self.combat.handle(phase, &towers, &self.targets, &mut attacks);
        self.dispatch(attacks);

        query::outcome(&self.world).is_some()
    }

    pub(crate) fn hud_mut(&mut self) -> &mut Hud {
        &mut self.hud
    }

    pub(crate) fn report(&self) -> Report {
        Report {
            outcome: query::outcome(&self.world),
            wave: query::current_wave(&self.world),
            elapsed: query::elapsed(&self.world),
            balance: query::balance(&self.world),
            lives: query::lives(&self.world),
        }
    }

    fn dispatch(&mut self, mut commands: Vec<Command>) {
        let mut events = Vec::new();
        while !commands.is_empty() {
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            self.route(&events, &mut commands);
            events.clear();
        }
    }

    fn route(&mut self, events: &[Event], out: &mut Vec<Command>) {
        let mut flow_events = Vec::new();
        self.flow.handle(events, out, &mut flow_events);
        self.spawning.handle(events, out);
        self.builder.handle(events, BuilderInput::default(), out);

        for event in events {
            match event {
                Event::GamePhaseChanged {
                    phase: GamePhase::Building,
                } => {
                    if let Some(round) = self.build_rounds.pop_front() {
                        self.pending_actions.extend(round);
                    }
                }
                Event::TowerPlacementRejected { kind, slot, reason } => {
                    warn!(?kind, slot = slot.get(), ?reason, "scripted placement failed");
                }
                Event::TowerActionRejected { tower, reason } => {
                    warn!(tower = tower.get(), ?reason, "scripted tower action failed");
                }
                _ => {}
            }
        }

        self.hud.observe(events);
        self.hud.observe(&flow_events);
    }

    fn perform_build_actions(&mut self) {
        for action in std::mem::take(&mut self.pending_actions) {
            let Some(input) = self.input_for(action) else {
                warn!(?action, "no tower to act on");
                continue;
            };
            debug!(?action, "performing build action");
            let mut commands = Vec::new();
            self.builder.handle(&[], input, &mut commands);
            self.dispatch(commands);
        }
    }

    fn input_for(&self, action: BuildAction) -> Option<BuilderInput> {
        let occupant = |slot| {
            query::slot_view(&self.world)
                .get(slot)
                .and_then(|state| state.occupant)
        };

        let input = match action {
            BuildAction::Place { kind, slot } => BuilderInput {
                select_kind: Some(kind),
                confirm_slot: Some(slot),
                ..BuilderInput::default()
            },
            BuildAction::Upgrade { slot } => BuilderInput {
                inspect_tower: Some(occupant(slot)?),
                upgrade_action: true,
                ..BuilderInput::default()
            },
            BuildAction::Sell { slot } => BuilderInput {
                inspect_tower: Some(occupant(slot)?),
                sell_action: true,
                ..BuilderInput::default()
            },
        };
        Some(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_core::{
        DebugToggles, EnemyKind, EnemySet, LevelLayout, SlotId, TowerKind, WaveConfig,
    };
    use glam::Vec2;

    fn scenario(waves: Vec<WaveConfig>, build_rounds: Vec<Vec<BuildAction>>) -> Scenario {
        Scenario {
            layout: LevelLayout {
                spawn: Vec2::ZERO,
                waypoints: vec![Vec2::new(0.0, 12.0)],
                slots: vec![Vec2::new(0.0, 16.0), Vec2::new(5.0, 5.0)],
            },
            starting_money: 500,
            starting_lives: 10,
            build_duration: Duration::from_secs(2),
            waves,
            build_rounds,
            debug: DebugToggles::default(),
        }
    }

    fn wave(kind: EnemyKind, count: u32) -> WaveConfig {
        WaveConfig {
            sets: vec![EnemySet {
                kind,
                count,
                spawn_delay: Duration::from_secs(1),
            }],
            set_cooldown: Duration::from_secs(1),
        }
    }

    fn run(simulation: &mut Simulation, limit: Duration) {
        let dt = Duration::from_millis(100);
        let mut elapsed = Duration::ZERO;
        while elapsed < limit && !simulation.step(dt) {
            elapsed += dt;
        }
    }

    #[test]
    fn undefended_route_loses_lives() {
        let mut simulation = Simulation::new(scenario(vec![wave(EnemyKind::Runner, 3)], vec![]));
        run(&mut simulation, Duration::from_secs(30));

        let report = simulation.report();
        assert_eq!(report.lives, 7);
        assert_eq!(report.wave, Some(WaveIndex::new(0)));
        assert_eq!(report.balance, 500);
        assert_eq!(report.outcome, Some(GameOutcome::Won));
    }

    #[test]
    fn scripted_tower_defends_the_route() {
        let mut setup = scenario(
            vec![wave(EnemyKind::Grunt, 1)],
            vec![vec![BuildAction::Place {
                kind: TowerKind::Archer,
                slot: SlotId::new(0),
            }]],
        );
        setup.debug.instant_kill = true;
        let mut simulation = Simulation::new(setup);
        assert_eq!(simulation.report().balance, 400);

        run(&mut simulation, Duration::from_secs(60));
        let report = simulation.report();
        assert_eq!(report.outcome, Some(GameOutcome::Won));
        assert_eq!(report.lives, 10);
        assert_eq!(report.balance, 500);

        let hud = simulation.hud_mut();
        assert_eq!(hud.take_popups(), vec!["+100".to_owned()]);
        assert_eq!(hud.banner(), Some("You Win!"));
    }

    #[test]
    fn upgrade_and_sell_resolve_slots() {
        let mut simulation = Simulation::new(scenario(
            vec![wave(EnemyKind::Grunt, 1)],
            vec![vec![
                BuildAction::Place {
                    kind: TowerKind::Archer,
                    slot: SlotId::new(0),
                },
                BuildAction::Upgrade {
                    slot: SlotId::new(0),
                },
                BuildAction::Sell {
                    slot: SlotId::new(1),
                },
            ]],
        ));

        let towers = query::tower_view(&simulation.world);
        let kinds: Vec<_> = towers.iter().map(|tower| tower.kind).collect();
        assert_eq!(kinds, vec![TowerKind::Marksman]);
        assert_eq!(simulation.report().balance, 250);
    }
}
