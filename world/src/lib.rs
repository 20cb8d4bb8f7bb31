#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Bastion.

mod economy;
mod enemies;
mod lives;
mod navigation;
mod projectiles;
mod towers;

use std::{collections::BTreeMap, time::Duration};

use bastion_core::{
    AttackPattern, Command, DebugToggles, EnemyId, EnemyKind, Event, GameOutcome, GamePhase,
    LevelLayout, PlacementError, ProjectileId, ProjectileKind, SlotId, TowerActionError, TowerId,
    TowerKind, WaveIndex, RADIAL_DIRECTIONS,
};
use glam::Vec2;
use tracing::{debug, info, warn};

use economy::Wallet;
use enemies::{DamageOutcome, DamageRules, Enemy};
use lives::{LifeLoss, Lives};
use projectiles::Projectile;
use towers::TowerRegistry;

const DEFAULT_STARTING_MONEY: u32 = 500;
const DEFAULT_STARTING_LIVES: u32 = 10;

/// Represents the authoritative Bastion world state.
#[derive(Debug)]
pub struct World {
    clock: Duration,
    phase: GamePhase,
    outcome: Option<GameOutcome>,
    layout: LevelLayout,
    wallet: Wallet,
    lives: Lives,
    debug: DebugToggles,
    enemies: BTreeMap<EnemyId, Enemy>,
    next_enemy_id: u32,
    towers: TowerRegistry,
    projectiles: Vec<Projectile>,
    next_projectile_id: u32,
    current_wave: Option<WaveIndex>,
}

impl World {
    /// Creates a new Bastion world with an empty level and default resources.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: Duration::ZERO,
            phase: GamePhase::None,
            outcome: None,
            layout: LevelLayout::default(),
            wallet: Wallet::new(DEFAULT_STARTING_MONEY),
            lives: Lives::new(DEFAULT_STARTING_LIVES),
            debug: DebugToggles::default(),
            enemies: BTreeMap::new(),
            next_enemy_id: 0,
            towers: TowerRegistry::new(),
            projectiles: Vec::new(),
            next_projectile_id: 0,
            current_wave: None,
        }
    }

    fn damage_rules(&self) -> DamageRules {
        DamageRules {
            instant_kill: self.debug.instant_kill,
            immune: self.debug.enemies_immune,
        }
    }

    fn live_enemy_positions(&self) -> Vec<(EnemyId, Vec2)> {
        self.enemies
            .values()
            .filter(|enemy| enemy.is_alive())
            .map(|enemy| (enemy.id, enemy.position))
            .collect()
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, wave: WaveIndex, out_events: &mut Vec<Event>) {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.saturating_add(1);

        let position = self.layout.spawn;
        let mut enemy = Enemy::spawn(id, kind, wave, position);
        if let Err(error) = enemy.set_route(self.layout.waypoints.clone()) {
            warn!(enemy = id.get(), %error, "enemy spawned without a route and will not move");
        }
        let _ = self.enemies.insert(id, enemy);

        debug!(enemy = id.get(), ?kind, wave = wave.number(), "enemy spawned");
        out_events.push(Event::EnemySpawned {
            enemy: id,
            kind,
            wave,
            position,
        });
    }

    fn damage_enemy(&mut self, id: EnemyId, amount: f32, out_events: &mut Vec<Event>) {
        let rules = self.damage_rules();
        let Some(enemy) = self.enemies.get_mut(&id) else {
            debug!(enemy = id.get(), "damage aimed at unknown enemy");
            return;
        };

        match enemy.take_damage(amount, rules) {
            DamageOutcome::Ignored => {}
            DamageOutcome::Wounded { health } => {
                out_events.push(Event::EnemyHealthChanged {
                    enemy: id,
                    health,
                    max_health: enemy.max_health(),
                });
            }
            DamageOutcome::Killed => {
                let bounty = enemy.bounty();
                let position = enemy.position;
                out_events.push(Event::EnemyHealthChanged {
                    enemy: id,
                    health: enemy.health(),
                    max_health: enemy.max_health(),
                });
                out_events.push(Event::EnemyDied {
                    enemy: id,
                    bounty,
                    position,
                });
                debug!(enemy = id.get(), bounty, "enemy died");
                let balance = self.wallet.add(bounty);
                out_events.push(Event::MoneyChanged { balance });
            }
        }
    }

    fn stun_enemy(&mut self, id: EnemyId, duration: Duration, out_events: &mut Vec<Event>) {
        let Some(enemy) = self.enemies.get_mut(&id) else {
            return;
        };
        if enemy.stun(duration) {
            out_events.push(Event::EnemyStunned {
                enemy: id,
                duration,
            });
        }
    }

    fn sweep_dead_enemies(&mut self) {
        self.enemies.retain(|_, enemy| enemy.is_alive());
    }

    fn lose_life(&mut self, out_events: &mut Vec<Event>) {
        match self.lives.reduce() {
            LifeLoss::Ignored => {}
            LifeLoss::Lost { remaining } => {
                out_events.push(Event::LivesChanged { remaining });
            }
            LifeLoss::Depleted => {
                out_events.push(Event::LivesChanged { remaining: 0 });
                if self.outcome.is_none() {
                    self.outcome = Some(GameOutcome::Lost);
                    info!("all lives lost");
                    out_events.push(Event::GameOver);
                }
            }
        }
    }

    fn apply_projectile(&mut self, kind: ProjectileKind, struck: EnemyId, out: &mut Vec<Event>) {
        match kind {
            ProjectileKind::Standard { damage } => self.damage_enemy(struck, damage, out),
            ProjectileKind::Chain {
                damage,
                stun,
                chain_range,
                chain_count,
            } => {
                let Some(origin) = self.enemies.get(&struck).map(|enemy| enemy.position) else {
                    return;
                };
                let victims = projectiles::chain_victims(
                    origin,
                    struck,
                    chain_range,
                    chain_count,
                    self.live_enemy_positions(),
                );
                for id in std::iter::once(struck).chain(victims) {
                    self.stun_enemy(id, stun, out);
                    self.damage_enemy(id, damage, out);
                }
            }
        }
    }

    fn resolve_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let in_flight = std::mem::take(&mut self.projectiles);
        let mut remaining = Vec::with_capacity(in_flight.len());

        for mut projectile in in_flight {
            let (start, end) = projectile.advance(dt);
            let hit = projectiles::first_hit(start, end, self.live_enemy_positions());
            if let Some(enemy) = hit {
                debug!(
                    projectile = projectile.id.get(),
                    tower = projectile.tower.get(),
                    enemy = enemy.get(),
                    "projectile hit"
                );
                out_events.push(Event::ProjectileHit {
                    projectile: projectile.id,
                    enemy,
                });
                self.apply_projectile(projectile.kind, enemy, out_events);
                continue;
            }

            if projectile.expired() {
                out_events.push(Event::ProjectileExpired {
                    projectile: projectile.id,
                });
                continue;
            }

            remaining.push(projectile);
        }

        self.projectiles = remaining;
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        if self.outcome.is_some() {
            return;
        }

        let mut arrived = Vec::new();
        for enemy in self.enemies.values_mut() {
            let mut travel = dt;
            if let Some(leftover) = enemy.tick_stun(dt) {
                out_events.push(Event::EnemyRecovered { enemy: enemy.id });
                travel = leftover;
            }
            if enemy.advance(travel) {
                arrived.push(enemy.id);
            }
        }

        self.resolve_projectiles(dt, out_events);
        self.sweep_dead_enemies();

        for id in arrived {
            let Some(enemy) = self.enemies.remove(&id) else {
                continue;
            };
            debug!(enemy = id.get(), wave = enemy.wave.number(), "enemy escaped");
            out_events.push(Event::EnemyEscaped { enemy: id });
            self.lose_life(out_events);
        }
    }

    fn place_tower(
        &mut self,
        kind: TowerKind,
        slot: SlotId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), PlacementError> {
        if self.phase != GamePhase::Building {
            return Err(PlacementError::InvalidPhase);
        }
        let state = self.towers.slot(slot).ok_or(PlacementError::MissingSlot)?;
        if state.occupant.is_some() {
            return Err(PlacementError::Occupied);
        }
        let balance = self
            .wallet
            .spend(kind.stats().cost)
            .ok_or(PlacementError::InsufficientFunds)?;
        let tower = self
            .towers
            .place(kind, slot)
            .ok_or(PlacementError::Occupied)?;

        info!(tower = tower.get(), ?kind, slot = slot.get(), "tower placed");
        out_events.push(Event::MoneyChanged { balance });
        out_events.push(Event::TowerPlaced { tower, kind, slot });
        Ok(())
    }

    fn sell_tower(
        &mut self,
        tower: TowerId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), TowerActionError> {
        if self.phase != GamePhase::Building {
            return Err(TowerActionError::InvalidPhase);
        }
        let sold = self
            .towers
            .remove(tower)
            .ok_or(TowerActionError::MissingTower)?;
        let refund = sold.kind.stats().cost;
        let balance = self.wallet.add(refund);

        info!(tower = tower.get(), refund, "tower sold");
        out_events.push(Event::TowerSold {
            tower,
            slot: sold.slot,
            refund,
        });
        out_events.push(Event::MoneyChanged { balance });
        Ok(())
    }

    fn upgrade_tower(
        &mut self,
        tower: TowerId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), TowerActionError> {
        if self.phase != GamePhase::Building {
            return Err(TowerActionError::InvalidPhase);
        }
        let current = self
            .towers
            .get(tower)
            .ok_or(TowerActionError::MissingTower)?;
        let upgrade = current.kind.upgrade().ok_or(TowerActionError::NoUpgrade)?;
        let balance = self
            .wallet
            .spend(upgrade.stats().cost)
            .ok_or(TowerActionError::InsufficientFunds)?;
        let replacement = self
            .towers
            .replace(tower, upgrade)
            .ok_or(TowerActionError::MissingTower)?;

        info!(
            from = tower.get(),
            to = replacement.id.get(),
            kind = ?upgrade,
            "tower upgraded"
        );
        out_events.push(Event::MoneyChanged { balance });
        out_events.push(Event::TowerUpgraded {
            from: tower,
            to: replacement.id,
            kind: upgrade,
            slot: replacement.slot,
        });
        Ok(())
    }

    fn fire_tower(&mut self, tower: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        if self.phase != GamePhase::Combat || self.outcome.is_some() {
            debug!(tower = tower.get(), "tower attack outside combat ignored");
            return;
        }
        let now = self.clock;
        let Some(state) = self.towers.get(tower) else {
            debug!(tower = tower.get(), "attack requested by unknown tower");
            return;
        };
        if !state.ready_in(now).is_zero() {
            debug!(tower = tower.get(), "tower attack still cooling down");
            return;
        }
        let Some(enemy) = self.enemies.get(&target).filter(|enemy| enemy.is_alive()) else {
            debug!(tower = tower.get(), enemy = target.get(), "attack target is gone");
            return;
        };
        if enemy.position.distance(state.position) > state.kind.stats().attack_range {
            debug!(tower = tower.get(), enemy = target.get(), "attack target out of range");
            return;
        }

        let kind = state.kind;
        let origin = state.position;
        let directions: Vec<Vec2> = match kind.attack_pattern() {
            AttackPattern::Aimed => {
                let aim = (enemy.position - origin).normalize_or_zero();
                vec![if aim == Vec2::ZERO { Vec2::Y } else { aim }]
            }
            AttackPattern::Radial => RADIAL_DIRECTIONS.to_vec(),
        };

        for direction in directions {
            let id = ProjectileId::new(self.next_projectile_id);
            self.next_projectile_id = self.next_projectile_id.saturating_add(1);
            self.projectiles.push(Projectile::launch(
                id,
                tower,
                kind.projectile(),
                origin,
                direction,
            ));
            out_events.push(Event::ProjectileFired {
                projectile: id,
                tower,
                direction,
            });
        }

        if let Some(state) = self.towers.get_mut(tower) {
            state.last_attack = Some(now);
        }
        debug!(tower = tower.get(), enemy = target.get(), "tower fired");
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureLevel {
            layout,
            starting_money,
            starting_lives,
        } => {
            world.towers.configure_slots(&layout.slots);
            world.layout = layout;
            world.enemies.clear();
            world.projectiles.clear();
            world.wallet = Wallet::new(starting_money);
            world.wallet.set_infinite_funds(world.debug.infinite_funds);
            world.lives = Lives::new(starting_lives);
            world.lives.set_invincible(world.debug.invincible);

            info!(
                slots = world.layout.slots.len(),
                waypoints = world.layout.waypoints.len(),
                "level configured"
            );
            out_events.push(Event::MoneyChanged {
                balance: starting_money,
            });
            out_events.push(Event::LivesChanged {
                remaining: starting_lives,
            });
        }
        Command::ConfigureDebug { toggles } => {
            world.debug = toggles;
            world.wallet.set_infinite_funds(toggles.infinite_funds);
            world.lives.set_invincible(toggles.invincible);
            info!(?toggles, "debug toggles applied");
        }
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SetGamePhase { phase } => {
            if world.outcome.is_some() {
                debug!(?phase, "phase change after the game ended ignored");
                return;
            }
            if world.phase == phase {
                return;
            }
            world.phase = phase;
            info!(?phase, "game phase changed");
            out_events.push(Event::GamePhaseChanged { phase });
        }
        Command::BeginWave { wave } => {
            if world.outcome.is_some() {
                return;
            }
            world.current_wave = Some(wave);
            info!(wave = wave.number(), "wave started");
            out_events.push(Event::WaveStarted { wave });
        }
        Command::CompleteWave { wave } => {
            if world.outcome.is_some() {
                return;
            }
            info!(wave = wave.number(), "wave completed");
            out_events.push(Event::WaveCompleted { wave });
        }
        Command::DeclareVictory => {
            if world.outcome.is_some() {
                return;
            }
            world.outcome = Some(GameOutcome::Won);
            info!("every wave cleared");
            out_events.push(Event::GameWon);
        }
        Command::SpawnEnemy { kind, wave } => {
            if world.outcome.is_some() {
                return;
            }
            world.spawn_enemy(kind, wave, out_events);
        }
        Command::DamageEnemy { enemy, amount } => {
            world.damage_enemy(enemy, amount, out_events);
            world.sweep_dead_enemies();
        }
        Command::StunEnemy { enemy, duration } => world.stun_enemy(enemy, duration, out_events),
        Command::SetEnemyRoute { enemy, waypoints } => {
            if let Some(state) = world.enemies.get_mut(&enemy) {
                if let Err(error) = state.set_route(waypoints) {
                    warn!(enemy = enemy.get(), %error, "route rejected");
                }
            }
        }
        Command::SetEnemySpeed { enemy, speed } => {
            if let Some(state) = world.enemies.get_mut(&enemy) {
                state.set_speed(speed);
            }
        }
        Command::SetEnemyStopped { enemy, stopped } => {
            if let Some(state) = world.enemies.get_mut(&enemy) {
                state.set_stopped(stopped);
            }
        }
        Command::PlaceTower { kind, slot } => {
            if let Err(reason) = world.place_tower(kind, slot, out_events) {
                info!(?kind, slot = slot.get(), ?reason, "tower placement rejected");
                out_events.push(Event::TowerPlacementRejected { kind, slot, reason });
            }
        }
        Command::SellTower { tower } => {
            if let Err(reason) = world.sell_tower(tower, out_events) {
                info!(tower = tower.get(), ?reason, "tower sale rejected");
                out_events.push(Event::TowerActionRejected { tower, reason });
            }
        }
        Command::UpgradeTower { tower } => {
            if let Err(reason) = world.upgrade_tower(tower, out_events) {
                info!(tower = tower.get(), ?reason, "tower upgrade rejected");
                out_events.push(Event::TowerActionRejected { tower, reason });
            }
        }
        Command::FireTower { tower, target } => world.fire_tower(tower, target, out_events),
        Command::AddMoney { amount } => {
            let balance = world.wallet.add(amount);
            out_events.push(Event::MoneyChanged { balance });
        }
        Command::SpendMoney { amount } => {
            if let Some(balance) = world.wallet.spend(amount) {
                out_events.push(Event::MoneyChanged { balance });
            }
        }
        Command::ReduceLife => world.lose_life(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use bastion_core::{
        EnemyView, GameOutcome, GamePhase, SlotSnapshot, SlotView, TowerSnapshot, TowerView,
        WaveIndex,
    };

    use super::World;

    /// Reports the phase the game is currently in.
    #[must_use]
    pub fn game_phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Reports how the game ended, if it has.
    #[must_use]
    pub fn outcome(world: &World) -> Option<GameOutcome> {
        world.outcome
    }

    /// Total simulated time.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.clock
    }

    /// Wave most recently started, if any.
    #[must_use]
    pub fn current_wave(world: &World) -> Option<WaveIndex> {
        world.current_wave
    }

    /// Current economy balance.
    #[must_use]
    pub fn balance(world: &World) -> u32 {
        world.wallet.balance()
    }

    /// Reports whether `amount` can currently be paid.
    #[must_use]
    pub fn can_afford(world: &World, amount: u32) -> bool {
        world.wallet.can_afford(amount)
    }

    /// Lives the player has left.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives.remaining()
    }

    /// Captures a read-only view of every live enemy.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .values()
                .filter(|enemy| enemy.is_alive())
                .map(|enemy| enemy.snapshot())
                .collect(),
        )
    }

    /// Captures a read-only view of every tower, including cooldown state.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| TowerSnapshot {
                    id: tower.id,
                    kind: tower.kind,
                    slot: tower.slot,
                    position: tower.position,
                    ready_in: tower.ready_in(world.clock),
                })
                .collect(),
        )
    }

    /// Captures a read-only view of every tower slot.
    #[must_use]
    pub fn slot_view(world: &World) -> SlotView {
        SlotView::from_snapshots(
            world
                .towers
                .slots()
                .map(|slot| SlotSnapshot {
                    id: slot.id,
                    position: slot.position,
                    occupant: slot.occupant,
                })
                .collect(),
        )
    }

    /// Number of projectiles currently in flight.
    #[must_use]
    pub fn projectile_count(world: &World) -> usize {
        world.projectiles.len()
    }
}
