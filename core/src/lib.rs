#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bastion engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command
//! batches.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Phase of the build/combat cycle the game is currently in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// The game has not started its first build phase yet.
    #[default]
    None,
    /// Towers may be placed, sold and upgraded; no combat occurs.
    Building,
    /// A wave is being fought; building is disabled.
    Combat,
}

/// Final result of a game once it has ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// Every configured wave was cleared.
    Won,
    /// The player ran out of lives.
    Lost,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Installs the level layout together with the starting resources.
    ConfigureLevel {
        /// Spawn point, enemy route and tower slots of the level.
        layout: LevelLayout,
        /// Balance the economy starts with.
        starting_money: u32,
        /// Number of lives the player starts with.
        starting_lives: u32,
    },
    /// Applies designer debug toggles.
    ConfigureDebug {
        /// Toggles to activate.
        toggles: DebugToggles,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the world transition to the provided game phase.
    SetGamePhase {
        /// Phase the world should activate.
        phase: GamePhase,
    },
    /// Announces that the spawner began sequencing a wave.
    BeginWave {
        /// Zero-based index of the wave.
        wave: WaveIndex,
    },
    /// Announces that every enemy of a wave has been dealt with.
    CompleteWave {
        /// Zero-based index of the completed wave.
        wave: WaveIndex,
    },
    /// Announces that the final wave has been cleared.
    DeclareVictory,
    /// Requests that an enemy be created at the level spawn point.
    SpawnEnemy {
        /// Variant of the enemy to create.
        kind: EnemyKind,
        /// Wave the enemy belongs to.
        wave: WaveIndex,
    },
    /// Applies damage to an enemy.
    DamageEnemy {
        /// Identifier of the enemy receiving damage.
        enemy: EnemyId,
        /// Amount of health to remove.
        amount: f32,
    },
    /// Suspends an enemy's movement for the provided duration.
    StunEnemy {
        /// Identifier of the enemy to stun.
        enemy: EnemyId,
        /// Length of the stun.
        duration: Duration,
    },
    /// Replaces the route an enemy follows.
    SetEnemyRoute {
        /// Identifier of the enemy to reroute.
        enemy: EnemyId,
        /// Ordered waypoints ending at the defended exit.
        waypoints: Vec<Vec2>,
    },
    /// Overrides the travel speed of an enemy.
    SetEnemySpeed {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// New speed in world units per second.
        speed: f32,
    },
    /// Halts or resumes an enemy's movement.
    SetEnemyStopped {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Whether the enemy should stand still.
        stopped: bool,
    },
    /// Requests purchase and placement of a tower into a slot.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Slot that should hold the tower.
        slot: SlotId,
    },
    /// Requests that a tower be sold for a refund.
    SellTower {
        /// Identifier of the tower to sell.
        tower: TowerId,
    },
    /// Requests that a tower be replaced by its upgraded variant.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
    },
    /// Requests that a tower attack the provided enemy.
    FireTower {
        /// Identifier of the attacking tower.
        tower: TowerId,
        /// Enemy the tower is aiming at.
        target: EnemyId,
    },
    /// Credits money to the economy.
    AddMoney {
        /// Amount to credit.
        amount: u32,
    },
    /// Deducts money from the economy when affordable.
    SpendMoney {
        /// Amount to deduct.
        amount: u32,
    },
    /// Removes a single life from the player.
    ReduceLife,
}

/// Events broadcast by the world and systems after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the game entered a new phase.
    GamePhaseChanged {
        /// Phase that became active.
        phase: GamePhase,
    },
    /// Reports the remaining build time after each tick of the countdown.
    BuildCountdown {
        /// Time left before combat begins.
        remaining: Duration,
    },
    /// Announces that a wave started spawning.
    WaveStarted {
        /// Zero-based index of the wave.
        wave: WaveIndex,
    },
    /// Announces that a wave was fully cleared while waves remain.
    WaveCompleted {
        /// Zero-based index of the wave.
        wave: WaveIndex,
    },
    /// Announces that the final wave was cleared.
    GameWon,
    /// Announces that the player ran out of lives.
    GameOver,
    /// Confirms that an enemy was created.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Variant of the enemy.
        kind: EnemyKind,
        /// Wave the enemy belongs to.
        wave: WaveIndex,
        /// Position the enemy appeared at.
        position: Vec2,
    },
    /// Reports the health of an enemy after it took damage.
    EnemyHealthChanged {
        /// Identifier of the damaged enemy.
        enemy: EnemyId,
        /// Remaining health, never below zero.
        health: f32,
        /// Maximum health of the enemy.
        max_health: f32,
    },
    /// Confirms that an enemy was stunned.
    EnemyStunned {
        /// Identifier of the stunned enemy.
        enemy: EnemyId,
        /// Length of the stun.
        duration: Duration,
    },
    /// Confirms that a stunned enemy resumed moving.
    EnemyRecovered {
        /// Identifier of the enemy.
        enemy: EnemyId,
    },
    /// Confirms that an enemy died and paid out its bounty.
    EnemyDied {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Money credited for the kill.
        bounty: u32,
        /// Position the enemy died at.
        position: Vec2,
    },
    /// Reports that an enemy reached the end of its route.
    EnemyEscaped {
        /// Identifier of the enemy.
        enemy: EnemyId,
    },
    /// Confirms that a tower was placed into a slot.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Slot that now holds the tower.
        slot: SlotId,
    },
    /// Confirms that a tower was sold.
    TowerSold {
        /// Identifier of the sold tower.
        tower: TowerId,
        /// Slot freed by the sale.
        slot: SlotId,
        /// Money credited for the sale.
        refund: u32,
    },
    /// Confirms that a tower was replaced by its upgraded variant.
    TowerUpgraded {
        /// Identifier of the replaced tower.
        from: TowerId,
        /// Identifier of the upgraded tower.
        to: TowerId,
        /// Kind of the upgraded tower.
        kind: TowerKind,
        /// Slot holding the upgraded tower.
        slot: SlotId,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Slot provided in the placement request.
        slot: SlotId,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that a sale or upgrade request was rejected.
    TowerActionRejected {
        /// Identifier of the tower targeted by the request.
        tower: TowerId,
        /// Specific reason the request failed.
        reason: TowerActionError,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that launched it.
        tower: TowerId,
        /// Normalised direction of travel.
        direction: Vec2,
    },
    /// Reports that a projectile struck an enemy and was consumed.
    ProjectileHit {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Enemy that was struck first.
        enemy: EnemyId,
    },
    /// Reports that a projectile ran out of lifetime without hitting.
    ProjectileExpired {
        /// Identifier of the projectile.
        projectile: ProjectileId,
    },
    /// Reports the economy balance after it changed.
    MoneyChanged {
        /// New balance.
        balance: u32,
    },
    /// Reports the player's lives after they changed.
    LivesChanged {
        /// Lives left.
        remaining: u32,
    },
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index of a tower slot within the level layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(u32);

impl SlotId {
    /// Creates a new slot identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the slot identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Zero-based position of a wave within the configured wave list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaveIndex(u32);

impl WaveIndex {
    /// Creates a new wave index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the zero-based index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// One-based wave number as shown to players.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.0 + 1
    }
}

/// Base statistics shared by every enemy of a kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Health the enemy spawns with.
    pub max_health: f32,
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Money paid out when the enemy is killed.
    pub bounty: u32,
}

/// Enemy variants that waves are composed of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Balanced foot soldier.
    Grunt,
    /// Fragile but fast.
    Runner,
    /// Slow, heavily armoured and immune to stuns.
    Tank,
}

impl EnemyKind {
    /// Returns the stat block for the kind.
    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        match self {
            Self::Grunt => EnemyStats {
                max_health: 100.0,
                speed: 2.0,
                bounty: 100,
            },
            Self::Runner => EnemyStats {
                max_health: 50.0,
                speed: 4.0,
                bounty: 85,
            },
            Self::Tank => EnemyStats {
                max_health: 200.0,
                speed: 1.0,
                bounty: 150,
            },
        }
    }

    /// Reports whether stun effects apply to the kind.
    #[must_use]
    pub const fn stunnable(self) -> bool {
        !matches!(self, Self::Tank)
    }
}

/// Base statistics shared by every tower of a kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Radius within which the tower acquires targets.
    pub attack_range: f32,
    /// Minimum time between two attacks.
    pub attack_cooldown: Duration,
    /// Price paid to build the tower, also refunded when selling it.
    pub cost: u32,
}

/// How a tower releases projectiles when it attacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttackPattern {
    /// A single projectile aimed at the target.
    Aimed,
    /// One projectile along each of [`RADIAL_DIRECTIONS`], ignoring the target's bearing.
    Radial,
}

/// Fixed launch directions used by [`AttackPattern::Radial`].
pub const RADIAL_DIRECTIONS: [Vec2; 4] = [Vec2::Y, Vec2::NEG_Y, Vec2::NEG_X, Vec2::X];

/// Effect a projectile applies when it strikes an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProjectileKind {
    /// Damages the struck enemy.
    Standard {
        /// Damage dealt on hit.
        damage: f32,
    },
    /// Stuns and damages the struck enemy, then arcs to nearby enemies.
    Chain {
        /// Damage dealt to every affected enemy.
        damage: f32,
        /// Stun applied to every affected enemy.
        stun: Duration,
        /// Radius around the struck enemy searched for further victims.
        chain_range: f32,
        /// Maximum number of additional enemies affected.
        chain_count: u32,
    },
}

/// Types of towers that can be constructed in slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Entry-level single-target tower.
    Archer,
    /// Upgraded archer with longer range and faster attacks.
    Marksman,
    /// Fires in four fixed directions at once.
    Bombard,
    /// Fires chain lightning that stuns.
    Tesla,
}

impl TowerKind {
    /// Every tower kind in catalogue order.
    pub const ALL: [TowerKind; 4] = [Self::Archer, Self::Marksman, Self::Bombard, Self::Tesla];

    /// Returns the stat block for the kind.
    #[must_use]
    pub const fn stats(self) -> TowerStats {
        match self {
            Self::Archer => TowerStats {
                attack_range: 10.0,
                attack_cooldown: Duration::from_secs(2),
                cost: 100,
            },
            Self::Marksman => TowerStats {
                attack_range: 12.0,
                attack_cooldown: Duration::from_secs(1),
                cost: 150,
            },
            Self::Bombard => TowerStats {
                attack_range: 8.0,
                attack_cooldown: Duration::from_secs(3),
                cost: 200,
            },
            Self::Tesla => TowerStats {
                attack_range: 9.0,
                attack_cooldown: Duration::from_millis(2_500),
                cost: 250,
            },
        }
    }

    /// Kind this tower turns into when upgraded, if any.
    #[must_use]
    pub const fn upgrade(self) -> Option<TowerKind> {
        match self {
            Self::Archer => Some(Self::Marksman),
            Self::Marksman | Self::Bombard | Self::Tesla => None,
        }
    }

    /// Price of upgrading the tower, if it has an upgrade.
    #[must_use]
    pub const fn upgrade_cost(self) -> Option<u32> {
        match self.upgrade() {
            Some(kind) => Some(kind.stats().cost),
            None => None,
        }
    }

    /// Attack pattern used by the kind.
    #[must_use]
    pub const fn attack_pattern(self) -> AttackPattern {
        match self {
            Self::Bombard => AttackPattern::Radial,
            Self::Archer | Self::Marksman | Self::Tesla => AttackPattern::Aimed,
        }
    }

    /// Projectile released by the kind.
    #[must_use]
    pub const fn projectile(self) -> ProjectileKind {
        match self {
            Self::Archer => ProjectileKind::Standard { damage: 10.0 },
            Self::Marksman => ProjectileKind::Standard { damage: 15.0 },
            Self::Bombard => ProjectileKind::Standard { damage: 20.0 },
            Self::Tesla => ProjectileKind::Chain {
                damage: 8.0,
                stun: Duration::from_secs(1),
                chain_range: 5.0,
                chain_count: 2,
            },
        }
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The game is not in the building phase, so placement is disabled.
    InvalidPhase,
    /// No slot with the provided identifier exists.
    MissingSlot,
    /// The slot already holds a tower.
    Occupied,
    /// The player cannot pay for the tower.
    InsufficientFunds,
}

/// Reasons a sale or upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerActionError {
    /// The game is not in the building phase, so the action is disabled.
    InvalidPhase,
    /// No tower with the provided identifier exists.
    MissingTower,
    /// The tower kind has no upgrade.
    NoUpgrade,
    /// The player cannot pay for the upgrade.
    InsufficientFunds,
}

/// A group of identical enemies spawned one after another.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySet {
    /// Variant of every enemy in the set.
    pub kind: EnemyKind,
    /// Number of enemies in the set.
    pub count: u32,
    /// Delay between two consecutive enemies of the set.
    #[serde(with = "seconds", default = "default_spawn_delay")]
    pub spawn_delay: Duration,
}

/// Ordered enemy sets that make up one wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    /// Sets spawned in order.
    pub sets: Vec<EnemySet>,
    /// Pause between the end of one set and the start of the next.
    #[serde(with = "seconds", default = "default_set_cooldown")]
    pub set_cooldown: Duration,
}

impl WaveConfig {
    /// Total number of enemies spawned by the wave.
    #[must_use]
    pub fn enemy_count(&self) -> u32 {
        self.sets.iter().map(|set| set.count).sum()
    }
}

fn default_spawn_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_set_cooldown() -> Duration {
    Duration::from_secs(5)
}

/// Geometry of a level: where enemies enter, the path they walk and where
/// towers may stand.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    /// Point enemies appear at.
    pub spawn: Vec2,
    /// Ordered waypoints; the last one is the defended exit.
    pub waypoints: Vec<Vec2>,
    /// Tower slot positions, indexed by [`SlotId`].
    pub slots: Vec<Vec2>,
}

/// Designer toggles that bend the rules for playtesting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugToggles {
    /// Every purchase is affordable.
    pub infinite_funds: bool,
    /// Escaping enemies do not cost lives.
    pub invincible: bool,
    /// Any damage kills outright.
    pub instant_kill: bool,
    /// Enemies ignore all damage.
    pub enemies_immune: bool,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Variant of the enemy.
    pub kind: EnemyKind,
    /// Current position.
    pub position: Vec2,
    /// Remaining health.
    pub health: f32,
    /// Health the enemy spawned with.
    pub max_health: f32,
    /// Whether the enemy is currently stunned.
    pub stunned: bool,
    /// Index of the route waypoint the enemy is walking toward.
    pub waypoint: usize,
}

impl EnemySnapshot {
    /// Remaining health as a fraction of the maximum.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single enemy.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of live enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a single tower used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Slot holding the tower.
    pub slot: SlotId,
    /// Position of the tower.
    pub position: Vec2,
    /// Time until the tower may attack again; zero when ready.
    pub ready_in: Duration,
}

/// Read-only snapshot describing all towers.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single tower.
    #[must_use]
    pub fn get(&self, id: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }
}

/// Immutable representation of a tower slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotSnapshot {
    /// Identifier of the slot.
    pub id: SlotId,
    /// Position of the slot.
    pub position: Vec2,
    /// Tower standing in the slot, if any.
    pub occupant: Option<TowerId>,
}

/// Read-only snapshot describing every tower slot.
#[derive(Clone, Debug, Default)]
pub struct SlotView {
    snapshots: Vec<SlotSnapshot>,
}

impl SlotView {
    /// Creates a new slot view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<SlotSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the slots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &SlotSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a single slot.
    #[must_use]
    pub fn get(&self, id: SlotId) -> Option<&SlotSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }
}

/// Target assignment produced by the tower targeting system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
    /// Distance between the tower and the enemy.
    pub distance: f32,
}

/// Serde helpers that store a [`Duration`] as fractional seconds.
pub mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    /// Writes the duration as an `f64` number of seconds.
    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(value.as_secs_f64())
    }

    /// Reads a non-negative `f64` number of seconds.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
