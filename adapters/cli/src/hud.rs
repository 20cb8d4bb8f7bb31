//! Text heads-up display bound to the world event stream.

use std::{collections::BTreeMap, fmt::Write as _};

use bastion_core::{EnemyId, Event, GamePhase, TowerKind};

/// Mirrors the player-facing state of the game as printable text.
#[derive(Debug, Default)]
pub(crate) struct Hud {
    balance: u32,
    lives: u32,
    wave: Option<u32>,
    phase: GamePhase,
    build_seconds: Option<f32>,
    health: BTreeMap<EnemyId, f32>,
    popups: Vec<String>,
    banner: Option<&'static str>,
}

impl Hud {
    pub(crate) fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::MoneyChanged { balance } => self.balance = *balance,
                Event::LivesChanged { remaining } => self.lives = *remaining,
                Event::WaveStarted { wave } => self.wave = Some(wave.number()),
                Event::GamePhaseChanged { phase } => {
                    self.phase = *phase;
                    if *phase != GamePhase::Building {
                        self.build_seconds = None;
                    }
                }
                Event::BuildCountdown { remaining } => {
                    self.build_seconds = Some(remaining.as_secs_f32());
                }
                Event::EnemySpawned { enemy, .. } => {
                    let _ = self.health.insert(*enemy, 1.0);
                }
                Event::EnemyHealthChanged {
                    enemy,
                    health,
                    max_health,
                } => {
                    if *max_health > 0.0 {
                        let _ = self.health.insert(*enemy, health / max_health);
                    }
                }
                Event::EnemyDied { enemy, bounty, .. } => {
                    let _ = self.health.remove(enemy);
                    self.popups.push(format!("+{bounty}"));
                }
                Event::EnemyEscaped { enemy } => {
                    let _ = self.health.remove(enemy);
                }
                Event::GameWon => self.banner = Some("You Win!"),
                Event::GameOver => self.banner = Some("Game Over"),
                _ => {}
            }
        }
    }

    /// Status bar with money, lives, wave and build timer.
    pub(crate) fn status_line(&self) -> String {
        let mut line = format!("$ {} | Lives: {}", self.balance, self.lives);
        match self.wave {
            Some(wave) => {
                let _ = write!(line, " | Wave: {wave}");
            }
            None => line.push_str(" | Wave: -"),
        }
        if let Some(seconds) = self.build_seconds {
            let _ = write!(line, " | Build: {seconds:.0}");
        }
        if self.phase == GamePhase::Combat && !self.health.is_empty() {
            line.push_str(" |");
            for (enemy, fraction) in &self.health {
                let _ = write!(line, " #{}:{:.0}%", enemy.get(), fraction * 100.0);
            }
        }
        line
    }

    /// Floating reward texts produced since the last call.
    pub(crate) fn take_popups(&mut self) -> Vec<String> {
        std::mem::take(&mut self.popups)
    }

    pub(crate) fn banner(&self) -> Option<&'static str> {
        self.banner
    }
}

/// Shop entry for a tower kind.
pub(crate) fn tower_card(kind: TowerKind) -> String {
    let stats = kind.stats();
    let mut card = format!(
        "{kind:?} | Cost: {} | Range: {} | Attack Speed: {}",
        stats.cost,
        stats.attack_range,
        stats.attack_cooldown.as_secs_f32()
    );
    if let Some(cost) = kind.upgrade_cost() {
        let _ = write!(card, " | Upgrade: +{cost}");
    }
    card
}
