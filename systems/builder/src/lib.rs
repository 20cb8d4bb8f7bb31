#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure building-phase system responsible for emitting tower purchase, sale
//! and upgrade commands.

use bastion_core::{Command, Event, GamePhase, SlotId, SlotView, TowerId, TowerKind, TowerView};
use tracing::debug;

/// Declarative placement preview describing a potential tower construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementPreview {
    /// Kind of tower proposed for placement.
    pub kind: TowerKind,
    /// Slot the tower would occupy.
    pub slot: SlotId,
    /// Indicates whether the preview represents a valid placement location.
    pub placeable: bool,
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Tower kind chosen from the shop on this frame.
    pub select_kind: Option<TowerKind>,
    /// Slot clicked to place the selected kind on this frame.
    pub confirm_slot: Option<SlotId>,
    /// Existing tower clicked for inspection on this frame.
    pub inspect_tower: Option<TowerId>,
    /// Indicates whether the player pressed the sell button on this frame.
    pub sell_action: bool,
    /// Indicates whether the player pressed the upgrade button on this frame.
    pub upgrade_action: bool,
}

/// Enablement of the sell and upgrade buttons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlState {
    /// Whether selling the inspected tower is currently possible.
    pub sell_enabled: bool,
    /// Whether upgrading the inspected tower is currently possible.
    pub upgrade_enabled: bool,
}

/// Building-phase system that translates player input into tower commands.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    phase: GamePhase,
    selected: Option<TowerKind>,
    inspected: Option<TowerId>,
}

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: GamePhase::None,
            selected: None,
            inspected: None,
        }
    }

    /// Tower kind currently selected for purchase.
    #[must_use]
    pub fn selected_kind(&self) -> Option<TowerKind> {
        self.selected
    }

    /// Tower currently inspected for sale or upgrade.
    #[must_use]
    pub fn inspected_tower(&self) -> Option<TowerId> {
        self.inspected
    }

    /// Consumes world events and adapter-derived input to emit builder commands.
    pub fn handle(&mut self, events: &[Event], input: BuilderInput, out: &mut Vec<Command>) {
        for event in events {
            self.observe(event);
        }

        if self.phase != GamePhase::Building {
            return;
        }

        if let Some(kind) = input.select_kind {
            self.selected = Some(kind);
        }
        if let Some(tower) = input.inspect_tower {
            self.inspected = Some(tower);
        }

        if let Some(slot) = input.confirm_slot {
            match self.selected {
                Some(kind) => out.push(Command::PlaceTower { kind, slot }),
                None => debug!(slot = slot.get(), "no tower selected for placement"),
            }
        }

        if let Some(tower) = self.inspected {
            if input.sell_action {
                out.push(Command::SellTower { tower });
            } else if input.upgrade_action {
                out.push(Command::UpgradeTower { tower });
            }
        }
    }

    /// Describes what confirming `slot` would do with the current selection.
    #[must_use]
    pub fn preview(
        &self,
        slots: &SlotView,
        slot: SlotId,
        can_afford: impl Fn(u32) -> bool,
    ) -> Option<PlacementPreview> {
        let kind = self.selected?;
        let state = slots.get(slot)?;
        Some(PlacementPreview {
            kind,
            slot,
            placeable: self.phase == GamePhase::Building
                && state.occupant.is_none()
                && can_afford(kind.stats().cost),
        })
    }

    /// Reports which tower actions are currently available.
    #[must_use]
    pub fn controls(&self, towers: &TowerView, can_afford: impl Fn(u32) -> bool) -> ControlState {
        if self.phase != GamePhase::Building {
            return ControlState::default();
        }
        let Some(tower) = self.inspected.and_then(|id| towers.get(id)) else {
            return ControlState::default();
        };

        ControlState {
            sell_enabled: true,
            upgrade_enabled: tower.kind.upgrade_cost().is_some_and(can_afford),
        }
    }

    fn observe(&mut self, event: &Event) {
        match event {
            Event::GamePhaseChanged { phase } => {
                self.phase = *phase;
                if *phase != GamePhase::Building {
                    self.selected = None;
                }
            }
            Event::TowerPlaced { .. } => self.selected = None,
            Event::TowerUpgraded { from, to, .. } => {
                if self.inspected == Some(*from) {
                    self.inspected = Some(*to);
                }
            }
            Event::TowerSold { tower, .. } => {
                if self.inspected == Some(*tower) {
                    self.inspected = None;
                }
            }
            _ => {}
        }
    }
}
