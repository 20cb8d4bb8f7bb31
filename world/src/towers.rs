//! Authoritative tower and slot state management utilities.

use std::{collections::BTreeMap, time::Duration};

use bastion_core::{SlotId, TowerId, TowerKind};
use glam::Vec2;

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Slot holding the tower.
    pub(crate) slot: SlotId,
    /// Position copied from the slot at placement time.
    pub(crate) position: Vec2,
    /// Simulation time of the most recent attack.
    pub(crate) last_attack: Option<Duration>,
}

impl TowerState {
    /// Time left before the tower may attack again at `now`.
    pub(crate) fn ready_in(&self, now: Duration) -> Duration {
        match self.last_attack {
            Some(last) => (last + self.kind.stats().attack_cooldown).saturating_sub(now),
            None => Duration::ZERO,
        }
    }
}

/// A location where a single tower may stand.
#[derive(Clone, Debug)]
pub(crate) struct SlotState {
    pub(crate) id: SlotId,
    pub(crate) position: Vec2,
    pub(crate) occupant: Option<TowerId>,
}

/// Registry that stores slots and towers and manages identifier allocation.
///
/// Every mutation updates the tower and its slot together so the slot's
/// occupant and the tower's slot always agree.
#[derive(Debug, Default)]
pub(crate) struct TowerRegistry {
    slots: Vec<SlotState>,
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: u32,
}

impl TowerRegistry {
    /// Creates an empty registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Replaces all slots, discarding any towers that stood in the old ones.
    pub(crate) fn configure_slots(&mut self, positions: &[Vec2]) {
        self.entries.clear();
        self.slots = positions
            .iter()
            .enumerate()
            .map(|(index, position)| SlotState {
                id: SlotId::new(index as u32),
                position: *position,
                occupant: None,
            })
            .collect();
    }

    pub(crate) fn slot(&self, id: SlotId) -> Option<&SlotState> {
        self.slots.get(id.get() as usize)
    }

    pub(crate) fn slots(&self) -> impl Iterator<Item = &SlotState> {
        self.slots.iter()
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    /// Places a tower into a free slot, returning its new identifier.
    ///
    /// Returns `None` when the slot is missing or occupied.
    pub(crate) fn place(&mut self, kind: TowerKind, slot: SlotId) -> Option<TowerId> {
        let id = TowerId::new(self.next_tower_id);
        let state = self.slots.get_mut(slot.get() as usize)?;
        if state.occupant.is_some() {
            return None;
        }

        state.occupant = Some(id);
        let position = state.position;
        self.next_tower_id = self.next_tower_id.saturating_add(1);
        let _ = self.entries.insert(
            id,
            TowerState {
                id,
                kind,
                slot,
                position,
                last_attack: None,
            },
        );
        Some(id)
    }

    /// Removes a tower and frees its slot.
    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        let tower = self.entries.remove(&id)?;
        if let Some(slot) = self.slots.get_mut(tower.slot.get() as usize) {
            if slot.occupant == Some(id) {
                slot.occupant = None;
            }
        }
        Some(tower)
    }

    /// Replaces a tower with a fresh instance of `kind` in the same slot.
    ///
    /// The replacement receives a new identifier and an idle cooldown.
    pub(crate) fn replace(&mut self, id: TowerId, kind: TowerKind) -> Option<TowerState> {
        let previous = self.remove(id)?;
        let replacement = self.place(kind, previous.slot)?;
        self.entries.get(&replacement).cloned()
    }
}
