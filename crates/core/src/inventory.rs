use crate::{Consumable, JokerKind, RngState, EMPEROR};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedJoker {
    pub kind: JokerKind,
    /// Set by a boss for the rest of the encounter.
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub joker_slots: usize,
    pub consumable_slots: usize,
    pub jokers: Vec<OwnedJoker>,
    pub consumables: Vec<Consumable>,
    #[serde(default)]
    pub usage_history: Vec<Consumable>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("no joker slots")]
    NoJokerSlots,
    #[error("no consumable slots")]
    NoConsumableSlots,
    #[error("joker already owned: {0}")]
    DuplicateJoker(JokerKind),
    #[error("invalid joker index")]
    InvalidJokerIndex,
    #[error("invalid consumable index")]
    InvalidConsumableIndex,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self::with_slots(5, 5)
    }

    pub fn with_slots(joker_slots: usize, consumable_slots: usize) -> Self {
        Self {
            joker_slots,
            consumable_slots,
            jokers: Vec::new(),
            consumables: Vec::new(),
            usage_history: Vec::new(),
        }
    }

    pub fn owns(&self, kind: JokerKind) -> bool {
        self.jokers.iter().any(|joker| joker.kind == kind)
    }

    pub fn add_joker(&mut self, kind: JokerKind) -> Result<(), InventoryError> {
        if self.jokers.len() >= self.joker_slots {
            return Err(InventoryError::NoJokerSlots);
        }
        if self.owns(kind) {
            return Err(InventoryError::DuplicateJoker(kind));
        }
        self.jokers.push(OwnedJoker {
            kind,
            disabled: false,
        });
        Ok(())
    }

    pub fn remove_joker(&mut self, index: usize) -> Result<OwnedJoker, InventoryError> {
        if index >= self.jokers.len() {
            return Err(InventoryError::InvalidJokerIndex);
        }
        Ok(self.jokers.remove(index))
    }

    /// Enabled jokers in acquisition order.
    pub fn active_jokers(&self) -> impl Iterator<Item = JokerKind> + '_ {
        self.jokers
            .iter()
            .filter(|joker| !joker.disabled)
            .map(|joker| joker.kind)
    }

    pub fn disable_random_joker(&mut self, rng: &mut RngState) -> Option<JokerKind> {
        let enabled: Vec<usize> = (0..self.jokers.len())
            .filter(|idx| !self.jokers[*idx].disabled)
            .collect();
        let pick = enabled[rng.pick_index(enabled.len())?];
        self.jokers[pick].disabled = true;
        Some(self.jokers[pick].kind)
    }

    pub fn enable_all(&mut self) {
        for joker in &mut self.jokers {
            joker.disabled = false;
        }
    }

    pub fn add_consumable(&mut self, consumable: Consumable) -> Result<(), InventoryError> {
        if self.consumables.len() >= self.consumable_slots {
            return Err(InventoryError::NoConsumableSlots);
        }
        self.consumables.push(consumable);
        Ok(())
    }

    pub fn holds(&self, name: &str) -> bool {
        self.consumables.iter().any(|held| held.name() == name)
    }

    pub fn take_consumable(&mut self, index: usize) -> Result<Consumable, InventoryError> {
        if index >= self.consumables.len() {
            return Err(InventoryError::InvalidConsumableIndex);
        }
        Ok(self.consumables.remove(index))
    }

    /// Remembers a used consumable for The Fool. The Fool itself is never kept.
    pub fn record_use(&mut self, consumable: &Consumable) {
        if consumable.is_fool() {
            return;
        }
        self.usage_history.push(consumable.clone());
        if self.usage_history.len() > HISTORY_LIMIT {
            let excess = self.usage_history.len() - HISTORY_LIMIT;
            self.usage_history.drain(..excess);
        }
    }

    /// Adds a random joker that is not owned yet.
    pub fn create_random_joker(&mut self, rng: &mut RngState) -> Option<JokerKind> {
        if self.jokers.len() >= self.joker_slots {
            return None;
        }
        let missing: Vec<JokerKind> = JokerKind::ALL
            .iter()
            .copied()
            .filter(|kind| !self.owns(*kind))
            .collect();
        let kind = missing[rng.pick_index(missing.len())?];
        self.add_joker(kind).ok()?;
        Some(kind)
    }

    /// Adds up to `count` distinct tarots from `roster`, skipping the Emperor
    /// and anything already held.
    pub fn create_random_tarots(
        &mut self,
        roster: &[String],
        count: usize,
        rng: &mut RngState,
    ) -> Vec<String> {
        let free = self.consumable_slots.saturating_sub(self.consumables.len());
        let mut pool: Vec<&String> = roster
            .iter()
            .filter(|name| name.as_str() != EMPEROR && !self.holds(name))
            .collect();
        let mut created = Vec::new();
        for _ in 0..count.min(free) {
            let Some(idx) = rng.pick_index(pool.len()) else {
                break;
            };
            created.push(pool.remove(idx).clone());
        }
        for name in &created {
            self.consumables.push(Consumable::Tarot(name.clone()));
        }
        created
    }

    /// Re-adds the most recently used consumable that is not currently held.
    pub fn recreate_last(&mut self) -> Option<Consumable> {
        if self.consumables.len() >= self.consumable_slots {
            return None;
        }
        let last = self
            .usage_history
            .iter()
            .rev()
            .find(|used| !used.is_fool() && !self.holds(used.name()))?
            .clone();
        self.consumables.push(last.clone());
        Some(last)
    }
}
