use crate::{Card, CardId, Planet};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Consumable {
    Planet(Planet),
    Tarot(String),
}

impl Consumable {
    pub fn name(&self) -> &str {
        match self {
            Consumable::Planet(planet) => planet.name(),
            Consumable::Tarot(name) => name,
        }
    }

    pub fn sell_price(&self) -> i64 {
        match self {
            Consumable::Planet(planet) => planet.sell_price(),
            Consumable::Tarot(_) => TAROT_PRICE * 6 / 10,
        }
    }

    pub fn is_fool(&self) -> bool {
        matches!(self, Consumable::Tarot(name) if name == FOOL)
    }
}

impl fmt::Display for Consumable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub const TAROT_PRICE: i64 = 6;
pub const FOOL: &str = "The Fool";
pub const EMPEROR: &str = "The Emperor";
pub const JUDGMENT: &str = "Judgment";

/// Follow-up the session resolves against the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialEffect {
    CreateJoker,
    CreateConsumables(u32),
    RecreateLast,
}

/// What a consumable did to the cards it was used on. `mutated` entries are
/// matched to live cards by id; `created` cards get fresh ids on arrival.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsumableOutcome {
    #[serde(default)]
    pub mutated: Vec<Card>,
    #[serde(default)]
    pub created: Vec<Card>,
    #[serde(default)]
    pub removed: Vec<CardId>,
    #[serde(default)]
    pub special: Option<SpecialEffect>,
}

impl ConsumableOutcome {
    pub fn special(effect: SpecialEffect) -> Self {
        Self {
            special: Some(effect),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mutated.is_empty()
            && self.created.is_empty()
            && self.removed.is_empty()
            && self.special.is_none()
    }
}

/// Tarot behaviour lives outside the core; the session hands each use to a
/// resolver and applies what comes back.
pub trait ConsumableResolver {
    fn apply(&mut self, name: &str, targets: &[Card]) -> ConsumableOutcome;
}

/// Resolves the tarots whose only effect is an inventory follow-up.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinTarots;

impl ConsumableResolver for BuiltinTarots {
    fn apply(&mut self, name: &str, _targets: &[Card]) -> ConsumableOutcome {
        match name {
            JUDGMENT => ConsumableOutcome::special(SpecialEffect::CreateJoker),
            EMPEROR => ConsumableOutcome::special(SpecialEffect::CreateConsumables(2)),
            FOOL => ConsumableOutcome::special(SpecialEffect::RecreateLast),
            _ => ConsumableOutcome::default(),
        }
    }
}
