use crate::{level_kind, HandKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HandStats {
    pub chips: i64,
    pub mult: f64,
    pub level: u32,
}

impl HandStats {
    pub fn new(chips: i64, mult: f64) -> Self {
        Self {
            chips,
            mult,
            level: 1,
        }
    }
}

/// Per-category base stats. Royal Flush and Flush House read the Straight
/// Flush row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandLevelTable {
    rows: HashMap<HandKind, HandStats>,
}

impl Default for HandLevelTable {
    fn default() -> Self {
        Self::from_rows(HandKind::LEVELED.iter().map(|kind| (*kind, default_hand_base(*kind))))
    }
}

impl HandLevelTable {
    pub fn empty() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }

    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (HandKind, HandStats)>,
    {
        let rows = rows
            .into_iter()
            .map(|(kind, stats)| (level_kind(kind), stats))
            .collect();
        Self { rows }
    }

    /// Base stats for a category; a missing row scores as 0 chips x 1 mult.
    pub fn stats(&self, kind: HandKind) -> HandStats {
        self.rows.get(&level_kind(kind)).copied().unwrap_or(HandStats {
            chips: 0,
            mult: 1.0,
            level: 0,
        })
    }

    pub fn level(&self, kind: HandKind) -> u32 {
        self.stats(kind).level
    }

    pub fn upgrade(&mut self, kind: HandKind, chips: i64, mult: f64) -> HandStats {
        let row = self
            .rows
            .entry(level_kind(kind))
            .or_insert(HandStats {
                chips: 0,
                mult: 1.0,
                level: 0,
            });
        row.chips += chips;
        row.mult += mult;
        row.level += 1;
        *row
    }

    pub fn apply_planet(&mut self, planet: Planet) {
        let (chips, mult) = planet.bonus();
        match planet.target() {
            Some(kind) => {
                self.upgrade(kind, chips, mult);
            }
            None => {
                for kind in HandKind::LEVELED {
                    self.upgrade(kind, chips, mult);
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (HandKind, HandStats)> + '_ {
        HandKind::LEVELED
            .iter()
            .filter_map(|kind| self.rows.get(kind).map(|stats| (*kind, *stats)))
    }
}

pub fn default_hand_base(kind: HandKind) -> HandStats {
    match level_kind(kind) {
        HandKind::HighCard => HandStats::new(5, 1.0),
        HandKind::Pair => HandStats::new(10, 2.0),
        HandKind::TwoPair => HandStats::new(20, 2.0),
        HandKind::Trips => HandStats::new(30, 3.0),
        HandKind::Straight => HandStats::new(30, 4.0),
        HandKind::Flush => HandStats::new(35, 4.0),
        HandKind::FullHouse => HandStats::new(40, 4.0),
        HandKind::Quads => HandStats::new(60, 7.0),
        _ => HandStats::new(100, 8.0),
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Planet {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Sun,
}

impl Planet {
    pub const ALL: [Planet; 9] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Earth,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
        Planet::Sun,
    ];

    /// The upgraded category, `None` for the Sun which upgrades all of them.
    pub fn target(self) -> Option<HandKind> {
        match self {
            Planet::Mercury => Some(HandKind::HighCard),
            Planet::Venus => Some(HandKind::Pair),
            Planet::Earth => Some(HandKind::TwoPair),
            Planet::Mars => Some(HandKind::Trips),
            Planet::Jupiter => Some(HandKind::Straight),
            Planet::Saturn => Some(HandKind::Flush),
            Planet::Uranus => Some(HandKind::FullHouse),
            Planet::Neptune => Some(HandKind::Quads),
            Planet::Sun => None,
        }
    }

    pub fn bonus(self) -> (i64, f64) {
        match self {
            Planet::Mercury => (10, 1.0),
            Planet::Venus => (15, 1.0),
            Planet::Earth => (15, 2.0),
            Planet::Mars => (25, 2.0),
            Planet::Jupiter => (25, 3.0),
            Planet::Saturn => (30, 3.0),
            Planet::Uranus => (35, 3.0),
            Planet::Neptune => (40, 4.0),
            Planet::Sun => (30, 2.0),
        }
    }

    pub fn price(self) -> i64 {
        match self {
            Planet::Mercury | Planet::Venus | Planet::Earth | Planet::Mars => 2,
            Planet::Jupiter | Planet::Saturn | Planet::Uranus | Planet::Neptune => 3,
            Planet::Sun => 12,
        }
    }

    pub fn sell_price(self) -> i64 {
        self.price() * 6 / 10
    }

    pub fn name(self) -> &'static str {
        match self {
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Earth => "Earth",
            Planet::Mars => "Mars",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
            Planet::Sun => "Sun",
        }
    }

    pub fn from_name(value: &str) -> Option<Planet> {
        Planet::ALL
            .iter()
            .copied()
            .find(|planet| planet.name().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
