use crate::{Card, Rank, Suit};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HandKind {
    HighCard,
    Pair,
    TwoPair,
    Trips,
    Straight,
    Flush,
    FullHouse,
    Quads,
    StraightFlush,
    RoyalFlush,
    FlushHouse,
}

impl HandKind {
    pub const ALL: [HandKind; 11] = [
        HandKind::HighCard,
        HandKind::Pair,
        HandKind::TwoPair,
        HandKind::Trips,
        HandKind::Straight,
        HandKind::Flush,
        HandKind::FullHouse,
        HandKind::Quads,
        HandKind::StraightFlush,
        HandKind::RoyalFlush,
        HandKind::FlushHouse,
    ];

    /// Categories with their own row in the level table.
    pub const LEVELED: [HandKind; 9] = [
        HandKind::HighCard,
        HandKind::Pair,
        HandKind::TwoPair,
        HandKind::Trips,
        HandKind::Straight,
        HandKind::Flush,
        HandKind::FullHouse,
        HandKind::Quads,
        HandKind::StraightFlush,
    ];

    /// Position in the fixed total order. Royal Flush and Flush House share the
    /// Straight Flush tier.
    pub fn tier(self) -> u8 {
        match self {
            HandKind::HighCard => 1,
            HandKind::Pair => 2,
            HandKind::TwoPair => 3,
            HandKind::Trips => 4,
            HandKind::Straight => 5,
            HandKind::Flush => 6,
            HandKind::FullHouse => 7,
            HandKind::Quads => 8,
            HandKind::StraightFlush | HandKind::RoyalFlush | HandKind::FlushHouse => 9,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            HandKind::HighCard => "high_card",
            HandKind::Pair => "pair",
            HandKind::TwoPair => "two_pair",
            HandKind::Trips => "trips",
            HandKind::Straight => "straight",
            HandKind::Flush => "flush",
            HandKind::FullHouse => "full_house",
            HandKind::Quads => "quads",
            HandKind::StraightFlush => "straight_flush",
            HandKind::RoyalFlush => "royal_flush",
            HandKind::FlushHouse => "flush_house",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            HandKind::HighCard => "High Card",
            HandKind::Pair => "One Pair",
            HandKind::TwoPair => "Two Pair",
            HandKind::Trips => "Three of a Kind",
            HandKind::Straight => "Straight",
            HandKind::Flush => "Flush",
            HandKind::FullHouse => "Full House",
            HandKind::Quads => "Four of a Kind",
            HandKind::StraightFlush => "Straight Flush",
            HandKind::RoyalFlush => "Royal Flush",
            HandKind::FlushHouse => "Flush House",
        }
    }

    pub fn from_name(value: &str) -> Option<HandKind> {
        let value = value.trim();
        HandKind::ALL.iter().copied().find(|kind| {
            kind.id().eq_ignore_ascii_case(value) || kind.display_name().eq_ignore_ascii_case(value)
        })
    }
}

impl fmt::Display for HandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The level-table row a category scores with.
pub fn level_kind(kind: HandKind) -> HandKind {
    match kind {
        HandKind::RoyalFlush | HandKind::FlushHouse => HandKind::StraightFlush,
        other => other,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandEvalRules {
    /// Require the straight and the flush to be formed by the same suit.
    #[serde(default)]
    pub strict_straight_flush: bool,
}

/// Every category that holds for a set of cards at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandFlags {
    pub pair: bool,
    pub two_pair: bool,
    pub trips: bool,
    pub full_house: bool,
    pub quads: bool,
    pub flush: bool,
    pub flush_house: bool,
    pub straight: bool,
    pub straight_flush: bool,
    pub royal: bool,
}

impl HandFlags {
    pub fn detect(cards: &[Card], rules: HandEvalRules) -> Self {
        let eval: Vec<&Card> = cards.iter().filter(|card| !card.is_stone()).collect();
        let mut flags = HandFlags::default();
        if eval.is_empty() {
            return flags;
        }

        let mut rank_counts: BTreeMap<Rank, usize> = BTreeMap::new();
        let mut suit_counts = [0usize; 4];
        for card in &eval {
            *rank_counts.entry(card.rank).or_insert(0) += 1;
            for suit in Suit::ALL {
                if card.counts_as_suit(suit) {
                    suit_counts[suit.index()] += 1;
                }
            }
        }

        for count in rank_counts.values() {
            match count {
                2 => {
                    if flags.pair {
                        flags.two_pair = true;
                    } else if flags.trips {
                        flags.full_house = true;
                    }
                    flags.pair = true;
                }
                3 => {
                    if flags.pair {
                        flags.full_house = true;
                    }
                    flags.trips = true;
                }
                4 => flags.quads = true,
                // five of a kind has no category of its own
                _ => {}
            }
        }

        flags.flush = suit_counts.iter().any(|&count| count >= 5);
        flags.flush_house = flags.flush && flags.full_house;

        if eval.len() >= 5 {
            let values: BTreeSet<u8> = eval.iter().map(|card| card.rank.value()).collect();
            if let Some(top) = straight_top(&values) {
                flags.straight = true;
                if rules.strict_straight_flush {
                    for suit in Suit::ALL {
                        if suit_counts[suit.index()] < 5 {
                            continue;
                        }
                        let suited: BTreeSet<u8> = eval
                            .iter()
                            .filter(|card| card.counts_as_suit(suit))
                            .map(|card| card.rank.value())
                            .collect();
                        if let Some(suited_top) = straight_top(&suited) {
                            flags.straight_flush = true;
                            flags.royal |= suited_top == 14;
                        }
                    }
                } else if flags.flush {
                    flags.straight_flush = true;
                    flags.royal = top == 14;
                }
            }
        }

        flags
    }

    pub fn best(&self) -> HandKind {
        if self.straight_flush {
            return if self.royal {
                HandKind::RoyalFlush
            } else {
                HandKind::StraightFlush
            };
        }
        if self.flush_house {
            return HandKind::FlushHouse;
        }
        if self.quads {
            return HandKind::Quads;
        }
        if self.full_house {
            return HandKind::FullHouse;
        }
        if self.flush {
            return HandKind::Flush;
        }
        if self.straight {
            return HandKind::Straight;
        }
        if self.trips {
            return HandKind::Trips;
        }
        if self.two_pair {
            return HandKind::TwoPair;
        }
        if self.pair {
            return HandKind::Pair;
        }
        HandKind::HighCard
    }
}

pub fn classify(cards: &[Card]) -> HandKind {
    classify_with_rules(cards, HandEvalRules::default())
}

pub fn classify_with_rules(cards: &[Card], rules: HandEvalRules) -> HandKind {
    HandFlags::detect(cards, rules).best()
}

/// Highest card of the best five-long run, 5 for the wheel.
fn straight_top(values: &BTreeSet<u8>) -> Option<u8> {
    for &top in values.iter().rev() {
        if top < 6 {
            break;
        }
        if (top - 4..=top).all(|value| values.contains(&value)) {
            return Some(top);
        }
    }
    if [14u8, 2, 3, 4, 5].iter().all(|value| values.contains(value)) {
        return Some(5);
    }
    None
}

fn run_values(top: u8) -> Vec<u8> {
    if top == 5 {
        vec![14, 2, 3, 4, 5]
    } else {
        (top - 4..=top).collect()
    }
}

/// Indices of the cards that form `kind`. Stone cards are always included.
pub fn scoring_cards(cards: &[Card], kind: HandKind) -> Vec<usize> {
    if cards.is_empty() {
        return Vec::new();
    }

    let mut by_rank: BTreeMap<Rank, Vec<usize>> = BTreeMap::new();
    for (idx, card) in cards.iter().enumerate() {
        if card.is_stone() {
            continue;
        }
        by_rank.entry(card.rank).or_default().push(idx);
    }

    let mut scoring: Vec<usize> = match kind {
        HandKind::HighCard => highest_card_index(cards).into_iter().collect(),
        HandKind::Pair => pick_groups(&by_rank, 2, 1),
        HandKind::TwoPair => pick_groups(&by_rank, 2, 2),
        HandKind::Trips => pick_groups(&by_rank, 3, 1),
        HandKind::Quads => pick_groups(&by_rank, 4, 1),
        HandKind::FullHouse | HandKind::FlushHouse => pick_full_house(&by_rank),
        HandKind::Flush => pick_flush(cards),
        HandKind::Straight => pick_straight(cards, |_| true),
        HandKind::StraightFlush | HandKind::RoyalFlush => {
            let suited = Suit::ALL.iter().copied().find_map(|suit| {
                let count = cards.iter().filter(|card| card.counts_as_suit(suit)).count();
                if count < 5 {
                    return None;
                }
                let picked = pick_straight(cards, |card| card.counts_as_suit(suit));
                (!picked.is_empty()).then_some(picked)
            });
            suited.unwrap_or_else(|| pick_straight(cards, |_| true))
        }
    };

    if scoring.is_empty() {
        scoring.extend((0..cards.len()).filter(|idx| !cards[*idx].is_stone()));
    }
    scoring.extend(
        cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.is_stone())
            .map(|(idx, _)| idx),
    );
    scoring.sort_unstable();
    scoring.dedup();
    scoring
}

fn highest_card_index(cards: &[Card]) -> Option<usize> {
    let mut best: Option<(usize, u8)> = None;
    for (idx, card) in cards.iter().enumerate() {
        if card.is_stone() {
            continue;
        }
        let value = card.rank.value();
        if best.map(|(_, v)| value > v).unwrap_or(true) {
            best = Some((idx, value));
        }
    }
    best.map(|(idx, _)| idx)
}

fn pick_groups(by_rank: &BTreeMap<Rank, Vec<usize>>, size: usize, groups: usize) -> Vec<usize> {
    by_rank
        .iter()
        .rev()
        .filter(|(_, indices)| indices.len() >= size)
        .take(groups)
        .flat_map(|(_, indices)| indices.iter().take(size).copied())
        .collect()
}

fn pick_full_house(by_rank: &BTreeMap<Rank, Vec<usize>>) -> Vec<usize> {
    let Some((&three_rank, three)) = by_rank.iter().rev().find(|(_, indices)| indices.len() >= 3)
    else {
        return Vec::new();
    };
    let Some((_, pair)) = by_rank
        .iter()
        .rev()
        .find(|(rank, indices)| **rank != three_rank && indices.len() >= 2)
    else {
        return Vec::new();
    };
    three.iter().take(3).chain(pair.iter().take(2)).copied().collect()
}

fn pick_flush(cards: &[Card]) -> Vec<usize> {
    for suit in Suit::ALL {
        let mut suited: Vec<usize> = (0..cards.len())
            .filter(|idx| cards[*idx].counts_as_suit(suit))
            .collect();
        if suited.len() < 5 {
            continue;
        }
        suited.sort_by(|a, b| cards[*b].rank.cmp(&cards[*a].rank));
        suited.truncate(5);
        return suited;
    }
    Vec::new()
}

fn pick_straight<F>(cards: &[Card], eligible: F) -> Vec<usize>
where
    F: Fn(&Card) -> bool,
{
    let candidates: Vec<usize> = (0..cards.len())
        .filter(|idx| !cards[*idx].is_stone() && eligible(&cards[*idx]))
        .collect();
    let values: BTreeSet<u8> = candidates.iter().map(|idx| cards[*idx].rank.value()).collect();
    let Some(top) = straight_top(&values) else {
        return Vec::new();
    };
    run_values(top)
        .into_iter()
        .filter_map(|value| {
            candidates
                .iter()
                .copied()
                .find(|idx| cards[*idx].rank.value() == value)
        })
        .collect()
}
