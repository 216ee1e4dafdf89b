use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    pub fn index(self) -> usize {
        match self {
            Suit::Spades => 0,
            Suit::Hearts => 1,
            Suit::Diamonds => 2,
            Suit::Clubs => 3,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
        }
    }
}

/// Declared low to high so the derived ordering matches the ordinal value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Ordinal value, 2 through 14.
    pub fn value(self) -> u8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
            Rank::Ace => 14,
        }
    }

    pub fn from_value(value: u8) -> Option<Rank> {
        Rank::ALL.iter().copied().find(|rank| rank.value() == value)
    }

    /// Chip value a card of this rank is printed with.
    pub fn base_chips(self) -> i64 {
        match self.value() {
            value @ 2..=10 => value as i64,
            11..=13 => 10,
            _ => 11,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Enhancement {
    #[default]
    Basic,
    Bonus,
    Mult,
    Wild,
    Glass,
    Steel,
    Stone,
    Gold,
    Lucky,
}

impl Enhancement {
    pub fn name(self) -> &'static str {
        match self {
            Enhancement::Basic => "Basic Card",
            Enhancement::Bonus => "Bonus Card",
            Enhancement::Mult => "Mult Card",
            Enhancement::Wild => "Wild Card",
            Enhancement::Glass => "Glass Card",
            Enhancement::Steel => "Steel Card",
            Enhancement::Stone => "Stone Card",
            Enhancement::Gold => "Gold Card",
            Enhancement::Lucky => "Lucky Card",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Enhancement::Basic => "No effect",
            Enhancement::Bonus => "+30 chips when scored",
            Enhancement::Mult => "+4 mult when scored",
            Enhancement::Wild => "Counts as every suit",
            Enhancement::Glass => "x2 mult when scored, 1 in 4 chance to break",
            Enhancement::Steel => "x1.5 mult while held in hand",
            Enhancement::Stone => "+50 chips when scored, no rank or suit",
            Enhancement::Gold => "$3 if held in hand at the end of the round",
            Enhancement::Lucky => "1 in 5 chance of +20 mult, 1 in 15 chance of $20",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub id: CardId,
    pub suit: Suit,
    pub rank: Rank,
    #[serde(default)]
    pub enhancement: Enhancement,
    pub chip_value: i64,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub destroyed: bool,
}

impl Card {
    pub fn new(id: CardId, suit: Suit, rank: Rank) -> Self {
        Self {
            id,
            suit,
            rank,
            enhancement: Enhancement::Basic,
            chip_value: rank.base_chips(),
            selected: false,
            destroyed: false,
        }
    }

    pub fn with_enhancement(mut self, enhancement: Enhancement) -> Self {
        self.enhancement = enhancement;
        self
    }

    /// Changes the rank in place. `chip_value` keeps the value printed at creation.
    pub fn set_rank(&mut self, rank: Rank) {
        self.rank = rank;
    }

    pub fn is_wild(&self) -> bool {
        self.enhancement == Enhancement::Wild
    }

    pub fn is_stone(&self) -> bool {
        self.enhancement == Enhancement::Stone
    }

    /// True when the card counts toward `suit` for flush detection.
    pub fn counts_as_suit(&self, suit: Suit) -> bool {
        !self.is_stone() && (self.is_wild() || self.suit == suit)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.symbol())
    }
}
