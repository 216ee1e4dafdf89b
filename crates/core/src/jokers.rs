use crate::{Card, HandKind, Rank, RngState, RuleEffect};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum JokerKind {
    TheJoker,
    MichaelMyers,
    Fibonacci,
    Gauntlet,
    Ogre,
    StrawHat,
    HogRider,
    QuestionBlock,
    Hogwarts,
    EightOhTwo,
}

impl JokerKind {
    pub const ALL: [JokerKind; 10] = [
        JokerKind::TheJoker,
        JokerKind::MichaelMyers,
        JokerKind::Fibonacci,
        JokerKind::Gauntlet,
        JokerKind::Ogre,
        JokerKind::StrawHat,
        JokerKind::HogRider,
        JokerKind::QuestionBlock,
        JokerKind::Hogwarts,
        JokerKind::EightOhTwo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            JokerKind::TheJoker => "The Joker",
            JokerKind::MichaelMyers => "Michael Myers",
            JokerKind::Fibonacci => "Fibonacci",
            JokerKind::Gauntlet => "Gauntlet",
            JokerKind::Ogre => "Ogre",
            JokerKind::StrawHat => "Straw Hat",
            JokerKind::HogRider => "Hog Rider",
            JokerKind::QuestionBlock => "? Block",
            JokerKind::Hogwarts => "Hogwarts",
            JokerKind::EightOhTwo => "802",
        }
    }

    pub fn from_name(value: &str) -> Option<JokerKind> {
        let value = value.trim();
        JokerKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(value))
    }

    pub fn description(self) -> &'static str {
        match self {
            JokerKind::TheJoker => "+4 mult",
            JokerKind::MichaelMyers => "+0 to +23 mult at random",
            JokerKind::Fibonacci => "+8 mult for each Ace, 2, 3, 5 or 8 played",
            JokerKind::Gauntlet => "+250 chips, -2 hands remaining",
            JokerKind::Ogre => "+3 mult for each joker owned",
            JokerKind::StrawHat => "+100 chips, -5 for each hand already played this round",
            JokerKind::HogRider => "+100 chips if the hand is a Straight",
            JokerKind::QuestionBlock => "+4 chips if exactly 4 cards are played",
            JokerKind::Hogwarts => "+4 mult and +20 chips for each Ace played",
            JokerKind::EightOhTwo => "Doubles the gain of the last hand of the round",
        }
    }
}

impl fmt::Display for JokerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a joker sees when it fires.
#[derive(Debug, Clone, Copy)]
pub struct JokerContext<'a> {
    pub hand: HandKind,
    pub selected: &'a [Card],
    pub owned_jokers: usize,
    /// Hands already played this round, not counting the current one.
    pub hands_played: u32,
    pub final_hand: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JokerOutcome {
    pub effects: Vec<RuleEffect>,
    pub hands_delta: i32,
    pub doubles_increment: bool,
}

impl JokerOutcome {
    fn effect(effect: RuleEffect) -> Self {
        Self {
            effects: vec![effect],
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && self.hands_delta == 0 && !self.doubles_increment
    }
}

fn counted(card: &Card) -> Option<Rank> {
    (!card.is_stone()).then_some(card.rank)
}

impl JokerKind {
    pub fn evaluate(self, ctx: &JokerContext<'_>, rng: &mut RngState) -> JokerOutcome {
        match self {
            JokerKind::TheJoker => JokerOutcome::effect(RuleEffect::AddMult(4.0)),
            JokerKind::MichaelMyers => {
                JokerOutcome::effect(RuleEffect::AddMult(rng.range_inclusive(0, 23) as f64))
            }
            JokerKind::Fibonacci => {
                let hits = ctx
                    .selected
                    .iter()
                    .filter_map(counted)
                    .filter(|rank| {
                        matches!(
                            rank,
                            Rank::Ace | Rank::Two | Rank::Three | Rank::Five | Rank::Eight
                        )
                    })
                    .count();
                let mut outcome = JokerOutcome::default();
                for _ in 0..hits {
                    outcome.effects.push(RuleEffect::AddMult(8.0));
                }
                outcome
            }
            JokerKind::Gauntlet => JokerOutcome {
                effects: vec![RuleEffect::AddChips(250)],
                hands_delta: -2,
                doubles_increment: false,
            },
            JokerKind::Ogre => {
                JokerOutcome::effect(RuleEffect::AddMult(3.0 * ctx.owned_jokers as f64))
            }
            JokerKind::StrawHat => {
                let bonus = (100 - 5 * ctx.hands_played as i64).max(0);
                JokerOutcome::effect(RuleEffect::AddChips(bonus))
            }
            JokerKind::HogRider => {
                if ctx.hand == HandKind::Straight {
                    JokerOutcome::effect(RuleEffect::AddChips(100))
                } else {
                    JokerOutcome::default()
                }
            }
            JokerKind::QuestionBlock => {
                if ctx.selected.len() == 4 {
                    JokerOutcome::effect(RuleEffect::AddChips(4))
                } else {
                    JokerOutcome::default()
                }
            }
            JokerKind::Hogwarts => {
                let aces = ctx
                    .selected
                    .iter()
                    .filter_map(counted)
                    .filter(|rank| *rank == Rank::Ace)
                    .count();
                let mut outcome = JokerOutcome::default();
                for _ in 0..aces {
                    outcome.effects.push(RuleEffect::AddMult(4.0));
                    outcome.effects.push(RuleEffect::AddChips(20));
                }
                outcome
            }
            JokerKind::EightOhTwo => JokerOutcome {
                doubles_increment: ctx.final_hand,
                ..JokerOutcome::default()
            },
        }
    }
}
