use crate::{BlindKind, BossAbilityKind, CardId, HandKind, HeatTransition, JokerKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    BlindStarted {
        ante: u8,
        blind: BlindKind,
        target: i64,
        hands: u8,
        discards: u8,
    },
    BossEngaged {
        name: String,
        ability: BossAbilityKind,
        target: i64,
    },
    HandDealt { count: usize },
    HandScored {
        hand: HandKind,
        chips: i64,
        mult: f64,
        total: i64,
    },
    ScoreCommitted {
        increment: i64,
        round_score: i64,
        target: i64,
    },
    TargetCrossed { souls: i64, heat: u32 },
    CardsDiscarded { cards: Vec<CardId>, forced: bool },
    CardsDestroyed { cards: Vec<CardId> },
    JokerDisabled { joker: JokerKind },
    JokerCreated { joker: JokerKind },
    ConsumableUsed { name: String },
    ConsumablesCreated { names: Vec<String> },
    TargetChanged { target: i64 },
    BossPhase { phase: u8 },
    Heat(HeatTransition),
    Revived { souls: i64 },
    BlindCleared { score: i64, reward: i64, money: i64 },
    BlindFailed { score: i64 },
    BossDefeated {
        name: String,
        souls: i64,
        money: i64,
    },
    RushWon { bosses: usize },
    GameOver { reason: String },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
