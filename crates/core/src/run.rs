use crate::{
    BossMachine, Card, Deck, DeckContext, DeckError, GameConfig, GameState, HandLevelTable,
    HeatState, Inventory, InventoryError, Phase, RngState, ScoreResult,
};
use thiserror::Error;

mod blind;
mod boss;
mod hand;
mod items;
mod state;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("missing config for ante {0}")]
    MissingAnteRule(u8),
    #[error("invalid phase: {0:?}")]
    InvalidPhase(Phase),
    #[error("no hands left")]
    NoHandsLeft,
    #[error("no discards left")]
    NoDiscardsLeft,
    #[error("invalid card selection")]
    InvalidSelection,
    #[error("the boss discarded the whole selection")]
    HandForfeited,
    #[error("stale or duplicate score commit")]
    StaleScore,
    #[error("no boss rush in progress")]
    NoBossRush,
    #[error("not enough souls: need {needed}, have {have}")]
    NotEnoughSouls { needed: i64, have: i64 },
    #[error("already revived this blind")]
    AlreadyRevived,
    #[error("deck error: {0}")]
    Deck(#[from] DeckError),
    #[error("inventory error: {0}")]
    Inventory(#[from] InventoryError),
}

impl RunError {
    /// True for errors that end the run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunError::Deck(DeckError::DeckExhausted { .. }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlindOutcome {
    Cleared,
    Failed,
}

/// A scored hand waiting to be committed. Consumed by value; a commit of an
/// older or already used ticket is rejected.
#[derive(Debug)]
pub struct PendingScore {
    seq: u64,
    result: ScoreResult,
}

impl PendingScore {
    pub fn result(&self) -> &ScoreResult {
        &self.result
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Progress through the fixed boss roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BossRush {
    pub index: usize,
    pub defeated: usize,
}

#[derive(Debug)]
pub struct RunState {
    pub config: GameConfig,
    pub rng: RngState,
    pub deck: Deck,
    pub deck_context: DeckContext,
    pub levels: HandLevelTable,
    pub inventory: Inventory,
    pub heat: HeatState,
    pub boss: BossMachine,
    pub state: GameState,
    pub rush: Option<BossRush>,
    next_seq: u64,
    outstanding: Option<u64>,
}

impl RunState {
    pub fn hand(&self) -> &[Card] {
        &self.deck.hand
    }
}
