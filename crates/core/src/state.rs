use crate::{BlindKind, HandKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Play,
    /// A hand has been scored and awaits its commit.
    Score,
    Cleared,
    Failed,
    Won,
    GameOver,
}

/// Per-round counters and currencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub ante: u8,
    pub blind: BlindKind,
    pub phase: Phase,
    pub target: i64,
    pub round_score: i64,
    pub hands_left: u8,
    pub discards_left: u8,
    /// Hands committed this round.
    pub hands_played: u32,
    pub hand_size: usize,
    pub money: i64,
    pub souls: i64,
    #[serde(default)]
    pub target_crossed: bool,
    #[serde(default)]
    pub revived_this_blind: bool,
    #[serde(default)]
    pub last_hand: Option<HandKind>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            ante: 1,
            blind: BlindKind::Small,
            phase: Phase::Setup,
            target: 0,
            round_score: 0,
            hands_left: 0,
            discards_left: 0,
            hands_played: 0,
            hand_size: 8,
            money: 0,
            souls: 0,
            target_crossed: false,
            revived_this_blind: false,
            last_hand: None,
        }
    }

    /// Clears the round counters for a new blind. Currencies carry over.
    pub fn reset_round(&mut self, blind: BlindKind, target: i64, hands: u8, discards: u8) {
        self.blind = blind;
        self.phase = Phase::Play;
        self.target = target;
        self.round_score = 0;
        self.hands_left = hands;
        self.discards_left = discards;
        self.hands_played = 0;
        self.target_crossed = false;
        self.revived_this_blind = false;
        self.last_hand = None;
    }

    pub fn cleared(&self) -> bool {
        self.target > 0 && self.round_score >= self.target
    }
}
