use serde::{Deserialize, Serialize};

pub use ashen_core::{
    AnteRule, BlindRule, BossDef, BossTuning, EconomyRule, GameConfig, HandEvalRules, HandRule,
    HeatRule, RoundRule,
};

/// Layout of `bosses.json`: the fixed rush order plus the pool drawn from on
/// ordinary boss blinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossRoster {
    pub boss_rush: Vec<BossDef>,
    #[serde(default)]
    pub blind_bosses: Vec<BossDef>,
}
