use crate::{
    blind_boss_roster, boss_rush_roster, default_hand_base, BossDef, HandEvalRules, HandKind,
    HandLevelTable, HandStats,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BlindKind {
    Small,
    Big,
    Boss,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandRule {
    pub kind: HandKind,
    pub base_chips: i64,
    pub base_mult: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlindRule {
    pub kind: BlindKind,
    pub target_mult: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnteRule {
    pub ante: u8,
    pub base_target: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRule {
    pub hands: u8,
    pub discards: u8,
    pub hand_size: usize,
    pub max_selection: usize,
    pub joker_slots: usize,
    pub consumable_slots: usize,
}

impl Default for RoundRule {
    fn default() -> Self {
        Self {
            hands: 4,
            discards: 4,
            hand_size: 8,
            max_selection: 5,
            joker_slots: 5,
            consumable_slots: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyRule {
    pub reward_small: i64,
    pub reward_big: i64,
    pub reward_boss: i64,
    /// Cap on the overkill bonus paid for beating a target by a wide margin.
    pub overkill_cap: i64,
    pub gold_held: i64,
    pub lucky_cash: i64,
    pub boss_souls: i64,
    pub rush_cash: i64,
    pub rush_souls_base: i64,
    pub rush_souls_step: i64,
    pub revive_cost: i64,
    pub revive_hands: u8,
    pub revive_discards: u8,
}

impl Default for EconomyRule {
    fn default() -> Self {
        Self {
            reward_small: 4,
            reward_big: 8,
            reward_boss: 10,
            overkill_cap: 5,
            gold_held: 3,
            lucky_cash: 20,
            boss_souls: 5,
            rush_cash: 100,
            rush_souls_base: 5,
            rush_souls_step: 2,
            revive_cost: 20,
            revive_hands: 2,
            revive_discards: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatRule {
    pub max_heat: u32,
    pub max_level: u8,
    pub gain_blind: u32,
    pub gain_boss: u32,
    pub duration: u32,
    pub top_duration: u32,
}

impl Default for HeatRule {
    fn default() -> Self {
        Self {
            max_heat: 100,
            max_level: 3,
            gain_blind: 25,
            gain_boss: 50,
            duration: 300,
            top_duration: 600,
        }
    }
}

impl HeatRule {
    pub fn duration_for(&self, level: u8) -> u32 {
        if level >= self.max_level {
            self.top_duration
        } else {
            self.duration
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossTuning {
    pub aggression_ticks: u32,
    pub phase_aggression_ticks: u32,
    pub disable_joker_ticks: u32,
    pub duel_cap: usize,
    pub reduced_hand_size: usize,
    pub phase_thresholds: [f64; 3],
    pub phase_penalty: f64,
    pub phase_discard_chance: f64,
    pub first_hand_penalty: f64,
    pub held_discards: usize,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            aggression_ticks: 15,
            phase_aggression_ticks: 10,
            disable_joker_ticks: 10,
            duel_cap: 4,
            reduced_hand_size: 6,
            phase_thresholds: [0.25, 0.5, 0.75],
            phase_penalty: 0.05,
            phase_discard_chance: 0.5,
            first_hand_penalty: 0.5,
            held_discards: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub round: RoundRule,
    pub hands: Vec<HandRule>,
    pub blinds: Vec<BlindRule>,
    pub antes: Vec<AnteRule>,
    pub economy: EconomyRule,
    pub heat: HeatRule,
    pub boss_tuning: BossTuning,
    pub boss_rush: Vec<BossDef>,
    pub blind_bosses: Vec<BossDef>,
    #[serde(default)]
    pub tarots: Vec<String>,
    #[serde(default)]
    pub rules: HandEvalRules,
}

impl Default for GameConfig {
    fn default() -> Self {
        let hands = HandKind::LEVELED
            .iter()
            .map(|kind| {
                let stats = default_hand_base(*kind);
                HandRule {
                    kind: *kind,
                    base_chips: stats.chips,
                    base_mult: stats.mult,
                }
            })
            .collect();
        let antes = [300, 800, 2000, 5000, 11000, 20000, 35000, 50000]
            .iter()
            .enumerate()
            .map(|(idx, target)| AnteRule {
                ante: idx as u8 + 1,
                base_target: *target,
            })
            .collect();
        Self {
            round: RoundRule::default(),
            hands,
            blinds: vec![
                BlindRule {
                    kind: BlindKind::Small,
                    target_mult: 1.0,
                },
                BlindRule {
                    kind: BlindKind::Big,
                    target_mult: 1.5,
                },
                BlindRule {
                    kind: BlindKind::Boss,
                    target_mult: 2.0,
                },
            ],
            antes,
            economy: EconomyRule::default(),
            heat: HeatRule::default(),
            boss_tuning: BossTuning::default(),
            boss_rush: boss_rush_roster(),
            blind_bosses: blind_boss_roster(),
            tarots: default_tarots(),
            rules: HandEvalRules::default(),
        }
    }
}

pub fn default_tarots() -> Vec<String> {
    [
        "The Fool",
        "The Emperor",
        "Judgment",
        "The Hanged Man",
        "Justice",
        "The World",
        "Star Platinum",
        "Silver Chariot",
        "Magician's Red",
        "Hierophant Green",
        "Death 13",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect()
}

impl GameConfig {
    pub fn blind_rule(&self, kind: BlindKind) -> Option<&BlindRule> {
        self.blinds.iter().find(|rule| rule.kind == kind)
    }

    pub fn ante_rule(&self, ante: u8) -> Option<&AnteRule> {
        self.antes.iter().find(|rule| rule.ante == ante)
    }

    pub fn target_for(&self, ante: u8, kind: BlindKind) -> Option<i64> {
        let base = self.ante_rule(ante)?.base_target;
        let mult = self.blind_rule(kind)?.target_mult;
        Some((base as f32 * mult).round() as i64)
    }

    pub fn max_ante(&self) -> Option<u8> {
        self.antes.iter().map(|rule| rule.ante).max()
    }

    pub fn level_table(&self) -> HandLevelTable {
        HandLevelTable::from_rows(
            self.hands
                .iter()
                .map(|rule| (rule.kind, HandStats::new(rule.base_chips, rule.base_mult))),
        )
    }

    pub fn blind_reward(&self, kind: BlindKind) -> i64 {
        match kind {
            BlindKind::Small => self.economy.reward_small,
            BlindKind::Big => self.economy.reward_big,
            BlindKind::Boss => self.economy.reward_boss,
        }
    }
}
