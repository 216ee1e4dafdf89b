use crate::{HeatRule, RuleEffect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeatTransition {
    LevelUp(u8),
    Activated { level: u8, ticks: u32 },
    LevelDown(u8),
    Depleted,
}

/// Heat meter: fills on target crossings, converts to levels, and spends a
/// level as a timed scoring buff.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeatState {
    pub heat: u32,
    pub level: u8,
    pub active: bool,
    pub remaining_ticks: u32,
}

impl HeatState {
    pub fn gain(&mut self, amount: u32, rule: &HeatRule) -> Option<HeatTransition> {
        self.heat = (self.heat + amount).min(rule.max_heat);
        if self.heat >= rule.max_heat && self.level < rule.max_level {
            self.level += 1;
            self.heat = 0;
            tracing::debug!(level = self.level, "heat level up");
            return Some(HeatTransition::LevelUp(self.level));
        }
        None
    }

    pub fn activate(&mut self, rule: &HeatRule) -> Option<HeatTransition> {
        if self.level == 0 || self.active {
            return None;
        }
        self.active = true;
        self.remaining_ticks = rule.duration_for(self.level);
        self.heat = 0;
        tracing::debug!(level = self.level, ticks = self.remaining_ticks, "heat activated");
        Some(HeatTransition::Activated {
            level: self.level,
            ticks: self.remaining_ticks,
        })
    }

    pub fn tick(&mut self, rule: &HeatRule) -> Option<HeatTransition> {
        if !self.active {
            return None;
        }
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        if self.remaining_ticks > 0 {
            return None;
        }
        if self.level > 1 {
            self.level -= 1;
            self.remaining_ticks = rule.duration;
            tracing::debug!(level = self.level, "heat level down");
            Some(HeatTransition::LevelDown(self.level))
        } else {
            self.level = 0;
            self.active = false;
            tracing::debug!("heat depleted");
            Some(HeatTransition::Depleted)
        }
    }

    pub fn active_tier(&self) -> Option<u8> {
        (self.active && self.level > 0).then_some(self.level)
    }

    pub fn unlimited_discards(&self) -> bool {
        self.active_tier().map(|tier| tier >= 2).unwrap_or(false)
    }

    pub fn unlimited_hands(&self) -> bool {
        self.active_tier() == Some(3)
    }
}

/// Scoring bonus for an active tier, applied in order.
pub fn heat_effects(tier: u8) -> Vec<RuleEffect> {
    match tier {
        1 => vec![RuleEffect::MultiplyMult(2.0)],
        2 => vec![
            RuleEffect::MultiplyMultTruncated(1.2),
            RuleEffect::AddChips(40),
        ],
        3 => vec![
            RuleEffect::MultiplyMultTruncated(1.8),
            RuleEffect::AddChips(80),
        ],
        _ => Vec::new(),
    }
}
