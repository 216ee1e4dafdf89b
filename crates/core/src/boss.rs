use crate::{BossTuning, RngState};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BossAbilityKind {
    Aggression,
    DisablesRandomJoker,
    HonorableDuel,
    DoubleTarget,
    ReducesHandSize,
    PhaseChanges,
    FirstHandPenalty,
    DiscardsHeldAfterHand,
}

impl BossAbilityKind {
    pub fn id(self) -> &'static str {
        match self {
            BossAbilityKind::Aggression => "aggression",
            BossAbilityKind::DisablesRandomJoker => "disables_random_joker",
            BossAbilityKind::HonorableDuel => "honorable_duel",
            BossAbilityKind::DoubleTarget => "double_target",
            BossAbilityKind::ReducesHandSize => "reduces_hand_size",
            BossAbilityKind::PhaseChanges => "phase_changes",
            BossAbilityKind::FirstHandPenalty => "first_hand_penalty",
            BossAbilityKind::DiscardsHeldAfterHand => "discards_held_after_hand",
        }
    }
}

impl fmt::Display for BossAbilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BossDef {
    pub name: String,
    pub target: i64,
    pub ability: BossAbilityKind,
    /// DoubleTarget only: undo the doubling if remaining hands rise above 1.
    #[serde(default)]
    pub revert_double_target: bool,
}

impl BossDef {
    pub fn new(name: &str, target: i64, ability: BossAbilityKind) -> Self {
        Self {
            name: name.to_string(),
            target,
            ability,
            revert_double_target: false,
        }
    }
}

pub fn boss_rush_roster() -> Vec<BossDef> {
    vec![
        BossDef::new("Champion Gundyr", 700, BossAbilityKind::Aggression),
        BossDef::new("Artorias", 2500, BossAbilityKind::DisablesRandomJoker),
        BossDef::new("Sir Alonne", 5000, BossAbilityKind::HonorableDuel),
        BossDef::new("Prince Lothric", 5150, BossAbilityKind::DoubleTarget),
        BossDef::new("Nameless King", 7500, BossAbilityKind::ReducesHandSize),
        BossDef::new("Soul of Cinder", 8500, BossAbilityKind::PhaseChanges),
        BossDef::new("Slave Knight Gael", 10000, BossAbilityKind::FirstHandPenalty),
    ]
}

/// Bosses that can appear on an ordinary boss blind. Targets come from the ante.
pub fn blind_boss_roster() -> Vec<BossDef> {
    vec![BossDef::new("The Hook", 0, BossAbilityKind::DiscardsHeldAfterHand)]
}

/// Roster lookup; an out-of-range index falls back to the first boss.
pub fn boss_at(roster: &[BossDef], index: usize) -> Option<&BossDef> {
    roster.get(index).or_else(|| roster.first())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "ability", rename_all = "snake_case")]
pub enum BossState {
    Inactive,
    Aggression { idle_ticks: u32 },
    DisablesRandomJoker { elapsed_ticks: u32, fired: bool },
    HonorableDuel,
    DoubleTarget { base_target: i64, doubled: bool, reverted: bool },
    ReducesHandSize,
    PhaseChanges { phase: u8, idle_ticks: u32 },
    FirstHandPenalty,
    DiscardsHeldAfterHand,
}

impl BossState {
    fn fresh(ability: BossAbilityKind, target: i64) -> Self {
        match ability {
            BossAbilityKind::Aggression => BossState::Aggression { idle_ticks: 0 },
            BossAbilityKind::DisablesRandomJoker => BossState::DisablesRandomJoker {
                elapsed_ticks: 0,
                fired: false,
            },
            BossAbilityKind::HonorableDuel => BossState::HonorableDuel,
            BossAbilityKind::DoubleTarget => BossState::DoubleTarget {
                base_target: target,
                doubled: false,
                reverted: false,
            },
            BossAbilityKind::ReducesHandSize => BossState::ReducesHandSize,
            BossAbilityKind::PhaseChanges => BossState::PhaseChanges {
                phase: 1,
                idle_ticks: 0,
            },
            BossAbilityKind::FirstHandPenalty => BossState::FirstHandPenalty,
            BossAbilityKind::DiscardsHeldAfterHand => BossState::DiscardsHeldAfterHand,
        }
    }
}

/// Side effects the session must carry out on the boss's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossDirective {
    ForceDiscard { count: usize },
    DisableRandomJoker,
    SetTarget(i64),
    DiscardHeld { count: usize },
    PhaseChanged(u8),
}

/// Round progress the boss reacts to.
#[derive(Debug, Clone, Copy)]
pub struct BossView {
    pub round_score: i64,
    pub target: i64,
    pub hands_left: u8,
}

/// A boss-side change to the staged increment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncrementPenalty {
    pub ability: BossAbilityKind,
    pub factor: f64,
    pub scales_chips: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossMachine {
    def: Option<BossDef>,
    state: BossState,
    hands_played: u32,
    tuning: BossTuning,
}

impl Default for BossMachine {
    fn default() -> Self {
        Self::inactive()
    }
}

impl BossMachine {
    pub fn inactive() -> Self {
        Self {
            def: None,
            state: BossState::Inactive,
            hands_played: 0,
            tuning: BossTuning::default(),
        }
    }

    /// Starts an encounter. Every counter starts from zero.
    pub fn engage(def: BossDef, target: i64, tuning: BossTuning) -> Self {
        let state = BossState::fresh(def.ability, target);
        tracing::debug!(boss = %def.name, ability = %def.ability, "boss engaged");
        Self {
            def: Some(def),
            state,
            hands_played: 0,
            tuning,
        }
    }

    pub fn def(&self) -> Option<&BossDef> {
        self.def.as_ref()
    }

    pub fn state(&self) -> &BossState {
        &self.state
    }

    pub fn ability(&self) -> Option<BossAbilityKind> {
        self.def.as_ref().map(|def| def.ability)
    }

    pub fn is_active(&self) -> bool {
        self.def.is_some()
    }

    pub fn hands_played(&self) -> u32 {
        self.hands_played
    }

    pub fn phase(&self) -> Option<u8> {
        match self.state {
            BossState::PhaseChanges { phase, .. } => Some(phase),
            _ => None,
        }
    }

    pub fn max_selection(&self, default: usize) -> usize {
        match self.state {
            BossState::HonorableDuel => default.min(self.tuning.duel_cap),
            _ => default,
        }
    }

    pub fn initial_hand_size(&self, default: usize) -> usize {
        match self.state {
            BossState::ReducesHandSize => default.min(self.tuning.reduced_hand_size),
            _ => default,
        }
    }

    /// True when one selected card must be thrown away before scoring.
    pub fn before_hand(&mut self, rng: &mut RngState) -> bool {
        if self.phase() != Some(4) {
            return false;
        }
        let roll = (rng.next_u64() as f64) / (u64::MAX as f64);
        roll < self.tuning.phase_discard_chance
    }

    /// Penalties on the staged increment for the hand about to be scored.
    pub fn increment_penalties(&self) -> Vec<IncrementPenalty> {
        let mut penalties = Vec::new();
        if self.phase() == Some(3) {
            penalties.push(IncrementPenalty {
                ability: BossAbilityKind::PhaseChanges,
                factor: 1.0 - self.tuning.phase_penalty,
                scales_chips: false,
            });
        }
        if self.state == BossState::FirstHandPenalty && self.hands_played == 0 {
            penalties.push(IncrementPenalty {
                ability: BossAbilityKind::FirstHandPenalty,
                factor: 1.0 - self.tuning.first_hand_penalty,
                scales_chips: true,
            });
        }
        penalties
    }

    /// Runs after a hand's score is committed.
    pub fn on_hand_played(&mut self, view: BossView) -> Vec<BossDirective> {
        if !self.is_active() {
            return Vec::new();
        }
        self.hands_played += 1;
        let mut directives = Vec::new();
        match &mut self.state {
            BossState::Aggression { idle_ticks } | BossState::PhaseChanges { idle_ticks, .. } => {
                *idle_ticks = 0;
            }
            BossState::DiscardsHeldAfterHand => {
                directives.push(BossDirective::DiscardHeld {
                    count: self.tuning.held_discards,
                });
            }
            _ => {}
        }
        self.check_target(view, &mut directives);
        self.check_phase(view, &mut directives);
        directives
    }

    /// One idle step with no hand played.
    pub fn on_tick(&mut self, view: BossView) -> Vec<BossDirective> {
        let mut directives = Vec::new();
        let aggression_limit = self.tuning.aggression_ticks;
        let phase_limit = self.tuning.phase_aggression_ticks;
        let disable_after = self.tuning.disable_joker_ticks;
        match &mut self.state {
            BossState::Aggression { idle_ticks } => {
                *idle_ticks += 1;
                if *idle_ticks > aggression_limit {
                    *idle_ticks = 0;
                    directives.push(BossDirective::ForceDiscard { count: 1 });
                }
            }
            BossState::PhaseChanges { phase: 3, idle_ticks } => {
                *idle_ticks += 1;
                if *idle_ticks > phase_limit {
                    *idle_ticks = 0;
                    directives.push(BossDirective::ForceDiscard { count: 1 });
                }
            }
            BossState::DisablesRandomJoker {
                elapsed_ticks,
                fired,
            } => {
                *elapsed_ticks += 1;
                if !*fired && *elapsed_ticks >= disable_after {
                    *fired = true;
                    directives.push(BossDirective::DisableRandomJoker);
                }
            }
            _ => {}
        }
        self.check_target(view, &mut directives);
        self.check_phase(view, &mut directives);
        directives
    }

    /// Re-checks target and phase after an outside change to the round.
    pub fn observe(&mut self, view: BossView) -> Vec<BossDirective> {
        let mut directives = Vec::new();
        self.check_target(view, &mut directives);
        self.check_phase(view, &mut directives);
        directives
    }

    fn check_target(&mut self, view: BossView, directives: &mut Vec<BossDirective>) {
        let revert = self
            .def
            .as_ref()
            .map(|def| def.revert_double_target)
            .unwrap_or(false);
        if let BossState::DoubleTarget {
            base_target,
            doubled,
            reverted,
        } = &mut self.state
        {
            if !*doubled && view.hands_left == 1 {
                *doubled = true;
                tracing::debug!(new_target = *base_target * 2, "boss doubled the target");
                directives.push(BossDirective::SetTarget(*base_target * 2));
            } else if revert && *doubled && !*reverted && view.hands_left > 1 {
                *reverted = true;
                directives.push(BossDirective::SetTarget(*base_target));
            }
        }
    }

    fn check_phase(&mut self, view: BossView, directives: &mut Vec<BossDirective>) {
        if view.target <= 0 {
            return;
        }
        let thresholds = self.tuning.phase_thresholds;
        if let BossState::PhaseChanges { phase, idle_ticks } = &mut self.state {
            let progress = view.round_score as f64 / view.target as f64;
            let step = match *phase {
                1 => progress >= thresholds[0],
                2 => progress >= thresholds[1],
                3 => progress >= thresholds[2],
                _ => false,
            };
            if !step {
                return;
            }
            *phase += 1;
            tracing::debug!(phase = *phase, progress, "boss phase change");
            directives.push(BossDirective::PhaseChanged(*phase));
            match *phase {
                2 => directives.push(BossDirective::DisableRandomJoker),
                3 => *idle_ticks = 0,
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engage(ability: BossAbilityKind, target: i64) -> BossMachine {
        BossMachine::engage(
            BossDef::new("Test", target, ability),
            target,
            BossTuning::default(),
        )
    }

    fn view(round_score: i64, target: i64, hands_left: u8) -> BossView {
        BossView {
            round_score,
            target,
            hands_left,
        }
    }

    #[test]
    fn roster_lookup_wraps_to_first() {
        let roster = boss_rush_roster();
        assert_eq!(boss_at(&roster, 99).map(|def| def.name.as_str()), Some("Champion Gundyr"));
        assert_eq!(boss_at(&roster, 6).map(|def| def.target), Some(10000));
        assert!(boss_at(&[], 0).is_none());
    }

    #[test]
    fn aggression_fires_after_idle_limit() {
        let mut boss = engage(BossAbilityKind::Aggression, 700);
        let mut fired = 0;
        for _ in 0..15 {
            fired += boss.on_tick(view(0, 700, 4)).len();
        }
        assert_eq!(fired, 0);
        assert_eq!(
            boss.on_tick(view(0, 700, 4)),
            vec![BossDirective::ForceDiscard { count: 1 }]
        );
        for _ in 0..10 {
            boss.on_tick(view(0, 700, 4));
        }
        boss.on_hand_played(view(100, 700, 3));
        assert_eq!(boss.state(), &BossState::Aggression { idle_ticks: 0 });
    }

    #[test]
    fn double_target_fires_once() {
        let mut boss = engage(BossAbilityKind::DoubleTarget, 5150);
        assert!(boss.on_hand_played(view(100, 5150, 2)).is_empty());
        assert_eq!(
            boss.on_hand_played(view(200, 5150, 1)),
            vec![BossDirective::SetTarget(10300)]
        );
        assert!(boss.on_tick(view(200, 10300, 1)).is_empty());
        assert!(boss.on_hand_played(view(300, 10300, 3)).is_empty());
        assert!(boss.on_hand_played(view(300, 10300, 1)).is_empty());
    }

    #[test]
    fn double_target_revert_never_redoubles() {
        let mut def = BossDef::new("Lothric", 100, BossAbilityKind::DoubleTarget);
        def.revert_double_target = true;
        let mut boss = BossMachine::engage(def, 100, BossTuning::default());
        assert_eq!(boss.on_tick(view(0, 100, 1)), vec![BossDirective::SetTarget(200)]);
        assert_eq!(boss.on_tick(view(0, 200, 3)), vec![BossDirective::SetTarget(100)]);
        assert!(boss.on_tick(view(0, 100, 1)).is_empty());
    }

    #[test]
    fn phases_advance_one_step_per_check() {
        let mut boss = engage(BossAbilityKind::PhaseChanges, 1000);
        let directives = boss.on_hand_played(view(900, 1000, 3));
        assert_eq!(
            directives,
            vec![BossDirective::PhaseChanged(2), BossDirective::DisableRandomJoker]
        );
        assert_eq!(boss.on_tick(view(900, 1000, 3)), vec![BossDirective::PhaseChanged(3)]);
        let penalties = boss.increment_penalties();
        assert_eq!(penalties.len(), 1);
        assert!((penalties[0].factor - 0.95).abs() < 1e-9);
        assert!(!penalties[0].scales_chips);
        assert_eq!(boss.on_tick(view(900, 1000, 3)), vec![BossDirective::PhaseChanged(4)]);
        assert!(boss.on_tick(view(1000, 1000, 3)).is_empty());
        assert_eq!(boss.phase(), Some(4));
        assert!(boss.increment_penalties().is_empty());
    }

    #[test]
    fn artorias_disables_once() {
        let mut boss = engage(BossAbilityKind::DisablesRandomJoker, 2500);
        let mut disables = 0;
        for _ in 0..50 {
            disables += boss
                .on_tick(view(0, 2500, 4))
                .iter()
                .filter(|directive| **directive == BossDirective::DisableRandomJoker)
                .count();
        }
        assert_eq!(disables, 1);
    }

    #[test]
    fn first_hand_penalty_only_applies_once() {
        let mut boss = engage(BossAbilityKind::FirstHandPenalty, 10000);
        assert_eq!(boss.increment_penalties()[0].factor, 0.5);
        boss.on_hand_played(view(10, 10000, 3));
        assert!(boss.increment_penalties().is_empty());
    }

    #[test]
    fn selection_and_deal_limits() {
        let duel = engage(BossAbilityKind::HonorableDuel, 5000);
        assert_eq!(duel.max_selection(5), 4);
        let king = engage(BossAbilityKind::ReducesHandSize, 7500);
        assert_eq!(king.initial_hand_size(8), 6);
        assert_eq!(king.max_selection(5), 5);
        let mut idle = BossMachine::inactive();
        assert!(idle.on_tick(view(0, 100, 1)).is_empty());
        assert!(idle.on_hand_played(view(0, 100, 1)).is_empty());
    }

    #[test]
    fn hook_discards_held_after_each_hand() {
        let mut boss = engage(BossAbilityKind::DiscardsHeldAfterHand, 600);
        assert_eq!(
            boss.on_hand_played(view(10, 600, 3)),
            vec![BossDirective::DiscardHeld { count: 2 }]
        );
    }
}
