use crate::{
    classify_with_rules, heat_effects, scoring_cards, BossMachine, Card, CardId, EconomyRule,
    EffectSource, Enhancement, HandEvalRules, HandKind, HandLevelTable, HeatState, JokerContext,
    JokerKind, OwnedJoker, RngState, RuleEffect, Score, ScoreTraceStep,
};
use serde::{Deserialize, Serialize};

/// Round facts the jokers can see.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundView {
    pub hands_played: u32,
    pub final_hand: bool,
}

pub struct ScoreInput<'a> {
    pub selected: &'a [Card],
    pub held: &'a [Card],
    pub levels: &'a HandLevelTable,
    pub jokers: &'a [OwnedJoker],
    pub heat: &'a HeatState,
    pub boss: &'a BossMachine,
    pub economy: &'a EconomyRule,
    pub rules: HandEvalRules,
    pub round: RoundView,
}

/// A change applied to the round increment after chips x mult is taken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncrementStep {
    pub source: EffectSource,
    pub before: i64,
    pub after: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub hand: HandKind,
    pub scoring_indices: Vec<usize>,
    pub chips: i64,
    pub mult: f64,
    /// Paid out as soon as the score is committed.
    pub cash_delta: i64,
    /// Paid only if the commit ends the round.
    pub deferred_cash: i64,
    pub hands_delta: i32,
    pub destroyed_cards: Vec<CardId>,
    pub activated_effects: Vec<EffectSource>,
    pub trace: Vec<ScoreTraceStep>,
    pub increment_steps: Vec<IncrementStep>,
    pub round_increment: i64,
}

struct Tally {
    score: Score,
    trace: Vec<ScoreTraceStep>,
    activated: Vec<EffectSource>,
}

impl Tally {
    fn apply(&mut self, source: EffectSource, effect: RuleEffect) {
        let before = self.score.clone();
        self.score.apply(&effect);
        self.trace.push(ScoreTraceStep {
            source,
            effect,
            before,
            after: self.score.clone(),
        });
        if !self.activated.contains(&source) {
            self.activated.push(source);
        }
    }
}

pub fn score(input: &ScoreInput<'_>, rng: &mut RngState) -> ScoreResult {
    let hand = classify_with_rules(input.selected, input.rules);
    let stats = input.levels.stats(hand);
    let mut tally = Tally {
        score: Score::new(0, 0.0),
        trace: Vec::new(),
        activated: Vec::new(),
    };
    tally.apply(EffectSource::HandBase, RuleEffect::AddChips(stats.chips));
    tally.apply(EffectSource::HandBase, RuleEffect::AddMult(stats.mult));

    let mut cash_delta = 0;
    let mut deferred_cash = 0;
    let mut destroyed_cards = Vec::new();

    let scoring_indices = scoring_cards(input.selected, hand);
    for idx in &scoring_indices {
        let card = &input.selected[*idx];
        if !card.is_stone() {
            tally.apply(EffectSource::CardChips(card.id), RuleEffect::AddChips(card.chip_value));
        }
        let source = EffectSource::ScoredEnhancement(card.id, card.enhancement);
        match card.enhancement {
            Enhancement::Bonus => tally.apply(source, RuleEffect::AddChips(30)),
            Enhancement::Mult => tally.apply(source, RuleEffect::AddMult(4.0)),
            Enhancement::Glass => {
                tally.apply(source, RuleEffect::MultiplyMult(2.0));
                if rng.roll(4) {
                    destroyed_cards.push(card.id);
                }
            }
            Enhancement::Stone => tally.apply(source, RuleEffect::AddChips(50)),
            Enhancement::Lucky => {
                if rng.roll(5) {
                    tally.apply(source, RuleEffect::AddMult(20.0));
                }
                if rng.roll(15) {
                    cash_delta += input.economy.lucky_cash;
                    if !tally.activated.contains(&source) {
                        tally.activated.push(source);
                    }
                }
            }
            _ => {}
        }
    }

    for card in input.held {
        let source = EffectSource::HeldEnhancement(card.id, card.enhancement);
        match card.enhancement {
            Enhancement::Steel => tally.apply(source, RuleEffect::MultiplyMult(1.5)),
            Enhancement::Gold => deferred_cash += input.economy.gold_held,
            _ => {}
        }
    }

    let mut hands_delta = 0;
    let mut doubles_increment = false;
    let context = JokerContext {
        hand,
        selected: input.selected,
        owned_jokers: input.jokers.len(),
        hands_played: input.round.hands_played,
        final_hand: input.round.final_hand,
    };
    for joker in input.jokers.iter().filter(|joker| !joker.disabled) {
        let outcome = joker.kind.evaluate(&context, rng);
        let source = EffectSource::Joker(joker.kind);
        for effect in outcome.effects {
            tally.apply(source, effect);
        }
        hands_delta += outcome.hands_delta;
        doubles_increment |= outcome.doubles_increment;
        if (outcome.hands_delta != 0 || outcome.doubles_increment)
            && !tally.activated.contains(&source)
        {
            tally.activated.push(source);
        }
    }

    if let Some(tier) = input.heat.active_tier() {
        for effect in heat_effects(tier) {
            tally.apply(EffectSource::Heat(tier), effect);
        }
    }

    let mut chips = tally.score.chips;
    let mut increment = tally.score.total();
    let mut increment_steps = Vec::new();
    if doubles_increment {
        let before = increment;
        increment *= 2;
        increment_steps.push(IncrementStep {
            source: EffectSource::Joker(JokerKind::EightOhTwo),
            before,
            after: increment,
        });
    }
    for penalty in input.boss.increment_penalties() {
        let before = increment;
        let mut after = (before as f64 * penalty.factor).floor() as i64;
        if before > 0 {
            after = after.max(1);
        }
        increment = after;
        if penalty.scales_chips {
            chips = (chips as f64 * penalty.factor).floor() as i64;
        }
        let source = EffectSource::Boss(penalty.ability);
        increment_steps.push(IncrementStep {
            source,
            before,
            after,
        });
        tally.activated.push(source);
    }

    ScoreResult {
        hand,
        scoring_indices,
        chips,
        mult: tally.score.mult,
        cash_delta,
        deferred_cash,
        hands_delta,
        destroyed_cards,
        activated_effects: tally.activated,
        trace: tally.trace,
        increment_steps,
        round_increment: increment,
    }
}
