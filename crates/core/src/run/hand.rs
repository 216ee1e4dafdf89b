use super::*;
use crate::*;

impl RunState {
    /// Replaces the selection with the given hand positions.
    pub fn select(&mut self, indices: &[usize]) -> Result<(), RunError> {
        self.ensure_phase(Phase::Play)?;
        let cap = self.max_selection();
        self.deck
            .select_indices(indices, cap)
            .map_err(|_| RunError::InvalidSelection)
    }

    pub fn toggle_card(&mut self, id: CardId) -> Result<bool, RunError> {
        self.ensure_phase(Phase::Play)?;
        let cap = self.max_selection();
        self.deck
            .toggle_select(id, cap)
            .map_err(|_| RunError::InvalidSelection)
    }

    /// Scores the current selection without committing it.
    pub fn play_hand(&mut self, events: &mut EventBus) -> Result<PendingScore, RunError> {
        self.ensure_phase(Phase::Play)?;
        let unlimited = self.heat.unlimited_hands();
        if self.state.hands_left == 0 && !unlimited {
            return Err(RunError::NoHandsLeft);
        }
        let selected = self.deck.selected_count();
        if selected == 0 || selected > self.max_selection() {
            return Err(RunError::InvalidSelection);
        }

        if self.boss.before_hand(&mut self.rng) {
            let chosen: Vec<CardId> = self.deck.selected_cards().iter().map(|card| card.id).collect();
            if let Some(idx) = self.rng.pick_index(chosen.len()) {
                let gone = self.deck.discard_ids(&[chosen[idx]]);
                events.push(Event::CardsDiscarded {
                    cards: gone.iter().map(|card| card.id).collect(),
                    forced: true,
                });
            }
            if self.deck.selected_count() == 0 {
                return Err(RunError::HandForfeited);
            }
        }

        if !unlimited {
            self.state.hands_left -= 1;
        }
        // A boss reacting to the spent hand must see it before the score is staged.
        let view = self.boss_view();
        let directives = self.boss.observe(view);
        self.apply_boss_directives(&directives, events);

        let played = self.deck.selected_cards();
        let held = self.deck.held_cards();
        let mut rng = self.rng.clone();
        let result = self.score_selection(&played, &held, self.state.hands_left, &mut rng);
        self.rng = rng;
        events.push(Event::HandScored {
            hand: result.hand,
            chips: result.chips,
            mult: result.mult,
            total: result.round_increment,
        });
        self.state.phase = Phase::Score;
        Ok(self.issue_pending(result))
    }

    /// Applies a staged score. Rewards for crossing the target are granted
    /// once, and the hand is redrawn only if the round goes on.
    pub fn commit_score(
        &mut self,
        pending: PendingScore,
        events: &mut EventBus,
    ) -> Result<Option<BlindOutcome>, RunError> {
        self.ensure_phase(Phase::Score)?;
        let result = self.redeem_pending(pending)?;
        self.state.phase = Phase::Play;

        let hands = self.state.hands_left as i32 + result.hands_delta;
        self.state.hands_left = hands.clamp(0, u8::MAX as i32) as u8;
        self.state.money += result.cash_delta;
        self.state.round_score += result.round_increment;
        self.state.hands_played += 1;
        self.state.last_hand = Some(result.hand);
        events.push(Event::ScoreCommitted {
            increment: result.round_increment,
            round_score: self.state.round_score,
            target: self.state.target,
        });

        if !self.state.target_crossed && self.state.cleared() {
            self.state.target_crossed = true;
            let boss_blind = self.state.blind == BlindKind::Boss;
            let (souls, heat) = if boss_blind {
                (self.config.economy.boss_souls, self.config.heat.gain_boss)
            } else {
                (0, self.config.heat.gain_blind)
            };
            self.state.souls += souls;
            if let Some(step) = self.heat.gain(heat, &self.config.heat) {
                events.push(Event::Heat(step));
            }
            events.push(Event::TargetCrossed { souls, heat });
        }

        let round_ends = self.blind_outcome().is_some();
        if round_ends {
            self.state.money += result.deferred_cash;
        }

        self.deck.play_selected(&result.destroyed_cards);
        if !result.destroyed_cards.is_empty() {
            events.push(Event::CardsDestroyed {
                cards: result.destroyed_cards.clone(),
            });
        }

        if !self.state.cleared() {
            let view = self.boss_view();
            let directives = self.boss.on_hand_played(view);
            if let Some(outcome) = self.apply_boss_directives(&directives, events) {
                return Ok(Some(outcome));
            }
        }

        if self.blind_outcome().is_none() {
            if let Err(err) = self.deck.fill_hand(self.state.hand_size) {
                return Err(self.fatal(err, events));
            }
        }
        Ok(self.check_outcome(events))
    }

    /// Scores hand positions as if they were played now. Neither the round nor
    /// the live random stream is touched.
    pub fn preview(&self, indices: &[usize]) -> Option<ScoreResult> {
        let mut played = Vec::with_capacity(indices.len());
        for idx in indices {
            played.push(*self.deck.hand.get(*idx)?);
        }
        let held: Vec<Card> = self
            .deck
            .hand
            .iter()
            .enumerate()
            .filter(|(idx, _)| !indices.contains(idx))
            .map(|(_, card)| *card)
            .collect();
        let hands_after = self.state.hands_left.saturating_sub(1);
        let mut rng = self.rng.clone();
        Some(self.score_selection(&played, &held, hands_after, &mut rng))
    }

    /// Scores with `hands_after` hands left once this one is spent. A hand
    /// whose own jokers use up the remaining hands counts as the last one.
    fn score_selection(
        &self,
        played: &[Card],
        held: &[Card],
        hands_after: u8,
        rng: &mut RngState,
    ) -> ScoreResult {
        let unlimited = self.heat.unlimited_hands();
        let start = rng.clone();
        let result = self.evaluate(played, held, !unlimited && hands_after == 0, rng);
        if unlimited || hands_after == 0 || i32::from(hands_after) + result.hands_delta > 0 {
            return result;
        }
        *rng = start;
        self.evaluate(played, held, true, rng)
    }

    fn evaluate(
        &self,
        played: &[Card],
        held: &[Card],
        final_hand: bool,
        rng: &mut RngState,
    ) -> ScoreResult {
        let input = ScoreInput {
            selected: played,
            held,
            levels: &self.levels,
            jokers: &self.inventory.jokers,
            heat: &self.heat,
            boss: &self.boss,
            economy: &self.config.economy,
            rules: self.config.rules,
            round: RoundView {
                hands_played: self.state.hands_played,
                final_hand,
            },
        };
        score(&input, rng)
    }

    pub fn discard_selected(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.ensure_phase(Phase::Play)?;
        if self.deck.selected_count() == 0 {
            return Err(RunError::InvalidSelection);
        }
        let unlimited = self.heat.unlimited_discards();
        if self.state.discards_left == 0 && !unlimited {
            return Err(RunError::NoDiscardsLeft);
        }
        let discarded = match self.deck.discard_and_redraw(self.state.hand_size) {
            Ok(cards) => cards,
            Err(err) => return Err(self.fatal(err, events)),
        };
        if !unlimited {
            self.state.discards_left -= 1;
        }
        events.push(Event::CardsDiscarded {
            cards: discarded.iter().map(|card| card.id).collect(),
            forced: false,
        });
        Ok(())
    }
}
