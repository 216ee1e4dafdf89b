use super::*;
use crate::*;

impl RunState {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let levels = config.level_table();
        let inventory =
            Inventory::with_slots(config.round.joker_slots, config.round.consumable_slots);
        let mut state = GameState::new();
        state.hand_size = config.round.hand_size;
        Self {
            config,
            rng: RngState::from_seed(seed),
            deck: Deck::default(),
            deck_context: DeckContext::default(),
            levels,
            inventory,
            heat: HeatState::default(),
            boss: BossMachine::inactive(),
            state,
            rush: None,
            next_seq: 0,
            outstanding: None,
        }
    }

    pub fn with_deck_context(mut self, context: DeckContext) -> Self {
        self.deck_context = context;
        self
    }

    pub fn max_selection(&self) -> usize {
        self.boss.max_selection(self.config.round.max_selection)
    }

    pub fn has_pending_score(&self) -> bool {
        self.outstanding.is_some()
    }

    pub(super) fn boss_view(&self) -> BossView {
        BossView {
            round_score: self.state.round_score,
            target: self.state.target,
            hands_left: self.state.hands_left,
        }
    }

    pub(super) fn issue_pending(&mut self, result: ScoreResult) -> PendingScore {
        self.next_seq += 1;
        self.outstanding = Some(self.next_seq);
        PendingScore {
            seq: self.next_seq,
            result,
        }
    }

    pub(super) fn redeem_pending(&mut self, pending: PendingScore) -> Result<ScoreResult, RunError> {
        if self.outstanding != Some(pending.seq) {
            return Err(RunError::StaleScore);
        }
        self.outstanding = None;
        Ok(pending.result)
    }

    pub(super) fn ensure_phase(&self, phase: Phase) -> Result<(), RunError> {
        if self.state.phase != phase {
            return Err(RunError::InvalidPhase(self.state.phase));
        }
        Ok(())
    }

    /// Marks the run over when the deck cannot cover a draw.
    pub(super) fn fatal(&mut self, err: DeckError, events: &mut EventBus) -> RunError {
        if matches!(err, DeckError::DeckExhausted { .. }) {
            self.state.phase = Phase::GameOver;
            self.outstanding = None;
            events.push(Event::GameOver {
                reason: err.to_string(),
            });
        }
        RunError::Deck(err)
    }
}
