use super::*;
use crate::*;

impl RunState {
    /// One idle step: heat burns down and timed boss abilities advance.
    pub fn tick(&mut self, events: &mut EventBus) -> Option<BlindOutcome> {
        let step = self.heat.tick(&self.config.heat);
        let cooled = step.is_some();
        if let Some(step) = step {
            events.push(Event::Heat(step));
        }
        if self.state.phase != Phase::Play {
            return None;
        }
        // Losing tier 3 can leave the round with no hands.
        if cooled {
            if let Some(outcome) = self.check_outcome(events) {
                return Some(outcome);
            }
        }
        let view = self.boss_view();
        let directives = self.boss.on_tick(view);
        self.apply_boss_directives(&directives, events)
    }

    /// Carries out boss side effects. Returns an outcome if one of them ended
    /// the round.
    pub(super) fn apply_boss_directives(
        &mut self,
        directives: &[BossDirective],
        events: &mut EventBus,
    ) -> Option<BlindOutcome> {
        for directive in directives {
            match *directive {
                BossDirective::ForceDiscard { count } => {
                    let gone = self.deck.discard_random_from_hand(count, &mut self.rng);
                    if !gone.is_empty() {
                        events.push(Event::CardsDiscarded {
                            cards: gone.iter().map(|card| card.id).collect(),
                            forced: true,
                        });
                    }
                    if self.deck.hand.is_empty() {
                        self.fail_blind(events);
                        return Some(BlindOutcome::Failed);
                    }
                }
                BossDirective::DiscardHeld { count } => {
                    let gone = self.deck.discard_random_held(count, &mut self.rng);
                    if !gone.is_empty() {
                        events.push(Event::CardsDiscarded {
                            cards: gone.iter().map(|card| card.id).collect(),
                            forced: true,
                        });
                    }
                }
                BossDirective::DisableRandomJoker => {
                    if let Some(joker) = self.inventory.disable_random_joker(&mut self.rng) {
                        events.push(Event::JokerDisabled { joker });
                    }
                }
                BossDirective::SetTarget(target) => {
                    self.state.target = target;
                    events.push(Event::TargetChanged { target });
                }
                BossDirective::PhaseChanged(phase) => {
                    events.push(Event::BossPhase { phase });
                }
            }
        }
        None
    }
}
