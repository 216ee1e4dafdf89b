use super::*;
use crate::*;

impl RunState {
    pub fn activate_heat(&mut self, events: &mut EventBus) -> bool {
        match self.heat.activate(&self.config.heat) {
            Some(step) => {
                events.push(Event::Heat(step));
                true
            }
            None => false,
        }
    }

    /// Spends souls to reopen a failed blind. A second attempt in the same
    /// blind forfeits every soul.
    pub fn revive(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.ensure_phase(Phase::Failed)?;
        if self.state.revived_this_blind {
            self.state.souls = 0;
            return Err(RunError::AlreadyRevived);
        }
        let cost = self.config.economy.revive_cost;
        if self.state.souls < cost {
            return Err(RunError::NotEnoughSouls {
                needed: cost,
                have: self.state.souls,
            });
        }
        self.state.souls -= cost;
        self.state.revived_this_blind = true;
        self.state.hands_left = self.config.economy.revive_hands;
        self.state.discards_left = self.config.economy.revive_discards;
        self.state.phase = Phase::Play;
        events.push(Event::Revived {
            souls: self.state.souls,
        });

        if let Err(err) = self.deck.fill_hand(self.state.hand_size) {
            return Err(self.fatal(err, events));
        }
        let view = self.boss_view();
        let directives = self.boss.observe(view);
        self.apply_boss_directives(&directives, events);
        Ok(())
    }

    pub fn add_joker(&mut self, kind: JokerKind) -> Result<(), RunError> {
        self.inventory.add_joker(kind)?;
        Ok(())
    }

    pub fn add_consumable(&mut self, consumable: Consumable) -> Result<(), RunError> {
        self.inventory.add_consumable(consumable)?;
        Ok(())
    }

    /// Uses a held consumable. Planets level their hand directly; tarots go to
    /// `resolver` with the current selection as targets.
    pub fn use_consumable(
        &mut self,
        index: usize,
        resolver: &mut dyn ConsumableResolver,
        events: &mut EventBus,
    ) -> Result<Vec<DeckError>, RunError> {
        if matches!(self.state.phase, Phase::Score | Phase::GameOver | Phase::Won) {
            return Err(RunError::InvalidPhase(self.state.phase));
        }
        let consumable = self.inventory.take_consumable(index)?;
        events.push(Event::ConsumableUsed {
            name: consumable.name().to_string(),
        });
        let skipped = match &consumable {
            Consumable::Planet(planet) => {
                self.levels.apply_planet(*planet);
                Vec::new()
            }
            Consumable::Tarot(name) => {
                let targets = self.deck.selected_cards();
                let outcome = resolver.apply(name, &targets);
                self.apply_consumable_outcome(&outcome, events)
            }
        };
        self.inventory.record_use(&consumable);
        Ok(skipped)
    }

    /// Applies a resolver result: card changes first, then the inventory follow-up.
    pub fn apply_consumable_outcome(
        &mut self,
        outcome: &ConsumableOutcome,
        events: &mut EventBus,
    ) -> Vec<DeckError> {
        let skipped = self.deck.apply_outcome(outcome);
        let removed: Vec<CardId> = outcome
            .removed
            .iter()
            .copied()
            .filter(|id| !skipped.contains(&DeckError::UnknownCardMutation(*id)))
            .collect();
        if !removed.is_empty() {
            events.push(Event::CardsDestroyed { cards: removed });
        }
        match outcome.special {
            Some(SpecialEffect::CreateJoker) => {
                if let Some(joker) = self.inventory.create_random_joker(&mut self.rng) {
                    events.push(Event::JokerCreated { joker });
                }
            }
            Some(SpecialEffect::CreateConsumables(count)) => {
                let names = self.inventory.create_random_tarots(
                    &self.config.tarots,
                    count as usize,
                    &mut self.rng,
                );
                if !names.is_empty() {
                    events.push(Event::ConsumablesCreated { names });
                }
            }
            Some(SpecialEffect::RecreateLast) => {
                if let Some(last) = self.inventory.recreate_last() {
                    events.push(Event::ConsumablesCreated {
                        names: vec![last.name().to_string()],
                    });
                }
            }
            None => {}
        }
        skipped
    }
}
