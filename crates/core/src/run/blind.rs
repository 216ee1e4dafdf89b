use super::*;
use crate::*;

impl RunState {
    pub fn start_blind(
        &mut self,
        ante: u8,
        blind: BlindKind,
        events: &mut EventBus,
    ) -> Result<(), RunError> {
        let target = self
            .config
            .target_for(ante, blind)
            .ok_or(RunError::MissingAnteRule(ante))?;
        let boss = if blind == BlindKind::Boss {
            let roster = &self.config.blind_bosses;
            self.rng
                .pick_index(roster.len())
                .and_then(|idx| roster.get(idx))
                .cloned()
        } else {
            None
        };
        self.rush = None;
        self.state.ante = ante;
        self.begin_encounter(blind, target, boss, events)
    }

    pub fn start_current_blind(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.start_blind(self.state.ante, self.state.blind, events)
    }

    pub fn advance_blind(&mut self) -> Result<(), RunError> {
        let (next_ante, next_blind) = match self.state.blind {
            BlindKind::Small => (self.state.ante, BlindKind::Big),
            BlindKind::Big => (self.state.ante, BlindKind::Boss),
            BlindKind::Boss => (self.state.ante.saturating_add(1), BlindKind::Small),
        };

        if self.config.ante_rule(next_ante).is_none() {
            return Err(RunError::MissingAnteRule(next_ante));
        }

        self.state.ante = next_ante;
        self.state.blind = next_blind;
        Ok(())
    }

    pub fn start_next_blind(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.ensure_phase(Phase::Cleared)?;
        self.advance_blind()?;
        self.start_current_blind(events)
    }

    /// Starts a boss rush at `index`; an index past the roster starts at the first boss.
    pub fn start_boss_rush(&mut self, index: usize, events: &mut EventBus) -> Result<(), RunError> {
        let index = if index < self.config.boss_rush.len() {
            index
        } else {
            0
        };
        self.rush = Some(BossRush { index, defeated: 0 });
        self.start_rush_boss(events)
    }

    pub fn next_rush_boss(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.ensure_phase(Phase::Cleared)?;
        self.start_rush_boss(events)
    }

    fn start_rush_boss(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        let rush = self.rush.ok_or(RunError::NoBossRush)?;
        let def = boss_at(&self.config.boss_rush, rush.index)
            .cloned()
            .ok_or(RunError::NoBossRush)?;
        let target = def.target;
        self.begin_encounter(BlindKind::Boss, target, Some(def), events)
    }

    fn begin_encounter(
        &mut self,
        blind: BlindKind,
        target: i64,
        boss: Option<BossDef>,
        events: &mut EventBus,
    ) -> Result<(), RunError> {
        let hands = self.config.round.hands;
        let discards = self.config.round.discards;
        self.state.reset_round(blind, target, hands, discards);
        self.state.hand_size = self.config.round.hand_size;
        self.outstanding = None;
        self.inventory.enable_all();
        self.boss = match boss {
            Some(def) => BossMachine::engage(def, target, self.config.boss_tuning.clone()),
            None => BossMachine::inactive(),
        };

        self.deck = create_deck(&self.deck_context);
        self.deck.shuffle(&mut self.rng);

        events.push(Event::BlindStarted {
            ante: self.state.ante,
            blind,
            target,
            hands,
            discards,
        });
        if let Some(def) = self.boss.def() {
            events.push(Event::BossEngaged {
                name: def.name.clone(),
                ability: def.ability,
                target,
            });
        }

        let deal = self.boss.initial_hand_size(self.state.hand_size);
        match self.deck.deal(deal) {
            Ok(dealt) => {
                events.push(Event::HandDealt { count: dealt.len() });
                Ok(())
            }
            Err(err) => Err(self.fatal(err, events)),
        }
    }

    pub fn blind_outcome(&self) -> Option<BlindOutcome> {
        if self.state.cleared() {
            Some(BlindOutcome::Cleared)
        } else if self.state.hands_left == 0 && !self.heat.unlimited_hands() {
            Some(BlindOutcome::Failed)
        } else {
            None
        }
    }

    pub(super) fn check_outcome(&mut self, events: &mut EventBus) -> Option<BlindOutcome> {
        match self.blind_outcome() {
            Some(BlindOutcome::Cleared) => {
                self.state.phase = Phase::Cleared;
                if self.rush.is_some() {
                    self.defeat_rush_boss(events);
                } else {
                    let reward = self.reward_for_clear();
                    self.state.money += reward;
                    events.push(Event::BlindCleared {
                        score: self.state.round_score,
                        reward,
                        money: self.state.money,
                    });
                }
                Some(BlindOutcome::Cleared)
            }
            Some(BlindOutcome::Failed) => {
                self.fail_blind(events);
                Some(BlindOutcome::Failed)
            }
            None => None,
        }
    }

    pub(super) fn fail_blind(&mut self, events: &mut EventBus) {
        self.state.phase = Phase::Failed;
        events.push(Event::BlindFailed {
            score: self.state.round_score,
        });
    }

    /// Base cash for the blind plus up to `overkill_cap` for beating the target
    /// by a wide margin.
    pub(super) fn reward_for_clear(&self) -> i64 {
        let economy = &self.config.economy;
        let base = self.config.blind_reward(self.state.blind);
        if self.state.target <= 0 {
            return base;
        }
        let cap = economy.overkill_cap as f64;
        let over = (self.state.round_score - self.state.target) as f64 / self.state.target as f64;
        let bonus = (over * cap).clamp(0.0, cap).round_ties_even() as i64;
        base + bonus
    }

    fn defeat_rush_boss(&mut self, events: &mut EventBus) {
        let Some(rush) = self.rush.as_mut() else {
            return;
        };
        let economy = &self.config.economy;
        let souls = economy.rush_souls_base + economy.rush_souls_step * rush.index as i64;
        self.state.souls += souls;
        self.state.money += economy.rush_cash;
        let name = self
            .boss
            .def()
            .map(|def| def.name.clone())
            .unwrap_or_default();
        events.push(Event::BossDefeated {
            name,
            souls,
            money: self.state.money,
        });
        rush.defeated += 1;
        rush.index += 1;
        if rush.index >= self.config.boss_rush.len() {
            self.state.phase = Phase::Won;
            events.push(Event::RushWon {
                bosses: rush.defeated,
            });
        }
    }
}
