use crate::{Card, CardId, ConsumableOutcome, Enhancement, Rank, RngState, Suit};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("deck exhausted: needed {needed} cards, {available} left")]
    DeckExhausted { needed: usize, available: usize },
    #[error("invalid card selection")]
    InvalidSelection,
    #[error("unknown card {0}")]
    UnknownCardMutation(CardId),
}

/// Enhancements pre-assigned to suit/rank pairs when a deck is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeckContext {
    #[serde(default)]
    pub enhancements: Vec<(Suit, Rank, Enhancement)>,
}

impl DeckContext {
    pub fn with_enhancement(mut self, suit: Suit, rank: Rank, enhancement: Enhancement) -> Self {
        self.enhancements.push((suit, rank, enhancement));
        self
    }

    fn enhancement_for(&self, suit: Suit, rank: Rank) -> Enhancement {
        self.enhancements
            .iter()
            .rev()
            .find(|(s, r, _)| *s == suit && *r == rank)
            .map(|(_, _, enhancement)| *enhancement)
            .unwrap_or_default()
    }
}

/// Every live card sits in exactly one of `draw`, `hand` or `discard`;
/// removed cards move to `destroyed` and never come back.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub draw: Vec<Card>,
    pub hand: Vec<Card>,
    pub discard: Vec<Card>,
    pub destroyed: Vec<Card>,
    next_id: u32,
}

pub fn create_deck(context: &DeckContext) -> Deck {
    let mut draw = Vec::with_capacity(52);
    let mut next_id = 1;
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            let card = Card::new(CardId(next_id), suit, rank)
                .with_enhancement(context.enhancement_for(suit, rank));
            draw.push(card);
            next_id += 1;
        }
    }
    Deck {
        draw,
        hand: Vec::new(),
        discard: Vec::new(),
        destroyed: Vec::new(),
        next_id,
    }
}

impl Deck {
    pub fn standard52() -> Self {
        create_deck(&DeckContext::default())
    }

    pub fn shuffle(&mut self, rng: &mut RngState) {
        rng.shuffle(&mut self.draw);
    }

    /// Live cards across draw, hand and discard.
    pub fn card_count(&self) -> usize {
        self.draw.len() + self.hand.len() + self.discard.len()
    }

    pub fn find(&self, id: CardId) -> Option<&Card> {
        self.draw
            .iter()
            .chain(self.hand.iter())
            .chain(self.discard.iter())
            .find(|card| card.id == id)
    }

    /// Moves `count` cards from the top of the draw pile into the hand.
    pub fn deal(&mut self, count: usize) -> Result<Vec<CardId>, DeckError> {
        if self.draw.len() < count {
            return Err(DeckError::DeckExhausted {
                needed: count,
                available: self.draw.len(),
            });
        }
        let mut dealt = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(mut card) = self.draw.pop() {
                card.selected = false;
                dealt.push(card.id);
                self.hand.push(card);
            }
        }
        Ok(dealt)
    }

    pub fn fill_hand(&mut self, hand_size: usize) -> Result<Vec<CardId>, DeckError> {
        self.deal(hand_size.saturating_sub(self.hand.len()))
    }

    /// Replaces the selection with the given hand positions.
    pub fn select_indices(&mut self, indices: &[usize], cap: usize) -> Result<(), DeckError> {
        if indices.len() > cap {
            return Err(DeckError::InvalidSelection);
        }
        let mut seen = vec![false; self.hand.len()];
        for &idx in indices {
            if idx >= self.hand.len() || seen[idx] {
                return Err(DeckError::InvalidSelection);
            }
            seen[idx] = true;
        }
        for (card, picked) in self.hand.iter_mut().zip(seen) {
            card.selected = picked;
        }
        Ok(())
    }

    pub fn toggle_select(&mut self, id: CardId, cap: usize) -> Result<bool, DeckError> {
        let selected = self.selected_count();
        let card = self
            .hand
            .iter_mut()
            .find(|card| card.id == id)
            .ok_or(DeckError::InvalidSelection)?;
        if !card.selected && selected >= cap {
            return Err(DeckError::InvalidSelection);
        }
        card.selected = !card.selected;
        Ok(card.selected)
    }

    pub fn clear_selection(&mut self) {
        for card in &mut self.hand {
            card.selected = false;
        }
    }

    pub fn selected_count(&self) -> usize {
        self.hand.iter().filter(|card| card.selected).count()
    }

    pub fn selected_cards(&self) -> Vec<Card> {
        self.hand.iter().filter(|card| card.selected).copied().collect()
    }

    pub fn held_cards(&self) -> Vec<Card> {
        self.hand.iter().filter(|card| !card.selected).copied().collect()
    }

    /// Discards the selection and refills the hand to `hand_size`. Fails
    /// without touching any pile if the draw pile cannot cover the refill.
    pub fn discard_and_redraw(&mut self, hand_size: usize) -> Result<Vec<Card>, DeckError> {
        let kept = self.hand.len() - self.selected_count();
        let needed = hand_size.saturating_sub(kept);
        if self.draw.len() < needed {
            return Err(DeckError::DeckExhausted {
                needed,
                available: self.draw.len(),
            });
        }
        let discarded = self.take_where(|card| card.selected);
        self.discard.extend(discarded.iter().copied());
        self.deal(needed)?;
        Ok(discarded)
    }

    /// Moves the selection out of the hand. Cards listed in `destroyed` are
    /// removed for good; the rest go to the discard pile.
    pub fn play_selected(&mut self, destroyed: &[CardId]) -> Vec<Card> {
        let played = self.take_where(|card| card.selected);
        for card in &played {
            if destroyed.contains(&card.id) {
                let mut gone = *card;
                gone.destroyed = true;
                self.destroyed.push(gone);
            } else {
                self.discard.push(*card);
            }
        }
        played
    }

    /// Moves specific hand cards to the discard pile.
    pub fn discard_ids(&mut self, ids: &[CardId]) -> Vec<Card> {
        let discarded = self.take_where(|card| ids.contains(&card.id));
        self.discard.extend(discarded.iter().copied());
        discarded
    }

    /// Discards up to `count` random cards from the whole hand.
    pub fn discard_random_from_hand(&mut self, count: usize, rng: &mut RngState) -> Vec<Card> {
        self.discard_random_where(count, rng, |_| true)
    }

    /// Discards up to `count` random unselected cards.
    pub fn discard_random_held(&mut self, count: usize, rng: &mut RngState) -> Vec<Card> {
        self.discard_random_where(count, rng, |card| !card.selected)
    }

    fn discard_random_where<F>(&mut self, count: usize, rng: &mut RngState, eligible: F) -> Vec<Card>
    where
        F: Fn(&Card) -> bool,
    {
        let mut ids = Vec::new();
        for _ in 0..count {
            let candidates: Vec<CardId> = self
                .hand
                .iter()
                .filter(|card| eligible(card) && !ids.contains(&card.id))
                .map(|card| card.id)
                .collect();
            match rng.pick_index(candidates.len()) {
                Some(idx) => ids.push(candidates[idx]),
                None => break,
            }
        }
        self.discard_ids(&ids)
    }

    /// Removes a card permanently from whichever pile holds it. Returns false
    /// if it was already destroyed or never existed.
    pub fn destroy(&mut self, id: CardId) -> bool {
        for pile in [&mut self.draw, &mut self.hand, &mut self.discard] {
            if let Some(pos) = pile.iter().position(|card| card.id == id) {
                let mut card = pile.remove(pos);
                card.destroyed = true;
                card.selected = false;
                self.destroyed.push(card);
                return true;
            }
        }
        false
    }

    /// Applies a consumable result. Unknown mutated ids are logged and skipped;
    /// the skipped ids come back as errors for the caller to report.
    pub fn apply_outcome(&mut self, outcome: &ConsumableOutcome) -> Vec<DeckError> {
        let mut skipped = Vec::new();
        for mutated in &outcome.mutated {
            match self.card_mut(mutated.id) {
                Some(card) => {
                    card.suit = mutated.suit;
                    card.set_rank(mutated.rank);
                    card.enhancement = mutated.enhancement;
                }
                None => {
                    tracing::warn!(card = %mutated.id, "ignoring mutation of unknown card");
                    skipped.push(DeckError::UnknownCardMutation(mutated.id));
                }
            }
        }
        for id in &outcome.removed {
            if !self.destroy(*id) {
                tracing::warn!(card = %id, "ignoring removal of unknown card");
                skipped.push(DeckError::UnknownCardMutation(*id));
            }
        }
        for created in &outcome.created {
            let card = Card::new(self.fresh_id(), created.suit, created.rank)
                .with_enhancement(created.enhancement);
            self.hand.push(card);
        }
        skipped
    }

    fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.draw
            .iter_mut()
            .chain(self.hand.iter_mut())
            .chain(self.discard.iter_mut())
            .find(|card| card.id == id)
    }

    fn fresh_id(&mut self) -> CardId {
        let id = CardId(self.next_id);
        self.next_id += 1;
        id
    }

    fn take_where<F>(&mut self, predicate: F) -> Vec<Card>
    where
        F: Fn(&Card) -> bool,
    {
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.hand.len());
        for mut card in self.hand.drain(..) {
            if predicate(&card) {
                card.selected = false;
                taken.push(card);
            } else {
                kept.push(card);
            }
        }
        self.hand = kept;
        taken
    }
}
