//! Shared replenishable pool (tech bay / treasure room)
//!
//! A fixed row of purchasable slots backed by the pool's own draw pile and a
//! recycle pile for cards passed over during a search. Neither pile belongs
//! to a player.

use crate::core::{Card, FaceValueTable};
use crate::zones::Pile;
use crate::{DuelError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Cards revealed by a pool search
pub type Revealed = SmallVec<[Card; 4]>;

/// Result of a successful purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Purchase {
    pub slot: usize,
    pub card: Card,
    pub cost: u32,
    /// Card that refilled the slot, None if the pool ran dry
    pub refill: Option<Card>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedPool {
    deck: Pile,
    discard: Pile,
    slots: Vec<Option<Card>>,
}

impl SharedPool {
    /// Build a pool from its backing deck and deal one card into each slot
    pub fn new(deck: Vec<Card>, slot_count: usize, rng: &mut impl Rng) -> Self {
        let mut pool = SharedPool {
            deck: Pile::from_cards(deck),
            discard: Pile::new(),
            slots: Vec::with_capacity(slot_count),
        };
        for _ in 0..slot_count {
            let card = pool.draw_from_pool(rng);
            pool.slots.push(card);
        }
        pool
    }

    /// Draw one card from the pool deck, recycling the pool discard if needed
    pub fn draw_from_pool(&mut self, rng: &mut impl Rng) -> Option<Card> {
        if self.deck.is_empty() && !self.discard.is_empty() {
            let recycled = self.discard.take_all();
            self.deck.extend(recycled);
            self.deck.shuffle(rng);
        }
        self.deck.draw_front()
    }

    pub fn slots(&self) -> &[Option<Card>] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<Card> {
        self.slots.get(index).copied().flatten()
    }

    pub fn occupied_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    /// Cards held anywhere in the pool (deck, recycle pile and slots)
    pub fn total_cards(&self) -> usize {
        self.deck.len() + self.discard.len() + self.occupied_slots()
    }

    /// Every pool card: deck, recycle pile, then occupied slots
    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.deck
            .iter()
            .chain(self.discard.iter())
            .copied()
            .chain(self.slots.iter().flatten().copied())
    }

    /// Cheapest occupied slot as (index, cost)
    pub fn cheapest(&self, table: &FaceValueTable) -> Option<(usize, u32)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|card| (i, table.face_value(card))))
            .min_by_key(|&(i, cost)| (cost, i))
    }

    /// Buy the card in `slot`
    ///
    /// On success the cost comes out of `currency`, the card goes to
    /// `buyer_discard` and the slot is refilled straight away. A slot that
    /// cannot be refilled is left empty. On failure nothing changes.
    pub fn purchase(
        &mut self,
        slot: usize,
        currency: &mut u32,
        table: &FaceValueTable,
        buyer_discard: &mut Pile,
        rng: &mut impl Rng,
    ) -> Result<Purchase> {
        let card = self.slot(slot).ok_or(DuelError::InvalidSlot(slot))?;
        let cost = table.face_value(card);
        if *currency < cost {
            return Err(DuelError::InsufficientFunds {
                cost,
                available: *currency,
            });
        }

        *currency -= cost;
        buyer_discard.add(card);
        let refill = self.draw_from_pool(rng);
        self.slots[slot] = refill;

        Ok(Purchase {
            slot,
            card,
            cost,
            refill,
        })
    }

    /// Reveal up to `count` cards from the pool deck
    ///
    /// Fewer come back when the pool is exhausted.
    pub fn reveal(&mut self, count: usize, rng: &mut impl Rng) -> Revealed {
        let mut revealed = Revealed::new();
        for _ in 0..count {
            match self.draw_from_pool(rng) {
                Some(card) => revealed.push(card),
                None => break,
            }
        }
        revealed
    }

    /// Keep `chosen` out of a search and recycle the rest
    ///
    /// An empty reveal is a no-op. An out-of-range choice is rejected and
    /// leaves `revealed` untouched so the caller can pick again.
    pub fn resolve_search(&mut self, revealed: &mut Revealed, chosen: usize) -> Result<Option<Card>> {
        if revealed.is_empty() {
            return Ok(None);
        }
        if chosen >= revealed.len() {
            return Err(DuelError::InvalidSelection(format!(
                "search choice {} out of 0-{}",
                chosen,
                revealed.len() - 1
            )));
        }
        let kept = revealed.remove(chosen);
        self.discard.extend(revealed.drain(..));
        Ok(Some(kept))
    }

    /// Put cards on the pool's recycle pile
    pub fn discard(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.discard.extend(cards);
    }
}
