//! Card piles (deck, hand, in-play, discard) and the per-player draw engine

use crate::core::Card;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// An ordered pile of cards
///
/// Draws come off the front; discards and reshuffles append to the back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pile {
    cards: VecDeque<Card>,
}

impl Pile {
    pub fn new() -> Self {
        Pile {
            cards: VecDeque::new(),
        }
    }

    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Pile {
            cards: cards.into_iter().collect(),
        }
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    pub fn extend(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
    }

    /// Take the front card
    pub fn draw_front(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    pub fn peek_front(&self) -> Option<Card> {
        self.cards.front().copied()
    }

    /// Remove the card at `index`, keeping the order of the rest
    pub fn remove_at(&mut self, index: usize) -> Option<Card> {
        self.cards.remove(index)
    }

    pub fn get(&self, index: usize) -> Option<Card> {
        self.cards.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn to_vec(&self) -> Vec<Card> {
        self.cards.iter().copied().collect()
    }

    /// Remove every card, returning them in order
    pub fn take_all(&mut self) -> Vec<Card> {
        self.cards.drain(..).collect()
    }

    /// Uniform in-place shuffle
    pub fn shuffle(&mut self, rng: &mut impl Rng) {
        self.cards.make_contiguous().shuffle(rng);
    }
}

/// Outcome of a draw request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawReport {
    /// Cards actually moved into the hand
    pub drawn: usize,
    /// Whether the discard was shuffled back into the deck along the way
    pub reshuffled: bool,
}

impl DrawReport {
    /// True when fewer cards came out than were asked for
    pub fn exhausted(&self, requested: usize) -> bool {
        self.drawn < requested
    }
}

/// Collection of all piles owned by one player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerZones {
    pub deck: Pile,
    pub hand: Pile,
    /// Cards played this turn; they join the discard at end of turn
    pub in_play: Pile,
    pub discard: Pile,
}

impl PlayerZones {
    pub fn new(deck: Vec<Card>) -> Self {
        PlayerZones {
            deck: Pile::from_cards(deck),
            ..Default::default()
        }
    }

    /// Draw up to `n` cards into the hand
    ///
    /// An empty deck is refilled by shuffling the discard into it. When both
    /// are empty the draw stops early; that is a normal state, not an error.
    pub fn draw(&mut self, n: usize, rng: &mut impl Rng) -> DrawReport {
        let mut report = DrawReport::default();
        for _ in 0..n {
            if self.deck.is_empty() {
                if self.discard.is_empty() {
                    break;
                }
                let recycled = self.discard.take_all();
                self.deck.extend(recycled);
                self.deck.shuffle(rng);
                report.reshuffled = true;
            }
            if let Some(card) = self.deck.draw_front() {
                self.hand.add(card);
                report.drawn += 1;
            }
        }
        report
    }

    /// Move a hand card into the in-play pile
    pub fn play_from_hand(&mut self, index: usize) -> Option<Card> {
        let card = self.hand.remove_at(index)?;
        self.in_play.add(card);
        Some(card)
    }

    /// Move the whole hand and everything played this turn to the discard
    pub fn discard_hand(&mut self) -> usize {
        let hand = self.hand.take_all();
        let played = self.in_play.take_all();
        let moved = hand.len() + played.len();
        self.discard.extend(hand);
        self.discard.extend(played);
        moved
    }

    pub fn total_cards(&self) -> usize {
        self.deck.len() + self.hand.len() + self.in_play.len() + self.discard.len()
    }
}
