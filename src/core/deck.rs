//! Deck construction

use crate::core::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A run of identical cards in a starter deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarterEntry {
    pub card: Card,
    pub count: usize,
}

/// Fixed composition of a player's opening deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarterRule {
    pub entries: Vec<StarterEntry>,
}

impl StarterRule {
    pub fn new(entries: Vec<StarterEntry>) -> Self {
        StarterRule { entries }
    }

    /// 7 of `primary` and 3 of `secondary`, the shape every variant uses
    pub fn seven_three(primary: Card, secondary: Card) -> Self {
        StarterRule {
            entries: vec![
                StarterEntry {
                    card: primary,
                    count: 7,
                },
                StarterEntry {
                    card: secondary,
                    count: 3,
                },
            ],
        }
    }

    /// 7 Engineers (2♣) and 3 Marines (2♠)
    pub fn engineers_and_marines() -> Self {
        Self::seven_three(Card::new(Suit::Clubs, Rank::Two), Card::new(Suit::Spades, Rank::Two))
    }

    pub fn total_cards(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }
}

/// All 52 (suit, rank) pairs in suit-major order, unshuffled
pub fn standard_cards() -> Vec<Card> {
    Suit::ALL
        .iter()
        .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(suit, rank)))
        .collect()
}

/// A full 52-card deck, uniformly shuffled
pub fn create_standard_deck(rng: &mut impl Rng) -> Vec<Card> {
    let mut deck = standard_cards();
    deck.shuffle(rng);
    deck
}

/// A starter deck built from `rule`, uniformly shuffled
pub fn create_starter_deck(rule: &StarterRule, rng: &mut impl Rng) -> Vec<Card> {
    let mut deck: Vec<Card> = rule
        .entries
        .iter()
        .flat_map(|entry| std::iter::repeat(entry.card).take(entry.count))
        .collect();
    deck.shuffle(rng);
    deck
}
