//! Card types and definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four suits of a standard deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub fn symbol(&self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Suit::Clubs => "Clubs",
            Suit::Diamonds => "Diamonds",
            Suit::Hearts => "Hearts",
            Suit::Spades => "Spades",
        }
    }
}

/// Card ranks, 2 through Ace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Numeric value for 2-10, None for face ranks
    pub fn pip_value(&self) -> Option<u32> {
        match self {
            Rank::Two => Some(2),
            Rank::Three => Some(3),
            Rank::Four => Some(4),
            Rank::Five => Some(5),
            Rank::Six => Some(6),
            Rank::Seven => Some(7),
            Rank::Eight => Some(8),
            Rank::Nine => Some(9),
            Rank::Ten => Some(10),
            Rank::Jack | Rank::Queen | Rank::King | Rank::Ace => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

/// A playing card
///
/// Cards carry no identity beyond suit and rank, so duplicates are
/// interchangeable. They are created once at deck construction and then only
/// move between piles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Card { suit, rank }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.symbol())
    }
}

/// Face value lookup for the face ranks
///
/// Numeric ranks always map 1:1 to 2-10. Only J/Q/K/A differ between game
/// variants, so those are the configurable part. The mapping is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceValueTable {
    pub jack: u32,
    pub queen: u32,
    pub king: u32,
    pub ace: u32,
}

impl FaceValueTable {
    /// J=5, Q=6, K=7, A=8 (resource-game variants)
    pub const fn salvage() -> Self {
        FaceValueTable {
            jack: 5,
            queen: 6,
            king: 7,
            ace: 8,
        }
    }

    /// J/Q/K=10, A=11 (fantasy duel variant)
    pub const fn blackjack() -> Self {
        FaceValueTable {
            jack: 10,
            queen: 10,
            king: 10,
            ace: 11,
        }
    }

    pub fn rank_value(&self, rank: Rank) -> u32 {
        match rank {
            Rank::Jack => self.jack,
            Rank::Queen => self.queen,
            Rank::King => self.king,
            Rank::Ace => self.ace,
            numeric => numeric.pip_value().unwrap_or(0),
        }
    }

    pub fn face_value(&self, card: Card) -> u32 {
        self.rank_value(card.rank)
    }
}

impl Default for FaceValueTable {
    fn default() -> Self {
        Self::salvage()
    }
}
