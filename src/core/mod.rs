//! Core game types: cards, decks, players and maneuvers

pub mod card;
pub mod deck;
pub mod effects;
pub mod player;
pub mod types;

pub use card::{Card, FaceValueTable, Rank, Suit};
pub use deck::{create_standard_deck, create_starter_deck, standard_cards, StarterEntry, StarterRule};
pub use effects::{ManeuverEffect, SuitEffectTable};
pub use player::Player;
pub use types::{PlayerId, PlayerName};
