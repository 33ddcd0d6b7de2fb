//! Card Duel Engine - turn engine for standard-deck duel games
//!
//! A 52-card deck doubles as a resource pool and an action pool. Each card is
//! played either for its face value (currency) or as a suit maneuver, and a
//! shared market of cards can be bought into a player's deck.

pub mod core;
pub mod error;
pub mod game;
pub mod pool;
pub mod rules;
pub mod tournament;
pub mod zones;

pub use error::{DuelError, Result};
