//! Suit maneuvers and the suit-to-effect table

use crate::core::Suit;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// What a card does when played as a maneuver instead of a resource
///
/// `DrawCard` and `PoolSearch` resolve immediately. `Attack` and `Repair`
/// only bump a per-turn counter that the combat resolver reads later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManeuverEffect {
    /// Draw one card from the player's own deck
    DrawCard,
    /// Reveal cards from the shared pool and keep one
    PoolSearch,
    /// Schedule one attack counter
    Attack,
    /// Schedule one repair counter
    Repair,
}

impl ManeuverEffect {
    pub fn describe(&self) -> &'static str {
        match self {
            ManeuverEffect::DrawCard => "draw a card",
            ManeuverEffect::PoolSearch => "search the pool",
            ManeuverEffect::Attack => "schedule an attack",
            ManeuverEffect::Repair => "schedule a repair",
        }
    }
}

/// Lookup from suit to maneuver effect
///
/// A suit with no entry has no maneuver; playing it as one is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuitEffectTable {
    effects: FxHashMap<Suit, ManeuverEffect>,
}

impl SuitEffectTable {
    pub fn new() -> Self {
        SuitEffectTable {
            effects: FxHashMap::default(),
        }
    }

    /// Clubs=Engineer draw, Diamonds=Scientist search, Hearts=Medic, Spades=Marine
    pub fn starship() -> Self {
        Self::new()
            .with(Suit::Clubs, ManeuverEffect::DrawCard)
            .with(Suit::Diamonds, ManeuverEffect::PoolSearch)
            .with(Suit::Hearts, ManeuverEffect::Repair)
            .with(Suit::Spades, ManeuverEffect::Attack)
    }

    /// Spades=Weapon, Hearts=Shield/heal, Clubs=Dagger quick draw, Diamonds=Potion search
    pub fn dungeon() -> Self {
        Self::new()
            .with(Suit::Spades, ManeuverEffect::Attack)
            .with(Suit::Hearts, ManeuverEffect::Repair)
            .with(Suit::Clubs, ManeuverEffect::DrawCard)
            .with(Suit::Diamonds, ManeuverEffect::PoolSearch)
    }

    pub fn with(mut self, suit: Suit, effect: ManeuverEffect) -> Self {
        self.effects.insert(suit, effect);
        self
    }

    pub fn effect_for(&self, suit: Suit) -> Option<ManeuverEffect> {
        self.effects.get(&suit).copied()
    }

    /// Suits that map to `effect`, in suit order
    pub fn suits_for(&self, effect: ManeuverEffect) -> Vec<Suit> {
        Suit::ALL
            .iter()
            .copied()
            .filter(|suit| self.effect_for(*suit) == Some(effect))
            .collect()
    }
}

impl Default for SuitEffectTable {
    fn default() -> Self {
        Self::starship()
    }
}
