//! Player representation

use crate::core::{PlayerId, PlayerName};
use crate::zones::PlayerZones;
use serde::{Deserialize, Serialize};

/// A combatant: primary resource (hull/health), mitigation (shield/temp
/// health), piles, and the currency earned this turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Seat id
    pub id: PlayerId,

    /// Player name
    pub name: PlayerName,

    /// Primary resource; the player is defeated at 0 or below
    pub primary: i32,

    /// Repair cap for the primary resource
    pub max_primary: i32,

    /// Mitigation absorbed before the primary resource takes damage
    pub mitigation: u32,

    /// Currency earned from resource plays this turn
    pub currency: u32,

    /// Deck, hand, in-play and discard piles
    pub zones: PlayerZones,
}

impl Player {
    pub fn new(
        id: PlayerId,
        name: impl Into<PlayerName>,
        starting_primary: i32,
        max_primary: i32,
        zones: PlayerZones,
    ) -> Self {
        Player {
            id,
            name: name.into(),
            primary: starting_primary,
            max_primary,
            mitigation: 0,
            currency: 0,
            zones,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.primary <= 0
    }

    /// Restore primary resource up to the cap; returns the amount applied
    pub fn repair(&mut self, amount: u32) -> i32 {
        let before = self.primary;
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.primary = self.primary.saturating_add(amount).min(self.max_primary.max(before));
        self.primary - before
    }

    /// Bank mitigation, optionally capped; returns the amount gained
    pub fn add_mitigation(&mut self, amount: u32, cap: Option<u32>) -> u32 {
        let before = self.mitigation;
        let raised = self.mitigation.saturating_add(amount);
        self.mitigation = match cap {
            Some(cap) => raised.min(cap.max(before)),
            None => raised,
        };
        self.mitigation - before
    }

    /// Start-of-own-turn reset: mitigation and currency go back to 0
    pub fn reset_turn(&mut self) {
        self.mitigation = 0;
        self.currency = 0;
    }
}
