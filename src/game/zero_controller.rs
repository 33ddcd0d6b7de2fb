//! Zero controller for testing and automation
//!
//! Always plays the first hand card for its face value, never buys, and keeps
//! the first revealed card. Useful for smoke tests and benchmarks where a
//! game must finish without input.

use crate::core::{Card, PlayerId};
use crate::game::controller::{ActionChoice, GameStateView, PlayerController, PurchaseChoice};
use crate::Result;

/// A controller that always picks index 0
pub struct ZeroController {
    player_id: PlayerId,
}

impl ZeroController {
    pub fn new(player_id: PlayerId) -> Self {
        ZeroController { player_id }
    }
}

impl PlayerController for ZeroController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn controller_name(&self) -> &str {
        "zero"
    }

    fn choose_action(&mut self, view: &GameStateView) -> Result<ActionChoice> {
        if view.hand_len() == 0 {
            Ok(ActionChoice::EndPhase)
        } else {
            Ok(ActionChoice::PlayResource(0))
        }
    }

    fn choose_purchase(&mut self, _view: &GameStateView) -> Result<PurchaseChoice> {
        Ok(PurchaseChoice::Skip)
    }

    fn choose_search_card(&mut self, _view: &GameStateView, _revealed: &[Card]) -> Result<usize> {
        Ok(0)
    }
}
