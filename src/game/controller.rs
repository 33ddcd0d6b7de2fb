//! Player controller trait and game state view
//!
//! This module defines the boundary between the turn engine and whatever
//! makes decisions for a seat (a heuristic, a script, a person at a
//! terminal, or an external agent). The engine asks; the controller looks at
//! a read-only view and answers with a typed choice.

use crate::core::{Card, ManeuverEffect, PlayerId};
use crate::game::combat::{HazardState, TurnCounters};
use crate::game::{GameState, Phase};
use crate::rules::RulesConfig;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Decisions available during the Action phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionChoice {
    /// Play the hand card at this index for its face value
    PlayResource(usize),
    /// Play the hand card at this index for its suit's maneuver
    PlayManeuver(usize),
    /// Stop playing cards this turn
    EndPhase,
}

/// Decisions available during the Purchase phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseChoice {
    /// Buy the card in this market slot
    Purchase(usize),
    Skip,
}

/// Read-only view of game state for controllers
pub struct GameStateView<'a> {
    game: &'a GameState,
    player_id: PlayerId,
}

impl<'a> GameStateView<'a> {
    pub fn new(game: &'a GameState, player_id: PlayerId) -> Self {
        GameStateView { game, player_id }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn phase(&self) -> Phase {
        self.game.turn.phase
    }

    pub fn round(&self) -> u32 {
        self.game.turn.round
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.game.rules
    }

    /// Cards in this player's hand, in index order
    pub fn hand(&self) -> Vec<Card> {
        self.game
            .player(self.player_id)
            .map(|p| p.zones.hand.to_vec())
            .unwrap_or_default()
    }

    pub fn hand_len(&self) -> usize {
        self.game
            .player(self.player_id)
            .map(|p| p.zones.hand.len())
            .unwrap_or(0)
    }

    pub fn primary(&self) -> i32 {
        self.game.player(self.player_id).map(|p| p.primary).unwrap_or(0)
    }

    pub fn max_primary(&self) -> i32 {
        self.game.player(self.player_id).map(|p| p.max_primary).unwrap_or(0)
    }

    pub fn mitigation(&self) -> u32 {
        self.game.player(self.player_id).map(|p| p.mitigation).unwrap_or(0)
    }

    /// Currency earned so far this turn
    pub fn currency(&self) -> u32 {
        self.game.player(self.player_id).map(|p| p.currency).unwrap_or(0)
    }

    pub fn opponent_name(&self) -> String {
        self.game
            .opponent_of(self.player_id)
            .map(|p| p.name.to_string())
            .unwrap_or_default()
    }

    pub fn opponent_primary(&self) -> i32 {
        self.game.opponent_of(self.player_id).map(|p| p.primary).unwrap_or(0)
    }

    pub fn opponent_mitigation(&self) -> u32 {
        self.game
            .opponent_of(self.player_id)
            .map(|p| p.mitigation)
            .unwrap_or(0)
    }

    /// Market slots; None is an empty slot
    pub fn market(&self) -> &[Option<Card>] {
        self.game.pool.slots()
    }

    pub fn pool_deck_len(&self) -> usize {
        self.game.pool.deck_len()
    }

    pub fn counters(&self) -> TurnCounters {
        self.game.counters
    }

    pub fn hazard(&self) -> Option<HazardState> {
        self.game.hazard
    }

    pub fn face_value(&self, card: Card) -> u32 {
        self.game.rules.face_value(card)
    }

    pub fn maneuver_for(&self, card: Card) -> Option<ManeuverEffect> {
        self.game.rules.maneuver_for(card)
    }

    /// Purchases still allowed this turn
    pub fn purchases_left(&self) -> usize {
        self.game
            .rules
            .purchases_per_turn
            .saturating_sub(self.game.counters.purchases as usize)
    }
}

/// Player controller trait
///
/// Implement this trait to plug a decision maker into the turn loop. Every
/// answer is validated by the engine: an out-of-range index is retried and
/// then replaced by a fallback, and an `Err` is replaced by the fallback
/// straight away. A controller can never stall or abort a game.
pub trait PlayerController {
    /// Get the player ID this controller is responsible for
    fn player_id(&self) -> PlayerId;

    /// Short name used in decision logs
    fn controller_name(&self) -> &str;

    /// Pick the next Action-phase move
    fn choose_action(&mut self, view: &GameStateView) -> Result<ActionChoice>;

    /// Pick a market slot to buy, or skip
    fn choose_purchase(&mut self, view: &GameStateView) -> Result<PurchaseChoice>;

    /// Pick which revealed pool card to keep; returns an index into `revealed`
    fn choose_search_card(&mut self, view: &GameStateView, revealed: &[Card]) -> Result<usize>;

    /// Called when the game ends (for cleanup/logging)
    fn on_game_end(&mut self, _view: &GameStateView, _won: bool) {}
}
