//! Scripted player controller for tests and demos
//!
//! Answers from three predetermined queues, one per decision kind. Once a
//! queue runs dry the controller ends the phase, skips the purchase or keeps
//! the first revealed card.

use crate::core::{Card, PlayerId};
use crate::game::controller::{ActionChoice, GameStateView, PlayerController, PurchaseChoice};
use crate::Result;
use std::collections::VecDeque;

/// A controller that follows predetermined decisions
#[derive(Debug, Clone, Default)]
pub struct ScriptedController {
    player_id: PlayerId,
    actions: VecDeque<ActionChoice>,
    purchases: VecDeque<PurchaseChoice>,
    search_picks: VecDeque<usize>,
    /// Set by `on_game_end`
    pub won: Option<bool>,
}

impl ScriptedController {
    pub fn new(player_id: PlayerId, actions: Vec<ActionChoice>) -> Self {
        ScriptedController {
            player_id,
            actions: actions.into(),
            ..Default::default()
        }
    }

    pub fn with_purchases(mut self, purchases: Vec<PurchaseChoice>) -> Self {
        self.purchases = purchases.into();
        self
    }

    pub fn with_search_picks(mut self, picks: Vec<usize>) -> Self {
        self.search_picks = picks.into();
        self
    }

    /// Decisions not yet consumed, across all queues
    pub fn remaining(&self) -> usize {
        self.actions.len() + self.purchases.len() + self.search_picks.len()
    }
}

impl PlayerController for ScriptedController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn controller_name(&self) -> &str {
        "scripted"
    }

    fn choose_action(&mut self, _view: &GameStateView) -> Result<ActionChoice> {
        Ok(self.actions.pop_front().unwrap_or(ActionChoice::EndPhase))
    }

    fn choose_purchase(&mut self, _view: &GameStateView) -> Result<PurchaseChoice> {
        Ok(self.purchases.pop_front().unwrap_or(PurchaseChoice::Skip))
    }

    fn choose_search_card(&mut self, _view: &GameStateView, _revealed: &[Card]) -> Result<usize> {
        Ok(self.search_picks.pop_front().unwrap_or(0))
    }

    fn on_game_end(&mut self, _view: &GameStateView, won: bool) {
        self.won = Some(won);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameState;
    use crate::rules::RulesConfig;

    #[test]
    fn test_scripted_controller() {
        let game = GameState::new_two_player("Alice", "Bob", RulesConfig::starship(), 0).unwrap();
        let id = PlayerId::new(0);
        let view = GameStateView::new(&game, id);

        let mut controller = ScriptedController::new(
            id,
            vec![ActionChoice::PlayManeuver(2), ActionChoice::PlayResource(0)],
        )
        .with_purchases(vec![PurchaseChoice::Purchase(3)])
        .with_search_picks(vec![1]);
        assert_eq!(controller.remaining(), 4);

        assert_eq!(controller.choose_action(&view).unwrap(), ActionChoice::PlayManeuver(2));
        assert_eq!(controller.choose_action(&view).unwrap(), ActionChoice::PlayResource(0));
        assert_eq!(controller.choose_action(&view).unwrap(), ActionChoice::EndPhase);

        assert_eq!(controller.choose_purchase(&view).unwrap(), PurchaseChoice::Purchase(3));
        assert_eq!(controller.choose_purchase(&view).unwrap(), PurchaseChoice::Skip);

        assert_eq!(controller.choose_search_card(&view, &[]).unwrap(), 1);
        assert_eq!(controller.choose_search_card(&view, &[]).unwrap(), 0);
        assert_eq!(controller.remaining(), 0);

        controller.on_game_end(&view, true);
        assert_eq!(controller.won, Some(true));
    }
}
