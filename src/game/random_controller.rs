//! Random controller for baseline play and fuzzing the turn loop
//!
//! Picks uniformly among legal moves. Seeded for deterministic runs.

use crate::core::{Card, PlayerId};
use crate::game::controller::{ActionChoice, GameStateView, PlayerController, PurchaseChoice};
use crate::Result;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// A controller that makes random choices
pub struct RandomController {
    player_id: PlayerId,
    rng: ChaCha12Rng,
}

impl RandomController {
    /// Create a random controller seeded from OS entropy
    pub fn new(player_id: PlayerId) -> Self {
        RandomController {
            player_id,
            rng: ChaCha12Rng::from_entropy(),
        }
    }

    /// Create a random controller with a seeded RNG (for deterministic testing)
    pub fn with_seed(player_id: PlayerId, seed: u64) -> Self {
        RandomController {
            player_id,
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerController for RandomController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn controller_name(&self) -> &str {
        "random"
    }

    fn choose_action(&mut self, view: &GameStateView) -> Result<ActionChoice> {
        let hand_len = view.hand_len();
        // One extra slot stands for ending the phase early
        let pick = self.rng.gen_range(0..=hand_len);
        if pick == hand_len {
            return Ok(ActionChoice::EndPhase);
        }
        if self.rng.gen_bool(0.5) {
            Ok(ActionChoice::PlayManeuver(pick))
        } else {
            Ok(ActionChoice::PlayResource(pick))
        }
    }

    fn choose_purchase(&mut self, view: &GameStateView) -> Result<PurchaseChoice> {
        let currency = view.currency();
        let affordable: Vec<usize> = view
            .market()
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.filter(|c| view.face_value(*c) <= currency).map(|_| i))
            .collect();
        match affordable.choose(&mut self.rng) {
            Some(&slot) if self.rng.gen_bool(0.5) => Ok(PurchaseChoice::Purchase(slot)),
            _ => Ok(PurchaseChoice::Skip),
        }
    }

    fn choose_search_card(&mut self, _view: &GameStateView, revealed: &[Card]) -> Result<usize> {
        if revealed.is_empty() {
            return Ok(0);
        }
        Ok(self.rng.gen_range(0..revealed.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Rank, Suit};
    use crate::game::GameState;
    use crate::rules::RulesConfig;

    fn dealt_game() -> GameState {
        let mut game = GameState::new_two_player("Alice", "Bob", RulesConfig::starship(), 7).unwrap();
        let rng = &mut game.rng;
        game.players[0].zones.draw(5, rng);
        game
    }

    #[test]
    fn test_choices_stay_in_range() {
        let game = dealt_game();
        let id = PlayerId::new(0);
        let view = GameStateView::new(&game, id);
        let mut controller = RandomController::with_seed(id, 42);

        for _ in 0..50 {
            match controller.choose_action(&view).unwrap() {
                ActionChoice::PlayResource(i) | ActionChoice::PlayManeuver(i) => assert!(i < 5),
                ActionChoice::EndPhase => {}
            }
        }
    }

    #[test]
    fn test_never_buys_unaffordable() {
        let game = dealt_game();
        let id = PlayerId::new(0);
        let view = GameStateView::new(&game, id);
        let mut controller = RandomController::with_seed(id, 1);

        // No currency earned yet, so nothing is affordable
        for _ in 0..20 {
            assert_eq!(controller.choose_purchase(&view).unwrap(), PurchaseChoice::Skip);
        }
    }

    #[test]
    fn test_seeded_determinism() {
        let game = dealt_game();
        let id = PlayerId::new(0);
        let view = GameStateView::new(&game, id);
        let mut c1 = RandomController::with_seed(id, 42);
        let mut c2 = RandomController::with_seed(id, 42);

        let revealed = [
            Card::new(Suit::Hearts, Rank::Two),
            Card::new(Suit::Hearts, Rank::Three),
            Card::new(Suit::Hearts, Rank::Four),
        ];
        for _ in 0..10 {
            assert_eq!(c1.choose_action(&view).unwrap(), c2.choose_action(&view).unwrap());
            assert_eq!(
                c1.choose_search_card(&view, &revealed).unwrap(),
                c2.choose_search_card(&view, &revealed).unwrap()
            );
        }
    }
}
