//! Main game state structure

use crate::core::{create_standard_deck, create_starter_deck, Card, Player, PlayerId, PlayerName};
use crate::game::combat::{HazardState, TurnCounters};
use crate::game::{GameLogger, TurnStructure};
use crate::pool::SharedPool;
use crate::rules::RulesConfig;
use crate::zones::PlayerZones;
use crate::{DuelError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// Complete game state
///
/// The single mutable structure the turn loop owns. Controllers only ever
/// see it through a `GameStateView`.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Exactly two seats once the game is running
    pub players: Vec<Player>,

    /// Shared market, its backing deck and its recycle pile
    pub pool: SharedPool,

    pub turn: TurnStructure,

    /// Maneuver counters for the acting player's current turn
    pub counters: TurnCounters,

    /// Current monster, when the rules enable one
    pub hazard: Option<HazardState>,

    pub hazards_defeated: u32,

    pub rules: RulesConfig,

    /// Every shuffle and draw goes through this RNG
    pub rng: ChaCha12Rng,

    /// Identifies this game in telemetry
    pub session_id: String,

    pub logger: GameLogger,
}

impl GameState {
    /// Create a new game with two players
    ///
    /// Builds both starter decks and the shared pool from `rules`, deals the
    /// market and, if enabled, draws the first hazard.
    pub fn new_two_player(
        player1_name: impl Into<PlayerName>,
        player2_name: impl Into<PlayerName>,
        rules: RulesConfig,
        seed: u64,
    ) -> Result<Self> {
        rules.validate()?;
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        let session_id = format!("{:016x}", rng.gen::<u64>());

        let names = [player1_name.into(), player2_name.into()];
        let players = names
            .into_iter()
            .enumerate()
            .map(|(seat, name)| {
                let deck = create_starter_deck(&rules.starters[seat], &mut rng);
                Player::new(
                    PlayerId::new(seat as u32),
                    name,
                    rules.starting_primary,
                    rules.max_primary,
                    PlayerZones::new(deck),
                )
            })
            .collect();

        let pool_deck = create_standard_deck(&mut rng);
        let mut pool = SharedPool::new(pool_deck, rules.market_slots, &mut rng);

        let hazard = if rules.hazard {
            pool.draw_from_pool(&mut rng)
                .map(|card| HazardState::new(card, rules.face_value(card)))
        } else {
            None
        };

        Ok(GameState {
            players,
            pool,
            turn: TurnStructure::new(0),
            counters: TurnCounters::new(),
            hazard,
            hazards_defeated: 0,
            rules,
            rng,
            session_id,
            logger: GameLogger::new(),
        })
    }

    /// Seat a player; the engine is strictly two-player
    pub fn add_player(&mut self, player: Player) -> Result<()> {
        if self.players.len() >= 2 {
            return Err(DuelError::InvalidAction(format!(
                "cannot seat {}: the game already has 2 players",
                player.name
            )));
        }
        self.players.push(player);
        Ok(())
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .get(id.index())
            .ok_or_else(|| DuelError::InvalidAction(format!("no player {}", id)))
    }

    pub fn active_player(&self) -> &Player {
        &self.players[self.turn.active_player_idx]
    }

    pub fn opponent_of(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id != id)
    }

    /// Draw a fresh hazard from the pool, if it has any cards left
    pub fn replace_hazard(&mut self) -> Option<HazardState> {
        let card = self.pool.draw_from_pool(&mut self.rng);
        self.hazard = card.map(|card| HazardState::new(card, self.rules.face_value(card)));
        self.hazard
    }

    /// Every card in the game, wherever it sits
    ///
    /// Constant for the whole game: cards only ever move.
    pub fn total_cards(&self) -> usize {
        let players: usize = self.players.iter().map(|p| p.zones.total_cards()).sum();
        players + self.pool.total_cards() + usize::from(self.hazard.is_some())
    }

    /// All cards currently in the game, in no particular order
    pub fn all_cards(&self) -> Vec<Card> {
        let mut cards: Vec<Card> = self
            .players
            .iter()
            .flat_map(|p| {
                let zones = &p.zones;
                zones
                    .deck
                    .iter()
                    .chain(zones.hand.iter())
                    .chain(zones.in_play.iter())
                    .chain(zones.discard.iter())
                    .copied()
            })
            .collect();
        cards.extend(self.pool.cards());
        cards.extend(self.hazard.map(|h| h.card));
        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Rank, Suit};
    use crate::rules::{Difficulty, DungeonClass};

    #[test]
    fn test_new_two_player() {
        let game = GameState::new_two_player("Alice", "Bob", RulesConfig::starship(), 42).unwrap();

        assert_eq!(game.players.len(), 2);
        assert_eq!(game.players[0].name.as_str(), "Alice");
        assert_eq!(game.players[1].id, PlayerId::new(1));
        assert_eq!(game.players[0].primary, 15);
        assert_eq!(game.players[0].zones.deck.len(), 10);
        assert_eq!(game.pool.occupied_slots(), 5);
        assert!(game.hazard.is_none());
        assert_eq!(game.total_cards(), 72);
        assert_eq!(game.session_id.len(), 16);
    }

    #[test]
    fn test_starter_composition() {
        let game = GameState::new_two_player("Alice", "Bob", RulesConfig::starship(), 1).unwrap();
        let deck = game.players[0].zones.deck.to_vec();
        let engineers = deck
            .iter()
            .filter(|c| **c == crate::core::Card::new(Suit::Clubs, Rank::Two))
            .count();
        assert_eq!(engineers, 7);
    }

    #[test]
    fn test_same_seed_same_setup() {
        let a = GameState::new_two_player("A", "B", RulesConfig::starship(), 9).unwrap();
        let b = GameState::new_two_player("A", "B", RulesConfig::starship(), 9).unwrap();
        assert_eq!(a.session_id, b.session_id);
        assert_eq!(a.pool.slots(), b.pool.slots());
        assert_eq!(a.players[1].zones.deck.to_vec(), b.players[1].zones.deck.to_vec());
    }

    #[test]
    fn test_dungeon_draws_hazard() {
        let rules = RulesConfig::dungeon(Difficulty::Normal, [DungeonClass::Warrior, DungeonClass::Rogue]);
        let game = GameState::new_two_player("A", "B", rules, 3).unwrap();
        let hazard = game.hazard.unwrap();
        assert_eq!(hazard.damage, game.rules.face_value(hazard.card));
        assert_eq!(game.pool.total_cards(), 51);
        assert_eq!(game.total_cards(), 72);
    }

    #[test]
    fn test_third_player_rejected() {
        let mut game = GameState::new_two_player("A", "B", RulesConfig::starship(), 0).unwrap();
        let extra = Player::new(PlayerId::new(2), "C", 15, 15, PlayerZones::default());
        assert!(matches!(game.add_player(extra), Err(DuelError::InvalidAction(_))));
    }

    #[test]
    fn test_invalid_rules_rejected() {
        let mut rules = RulesConfig::starship();
        rules.draw_per_turn = 0;
        assert!(GameState::new_two_player("A", "B", rules, 0).is_err());
    }
}
