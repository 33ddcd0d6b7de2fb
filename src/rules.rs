//! Rules configuration and variant presets
//!
//! Every number that differs between the game variants lives here: face
//! values, starting resources, caps, deck shapes and the suit table. The
//! engine never hard-codes one variant's values.

use crate::core::{Card, FaceValueTable, ManeuverEffect, Rank, StarterRule, Suit, SuitEffectTable};
use crate::{DuelError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Who receives the attack total during combat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AttackTarget {
    /// The other player
    #[default]
    Opponent,
    /// The current hazard (dungeon monster)
    Hazard,
}

/// Dungeon difficulty, sets starting health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn starting_health(&self) -> i32 {
        match self {
            Difficulty::Easy => 25,
            Difficulty::Normal => 20,
            Difficulty::Hard => 15,
        }
    }
}

/// Dungeon character class, sets the starter deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DungeonClass {
    /// 7 Weapons (2♠) and 3 Shields (2♥)
    #[default]
    Warrior,
    /// 7 Daggers (2♣) and 3 Potions (2♦)
    Rogue,
}

impl DungeonClass {
    pub fn starter(&self) -> StarterRule {
        match self {
            DungeonClass::Warrior => StarterRule::seven_three(
                Card::new(Suit::Spades, Rank::Two),
                Card::new(Suit::Hearts, Rank::Two),
            ),
            DungeonClass::Rogue => StarterRule::seven_three(
                Card::new(Suit::Clubs, Rank::Two),
                Card::new(Suit::Diamonds, Rank::Two),
            ),
        }
    }
}

/// Complete rule set for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Display name of the variant
    pub variant: String,
    pub face_values: FaceValueTable,
    pub starting_primary: i32,
    pub max_primary: i32,
    pub draw_per_turn: usize,
    pub market_slots: usize,
    pub search_reveal: usize,
    pub purchases_per_turn: usize,
    /// None = leftover currency converts to mitigation without a ceiling
    pub mitigation_cap: Option<u32>,
    /// None = no round limit; the game loop still calls a stalemate after
    /// `STALEMATE_ROUNDS`. Reaching the limit is always a draw.
    pub max_rounds: Option<u32>,
    /// Invalid strategy selections tolerated per decision before falling back
    pub max_invalid_retries: u32,
    pub suit_effects: SuitEffectTable,
    /// Starter decks, one per seat
    pub starters: [StarterRule; 2],
    pub attack_target: AttackTarget,
    /// Draw a hazard from the pool that strikes both players after each turn
    pub hazard: bool,
    /// Both seats play as a team; any defeat ends the game with no winner
    pub cooperative: bool,
}

impl RulesConfig {
    /// Starship duel: hull 15, uncapped shields, Engineers and Marines
    pub fn starship() -> Self {
        RulesConfig {
            variant: "starship".to_string(),
            face_values: FaceValueTable::salvage(),
            starting_primary: 15,
            max_primary: 15,
            draw_per_turn: 5,
            market_slots: 5,
            search_reveal: 3,
            purchases_per_turn: 1,
            mitigation_cap: None,
            max_rounds: None,
            max_invalid_retries: 3,
            suit_effects: SuitEffectTable::starship(),
            starters: [
                StarterRule::engineers_and_marines(),
                StarterRule::engineers_and_marines(),
            ],
            attack_target: AttackTarget::Opponent,
            hazard: false,
            cooperative: false,
        }
    }

    /// Dungeon crawl: a monster strikes both players, temp health capped at 5,
    /// and the party falls together
    pub fn dungeon(difficulty: Difficulty, classes: [DungeonClass; 2]) -> Self {
        RulesConfig {
            variant: "dungeon".to_string(),
            starting_primary: difficulty.starting_health(),
            max_primary: difficulty.starting_health().max(20),
            mitigation_cap: Some(5),
            suit_effects: SuitEffectTable::dungeon(),
            starters: [classes[0].starter(), classes[1].starter()],
            attack_target: AttackTarget::Hazard,
            hazard: true,
            cooperative: true,
            ..Self::starship()
        }
    }

    /// Fantasy duel: health 20, face cards worth 10, aces 11
    pub fn brawler() -> Self {
        RulesConfig {
            variant: "brawler".to_string(),
            face_values: FaceValueTable::blackjack(),
            starting_primary: 20,
            max_primary: 20,
            ..Self::starship()
        }
    }

    /// Skirmish: the starship rules under an 8-round limit
    pub fn skirmish() -> Self {
        RulesConfig {
            variant: "skirmish".to_string(),
            max_rounds: Some(8),
            ..Self::starship()
        }
    }

    /// Load a rule set from a JSON file; missing fields take starship values
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let rules: RulesConfig = serde_json::from_str(&text)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Reject rule sets the engine cannot run
    pub fn validate(&self) -> Result<()> {
        if self.draw_per_turn == 0 {
            return Err(DuelError::Config("draw_per_turn must be at least 1".to_string()));
        }
        if self.market_slots == 0 {
            return Err(DuelError::Config("market_slots must be at least 1".to_string()));
        }
        if self.starting_primary <= 0 {
            return Err(DuelError::Config("starting_primary must be positive".to_string()));
        }
        if self.max_primary < self.starting_primary {
            return Err(DuelError::Config(format!(
                "max_primary {} is below starting_primary {}",
                self.max_primary, self.starting_primary
            )));
        }
        if let Some(seat) = self.starters.iter().position(|s| s.total_cards() == 0) {
            return Err(DuelError::Config(format!("starter deck for seat {} is empty", seat + 1)));
        }
        if self.max_rounds == Some(0) {
            return Err(DuelError::Config("max_rounds must be at least 1".to_string()));
        }
        if self.attack_target == AttackTarget::Hazard && !self.hazard {
            return Err(DuelError::Config(
                "attack_target Hazard requires hazard to be enabled".to_string(),
            ));
        }
        Ok(())
    }

    pub fn face_value(&self, card: Card) -> u32 {
        self.face_values.face_value(card)
    }

    pub fn maneuver_for(&self, card: Card) -> Option<ManeuverEffect> {
        self.suit_effects.effect_for(card.suit)
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::starship()
    }
}
