//! Game loop implementation
//!
//! Drives Start → Draw → Action → Purchase → Combat → Repair → End for each
//! player-turn, alternating seats until someone is defeated or the round
//! limit is hit.

/// Macro for play-by-play logging that compiles away without the feature
///
/// When verbose-logging is disabled this becomes a no-op, so the format!
/// calls cost nothing in benchmark builds.
macro_rules! log_if_verbose {
    ($self:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $self.log_normal(&format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$self;
        }
    };
}

use crate::core::{Card, ManeuverEffect, PlayerId};
use crate::game::combat::{apply_damage, apply_damage_to_all, TurnCounters};
use crate::game::controller::{ActionChoice, GameStateView, PlayerController, PurchaseChoice};
use crate::game::heuristic_controller::{fallback_action, fallback_purchase, fallback_search_pick};
use crate::game::telemetry::{now_ms, OutcomeRecord, StateSnapshot, TelemetrySink};
use crate::game::{GameState, Phase};
use crate::rules::AttackTarget;
use crate::{DuelError, Result};
use smallvec::SmallVec;

/// Rounds after which a game without a round limit is called a stalemate
pub const STALEMATE_ROUNDS: u32 = 500;

/// Verbosity level for game output
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only game outcome
    Minimal = 1,
    /// Normal - turns, plays, combat (default)
    #[default]
    Normal = 2,
    /// Verbose - per-phase detail
    Verbose = 3,
}

/// Result of running a game to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    /// Winner of the game (None on a draw)
    pub winner: Option<PlayerId>,
    /// Player-turns played
    pub turns_played: u32,
    /// Round in which the game ended
    pub rounds_played: u32,
    pub end_reason: GameEndReason,
    pub hazards_defeated: u32,
}

impl GameResult {
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }
}

/// Reason the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEndReason {
    /// This player's primary resource reached 0 or below
    ///
    /// Under cooperative rules this is a shared loss with no winner.
    PlayerDefeated(PlayerId),
    /// Both players reached 0 or below in the same turn
    BothDefeated,
    /// The rules' round limit was reached; always a draw
    RoundLimit,
    /// No round limit was set and nobody fell within `STALEMATE_ROUNDS`
    Stalemate,
}

impl GameEndReason {
    pub fn describe(&self) -> String {
        match self {
            GameEndReason::PlayerDefeated(id) => format!("{} defeated", id),
            GameEndReason::BothDefeated => "both defeated".to_string(),
            GameEndReason::RoundLimit => "round limit".to_string(),
            GameEndReason::Stalemate => "stalemate".to_string(),
        }
    }
}

/// Game loop manager
pub struct GameLoop<'a> {
    /// The game state
    pub game: &'a mut GameState,
    /// None = play until someone falls or the stalemate guard trips
    max_rounds: Option<u32>,
    turns_elapsed: u32,
    pub verbosity: VerbosityLevel,
    telemetry: Option<&'a mut dyn TelemetrySink>,
    /// Out-of-range or illegal answers received from controllers
    invalid_choices: u32,
    /// Decisions replaced by a fallback pick
    fallbacks: u32,
}

impl<'a> GameLoop<'a> {
    /// Create a new game loop for the given game state
    pub fn new(game: &'a mut GameState) -> Self {
        let verbosity = game.logger.verbosity();
        let max_rounds = game.rules.max_rounds;
        GameLoop {
            game,
            max_rounds,
            turns_elapsed: 0,
            verbosity,
            telemetry: None,
            invalid_choices: 0,
            fallbacks: 0,
        }
    }

    /// Override the round limit
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = Some(max_rounds.max(1));
        self
    }

    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self.game.logger.set_verbosity(verbosity);
        self
    }

    /// Send a state record after every phase and an outcome record at the end
    pub fn with_telemetry(mut self, sink: &'a mut dyn TelemetrySink) -> Self {
        self.telemetry = Some(sink);
        self
    }

    pub fn invalid_choices(&self) -> u32 {
        self.invalid_choices
    }

    pub fn fallbacks_used(&self) -> u32 {
        self.fallbacks
    }

    fn log_normal(&self, message: &str) {
        self.game.logger.normal(message);
    }

    /// Run the game loop with the given player controllers
    ///
    /// Returns when a player is defeated, the round limit is reached or the
    /// game stalls past `STALEMATE_ROUNDS`.
    pub fn run_game(
        &mut self,
        controller1: &mut dyn PlayerController,
        controller2: &mut dyn PlayerController,
    ) -> Result<GameResult> {
        self.setup_game(controller1, controller2)?;

        loop {
            if let Some(result) = self.run_turn_once(controller1, controller2)? {
                self.finish_game(controller1, controller2, &result)?;
                return Ok(result);
            }
        }
    }

    /// Run at most `turns_to_run` player-turns
    ///
    /// Returns `Ok(None)` if the game is still going afterwards.
    pub fn run_turns(
        &mut self,
        controller1: &mut dyn PlayerController,
        controller2: &mut dyn PlayerController,
        turns_to_run: u32,
    ) -> Result<Option<GameResult>> {
        self.setup_game(controller1, controller2)?;
        for _ in 0..turns_to_run {
            if let Some(result) = self.run_turn_once(controller1, controller2)? {
                self.finish_game(controller1, controller2, &result)?;
                return Ok(Some(result));
            }
        }
        Ok(None)
    }

    /// Check there are exactly 2 players and the controllers sit in the right seats
    fn setup_game(
        &mut self,
        controller1: &mut dyn PlayerController,
        controller2: &mut dyn PlayerController,
    ) -> Result<()> {
        if self.game.players.len() != 2 {
            return Err(DuelError::InvalidAction(
                "Game loop requires exactly 2 players".to_string(),
            ));
        }
        if controller1.player_id() != self.game.players[0].id
            || controller2.player_id() != self.game.players[1].id
        {
            return Err(DuelError::InvalidAction(
                "Controller player IDs don't match game players".to_string(),
            ));
        }
        Ok(())
    }

    /// Play one full player-turn for whoever is active
    ///
    /// Returns the result if the game ended during or right after the turn.
    pub fn run_turn_once(
        &mut self,
        controller1: &mut dyn PlayerController,
        controller2: &mut dyn PlayerController,
    ) -> Result<Option<GameResult>> {
        let active = self.game.turn.active_player_idx;
        loop {
            let phase = self.game.turn.phase;
            if active == 0 {
                self.run_phase(phase, controller1)?;
            } else {
                self.run_phase(phase, controller2)?;
            }
            if !self.game.turn.advance_phase() {
                break;
            }
        }
        self.turns_elapsed += 1;

        if let Some(result) = self.check_win_condition() {
            return Ok(Some(result));
        }

        self.game.turn.next_turn();
        let round = self.game.turn.round;
        let result = match self.max_rounds {
            Some(limit) if round > limit => Some(self.drawn_result(GameEndReason::RoundLimit, limit)),
            None if round > STALEMATE_ROUNDS => {
                Some(self.drawn_result(GameEndReason::Stalemate, STALEMATE_ROUNDS))
            }
            _ => None,
        };
        Ok(result)
    }

    fn run_phase(&mut self, phase: Phase, controller: &mut dyn PlayerController) -> Result<()> {
        match phase {
            Phase::Start => self.start_phase(),
            Phase::Draw => self.draw_phase(),
            Phase::Action => self.action_phase(controller)?,
            Phase::Purchase => self.purchase_phase(controller)?,
            Phase::Combat => self.combat_phase(),
            Phase::Repair => self.repair_phase(),
            Phase::End => self.end_phase(),
        }
        self.emit_snapshot(phase)
    }

    fn emit_snapshot(&mut self, phase: Phase) -> Result<()> {
        if let Some(sink) = self.telemetry.as_deref_mut() {
            let snapshot = StateSnapshot::capture(&*self.game, phase);
            sink.record_state(&snapshot)?;
        }
        Ok(())
    }

    fn start_phase(&mut self) {
        let idx = self.game.turn.active_player_idx;
        self.game.counters = TurnCounters::new();
        let player = &mut self.game.players[idx];
        // Mitigation only lasts until its owner's next turn
        player.reset_turn();
        let header = format!(
            "=== Round {}: {}'s turn ({} left) ===",
            self.game.turn.round, player.name, player.primary
        );
        self.game.logger.normal(&header);
    }

    fn draw_phase(&mut self) {
        let idx = self.game.turn.active_player_idx;
        let count = self.game.rules.draw_per_turn;
        let game = &mut *self.game;
        let player = &mut game.players[idx];
        let report = player.zones.draw(count, &mut game.rng);

        if report.reshuffled {
            game.logger
                .normal(&format!("{} reshuffles discard into deck", player.name));
        }
        if report.exhausted(count) {
            game.logger.normal(&format!(
                "{} could only draw {} of {} cards",
                player.name, report.drawn, count
            ));
        }
        game.logger
            .verbose(&format!("{} draws {} cards", player.name, report.drawn));
    }

    fn action_phase(&mut self, controller: &mut dyn PlayerController) -> Result<()> {
        let idx = self.game.turn.active_player_idx;
        while !self.game.players[idx].zones.hand.is_empty() {
            match self.decide_action(controller) {
                ActionChoice::EndPhase => break,
                ActionChoice::PlayResource(i) => self.play_resource(idx, i),
                ActionChoice::PlayManeuver(i) => self.play_maneuver(idx, i, controller)?,
            }
        }
        Ok(())
    }

    /// Ask for an action until it is legal, falling back when retries run out
    fn decide_action(&mut self, controller: &mut dyn PlayerController) -> ActionChoice {
        let player_id = controller.player_id();
        let max_retries = self.game.rules.max_invalid_retries;
        let mut invalid = 0;
        loop {
            let view = GameStateView::new(&*self.game, player_id);
            let answer = controller
                .choose_action(&view)
                .and_then(|choice| validate_action(&view, choice));
            let err = match answer {
                Ok(choice) => return choice,
                Err(err) => err,
            };

            let retry = matches!(err, DuelError::InvalidSelection(_)) && invalid < max_retries;
            if retry {
                invalid += 1;
                self.invalid_choices += 1;
                self.game
                    .logger
                    .normal(&format!("{} rejected: {}; asking again", controller.controller_name(), err));
                continue;
            }

            if matches!(err, DuelError::InvalidSelection(_)) {
                self.invalid_choices += 1;
            }
            self.fallbacks += 1;
            let choice = fallback_action(&view);
            self.game.logger.normal(&format!(
                "{} failed ({}); using fallback {:?}",
                controller.controller_name(),
                err,
                choice
            ));
            return choice;
        }
    }

    fn play_resource(&mut self, idx: usize, hand_index: usize) {
        let game = &mut *self.game;
        let Some(card) = game.players[idx].zones.play_from_hand(hand_index) else {
            return;
        };
        let value = game.rules.face_value(card);
        let player = &mut game.players[idx];
        player.currency += value;
        log_if_verbose!(
            self,
            "{} plays {} as resource (+{}, {} total)",
            self.game.players[idx].name,
            card,
            value,
            self.game.players[idx].currency
        );
    }

    fn play_maneuver(
        &mut self,
        idx: usize,
        hand_index: usize,
        controller: &mut dyn PlayerController,
    ) -> Result<()> {
        let game = &mut *self.game;
        let Some(card) = game.players[idx].zones.play_from_hand(hand_index) else {
            return Ok(());
        };
        let Some(effect) = game.rules.maneuver_for(card) else {
            return Ok(());
        };
        log_if_verbose!(
            self,
            "{} plays {} as maneuver: {}",
            self.game.players[idx].name,
            card,
            effect.describe()
        );

        match effect {
            ManeuverEffect::DrawCard => {
                let game = &mut *self.game;
                game.counters.draws += 1;
                let report = game.players[idx].zones.draw(1, &mut game.rng);
                if report.reshuffled {
                    game.logger
                        .normal(&format!("{} reshuffles discard into deck", game.players[idx].name));
                }
                if report.drawn == 0 {
                    game.logger.normal("No cards left to draw");
                }
            }
            ManeuverEffect::PoolSearch => self.pool_search(idx, controller)?,
            ManeuverEffect::Attack => self.game.counters.attack += 1,
            ManeuverEffect::Repair => self.game.counters.repair += 1,
        }
        Ok(())
    }

    /// Reveal cards from the pool, keep one in hand, recycle the rest
    fn pool_search(&mut self, idx: usize, controller: &mut dyn PlayerController) -> Result<()> {
        self.game.counters.searches += 1;
        let game = &mut *self.game;
        let mut revealed = game.pool.reveal(game.rules.search_reveal, &mut game.rng);
        if revealed.is_empty() {
            self.game.logger.normal("The pool is empty; search finds nothing");
            return Ok(());
        }
        let shown: Vec<String> = revealed.iter().map(Card::to_string).collect();
        self.game
            .logger
            .normal(&format!("Search reveals {}", shown.join(", ")));

        let pick = self.decide_search(controller, &revealed);
        if let Some(kept) = self.game.pool.resolve_search(&mut revealed, pick)? {
            self.game.players[idx].zones.hand.add(kept);
            let name = controller.controller_name().to_string();
            self.game.logger.controller_choice(
                &name,
                &format!("{} keeps {}", self.game.players[idx].name, kept),
            );
        }
        Ok(())
    }

    fn decide_search(&mut self, controller: &mut dyn PlayerController, revealed: &[Card]) -> usize {
        let player_id = controller.player_id();
        let max_retries = self.game.rules.max_invalid_retries;
        let mut invalid = 0;
        loop {
            let view = GameStateView::new(&*self.game, player_id);
            let err = match controller.choose_search_card(&view, revealed) {
                Ok(pick) if pick < revealed.len() => return pick,
                Ok(pick) => DuelError::InvalidSelection(format!(
                    "search pick {} out of 0-{}",
                    pick,
                    revealed.len() - 1
                )),
                Err(err) => err,
            };

            if matches!(err, DuelError::InvalidSelection(_)) {
                self.invalid_choices += 1;
                if invalid < max_retries {
                    invalid += 1;
                    continue;
                }
            }
            self.fallbacks += 1;
            self.game
                .logger
                .normal(&format!("{} failed ({}); keeping best card", controller.controller_name(), err));
            return fallback_search_pick(&view, revealed);
        }
    }

    fn purchase_phase(&mut self, controller: &mut dyn PlayerController) -> Result<()> {
        let idx = self.game.turn.active_player_idx;
        let limit = self.game.rules.purchases_per_turn;
        let max_retries = self.game.rules.max_invalid_retries;
        let mut invalid = 0;

        while (self.game.counters.purchases as usize) < limit && self.game.pool.occupied_slots() > 0 {
            let forced = invalid > max_retries;
            let slot = match self.decide_purchase(controller, forced) {
                PurchaseChoice::Skip => break,
                PurchaseChoice::Purchase(slot) => slot,
            };

            let game = &mut *self.game;
            let player = &mut game.players[idx];
            let attempt = game.pool.purchase(
                slot,
                &mut player.currency,
                &game.rules.face_values,
                &mut player.zones.discard,
                &mut game.rng,
            );
            match attempt {
                Ok(purchase) => {
                    game.counters.purchases += 1;
                    let refill = purchase
                        .refill
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "nothing".to_string());
                    game.logger.controller_choice(
                        controller.controller_name(),
                        &format!(
                            "{} buys {} for {} (slot {} refilled with {})",
                            player.name, purchase.card, purchase.cost, slot, refill
                        ),
                    );
                }
                Err(DuelError::InsufficientFunds { cost, available }) => {
                    game.logger.normal(&format!(
                        "{} cannot afford slot {} (cost {}, has {}); purchase skipped",
                        player.name, slot, cost, available
                    ));
                    break;
                }
                Err(err @ DuelError::InvalidSlot(_)) => {
                    invalid += 1;
                    self.invalid_choices += 1;
                    game.logger.normal(&format!("{} rejected: {}", controller.controller_name(), err));
                }
                Err(err) => return Err(err),
            }
        }

        self.convert_currency(idx);
        Ok(())
    }

    fn decide_purchase(&mut self, controller: &mut dyn PlayerController, forced: bool) -> PurchaseChoice {
        let view = GameStateView::new(&*self.game, controller.player_id());
        if forced {
            self.fallbacks += 1;
            return fallback_purchase(&view);
        }
        match controller.choose_purchase(&view) {
            Ok(choice) => choice,
            Err(err) => {
                self.fallbacks += 1;
                let choice = fallback_purchase(&view);
                self.game.logger.normal(&format!(
                    "{} failed ({}); using fallback {:?}",
                    controller.controller_name(),
                    err,
                    choice
                ));
                choice
            }
        }
    }

    /// Leftover currency becomes mitigation, up to the configured cap
    fn convert_currency(&mut self, idx: usize) {
        let cap = self.game.rules.mitigation_cap;
        let player = &mut self.game.players[idx];
        let leftover = std::mem::take(&mut player.currency);
        if leftover == 0 {
            return;
        }
        let gained = player.add_mitigation(leftover, cap);
        let message = format!(
            "{} converts {} currency into {} shield (now {})",
            player.name, leftover, gained, player.mitigation
        );
        self.game.logger.normal(&message);
    }

    fn combat_phase(&mut self) {
        let total = self.game.counters.attack_total();
        if total == 0 {
            return;
        }
        let idx = self.game.turn.active_player_idx;
        let attacker = self.game.players[idx].name.to_string();

        match self.game.rules.attack_target {
            AttackTarget::Opponent => {
                let defender = &mut self.game.players[1 - idx];
                let report = apply_damage(defender, total);
                let message = format!(
                    "{} attacks {} for {} ({} absorbed, {} now {})",
                    attacker, defender.name, total, report.absorbed, defender.name, defender.primary
                );
                self.game.logger.normal(&message);
            }
            AttackTarget::Hazard => self.attack_hazard(&attacker, total),
        }
    }

    fn attack_hazard(&mut self, attacker: &str, total: u32) {
        let Some(hazard) = self.game.hazard.as_mut() else {
            self.game.logger.normal("There is no hazard to attack");
            return;
        };
        let defeated = hazard.take_damage(total);
        let card = hazard.card;
        let health = hazard.health;
        self.game.logger.normal(&format!(
            "{} hits the hazard {} for {} (health {})",
            attacker, card, total, health
        ));
        if defeated {
            self.game.pool.discard([card]);
            self.game.hazards_defeated += 1;
            match self.game.replace_hazard() {
                Some(next) => self.game.logger.normal(&format!(
                    "Hazard {} defeated; {} appears (health {})",
                    card, next.card, next.health
                )),
                None => self
                    .game
                    .logger
                    .normal(&format!("Hazard {} defeated; the pool is empty", card)),
            }
        }
    }

    fn repair_phase(&mut self) {
        let heal = self.game.counters.heal_total();
        if heal == 0 {
            return;
        }
        let idx = self.game.turn.active_player_idx;
        let player = &mut self.game.players[idx];
        let applied = player.repair(heal);
        let message = format!(
            "{} repairs {} (of {}), now {}",
            player.name, applied, heal, player.primary
        );
        self.game.logger.normal(&message);
    }

    fn end_phase(&mut self) {
        let idx = self.game.turn.active_player_idx;
        let moved = self.game.players[idx].zones.discard_hand();
        let message = format!("{} discards {} cards", self.game.players[idx].name, moved);
        self.game.logger.verbose(&message);

        if let Some(hazard) = self.game.hazard {
            let reports = apply_damage_to_all(self.game.players.iter_mut(), hazard.damage);
            for (player, report) in self.game.players.iter().zip(reports) {
                self.game.logger.normal(&format!(
                    "Hazard {} strikes {} for {} ({} absorbed, now {})",
                    hazard.card, player.name, report.incoming, report.absorbed, player.primary
                ));
            }
        }
    }

    /// Defeat check after a completed player-turn
    ///
    /// In a cooperative game any fall is a loss for both seats.
    fn check_win_condition(&self) -> Option<GameResult> {
        let defeated: SmallVec<[PlayerId; 2]> = self
            .game
            .players
            .iter()
            .filter(|p| p.is_defeated())
            .map(|p| p.id)
            .collect();

        let (winner, end_reason) = match defeated.as_slice() {
            [] => return None,
            [loser] if self.game.rules.cooperative => (None, GameEndReason::PlayerDefeated(*loser)),
            [loser] => {
                let winner = self.game.players.iter().find(|p| p.id != *loser).map(|p| p.id);
                (winner, GameEndReason::PlayerDefeated(*loser))
            }
            _ => (None, GameEndReason::BothDefeated),
        };

        Some(GameResult {
            winner,
            turns_played: self.turns_elapsed,
            rounds_played: self.game.turn.round,
            end_reason,
            hazards_defeated: self.game.hazards_defeated,
        })
    }

    /// Neither the round limit nor the stalemate guard names a winner
    fn drawn_result(&self, end_reason: GameEndReason, rounds_played: u32) -> GameResult {
        GameResult {
            winner: None,
            turns_played: self.turns_elapsed,
            rounds_played,
            end_reason,
            hazards_defeated: self.game.hazards_defeated,
        }
    }

    fn finish_game(
        &mut self,
        controller1: &mut dyn PlayerController,
        controller2: &mut dyn PlayerController,
        result: &GameResult,
    ) -> Result<()> {
        let winner_name = result
            .winner
            .and_then(|id| self.game.player(id).ok())
            .map(|p| p.name.to_string());

        let reason = match result.end_reason {
            GameEndReason::PlayerDefeated(loser) => match self.game.player(loser) {
                Ok(p) => format!("{} defeated", p.name),
                Err(_) => result.end_reason.describe(),
            },
            _ => result.end_reason.describe(),
        };
        let shared_loss = self.game.rules.cooperative
            && matches!(
                result.end_reason,
                GameEndReason::PlayerDefeated(_) | GameEndReason::BothDefeated
            );
        let headline = match &winner_name {
            Some(name) => format!("{} wins", name),
            None if shared_loss => "Party defeated".to_string(),
            None => "Draw".to_string(),
        };
        self.game.logger.minimal(&format!(
            "Game over: {} ({}) after {} turns",
            headline, reason, result.turns_played
        ));

        if let Some(sink) = self.telemetry.as_deref_mut() {
            sink.record_outcome(&OutcomeRecord {
                session_id: self.game.session_id.clone(),
                timestamp_ms: now_ms(),
                winner: winner_name,
                is_draw: result.is_draw(),
                total_turns: result.turns_played,
                end_reason: reason,
            })?;
            sink.flush()?;
        }

        self.notify_game_end(controller1, result.winner);
        self.notify_game_end(controller2, result.winner);
        Ok(())
    }

    fn notify_game_end(&self, controller: &mut dyn PlayerController, winner: Option<PlayerId>) {
        let id = controller.player_id();
        let view = GameStateView::new(&*self.game, id);
        controller.on_game_end(&view, winner == Some(id));
    }
}

/// Reject indices outside the hand and maneuvers for suits with no effect
fn validate_action(view: &GameStateView, choice: ActionChoice) -> Result<ActionChoice> {
    let hand = view.hand();
    let index = match choice {
        ActionChoice::EndPhase => return Ok(choice),
        ActionChoice::PlayResource(i) | ActionChoice::PlayManeuver(i) => i,
    };
    let card = hand.get(index).copied().ok_or_else(|| {
        DuelError::InvalidSelection(format!("hand index {} out of {} cards", index, hand.len()))
    })?;
    if matches!(choice, ActionChoice::PlayManeuver(_)) && view.maneuver_for(card).is_none() {
        return Err(DuelError::InvalidSelection(format!("{} has no maneuver", card)));
    }
    Ok(choice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Rank, Suit};
    use crate::game::{MemorySink, ScriptedController, ZeroController};
    use crate::rules::RulesConfig;
    use crate::zones::Pile;

    fn quiet_game(rules: RulesConfig, seed: u64) -> GameState {
        let mut game = GameState::new_two_player("Alice", "Bob", rules, seed).unwrap();
        game.logger.enable_capture();
        game
    }

    /// Replace a player's deck so the next draw is known
    fn stack_deck(game: &mut GameState, seat: usize, cards: &[Card]) {
        let zones = &mut game.players[seat].zones;
        zones.deck = Pile::from_cards(cards.iter().copied());
        zones.discard = Pile::new();
    }

    fn spade(rank: Rank) -> Card {
        Card::new(Suit::Spades, rank)
    }

    #[test]
    fn test_three_attack_maneuvers_deal_six() {
        let mut game = quiet_game(RulesConfig::starship(), 1);
        stack_deck(
            &mut game,
            0,
            &[spade(Rank::Two), spade(Rank::Three), spade(Rank::Four), Card::new(Suit::Clubs, Rank::Two)],
        );

        let mut p1 = ScriptedController::new(
            PlayerId::new(0),
            vec![
                ActionChoice::PlayManeuver(0),
                ActionChoice::PlayManeuver(0),
                ActionChoice::PlayManeuver(0),
                ActionChoice::EndPhase,
            ],
        );
        let mut p2 = ZeroController::new(PlayerId::new(1));

        let mut game_loop = GameLoop::new(&mut game);
        let result = game_loop.run_turns(&mut p1, &mut p2, 1).unwrap();
        assert!(result.is_none());
        assert_eq!(game.players[1].primary, 9);
        assert_eq!(game.players[0].zones.discard.len(), 4);
    }

    #[test]
    fn test_invalid_index_retried_then_fallback() {
        let mut game = quiet_game(RulesConfig::starship(), 2);
        stack_deck(&mut game, 0, &[spade(Rank::Two), spade(Rank::Nine)]);

        // Four bad answers exhaust three retries
        let mut p1 = ScriptedController::new(PlayerId::new(0), vec![ActionChoice::PlayResource(7); 4]);
        let mut p2 = ZeroController::new(PlayerId::new(1));

        let mut game_loop = GameLoop::new(&mut game);
        game_loop.run_turns(&mut p1, &mut p2, 1).unwrap();
        assert_eq!(game_loop.invalid_choices(), 4);
        assert_eq!(game_loop.fallbacks_used(), 1);
        // Fallback banked the nine; the script then ended the phase
        assert_eq!(game.players[0].mitigation, 9);
        assert_eq!(game.players[1].primary, 15);
    }

    #[test]
    fn test_leftover_currency_capped() {
        let mut rules = RulesConfig::starship();
        rules.mitigation_cap = Some(5);
        let mut game = quiet_game(rules, 3);
        stack_deck(&mut game, 0, &[Card::new(Suit::Hearts, Rank::King), spade(Rank::Four)]);

        let mut p1 = ScriptedController::new(
            PlayerId::new(0),
            vec![ActionChoice::PlayResource(0), ActionChoice::PlayResource(0)],
        );
        let mut p2 = ZeroController::new(PlayerId::new(1));
        GameLoop::new(&mut game).run_turns(&mut p1, &mut p2, 1).unwrap();
        assert_eq!(game.players[0].mitigation, 5);
        assert_eq!(game.players[0].currency, 0);
    }

    #[test]
    fn test_mitigation_resets_on_owners_turn() {
        let mut game = quiet_game(RulesConfig::starship(), 4);
        stack_deck(&mut game, 0, &[Card::new(Suit::Hearts, Rank::Six)]);

        let mut p1 = ScriptedController::new(PlayerId::new(0), vec![ActionChoice::PlayResource(0)]);
        let mut p2 = ZeroController::new(PlayerId::new(1));
        let mut game_loop = GameLoop::new(&mut game);
        game_loop.run_turns(&mut p1, &mut p2, 2).unwrap();
        // Still shielded through the opponent's turn
        assert_eq!(game_loop.game.players[0].mitigation, 6);
        game_loop.run_turns(&mut p1, &mut p2, 1).unwrap();
        assert_eq!(game_loop.game.players[0].mitigation, 0);
    }

    #[test]
    fn test_simultaneous_defeat_is_draw() {
        let mut game = quiet_game(RulesConfig::starship(), 5);
        game.players[0].primary = 1;
        game.players[1].primary = 1;
        // A hazard that strikes both players after the first turn
        let card = spade(Rank::Five);
        game.hazard = Some(crate::game::HazardState::new(card, 5));

        // Ends its action phase at once, so no shield is banked
        let mut p1 = ScriptedController::new(PlayerId::new(0), Vec::new());
        let mut p2 = ZeroController::new(PlayerId::new(1));
        let mut sink = MemorySink::new();
        let result = GameLoop::new(&mut game)
            .with_telemetry(&mut sink)
            .run_game(&mut p1, &mut p2)
            .unwrap();

        assert!(result.is_draw());
        assert_eq!(result.end_reason, GameEndReason::BothDefeated);
        assert_eq!(result.turns_played, 1);
        assert_eq!(sink.outcomes.len(), 1);
        assert!(sink.outcomes[0].is_draw);
        assert_eq!(sink.outcomes[0].winner, None);
        assert_eq!(sink.states.len(), 7);
    }

    #[test]
    fn test_round_limit_is_draw_despite_primary_lead() {
        let mut game = quiet_game(RulesConfig::skirmish(), 6);
        game.players[1].primary = 14;
        let mut p1 = ZeroController::new(PlayerId::new(0));
        let mut p2 = ZeroController::new(PlayerId::new(1));

        let result = GameLoop::new(&mut game).run_game(&mut p1, &mut p2).unwrap();
        assert_eq!(result.end_reason, GameEndReason::RoundLimit);
        assert_eq!(result.winner, None);
        assert!(result.is_draw());
        assert_eq!(result.turns_played, 16);
        assert_eq!(result.rounds_played, 8);
        assert!(game.logger.logs().contains("Game over: Draw (round limit)"));
    }

    #[test]
    fn test_unlimited_game_stalls_into_stalemate() {
        let mut game = quiet_game(RulesConfig::starship(), 9);
        assert_eq!(game.rules.max_rounds, None);
        game.players[1].primary = 14;
        let mut p1 = ZeroController::new(PlayerId::new(0));
        let mut p2 = ZeroController::new(PlayerId::new(1));

        let result = GameLoop::new(&mut game)
            .with_verbosity(VerbosityLevel::Silent)
            .run_game(&mut p1, &mut p2)
            .unwrap();
        assert_eq!(result.end_reason, GameEndReason::Stalemate);
        assert_eq!(result.winner, None);
        assert_eq!(result.rounds_played, STALEMATE_ROUNDS);
        assert_eq!(result.turns_played, 2 * STALEMATE_ROUNDS);
    }

    #[test]
    fn test_cooperative_fall_has_no_winner() {
        let mut rules = RulesConfig::starship();
        rules.cooperative = true;
        let mut game = quiet_game(rules, 10);
        game.players[0].primary = 1;
        game.hazard = Some(crate::game::HazardState::new(spade(Rank::Five), 5));

        let mut p1 = ScriptedController::new(PlayerId::new(0), Vec::new());
        let mut p2 = ZeroController::new(PlayerId::new(1));
        let result = GameLoop::new(&mut game).run_game(&mut p1, &mut p2).unwrap();

        assert_eq!(result.end_reason, GameEndReason::PlayerDefeated(PlayerId::new(0)));
        assert_eq!(result.winner, None);
        assert!(game.players[1].primary > 0);
        assert!(game.logger.logs().contains("Game over: Party defeated (Alice defeated)"));
    }

    #[test]
    fn test_mismatched_controllers_rejected() {
        let mut game = quiet_game(RulesConfig::starship(), 7);
        let mut p1 = ZeroController::new(PlayerId::new(1));
        let mut p2 = ZeroController::new(PlayerId::new(0));
        let err = GameLoop::new(&mut game).run_game(&mut p1, &mut p2).unwrap_err();
        assert!(matches!(err, DuelError::InvalidAction(_)));
    }

    #[test]
    fn test_validate_action_rejects_missing_maneuver() {
        let mut rules = RulesConfig::starship();
        rules.suit_effects = crate::core::SuitEffectTable::new();
        let mut game = quiet_game(rules, 8);
        game.players[0].zones.hand.add(spade(Rank::Two));
        let view = GameStateView::new(&game, PlayerId::new(0));

        assert!(validate_action(&view, ActionChoice::PlayManeuver(0)).is_err());
        assert!(validate_action(&view, ActionChoice::PlayResource(0)).is_ok());
        assert!(validate_action(&view, ActionChoice::PlayResource(1)).is_err());
        assert_eq!(validate_action(&view, ActionChoice::EndPhase).unwrap(), ActionChoice::EndPhase);
    }
}
