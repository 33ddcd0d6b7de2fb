//! Interactive controller for human players
//!
//! Prints the acting player's view and reads one command per line. Bad input
//! re-prompts; a closed input stream is reported as a strategy failure so the
//! engine's fallback takes over.

use crate::core::{Card, PlayerId};
use crate::game::controller::{ActionChoice, GameStateView, PlayerController, PurchaseChoice};
use crate::{DuelError, Result};
use std::io::{self, BufRead, Write};

/// A controller that prompts a human player on a line-oriented terminal
pub struct InteractiveController<R = io::StdinLock<'static>, W = io::Stdout> {
    player_id: PlayerId,
    input: R,
    output: W,
}

impl InteractiveController {
    /// Prompt on stdout, read from stdin
    pub fn new(player_id: PlayerId) -> Self {
        InteractiveController {
            player_id,
            input: io::stdin().lock(),
            output: io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> InteractiveController<R, W> {
    pub fn with_io(player_id: PlayerId, input: R, output: W) -> Self {
        InteractiveController {
            player_id,
            input,
            output,
        }
    }

    /// Give back the output stream (tests read the transcript from it)
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{} ", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(DuelError::StrategyFailure("input closed".to_string()));
        }
        Ok(line.trim().to_lowercase())
    }

    fn show_status(&mut self, view: &GameStateView) -> Result<()> {
        writeln!(
            self.output,
            "\nRound {} | you: {} (+{} shield) | {}: {} (+{} shield) | currency {}",
            view.round(),
            view.primary(),
            view.mitigation(),
            view.opponent_name(),
            view.opponent_primary(),
            view.opponent_mitigation(),
            view.currency()
        )?;
        if let Some(hazard) = view.hazard() {
            writeln!(
                self.output,
                "Hazard: {} ({} health, strikes for {})",
                hazard.card, hazard.health, hazard.damage
            )?;
        }
        Ok(())
    }

    fn show_hand(&mut self, view: &GameStateView) -> Result<()> {
        writeln!(self.output, "Hand:")?;
        for (i, card) in view.hand().iter().enumerate() {
            let maneuver = view
                .maneuver_for(*card)
                .map(|m| m.describe())
                .unwrap_or("none");
            writeln!(
                self.output,
                "  [{}] {} (value {}, maneuver: {})",
                i,
                card,
                view.face_value(*card),
                maneuver
            )?;
        }
        Ok(())
    }

    fn show_market(&mut self, view: &GameStateView) -> Result<()> {
        writeln!(self.output, "Market:")?;
        for (i, slot) in view.market().iter().enumerate() {
            match slot {
                Some(card) => writeln!(self.output, "  [{}] {} (cost {})", i, card, view.face_value(*card))?,
                None => writeln!(self.output, "  [{}] (empty)", i)?,
            }
        }
        Ok(())
    }
}

/// Parse an Action-phase command: `r <n>`, `m <n>` or `done`
fn parse_action(line: &str, hand_len: usize) -> Option<ActionChoice> {
    let mut parts = line.split_whitespace();
    let verb = parts.next()?;
    if matches!(verb, "d" | "done" | "end") {
        return Some(ActionChoice::EndPhase);
    }
    let index: usize = parts.next()?.parse().ok()?;
    if index >= hand_len || parts.next().is_some() {
        return None;
    }
    match verb {
        "r" | "resource" => Some(ActionChoice::PlayResource(index)),
        "m" | "maneuver" => Some(ActionChoice::PlayManeuver(index)),
        _ => None,
    }
}

/// Parse a Purchase-phase command: a slot number or `skip`
fn parse_purchase(line: &str, slots: usize) -> Option<PurchaseChoice> {
    match line {
        "" | "s" | "skip" => Some(PurchaseChoice::Skip),
        _ => {
            let digits = line.strip_prefix("buy").unwrap_or(line).trim();
            let slot: usize = digits.parse().ok()?;
            (slot < slots).then_some(PurchaseChoice::Purchase(slot))
        }
    }
}

impl<R: BufRead, W: Write> PlayerController for InteractiveController<R, W> {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn controller_name(&self) -> &str {
        "interactive"
    }

    fn choose_action(&mut self, view: &GameStateView) -> Result<ActionChoice> {
        self.show_status(view)?;
        self.show_hand(view)?;
        loop {
            let line = self.read_line("Play 'r <n>' (resource), 'm <n>' (maneuver) or 'done':")?;
            match parse_action(&line, view.hand_len()) {
                Some(choice) => return Ok(choice),
                None => writeln!(self.output, "Invalid choice: '{}'", line)?,
            }
        }
    }

    fn choose_purchase(&mut self, view: &GameStateView) -> Result<PurchaseChoice> {
        self.show_market(view)?;
        loop {
            let prompt = format!("You have {} currency. Buy slot number or 'skip':", view.currency());
            let line = self.read_line(&prompt)?;
            match parse_purchase(&line, view.market().len()) {
                Some(choice) => return Ok(choice),
                None => writeln!(self.output, "Invalid choice: '{}'", line)?,
            }
        }
    }

    fn choose_search_card(&mut self, view: &GameStateView, revealed: &[Card]) -> Result<usize> {
        writeln!(self.output, "Search reveals:")?;
        for (i, card) in revealed.iter().enumerate() {
            writeln!(self.output, "  [{}] {} (value {})", i, card, view.face_value(*card))?;
        }
        loop {
            let line = self.read_line("Keep which card?")?;
            match line.parse::<usize>() {
                Ok(index) if index < revealed.len() => return Ok(index),
                _ => writeln!(self.output, "Enter 0-{}", revealed.len().saturating_sub(1))?,
            }
        }
    }

    fn on_game_end(&mut self, view: &GameStateView, won: bool) {
        let line = if won { "You win!" } else { "Game over." };
        // A closed terminal at the end of the game is not worth reporting
        let _ = writeln!(self.output, "{} Final {}: {}", line, view.player_id(), view.primary());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Rank, Suit};
    use crate::game::GameState;
    use crate::rules::RulesConfig;
    use std::io::Cursor;

    #[test]
    fn test_parse_action() {
        assert_eq!(parse_action("r 2", 3), Some(ActionChoice::PlayResource(2)));
        assert_eq!(parse_action("m 0", 3), Some(ActionChoice::PlayManeuver(0)));
        assert_eq!(parse_action("done", 0), Some(ActionChoice::EndPhase));
        assert_eq!(parse_action("r 3", 3), None);
        assert_eq!(parse_action("x 1", 3), None);
        assert_eq!(parse_action("r", 3), None);
        assert_eq!(parse_action("", 3), None);
    }

    #[test]
    fn test_parse_purchase() {
        assert_eq!(parse_purchase("skip", 5), Some(PurchaseChoice::Skip));
        assert_eq!(parse_purchase("", 5), Some(PurchaseChoice::Skip));
        assert_eq!(parse_purchase("4", 5), Some(PurchaseChoice::Purchase(4)));
        assert_eq!(parse_purchase("buy 1", 5), Some(PurchaseChoice::Purchase(1)));
        assert_eq!(parse_purchase("5", 5), None);
    }

    #[test]
    fn test_reprompts_until_valid() {
        let mut game = GameState::new_two_player("Alice", "Bob", RulesConfig::starship(), 0).unwrap();
        game.players[0].zones.hand.add(Card::new(Suit::Spades, Rank::Two));
        let id = PlayerId::new(0);
        let view = GameStateView::new(&game, id);

        let input = Cursor::new("banana\nr 9\nm 0\n");
        let mut controller = InteractiveController::with_io(id, input, Vec::new());
        assert_eq!(controller.choose_action(&view).unwrap(), ActionChoice::PlayManeuver(0));

        let transcript = String::from_utf8(controller.into_output()).unwrap();
        assert_eq!(transcript.matches("Invalid choice").count(), 2);
        assert!(transcript.contains("[0] 2♠"));
    }

    #[test]
    fn test_closed_input_is_strategy_failure() {
        let game = GameState::new_two_player("Alice", "Bob", RulesConfig::starship(), 0).unwrap();
        let id = PlayerId::new(0);
        let view = GameStateView::new(&game, id);

        let mut controller = InteractiveController::with_io(id, Cursor::new(""), Vec::new());
        let err = controller.choose_purchase(&view).unwrap_err();
        assert!(matches!(err, DuelError::StrategyFailure(_)));
    }
}
