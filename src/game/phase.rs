//! Turn phases

use serde::{Deserialize, Serialize};

/// Phases of a single player-turn, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Start,
    Draw,
    Action,
    Purchase,
    Combat,
    Repair,
    End,
}

impl Phase {
    pub const ALL: [Phase; 7] = [
        Phase::Start,
        Phase::Draw,
        Phase::Action,
        Phase::Purchase,
        Phase::Combat,
        Phase::Repair,
        Phase::End,
    ];

    /// Get the next phase in turn order; None after End
    pub fn next(&self) -> Option<Phase> {
        match self {
            Phase::Start => Some(Phase::Draw),
            Phase::Draw => Some(Phase::Action),
            Phase::Action => Some(Phase::Purchase),
            Phase::Purchase => Some(Phase::Combat),
            Phase::Combat => Some(Phase::Repair),
            Phase::Repair => Some(Phase::End),
            Phase::End => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Start => "start",
            Phase::Draw => "draw",
            Phase::Action => "action",
            Phase::Purchase => "purchase",
            Phase::Combat => "combat",
            Phase::Repair => "repair",
            Phase::End => "end",
        }
    }

    /// Phases in which the strategy is asked for a decision
    pub fn is_decision_phase(&self) -> bool {
        matches!(self, Phase::Action | Phase::Purchase)
    }
}

/// Represents the current turn structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnStructure {
    /// Round number (starts at 1, advances after both seats have acted)
    pub round: u32,

    /// Player-turns completed so far
    pub player_turns: u32,

    /// Current phase
    pub phase: Phase,

    /// Seat index of the acting player
    pub active_player_idx: usize,
}

impl TurnStructure {
    pub fn new(starting_idx: usize) -> Self {
        TurnStructure {
            round: 1,
            player_turns: 0,
            phase: Phase::Start,
            active_player_idx: starting_idx,
        }
    }

    /// Advance to the next phase
    pub fn advance_phase(&mut self) -> bool {
        if let Some(next) = self.phase.next() {
            self.phase = next;
            true
        } else {
            false // End of turn
        }
    }

    /// Hand the turn to the other seat; the round advances when seat 0 is up again
    pub fn next_turn(&mut self) {
        self.player_turns += 1;
        self.phase = Phase::Start;
        self.active_player_idx = 1 - self.active_player_idx;
        if self.active_player_idx == 0 {
            self.round += 1;
        }
    }

    pub fn opponent_idx(&self) -> usize {
        1 - self.active_player_idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_progression() {
        let mut phase = Phase::Start;
        let mut visited = vec![phase];
        while let Some(next) = phase.next() {
            phase = next;
            visited.push(phase);
        }
        assert_eq!(visited, Phase::ALL.to_vec());
    }

    #[test]
    fn test_decision_phases() {
        assert!(Phase::Action.is_decision_phase());
        assert!(Phase::Purchase.is_decision_phase());
        assert!(!Phase::Combat.is_decision_phase());
    }

    #[test]
    fn test_turn_structure() {
        let mut turn = TurnStructure::new(0);
        assert_eq!(turn.round, 1);
        assert_eq!(turn.phase, Phase::Start);

        while turn.advance_phase() {}
        assert_eq!(turn.phase, Phase::End);

        turn.next_turn();
        assert_eq!(turn.active_player_idx, 1);
        assert_eq!(turn.opponent_idx(), 0);
        assert_eq!(turn.round, 1);
        assert_eq!(turn.phase, Phase::Start);

        turn.next_turn();
        assert_eq!(turn.active_player_idx, 0);
        assert_eq!(turn.round, 2);
        assert_eq!(turn.player_turns, 2);
    }
}
