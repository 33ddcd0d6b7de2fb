//! Write-only telemetry: one record per phase transition plus an outcome
//!
//! The engine never reads these back. `JsonlSink` writes newline-delimited
//! JSON so a finished session can be replayed into analysis tooling.

use crate::game::{GameState, Phase};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

pub const STATES_FILE: &str = "game_states.jsonl";
pub const OUTCOMES_FILE: &str = "game_outcomes.jsonl";

/// Public counters for one seat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSnapshot {
    pub name: String,
    pub primary: i32,
    pub mitigation: u32,
    pub hand_size: usize,
    pub deck_size: usize,
    pub discard_size: usize,
    pub in_play_size: usize,
}

/// Immutable record emitted after each phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub session_id: String,
    pub timestamp_ms: u64,
    /// Round number
    pub turn_number: u32,
    /// Player-turns completed before this one
    pub player_turn: u32,
    pub acting_player: String,
    pub phase: String,
    pub seats: Vec<SeatSnapshot>,
    pub market_occupied: usize,
    pub pool_deck_size: usize,
    pub pool_discard_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hazard_health: Option<i32>,
}

impl StateSnapshot {
    pub fn capture(game: &GameState, phase: Phase) -> Self {
        let acting = &game.players[game.turn.active_player_idx];
        StateSnapshot {
            session_id: game.session_id.clone(),
            timestamp_ms: now_ms(),
            turn_number: game.turn.round,
            player_turn: game.turn.player_turns,
            acting_player: acting.name.to_string(),
            phase: phase.name().to_string(),
            seats: game
                .players
                .iter()
                .map(|p| SeatSnapshot {
                    name: p.name.to_string(),
                    primary: p.primary,
                    mitigation: p.mitigation,
                    hand_size: p.zones.hand.len(),
                    deck_size: p.zones.deck.len(),
                    discard_size: p.zones.discard.len(),
                    in_play_size: p.zones.in_play.len(),
                })
                .collect(),
            market_occupied: game.pool.occupied_slots(),
            pool_deck_size: game.pool.deck_len(),
            pool_discard_size: game.pool.discard_len(),
            hazard_health: game.hazard.map(|h| h.health),
        }
    }
}

/// Terminal record for a finished game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub session_id: String,
    pub timestamp_ms: u64,
    /// Winner's name, None on a draw
    pub winner: Option<String>,
    pub is_draw: bool,
    pub total_turns: u32,
    pub end_reason: String,
}

/// Destination for telemetry records
pub trait TelemetrySink {
    fn record_state(&mut self, snapshot: &StateSnapshot) -> Result<()>;

    fn record_outcome(&mut self, outcome: &OutcomeRecord) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Keeps every record in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub states: Vec<StateSnapshot>,
    pub outcomes: Vec<OutcomeRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TelemetrySink for MemorySink {
    fn record_state(&mut self, snapshot: &StateSnapshot) -> Result<()> {
        self.states.push(snapshot.clone());
        Ok(())
    }

    fn record_outcome(&mut self, outcome: &OutcomeRecord) -> Result<()> {
        self.outcomes.push(outcome.clone());
        Ok(())
    }
}

/// Newline-delimited JSON over two writers
pub struct JsonlSink<W: Write> {
    states: W,
    outcomes: W,
}

impl<W: Write> JsonlSink<W> {
    pub fn new(states: W, outcomes: W) -> Self {
        JsonlSink { states, outcomes }
    }

    /// Take back the (states, outcomes) writers
    pub fn into_inner(self) -> (W, W) {
        (self.states, self.outcomes)
    }
}

impl JsonlSink<BufWriter<File>> {
    /// Append to `game_states.jsonl` and `game_outcomes.jsonl` under `dir`
    pub fn append_in_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let open = |name: &str| -> Result<BufWriter<File>> {
            let file = OpenOptions::new().create(true).append(true).open(dir.join(name))?;
            Ok(BufWriter::new(file))
        };
        Ok(JsonlSink::new(open(STATES_FILE)?, open(OUTCOMES_FILE)?))
    }
}

impl<W: Write> TelemetrySink for JsonlSink<W> {
    fn record_state(&mut self, snapshot: &StateSnapshot) -> Result<()> {
        serde_json::to_writer(&mut self.states, snapshot)?;
        self.states.write_all(b"\n")?;
        Ok(())
    }

    fn record_outcome(&mut self, outcome: &OutcomeRecord) -> Result<()> {
        serde_json::to_writer(&mut self.outcomes, outcome)?;
        self.outcomes.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.states.flush()?;
        self.outcomes.flush()?;
        Ok(())
    }
}

/// Milliseconds since the Unix epoch, 0 if the clock is before it
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome() -> OutcomeRecord {
        OutcomeRecord {
            session_id: "abc".to_string(),
            timestamp_ms: 1,
            winner: None,
            is_draw: true,
            total_turns: 6,
            end_reason: "both defeated".to_string(),
        }
    }

    #[test]
    fn test_jsonl_one_record_per_line() {
        let mut sink = JsonlSink::new(Vec::new(), Vec::new());
        sink.record_outcome(&outcome()).unwrap();
        sink.record_outcome(&outcome()).unwrap();

        let (states, outcomes) = sink.into_inner();
        assert!(states.is_empty());
        let text = String::from_utf8(outcomes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["winner"], serde_json::Value::Null);
        assert_eq!(parsed["is_draw"], true);
        assert_eq!(parsed["total_turns"], 6);
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        sink.record_outcome(&outcome()).unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.outcomes.len(), 1);
        assert!(sink.states.is_empty());
    }

    #[test]
    fn test_clock_is_after_epoch() {
        assert!(now_ms() > 0);
    }
}
