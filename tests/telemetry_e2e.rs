//! Telemetry tests
//!
//! Runs whole games into JSONL sinks and reads the records back.

use card_duel_engine::{
    core::PlayerId,
    game::{
        telemetry::{OUTCOMES_FILE, STATES_FILE},
        GameLoop, GameState, JsonlSink, OutcomeRecord, StateSnapshot, VerbosityLevel, ZeroController,
    },
    rules::RulesConfig,
    Result,
};
use similar_asserts::assert_eq;
use std::path::PathBuf;

fn play_skirmish(seed: u64, sink: &mut JsonlSink<Vec<u8>>) -> Result<()> {
    let mut game = GameState::new_two_player("Alice", "Bob", RulesConfig::skirmish(), seed)?;
    let mut controller1 = ZeroController::new(PlayerId::new(0));
    let mut controller2 = ZeroController::new(PlayerId::new(1));
    GameLoop::new(&mut game)
        .with_verbosity(VerbosityLevel::Silent)
        .with_telemetry(sink)
        .run_game(&mut controller1, &mut controller2)?;
    Ok(())
}

fn parse_lines<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Vec<T> {
    String::from_utf8(bytes.to_vec())
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_one_record_per_phase() -> Result<()> {
    let mut sink = JsonlSink::new(Vec::new(), Vec::new());
    play_skirmish(3, &mut sink)?;
    let (states, outcomes) = sink.into_inner();

    let states: Vec<StateSnapshot> = parse_lines(&states);
    // 8 rounds, 2 seats, 7 phases each
    assert_eq!(states.len(), 112);

    let phases: Vec<&str> = states.iter().take(7).map(|s| s.phase.as_str()).collect();
    assert_eq!(
        phases,
        vec!["start", "draw", "action", "purchase", "combat", "repair", "end"]
    );
    assert!(states.iter().all(|s| s.session_id == states[0].session_id));
    assert!(states.iter().all(|s| s.seats.len() == 2));
    assert_eq!(states[0].acting_player, "Alice");
    assert_eq!(states[7].acting_player, "Bob");
    assert_eq!(states.last().map(|s| s.turn_number), Some(8));
    assert_eq!(states.last().map(|s| s.player_turn), Some(15));

    let outcomes: Vec<OutcomeRecord> = parse_lines(&outcomes);
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_draw);
    assert_eq!(outcomes[0].winner, None);
    assert_eq!(outcomes[0].total_turns, 16);
    assert_eq!(outcomes[0].end_reason, "round limit");
    assert_eq!(outcomes[0].session_id, states[0].session_id);
    Ok(())
}

#[test]
fn test_card_sizes_add_up_in_snapshots() -> Result<()> {
    let mut sink = JsonlSink::new(Vec::new(), Vec::new());
    play_skirmish(4, &mut sink)?;
    let (states, _) = sink.into_inner();

    for state in parse_lines::<StateSnapshot>(&states) {
        for seat in &state.seats {
            let held = seat.hand_size + seat.deck_size + seat.discard_size + seat.in_play_size;
            // Zero never buys, so each seat keeps its 10-card starter
            assert_eq!(held, 10, "{} in {}", seat.name, state.phase);
        }
        assert_eq!(state.market_occupied + state.pool_deck_size + state.pool_discard_size, 52);
    }
    Ok(())
}

#[test]
fn test_file_sink_appends_across_games() -> Result<()> {
    let dir: PathBuf = std::env::temp_dir().join(format!("duel-telemetry-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    for seed in [1, 2] {
        let mut game = GameState::new_two_player("Alice", "Bob", RulesConfig::skirmish(), seed)?;
        let mut sink = JsonlSink::append_in_dir(&dir)?;
        let mut controller1 = ZeroController::new(PlayerId::new(0));
        let mut controller2 = ZeroController::new(PlayerId::new(1));
        GameLoop::new(&mut game)
            .with_verbosity(VerbosityLevel::Silent)
            .with_telemetry(&mut sink)
            .run_game(&mut controller1, &mut controller2)?;
    }

    let outcomes = std::fs::read(dir.join(OUTCOMES_FILE))?;
    let outcomes: Vec<OutcomeRecord> = parse_lines(&outcomes);
    assert_eq!(outcomes.len(), 2);
    assert_ne!(outcomes[0].session_id, outcomes[1].session_id);

    let states = std::fs::read(dir.join(STATES_FILE))?;
    assert_eq!(parse_lines::<StateSnapshot>(&states).len(), 224);

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
