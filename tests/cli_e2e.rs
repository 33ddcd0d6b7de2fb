//! End-to-end tests for the `duel` binary
//!
//! Runs the compiled binary directly and compares stdout across runs.

use similar_asserts::assert_eq;
use std::process::{Command, Output};

fn duel(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_duel"))
        .args(args)
        .output()
        .expect("Failed to run duel binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("Invalid UTF-8 in stdout")
}

#[test]
fn test_play_is_deterministic_with_seed() {
    let args = [
        "play",
        "--seed",
        "42",
        "--p1",
        "random",
        "--p2",
        "heuristic",
        "--verbosity",
        "verbose",
    ];
    let run1 = duel(&args);
    let run2 = duel(&args);

    assert!(run1.status.success(), "stderr: {}", String::from_utf8_lossy(&run1.stderr));
    let out1 = stdout(&run1);
    assert!(out1.contains("Game over"));
    assert!(out1.contains("Round 1: Player 1's turn"));
    assert_eq!(out1, stdout(&run2));
}

#[test]
fn test_minimal_verbosity_prints_only_outcome() {
    let output = duel(&["play", "--seed", "7", "--variant", "skirmish", "-v", "1", "--p1", "zero", "--p2", "zero"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.starts_with("Game over: Draw (round limit)"), "{}", out);
    assert!(!out.contains("Round 1"));
}

#[test]
fn test_dungeon_variant_runs() {
    let output = duel(&[
        "play",
        "--variant",
        "dungeon",
        "--difficulty",
        "hard",
        "--class",
        "rogue",
        "--seed",
        "3",
        "--p1",
        "heuristic",
        "--p2",
        "heuristic",
        "--max-rounds",
        "30",
    ]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Hazard"));
}

#[test]
fn test_telemetry_dir_written() {
    let dir = std::env::temp_dir().join(format!("duel-cli-telemetry-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let dir_arg = dir.to_string_lossy().to_string();

    let output = duel(&["play", "--seed", "5", "-v", "silent", "--telemetry-dir", &dir_arg]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());

    let outcomes = std::fs::read_to_string(dir.join("game_outcomes.jsonl")).unwrap();
    assert_eq!(outcomes.lines().count(), 1);
    let states = std::fs::read_to_string(dir.join("game_states.jsonl")).unwrap();
    assert!(states.lines().count() >= 7);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_simulate_reports_totals() {
    let output = duel(&["simulate", "--games", "20", "--seed", "9", "--p1", "heuristic", "--p2", "random"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Games played: 20"), "{}", out);
    assert!(out.contains("P1 wins:"));
}

#[test]
fn test_external_without_agent_fails() {
    let output = duel(&["play", "--p1", "external", "--seed", "1"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--agent-cmd"));
}

#[test]
fn test_bad_verbosity_rejected() {
    let output = duel(&["play", "--verbosity", "loud"]);
    assert!(!output.status.success());
}
