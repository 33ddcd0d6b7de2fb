//! Batch simulation for running many seeded games in parallel
//!
//! Every game gets its own seed derived from the batch seed and the game
//! index, so a batch is reproducible regardless of how rayon schedules it.

use crate::core::PlayerId;
use crate::game::{
    GameEndReason, GameLoop, GameResult, GameState, HeuristicController, PlayerController,
    RandomController, VerbosityLevel, ZeroController,
};
use crate::rules::RulesConfig;
use crate::Result;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Controller type for simulated games
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerType {
    Zero,
    Random,
    Heuristic,
}

impl ControllerType {
    fn build(self, player_id: PlayerId, seed: u64) -> Box<dyn PlayerController> {
        match self {
            ControllerType::Zero => Box::new(ZeroController::new(player_id)),
            ControllerType::Random => Box::new(RandomController::with_seed(player_id, seed)),
            ControllerType::Heuristic => Box::new(HeuristicController::new(player_id)),
        }
    }
}

/// What to simulate
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub games: usize,
    pub seed: u64,
    pub rules: RulesConfig,
    pub p1: ControllerType,
    pub p2: ControllerType,
}

/// Aggregated results of a batch
#[derive(Debug, Clone, Default)]
pub struct SimulationSummary {
    pub games: usize,
    pub p1_wins: usize,
    pub p2_wins: usize,
    pub draws: usize,
    /// Games that returned an error instead of a result
    pub failures: usize,
    pub total_turns: u64,
    pub hazards_defeated: u64,
    /// Finished games by end reason ("defeat", "both defeated", "round limit", "stalemate")
    pub end_reasons: FxHashMap<&'static str, usize>,
    pub elapsed: Duration,
}

impl SimulationSummary {
    fn record(&mut self, result: &GameResult) {
        self.games += 1;
        self.total_turns += u64::from(result.turns_played);
        self.hazards_defeated += u64::from(result.hazards_defeated);
        match result.winner.map(|id| id.index()) {
            Some(0) => self.p1_wins += 1,
            Some(_) => self.p2_wins += 1,
            None => self.draws += 1,
        }
        let reason = match result.end_reason {
            GameEndReason::PlayerDefeated(_) => "defeat",
            GameEndReason::BothDefeated => "both defeated",
            GameEndReason::RoundLimit => "round limit",
            GameEndReason::Stalemate => "stalemate",
        };
        *self.end_reasons.entry(reason).or_insert(0) += 1;
    }

    fn merge(mut self, other: SimulationSummary) -> SimulationSummary {
        self.games += other.games;
        self.p1_wins += other.p1_wins;
        self.p2_wins += other.p2_wins;
        self.draws += other.draws;
        self.failures += other.failures;
        self.total_turns += other.total_turns;
        self.hazards_defeated += other.hazards_defeated;
        for (reason, count) in other.end_reasons {
            *self.end_reasons.entry(reason).or_insert(0) += count;
        }
        self
    }

    /// Mean player-turns per finished game
    pub fn average_turns(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_turns as f64 / self.games as f64
        }
    }

    fn percent(&self, count: usize) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            100.0 * count as f64 / self.games as f64
        }
    }
}

impl fmt::Display for SimulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Simulation Complete ===")?;
        writeln!(f, "Games played: {}", self.games)?;
        if self.failures > 0 {
            writeln!(f, "Failed games: {}", self.failures)?;
        }
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            writeln!(f, "Elapsed: {:.2}s ({:.1} games/s)", secs, self.games as f64 / secs)?;
        }
        writeln!(f, "P1 wins: {} ({:.1}%)", self.p1_wins, self.percent(self.p1_wins))?;
        writeln!(f, "P2 wins: {} ({:.1}%)", self.p2_wins, self.percent(self.p2_wins))?;
        writeln!(f, "Draws: {} ({:.1}%)", self.draws, self.percent(self.draws))?;
        writeln!(f, "Average turns: {:.1}", self.average_turns())?;
        if self.hazards_defeated > 0 {
            writeln!(f, "Hazards defeated: {}", self.hazards_defeated)?;
        }

        let mut reasons: Vec<_> = self.end_reasons.iter().collect();
        reasons.sort();
        for (reason, count) in reasons {
            writeln!(f, "  {}: {}", reason, count)?;
        }
        Ok(())
    }
}

/// Seed for game `index` of a batch
pub fn game_seed(batch_seed: u64, index: usize) -> u64 {
    batch_seed.wrapping_add((index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Play one silent game
pub fn play_one(rules: &RulesConfig, seed: u64, p1: ControllerType, p2: ControllerType) -> Result<GameResult> {
    let mut game = GameState::new_two_player("Player 1", "Player 2", rules.clone(), seed)?;
    let p1_id = game.players[0].id;
    let p2_id = game.players[1].id;

    let mut controller1 = p1.build(p1_id, seed.wrapping_add(0x1234_5678_9ABC_DEF0));
    let mut controller2 = p2.build(p2_id, seed.wrapping_add(0xFEDC_BA98_7654_3210));

    let mut game_loop = GameLoop::new(&mut game).with_verbosity(VerbosityLevel::Silent);
    game_loop.run_game(&mut *controller1, &mut *controller2)
}

/// Run the whole batch across the rayon pool
pub fn run_simulation(config: &SimulationConfig) -> SimulationSummary {
    let start = Instant::now();
    let mut summary = (0..config.games)
        .into_par_iter()
        .map(|index| {
            let mut partial = SimulationSummary::default();
            match play_one(&config.rules, game_seed(config.seed, index), config.p1, config.p2) {
                Ok(result) => partial.record(&result),
                Err(e) => {
                    eprintln!("Warning: game {} failed: {}", index, e);
                    partial.failures += 1;
                }
            }
            partial
        })
        .reduce(SimulationSummary::default, SimulationSummary::merge);
    summary.elapsed = start.elapsed();
    summary
}
