//! Game state, turn structure and the controllers that drive it

pub mod combat;
pub mod controller;
pub mod external_controller;
pub mod game_loop;
pub mod heuristic_controller;
pub mod interactive_controller;
pub mod logger;
pub mod phase;
pub mod random_controller;
pub mod scripted_controller;
pub mod state;
pub mod telemetry;
pub mod zero_controller;

pub use combat::{DamageReport, HazardState, TurnCounters};
pub use controller::{ActionChoice, GameStateView, PlayerController, PurchaseChoice};
pub use external_controller::ExternalController;
pub use game_loop::{GameEndReason, GameLoop, GameResult, VerbosityLevel, STALEMATE_ROUNDS};
pub use heuristic_controller::HeuristicController;
pub use interactive_controller::InteractiveController;
pub use logger::{GameLogger, LogEntry, OutputMode};
pub use phase::{Phase, TurnStructure};
pub use random_controller::RandomController;
pub use scripted_controller::ScriptedController;
pub use state::GameState;
pub use telemetry::{JsonlSink, MemorySink, OutcomeRecord, StateSnapshot, TelemetrySink};
pub use zero_controller::ZeroController;
