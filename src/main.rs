//! Card Duel Engine - Main Binary
//!
//! Plays a single duel with any mix of controllers, or simulates a batch of
//! seeded games in parallel.

use anyhow::{bail, Context};
use card_duel_engine::{
    core::PlayerId,
    game::{
        ExternalController, GameLoop, GameState, HeuristicController, InteractiveController, JsonlSink,
        PlayerController, RandomController, VerbosityLevel, ZeroController,
    },
    rules::{Difficulty, DungeonClass, RulesConfig},
    tournament::{self, SimulationConfig},
};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::BufReader;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

/// Controller type for a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ControllerType {
    /// Always plays the first card as a resource, never buys
    Zero,
    /// Makes random choices
    Random,
    /// Rule-of-thumb AI
    Heuristic,
    /// Human player on the terminal
    Tui,
    /// JSON-lines agent process (requires --agent-cmd)
    External,
}

/// Simulated games cannot prompt anyone
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SimController {
    Zero,
    Random,
    Heuristic,
}

impl From<SimController> for tournament::ControllerType {
    fn from(c: SimController) -> Self {
        match c {
            SimController::Zero => tournament::ControllerType::Zero,
            SimController::Random => tournament::ControllerType::Random,
            SimController::Heuristic => tournament::ControllerType::Heuristic,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Variant {
    Starship,
    Dungeon,
    Brawler,
    Skirmish,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Normal,
    Hard,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ClassArg {
    Warrior,
    Rogue,
}

/// Verbosity level for game output (accepts names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

/// Rule selection shared by both subcommands
#[derive(Debug, clap::Args)]
struct RulesArgs {
    /// Built-in rule set
    #[arg(long, value_enum, default_value = "starship")]
    variant: Variant,

    /// Load the rule set from a JSON file instead of a preset
    #[arg(long, value_name = "RULES_JSON", conflicts_with = "variant")]
    rules: Option<PathBuf>,

    /// Dungeon difficulty (sets starting health)
    #[arg(long, value_enum, default_value = "normal")]
    difficulty: DifficultyArg,

    /// Dungeon class for both players
    #[arg(long = "class", value_enum, default_value = "warrior")]
    class: ClassArg,

    /// End the game after this many rounds
    #[arg(long)]
    max_rounds: Option<u32>,
}

impl RulesArgs {
    fn resolve(&self) -> anyhow::Result<RulesConfig> {
        let mut rules = match &self.rules {
            Some(path) => RulesConfig::from_json_file(path)
                .with_context(|| format!("loading rules from {}", path.display()))?,
            None => match self.variant {
                Variant::Starship => RulesConfig::starship(),
                Variant::Brawler => RulesConfig::brawler(),
                Variant::Skirmish => RulesConfig::skirmish(),
                Variant::Dungeon => {
                    let difficulty = match self.difficulty {
                        DifficultyArg::Easy => Difficulty::Easy,
                        DifficultyArg::Normal => Difficulty::Normal,
                        DifficultyArg::Hard => Difficulty::Hard,
                    };
                    let class = match self.class {
                        ClassArg::Warrior => DungeonClass::Warrior,
                        ClassArg::Rogue => DungeonClass::Rogue,
                    };
                    RulesConfig::dungeon(difficulty, [class, class])
                }
            },
        };
        if let Some(max) = self.max_rounds {
            rules.max_rounds = Some(max);
        }
        rules.validate()?;
        Ok(rules)
    }
}

#[derive(Parser)]
#[command(name = "duel")]
#[command(about = "Card Duel Engine - standard-deck duel games", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game
    Play {
        #[command(flatten)]
        rules: RulesArgs,

        /// Player 1 controller type
        #[arg(long, value_enum, default_value = "heuristic")]
        p1: ControllerType,

        /// Player 2 controller type
        #[arg(long, value_enum, default_value = "random")]
        p2: ControllerType,

        #[arg(long, default_value = "Player 1")]
        p1_name: String,

        #[arg(long, default_value = "Player 2")]
        p2_name: String,

        /// Command line of the agent process used by external seats
        #[arg(long, value_name = "COMMAND")]
        agent_cmd: Option<String>,

        /// Set random seed for deterministic games
        #[arg(long)]
        seed: Option<u64>,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,

        /// Append state and outcome records to JSONL files in this directory
        #[arg(long, value_name = "DIR")]
        telemetry_dir: Option<PathBuf>,
    },

    /// Run many seeded games in parallel and print win rates
    Simulate {
        #[command(flatten)]
        rules: RulesArgs,

        /// Number of games to run
        #[arg(long, short = 'g', default_value_t = 1000)]
        games: usize,

        /// Batch seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long, value_enum, default_value = "heuristic")]
        p1: SimController,

        #[arg(long, value_enum, default_value = "random")]
        p2: SimController,
    },
}

/// An agent process spoken to over its stdin/stdout
type AgentController = ExternalController<BufReader<ChildStdout>, ChildStdin>;

fn spawn_agent(command: &str, player_id: PlayerId) -> anyhow::Result<(Child, AgentController)> {
    let mut parts = command.split_whitespace();
    let program = parts.next().context("--agent-cmd is empty")?;
    let mut child = Command::new(program)
        .args(parts)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .with_context(|| format!("starting agent '{}'", command))?;
    let stdin = child.stdin.take().context("agent stdin unavailable")?;
    let stdout = child.stdout.take().context("agent stdout unavailable")?;
    Ok((child, ExternalController::new(player_id, BufReader::new(stdout), stdin)))
}

fn build_controller(
    kind: ControllerType,
    player_id: PlayerId,
    seed: u64,
    agent_cmd: Option<&str>,
    agents: &mut Vec<Child>,
) -> anyhow::Result<Box<dyn PlayerController>> {
    Ok(match kind {
        ControllerType::Zero => Box::new(ZeroController::new(player_id)),
        ControllerType::Random => Box::new(RandomController::with_seed(player_id, seed)),
        ControllerType::Heuristic => Box::new(HeuristicController::new(player_id)),
        ControllerType::Tui => Box::new(InteractiveController::new(player_id)),
        ControllerType::External => {
            let Some(command) = agent_cmd else {
                bail!("external controller requires --agent-cmd");
            };
            let (child, controller) = spawn_agent(command, player_id)?;
            agents.push(child);
            Box::new(controller)
        }
    })
}

#[allow(clippy::too_many_arguments)]
fn run_play(
    rules: RulesConfig,
    p1: ControllerType,
    p2: ControllerType,
    p1_name: String,
    p2_name: String,
    agent_cmd: Option<String>,
    seed: Option<u64>,
    verbosity: VerbosityLevel,
    telemetry_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let seed = seed.unwrap_or_else(rand::random);
    let mut game = GameState::new_two_player(p1_name, p2_name, rules, seed)?;
    game.logger.set_verbosity(verbosity);
    if verbosity >= VerbosityLevel::Normal {
        println!("=== {} duel (seed {}) ===", game.rules.variant, seed);
    }

    let p1_id = game.players[0].id;
    let p2_id = game.players[1].id;
    let mut agents = Vec::new();
    let mut controller1 = build_controller(
        p1,
        p1_id,
        seed.wrapping_add(0x1234_5678_9ABC_DEF0),
        agent_cmd.as_deref(),
        &mut agents,
    )?;
    let mut controller2 = build_controller(
        p2,
        p2_id,
        seed.wrapping_add(0xFEDC_BA98_7654_3210),
        agent_cmd.as_deref(),
        &mut agents,
    )?;

    let mut sink = match &telemetry_dir {
        Some(dir) => Some(
            JsonlSink::append_in_dir(dir)
                .with_context(|| format!("opening telemetry files in {}", dir.display()))?,
        ),
        None => None,
    };

    let result = {
        let mut game_loop = GameLoop::new(&mut game).with_verbosity(verbosity);
        if let Some(sink) = sink.as_mut() {
            game_loop = game_loop.with_telemetry(sink);
        }
        game_loop.run_game(&mut *controller1, &mut *controller2)?
    };

    // Closing the pipes lets agents exit on EOF
    drop(controller1);
    drop(controller2);
    for mut agent in agents {
        let _ = agent.wait();
    }

    if verbosity >= VerbosityLevel::Minimal {
        let final_line: Vec<String> = game
            .players
            .iter()
            .map(|p| format!("{} {}", p.name, p.primary))
            .collect();
        println!("Final: {} | rounds {}", final_line.join(", "), result.rounds_played);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            rules,
            p1,
            p2,
            p1_name,
            p2_name,
            agent_cmd,
            seed,
            verbosity,
            telemetry_dir,
        } => run_play(
            rules.resolve()?,
            p1,
            p2,
            p1_name,
            p2_name,
            agent_cmd,
            seed,
            verbosity.0,
            telemetry_dir,
        )?,
        Commands::Simulate {
            rules,
            games,
            seed,
            p1,
            p2,
        } => {
            let config = SimulationConfig {
                games,
                seed,
                rules: rules.resolve()?,
                p1: p1.into(),
                p2: p2.into(),
            };
            println!("Running {} games (seed {}, P1={:?}, P2={:?})", games, seed, p1, p2);
            let summary = tournament::run_simulation(&config);
            print!("{}", summary);
        }
    }

    Ok(())
}
