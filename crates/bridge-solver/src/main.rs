//! CLI entry point for the bridge solver.
//!
//! Usage:
//!   bridge-solver solve [instance.json] [options]
//!   bridge-solver solve --stdin [options]
//!   bridge-solver sample
//!
//! Options:
//!   --strategy <bfs|dfs>   Exploration order (default: bfs)
//!   --max-time <minutes>   Override the instance's time budget
//!   --first                Stop at the first solution
//!   --tree                 Also print every admitted state
//!   --format <text|json>   Output format (default: text)
//!
//! Without an instance file the classic four-person puzzle is solved.
//! Set RUST_LOG=debug to see every pruned state on stderr.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use bridge_solver::{
    narrate, solve, Move, MoveKind, Problem, ProblemConfig, ProblemError, SearchState,
    SearchStats, Side, SolverConfig, SolverResult, Strategy,
};

#[derive(Parser)]
#[command(name = "bridge-solver")]
#[command(about = "Exhaustive bounded solver for the bridge and torch puzzle")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate every crossing plan within the time budget
    Solve {
        /// Path to instance JSON file (defaults to the built-in sample)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read the instance from stdin instead of a file
        #[arg(long, conflicts_with = "file")]
        stdin: bool,

        /// Exploration order
        #[arg(long, value_enum, default_value = "bfs")]
        strategy: StrategyArg,

        /// Time budget in minutes, overriding the instance's
        #[arg(long)]
        max_time: Option<f64>,

        /// Stop at the first solution found
        #[arg(long)]
        first: bool,

        /// Print every admitted state after the solutions
        #[arg(long)]
        tree: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Print the built-in sample instance as JSON
    Sample,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Bfs,
    Dfs,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Bfs => Strategy::Bfs,
            StrategyArg::Dfs => Strategy::Dfs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Output format for a search run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunOutput {
    strategy: Strategy,
    max_time: f64,
    search_exhausted: bool,
    solutions: Vec<SolutionOutput>,
    stats: SearchStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tree: Vec<StateOutput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolutionOutput {
    solution_number: usize,
    total_time: f64,
    moves: Vec<MoveOutput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveOutput {
    kind: MoveKind,
    actors: Vec<String>,
    duration: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StateOutput {
    sequence: u64,
    depth: usize,
    near: Vec<String>,
    far: Vec<String>,
    flashlight: Side,
    elapsed_time: f64,
    path: Vec<MoveOutput>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            file,
            stdin,
            strategy,
            max_time,
            first,
            tree,
            format,
        } => {
            let problem = match load_problem(file, stdin, max_time) {
                Ok(problem) => problem,
                Err(e) => {
                    eprintln!("Error: {e}");
                    return ExitCode::from(2);
                }
            };

            let config = SolverConfig {
                strategy: strategy.into(),
                stop_at_first: first,
                record_tree: tree,
            };

            let result = solve(&problem, &config);

            match format {
                OutputFormat::Text => print_text(&problem, &result, tree),
                OutputFormat::Json => match serde_json::to_string_pretty(&format_result(&problem, &result)) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("Error encoding result: {e}");
                        return ExitCode::from(2);
                    }
                },
            }

            if result.found() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Commands::Sample => match serde_json::to_string_pretty(&ProblemConfig::sample()) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error encoding sample: {e}");
                ExitCode::from(2)
            }
        },
    }
}

fn load_problem(
    file: Option<PathBuf>,
    stdin: bool,
    max_time: Option<f64>,
) -> Result<Problem, ProblemError> {
    let config = if stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        ProblemConfig::from_json(&buffer)?
    } else if let Some(path) = file {
        ProblemConfig::from_json(&fs::read_to_string(&path)?)?
    } else {
        ProblemConfig::sample()
    };

    let problem = config.validate()?;
    match max_time {
        Some(max_time) => problem.with_max_time(max_time),
        None => Ok(problem),
    }
}

fn print_text(problem: &Problem, result: &SolverResult, show_tree: bool) {
    println!("BRIDGE PUZZLE ({} search)", result.strategy);
    println!("{}", "-".repeat(60));

    for solution in &result.solutions {
        println!();
        println!("{}", "=".repeat(60));
        println!(
            "SOLUTION {} FOUND (Total time: {} minutes):",
            solution.solution_number, solution.total_time
        );
        println!("{}", "=".repeat(60));
        for line in narrate(solution, problem) {
            println!("{line}");
        }
        println!("{}", "-".repeat(60));
        println!(
            "SUCCESS: All {} people crossed in {} minutes!",
            problem.len(),
            solution.total_time
        );
    }

    if show_tree {
        println!();
        println!("Search Tree (All Admitted States):");
        for state in &result.tree {
            println!(
                "Node {} (depth {}): near {:?}  far {:?}  flashlight: {}  time: {} min",
                state.sequence,
                state.depth,
                problem.names(state.near),
                problem.names(state.far),
                state.device,
                state.elapsed_time
            );
        }
    }

    println!();
    println!("{}", "=".repeat(60));
    if result.found() {
        println!("FINAL SUMMARY: {} SOLUTION(S) FOUND", result.solutions.len());
    } else {
        println!("No solutions found within the time limit.");
    }
    if !result.search_exhausted {
        println!("(search stopped early)");
    }
    println!(
        "{} states admitted, {} pruned, {} ms",
        result.stats.states_admitted,
        result.stats.total_violations(),
        result.stats.time_elapsed_ms
    );
    println!("{}", "=".repeat(60));
}

fn format_move(problem: &Problem, mv: &Move) -> MoveOutput {
    MoveOutput {
        kind: mv.kind,
        actors: mv.actors.iter().map(|&id| problem.name(id).to_string()).collect(),
        duration: mv.duration,
    }
}

fn format_state(problem: &Problem, state: &SearchState) -> StateOutput {
    StateOutput {
        sequence: state.sequence,
        depth: state.depth,
        near: problem.names(state.near),
        far: problem.names(state.far),
        flashlight: state.device,
        elapsed_time: state.elapsed_time,
        path: state.path.iter().map(|mv| format_move(problem, mv)).collect(),
    }
}

fn format_result(problem: &Problem, result: &SolverResult) -> RunOutput {
    RunOutput {
        strategy: result.strategy,
        max_time: problem.max_time(),
        search_exhausted: result.search_exhausted,
        solutions: result
            .solutions
            .iter()
            .map(|solution| SolutionOutput {
                solution_number: solution.solution_number,
                total_time: solution.total_time,
                moves: solution.moves.iter().map(|mv| format_move(problem, mv)).collect(),
            })
            .collect(),
        stats: result.stats.clone(),
        tree: result.tree.iter().map(|state| format_state(problem, state)).collect(),
    }
}
