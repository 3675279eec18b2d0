use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use geister::interactive::InteractiveGame;
use geister::session::SessionConfig;
use geister::worker::Pacing;
use geister_agents::{evaluate_position, search, Difficulty};
use geister_core::{
    ghost_char, layouts, perft, perft_detailed, perft_divide, GameState, Player, Position,
    BOARD_SIZE,
};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Geister against a minimax engine.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Append logs to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play against the engine in the terminal.
    Play {
        #[arg(short, long, default_value_t = Difficulty::default())]
        difficulty: Difficulty,

        /// Seed for the computer's deployment and auto-placement.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the static evaluation of a position for both sides.
    Eval {
        #[arg(default_value = layouts::OPENING)]
        layout: String,
    },

    /// Search a position and print the chosen move.
    Search {
        #[arg(default_value = layouts::OPENING)]
        layout: String,

        #[arg(short, long, default_value_t = Difficulty::default())]
        difficulty: Difficulty,
    },

    /// Count move-tree leaves to a fixed depth.
    Perft {
        depth: u8,

        #[arg(default_value = layouts::OPENING)]
        layout: String,
    },
}

fn init_logging(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        // stderr would draw over the board in raw mode
        None if interactive => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn parse_layout(layout: &str) -> Result<GameState> {
    GameState::from_layout(layout).with_context(|| format!("parsing layout {layout:?}"))
}

/// Prints the board with every color visible.
fn display_board(state: &GameState) {
    println!("\n  0 1 2 3 4 5");
    println!("  -----------");

    for row in 0..BOARD_SIZE {
        print!("{row} ");
        for col in 0..BOARD_SIZE {
            match state.ghost_at(Position::new(row, col)) {
                Some(ghost) => print!("{} ", ghost_char(ghost)),
                None => print!(". "),
            }
        }
        println!("| {row}");
    }

    println!("  -----------");
    println!("  0 1 2 3 4 5\n");

    let side = match state.current_player {
        Player::Player => "Player",
        Player::Computer => "Computer",
    };
    println!("{side} to move");
    println!("Layout: {}", state.to_layout());
}

fn run_eval(layout: &str) -> Result<()> {
    let state = parse_layout(layout)?;
    display_board(&state);

    let outcome = state.check_win_condition();
    if let (Some(winner), Some(condition)) = (outcome.winner, outcome.condition) {
        println!("Decided: {winner} wins by {condition}");
    }
    println!("Player eval:   {}", evaluate_position(&state, Player::Player));
    println!("Computer eval: {}", evaluate_position(&state, Player::Computer));
    Ok(())
}

fn run_search(layout: &str, difficulty: Difficulty) -> Result<()> {
    let state = parse_layout(layout)?;
    display_board(&state);
    println!("Searching at {difficulty} (depth {})...", difficulty.depth());

    let start = Instant::now();
    let result = search(&state, difficulty.depth())?;
    let elapsed = start.elapsed();

    println!("\nBest move: {}", result.best_move);
    println!("Score: {} (computer's view)", result.score);
    println!("Depth: {}", result.depth);
    println!("Nodes: {}", result.nodes);
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_perft(depth: u8, layout: &str) -> Result<()> {
    if depth == 0 {
        bail!("perft depth must be at least 1");
    }
    let state = parse_layout(layout)?;

    println!("Running perft({depth})...");
    println!("Position: {}", state.to_layout());

    if depth <= 3 {
        let mut total = 0;
        for (mv, count) in perft_divide(&state, depth) {
            println!("{mv}: {count}");
            total += count;
        }
        println!("\nTotal: {total}");
    } else {
        let start = Instant::now();
        let nodes = perft(&state, depth);
        let elapsed = start.elapsed();

        println!("Nodes: {nodes}");
        println!("Time: {:.2}s", elapsed.as_secs_f64());
        println!("NPS: {:.0}", nodes as f64 / elapsed.as_secs_f64());
    }

    let details = perft_detailed(&state, depth);
    println!("Captures: {}", details.captures);
    println!("Decided: {}", details.decided);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Play {
        difficulty: Difficulty::default(),
        seed: None,
    });

    let interactive = matches!(command, Command::Play { .. });
    init_logging(cli.log_file.as_deref(), interactive)?;

    match command {
        Command::Play { difficulty, seed } => {
            let config = SessionConfig {
                difficulty,
                pacing: Pacing::Interactive,
            };
            InteractiveGame::new(config, seed)
                .run()
                .context("terminal error")?;
        }
        Command::Eval { layout } => run_eval(&layout)?,
        Command::Search { layout, difficulty } => run_search(&layout, difficulty)?,
        Command::Perft { depth, layout } => run_perft(depth, &layout)?,
    }
    Ok(())
}
