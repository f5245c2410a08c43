mod display;

use clap::{Args, Parser, Subcommand, ValueEnum};
use display::{print_board, print_status};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use xiangqi_agents::{
    evaluate, evaluate_for, iterative_deepening, Agent, Engine, EngineConfig, SearchLimits,
    SearchResult, MAX_PLY,
};
use xiangqi_core::{
    generate_legal_moves, outcome, parse_fen, perft, perft_detailed, perft_divide, positions,
    to_fen, Board, FenError, Move, Position, Side,
};

#[derive(Parser)]
#[command(name = "xiangqi", about = "Xiangqi move generator and search engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Count leaf nodes of the legal move tree
    Perft {
        depth: u8,
        fen: Option<String>,
        /// Also count captures, checks and checkmates
        #[arg(long)]
        stats: bool,
    },
    /// Parse and display a FEN position
    Fen { fen: String },
    /// Statically evaluate a position
    Eval { fen: Option<String> },
    /// Search to a fixed depth
    Search {
        fen: Option<String>,
        /// Search depth in plies (1-4)
        #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=i64::from(MAX_PLY)))]
        depth: u8,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Pick a move within a time budget, falling back to the heuristic if needed
    Movetime {
        fen: Option<String>,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Play against the engine
    Play {
        /// The side you play
        #[arg(long, value_enum, default_value_t = HumanSide::Red)]
        side: HumanSide,
        #[command(flatten)]
        engine: EngineArgs,
    },
}

#[derive(Args)]
struct EngineArgs {
    #[arg(long, value_enum, default_value_t = DifficultyArg::Hard)]
    difficulty: DifficultyArg,
    /// Time budget per move in milliseconds
    #[arg(long, default_value_t = 2000)]
    time_ms: u64,
    /// Maximum search depth in plies (1-4)
    #[arg(long, default_value_t = 3)]
    depth: u8,
    /// Seed for reproducible play; entropy when absent
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Medium,
    Hard,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HumanSide {
    Red,
    Black,
}

impl EngineArgs {
    fn config(&self) -> EngineConfig {
        let base = match self.difficulty {
            DifficultyArg::Medium => EngineConfig::medium(),
            DifficultyArg::Hard => EngineConfig::hard(),
        };
        base.with_time_budget(Duration::from_millis(self.time_ms))
            .with_max_depth(self.depth)
    }

    fn engine(&self) -> Engine {
        match self.seed {
            Some(seed) => Engine::with_seed(self.config(), seed),
            None => Engine::new(self.config()),
        }
    }
}

fn load_position(fen: Option<&str>) -> Result<(Board, Side), FenError> {
    parse_fen(fen.unwrap_or(positions::STARTING))
}

/// Parses coordinates such as `h7e7` or `h7-e7` into a legal move.
fn parse_move(board: &Board, side: Side, input: &str) -> Option<Move> {
    let squares: String = input.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    if squares.len() != 4 {
        return None;
    }
    let from = Position::parse(&squares[..2])?;
    let to = Position::parse(&squares[2..])?;
    generate_legal_moves(board, side)
        .into_iter()
        .find(|mv| mv.from == from && mv.to == to)
}

fn print_result(result: &SearchResult) {
    match result.best_move {
        Some(mv) => {
            println!("\nBest move: {mv}");
            println!("Score: {}", result.score);
            println!("Depth: {}", result.depth);
            println!("Nodes: {}", result.nodes);
            println!("Time: {:.2}s", result.elapsed.as_secs_f64());
            if result.fell_back {
                println!("(heuristic fallback)");
            }
        }
        None => println!("No legal moves available"),
    }
}

fn run_perft(depth: u8, fen: Option<&str>, stats: bool) -> Result<(), FenError> {
    let (board, side) = load_position(fen)?;
    println!("Running perft({depth})...");
    println!("Position: {}", to_fen(&board, side));

    if stats {
        let results = perft_detailed(&board, side, depth);
        println!("Nodes: {}", results.nodes);
        println!("Captures: {}", results.captures);
        println!("Checks: {}", results.checks);
        println!("Checkmates: {}", results.checkmates);
    } else if (1..=3).contains(&depth) {
        let results = perft_divide(&board, side, depth);
        let mut total = 0;
        for (mv, count) in &results {
            println!("{mv}: {count}");
            total += count;
        }
        println!("\nTotal: {total}");
    } else {
        let start = Instant::now();
        let nodes = perft(&board, side, depth);
        let elapsed = start.elapsed();
        println!("Nodes: {nodes}");
        println!("Time: {:.2}s", elapsed.as_secs_f64());
        println!("NPS: {:.0}", nodes as f64 / elapsed.as_secs_f64());
    }
    Ok(())
}

fn run_eval(fen: Option<&str>) -> Result<(), Box<dyn Error>> {
    let (board, side) = load_position(fen)?;
    print_board(&board, &mut io::stdout())?;
    println!("Evaluation: {} (from {side}'s perspective)", evaluate_for(&board, side));
    println!("Absolute eval: {} (+ = Red, - = Black)", evaluate(&board));
    Ok(())
}

fn play(human: Side, mut engine: Engine) -> Result<(), Box<dyn Error>> {
    let mut board = Board::starting_position();
    let mut side = Side::Red;
    let mut stdout = io::stdout();
    let mut lines = io::stdin().lock().lines();

    println!("Xiangqi - you play {human} against {}", engine.name());
    println!("Enter moves as coordinates (e.g. h7e7). Commands: quit, help");

    loop {
        print_board(&board, &mut stdout)?;
        if let Some(result) = outcome(&board, side) {
            println!("{result}");
            match result.winner() {
                Some(winner) if winner == human => println!("You win!"),
                Some(_) => println!("The engine wins."),
                None => {}
            }
            break;
        }
        print_status(&board, side, &mut stdout)?;

        if side == human {
            print!("Your move: ");
            stdout.flush()?;
            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;
            match line.trim() {
                "quit" => break,
                "help" => {
                    println!("Files a-i left to right, rows 0-9 top to bottom. Red starts on rows 5-9.");
                    continue;
                }
                input => match parse_move(&board, side, input) {
                    Some(mv) => {
                        info!("human plays {mv}");
                        board.make_move(&mv);
                    }
                    None => {
                        println!("Invalid move. Try again (e.g. h7e7)");
                        continue;
                    }
                },
            }
        } else {
            println!("Engine thinking...");
            let result = engine.search(&board, side);
            let Some(mv) = result.best_move else {
                break;
            };
            println!(
                "Engine plays: {mv} (depth {}, score {}, {}ms)",
                result.depth,
                result.score,
                result.elapsed.as_millis()
            );
            info!("engine plays {mv} after {} nodes", result.nodes);
            board.make_move(&mv);
        }
        side = side.opponent();
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::Perft { depth, fen, stats } => run_perft(depth, fen.as_deref(), stats)?,
        Command::Fen { fen } => {
            let (board, side) = parse_fen(&fen)?;
            print_board(&board, &mut io::stdout())?;
            print_status(&board, side, &mut io::stdout())?;
            println!("FEN: {}", to_fen(&board, side));
        }
        Command::Eval { fen } => run_eval(fen.as_deref())?,
        Command::Search { fen, depth, seed } => {
            let (board, side) = load_position(fen.as_deref())?;
            println!("Position: {}", to_fen(&board, side));
            println!("Searching to depth {depth}...");
            let mut rng = StdRng::seed_from_u64(seed);
            let result = iterative_deepening(&board, side, SearchLimits::depth(depth), &mut rng);
            print_result(&result);
        }
        Command::Movetime { fen, engine } => {
            let (board, side) = load_position(fen.as_deref())?;
            println!("Position: {}", to_fen(&board, side));
            println!("Searching for {} ms...", engine.time_ms);
            let result = engine.engine().search(&board, side);
            print_result(&result);
        }
        Command::Play { side, engine } => {
            let human = match side {
                HumanSide::Red => Side::Red,
                HumanSide::Black => Side::Black,
            };
            play(human, engine.engine())?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xiangqi_agents::Difficulty;

    #[test]
    fn test_parse_move() {
        let board = Board::starting_position();
        let mv = parse_move(&board, Side::Red, "h7e7").unwrap();
        assert_eq!(mv.from, Position::new(7, 7).unwrap());
        assert_eq!(mv.to, Position::new(7, 4).unwrap());
        assert!(parse_move(&board, Side::Red, "h7-e7").is_some());
        // Black piece, illegal jump, and junk
        assert!(parse_move(&board, Side::Red, "h2e2").is_none());
        assert!(parse_move(&board, Side::Red, "a9a5").is_none());
        assert!(parse_move(&board, Side::Red, "zz").is_none());
    }

    #[test]
    fn test_engine_args_config() {
        let args = EngineArgs {
            difficulty: DifficultyArg::Medium,
            time_ms: 500,
            depth: 7,
            seed: Some(1),
        };
        let config = args.config();
        assert_eq!(config.difficulty, Difficulty::Medium);
        assert_eq!(config.time_budget, Duration::from_millis(500));
        assert_eq!(config.max_depth, 4);
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["xiangqi", "play", "--difficulty", "medium", "--seed", "3"]);
        assert!(cli.is_ok());
        assert!(Cli::try_parse_from(["xiangqi", "perft"]).is_err());
    }

    #[test]
    fn test_search_depth_must_be_in_range() {
        assert!(Cli::try_parse_from(["xiangqi", "search", "--depth", "0"]).is_err());
        assert!(Cli::try_parse_from(["xiangqi", "search", "--depth", "5"]).is_err());
        let cli = Cli::try_parse_from(["xiangqi", "search", "--depth", "4"]).unwrap();
        assert!(matches!(cli.command, Command::Search { depth: 4, .. }));
    }
}
