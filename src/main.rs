//! Chess rules - debug driver
//!
//! Usage:
//!     chess_rules show [--forsyth <placement>] [--colour white|black]
//!     chess_rules perft --depth 3 [--threads 0] [--colour white]
//!     chess_rules play --plies 40 [--seed 12345]
//!
//! Log verbosity is read from `RUST_LOG` (default `info`).

use clap::{Parser, Subcommand, ValueEnum};
use rand::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chess_rules::{Board, ChessResult, Colour, ParallelEvaluator, PieceType};

#[derive(Parser, Debug)]
#[command(name = "chess_rules", version, about = "Chess rules engine debug driver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a position and the legal moves of one side
    Show {
        /// Forsyth placement field; the starting position if omitted
        #[arg(long)]
        forsyth: Option<String>,
        #[arg(long, value_enum, default_value_t = Side::White)]
        colour: Side,
    },
    /// Count move-tree leaves from the starting position
    Perft {
        #[arg(long, default_value_t = 3)]
        depth: u32,
        /// Worker threads, 0 for one per CPU
        #[arg(long, default_value_t = 0)]
        threads: usize,
        #[arg(long, value_enum, default_value_t = Side::White)]
        colour: Side,
    },
    /// Play random legal moves from the starting position
    Play {
        #[arg(long, default_value_t = 40)]
        plies: usize,
        #[arg(long, default_value_t = 12345)]
        seed: u64,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Side {
    White,
    Black,
}

impl From<Side> for Colour {
    fn from(side: Side) -> Colour {
        match side {
            Side::White => Colour::White,
            Side::Black => Colour::Black,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Show { forsyth, colour } => show(forsyth.as_deref(), colour.into()),
        Command::Perft {
            depth,
            threads,
            colour,
        } => run_perft(depth, threads, colour.into()),
        Command::Play { plies, seed } => play(plies, seed),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn show(forsyth: Option<&str>, colour: Colour) -> ChessResult<()> {
    let mut board = match forsyth {
        Some(text) => Board::from_forsyth(text)?,
        None => Board::starting_position(),
    };

    print!("{board}");
    println!("{}", board.forsyth());

    let mut moves = board.legal_moves(colour);
    moves.extend(board.castle_moves(colour));
    let sans: Vec<String> = moves.iter().map(|mv| board.get_san(mv)).collect();
    println!("{:?} to move: {} legal moves", colour, sans.len());
    println!("{}", sans.join(" "));
    if board.is_in_check(colour) {
        println!("{colour:?} is in check");
    }
    Ok(())
}

fn run_perft(depth: u32, threads: usize, colour: Colour) -> ChessResult<()> {
    let evaluator = ParallelEvaluator::new(threads);
    let board = Board::starting_position();
    let started = std::time::Instant::now();
    let nodes = evaluator.perft(&board, colour, depth)?;
    info!(depth, threads = evaluator.num_threads, elapsed_ms = started.elapsed().as_millis() as u64, "perft done");
    println!("perft({depth}) = {nodes}");
    Ok(())
}

fn play(plies: usize, seed: u64) -> ChessResult<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = Board::starting_position();
    let mut colour = Colour::White;
    let mut record = Vec::with_capacity(plies);

    for _ in 0..plies {
        let mut moves = board.legal_moves(colour);
        moves.extend(board.castle_moves(colour));
        let Some(&mv) = moves.choose(&mut rng) else {
            let outcome = if board.is_in_check(colour) { "checkmated" } else { "stalemated" };
            info!(?colour, outcome, "no legal move");
            break;
        };

        record.push(board.get_san(&mv));
        board.make_move(&mv)?;
        if board.can_promote_pawn(colour) {
            board.promote(colour, PieceType::Queen)?;
        }
        colour = colour.opposite();
    }

    println!("{}", record.join(" "));
    print!("{board}");
    println!("{}", board.forsyth());
    Ok(())
}
