//! Chess rules engine
//!
//! A board-state and move-legality library with support for:
//! - Per-piece legal move generation on an 8x8 mailbox board
//! - Check detection and castling legality from the current position
//! - In-place make/unmake with guaranteed reversion
//! - En passant and promotion moves supplied by the caller
//! - Standard algebraic notation and Forsyth placement strings
//! - Parallel legality evaluation over cloned boards
//!
//! Turn order, clocks, history and move choice belong to the caller.

pub mod types;
pub mod error;
pub mod board;
pub mod move_generator;
pub mod legality;
pub mod notation;
pub mod parallel;

pub use board::{Board, Move, MoveGuard};
pub use error::{ChessError, ChessResult};
pub use move_generator::Ray;
pub use parallel::{perft, ParallelEvaluator};
pub use types::{is_square, Colour, Piece, PieceType, Square};
