//! Error types for the rules engine
//!
//! Illegal moves are not errors: they are simply absent from generated move
//! lists. These variants cover calls that cannot be carried out at all.

use thiserror::Error;

use crate::types::{Colour, PieceType};

/// Errors that can occur in the rules engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// Direct board access outside the 8x8 grid
    #[error("Square ({file}, {rank}) is off the board")]
    OutOfBounds { file: i8, rank: i8 },

    /// Move descriptor with contradictory fields
    #[error("Malformed move: {reason}")]
    MalformedMove { reason: &'static str },

    /// Nothing to promote, or an impossible promotion kind
    #[error("Cannot promote a {colour:?} pawn to {kind:?}")]
    InvalidPromotion { colour: Colour, kind: PieceType },

    /// Unparsable Forsyth placement string
    #[error("Invalid Forsyth string: {reason}")]
    InvalidForsyth { reason: String },

    /// A parallel evaluation worker panicked
    #[error("Evaluation worker thread panicked")]
    WorkerPanicked,
}

/// Result type alias for rules engine operations
pub type ChessResult<T> = Result<T, ChessError>;
