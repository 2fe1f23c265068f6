//! Chess rules - Legality Module
//!
//! A move is POSSIBLE if it takes a piece to an on-board square not held by
//! its own side, and VALID if making it does not leave the mover's king in
//! check. Validity is tested by making the move in place under a
//! [`MoveGuard`](crate::board::MoveGuard) and reverting it.
//!
//! Castling is re-derived from the current position on every call: there is
//! no record of whether the king or rook has moved before.

use crate::board::{castle_rook_files, Board, Move, KING_FILE};
use crate::move_generator::{
    pawn_capture_offsets, DIAGONAL_DIRECTIONS, EAST, KING_OFFSETS, KNIGHT_OFFSETS,
    ORTHOGONAL_DIRECTIONS, WEST,
};
use crate::types::*;

/// Files the king lands on when castling
const KINGSIDE_TARGET_FILE: i8 = 6;
const QUEENSIDE_TARGET_FILE: i8 = 2;

/// Squares between king and rook, which must all be empty
#[inline]
fn castle_gap(kingside: bool) -> usize {
    let (rook_file, _) = castle_rook_files(kingside);
    (rook_file - KING_FILE).unsigned_abs() as usize - 1
}

impl Board {
    /// True if the move takes a piece to a square that exists and does not
    /// hold a piece of the same colour
    pub fn is_possible_move(&self, mv: &Move) -> bool {
        if mv.is_castle() {
            return self.is_possible_castle_move(mv);
        }

        let (Some(moving), Some(target)) = (self.get(mv.start()), self.get(mv.end())) else {
            return false;
        };
        target.colour != moving.colour
    }

    /// True if making the move does not leave the mover's king in check
    pub fn is_valid_move(&mut self, mv: &Move) -> bool {
        if mv.is_castle() {
            return self.is_valid_castle_move(mv);
        }

        let colour = self.piece_at(mv.start()).colour;
        self.with_move(mv, |board| !board.is_in_check(colour))
            .unwrap_or(false)
    }

    /// True if king and rook stand on their home squares with only empty
    /// squares between them
    pub fn is_possible_castle_move(&self, mv: &Move) -> bool {
        if !mv.is_castle() {
            return false;
        }

        let king = self.piece_at(mv.start());
        if king.kind != PieceType::King {
            return false;
        }
        let Some(home) = king.colour.home_rank() else {
            return false;
        };
        if mv.start() != Square::new(KING_FILE, home) {
            return false;
        }

        let kingside = mv.is_kingside();
        let target_file = if kingside {
            KINGSIDE_TARGET_FILE
        } else {
            QUEENSIDE_TARGET_FILE
        };
        if mv.end() != Square::new(target_file, home) {
            return false;
        }

        let ray = self.scan_direction(mv.start(), if kingside { EAST } else { WEST });
        ray.empty_squares == castle_gap(kingside)
            && ray.blocker == Some(Piece::new(PieceType::Rook, king.colour))
    }

    /// True if the king is not in check and every square it would cross or
    /// land on is one it could legally step to
    pub fn is_valid_castle_move(&mut self, mv: &Move) -> bool {
        if !mv.is_castle() {
            return false;
        }

        let colour = self.piece_at(mv.start()).colour;
        if self.is_in_check(colour) {
            return false;
        }

        let kingside = mv.is_kingside();
        let ray = self.search_direction(mv.start(), if kingside { EAST } else { WEST });
        ray.moves.len() == castle_gap(kingside)
    }

    /// The single gate used throughout move generation
    pub fn is_possible_valid_move(&mut self, mv: &Move) -> bool {
        self.is_possible_move(mv) && self.is_valid_move(mv)
    }

    /// True if the destination is occupied before the move is made
    pub fn is_take_move(&self, mv: &Move) -> bool {
        !self.piece_at(mv.end()).is_blank()
    }

    /// True if the king of `colour` is attacked. Returns false when that
    /// colour has no king on the board.
    pub fn is_in_check(&self, colour: Colour) -> bool {
        let Some(king) = self.find_king(colour) else {
            return false;
        };
        let enemy = colour.opposite();
        let enemy_on = |square: Square, kind: PieceType| self.piece_at(square).is(kind, enemy);

        // Pawns attack toward the king from the king's own forward diagonals
        if let Some(offsets) = pawn_capture_offsets(colour) {
            if offsets
                .iter()
                .any(|&o| enemy_on(king.offset(o), PieceType::Pawn))
            {
                return true;
            }
        }

        if KNIGHT_OFFSETS
            .iter()
            .any(|&o| enemy_on(king.offset(o), PieceType::Knight))
        {
            return true;
        }

        if KING_OFFSETS
            .iter()
            .any(|&o| enemy_on(king.offset(o), PieceType::King))
        {
            return true;
        }

        let ray_hits = |directions: &[Offset], slider: PieceType| {
            directions.iter().any(|&step| {
                self.scan_direction(king, step).blocker.is_some_and(|piece| {
                    piece.colour == enemy && (piece.kind == slider || piece.kind == PieceType::Queen)
                })
            })
        };

        ray_hits(&ORTHOGONAL_DIRECTIONS[..], PieceType::Rook)
            || ray_hits(&DIAGONAL_DIRECTIONS[..], PieceType::Bishop)
    }

    /// True if a pawn of `colour` stands on that colour's promotion rank
    pub fn can_promote_pawn(&self, colour: Colour) -> bool {
        let Some(rank) = colour.promotion_rank() else {
            return false;
        };
        (0..BOARD_SIZE).any(|file| {
            self.piece_at(Square::new(file, rank))
                .is(PieceType::Pawn, colour)
        })
    }

    /// Castle moves currently available to `colour`, kingside first
    pub fn castle_moves(&mut self, colour: Colour) -> Vec<Move> {
        let Some(home) = colour.home_rank() else {
            return Vec::new();
        };
        let start = Square::new(KING_FILE, home);
        [KINGSIDE_TARGET_FILE, QUEENSIDE_TARGET_FILE]
            .into_iter()
            .map(|file| Move::castle(start, Square::new(file, home)))
            .filter(|mv| self.is_possible_valid_move(mv))
            .collect()
    }
}
