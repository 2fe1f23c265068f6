//! Chess rules - Move Generator Module
//!
//! This module holds the offset tables shared by move generation and check
//! detection, the directional ray walk used by sliding pieces, and per-piece
//! generation of ordinary (non-castle, non-en-passant) legal moves.

use crate::board::{Board, Move};
use crate::types::*;

/// Unit step toward the h-file
pub const EAST: Offset = (1, 0);
/// Unit step toward the a-file
pub const WEST: Offset = (-1, 0);

/// Direction offsets for rook-like movement
pub const ORTHOGONAL_DIRECTIONS: [Offset; 4] = [EAST, WEST, (0, 1), (0, -1)];
/// Direction offsets for bishop-like movement
pub const DIAGONAL_DIRECTIONS: [Offset; 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
/// Squares a king reaches in one step
pub const KING_OFFSETS: [Offset; 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];
/// Squares a knight reaches in one jump
pub const KNIGHT_OFFSETS: [Offset; 8] = [
    (1, 2),
    (-1, 2),
    (2, 1),
    (-2, 1),
    (2, -1),
    (-2, -1),
    (1, -2),
    (-1, -2),
];
/// File offsets of a pawn's diagonal captures; the rank step is the colour's
/// forward direction
pub const PAWN_CAPTURE_FILES: [i8; 2] = [-1, 1];

/// Diagonal capture offsets for a pawn of `colour`
pub fn pawn_capture_offsets(colour: Colour) -> Option<[Offset; 2]> {
    let forward = colour.pawn_forward()?;
    Some(PAWN_CAPTURE_FILES.map(|df| (df, forward)))
}

/// Result of walking a ray from an origin square
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ray {
    /// Empty squares traversed before the walk stopped
    pub empty_squares: usize,
    /// Occupant of the square the walk stopped on, if it hit a piece
    pub blocker: Option<Piece>,
    /// Possible and valid moves from the origin along the ray; left empty by
    /// [`Board::scan_direction`]
    pub moves: Vec<Move>,
}

impl Board {
    /// Walk from `origin` along `step` until leaving the board or reaching an
    /// occupied square, counting empty squares. No legality testing is done,
    /// so this is safe to call from check detection.
    pub fn scan_direction(&self, origin: Square, step: Offset) -> Ray {
        let mut ray = Ray::default();
        if !origin.is_valid() {
            return ray;
        }

        let mut current = origin.offset(step);
        while let Some(piece) = self.get(current) {
            if !piece.is_blank() {
                ray.blocker = Some(piece);
                break;
            }
            ray.empty_squares += 1;
            current = current.offset(step);
        }
        ray
    }

    /// Like [`Board::scan_direction`], additionally collecting the moves
    /// from `origin` to each reached square that are possible and valid
    pub fn search_direction(&mut self, origin: Square, step: Offset) -> Ray {
        let mut ray = self.scan_direction(origin, step);
        let reached = ray.empty_squares + usize::from(ray.blocker.is_some());

        let mut target = origin;
        for _ in 0..reached {
            target = target.offset(step);
            let mv = Move::new(origin, target);
            if self.is_possible_valid_move(&mv) {
                ray.moves.push(mv);
            }
        }
        ray
    }

    /// Generate the legal moves of the piece on `square`, excluding castling
    /// and en passant. Returns an empty list for a blank or off-board square.
    pub fn get_piece_moves(&mut self, square: Square) -> Vec<Move> {
        let piece = self.piece_at(square);
        match piece.kind {
            PieceType::None => Vec::new(),
            PieceType::King => self.generate_offset_moves(square, &KING_OFFSETS),
            PieceType::Knight => self.generate_offset_moves(square, &KNIGHT_OFFSETS),
            PieceType::Bishop => self.generate_sliding_moves(square, &DIAGONAL_DIRECTIONS),
            PieceType::Rook => self.generate_sliding_moves(square, &ORTHOGONAL_DIRECTIONS),
            PieceType::Queen => {
                let mut moves = self.generate_sliding_moves(square, &DIAGONAL_DIRECTIONS);
                moves.extend(self.generate_sliding_moves(square, &ORTHOGONAL_DIRECTIONS));
                moves
            }
            PieceType::Pawn => self.generate_pawn_moves(square, piece.colour),
        }
    }

    /// Generate every ordinary legal move for one side, in square order
    pub fn legal_moves(&mut self, colour: Colour) -> Vec<Move> {
        let squares: Vec<Square> = self.squares_of(colour).collect();
        squares
            .into_iter()
            .flat_map(|square| self.get_piece_moves(square))
            .collect()
    }

    /// True if any piece of `colour` has an ordinary legal move
    pub fn legal_move_exists(&mut self, colour: Colour) -> bool {
        let squares: Vec<Square> = self.squares_of(colour).collect();
        squares
            .into_iter()
            .any(|square| !self.get_piece_moves(square).is_empty())
    }

    fn squares_of(&self, colour: Colour) -> impl Iterator<Item = Square> + '_ {
        self.pieces()
            .filter(move |(_, piece)| piece.colour == colour)
            .map(|(square, _)| square)
    }

    /// Moves to fixed offsets (king, knight)
    fn generate_offset_moves(&mut self, square: Square, offsets: &[Offset]) -> Vec<Move> {
        let mut moves = Vec::with_capacity(offsets.len());
        for &offset in offsets {
            let mv = Move::new(square, square.offset(offset));
            if self.is_possible_valid_move(&mv) {
                moves.push(mv);
            }
        }
        moves
    }

    /// Moves for sliding pieces (bishop, rook, queen)
    fn generate_sliding_moves(&mut self, square: Square, directions: &[Offset]) -> Vec<Move> {
        let mut moves = Vec::new();
        for &direction in directions {
            moves.extend(self.search_direction(square, direction).moves);
        }
        moves
    }

    /// Pawn pushes and captures
    fn generate_pawn_moves(&mut self, square: Square, colour: Colour) -> Vec<Move> {
        let (Some(forward), Some(start_rank), Some(captures)) = (
            colour.pawn_forward(),
            colour.pawn_start_rank(),
            pawn_capture_offsets(colour),
        ) else {
            return Vec::new();
        };

        let mut moves = Vec::new();

        // Pushes need empty squares and are gated independently
        let one_forward = Move::new(square, square.offset((0, forward)));
        if self.is_possible_move(&one_forward) && !self.is_take_move(&one_forward) {
            if self.is_valid_move(&one_forward) {
                moves.push(one_forward);
            }

            let two_forward = Move::new(square, square.offset((0, 2 * forward)));
            if square.rank == start_rank
                && self.is_possible_valid_move(&two_forward)
                && !self.is_take_move(&two_forward)
            {
                moves.push(two_forward);
            }
        }

        // Diagonal captures
        for offset in captures {
            let take = Move::new(square, square.offset(offset));
            if self.is_possible_valid_move(&take) && self.is_take_move(&take) {
                moves.push(take);
            }
        }

        moves
    }
}
