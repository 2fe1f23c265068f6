//! Chess rules - Board Representation Module
//!
//! This module provides the core data structures for representing a chess
//! board and moves. It includes move execution and reversal, pawn promotion,
//! and Forsyth/pictorial rendering of the position.

use std::fmt;
use std::ops::Deref;

use tracing::{debug, error, warn};

use crate::error::{ChessError, ChessResult};
use crate::move_generator::EAST;
use crate::types::*;

/// Back rank arrangement from the a-file to the h-file
const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// File the king stands on before castling
pub const KING_FILE: i8 = 4;

/// Rook files `(from, to)` for a castle in the given direction
#[inline]
pub(crate) fn castle_rook_files(kingside: bool) -> (i8, i8) {
    if kingside {
        (7, 5)
    } else {
        (0, 3)
    }
}

/// Represents a chess move
///
/// The descriptor is immutable once built. Castle and en passant are mutually
/// exclusive, and an en passant move always carries the square of the pawn it
/// removes. En passant eligibility is never inferred by the engine; callers
/// that track the previous move supply it through [`Move::en_passant`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    start: Square,
    end: Square,
    is_castle: bool,
    is_en_passant: bool,
    en_passant_capture: Option<Square>,
    promotion: Option<PieceType>,
}

impl Move {
    /// Create an ordinary move
    pub fn new(start: Square, end: Square) -> Self {
        Move {
            start,
            end,
            is_castle: false,
            is_en_passant: false,
            en_passant_capture: None,
            promotion: None,
        }
    }

    /// Create a castling move; `start` and `end` are the king's squares
    pub fn castle(start: Square, end: Square) -> Self {
        Move {
            is_castle: true,
            ..Move::new(start, end)
        }
    }

    /// Create an en passant move removing the pawn on `captured`
    pub fn en_passant(start: Square, end: Square, captured: Square) -> Self {
        Move {
            is_en_passant: true,
            en_passant_capture: Some(captured),
            ..Move::new(start, end)
        }
    }

    /// Create a pawn move that promotes on arrival
    pub fn with_promotion(start: Square, end: Square, promotion: PieceType) -> ChessResult<Self> {
        Move::try_new(start, end, false, false, None, Some(promotion))
    }

    /// Create a move from raw fields, rejecting contradictory combinations
    pub fn try_new(
        start: Square,
        end: Square,
        is_castle: bool,
        is_en_passant: bool,
        en_passant_capture: Option<Square>,
        promotion: Option<PieceType>,
    ) -> ChessResult<Self> {
        if is_castle && is_en_passant {
            return Err(ChessError::MalformedMove {
                reason: "a move cannot be both a castle and en passant",
            });
        }
        if is_en_passant && en_passant_capture.is_none() {
            return Err(ChessError::MalformedMove {
                reason: "en passant requires the captured pawn's square",
            });
        }
        if !is_en_passant && en_passant_capture.is_some() {
            return Err(ChessError::MalformedMove {
                reason: "captured pawn square given for a move that is not en passant",
            });
        }
        if let Some(kind) = promotion {
            if is_castle {
                return Err(ChessError::MalformedMove {
                    reason: "a castle cannot promote",
                });
            }
            if !kind.is_promotable() {
                return Err(ChessError::MalformedMove {
                    reason: "pawns promote to a knight, bishop, rook or queen",
                });
            }
        }
        Ok(Move {
            start,
            end,
            is_castle,
            is_en_passant,
            en_passant_capture,
            promotion,
        })
    }

    #[inline]
    pub fn start(&self) -> Square {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Square {
        self.end
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        self.is_castle
    }

    #[inline]
    pub fn is_en_passant(&self) -> bool {
        self.is_en_passant
    }

    #[inline]
    pub fn en_passant_capture(&self) -> Option<Square> {
        self.en_passant_capture
    }

    #[inline]
    pub fn promotion(&self) -> Option<PieceType> {
        self.promotion
    }

    /// True for a castle toward the h-file
    #[inline]
    pub fn is_kingside(&self) -> bool {
        self.end.file > self.start.file
    }
}

impl fmt::Display for Move {
    /// Coordinate form (e.g., "e2e4", "e7e8q")
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start, self.end)?;
        if let Some(letter) = self.promotion.and_then(PieceType::letter) {
            write!(f, "{}", letter.to_ascii_lowercase())?;
        }
        Ok(())
    }
}

/// Chess board representation
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    /// 64-element array indexed by `rank * 8 + file` (0=a8, 63=h1)
    squares: [Piece; 64],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Board {
            squares: [Piece::BLANK; 64],
        }
    }

    /// Create a board holding the standard starting position
    pub fn starting_position() -> Self {
        let mut board = Board::new();
        board.setup();
        board
    }

    /// Reset every square to blank
    pub fn clear(&mut self) {
        self.squares = [Piece::BLANK; 64];
    }

    /// Place the standard 32-piece opening arrangement
    pub fn setup(&mut self) {
        self.clear();
        for colour in [Colour::White, Colour::Black] {
            let (Some(home), Some(pawns)) = (colour.home_rank(), colour.pawn_start_rank()) else {
                continue;
            };
            for (file, &kind) in BACK_RANK.iter().enumerate() {
                let file = file as i8;
                self.set(Square::new(file, home), Piece::new(kind, colour));
                self.set(Square::new(file, pawns), Piece::new(PieceType::Pawn, colour));
            }
        }
    }

    /// Piece on a square, `None` if the square is off the board
    #[inline]
    pub fn get(&self, square: Square) -> Option<Piece> {
        square.index().map(|i| self.squares[i])
    }

    /// Piece on a square, blank if the square is off the board
    #[inline]
    pub(crate) fn piece_at(&self, square: Square) -> Piece {
        self.get(square).unwrap_or(Piece::BLANK)
    }

    /// Put a piece of `kind` and `colour` on a square, replacing its occupant
    pub fn place(&mut self, square: Square, kind: PieceType, colour: Colour) -> ChessResult<()> {
        let index = checked_index(square)?;
        self.squares[index] = Piece::new(kind, colour);
        Ok(())
    }

    /// Empty a square, returning what stood on it
    pub fn remove(&mut self, square: Square) -> ChessResult<Piece> {
        let index = checked_index(square)?;
        Ok(std::mem::take(&mut self.squares[index]))
    }

    /// Iterate over occupied squares in index order
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, piece)| !piece.is_blank())
            .map(|(i, &piece)| (Square::from_index(i), piece))
    }

    /// Find the first king of the given colour
    pub fn find_king(&self, colour: Colour) -> Option<Square> {
        self.pieces()
            .find(|(_, piece)| piece.is(PieceType::King, colour))
            .map(|(square, _)| square)
    }

    /// Write a piece to an on-board square
    #[inline]
    fn set(&mut self, square: Square, piece: Piece) {
        if let Some(i) = square.index() {
            self.squares[i] = piece;
        }
    }

    /// Move whatever stands on `from` to `to`, leaving `from` blank
    #[inline]
    fn relocate(&mut self, from: Square, to: Square) {
        let piece = self.piece_at(from);
        self.set(from, Piece::BLANK);
        self.set(to, piece);
    }

    fn check_move_squares(mv: &Move) -> ChessResult<()> {
        checked_index(mv.start)?;
        checked_index(mv.end)?;
        if let Some(captured) = mv.en_passant_capture {
            checked_index(captured)?;
        }
        Ok(())
    }

    /// Execute a move on the board. Returns the piece that stood on the
    /// destination, which [`Board::unmake_move`] needs to reverse it.
    ///
    /// The destination is overwritten unconditionally; legality is the
    /// caller's concern.
    pub fn make_move(&mut self, mv: &Move) -> ChessResult<Piece> {
        Self::check_move_squares(mv)?;
        let captured = self.piece_at(mv.end);

        if mv.is_castle {
            let (rook_from, rook_to) = castle_rook_files(mv.is_kingside());
            let rank = mv.start.rank;
            self.relocate(mv.start, mv.end);
            self.relocate(Square::new(rook_from, rank), Square::new(rook_to, rank));
            return Ok(captured);
        }

        if let Some(victim) = mv.en_passant_capture {
            self.set(victim, Piece::BLANK);
        }

        let mover = self.piece_at(mv.start);
        self.relocate(mv.start, mv.end);

        if let Some(kind) = mv.promotion {
            self.set(mv.end, Piece::new(kind, mover.colour));
        }

        Ok(captured)
    }

    /// Undo a move made by [`Board::make_move`], restoring `captured` on the
    /// destination square
    pub fn unmake_move(&mut self, mv: &Move, captured: Piece) -> ChessResult<()> {
        Self::check_move_squares(mv)?;

        if mv.is_castle {
            let (rook_from, rook_to) = castle_rook_files(mv.is_kingside());
            let rank = mv.start.rank;
            self.relocate(Square::new(rook_to, rank), Square::new(rook_from, rank));
            self.relocate(mv.end, mv.start);
            self.set(mv.end, captured);
            return Ok(());
        }

        let arrived = self.piece_at(mv.end);
        let mover = if mv.promotion.is_some() {
            Piece::new(PieceType::Pawn, arrived.colour)
        } else {
            arrived
        };
        self.set(mv.start, mover);
        self.set(mv.end, captured);

        if let Some(victim) = mv.en_passant_capture {
            self.set(victim, Piece::new(PieceType::Pawn, mover.colour.opposite()));
        }

        Ok(())
    }

    /// Apply `mv`, run `f` against the resulting position, then revert.
    ///
    /// Reversion happens however `f` exits, including by unwinding.
    pub fn with_move<R>(&mut self, mv: &Move, f: impl FnOnce(&Board) -> R) -> ChessResult<R> {
        let guard = MoveGuard::new(self, *mv)?;
        Ok(f(&*guard))
    }

    /// Promote the first pawn of `colour` found on its promotion rank
    pub fn promote(&mut self, colour: Colour, kind: PieceType) -> ChessResult<Square> {
        let invalid = ChessError::InvalidPromotion { colour, kind };
        if !kind.is_promotable() {
            warn!(?colour, ?kind, "rejected promotion to a non-promotable kind");
            return Err(invalid);
        }
        let Some(rank) = colour.promotion_rank() else {
            return Err(invalid);
        };

        let pawn = Piece::new(PieceType::Pawn, colour);
        let Some(square) = (0..BOARD_SIZE)
            .map(|file| Square::new(file, rank))
            .find(|&sq| self.piece_at(sq) == pawn)
        else {
            warn!(?colour, "promotion requested but no pawn is on the promotion rank");
            return Err(invalid);
        };

        self.set(square, Piece::new(kind, colour));
        debug!(?colour, ?kind, square = %square, "promoted pawn");
        Ok(square)
    }

    /// Forsyth encoding of the placement: rank 0 first, ranks joined by `/`,
    /// with a single trailing space
    pub fn forsyth(&self) -> String {
        let mut forsyth = String::new();

        for rank in 0..BOARD_SIZE {
            let mut file = 0;
            while file < BOARD_SIZE {
                let square = Square::new(file, rank);
                let gap = self.scan_direction(square, EAST).empty_squares as i8;
                match self.piece_at(square).to_char() {
                    None => {
                        forsyth.push_str(&(gap + 1).to_string());
                    }
                    Some(c) => {
                        forsyth.push(c);
                        if gap > 0 {
                            forsyth.push_str(&gap.to_string());
                        }
                    }
                }
                file += gap + 1;
            }
            if rank < BOARD_SIZE - 1 {
                forsyth.push('/');
            }
        }

        forsyth.push(' ');
        forsyth
    }

    /// Parse a Forsyth placement field. Only the first whitespace-separated
    /// token is read, so a complete FEN line is accepted.
    pub fn from_forsyth(text: &str) -> ChessResult<Self> {
        let invalid = |reason: String| ChessError::InvalidForsyth { reason };
        let placement = text
            .split_whitespace()
            .next()
            .ok_or_else(|| invalid("empty string".to_string()))?;

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != BOARD_SIZE as usize {
            return Err(invalid(format!("expected 8 ranks, found {}", ranks.len())));
        }

        let mut board = Board::new();
        for (rank, row) in ranks.iter().enumerate() {
            let mut file: i8 = 0;
            let mut after_run = false;
            for c in row.chars() {
                if let Some(run) = c.to_digit(10) {
                    if run == 0 || after_run {
                        return Err(invalid(format!("bad empty-square run in rank {rank}")));
                    }
                    file += run as i8;
                    after_run = true;
                } else if let Some(piece) = Piece::from_char(c) {
                    board.set(Square::new(file, rank as i8), piece);
                    file += 1;
                    after_run = false;
                } else {
                    return Err(invalid(format!("unknown piece letter '{c}'")));
                }
                if file > BOARD_SIZE {
                    return Err(invalid(format!("rank {} is wider than 8 squares", rank)));
                }
            }
            if file != BOARD_SIZE {
                return Err(invalid(format!("rank {} covers {} squares", rank, file)));
            }
        }

        Ok(board)
    }

    /// Bordered grid of piece glyphs, for debug display
    pub fn pictorial(&self) -> String {
        let border = "-".repeat(2 * BOARD_SIZE as usize + 2);
        let mut lines = Vec::with_capacity(BOARD_SIZE as usize + 2);
        lines.push(border.clone());
        for rank in 0..BOARD_SIZE {
            let mut row = String::from("|");
            for file in 0..BOARD_SIZE {
                row.push(self.piece_at(Square::new(file, rank)).glyph());
                row.push(' ');
            }
            row.push('|');
            lines.push(row);
        }
        lines.push(border);
        lines.join("\n") + "\n"
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pictorial())
    }
}

fn checked_index(square: Square) -> ChessResult<usize> {
    square.index().ok_or(ChessError::OutOfBounds {
        file: square.file,
        rank: square.rank,
    })
}

/// A move applied to a board for as long as the guard lives.
///
/// The move is reverted when the guard is dropped, so every exit path of the
/// code holding it sees the board restored.
pub struct MoveGuard<'a> {
    board: &'a mut Board,
    mv: Move,
    captured: Piece,
}

impl<'a> MoveGuard<'a> {
    pub fn new(board: &'a mut Board, mv: Move) -> ChessResult<Self> {
        let captured = board.make_move(&mv)?;
        Ok(MoveGuard {
            board,
            mv,
            captured,
        })
    }

    /// Piece the move landed on
    pub fn captured(&self) -> Piece {
        self.captured
    }
}

impl Deref for MoveGuard<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.board.unmake_move(&self.mv, self.captured) {
            error!(mv = %self.mv, "failed to revert move: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::parse(name).expect("valid square name")
    }

    #[test]
    fn test_setup_arrangement() {
        let board = Board::starting_position();
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(board.get(sq("e1")), Some(Piece::new(PieceType::King, Colour::White)));
        assert_eq!(board.get(sq("d8")), Some(Piece::new(PieceType::Queen, Colour::Black)));
        assert_eq!(board.get(sq("a2")), Some(Piece::new(PieceType::Pawn, Colour::White)));
        assert_eq!(board.get(sq("h7")), Some(Piece::new(PieceType::Pawn, Colour::Black)));
        assert_eq!(board.get(sq("e4")), Some(Piece::BLANK));
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut board = Board::new();
        let off = Square::new(8, 3);
        assert_eq!(board.get(off), None);
        assert_eq!(
            board.place(off, PieceType::Rook, Colour::White),
            Err(ChessError::OutOfBounds { file: 8, rank: 3 })
        );
        assert!(board.remove(Square::new(-1, 0)).is_err());
        assert!(board.make_move(&Move::new(sq("a1"), Square::new(0, 8))).is_err());
    }

    #[test]
    fn test_malformed_moves_rejected() {
        let (a, b) = (sq("e5"), sq("d6"));
        assert!(Move::try_new(a, b, true, true, Some(sq("d5")), None).is_err());
        assert!(Move::try_new(a, b, false, true, None, None).is_err());
        assert!(Move::try_new(a, b, false, false, Some(sq("d5")), None).is_err());
        assert!(Move::try_new(a, b, true, false, None, Some(PieceType::Queen)).is_err());
        assert!(Move::with_promotion(a, b, PieceType::King).is_err());
        assert!(Move::try_new(a, b, false, true, Some(sq("d5")), None).is_ok());
    }

    #[test]
    fn test_castle_make_unmake() {
        let mut board = Board::new();
        board.place(sq("e1"), PieceType::King, Colour::White).unwrap();
        board.place(sq("h1"), PieceType::Rook, Colour::White).unwrap();
        board.place(sq("a1"), PieceType::Rook, Colour::White).unwrap();
        let before = board.clone();

        let kingside = Move::castle(sq("e1"), sq("g1"));
        let captured = board.make_move(&kingside).unwrap();
        assert_eq!(board.get(sq("g1")), Some(Piece::new(PieceType::King, Colour::White)));
        assert_eq!(board.get(sq("f1")), Some(Piece::new(PieceType::Rook, Colour::White)));
        assert_eq!(board.get(sq("h1")), Some(Piece::BLANK));
        board.unmake_move(&kingside, captured).unwrap();
        assert_eq!(board, before);

        let queenside = Move::castle(sq("e1"), sq("c1"));
        let captured = board.make_move(&queenside).unwrap();
        assert_eq!(board.get(sq("c1")), Some(Piece::new(PieceType::King, Colour::White)));
        assert_eq!(board.get(sq("d1")), Some(Piece::new(PieceType::Rook, Colour::White)));
        assert_eq!(board.get(sq("a1")), Some(Piece::BLANK));
        board.unmake_move(&queenside, captured).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn test_en_passant_make_unmake() {
        let mut board = Board::new();
        board.place(sq("e5"), PieceType::Pawn, Colour::White).unwrap();
        board.place(sq("d5"), PieceType::Pawn, Colour::Black).unwrap();
        let before = board.clone();

        let mv = Move::en_passant(sq("e5"), sq("d6"), sq("d5"));
        let captured = board.make_move(&mv).unwrap();
        assert_eq!(captured, Piece::BLANK);
        assert_eq!(board.get(sq("d5")), Some(Piece::BLANK));
        assert_eq!(board.get(sq("d6")), Some(Piece::new(PieceType::Pawn, Colour::White)));
        board.unmake_move(&mv, captured).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn test_capture_and_promotion_make_unmake() {
        let mut board = Board::new();
        board.place(sq("b7"), PieceType::Pawn, Colour::White).unwrap();
        board.place(sq("a8"), PieceType::Rook, Colour::Black).unwrap();
        let before = board.clone();

        let mv = Move::with_promotion(sq("b7"), sq("a8"), PieceType::Knight).unwrap();
        let captured = board.make_move(&mv).unwrap();
        assert_eq!(captured, Piece::new(PieceType::Rook, Colour::Black));
        assert_eq!(board.get(sq("a8")), Some(Piece::new(PieceType::Knight, Colour::White)));
        board.unmake_move(&mv, captured).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn test_guard_reverts_on_drop() {
        let mut board = Board::starting_position();
        let before = board.clone();
        let mv = Move::new(sq("g1"), sq("f3"));
        {
            let guard = MoveGuard::new(&mut board, mv).unwrap();
            assert_eq!(guard.get(sq("f3")), Some(Piece::new(PieceType::Knight, Colour::White)));
            assert!(guard.captured().is_blank());
        }
        assert_eq!(board, before);

        let moved = board.with_move(&mv, |b| b.get(sq("g1"))).unwrap();
        assert_eq!(moved, Some(Piece::BLANK));
        assert_eq!(board, before);
    }

    #[test]
    fn test_promote() {
        let mut board = Board::new();
        board.place(sq("c8"), PieceType::Pawn, Colour::White).unwrap();
        assert_eq!(board.promote(Colour::White, PieceType::Queen), Ok(sq("c8")));
        assert_eq!(board.get(sq("c8")), Some(Piece::new(PieceType::Queen, Colour::White)));

        let before = board.clone();
        assert_eq!(
            board.promote(Colour::White, PieceType::Queen),
            Err(ChessError::InvalidPromotion {
                colour: Colour::White,
                kind: PieceType::Queen
            })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_promote_ignores_other_colour_and_bad_kind() {
        let mut board = Board::new();
        board.place(sq("c8"), PieceType::Pawn, Colour::Black).unwrap();
        assert!(board.promote(Colour::White, PieceType::Queen).is_err());

        board.place(sq("f1"), PieceType::Pawn, Colour::Black).unwrap();
        assert!(board.promote(Colour::Black, PieceType::King).is_err());
        assert_eq!(board.promote(Colour::Black, PieceType::Rook), Ok(sq("f1")));
    }

    #[test]
    fn test_forsyth_start_position() {
        let board = Board::starting_position();
        assert_eq!(
            board.forsyth(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR "
        );
        assert_eq!(Board::new().forsyth(), "8/8/8/8/8/8/8/8 ");
    }

    #[test]
    fn test_forsyth_parse() {
        let text = "r3k2r/8/8/3pP3/8/8/8/R3K2R w KQkq d6 0 1";
        let board = Board::from_forsyth(text).unwrap();
        assert_eq!(board.get(sq("d5")), Some(Piece::new(PieceType::Pawn, Colour::Black)));
        assert_eq!(board.get(sq("h1")), Some(Piece::new(PieceType::Rook, Colour::White)));
        assert_eq!(board.forsyth(), "r3k2r/8/8/3pP3/8/8/8/R3K2R ");

        assert!(Board::from_forsyth("").is_err());
        assert!(Board::from_forsyth("8/8/8").is_err());
        assert!(Board::from_forsyth("9/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_forsyth("7/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_forsyth("x7/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_forsyth("08/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_forsyth("44/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_forsyth("4k3/8/8/8/8/8/8/4K3").is_ok());
    }

    #[test]
    fn test_pictorial() {
        let picture = Board::starting_position().pictorial();
        let lines: Vec<&str> = picture.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "------------------");
        assert_eq!(lines[1], "|r n b q k b n r |");
        assert_eq!(lines[4], "|. . . . . . . . |");
        assert_eq!(lines[8], "|R N B Q K B N R |");
        assert_eq!(lines[9], lines[0]);
    }
}
