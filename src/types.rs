//! Chess rules - Type definitions and constants
//!
//! This module provides the core value types for representing chess pieces,
//! colours and squares, plus the conversions to and from notation letters.
//!
//! Coordinates are `(file, rank)` pairs. File 0 is the a-file; rank 0 is the
//! rank black starts on (board rank "8") and rank 7 is white's home rank.

use std::fmt;

/// Number of files and ranks
pub const BOARD_SIZE: i8 = 8;

/// File names for algebraic notation
pub const FILE_NAMES: &[u8; 8] = b"abcdefgh";

/// Kind of piece. `None` only appears in the blank piece.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PieceType {
    #[default]
    None,
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// Uppercase notation letter, `None` for the blank kind
    pub fn letter(self) -> Option<char> {
        match self {
            PieceType::None => None,
            PieceType::Pawn => Some('P'),
            PieceType::Knight => Some('N'),
            PieceType::Bishop => Some('B'),
            PieceType::Rook => Some('R'),
            PieceType::Queen => Some('Q'),
            PieceType::King => Some('K'),
        }
    }

    /// Parse a notation letter of either case
    pub fn from_letter(c: char) -> Option<PieceType> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceType::Pawn),
            'N' => Some(PieceType::Knight),
            'B' => Some(PieceType::Bishop),
            'R' => Some(PieceType::Rook),
            'Q' => Some(PieceType::Queen),
            'K' => Some(PieceType::King),
            _ => None,
        }
    }

    /// Kinds a pawn may turn into
    pub fn is_promotable(self) -> bool {
        matches!(
            self,
            PieceType::Knight | PieceType::Bishop | PieceType::Rook | PieceType::Queen
        )
    }
}

/// Side a piece belongs to. `None` only appears in the blank piece.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Colour {
    #[default]
    None,
    White,
    Black,
}

impl Colour {
    pub fn opposite(self) -> Colour {
        match self {
            Colour::White => Colour::Black,
            Colour::Black => Colour::White,
            Colour::None => Colour::None,
        }
    }

    /// Rank the king and rooks start on
    pub fn home_rank(self) -> Option<i8> {
        match self {
            Colour::White => Some(7),
            Colour::Black => Some(0),
            Colour::None => None,
        }
    }

    /// Rank step a pawn of this colour advances by
    pub fn pawn_forward(self) -> Option<i8> {
        match self {
            Colour::White => Some(-1),
            Colour::Black => Some(1),
            Colour::None => None,
        }
    }

    /// Rank pawns start on and may double-step from
    pub fn pawn_start_rank(self) -> Option<i8> {
        Some(self.home_rank()? + self.pawn_forward()?)
    }

    /// Rank a pawn of this colour promotes on
    pub fn promotion_rank(self) -> Option<i8> {
        Some(BOARD_SIZE - 1 - self.home_rank()?)
    }
}

/// A piece value. Two pieces with the same kind and colour are interchangeable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceType,
    pub colour: Colour,
}

impl Piece {
    /// The empty-square sentinel
    pub const BLANK: Piece = Piece {
        kind: PieceType::None,
        colour: Colour::None,
    };

    /// Build a piece. A kind or colour of `None` yields [`Piece::BLANK`].
    pub fn new(kind: PieceType, colour: Colour) -> Piece {
        if kind == PieceType::None || colour == Colour::None {
            Piece::BLANK
        } else {
            Piece { kind, colour }
        }
    }

    #[inline]
    pub fn is_blank(&self) -> bool {
        self.kind == PieceType::None
    }

    #[inline]
    pub fn is(&self, kind: PieceType, colour: Colour) -> bool {
        self.kind == kind && self.colour == colour
    }

    /// Forsyth letter: uppercase for white, lowercase for black
    pub fn to_char(&self) -> Option<char> {
        let letter = self.kind.letter()?;
        match self.colour {
            Colour::White => Some(letter),
            Colour::Black => Some(letter.to_ascii_lowercase()),
            Colour::None => None,
        }
    }

    /// Inverse of [`Piece::to_char`]
    pub fn from_char(c: char) -> Option<Piece> {
        let kind = PieceType::from_letter(c)?;
        let colour = if c.is_ascii_uppercase() {
            Colour::White
        } else {
            Colour::Black
        };
        Some(Piece::new(kind, colour))
    }

    /// One-character glyph for the pictorial board
    pub fn glyph(&self) -> char {
        self.to_char().unwrap_or('.')
    }
}

/// Compass step between adjacent squares, `(file delta, rank delta)`
pub type Offset = (i8, i8);

/// True if `(file, rank)` addresses a square on the board
#[inline]
pub fn is_square(file: i8, rank: i8) -> bool {
    (0..BOARD_SIZE).contains(&file) && (0..BOARD_SIZE).contains(&rank)
}

/// A board coordinate. May lie off the board while walking rays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Square {
    pub file: i8,
    pub rank: i8,
}

impl Square {
    pub const fn new(file: i8, rank: i8) -> Self {
        Square { file, rank }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        is_square(self.file, self.rank)
    }

    #[inline]
    pub fn offset(self, (df, dr): Offset) -> Square {
        Square::new(self.file.saturating_add(df), self.rank.saturating_add(dr))
    }

    /// Index into the 64-square grid, `None` off the board
    #[inline]
    pub(crate) fn index(self) -> Option<usize> {
        if self.is_valid() {
            Some(self.rank as usize * BOARD_SIZE as usize + self.file as usize)
        } else {
            None
        }
    }

    pub(crate) fn from_index(index: usize) -> Square {
        Square::new(
            (index % BOARD_SIZE as usize) as i8,
            (index / BOARD_SIZE as usize) as i8,
        )
    }

    /// File letter of an on-board square
    pub fn file_char(self) -> Option<char> {
        FILE_NAMES.get(usize::try_from(self.file).ok()?).map(|&b| b as char)
    }

    /// Board rank digit of an on-board square (`'1'` for white's home rank)
    pub fn rank_char(self) -> Option<char> {
        if !(0..BOARD_SIZE).contains(&self.rank) {
            return None;
        }
        char::from_digit((BOARD_SIZE - self.rank) as u32, 10)
    }

    /// Convert to algebraic notation (e.g., "e4")
    pub fn name(self) -> String {
        match (self.file_char(), self.rank_char()) {
            (Some(f), Some(r)) => format!("{f}{r}"),
            _ => format!("({}, {})", self.file, self.rank),
        }
    }

    /// Convert algebraic notation to a square
    pub fn parse(name: &str) -> Option<Square> {
        let mut chars = name.chars();
        let file = match chars.next()? {
            c @ 'a'..='h' => (c as u8 - b'a') as i8,
            _ => return None,
        };
        let rank = match chars.next()? {
            c @ '1'..='8' => BOARD_SIZE - (c as u8 - b'0') as i8,
            _ => return None,
        };
        if chars.next().is_some() {
            return None;
        }
        Some(Square::new(file, rank))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
