//! Chess rules - Standard Algebraic Notation
//!
//! Renders moves as SAN, ignoring check, mate and promotion suffixes.

use crate::board::{Board, Move};
use crate::types::*;

impl Board {
    /// SAN of a move in the current position (e.g., "Nf3", "exd5", "O-O")
    pub fn get_san(&mut self, mv: &Move) -> String {
        if mv.is_castle() {
            return if mv.is_kingside() { "O-O" } else { "O-O-O" }.to_string();
        }

        let piece = self.piece_at(mv.start());
        let mut san = String::new();

        if piece.kind != PieceType::Pawn {
            if let Some(letter) = piece.kind.letter() {
                san.push(letter);
            }
            san.push_str(&self.clarification_string(mv));
        }

        if self.is_take_move(mv) || mv.is_en_passant() {
            if piece.kind == PieceType::Pawn {
                if let Some(file) = mv.start().file_char() {
                    san.push(file);
                }
            }
            san.push('x');
        }

        san.push_str(&mv.end().name());
        san
    }

    /// Disambiguation for a piece move: the origin file if another piece of
    /// the same kind on a different file can also reach the destination, the
    /// origin rank if one on the same file can, both if both apply
    pub fn clarification_string(&mut self, mv: &Move) -> String {
        let piece = self.piece_at(mv.start());
        if piece.is_blank() {
            return String::new();
        }

        let rivals: Vec<Square> = self
            .pieces()
            .filter(|&(square, other)| square != mv.start() && other == piece)
            .map(|(square, _)| square)
            .collect();

        let mut need_file = false;
        let mut need_rank = false;
        for rival in rivals {
            if self
                .get_piece_moves(rival)
                .iter()
                .any(|m| m.end() == mv.end())
            {
                if rival.file == mv.start().file {
                    need_rank = true;
                } else {
                    need_file = true;
                }
            }
        }

        let mut clarification = String::new();
        if need_file {
            clarification.extend(mv.start().file_char());
        }
        if need_rank {
            clarification.extend(mv.start().rank_char());
        }
        clarification
    }
}
