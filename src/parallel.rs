//! Chess rules - Parallel Evaluation Module
//!
//! Make/unmake mutates a board in place, so independent evaluations cannot
//! share one. Every worker here gets its own clone of the position and a
//! slice of the work; results are joined back in input order.

use std::thread;

use tracing::debug;

use crate::board::{Board, Move};
use crate::error::{ChessError, ChessResult};
use crate::types::Colour;

/// Count the leaves of the move tree `depth` plies deep, colours alternating
/// from `colour`. Only generator moves are followed (no castling or en
/// passant), so counts match standard perft only while neither can occur.
pub fn perft(board: &mut Board, colour: Colour, depth: u32) -> ChessResult<u64> {
    if depth == 0 {
        return Ok(1);
    }

    let moves = board.legal_moves(colour);
    if depth == 1 {
        return Ok(moves.len() as u64);
    }

    let mut nodes = 0;
    for mv in &moves {
        let captured = board.make_move(mv)?;
        let subtree = perft(board, colour.opposite(), depth - 1);
        board.unmake_move(mv, captured)?;
        nodes += subtree?;
    }
    Ok(nodes)
}

/// Splits legality work across threads, one board clone per thread
#[derive(Clone, Copy, Debug)]
pub struct ParallelEvaluator {
    pub num_threads: usize,
}

impl ParallelEvaluator {
    /// `0` threads means one per logical CPU
    pub fn new(num_threads: usize) -> Self {
        let threads = if num_threads == 0 { num_cpus::get() } else { num_threads };
        ParallelEvaluator {
            num_threads: threads.max(1),
        }
    }

    pub fn set_threads(&mut self, threads: usize) {
        self.num_threads = if threads == 0 { num_cpus::get() } else { threads.max(1) };
    }

    fn chunk_size(&self, len: usize) -> usize {
        len.div_ceil(self.num_threads).max(1)
    }

    /// Keep the candidates that are possible and valid on `board`,
    /// preserving their order
    pub fn filter_legal(&self, board: &Board, candidates: &[Move]) -> ChessResult<Vec<Move>> {
        let handles: Vec<_> = candidates
            .chunks(self.chunk_size(candidates.len()))
            .map(|chunk| {
                let mut board = board.clone();
                let chunk = chunk.to_vec();
                thread::spawn(move || {
                    chunk
                        .into_iter()
                        .filter(|mv| board.is_possible_valid_move(mv))
                        .collect::<Vec<Move>>()
                })
            })
            .collect();

        debug!(workers = handles.len(), candidates = candidates.len(), "filtering candidates");

        let mut legal = Vec::with_capacity(candidates.len());
        for handle in handles {
            legal.extend(handle.join().map_err(|_| ChessError::WorkerPanicked)?);
        }
        Ok(legal)
    }

    /// [`perft`] with the root moves divided between workers
    pub fn perft(&self, board: &Board, colour: Colour, depth: u32) -> ChessResult<u64> {
        if depth <= 1 {
            return perft(&mut board.clone(), colour, depth);
        }

        let roots = board.clone().legal_moves(colour);
        let handles: Vec<_> = roots
            .chunks(self.chunk_size(roots.len()))
            .map(|chunk| {
                let mut board = board.clone();
                let chunk = chunk.to_vec();
                thread::spawn(move || -> ChessResult<u64> {
                    let mut nodes = 0;
                    for mv in &chunk {
                        let captured = board.make_move(mv)?;
                        let subtree = perft(&mut board, colour.opposite(), depth - 1);
                        board.unmake_move(mv, captured)?;
                        nodes += subtree?;
                    }
                    Ok(nodes)
                })
            })
            .collect();

        let workers = handles.len();
        let mut nodes = 0;
        for handle in handles {
            nodes += handle.join().map_err(|_| ChessError::WorkerPanicked)??;
        }
        debug!(depth, workers, nodes, "perft finished");
        Ok(nodes)
    }
}

impl Default for ParallelEvaluator {
    fn default() -> Self {
        ParallelEvaluator::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Square;

    #[test]
    fn test_perft_from_start() {
        let mut board = Board::starting_position();
        assert_eq!(perft(&mut board, Colour::White, 1), Ok(20));
        assert_eq!(perft(&mut board, Colour::White, 2), Ok(400));
        assert_eq!(perft(&mut board, Colour::White, 3), Ok(8902));
        assert_eq!(board, Board::starting_position());
    }

    #[test]
    fn test_parallel_perft_matches_sequential() {
        let board = Board::starting_position();
        for threads in [1, 3, 8] {
            let evaluator = ParallelEvaluator::new(threads);
            assert_eq!(evaluator.perft(&board, Colour::White, 3), Ok(8902));
            assert_eq!(evaluator.perft(&board, Colour::Black, 2), Ok(400));
        }
    }

    #[test]
    fn test_filter_legal_keeps_order() {
        let board = Board::starting_position();
        let e2 = Square::new(4, 6);
        let candidates: Vec<Move> = (0..8)
            .flat_map(|file| (0..8).map(move |rank| Move::new(e2, Square::new(file, rank))))
            .collect();

        let evaluator = ParallelEvaluator::new(4);
        let legal = evaluator.filter_legal(&board, &candidates).unwrap();

        // The gate knows nothing of pawn geometry, so compare with it directly
        let mut sequential = board.clone();
        let expected: Vec<Move> = candidates
            .iter()
            .copied()
            .filter(|mv| sequential.is_possible_valid_move(mv))
            .collect();
        assert_eq!(legal, expected);
        assert!(legal.contains(&Move::new(e2, Square::new(4, 4))));
        assert!(!legal.contains(&Move::new(e2, Square::new(3, 6))));
    }

    #[test]
    fn test_zero_threads_uses_cpu_count() {
        assert!(ParallelEvaluator::new(0).num_threads >= 1);
        assert_eq!(ParallelEvaluator::new(5).num_threads, 5);
    }
}
