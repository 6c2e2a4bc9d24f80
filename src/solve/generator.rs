//! Random board generation with a solvability guarantee

use super::evaluator::QueryEvaluator;
use super::verifier::{SolvabilityVerifier, VerificationReport};
use crate::board::{BoardError, BoardState, Cell};
use log::{debug, info, warn};
use rand::seq::{index, IndexedRandom};
use rand::Rng;

/// A generated board with its start cell already revealed
#[derive(Debug, Clone)]
pub struct GeneratedPuzzle {
    pub board: BoardState,
    pub start: Cell,
    pub attempts: usize,
    /// False when every attempt got stuck and the last board was kept anyway
    pub guaranteed: bool,
    pub report: VerificationReport,
}

pub struct Generator<'a> {
    evaluator: &'a QueryEvaluator<'a>,
    max_attempts: usize,
    parallel: bool,
}

impl<'a> Generator<'a> {
    pub fn new(evaluator: &'a QueryEvaluator<'a>, max_attempts: usize) -> Self {
        Self {
            evaluator,
            max_attempts: max_attempts.max(1),
            parallel: false,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Place mines at random until the board can be cleared from its start
    /// cell by deduction alone, or the attempt budget runs out.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        rows: usize,
        cols: usize,
        mines: usize,
    ) -> Result<GeneratedPuzzle, BoardError> {
        if rows == 0 || cols == 0 {
            return Err(BoardError::EmptyBoard { rows, cols });
        }

        let cells = rows * cols;
        let mines = if mines >= cells {
            warn!("{} mines do not fit a {}x{} board, using {}", mines, rows, cols, cells - 1);
            cells - 1
        } else {
            mines
        };

        let verifier = SolvabilityVerifier::new(self.evaluator).with_parallel(self.parallel);
        let mut last = None;

        for attempt in 1..=self.max_attempts {
            let board = random_board(rng, rows, cols, mines)?;
            let start = choose_start(rng, &board)?;
            let report = verifier.verify_from(&board, start)?;

            debug!("attempt {}: start {} -> {:?}", attempt, start, report.outcome);

            if report.is_solved() {
                info!("generated {}x{} board with {} mines after {} attempts", rows, cols, mines, attempt);
                return puzzle(board, start, attempt, true, report);
            }
            last = Some((board, start, report));
        }

        // max_attempts is at least 1, so some board was tried
        let (board, start, report) = last.ok_or(BoardError::EmptyBoard { rows, cols })?;
        warn!(
            "no deduction-solvable {}x{} board with {} mines found in {} attempts; keeping the last one",
            rows, cols, mines, self.max_attempts
        );
        puzzle(board, start, self.max_attempts, false, report)
    }
}

fn puzzle(
    mut board: BoardState,
    start: Cell,
    attempts: usize,
    guaranteed: bool,
    report: VerificationReport,
) -> Result<GeneratedPuzzle, BoardError> {
    board.reveal(start)?;
    Ok(GeneratedPuzzle { board, start, attempts, guaranteed, report })
}

/// Uniformly random mine placement
pub fn random_board<R: Rng + ?Sized>(
    rng: &mut R,
    rows: usize,
    cols: usize,
    mines: usize,
) -> Result<BoardState, BoardError> {
    let positions = index::sample(rng, rows * cols, mines);
    let mines = positions.into_iter().map(|i| Cell::new(i / cols, i % cols));
    BoardState::new(rows, cols, mines)
}

/// A random safe cell with clue 0 if there is one, otherwise any safe cell
pub fn choose_start<R: Rng + ?Sized>(rng: &mut R, board: &BoardState) -> Result<Cell, BoardError> {
    let safe: Vec<Cell> = board.all_cells().filter(|&cell| !board.is_mine(cell)).collect();
    let openings: Vec<Cell> = safe.iter().copied().filter(|&cell| board.clue_number(cell) == 0).collect();

    openings
        .choose(rng)
        .or_else(|| safe.choose(rng))
        .copied()
        .ok_or(BoardError::TooManyMines {
            mines: board.mine_count(),
            rows: board.rows,
            cols: board.cols,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::ClauseEncoder;
    use crate::oracle::InMemoryOracle;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn evaluator(oracle: &InMemoryOracle) -> QueryEvaluator<'_> {
        QueryEvaluator::new(oracle, ClauseEncoder::default(), Duration::from_secs(5))
    }

    #[test]
    fn test_random_board_places_exact_mine_count() {
        let mut rng = StdRng::seed_from_u64(1);
        let board = random_board(&mut rng, 5, 6, 7).unwrap();
        assert_eq!(board.mine_count(), 7);
        assert_eq!(board.revealed_count(), 0);
    }

    #[test]
    fn test_start_prefers_openings() {
        let mut rng = StdRng::seed_from_u64(3);
        let board = BoardState::new(1, 4, vec![Cell::new(0, 3)]).unwrap();

        for _ in 0..20 {
            let start = choose_start(&mut rng, &board).unwrap();
            assert_eq!(board.clue_number(start), 0);
        }
    }

    #[test]
    fn test_start_without_openings_is_safe() {
        let mut rng = StdRng::seed_from_u64(3);
        let board = BoardState::new(1, 3, vec![Cell::new(0, 0), Cell::new(0, 2)]).unwrap();
        assert_eq!(choose_start(&mut rng, &board).unwrap(), Cell::new(0, 1));
    }

    #[test]
    fn test_generated_board_is_solvable() {
        let oracle = InMemoryOracle::new();
        let evaluator = evaluator(&oracle);
        let generator = Generator::new(&evaluator, 50);
        let mut rng = StdRng::seed_from_u64(42);

        let puzzle = generator.generate(&mut rng, 5, 5, 3).unwrap();
        assert!(puzzle.guaranteed);
        assert!(puzzle.attempts >= 1);
        assert_eq!(puzzle.board.mine_count(), 3);
        assert_eq!(puzzle.board.revealed_count(), 1);
        assert!(puzzle.board.is_revealed(puzzle.start));
        assert!(!puzzle.board.is_mine(puzzle.start));

        // Solvable from the revealed start when re-verified independently
        let report = SolvabilityVerifier::new(&evaluator).verify(&puzzle.board).unwrap();
        assert!(report.is_solved());
    }

    #[test]
    fn test_same_seed_same_board() {
        let oracle = InMemoryOracle::new();
        let evaluator = evaluator(&oracle);
        let generator = Generator::new(&evaluator, 20);

        let a = generator.generate(&mut StdRng::seed_from_u64(9), 4, 4, 2).unwrap();
        let b = generator.generate(&mut StdRng::seed_from_u64(9), 4, 4, 2).unwrap();

        assert_eq!(a.start, b.start);
        assert_eq!(a.board.mines().collect::<Vec<_>>(), b.board.mines().collect::<Vec<_>>());
    }

    #[test]
    fn test_mine_count_is_clamped() {
        let oracle = InMemoryOracle::new();
        let evaluator = evaluator(&oracle);
        let generator = Generator::new(&evaluator, 5);

        let puzzle = generator.generate(&mut StdRng::seed_from_u64(0), 2, 2, 10).unwrap();
        assert_eq!(puzzle.board.mine_count(), 3);
        // The single safe cell is the start, so the board is trivially solved
        assert!(puzzle.guaranteed);
    }

    #[test]
    fn test_exhausted_attempts_keep_last_board() {
        // On a 2x2 board every safe cell touches the mine, so a clue-1 start
        // leaves three indistinguishable hidden cells
        let oracle = InMemoryOracle::new();
        let evaluator = evaluator(&oracle);
        let generator = Generator::new(&evaluator, 3);

        let puzzle = generator.generate(&mut StdRng::seed_from_u64(5), 2, 2, 1).unwrap();
        assert!(!puzzle.guaranteed);
        assert_eq!(puzzle.attempts, 3);
        assert_eq!(puzzle.board.revealed_count(), 1);
    }

    #[test]
    fn test_empty_board_is_rejected() {
        let oracle = InMemoryOracle::new();
        let evaluator = evaluator(&oracle);
        let generator = Generator::new(&evaluator, 3);

        assert!(matches!(
            generator.generate(&mut StdRng::seed_from_u64(0), 0, 3, 1),
            Err(BoardError::EmptyBoard { .. })
        ));
    }
}
