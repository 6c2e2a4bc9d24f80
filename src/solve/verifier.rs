//! Deduction-only solvability check
//!
//! Replays a board from its current knowledge: every round encodes the board
//! once, asks the oracle about each frontier cell and reveals all cells proved
//! safe together. The board is solvable when all safe cells end up revealed.

use super::evaluator::QueryEvaluator;
use crate::board::{BoardError, BoardState, Cell};
use log::debug;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::time::Instant;

pub struct SolvabilityVerifier<'a> {
    evaluator: &'a QueryEvaluator<'a>,
    parallel: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationOutcome {
    /// Every safe cell was revealed by deduction alone
    Solved,
    /// A round proved nothing new
    Stuck,
}

/// Result of a verification run
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub outcome: VerificationOutcome,
    /// Cells revealed in each productive round
    pub rounds: Vec<Vec<Cell>>,
    pub revealed: usize,
    pub safe_total: usize,
    pub queries: usize,
    pub elapsed_ms: u64,
    /// Knowledge state when the run stopped
    #[serde(skip)]
    pub board: BoardState,
}

impl VerificationReport {
    pub fn is_solved(&self) -> bool {
        self.outcome == VerificationOutcome::Solved
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Verification Report:")?;
        writeln!(f, "  Outcome: {:?}", self.outcome)?;
        writeln!(f, "  Revealed: {}/{} safe cells", self.revealed, self.safe_total)?;
        writeln!(f, "  Rounds: {}", self.rounds.len())?;
        writeln!(f, "  Oracle queries: {}", self.queries)?;
        writeln!(f, "  Time: {}ms", self.elapsed_ms)?;
        Ok(())
    }
}

impl<'a> SolvabilityVerifier<'a> {
    pub fn new(evaluator: &'a QueryEvaluator<'a>) -> Self {
        Self { evaluator, parallel: false }
    }

    /// Evaluate the frontier of each round on the rayon pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Start from scratch with only `start` revealed
    pub fn verify_from(&self, board: &BoardState, start: Cell) -> Result<VerificationReport, BoardError> {
        let mut copy = board.without_knowledge();
        copy.reveal(start)?;
        self.run(copy)
    }

    /// Continue from the board's current revealed cells. Flags are dropped.
    pub fn verify(&self, board: &BoardState) -> Result<VerificationReport, BoardError> {
        let mut copy = board.clone();
        copy.clear_flags();
        self.run(copy)
    }

    fn run(&self, mut board: BoardState) -> Result<VerificationReport, BoardError> {
        let start_time = Instant::now();
        let mut rounds = Vec::new();
        let mut queries = 0;

        let outcome = loop {
            if board.is_fully_revealed() {
                break VerificationOutcome::Solved;
            }

            let frontier = board.frontier();
            if frontier.is_empty() {
                break VerificationOutcome::Stuck;
            }

            let proved = self.proved_safe(&board, &frontier);
            queries += frontier.len();

            if proved.is_empty() {
                break VerificationOutcome::Stuck;
            }

            // A proved cell turning out to be a mine surfaces as MineRevealed
            for &cell in &proved {
                board.reveal(cell)?;
            }
            debug!("round {}: revealed {} cells", rounds.len() + 1, proved.len());
            rounds.push(proved);
        };

        let report = VerificationReport {
            outcome,
            rounds,
            revealed: board.revealed_count(),
            safe_total: board.safe_cells_total(),
            queries,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
            board,
        };
        debug!(
            "verification finished: {:?} after {} rounds ({}/{} revealed)",
            report.outcome,
            report.rounds.len(),
            report.revealed,
            report.safe_total
        );

        Ok(report)
    }

    /// Frontier cells proved safe, in frontier order
    fn proved_safe(&self, board: &BoardState, frontier: &[Cell]) -> Vec<Cell> {
        let clauses = self.evaluator.encode(board);

        if self.parallel {
            frontier
                .par_iter()
                .filter(|&&cell| self.evaluator.safe_with(&clauses, cell).is_proved())
                .copied()
                .collect()
        } else {
            frontier
                .iter()
                .filter(|&&cell| self.evaluator.safe_with(&clauses, cell).is_proved())
                .copied()
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::ClauseEncoder;
    use crate::oracle::InMemoryOracle;
    use std::time::Duration;

    fn evaluator(oracle: &InMemoryOracle) -> QueryEvaluator<'_> {
        QueryEvaluator::new(oracle, ClauseEncoder::default(), Duration::from_secs(5))
    }

    #[test]
    fn test_three_in_a_row_solves_in_one_round() {
        let oracle = InMemoryOracle::new();
        let evaluator = evaluator(&oracle);
        let verifier = SolvabilityVerifier::new(&evaluator);

        let board = BoardState::new(1, 3, vec![Cell::new(0, 2)]).unwrap();
        let report = verifier.verify_from(&board, Cell::new(0, 0)).unwrap();

        assert_eq!(report.outcome, VerificationOutcome::Solved);
        assert_eq!(report.rounds, vec![vec![Cell::new(0, 1)]]);
        assert_eq!(report.revealed, 2);
        assert_eq!(report.safe_total, 2);
    }

    #[test]
    fn test_symmetric_board_is_stuck() {
        // Clue 1 next to three hidden cells, one of them a mine: no deduction possible
        let oracle = InMemoryOracle::new();
        let evaluator = evaluator(&oracle);
        let verifier = SolvabilityVerifier::new(&evaluator);

        let board = BoardState::new(2, 2, vec![Cell::new(1, 1)]).unwrap();
        let report = verifier.verify_from(&board, Cell::new(0, 0)).unwrap();

        assert_eq!(report.outcome, VerificationOutcome::Stuck);
        assert!(report.rounds.is_empty());
        assert_eq!(report.revealed, 1);
        assert_eq!(report.queries, 3);
    }

    #[test]
    fn test_zero_mines_from_center() {
        let oracle = InMemoryOracle::new();
        let evaluator = evaluator(&oracle);
        let verifier = SolvabilityVerifier::new(&evaluator);

        let board = BoardState::new(3, 3, Vec::new()).unwrap();
        let report = verifier.verify_from(&board, Cell::new(1, 1)).unwrap();

        assert!(report.is_solved());
        assert_eq!(report.round_count(), 1);
        assert_eq!(report.rounds[0].len(), 8);
    }

    #[test]
    fn test_start_on_mine_is_rejected() {
        let oracle = InMemoryOracle::new();
        let evaluator = evaluator(&oracle);
        let verifier = SolvabilityVerifier::new(&evaluator);

        let board = BoardState::new(1, 3, vec![Cell::new(0, 2)]).unwrap();
        assert!(matches!(
            verifier.verify_from(&board, Cell::new(0, 2)),
            Err(BoardError::MineRevealed(_))
        ));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let oracle = InMemoryOracle::new();
        let evaluator = evaluator(&oracle);

        let board = BoardState::new(4, 4, vec![Cell::new(0, 3), Cell::new(3, 0)]).unwrap();
        let sequential = SolvabilityVerifier::new(&evaluator).verify_from(&board, Cell::new(0, 0)).unwrap();
        let parallel = SolvabilityVerifier::new(&evaluator)
            .with_parallel(true)
            .verify_from(&board, Cell::new(0, 0))
            .unwrap();

        assert_eq!(sequential.outcome, parallel.outcome);
        assert_eq!(sequential.rounds, parallel.rounds);
    }

    #[test]
    fn test_verify_continues_from_current_knowledge_and_ignores_flags() {
        let oracle = InMemoryOracle::new();
        let evaluator = evaluator(&oracle);
        let verifier = SolvabilityVerifier::new(&evaluator);

        let mut board = BoardState::new(1, 3, vec![Cell::new(0, 2)]).unwrap();
        board.reveal(Cell::new(0, 0)).unwrap();
        // Wrong flag; would make the encoding contradictory
        board.toggle_flag(Cell::new(0, 1)).unwrap();

        let report = verifier.verify(&board).unwrap();
        assert!(report.is_solved());
        assert_eq!(report.board.flagged().count(), 0);
        // The caller's board is untouched
        assert!(board.is_flagged(Cell::new(0, 1)));
    }
}
