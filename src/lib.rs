//! Deduction-only Minesweeper
//!
//! A cell may only be revealed once it is proved safe from the clues shown so
//! far. Board knowledge is encoded as cardinality clauses over a per-cell
//! "is a mine" predicate and handed to an oracle (an embedded SAT solver or
//! external prover binaries). Generated puzzles are checked to be clearable
//! by deduction alone from their opening cell.

pub mod board;
pub mod config;
pub mod game;
pub mod logic;
pub mod oracle;
pub mod solve;
pub mod utils;

pub use board::{BoardState, Cell};
pub use config::Settings;
pub use game::GameSession;

use anyhow::Result;
use solve::{QueryEvaluator, SolvabilityVerifier, VerificationReport};

/// Check whether a board can be cleared by deduction from its current knowledge
pub fn verify_board(settings: &Settings, board: &BoardState) -> Result<VerificationReport> {
    let oracle = oracle::build_oracle(&settings.oracle);
    let evaluator = QueryEvaluator::from_settings(oracle.as_ref(), settings);
    let report = SolvabilityVerifier::new(&evaluator)
        .with_parallel(settings.verifier.parallel)
        .verify(board)?;
    Ok(report)
}
