//! Safe/mine queries against the current board knowledge

use crate::board::{BoardState, Cell};
use crate::config::Settings;
use crate::logic::{ClauseEncoder, ClauseSet, Literal};
use crate::oracle::{Oracle, OracleResponse, ProofVerdict, Query, Satisfiability};
use log::{error, warn};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// What the oracle can establish about one hidden cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKnowledge {
    Safe,
    Mine,
    Undetermined,
}

/// Both `Mine(cell)` and `-Mine(cell)` were proved: the encoding is broken
#[derive(Debug, Clone, Error)]
#[error("cell {cell} is provably both safe and a mine; the board encoding is unsound")]
pub struct SoundnessViolation {
    pub cell: Cell,
    pub safe_diagnostic: String,
    pub mine_diagnostic: String,
}

/// Whether a reveal request may go ahead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealDecision {
    /// The cell was proved safe
    Proved,
    /// Not proved, but the caller explicitly asked to guess
    Guessed,
    /// Not proved and no override
    Refused,
    /// Not proved because no oracle could be reached, and no override
    Unavailable,
    /// Proved, but only because the knowledge has no model at all
    Contradictory,
}

/// Issues proof queries for single cells
pub struct QueryEvaluator<'a> {
    oracle: &'a dyn Oracle,
    encoder: ClauseEncoder,
    timeout: Duration,
    cross_check: bool,
}

impl<'a> QueryEvaluator<'a> {
    pub fn new(oracle: &'a dyn Oracle, encoder: ClauseEncoder, timeout: Duration) -> Self {
        Self {
            oracle,
            encoder,
            timeout,
            cross_check: false,
        }
    }

    pub fn from_settings(oracle: &'a dyn Oracle, settings: &Settings) -> Self {
        Self::new(
            oracle,
            ClauseEncoder::new(settings.encoding.flag_policy),
            Duration::from_secs(settings.oracle.timeout_seconds),
        )
        .with_cross_check(settings.encoding.cross_check)
    }

    /// Only trust a proof once the clause set is shown to have a model
    pub fn with_cross_check(mut self, cross_check: bool) -> Self {
        self.cross_check = cross_check;
        self
    }

    pub fn encode(&self, board: &BoardState) -> ClauseSet {
        self.encoder.encode(board)
    }

    /// Is `cell` provably not a mine?
    pub fn safe(&self, board: &BoardState, cell: Cell) -> OracleResponse<ProofVerdict> {
        self.safe_with(&self.encode(board), cell)
    }

    /// Is `cell` provably a mine?
    pub fn mine(&self, board: &BoardState, cell: Cell) -> OracleResponse<ProofVerdict> {
        self.mine_with(&self.encode(board), cell)
    }

    /// `safe` against an already encoded board
    pub fn safe_with(&self, clauses: &ClauseSet, cell: Cell) -> OracleResponse<ProofVerdict> {
        self.prove(clauses, Literal::safe(cell))
    }

    /// `mine` against an already encoded board
    pub fn mine_with(&self, clauses: &ClauseSet, cell: Cell) -> OracleResponse<ProofVerdict> {
        self.prove(clauses, Literal::mine(cell))
    }

    fn prove(&self, clauses: &ClauseSet, goal: Literal) -> OracleResponse<ProofVerdict> {
        let response = Query::new(goal, clauses).submit(self.oracle, self.timeout);

        if !self.cross_check || !response.is_proved() {
            return response;
        }

        let model = self.oracle.check_satisfiable(clauses, self.timeout);
        match model.verdict {
            Satisfiability::Satisfiable => response,
            Satisfiability::NotSatisfiable => {
                warn!("discarding proof of {}: the clause set has no model", goal);
                OracleResponse::new(
                    ProofVerdict::NotProved,
                    format!("proof discarded, clause set has no model\n{}", model.diagnostic),
                )
            }
            Satisfiability::Unknown | Satisfiability::OracleUnavailable => OracleResponse::new(
                ProofVerdict::Proved,
                format!("{}\ncross-check skipped: {}", response.diagnostic, model.diagnostic),
            ),
        }
    }

    /// Does the current knowledge admit any mine placement at all?
    pub fn consistency(&self, board: &BoardState) -> OracleResponse<Satisfiability> {
        self.consistency_with(&self.encode(board))
    }

    pub fn consistency_with(&self, clauses: &ClauseSet) -> OracleResponse<Satisfiability> {
        self.oracle.check_satisfiable(clauses, self.timeout)
    }

    pub fn classify(&self, board: &BoardState, cell: Cell) -> Result<CellKnowledge, SoundnessViolation> {
        self.classify_with(&self.encode(board), cell)
    }

    /// Run both queries for a cell. Two proofs at once is reported as an error.
    pub fn classify_with(&self, clauses: &ClauseSet, cell: Cell) -> Result<CellKnowledge, SoundnessViolation> {
        let safe = self.safe_with(clauses, cell);
        let mine = self.mine_with(clauses, cell);

        match (safe.is_proved(), mine.is_proved()) {
            (true, true) => {
                let violation = SoundnessViolation {
                    cell,
                    safe_diagnostic: safe.diagnostic,
                    mine_diagnostic: mine.diagnostic,
                };
                error!("{}", violation);
                Err(violation)
            }
            (true, false) => Ok(CellKnowledge::Safe),
            (false, true) => Ok(CellKnowledge::Mine),
            (false, false) => Ok(CellKnowledge::Undetermined),
        }
    }

    /// Move acceptance: a reveal goes ahead only on a proof, unless the
    /// caller explicitly opts into guessing.
    ///
    /// A proof drawn from knowledge with no model proves every goal. Such a
    /// proof never counts: the reveal is refused, or with the override it is
    /// treated as a guess.
    pub fn reveal_decision(
        &self,
        board: &BoardState,
        cell: Cell,
        allow_guess: bool,
    ) -> (RevealDecision, OracleResponse<ProofVerdict>) {
        let clauses = self.encode(board);
        let response = self.safe_with(&clauses, cell);

        if response.is_proved() {
            let model = self.consistency_with(&clauses);
            if model.verdict == Satisfiability::NotSatisfiable {
                warn!("proof of {} is vacuous: the current knowledge is contradictory", cell);
                let decision = if allow_guess {
                    RevealDecision::Guessed
                } else {
                    RevealDecision::Contradictory
                };
                let diagnostic = format!("knowledge has no model\n{}", model.diagnostic);
                return (decision, OracleResponse::new(ProofVerdict::NotProved, diagnostic));
            }
        }

        let decision = match (response.verdict, allow_guess) {
            (ProofVerdict::Proved, _) => RevealDecision::Proved,
            (_, true) => RevealDecision::Guessed,
            (ProofVerdict::OracleUnavailable, false) => RevealDecision::Unavailable,
            (ProofVerdict::NotProved, false) => RevealDecision::Refused,
        };

        (decision, response)
    }
}
