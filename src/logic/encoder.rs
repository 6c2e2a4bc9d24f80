//! Compiles board knowledge into cardinality clauses
//!
//! Each revealed cell contributes a unit clause restating that it is not a
//! mine, followed by an "exactly k of my neighbours are mines" constraint.
//! The cardinality constraint is encoded directly, without auxiliary
//! variables: for m neighbours and clue k it costs
//! `C(m, k+1) + C(m, m-k+1)` clauses, at most 70 per cell since m <= 8.

use super::{Clause, ClauseSet, Literal};
use crate::board::{BoardState, Cell};
use crate::config::FlagPolicy;
use itertools::Itertools;

/// Builds deterministic clause sets from boards
#[derive(Debug, Clone, Copy)]
pub struct ClauseEncoder {
    flag_policy: FlagPolicy,
}

impl Default for ClauseEncoder {
    fn default() -> Self {
        Self::new(FlagPolicy::default())
    }
}

impl ClauseEncoder {
    pub fn new(flag_policy: FlagPolicy) -> Self {
        Self { flag_policy }
    }

    pub fn flag_policy(&self) -> FlagPolicy {
        self.flag_policy
    }

    /// Encode everything currently known about the board.
    ///
    /// Revealed cells are walked in row-major order and neighbours are listed
    /// in row-major order too, so equal knowledge yields identical clause sets.
    pub fn encode(&self, board: &BoardState) -> ClauseSet {
        let mut clauses = ClauseSet::new();

        for (cell, clue) in board.revealed() {
            clauses.push(Clause::unit(Literal::safe(cell)));

            let neighbors = board.neighbors(cell);
            clauses.extend(Self::encode_exactly_k(&neighbors, i32::from(clue)));
        }

        if self.flag_policy == FlagPolicy::AssertMine {
            for cell in board.flagged() {
                clauses.push(Clause::unit(Literal::mine(cell)));
            }
        }

        clauses
    }

    /// Clauses stating that exactly `k` of `neighbors` are mines.
    ///
    /// A `k` outside `0..=neighbors.len()` yields the single empty clause.
    pub fn encode_exactly_k(neighbors: &[Cell], k: i32) -> Vec<Clause> {
        let m = neighbors.len() as i32;
        if k < 0 || k > m {
            return vec![Clause::falsum()];
        }

        let mut clauses = Self::encode_at_most_k(neighbors, k);
        clauses.extend(Self::encode_at_least_k(neighbors, k));
        clauses
    }

    /// Every subset of size k+1 holds at least one safe cell
    fn encode_at_most_k(neighbors: &[Cell], k: i32) -> Vec<Clause> {
        let size = k + 1;
        if size <= 0 || size > neighbors.len() as i32 {
            return Vec::new();
        }

        neighbors
            .iter()
            .combinations(size as usize)
            .map(|subset| Clause::new(subset.into_iter().map(|&c| Literal::safe(c)).collect()))
            .collect()
    }

    /// Every subset of size m-k+1 holds at least one mine
    fn encode_at_least_k(neighbors: &[Cell], k: i32) -> Vec<Clause> {
        let size = neighbors.len() as i32 - k + 1;
        if size <= 0 || size > neighbors.len() as i32 {
            return Vec::new();
        }

        neighbors
            .iter()
            .combinations(size as usize)
            .map(|subset| Clause::new(subset.into_iter().map(|&c| Literal::mine(c)).collect()))
            .collect()
    }

    /// Number of clauses `encode_exactly_k` produces for `m` neighbours
    pub fn expected_clause_count(m: usize, k: i32) -> usize {
        let m_signed = m as i32;
        if k < 0 || k > m_signed {
            return 1;
        }

        let at_most = if k + 1 <= m_signed { binomial(m, (k + 1) as usize) } else { 0 };
        let at_least = if k > 0 { binomial(m, (m_signed - k + 1) as usize) } else { 0 };
        at_most + at_least
    }

    /// Size figures for the encoding of a board
    pub fn statistics(&self, board: &BoardState) -> EncodingStatistics {
        let clauses = self.encode(board);
        let variables = super::VariableManager::from_clauses(&clauses).variable_count();

        EncodingStatistics {
            rows: board.rows,
            cols: board.cols,
            revealed_cells: board.revealed_count(),
            flagged_cells: board.flagged().count(),
            flag_policy: self.flag_policy,
            total_variables: variables,
            total_clauses: clauses.len(),
            total_literals: clauses.literal_count(),
        }
    }
}

fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

/// Statistics about a board encoding
#[derive(Debug, Clone)]
pub struct EncodingStatistics {
    pub rows: usize,
    pub cols: usize,
    pub revealed_cells: usize,
    pub flagged_cells: usize,
    pub flag_policy: FlagPolicy,
    pub total_variables: usize,
    pub total_clauses: usize,
    pub total_literals: usize,
}

impl std::fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Encoding Statistics:")?;
        writeln!(f, "  Board: {}x{}", self.rows, self.cols)?;
        writeln!(f, "  Revealed cells: {}", self.revealed_cells)?;
        writeln!(f, "  Flagged cells: {} (policy: {:?})", self.flagged_cells, self.flag_policy)?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Total clauses: {}", self.total_clauses)?;
        writeln!(f, "  Total literals: {}", self.total_literals)?;
        Ok(())
    }
}
