//! Decision procedures answering proof and satisfiability queries
//!
//! Every backend honours the same contract: it never fails the caller.
//! A missing procedure answers `OracleUnavailable`. An expired timeout or a
//! failed run answers `NotProved` for proofs and `Unknown` for
//! satisfiability. Whatever the backend saw is kept in the diagnostic string.

pub mod wire;
pub mod process;
pub mod cadical_backend;
pub mod memory;
pub mod factory;

pub use cadical_backend::CadicalOracle;
pub use factory::build_oracle;
pub use memory::InMemoryOracle;
pub use process::ProcessOracle;

use crate::logic::{ClauseSet, Literal};
use serde::Serialize;
use std::time::Duration;

/// Outcome of a proof query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofVerdict {
    Proved,
    /// Not proved: disproved, timed out, or unreadable output
    NotProved,
    OracleUnavailable,
}

/// Outcome of a satisfiability query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Satisfiability {
    Satisfiable,
    /// The clauses have no model
    NotSatisfiable,
    /// Timed out or unreadable output
    Unknown,
    OracleUnavailable,
}

/// A verdict plus the raw text the backend produced, for debugging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleResponse<V> {
    pub verdict: V,
    pub diagnostic: String,
}

impl<V> OracleResponse<V> {
    pub fn new(verdict: V, diagnostic: impl Into<String>) -> Self {
        Self { verdict, diagnostic: diagnostic.into() }
    }
}

impl OracleResponse<ProofVerdict> {
    pub fn is_proved(&self) -> bool {
        self.verdict == ProofVerdict::Proved
    }
}

/// A pluggable decision procedure
pub trait Oracle: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Does `goal` follow from `clauses`?
    fn prove_goal(&self, clauses: &ClauseSet, goal: Literal, timeout: Duration) -> OracleResponse<ProofVerdict>;

    /// Do `clauses` admit a model?
    fn check_satisfiable(&self, clauses: &ClauseSet, timeout: Duration) -> OracleResponse<Satisfiability>;
}

/// A goal literal together with the clauses it is to be proved from
#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    pub goal: Literal,
    pub clauses: &'a ClauseSet,
}

impl<'a> Query<'a> {
    pub fn new(goal: Literal, clauses: &'a ClauseSet) -> Self {
        Self { goal, clauses }
    }

    pub fn submit(&self, oracle: &dyn Oracle, timeout: Duration) -> OracleResponse<ProofVerdict> {
        oracle.prove_goal(self.clauses, self.goal, timeout)
    }

    /// Oracle text input for this query
    pub fn to_wire(&self) -> String {
        wire::proof_input(self.clauses, self.goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::logic::Clause;

    #[test]
    fn test_query_submission() {
        let cell = Cell::new(0, 1);
        let clauses: ClauseSet = vec![Clause::unit(Literal::safe(cell))].into_iter().collect();
        let query = Query::new(Literal::safe(cell), &clauses);

        let response = query.submit(&InMemoryOracle::new(), Duration::from_secs(1));
        assert!(response.is_proved());
        assert!(query.to_wire().contains("formulas(goals)."));

        // The query only borrows, the caller keeps its clause set
        let other = Query::new(Literal::mine(cell), &clauses);
        assert!(!other.submit(&InMemoryOracle::new(), Duration::from_secs(1)).is_proved());
        assert_eq!(clauses.len(), 1);
    }
}
