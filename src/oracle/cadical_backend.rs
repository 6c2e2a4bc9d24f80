//! Embedded oracle backed by CaDiCaL
//!
//! A goal is proved when the clauses together with the negated goal are
//! unsatisfiable; the negated goal is passed as an assumption. Each query
//! runs on a fresh solver, so the oracle itself holds no state.

use super::{Oracle, OracleResponse, ProofVerdict, Satisfiability};
use crate::logic::{ClauseSet, Literal, VariableManager};
use cadical::{Solver, Timeout};
use log::debug;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default)]
pub struct CadicalOracle;

/// Result of a single solver run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SolverResultType {
    Satisfiable,
    Unsatisfiable,
    Timeout,
}

impl SolverResultType {
    fn proof(self) -> ProofVerdict {
        match self {
            SolverResultType::Unsatisfiable => ProofVerdict::Proved,
            SolverResultType::Satisfiable | SolverResultType::Timeout => ProofVerdict::NotProved,
        }
    }

    fn satisfiability(self) -> Satisfiability {
        match self {
            SolverResultType::Satisfiable => Satisfiability::Satisfiable,
            SolverResultType::Unsatisfiable => Satisfiability::NotSatisfiable,
            SolverResultType::Timeout => Satisfiability::Unknown,
        }
    }
}

impl CadicalOracle {
    pub fn new() -> Self {
        Self
    }

    fn run(&self, clauses: &ClauseSet, assumption: Option<Literal>, timeout: Duration) -> (SolverResultType, String) {
        let start_time = Instant::now();

        if clauses.has_falsum() {
            return (SolverResultType::Unsatisfiable, "clause set contains the empty clause".to_string());
        }

        let mut variables = VariableManager::from_clauses(clauses);
        let encoded = variables.encode(clauses);

        let mut solver: Solver = Solver::new();
        solver.set_callbacks(Some(Timeout::new(timeout.as_secs_f32())));

        for clause in &encoded {
            solver.add_clause(clause.iter().copied());
        }

        let result = match assumption {
            Some(literal) => {
                let assumed = variables.literal(literal);
                solver.solve_with(std::iter::once(assumed))
            }
            None => solver.solve(),
        };

        let solve_time = start_time.elapsed();
        let result_type = match result {
            Some(true) => SolverResultType::Satisfiable,
            Some(false) => SolverResultType::Unsatisfiable,
            None => SolverResultType::Timeout,
        };

        let diagnostic = format!(
            "cadical: {:?} after {:.3}s ({} variables, {} clauses)",
            result_type,
            solve_time.as_secs_f64(),
            variables.variable_count(),
            encoded.len()
        );
        debug!("{}", diagnostic);

        (result_type, diagnostic)
    }
}

impl Oracle for CadicalOracle {
    fn name(&self) -> &'static str {
        "cadical"
    }

    fn prove_goal(&self, clauses: &ClauseSet, goal: Literal, timeout: Duration) -> OracleResponse<ProofVerdict> {
        let (result, diagnostic) = self.run(clauses, Some(goal.negate()), timeout);
        OracleResponse::new(result.proof(), diagnostic)
    }

    fn check_satisfiable(&self, clauses: &ClauseSet, timeout: Duration) -> OracleResponse<Satisfiability> {
        let (result, diagnostic) = self.run(clauses, None, timeout);
        OracleResponse::new(result.satisfiability(), diagnostic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::logic::Clause;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn exactly_one_of_two() -> ClauseSet {
        let a = Cell::new(0, 0);
        let b = Cell::new(0, 1);
        vec![
            Clause::new(vec![Literal::mine(a), Literal::mine(b)]),
            Clause::new(vec![Literal::safe(a), Literal::safe(b)]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_proves_entailed_goal() {
        let mut clauses = exactly_one_of_two();
        clauses.push(Clause::unit(Literal::mine(Cell::new(0, 0))));

        let oracle = CadicalOracle::new();
        assert!(oracle.prove_goal(&clauses, Literal::safe(Cell::new(0, 1)), TIMEOUT).is_proved());
        assert!(!oracle.prove_goal(&clauses, Literal::mine(Cell::new(0, 1)), TIMEOUT).is_proved());
    }

    #[test]
    fn test_undetermined_goal() {
        let oracle = CadicalOracle::new();
        let clauses = exactly_one_of_two();

        assert_eq!(oracle.prove_goal(&clauses, Literal::mine(Cell::new(0, 0)), TIMEOUT).verdict, ProofVerdict::NotProved);
        assert_eq!(oracle.prove_goal(&clauses, Literal::safe(Cell::new(0, 0)), TIMEOUT).verdict, ProofVerdict::NotProved);
    }

    #[test]
    fn test_goal_outside_clauses() {
        let oracle = CadicalOracle::new();
        let response = oracle.prove_goal(&exactly_one_of_two(), Literal::safe(Cell::new(4, 4)), TIMEOUT);
        assert_eq!(response.verdict, ProofVerdict::NotProved);
    }

    #[test]
    fn test_satisfiability() {
        let oracle = CadicalOracle::new();
        let mut clauses = exactly_one_of_two();
        assert_eq!(oracle.check_satisfiable(&clauses, TIMEOUT).verdict, Satisfiability::Satisfiable);

        clauses.push(Clause::unit(Literal::safe(Cell::new(0, 0))));
        clauses.push(Clause::unit(Literal::safe(Cell::new(0, 1))));
        assert_eq!(oracle.check_satisfiable(&clauses, TIMEOUT).verdict, Satisfiability::NotSatisfiable);
    }

    #[test]
    fn test_falsum_short_circuits() {
        let oracle = CadicalOracle::new();
        let clauses: ClauseSet = vec![Clause::falsum()].into_iter().collect();

        let response = oracle.check_satisfiable(&clauses, TIMEOUT);
        assert_eq!(response.verdict, Satisfiability::NotSatisfiable);
        assert!(response.diagnostic.contains("empty clause"));
    }

    #[test]
    fn test_timeout_verdicts() {
        // An interrupted search neither proves a goal nor refutes a model
        assert_eq!(SolverResultType::Timeout.proof(), ProofVerdict::NotProved);
        assert_eq!(SolverResultType::Timeout.satisfiability(), Satisfiability::Unknown);
        assert_eq!(SolverResultType::Unsatisfiable.satisfiability(), Satisfiability::NotSatisfiable);
        assert_eq!(SolverResultType::Unsatisfiable.proof(), ProofVerdict::Proved);
    }
}
