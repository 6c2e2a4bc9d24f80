//! In-process DPLL evaluator
//!
//! Small, dependency-free and fast on board-sized clause sets. Used by the
//! test suite in place of external procedures, and selectable as a backend.

use super::{Oracle, OracleResponse, ProofVerdict, Satisfiability};
use crate::logic::{Clause, ClauseSet, Literal, VariableManager};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryOracle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Search {
    Sat,
    Unsat,
    TimedOut,
}

impl InMemoryOracle {
    pub fn new() -> Self {
        Self
    }

    fn solve(&self, clauses: &ClauseSet, timeout: Duration) -> (Search, String) {
        let start_time = Instant::now();
        let deadline = start_time + timeout;

        let mut variables = VariableManager::from_clauses(clauses);
        let encoded = variables.encode(clauses);
        let mut assignment = vec![None; variables.variable_count() + 1];

        let result = search(&encoded, &mut assignment, deadline);
        let diagnostic = format!(
            "dpll: {:?} after {:.3}s ({} variables, {} clauses)",
            result,
            start_time.elapsed().as_secs_f64(),
            variables.variable_count(),
            encoded.len()
        );

        (result, diagnostic)
    }
}

impl Oracle for InMemoryOracle {
    fn name(&self) -> &'static str {
        "in_memory"
    }

    fn prove_goal(&self, clauses: &ClauseSet, goal: Literal, timeout: Duration) -> OracleResponse<ProofVerdict> {
        let mut refutation = clauses.clone();
        refutation.push(Clause::unit(goal.negate()));

        let (result, diagnostic) = self.solve(&refutation, timeout);
        let verdict = match result {
            Search::Unsat => ProofVerdict::Proved,
            Search::Sat | Search::TimedOut => ProofVerdict::NotProved,
        };
        OracleResponse::new(verdict, diagnostic)
    }

    fn check_satisfiable(&self, clauses: &ClauseSet, timeout: Duration) -> OracleResponse<Satisfiability> {
        let (result, diagnostic) = self.solve(clauses, timeout);
        let verdict = match result {
            Search::Sat => Satisfiability::Satisfiable,
            Search::Unsat => Satisfiability::NotSatisfiable,
            Search::TimedOut => Satisfiability::Unknown,
        };
        OracleResponse::new(verdict, diagnostic)
    }
}

#[inline]
fn value(assignment: &[Option<bool>], literal: i32) -> Option<bool> {
    assignment[literal.unsigned_abs() as usize].map(|v| if literal > 0 { v } else { !v })
}

#[inline]
fn assign(assignment: &mut [Option<bool>], literal: i32) {
    assignment[literal.unsigned_abs() as usize] = Some(literal > 0);
}

fn undo(assignment: &mut [Option<bool>], trail: &[i32]) {
    for &literal in trail {
        assignment[literal.unsigned_abs() as usize] = None;
    }
}

/// Unit propagation to fixpoint. Pushes forced literals onto `trail`;
/// returns false on conflict.
fn propagate(clauses: &[Vec<i32>], assignment: &mut [Option<bool>], trail: &mut Vec<i32>) -> bool {
    loop {
        let mut changed = false;

        for clause in clauses {
            let mut satisfied = false;
            let mut open = 0;
            let mut last_open = 0;

            for &literal in clause {
                match value(assignment, literal) {
                    Some(true) => {
                        satisfied = true;
                        break;
                    }
                    Some(false) => {}
                    None => {
                        open += 1;
                        last_open = literal;
                    }
                }
            }

            if satisfied {
                continue;
            }
            match open {
                0 => return false,
                1 => {
                    assign(assignment, last_open);
                    trail.push(last_open);
                    changed = true;
                }
                _ => {}
            }
        }

        if !changed {
            return true;
        }
    }
}

fn search(clauses: &[Vec<i32>], assignment: &mut [Option<bool>], deadline: Instant) -> Search {
    if Instant::now() >= deadline {
        return Search::TimedOut;
    }

    let mut trail = Vec::new();
    if !propagate(clauses, assignment, &mut trail) {
        undo(assignment, &trail);
        return Search::Unsat;
    }

    // Branch on the first open literal of the first unsatisfied clause
    let branch = clauses.iter()
        .filter(|clause| !clause.iter().any(|&l| value(assignment, l) == Some(true)))
        .find_map(|clause| clause.iter().copied().find(|&l| value(assignment, l).is_none()));

    let Some(literal) = branch else {
        return Search::Sat;
    };

    for choice in [literal, -literal] {
        assign(assignment, choice);
        match search(clauses, assignment, deadline) {
            Search::Sat => return Search::Sat,
            Search::TimedOut => {
                undo(assignment, &trail);
                return Search::TimedOut;
            }
            Search::Unsat => undo(assignment, &[choice]),
        }
    }

    undo(assignment, &trail);
    Search::Unsat
}
