//! Text format exchanged with external decision procedures
//!
//! Clauses are written `Lit1 | Lit2 | ... .` inside a support list; a proof
//! query adds a separate goal list. Results are read by scanning the output
//! for fixed marker strings, so anything else the procedure prints is
//! ignored.

use crate::logic::{ClauseSet, Literal};

/// Printed by the prover when the goal follows from the support list
pub const PROOF_MARKER: &str = "THEOREM PROVED";

/// Printed by the model finder when a model exists
pub const MODEL_MARKERS: &[&str] = &[
    "Exiting with 1 model",
    "exiting with 1 model",
    "============================== MODEL",
];

/// Prover input: clauses as the support set, `goal` as the goal list
pub fn proof_input(clauses: &ClauseSet, goal: Literal) -> String {
    let mut lines = vec!["formulas(sos).".to_string()];
    lines.extend(clauses.iter().map(|c| c.to_string()));
    lines.push("end_of_list.".to_string());
    lines.push(String::new());
    lines.push("formulas(goals).".to_string());
    lines.push(format!("{}.", goal));
    lines.push("end_of_list.".to_string());
    lines.join("\n") + "\n"
}

/// Model finder input: clauses as assumptions
pub fn model_input(clauses: &ClauseSet) -> String {
    let mut lines = vec!["formulas(assumptions).".to_string()];
    lines.extend(clauses.iter().map(|c| c.to_string()));
    lines.push("end_of_list.".to_string());
    lines.join("\n") + "\n"
}

pub fn proof_found(output: &str) -> bool {
    output.contains(PROOF_MARKER)
}

pub fn model_found(output: &str) -> bool {
    MODEL_MARKERS.iter().any(|marker| output.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::logic::Clause;

    fn sample_clauses() -> ClauseSet {
        vec![
            Clause::unit(Literal::safe(Cell::new(0, 0))),
            Clause::new(vec![Literal::mine(Cell::new(0, 1)), Literal::mine(Cell::new(1, 0))]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_proof_input_layout() {
        let text = proof_input(&sample_clauses(), Literal::safe(Cell::new(1, 1)));
        assert_eq!(
            text,
            "formulas(sos).\n-Mine(0,0).\nMine(0,1) | Mine(1,0).\nend_of_list.\n\n\
             formulas(goals).\n-Mine(1,1).\nend_of_list.\n"
        );
    }

    #[test]
    fn test_model_input_layout() {
        let text = model_input(&sample_clauses());
        assert!(text.starts_with("formulas(assumptions).\n"));
        assert!(text.ends_with("end_of_list.\n"));
        assert!(!text.contains("goals"));
    }

    #[test]
    fn test_markers() {
        assert!(proof_found("============ PROOF ===\nTHEOREM PROVED\n"));
        assert!(!proof_found("SEARCH FAILED"));
        assert!(model_found("...\nExiting with 1 model.\n"));
        assert!(!model_found("Exiting with failure."));
        assert!(!model_found(""));
    }
}
