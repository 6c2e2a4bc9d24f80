//! Deduction engine: per-cell queries, solvability checks, hints and
//! board generation

pub mod evaluator;
pub mod generator;
pub mod hints;
pub mod verifier;

pub use evaluator::{CellKnowledge, QueryEvaluator, RevealDecision, SoundnessViolation};
pub use generator::{choose_start, random_board, GeneratedPuzzle, Generator};
pub use hints::{find_hint, safe_cells, Hint};
pub use verifier::{SolvabilityVerifier, VerificationOutcome, VerificationReport};
