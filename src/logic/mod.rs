//! Propositional encoding of board knowledge

pub mod clause;
pub mod encoder;
pub mod variables;

pub use clause::{Clause, ClauseSet, Literal};
pub use encoder::{ClauseEncoder, EncodingStatistics};
pub use variables::VariableManager;
