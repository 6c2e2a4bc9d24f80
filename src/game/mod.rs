//! Game state machine on top of the deduction engine

pub mod session;

pub use session::{
    BlockReason, ClickOutcome, ConsistencyReport, ConsistencyStatus, FlagView, GameError, GamePhase,
    GameSession, GuessRecord, NewGameView, RevealedCell,
};
