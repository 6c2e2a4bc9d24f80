//! Configuration management for the deduction-only minesweeper engine

pub mod settings;

pub use settings::{
    Settings, OracleConfig, EncodingConfig, GeneratorConfig, VerifierConfig, LoggingConfig,
    OracleBackend, FlagPolicy, Difficulty, CliOverrides, DEFAULT_DIFFICULTY
};
