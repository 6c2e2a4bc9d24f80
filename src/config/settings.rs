//! Configuration settings for the deduction-only minesweeper engine

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub oracle: OracleConfig,
    pub encoding: EncodingConfig,
    pub generator: GeneratorConfig,
    pub verifier: VerifierConfig,
    pub difficulties: BTreeMap<String, Difficulty>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    pub backend: OracleBackend,
    pub timeout_seconds: u64,
    pub prover_binary: PathBuf,
    pub model_finder_binary: PathBuf,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum OracleBackend {
    /// Embedded CaDiCaL SAT solver
    Cadical,
    /// Embedded DPLL evaluator
    InMemory,
    /// External prover and model finder executables fed the text format
    Process,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    pub flag_policy: FlagPolicy,
    pub cross_check: bool,
}

/// How player flags enter the encoding
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlagPolicy {
    /// A flagged hidden cell is asserted to be a mine
    #[default]
    AssertMine,
    /// Flags are display-only
    Ignore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub max_attempts: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    pub parallel: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    pub rows: usize,
    pub cols: usize,
    pub mines: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

pub const DEFAULT_DIFFICULTY: &str = "easy";

impl Default for Settings {
    fn default() -> Self {
        let mut difficulties = BTreeMap::new();
        difficulties.insert("easy".to_string(), Difficulty { rows: 8, cols: 8, mines: 10 });
        difficulties.insert("medium".to_string(), Difficulty { rows: 10, cols: 10, mines: 18 });
        difficulties.insert("hard".to_string(), Difficulty { rows: 12, cols: 12, mines: 30 });

        Self {
            oracle: OracleConfig {
                backend: OracleBackend::Cadical,
                timeout_seconds: 5,
                prover_binary: PathBuf::from("prover9"),
                model_finder_binary: PathBuf::from("mace4"),
            },
            encoding: EncodingConfig {
                flag_policy: FlagPolicy::AssertMine,
                cross_check: false,
            },
            generator: GeneratorConfig {
                max_attempts: 50,
                seed: None,
            },
            verifier: VerifierConfig {
                parallel: true,
            },
            difficulties,
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.oracle.timeout_seconds == 0 {
            anyhow::bail!("Oracle timeout must be positive");
        }

        if self.generator.max_attempts == 0 {
            anyhow::bail!("Generator attempt count must be positive");
        }

        if !self.difficulties.contains_key(DEFAULT_DIFFICULTY) {
            anyhow::bail!("Difficulty '{}' must be defined", DEFAULT_DIFFICULTY);
        }

        for (name, difficulty) in &self.difficulties {
            if difficulty.rows == 0 || difficulty.cols == 0 {
                anyhow::bail!("Difficulty '{}' has an empty board", name);
            }
            if difficulty.mines >= difficulty.rows * difficulty.cols {
                anyhow::bail!("Difficulty '{}' has {} mines for {} cells",
                             name, difficulty.mines, difficulty.rows * difficulty.cols);
            }
        }

        self.log_level()?;
        Ok(())
    }

    /// Parsed logging level
    pub fn log_level(&self) -> Result<log::LevelFilter> {
        self.logging.level.parse::<log::LevelFilter>()
            .with_context(|| format!("Invalid log level: {}", self.logging.level))
    }

    /// Look up a difficulty, falling back to the default preset for unknown names.
    /// The returned flag tells whether the fallback was used.
    pub fn difficulty(&self, name: &str) -> (Difficulty, bool) {
        match self.difficulties.get(name) {
            Some(difficulty) => (*difficulty, false),
            None => {
                let fallback = self.difficulties.get(DEFAULT_DIFFICULTY).copied()
                    .unwrap_or(Difficulty { rows: 8, cols: 8, mines: 10 });
                (fallback, true)
            }
        }
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(backend) = cli_overrides.backend {
            self.oracle.backend = backend;
        }
        if let Some(timeout_seconds) = cli_overrides.timeout_seconds {
            self.oracle.timeout_seconds = timeout_seconds;
        }
        if let Some(seed) = cli_overrides.seed {
            self.generator.seed = Some(seed);
        }
        if let Some(max_attempts) = cli_overrides.max_attempts {
            self.generator.max_attempts = max_attempts;
        }
        if cli_overrides.verbose {
            self.logging.level = "debug".to_string();
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub backend: Option<OracleBackend>,
    pub timeout_seconds: Option<u64>,
    pub seed: Option<u64>,
    pub max_attempts: Option<usize>,
    pub verbose: bool,
}
