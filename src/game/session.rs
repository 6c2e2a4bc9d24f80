//! A single player's game: NotStarted -> InProgress -> Won | Lost

use crate::board::{BoardError, BoardState, Cell};
use crate::config::{Settings, DEFAULT_DIFFICULTY};
use crate::oracle::{build_oracle, Oracle, Satisfiability};
use crate::solve::{
    find_hint, safe_cells, Generator, Hint, QueryEvaluator, RevealDecision, SolvabilityVerifier,
    SoundnessViolation,
};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GamePhase::NotStarted => "not started",
            GamePhase::InProgress => "in progress",
            GamePhase::Won => "won",
            GamePhase::Lost => "lost",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("no game in progress")]
    NoActiveGame,

    #[error("the game is over ({0})")]
    GameOver(GamePhase),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Soundness(#[from] SoundnessViolation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevealedCell {
    pub cell: Cell,
    pub clue: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewGameView {
    pub difficulty: String,
    pub rows: usize,
    pub cols: usize,
    pub mine_count: usize,
    pub start: Option<Cell>,
    pub revealed: Vec<RevealedCell>,
    /// Whether the board is known to be clearable by deduction alone
    pub guaranteed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    Flagged,
    NotProvable,
    OracleUnavailable,
    /// The knowledge has no model, usually because of a wrong flag
    Inconsistent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClickOutcome {
    Already { cell: Cell, clue: u8 },
    Blocked { cell: Cell, reason: BlockReason, diagnostic: String },
    Boom { cell: Cell, mines: Vec<Cell> },
    Safe { cell: Cell, clue: u8, guessed: bool, won: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlagView {
    pub cell: Cell,
    pub flagged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyStatus {
    Consistent,
    Inconsistent,
    Unknown,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyReport {
    pub status: ConsistencyStatus,
    pub diagnostic: String,
    /// Frontier cells checked for contradictory proofs
    pub audited: usize,
}

/// A reveal accepted without a proof of safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GuessRecord {
    pub cell: Cell,
}

/// Owns everything one game needs: settings, oracle, RNG and board
pub struct GameSession {
    settings: Settings,
    oracle: Arc<dyn Oracle>,
    rng: StdRng,
    board: Option<BoardState>,
    phase: GamePhase,
    difficulty: String,
    guesses: Vec<GuessRecord>,
}

impl GameSession {
    pub fn new(settings: Settings, oracle: Arc<dyn Oracle>) -> Self {
        let rng = match settings.generator.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            settings,
            oracle,
            rng,
            board: None,
            phase: GamePhase::NotStarted,
            difficulty: DEFAULT_DIFFICULTY.to_string(),
            guesses: Vec::new(),
        }
    }

    /// Session with the oracle backend named in the settings
    pub fn from_settings(settings: Settings) -> Self {
        let oracle = build_oracle(&settings.oracle);
        Self::new(settings, oracle)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn board(&self) -> Option<&BoardState> {
        self.board.as_ref()
    }

    pub fn guesses(&self) -> &[GuessRecord] {
        &self.guesses
    }

    /// Generate a fresh board. Unknown difficulty names use the default preset.
    pub fn new_game(&mut self, difficulty: &str) -> Result<NewGameView, GameError> {
        let (preset, fell_back) = self.settings.difficulty(difficulty);
        let name = if fell_back {
            debug!("unknown difficulty '{}', using '{}'", difficulty, DEFAULT_DIFFICULTY);
            DEFAULT_DIFFICULTY
        } else {
            difficulty
        };

        let evaluator = QueryEvaluator::from_settings(self.oracle.as_ref(), &self.settings);
        let generator = Generator::new(&evaluator, self.settings.generator.max_attempts)
            .with_parallel(self.settings.verifier.parallel);
        let puzzle = generator.generate(&mut self.rng, preset.rows, preset.cols, preset.mines)?;

        info!(
            "new {} game: {}x{} with {} mines, start {}",
            name,
            preset.rows,
            preset.cols,
            puzzle.board.mine_count(),
            puzzle.start
        );

        self.difficulty = name.to_string();
        Ok(self.install(puzzle.board, Some(puzzle.start), puzzle.guaranteed))
    }

    /// Play on a prepared board, keeping its revealed cells and flags
    pub fn load_board(&mut self, board: BoardState) -> Result<NewGameView, GameError> {
        let guaranteed = {
            let evaluator = QueryEvaluator::from_settings(self.oracle.as_ref(), &self.settings);
            SolvabilityVerifier::new(&evaluator)
                .with_parallel(self.settings.verifier.parallel)
                .verify(&board)?
                .is_solved()
        };

        self.difficulty = "custom".to_string();
        Ok(self.install(board, None, guaranteed))
    }

    fn install(&mut self, board: BoardState, start: Option<Cell>, guaranteed: bool) -> NewGameView {
        let view = NewGameView {
            difficulty: self.difficulty.clone(),
            rows: board.rows,
            cols: board.cols,
            mine_count: board.mine_count(),
            start,
            revealed: revealed_cells(&board),
            guaranteed,
        };

        self.phase = if board.is_fully_revealed() {
            GamePhase::Won
        } else {
            GamePhase::InProgress
        };
        self.board = Some(board);
        self.guesses.clear();

        view
    }

    /// Reveal a cell. Without `allow_guess` only cells proved safe are revealed.
    pub fn click(&mut self, cell: Cell, allow_guess: bool) -> Result<ClickOutcome, GameError> {
        let (decision, diagnostic) = {
            let board = self.active_board()?;
            board.check_bounds(cell)?;

            if let Some(clue) = board.clue(cell) {
                return Ok(ClickOutcome::Already { cell, clue });
            }
            if board.is_flagged(cell) {
                return Ok(ClickOutcome::Blocked {
                    cell,
                    reason: BlockReason::Flagged,
                    diagnostic: "unflag the cell before revealing it".to_string(),
                });
            }

            let evaluator = QueryEvaluator::from_settings(self.oracle.as_ref(), &self.settings);
            let (decision, response) = evaluator.reveal_decision(board, cell, allow_guess);
            (decision, response.diagnostic)
        };

        match decision {
            RevealDecision::Refused => {
                return Ok(ClickOutcome::Blocked { cell, reason: BlockReason::NotProvable, diagnostic });
            }
            RevealDecision::Unavailable => {
                return Ok(ClickOutcome::Blocked { cell, reason: BlockReason::OracleUnavailable, diagnostic });
            }
            RevealDecision::Contradictory => {
                return Ok(ClickOutcome::Blocked { cell, reason: BlockReason::Inconsistent, diagnostic });
            }
            RevealDecision::Guessed => {
                warn!("guess-mode reveal of {} accepted without a proof", cell);
                self.guesses.push(GuessRecord { cell });
            }
            RevealDecision::Proved => {}
        }

        let board = self.board.as_mut().ok_or(GameError::NoActiveGame)?;

        if board.is_mine(cell) {
            // Only a guess can lose the game; a proved mine is an oracle fault
            if decision == RevealDecision::Proved {
                error!("{} was proved safe but is a mine", cell);
                return Err(GameError::Soundness(SoundnessViolation {
                    cell,
                    safe_diagnostic: diagnostic,
                    mine_diagnostic: "the board holds a mine at this cell".to_string(),
                }));
            }
            info!("revealed a mine at {}, game lost", cell);
            self.phase = GamePhase::Lost;
            return Ok(ClickOutcome::Boom { cell, mines: board.mines().collect() });
        }

        let clue = board.reveal(cell)?;
        let won = board.is_fully_revealed();
        if won {
            info!("all safe cells revealed, game won");
            self.phase = GamePhase::Won;
        }

        Ok(ClickOutcome::Safe {
            cell,
            clue,
            guessed: decision == RevealDecision::Guessed,
            won,
        })
    }

    pub fn toggle_flag(&mut self, cell: Cell) -> Result<FlagView, GameError> {
        self.active_board()?;
        let board = self.board.as_mut().ok_or(GameError::NoActiveGame)?;
        let flagged = board.toggle_flag(cell)?;
        Ok(FlagView { cell, flagged })
    }

    pub fn hint(&self) -> Result<Hint, GameError> {
        let board = self.active_board()?;
        let evaluator = QueryEvaluator::from_settings(self.oracle.as_ref(), &self.settings);
        Ok(find_hint(&evaluator, board))
    }

    /// Every hidden cell currently provable safe
    pub fn safe_cells(&self) -> Result<Vec<Cell>, GameError> {
        let board = self.active_board()?;
        let evaluator = QueryEvaluator::from_settings(self.oracle.as_ref(), &self.settings);
        Ok(safe_cells(&evaluator, board))
    }

    /// Satisfiability of the current knowledge. When it is consistent the
    /// frontier is also audited for cells proved both safe and mine.
    pub fn check_consistency(&self) -> Result<ConsistencyReport, GameError> {
        let board = self.active_board()?;
        let evaluator = QueryEvaluator::from_settings(self.oracle.as_ref(), &self.settings);
        let clauses = evaluator.encode(board);
        let response = evaluator.consistency_with(&clauses);

        let status = match response.verdict {
            Satisfiability::Satisfiable => ConsistencyStatus::Consistent,
            Satisfiability::NotSatisfiable => ConsistencyStatus::Inconsistent,
            Satisfiability::Unknown | Satisfiability::OracleUnavailable => ConsistencyStatus::Unknown,
        };

        let mut audited = 0;
        if status == ConsistencyStatus::Consistent {
            for cell in board.frontier() {
                evaluator.classify_with(&clauses, cell)?;
                audited += 1;
            }
        }

        Ok(ConsistencyReport { status, diagnostic: response.diagnostic, audited })
    }

    fn active_board(&self) -> Result<&BoardState, GameError> {
        match self.phase {
            GamePhase::InProgress => self.board.as_ref().ok_or(GameError::NoActiveGame),
            GamePhase::NotStarted => Err(GameError::NoActiveGame),
            phase => Err(GameError::GameOver(phase)),
        }
    }
}

fn revealed_cells(board: &BoardState) -> Vec<RevealedCell> {
    board.revealed().map(|(cell, clue)| RevealedCell { cell, clue }).collect()
}
