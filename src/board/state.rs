//! Board state: ground truth plus revealed/flagged knowledge

use super::Cell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cell {cell} is out of bounds for a {rows}x{cols} board")]
    OutOfBounds { cell: Cell, rows: usize, cols: usize },

    #[error("{mines} mines do not fit a {rows}x{cols} board (at least one safe cell is required)")]
    TooManyMines { mines: usize, rows: usize, cols: usize },

    #[error("board dimensions must be positive, got {rows}x{cols}")]
    EmptyBoard { rows: usize, cols: usize },

    #[error("cell {0} is a mine and cannot be revealed as safe")]
    MineRevealed(Cell),
}

/// A board with its ground truth and the knowledge gathered so far.
///
/// The mine set is private: callers ask `is_mine` for one cell at a time and
/// only the engine walks the full set. Boards are built through `new` and
/// `reveal` only; the text format in `board::io` goes through both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub rows: usize,
    pub cols: usize,
    mines: BTreeSet<Cell>,
    revealed: BTreeMap<Cell, u8>,
    flagged: BTreeSet<Cell>,
}

impl BoardState {
    /// Create a board with the given mine placement and no knowledge yet
    pub fn new(rows: usize, cols: usize, mines: impl IntoIterator<Item = Cell>) -> Result<Self, BoardError> {
        if rows == 0 || cols == 0 {
            return Err(BoardError::EmptyBoard { rows, cols });
        }

        let mut board = Self {
            rows,
            cols,
            mines: BTreeSet::new(),
            revealed: BTreeMap::new(),
            flagged: BTreeSet::new(),
        };

        for mine in mines {
            board.check_bounds(mine)?;
            board.mines.insert(mine);
        }

        if board.mines.len() >= rows * cols {
            return Err(BoardError::TooManyMines { mines: board.mines.len(), rows, cols });
        }

        Ok(board)
    }

    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    pub fn check_bounds(&self, cell: Cell) -> Result<(), BoardError> {
        if self.in_bounds(cell) {
            Ok(())
        } else {
            Err(BoardError::OutOfBounds { cell, rows: self.rows, cols: self.cols })
        }
    }

    pub fn neighbors(&self, cell: Cell) -> Vec<Cell> {
        cell.neighbors(self.rows, self.cols)
    }

    /// Number of ground-truth mines around `cell`
    pub fn clue_number(&self, cell: Cell) -> u8 {
        self.neighbors(cell)
            .into_iter()
            .filter(|n| self.mines.contains(n))
            .count() as u8
    }

    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    /// Ground-truth mines in row-major order
    pub fn mines(&self) -> impl Iterator<Item = Cell> + '_ {
        self.mines.iter().copied()
    }

    pub fn mine_count(&self) -> usize {
        self.mines.len()
    }

    /// Reveal a safe cell, recording its clue.
    ///
    /// The clue is computed from ground truth here, once. Revealing a mine is
    /// refused so that no board can ever hold a revealed mine.
    pub fn reveal(&mut self, cell: Cell) -> Result<u8, BoardError> {
        self.check_bounds(cell)?;
        if self.is_mine(cell) {
            return Err(BoardError::MineRevealed(cell));
        }

        let clue = self.clue_number(cell);
        self.revealed.insert(cell, clue);
        self.flagged.remove(&cell);
        Ok(clue)
    }

    pub fn is_revealed(&self, cell: Cell) -> bool {
        self.revealed.contains_key(&cell)
    }

    pub fn clue(&self, cell: Cell) -> Option<u8> {
        self.revealed.get(&cell).copied()
    }

    /// Revealed cells and their clues in row-major order
    pub fn revealed(&self) -> impl Iterator<Item = (Cell, u8)> + '_ {
        self.revealed.iter().map(|(&cell, &clue)| (cell, clue))
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    pub fn is_flagged(&self, cell: Cell) -> bool {
        self.flagged.contains(&cell)
    }

    pub fn flagged(&self) -> impl Iterator<Item = Cell> + '_ {
        self.flagged.iter().copied()
    }

    /// Toggle a flag; returns whether the cell is flagged afterwards.
    /// Revealed cells cannot carry a flag.
    pub fn toggle_flag(&mut self, cell: Cell) -> Result<bool, BoardError> {
        self.check_bounds(cell)?;
        if self.is_revealed(cell) {
            return Ok(false);
        }

        if self.flagged.remove(&cell) {
            Ok(false)
        } else {
            self.flagged.insert(cell);
            Ok(true)
        }
    }

    pub fn clear_flags(&mut self) {
        self.flagged.clear();
    }

    pub fn total_cells(&self) -> usize {
        self.rows * self.cols
    }

    pub fn safe_cells_total(&self) -> usize {
        self.total_cells() - self.mines.len()
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.revealed.len() >= self.safe_cells_total()
    }

    /// Unrevealed, unflagged cells adjacent to at least one revealed cell,
    /// in row-major order
    pub fn frontier(&self) -> Vec<Cell> {
        let frontier: BTreeSet<Cell> = self
            .revealed
            .keys()
            .flat_map(|&cell| self.neighbors(cell))
            .filter(|n| !self.is_revealed(*n) && !self.is_flagged(*n))
            .collect();

        frontier.into_iter().collect()
    }

    /// Unrevealed, unflagged cells anywhere on the board, in row-major order
    pub fn hidden_cells(&self) -> Vec<Cell> {
        self.all_cells()
            .filter(|&cell| !self.is_revealed(cell) && !self.is_flagged(cell))
            .collect()
    }

    pub fn all_cells(&self) -> impl Iterator<Item = Cell> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Cell::new(row, col)))
    }

    /// Same ground truth, no knowledge
    pub fn without_knowledge(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            mines: self.mines.clone(),
            revealed: BTreeMap::new(),
            flagged: BTreeSet::new(),
        }
    }
}

/// Player's view: clue digits for revealed cells, `F` for flags, `#` otherwise
impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let cell = Cell::new(row, col);
                let symbol = match self.clue(cell) {
                    Some(clue) => char::from(b'0' + clue),
                    None if self.is_flagged(cell) => 'F',
                    None => '#',
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
