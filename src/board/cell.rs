//! Grid coordinates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A cell coordinate on the board.
///
/// Ordering is row-major, which is the deterministic order used everywhere a
/// set of cells is walked (encoding, frontier evaluation, hints).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Cells within one step in any of the 8 directions, clipped to a
    /// `rows` x `cols` grid, in row-major order.
    pub fn neighbors(self, rows: usize, cols: usize) -> Vec<Cell> {
        let mut neighbors = Vec::with_capacity(8);

        for dr in -1isize..=1 {
            for dc in -1isize..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }

                let r = self.row as isize + dr;
                let c = self.col as isize + dc;

                if r >= 0 && r < rows as isize && c >= 0 && c < cols as isize {
                    neighbors.push(Cell::new(r as usize, c as usize));
                }
            }
        }

        neighbors
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Parses `r,c` (whitespace tolerated), as typed on the command line.
impl FromStr for Cell {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let (row, col) = trimmed
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("Expected a cell as 'row,col', got '{}'", s))?;

        let row = row.trim().parse::<usize>()
            .map_err(|e| anyhow::anyhow!("Invalid row in '{}': {}", s, e))?;
        let col = col.trim().parse::<usize>()
            .map_err(|e| anyhow::anyhow!("Invalid column in '{}': {}", s, e))?;

        Ok(Cell::new(row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_neighbors() {
        let neighbors = Cell::new(0, 0).neighbors(3, 3);
        assert_eq!(neighbors, vec![Cell::new(0, 1), Cell::new(1, 0), Cell::new(1, 1)]);
    }

    #[test]
    fn test_center_neighbors() {
        let neighbors = Cell::new(1, 1).neighbors(3, 3);
        assert_eq!(neighbors.len(), 8);
        assert!(!neighbors.contains(&Cell::new(1, 1)));
    }

    #[test]
    fn test_single_row_neighbors() {
        assert_eq!(Cell::new(0, 1).neighbors(1, 3), vec![Cell::new(0, 0), Cell::new(0, 2)]);
        assert!(Cell::new(0, 0).neighbors(1, 1).is_empty());
    }

    #[test]
    fn test_row_major_ordering() {
        let mut cells = vec![Cell::new(1, 0), Cell::new(0, 2), Cell::new(0, 1)];
        cells.sort();
        assert_eq!(cells, vec![Cell::new(0, 1), Cell::new(0, 2), Cell::new(1, 0)]);
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!("2,3".parse::<Cell>().unwrap(), Cell::new(2, 3));
        assert_eq!(" (4, 5) ".parse::<Cell>().unwrap(), Cell::new(4, 5));
        assert!("4".parse::<Cell>().is_err());
        assert!("a,1".parse::<Cell>().is_err());
    }
}
