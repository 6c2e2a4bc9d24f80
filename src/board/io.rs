//! Text I/O for boards
//!
//! Format: one row per line, `.` hidden safe cell, `*` mine, `s` revealed
//! safe cell, `f` flagged safe cell, `F` flagged mine. A digit is read as a
//! revealed safe cell; its value is recomputed from the mines.

use super::{BoardState, Cell};
use anyhow::{Context, Result};
use std::path::Path;

/// Load a board from a text file
pub fn load_board_from_file<P: AsRef<Path>>(path: P) -> Result<BoardState> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read board file: {}", path.as_ref().display()))?;

    parse_board_from_string(&content)
        .with_context(|| format!("Failed to parse board from file: {}", path.as_ref().display()))
}

/// Parse a board from its string representation
pub fn parse_board_from_string(content: &str) -> Result<BoardState> {
    let lines: Vec<&str> = content.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        anyhow::bail!("Board file is empty or contains no valid rows");
    }

    let rows = lines.len();
    let cols = lines[0].chars().count();

    let mut mines = Vec::new();
    let mut revealed = Vec::new();
    let mut flagged = Vec::new();

    for (row, line) in lines.iter().enumerate() {
        if line.chars().count() != cols {
            anyhow::bail!("Row {} has length {}, expected {} (all rows must have the same length)",
                         row, line.chars().count(), cols);
        }

        for (col, ch) in line.chars().enumerate() {
            let cell = Cell::new(row, col);
            match ch {
                '.' => {}
                '*' => mines.push(cell),
                's' => revealed.push(cell),
                'f' => flagged.push(cell),
                'F' => {
                    mines.push(cell);
                    flagged.push(cell);
                }
                d if d.is_ascii_digit() => revealed.push(cell),
                _ => anyhow::bail!("Invalid character '{}' at position ({}, {}). Expected one of . * s f F or a digit",
                                 ch, row, col),
            }
        }
    }

    let mut board = BoardState::new(rows, cols, mines)?;
    for cell in revealed {
        board.reveal(cell)?;
    }
    for cell in flagged {
        board.toggle_flag(cell)?;
    }

    Ok(board)
}

/// Save a board to a text file
pub fn save_board_to_file<P: AsRef<Path>>(board: &BoardState, path: P) -> Result<()> {
    let content = board_to_string(board);

    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write board to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Convert a board to its string representation
pub fn board_to_string(board: &BoardState) -> String {
    let mut result = String::with_capacity(board.rows * (board.cols + 1));

    for row in 0..board.rows {
        for col in 0..board.cols {
            let cell = Cell::new(row, col);
            let symbol = match (board.is_mine(cell), board.is_revealed(cell), board.is_flagged(cell)) {
                (true, _, true) => 'F',
                (true, _, false) => '*',
                (false, true, _) => 's',
                (false, false, true) => 'f',
                (false, false, false) => '.',
            };
            result.push(symbol);
        }
        result.push('\n');
    }

    result
}

/// Create example board files
pub fn create_example_boards<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    // Solved in one round from the left end
    let row_content = "s.*\n";
    std::fs::write(dir.join("row.txt"), row_content)
        .context("Failed to write row.txt")?;

    // Three hidden neighbours share one mine: no deduction possible
    let stuck_content = "s.\n.*\n";
    std::fs::write(dir.join("stuck.txt"), stuck_content)
        .context("Failed to write stuck.txt")?;

    // Opening in a corner, two mines on the far edge
    let opening_content = "s....\n.....\n.....\n....*\n..*..\n";
    std::fs::write(dir.join("opening.txt"), opening_content)
        .context("Failed to write opening.txt")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_board() {
        let board = parse_board_from_string("s.*\n.f.\nF..\n").unwrap();
        assert_eq!((board.rows, board.cols), (3, 3));
        assert_eq!(board.mine_count(), 2);
        assert_eq!(board.clue(Cell::new(0, 0)), Some(0));
        assert!(board.is_flagged(Cell::new(1, 1)));
        assert!(board.is_flagged(Cell::new(2, 0)));
        assert!(board.is_mine(Cell::new(2, 0)));
    }

    #[test]
    fn test_digits_are_recomputed() {
        let board = parse_board_from_string("7.*").unwrap();
        assert_eq!(board.clue(Cell::new(0, 0)), Some(0));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_board_from_string("").is_err());
        assert!(parse_board_from_string("..\n...").is_err());
        assert!(parse_board_from_string("..x").is_err());
        assert!(parse_board_from_string("**").is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("boards/puzzle.txt");

        let board = parse_board_from_string("s.*\n.f.\nF..").unwrap();
        save_board_to_file(&board, &path).unwrap();
        let loaded = load_board_from_file(&path).unwrap();

        assert_eq!(loaded, board);
        assert_eq!(board_to_string(&loaded), "s.*\n.f.\nF..\n");
    }

    #[test]
    fn test_loaded_boards_never_show_a_mine() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("claimed.txt");

        // A digit claims a revealed cell; its value and safety come from the mines
        std::fs::write(&path, "9*
.*
").unwrap();
        let board = load_board_from_file(&path).unwrap();

        assert_eq!(board.clue(Cell::new(0, 0)), Some(2));
        assert!(board.revealed().all(|(cell, clue)| !board.is_mine(cell) && clue == board.clue_number(cell)));
        assert!(!board_to_string(&board).contains('9'));
    }

    #[test]
    fn test_example_boards_parse() {
        let dir = tempdir().unwrap();
        create_example_boards(dir.path()).unwrap();

        for name in ["row.txt", "stuck.txt", "opening.txt"] {
            let board = load_board_from_file(dir.path().join(name)).unwrap();
            assert_eq!(board.revealed_count(), 1);
        }
    }
}
