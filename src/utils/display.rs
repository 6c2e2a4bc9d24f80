//! Display and output formatting utilities

use crate::board::{BoardState, Cell};
use crate::solve::VerificationReport;

/// Format boards for the console
pub struct BoardFormatter;

impl BoardFormatter {
    /// Player's view with row and column numbers
    pub fn format_board_with_coords(board: &BoardState) -> String {
        Self::format_with(board, |cell| Self::player_symbol(board, cell))
    }

    /// Full board with mines shown, for finished games and generated puzzles
    pub fn format_board_uncovered(board: &BoardState) -> String {
        Self::format_with(board, |cell| {
            if board.is_mine(cell) {
                '*'
            } else {
                Self::clue_symbol(board.clue_number(cell))
            }
        })
    }

    fn format_with(board: &BoardState, symbol: impl Fn(Cell) -> char) -> String {
        let mut output = String::new();

        // Header with column numbers
        output.push_str("   ");
        for col in 0..board.cols {
            output.push_str(&format!("{:2}", col % 10));
        }
        output.push('\n');

        // Rows with row numbers
        for row in 0..board.rows {
            output.push_str(&format!("{:2} ", row));
            for col in 0..board.cols {
                output.push(' ');
                output.push(symbol(Cell::new(row, col)));
            }
            output.push('\n');
        }

        output
    }

    fn player_symbol(board: &BoardState, cell: Cell) -> char {
        match board.clue(cell) {
            Some(clue) => Self::clue_symbol(clue),
            None if board.is_flagged(cell) => 'F',
            None => '#',
        }
    }

    fn clue_symbol(clue: u8) -> char {
        if clue == 0 {
            '·'
        } else {
            char::from(b'0' + clue)
        }
    }

    /// Round-by-round summary of a verification run
    pub fn format_report(report: &VerificationReport) -> String {
        let mut output = report.to_string();

        for (i, round) in report.rounds.iter().enumerate() {
            let cells: Vec<String> = round.iter().map(|cell| cell.to_string()).collect();
            output.push_str(&format!("  Round {}: {}\n", i + 1, cells.join(" ")));
        }

        output
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() &&
        (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
