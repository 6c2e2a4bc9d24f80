//! Board model: cells, ground truth and the player's knowledge

pub mod cell;
pub mod state;
pub mod io;

pub use cell::Cell;
pub use state::{BoardError, BoardState};
pub use io::{
    board_to_string, create_example_boards, load_board_from_file, parse_board_from_string, save_board_to_file,
};
