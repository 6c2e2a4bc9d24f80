//! Next-move suggestions

use super::evaluator::QueryEvaluator;
use crate::board::{BoardState, Cell};
use serde::Serialize;

/// A suggested move. Safe cells are preferred over mines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Hint {
    Safe { cell: Cell },
    Mine { cell: Cell },
    #[serde(rename = "none")]
    NoMove,
}

impl Hint {
    pub fn cell(&self) -> Option<Cell> {
        match self {
            Hint::Safe { cell } | Hint::Mine { cell } => Some(*cell),
            Hint::NoMove => None,
        }
    }
}

/// First frontier cell proved safe, otherwise the first proved mine
pub fn find_hint(evaluator: &QueryEvaluator<'_>, board: &BoardState) -> Hint {
    let clauses = evaluator.encode(board);
    let frontier = board.frontier();

    if let Some(&cell) = frontier.iter().find(|&&cell| evaluator.safe_with(&clauses, cell).is_proved()) {
        return Hint::Safe { cell };
    }

    frontier
        .iter()
        .find(|&&cell| evaluator.mine_with(&clauses, cell).is_proved())
        .map(|&cell| Hint::Mine { cell })
        .unwrap_or(Hint::NoMove)
}

/// Every hidden cell on the board proved safe, in row-major order
pub fn safe_cells(evaluator: &QueryEvaluator<'_>, board: &BoardState) -> Vec<Cell> {
    let clauses = evaluator.encode(board);

    board
        .hidden_cells()
        .into_iter()
        .filter(|&cell| evaluator.safe_with(&clauses, cell).is_proved())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::ClauseEncoder;
    use crate::oracle::InMemoryOracle;
    use std::time::Duration;

    fn evaluator(oracle: &InMemoryOracle) -> QueryEvaluator<'_> {
        QueryEvaluator::new(oracle, ClauseEncoder::default(), Duration::from_secs(5))
    }

    #[test]
    fn test_prefers_safe_cells() {
        let oracle = InMemoryOracle::new();
        let mut board = BoardState::new(1, 3, vec![Cell::new(0, 2)]).unwrap();
        board.reveal(Cell::new(0, 0)).unwrap();

        assert_eq!(find_hint(&evaluator(&oracle), &board), Hint::Safe { cell: Cell::new(0, 1) });
    }

    #[test]
    fn test_falls_back_to_mines() {
        let oracle = InMemoryOracle::new();
        let mut board = BoardState::new(1, 3, vec![Cell::new(0, 2)]).unwrap();
        board.reveal(Cell::new(0, 0)).unwrap();
        board.reveal(Cell::new(0, 1)).unwrap();

        let hint = find_hint(&evaluator(&oracle), &board);
        assert_eq!(hint, Hint::Mine { cell: Cell::new(0, 2) });
        assert_eq!(hint.cell(), Some(Cell::new(0, 2)));
    }

    #[test]
    fn test_no_move() {
        let oracle = InMemoryOracle::new();
        let mut board = BoardState::new(2, 2, vec![Cell::new(1, 1)]).unwrap();
        board.reveal(Cell::new(0, 0)).unwrap();

        let hint = find_hint(&evaluator(&oracle), &board);
        assert_eq!(hint, Hint::NoMove);
        assert_eq!(serde_json::to_string(&hint).unwrap(), r#"{"kind":"none"}"#);
    }

    #[test]
    fn test_safe_cells_covers_whole_board() {
        let oracle = InMemoryOracle::new();
        let mut board = BoardState::new(3, 3, Vec::new()).unwrap();
        board.reveal(Cell::new(1, 1)).unwrap();

        let safe = safe_cells(&evaluator(&oracle), &board);
        assert_eq!(safe.len(), 8);
        assert!(!safe.contains(&Cell::new(1, 1)));
    }
}
