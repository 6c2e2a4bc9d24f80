//! Cell to SAT variable numbering for the embedded backends

use super::{ClauseSet, Literal};
use crate::board::Cell;
use std::collections::BTreeMap;

/// Maps cells to positive DIMACS variable ids, assigned in first-seen order
#[derive(Debug)]
pub struct VariableManager {
    variable_map: BTreeMap<Cell, i32>,
    next_id: i32,
}

impl Default for VariableManager {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableManager {
    pub fn new() -> Self {
        Self {
            variable_map: BTreeMap::new(),
            next_id: 1, // SAT variables start from 1
        }
    }

    /// Number every cell mentioned by the clause set
    pub fn from_clauses(clauses: &ClauseSet) -> Self {
        let mut manager = Self::new();
        for clause in clauses {
            for literal in &clause.literals {
                manager.variable(literal.cell);
            }
        }
        manager
    }

    /// Get or create the variable for a cell
    pub fn variable(&mut self, cell: Cell) -> i32 {
        if let Some(&id) = self.variable_map.get(&cell) {
            return id;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.variable_map.insert(cell, id);
        id
    }

    /// Signed DIMACS literal: positive means "is a mine"
    pub fn literal(&mut self, literal: Literal) -> i32 {
        let var = self.variable(literal.cell);
        if literal.mine { var } else { -var }
    }

    /// Look up without allocating
    pub fn get(&self, cell: Cell) -> Option<i32> {
        self.variable_map.get(&cell).copied()
    }

    pub fn variable_count(&self) -> usize {
        (self.next_id - 1) as usize
    }

    /// Integer clauses, empty clauses included
    pub fn encode(&mut self, clauses: &ClauseSet) -> Vec<Vec<i32>> {
        clauses
            .iter()
            .map(|clause| clause.literals.iter().map(|&lit| self.literal(lit)).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Clause;

    #[test]
    fn test_variable_creation() {
        let mut vm = VariableManager::new();

        let var1 = vm.variable(Cell::new(0, 0));
        let var2 = vm.variable(Cell::new(1, 1));

        assert_eq!(var1, 1);
        assert_eq!(var2, 2);
        assert_eq!(vm.variable(Cell::new(0, 0)), var1);
        assert_eq!(vm.variable_count(), 2);
    }

    #[test]
    fn test_default_numbers_from_one() {
        let mut vm = VariableManager::default();
        assert_eq!(vm.variable_count(), 0);
        assert_eq!(vm.variable(Cell::new(3, 3)), 1);
        assert_eq!(vm.variable_count(), 1);
    }

    #[test]
    fn test_literal_signs() {
        let mut vm = VariableManager::new();
        let cell = Cell::new(0, 2);

        assert_eq!(vm.literal(Literal::mine(cell)), 1);
        assert_eq!(vm.literal(Literal::safe(cell)), -1);
        assert_eq!(vm.get(Cell::new(5, 5)), None);
    }

    #[test]
    fn test_encode_clause_set() {
        let clauses: ClauseSet = vec![
            Clause::unit(Literal::safe(Cell::new(0, 0))),
            Clause::new(vec![Literal::mine(Cell::new(0, 1)), Literal::mine(Cell::new(0, 0))]),
            Clause::falsum(),
        ]
        .into_iter()
        .collect();

        let mut vm = VariableManager::from_clauses(&clauses);
        assert_eq!(vm.variable_count(), 2);
        assert_eq!(vm.encode(&clauses), vec![vec![-1], vec![2, 1], vec![]]);
    }
}
