//! Literals, clauses and clause sets over the `Mine(cell)` predicate

use crate::board::Cell;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `Mine(cell)` when `mine` is true, `-Mine(cell)` otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub cell: Cell,
    pub mine: bool,
}

impl Literal {
    pub const fn mine(cell: Cell) -> Self {
        Self { cell, mine: true }
    }

    pub const fn safe(cell: Cell) -> Self {
        Self { cell, mine: false }
    }

    pub const fn negate(self) -> Self {
        Self { cell: self.cell, mine: !self.mine }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.mine { "" } else { "-" };
        write!(f, "{}Mine({},{})", sign, self.cell.row, self.cell.col)
    }
}

/// A disjunction of literals. The empty clause is unsatisfiable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clause {
    pub literals: Vec<Literal>,
}

impl Clause {
    pub fn new(literals: Vec<Literal>) -> Self {
        Self { literals }
    }

    pub fn unit(literal: Literal) -> Self {
        Self { literals: vec![literal] }
    }

    /// The clause with no literals, standing for an impossible situation
    pub fn falsum() -> Self {
        Self { literals: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }
}

/// Oracle text form: `Lit1 | Lit2 | ... .`, or `$F.` for the empty clause
impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.literals.is_empty() {
            return write!(f, "$F.");
        }

        for (i, literal) in self.literals.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", literal)?;
        }
        write!(f, ".")
    }
}

/// An ordered sequence of clauses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseSet {
    clauses: Vec<Clause>,
}

impl ClauseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Clause> {
        self.clauses.iter()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn literal_count(&self) -> usize {
        self.clauses.iter().map(Clause::len).sum()
    }

    /// Whether the set contains the empty clause
    pub fn has_falsum(&self) -> bool {
        self.clauses.iter().any(Clause::is_empty)
    }
}

impl Extend<Clause> for ClauseSet {
    fn extend<T: IntoIterator<Item = Clause>>(&mut self, iter: T) {
        self.clauses.extend(iter);
    }
}

impl FromIterator<Clause> for ClauseSet {
    fn from_iter<T: IntoIterator<Item = Clause>>(iter: T) -> Self {
        Self { clauses: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a ClauseSet {
    type Item = &'a Clause;
    type IntoIter = std::slice::Iter<'a, Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_display() {
        let cell = Cell::new(2, 3);
        assert_eq!(Literal::mine(cell).to_string(), "Mine(2,3)");
        assert_eq!(Literal::safe(cell).to_string(), "-Mine(2,3)");
        assert_eq!(Literal::mine(cell).negate(), Literal::safe(cell));
    }

    #[test]
    fn test_clause_display() {
        let clause = Clause::new(vec![
            Literal::safe(Cell::new(0, 0)),
            Literal::safe(Cell::new(0, 1)),
        ]);
        assert_eq!(clause.to_string(), "-Mine(0,0) | -Mine(0,1).");
        assert_eq!(Clause::falsum().to_string(), "$F.");
        assert!(Clause::unit(Literal::mine(Cell::new(1, 1))).is_unit());
    }

    #[test]
    fn test_clause_set() {
        let mut set = ClauseSet::new();
        set.push(Clause::unit(Literal::mine(Cell::new(0, 0))));
        set.push(Clause::new(vec![Literal::mine(Cell::new(0, 1)), Literal::safe(Cell::new(1, 1))]));

        assert_eq!(set.len(), 2);
        assert_eq!(set.literal_count(), 3);
        assert!(!set.has_falsum());

        set.push(Clause::falsum());
        assert!(set.has_falsum());
    }
}
