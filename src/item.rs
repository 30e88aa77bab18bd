//! LR(1) items: a production, a dot position within its body, and a lookahead terminal.

use std::fmt;

use crate::production::Production;
use crate::symbol::{Symbol, Terminal};

/// `[production, dot, lookahead]` -- the unit closure and GOTO operate on. Two items are
/// equal only when they share the same production *identity*, the same dot position, and
/// the same lookahead.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Item {
    production: Production,
    dot: usize,
    lookahead: Terminal,
}

impl Item {
    pub(crate) fn new(production: Production, dot: usize, lookahead: Terminal) -> Self {
        Self {
            production,
            dot,
            lookahead,
        }
    }

    pub fn production(&self) -> &Production {
        &self.production
    }

    pub fn dot(&self) -> usize {
        self.dot
    }

    pub fn lookahead(&self) -> &Terminal {
        &self.lookahead
    }

    /// The symbol immediately after the dot, or `None` when the item is complete.
    pub fn next_symbol(&self) -> Option<&Symbol> {
        self.production.body().get(self.dot)
    }

    /// The symbols after the one the dot points at -- `β` in `A -> α · X β`.
    pub(crate) fn beta(&self) -> &[Symbol] {
        &self.production.body()[(self.dot + 1).min(self.production.body().len())..]
    }

    pub fn is_complete(&self) -> bool {
        self.dot == self.production.body().len()
    }

    pub(crate) fn advance(&self) -> Self {
        Self {
            production: self.production.clone(),
            dot: self.dot + 1,
            lookahead: self.lookahead.clone(),
        }
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} ->", self.production.head())?;
        for (i, symbol) in self.production.body().iter().enumerate() {
            if i == self.dot {
                write!(f, " .")?;
            }
            write!(f, " {}", symbol)?;
        }
        if self.is_complete() {
            write!(f, " .")?;
        }
        write!(f, ", {}]", self.lookahead)
    }
}

impl PartialOrd for Item {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Item {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.production.cmp(&other.production))
            .then(self.dot.cmp(&other.dot))
            .then(self.lookahead.cmp(&other.lookahead))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::NonTerminal;

    #[test]
    fn advance_moves_the_dot() {
        let e = NonTerminal::new("E").unwrap();
        let plus = Terminal::new("+").unwrap();
        let production =
            Production::new(e, vec![Symbol::Terminal(plus.clone())]).unwrap();
        let item = Item::new(production, 0, Terminal::eof());
        assert_eq!(item.next_symbol(), Some(&Symbol::Terminal(plus)));
        assert!(!item.is_complete());

        let advanced = item.advance();
        assert!(advanced.is_complete());
        assert_eq!(advanced.next_symbol(), None);
    }
}
