//! Productions: `head -> body`, compared by identity rather than by structure.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::error::GrammarError;
use crate::symbol::{NonTerminal, Symbol};

struct ProductionData {
    head: NonTerminal,
    body: Vec<Symbol>,
}

/// One grammar rule. Two productions built from `Production::new` with identical heads and
/// bodies are still distinct entities -- equality, hashing and ordering are all based on the
/// `Rc` pointer, never on structural content. This is what lets a client reuse the same
/// nonterminal across multiple rules while still being able to tell which specific rule fired
/// during a reduction.
#[derive(Clone)]
pub struct Production(Rc<ProductionData>);

impl Production {
    pub fn new(head: NonTerminal, body: Vec<Symbol>) -> Result<Self, GrammarError> {
        if body
            .iter()
            .any(|s| matches!(s, Symbol::Terminal(t) if t.is_epsilon()))
        {
            return Err(GrammarError::EpsilonInBody);
        }
        Ok(Self(Rc::new(ProductionData { head, body })))
    }

    pub fn head(&self) -> &NonTerminal {
        &self.0.head
    }

    pub fn body(&self) -> &[Symbol] {
        &self.0.body
    }

    pub(crate) fn ptr(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }
}

impl fmt::Debug for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Production({})", self)
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.head())?;
        if self.body().is_empty() {
            write!(f, " ε")?;
        } else {
            for symbol in self.body() {
                write!(f, " {}", symbol)?;
            }
        }
        Ok(())
    }
}

impl PartialEq for Production {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Production {}

impl Hash for Production {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ptr().hash(state);
    }
}

impl PartialOrd for Production {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Production {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ptr().cmp(&other.ptr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_instances_are_not_equal() {
        let head = NonTerminal::new("E").unwrap();
        let a = Production::new(head.clone(), vec![]).unwrap();
        let b = Production::new(head, vec![]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn clone_is_equal() {
        let head = NonTerminal::new("E").unwrap();
        let a = Production::new(head, vec![]).unwrap();
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_epsilon_in_body() {
        use crate::symbol::Terminal;
        let head = NonTerminal::new("E").unwrap();
        let body = vec![Symbol::Terminal(Terminal::epsilon())];
        assert!(Production::new(head, body).is_err());
    }
}
