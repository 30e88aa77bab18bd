//! Canonical LR(1) states: deduplicated, identity-addressed sets of items.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::item::Item;

struct StateData {
    id: usize,
    items: BTreeSet<Item>,
}

/// A canonical state in the LR automaton: a numbered, deduplicated set of items. Two
/// `State`s are equal iff they were produced by the same canonicalization call -- the
/// driver guarantees that closure-equivalent item sets always canonicalize to the same
/// `State`, so identity comparison here is equivalent to (and cheaper than) comparing the
/// item sets structurally.
#[derive(Clone)]
pub struct State(Rc<StateData>);

impl State {
    pub(crate) fn new(id: usize, items: BTreeSet<Item>) -> Self {
        Self(Rc::new(StateData { id, items }))
    }

    pub fn id(&self) -> usize {
        self.0.id
    }

    pub fn items(&self) -> &BTreeSet<Item> {
        &self.0.items
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State({})", self.id())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "state {}:", self.id())?;
        for item in self.items() {
            writeln!(f, "  {}", item)?;
        }
        Ok(())
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as *const ()).hash(state);
    }
}
