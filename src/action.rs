//! Resolving the set of items that are "live" on a lookahead into a single parser action,
//! breaking shift/reduce and reduce/reduce conflicts with declared precedence.

use std::cmp::Reverse;
use std::fmt;

use crate::grammar::{Associativity, Grammar, PrecedenceMap};
use crate::production::Production;
use crate::state::State;
use crate::symbol::Terminal;

/// What the driver does when it sees a given lookahead in a given state.
#[derive(Clone)]
pub enum Action {
    Shift(State),
    Reduce(Production),
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift(s) => write!(f, "Shift({})", s.id()),
            Action::Reduce(p) => write!(f, "Reduce({})", p),
        }
    }
}

pub(crate) struct ActionResolver<'a> {
    pub grammar: &'a Grammar,
    pub precedence: &'a PrecedenceMap,
}

impl<'a> ActionResolver<'a> {
    /// Resolves the action for `state` on `lookahead`, given the (already computed) shift
    /// target, if any. Returns `None` when there is neither a shift nor a reduce candidate,
    /// meaning the lookahead is a syntax error in this state.
    pub fn resolve(
        &self,
        state: &State,
        lookahead: &Terminal,
        shift_target: Option<State>,
    ) -> Option<Action> {
        let reduce_candidates: Vec<Production> = state
            .items()
            .iter()
            .filter(|item| item.is_complete() && item.lookahead() == lookahead)
            .map(|item| item.production().clone())
            .collect();

        if reduce_candidates.len() >= 2 {
            log::debug!(
                "reduce/reduce conflict in state {} on {}; picking highest-precedence production",
                state.id(),
                lookahead
            );
        }
        if !reduce_candidates.is_empty() && shift_target.is_some() {
            log::debug!(
                "shift/reduce conflict in state {} on {}; resolving via precedence",
                state.id(),
                lookahead
            );
        }

        let best_reduce = self.pick_best_reduce(&reduce_candidates);
        match (best_reduce, shift_target) {
            (None, None) => None,
            (None, Some(shift)) => Some(Action::Shift(shift)),
            (Some(reduce), None) => Some(Action::Reduce(reduce)),
            (Some(reduce), Some(shift)) => Some(self.resolve_shift_reduce(reduce, lookahead, shift)),
        }
    }

    fn pick_best_reduce(&self, candidates: &[Production]) -> Option<Production> {
        candidates
            .iter()
            .min_by_key(|p| {
                let precedence = self.precedence.production(p).unwrap_or_default();
                (Reverse(precedence.level()), self.grammar.index_of(p))
            })
            .cloned()
    }

    fn resolve_shift_reduce(&self, reduce: Production, lookahead: &Terminal, shift: State) -> Action {
        let reduce_precedence = self.precedence.production(&reduce);
        let shift_precedence = self.precedence.terminal(lookahead);
        match (reduce_precedence, shift_precedence) {
            (Some(r), Some(s)) if r.level() > s.level() => Action::Reduce(reduce),
            (Some(r), Some(s)) if r.level() < s.level() => Action::Shift(shift),
            (Some(r), Some(_)) => match r.associativity() {
                Associativity::Left => Action::Reduce(reduce),
                Associativity::Right => Action::Shift(shift),
            },
            // Missing declarations default to shift, matching the conventional yacc/bison
            // behaviour for undeclared operators.
            _ => Action::Shift(shift),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use crate::grammar::Precedence;
    use crate::item::Item;
    use crate::symbol::NonTerminal;

    fn nt(name: &str) -> NonTerminal {
        NonTerminal::new(name).unwrap()
    }

    fn t(name: &str) -> Terminal {
        Terminal::new(name).unwrap()
    }

    #[test]
    fn reduce_reduce_picks_the_highest_precedence_production() {
        let e = nt("E");
        let add = Production::new(
            e.clone(),
            vec![
                Symbol::NonTerminal(e.clone()),
                Symbol::Terminal(t("+")),
                Symbol::NonTerminal(e.clone()),
            ],
        )
        .unwrap();
        let mul = Production::new(
            e.clone(),
            vec![
                Symbol::NonTerminal(e.clone()),
                Symbol::Terminal(t("*")),
                Symbol::NonTerminal(e.clone()),
            ],
        )
        .unwrap();
        let grammar = Grammar::new(e, vec![add.clone(), mul.clone()]).unwrap();

        let mut precedence = PrecedenceMap::new();
        precedence.set_production(add.clone(), Precedence::new(10, Associativity::Left).unwrap());
        precedence.set_production(mul.clone(), Precedence::new(20, Associativity::Left).unwrap());

        let lookahead = t("$end");
        let items: BTreeSet<Item> = [
            Item::new(add, 3, lookahead.clone()),
            Item::new(mul.clone(), 3, lookahead.clone()),
        ]
        .into_iter()
        .collect();
        let state = State::new(0, items);

        let resolver = ActionResolver {
            grammar: &grammar,
            precedence: &precedence,
        };
        match resolver.resolve(&state, &lookahead, None) {
            Some(Action::Reduce(p)) => assert_eq!(p, mul),
            other => panic!("expected a reduce by the higher-precedence production, got {:?}", other),
        }
    }

    #[test]
    fn reduce_reduce_ties_break_by_declaration_order() {
        let e = nt("E");
        let first = Production::new(e.clone(), vec![Symbol::Terminal(t("a"))]).unwrap();
        let second = Production::new(e.clone(), vec![Symbol::Terminal(t("b"))]).unwrap();
        let grammar = Grammar::new(e, vec![first.clone(), second.clone()]).unwrap();
        let precedence = PrecedenceMap::new();

        let lookahead = t("$end");
        let items: BTreeSet<Item> = [
            Item::new(first.clone(), 1, lookahead.clone()),
            Item::new(second, 1, lookahead.clone()),
        ]
        .into_iter()
        .collect();
        let state = State::new(0, items);

        let resolver = ActionResolver {
            grammar: &grammar,
            precedence: &precedence,
        };
        match resolver.resolve(&state, &lookahead, None) {
            Some(Action::Reduce(p)) => assert_eq!(p, first),
            other => panic!("expected a reduce by the first-declared production, got {:?}", other),
        }
    }

    #[test]
    fn shift_reduce_defaults_to_shift_without_declared_precedence() {
        let e = nt("E");
        let reducible = Production::new(e.clone(), vec![Symbol::Terminal(t("a"))]).unwrap();
        let grammar = Grammar::new(e, vec![reducible.clone()]).unwrap();
        let precedence = PrecedenceMap::new();

        let lookahead = t("+");
        let items: BTreeSet<Item> = std::iter::once(Item::new(reducible, 1, lookahead.clone())).collect();
        let state = State::new(0, items);
        let shift_target = State::new(1, BTreeSet::new());

        let resolver = ActionResolver {
            grammar: &grammar,
            precedence: &precedence,
        };
        match resolver.resolve(&state, &lookahead, Some(shift_target.clone())) {
            Some(Action::Shift(s)) => assert_eq!(s, shift_target),
            other => panic!("expected the default-to-shift behaviour, got {:?}", other),
        }
    }

    #[test]
    fn shift_reduce_left_associative_tie_prefers_reduce() {
        let e = nt("E");
        let add = Production::new(
            e.clone(),
            vec![
                Symbol::NonTerminal(e.clone()),
                Symbol::Terminal(t("+")),
                Symbol::NonTerminal(e.clone()),
            ],
        )
        .unwrap();
        let grammar = Grammar::new(e, vec![add.clone()]).unwrap();

        let mut precedence = PrecedenceMap::new();
        precedence.set_terminal(t("+"), Precedence::new(10, Associativity::Left).unwrap());
        precedence.set_production(add.clone(), Precedence::new(10, Associativity::Left).unwrap());

        let lookahead = t("+");
        let items: BTreeSet<Item> = std::iter::once(Item::new(add.clone(), 3, lookahead.clone())).collect();
        let state = State::new(0, items);
        let shift_target = State::new(1, BTreeSet::new());

        let resolver = ActionResolver {
            grammar: &grammar,
            precedence: &precedence,
        };
        match resolver.resolve(&state, &lookahead, Some(shift_target)) {
            Some(Action::Reduce(p)) => assert_eq!(p, add),
            other => panic!("left associativity should prefer reduce on a tie, got {:?}", other),
        }
    }

    #[test]
    fn shift_reduce_right_associative_tie_prefers_shift() {
        let e = nt("E");
        let pow = Production::new(
            e.clone(),
            vec![
                Symbol::NonTerminal(e.clone()),
                Symbol::Terminal(t("^")),
                Symbol::NonTerminal(e.clone()),
            ],
        )
        .unwrap();
        let grammar = Grammar::new(e, vec![pow.clone()]).unwrap();

        let mut precedence = PrecedenceMap::new();
        precedence.set_terminal(t("^"), Precedence::new(30, Associativity::Right).unwrap());
        precedence.set_production(pow.clone(), Precedence::new(30, Associativity::Right).unwrap());

        let lookahead = t("^");
        let items: BTreeSet<Item> = std::iter::once(Item::new(pow, 3, lookahead.clone())).collect();
        let state = State::new(0, items);
        let shift_target = State::new(1, BTreeSet::new());

        let resolver = ActionResolver {
            grammar: &grammar,
            precedence: &precedence,
        };
        match resolver.resolve(&state, &lookahead, Some(shift_target.clone())) {
            Some(Action::Shift(s)) => assert_eq!(s, shift_target),
            other => panic!("right associativity should prefer shift on a tie, got {:?}", other),
        }
    }

    #[test]
    fn no_candidates_means_no_action() {
        let e = nt("E");
        let p = Production::new(e.clone(), vec![Symbol::Terminal(t("a"))]).unwrap();
        let grammar = Grammar::new(e, vec![p]).unwrap();
        let precedence = PrecedenceMap::new();
        let state = State::new(0, BTreeSet::new());

        let resolver = ActionResolver {
            grammar: &grammar,
            precedence: &precedence,
        };
        assert!(resolver.resolve(&state, &t("x"), None).is_none());
    }
}
