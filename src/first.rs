//! FIRST-set analysis: the fixed-point computation every other component builds on.

use std::collections::{HashMap, HashSet};

use crate::grammar::Grammar;
use crate::symbol::{Symbol, Terminal};

pub(crate) fn symbol_first(
    sets: &HashMap<Symbol, HashSet<Terminal>>,
    symbol: &Symbol,
) -> HashSet<Terminal> {
    match symbol {
        Symbol::Terminal(t) => std::iter::once(t.clone()).collect(),
        Symbol::NonTerminal(_) => sets.get(symbol).cloned().unwrap_or_default(),
    }
}

/// FIRST of a symbol sequence, without a trailing lookahead: terminals accumulate left to
/// right until a non-nullable symbol is hit. Returns the accumulated set and whether the
/// whole sequence is nullable (every symbol in it can derive epsilon).
pub(crate) fn first_of_body(
    sets: &HashMap<Symbol, HashSet<Terminal>>,
    body: &[Symbol],
) -> (HashSet<Terminal>, bool) {
    let mut result = HashSet::new();
    for symbol in body {
        let sf = symbol_first(sets, symbol);
        let nullable = sf.contains(&Terminal::epsilon());
        result.extend(sf.into_iter().filter(|t| !t.is_epsilon()));
        if !nullable {
            return (result, false);
        }
    }
    (result, true)
}

/// FIRST sets for every non-terminal in a grammar, computed once by fixed-point iteration
/// and then queried for the lifetime of the parser built from that grammar.
pub struct FirstSets(HashMap<Symbol, HashSet<Terminal>>);

impl FirstSets {
    pub fn compute(grammar: &Grammar) -> Self {
        let mut sets: HashMap<Symbol, HashSet<Terminal>> = HashMap::new();
        for production in grammar.productions() {
            sets.entry(Symbol::NonTerminal(production.head().clone()))
                .or_default();
        }

        let mut changed = true;
        while changed {
            changed = false;
            for production in grammar.productions() {
                let (body_first, nullable) = first_of_body(&sets, production.body());
                let entry = sets
                    .entry(Symbol::NonTerminal(production.head().clone()))
                    .or_default();
                let before = entry.len();
                entry.extend(body_first);
                if nullable {
                    entry.insert(Terminal::epsilon());
                }
                if entry.len() != before {
                    changed = true;
                }
            }
        }

        FirstSets(sets)
    }

    /// FIRST of a single symbol. Terminals map to the singleton `{self}`; non-terminals with
    /// no productions map to the empty set.
    pub fn of(&self, symbol: &Symbol) -> HashSet<Terminal> {
        symbol_first(&self.0, symbol)
    }

    /// FIRST of `suffix · lookahead`: the lookahead terminal is included only once every
    /// symbol in `suffix` has turned out to be nullable.
    pub(crate) fn of_suffix(&self, suffix: &[Symbol], lookahead: &Terminal) -> HashSet<Terminal> {
        let (mut set, nullable) = first_of_body(&self.0, suffix);
        if nullable {
            set.insert(lookahead.clone());
        }
        set
    }

    pub(crate) fn raw(&self) -> &HashMap<Symbol, HashSet<Terminal>> {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::production::Production;
    use crate::symbol::NonTerminal;

    // E -> E + T | T
    // T -> ( E ) | id
    fn build_grammar() -> Grammar {
        let e = NonTerminal::new("E").unwrap();
        let t_nt = NonTerminal::new("T").unwrap();
        let plus = Terminal::new("+").unwrap();
        let lparen = Terminal::new("(").unwrap();
        let rparen = Terminal::new(")").unwrap();
        let id = Terminal::new("id").unwrap();

        let productions = vec![
            Production::new(
                e.clone(),
                vec![
                    Symbol::NonTerminal(e.clone()),
                    Symbol::Terminal(plus),
                    Symbol::NonTerminal(t_nt.clone()),
                ],
            )
            .unwrap(),
            Production::new(e.clone(), vec![Symbol::NonTerminal(t_nt.clone())]).unwrap(),
            Production::new(
                t_nt.clone(),
                vec![
                    Symbol::Terminal(lparen),
                    Symbol::NonTerminal(e.clone()),
                    Symbol::Terminal(rparen),
                ],
            )
            .unwrap(),
            Production::new(t_nt.clone(), vec![Symbol::Terminal(id)]).unwrap(),
        ];

        Grammar::new(e, productions).unwrap()
    }

    #[test]
    fn first_of_left_recursive_nonterminal() {
        use pretty_assertions::assert_eq;

        let grammar = build_grammar();
        let first_sets = FirstSets::compute(&grammar);
        let e = NonTerminal::new("E").unwrap();
        let first_e = first_sets.of(&Symbol::NonTerminal(e));

        let expected: HashSet<Terminal> = [Terminal::new("(").unwrap(), Terminal::new("id").unwrap()]
            .into_iter()
            .collect();
        assert_eq!(first_e, expected);
    }

    #[test]
    fn of_suffix_includes_lookahead_when_nullable() {
        let grammar = build_grammar();
        let first_sets = FirstSets::compute(&grammar);
        let lookahead = Terminal::new("$end").unwrap();
        let result = first_sets.of_suffix(&[], &lookahead);
        assert_eq!(result.len(), 1);
        assert!(result.contains(&lookahead));
    }
}
