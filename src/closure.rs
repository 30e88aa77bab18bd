//! The closure and GOTO-kernel operations that grow one canonical state's item set and
//! compute the (not yet canonicalized) kernel of the state it transitions to.

use std::collections::BTreeSet;

use crate::first::FirstSets;
use crate::grammar::Grammar;
use crate::item::Item;
use crate::symbol::Symbol;

/// Expands `seed` to its closure under `grammar`: for every item `A -> α · B β, a` with `B`
/// a non-terminal, adds `B -> · γ, b` for every production of `B` and every `b` in
/// `FIRST(β · a)`, repeating until no item set change occurs.
pub(crate) fn closure(grammar: &Grammar, first_sets: &FirstSets, seed: BTreeSet<Item>) -> BTreeSet<Item> {
    let mut items = seed;
    loop {
        let mut additions = Vec::new();
        for item in &items {
            if let Some(Symbol::NonTerminal(nt)) = item.next_symbol() {
                let lookaheads = first_sets.of_suffix(item.beta(), item.lookahead());
                for production in grammar.productions_for(nt) {
                    for lookahead in &lookaheads {
                        let new_item = Item::new(production.clone(), 0, lookahead.clone());
                        if !items.contains(&new_item) {
                            additions.push(new_item);
                        }
                    }
                }
            }
        }
        if additions.is_empty() {
            break;
        }
        items.extend(additions);
    }
    items
}

/// The kernel of the state reached from an item set on `symbol`: every item with the dot
/// immediately before `symbol`, advanced past it. Empty if nothing in `items` expects
/// `symbol` next -- the caller treats that as "no transition".
pub(crate) fn goto_kernel(items: &BTreeSet<Item>, symbol: &Symbol) -> BTreeSet<Item> {
    items
        .iter()
        .filter(|item| item.next_symbol() == Some(symbol))
        .map(Item::advance)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::production::Production;
    use crate::symbol::{NonTerminal, Terminal};

    #[test]
    fn closure_adds_productions_of_expected_nonterminal() {
        use pretty_assertions::assert_eq;

        let e = NonTerminal::new("E").unwrap();
        let plus = Terminal::new("+").unwrap();
        let p_add = Production::new(
            e.clone(),
            vec![
                Symbol::NonTerminal(e.clone()),
                Symbol::Terminal(plus),
                Symbol::NonTerminal(e.clone()),
            ],
        )
        .unwrap();
        let id = Terminal::new("id").unwrap();
        let p_id = Production::new(e.clone(), vec![Symbol::Terminal(id)]).unwrap();

        let grammar = Grammar::new(e.clone(), vec![p_add.clone(), p_id.clone()]).unwrap();
        let first_sets = FirstSets::compute(&grammar);

        let seed: BTreeSet<Item> = std::iter::once(Item::new(p_add.clone(), 0, Terminal::eof())).collect();
        let closed = closure(&grammar, &first_sets, seed);

        let expected: BTreeSet<Item> = [
            Item::new(p_add, 0, Terminal::eof()),
            Item::new(p_id, 0, Terminal::eof()),
        ]
        .into_iter()
        .collect();
        assert_eq!(closed, expected);
    }
}
