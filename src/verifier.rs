//! Static verification: builds the full canonical automaton eagerly (unlike the lazy
//! driver) and reports every shift/reduce or reduce/reduce conflict it finds, whether or
//! not the runtime's precedence policy would go on to resolve it.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

use crate::first::{first_of_body, FirstSets};
use crate::grammar::{augment, Associativity, Grammar, PrecedenceMap};
use crate::production::Production;
use crate::symbol::{NonTerminal, Symbol, Terminal};

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct Lr0Item {
    production: Production,
    dot: usize,
}

impl Lr0Item {
    fn next_symbol(&self) -> Option<&Symbol> {
        self.production.body().get(self.dot)
    }

    fn is_complete(&self) -> bool {
        self.dot == self.production.body().len()
    }

    fn advance(&self) -> Self {
        Self {
            production: self.production.clone(),
            dot: self.dot + 1,
        }
    }
}

fn lr0_closure(grammar: &Grammar, seed: BTreeSet<Lr0Item>) -> BTreeSet<Lr0Item> {
    let mut items = seed;
    loop {
        let mut additions = Vec::new();
        for item in &items {
            if let Some(Symbol::NonTerminal(nt)) = item.next_symbol() {
                for production in grammar.productions_for(nt) {
                    let new_item = Lr0Item {
                        production: production.clone(),
                        dot: 0,
                    };
                    if !items.contains(&new_item) {
                        additions.push(new_item);
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

fn lr0_goto_kernel(items: &BTreeSet<Lr0Item>, symbol: &Symbol) -> BTreeSet<Lr0Item> {
    items
        .iter()
        .filter(|item| item.next_symbol() == Some(symbol))
        .map(Lr0Item::advance)
        .collect()
}

struct Lr0State {
    items: BTreeSet<Lr0Item>,
    transitions: HashMap<Symbol, usize>,
}

fn build_lr0_automaton(grammar: &Grammar, augmented_production: &Production) -> Vec<Lr0State> {
    let initial_kernel: BTreeSet<Lr0Item> = std::iter::once(Lr0Item {
        production: augmented_production.clone(),
        dot: 0,
    })
    .collect();
    let initial_items = lr0_closure(grammar, initial_kernel);

    let mut states = vec![Lr0State {
        items: initial_items.clone(),
        transitions: HashMap::new(),
    }];
    let mut index_of: HashMap<BTreeSet<Lr0Item>, usize> = HashMap::new();
    index_of.insert(initial_items, 0);

    let mut queue = VecDeque::new();
    queue.push_back(0usize);

    while let Some(state_index) = queue.pop_front() {
        let items = states[state_index].items.clone();
        let mut expected: BTreeSet<Symbol> = BTreeSet::new();
        for item in &items {
            if let Some(symbol) = item.next_symbol() {
                expected.insert(symbol.clone());
            }
        }

        for symbol in expected {
            let kernel = lr0_goto_kernel(&items, &symbol);
            if kernel.is_empty() {
                continue;
            }
            let closed = lr0_closure(grammar, kernel);
            let target_index = if let Some(&idx) = index_of.get(&closed) {
                idx
            } else {
                let idx = states.len();
                states.push(Lr0State {
                    items: closed.clone(),
                    transitions: HashMap::new(),
                });
                index_of.insert(closed, idx);
                queue.push_back(idx);
                idx
            };
            states[state_index].transitions.insert(symbol, target_index);
        }
    }

    states
}

fn follow_sets(grammar: &Grammar, first_sets: &FirstSets) -> HashMap<NonTerminal, HashSet<Terminal>> {
    let mut follow: HashMap<NonTerminal, HashSet<Terminal>> = grammar
        .productions()
        .iter()
        .map(|p| (p.head().clone(), HashSet::new()))
        .collect();
    follow.entry(grammar.start().clone()).or_default().insert(Terminal::eof());

    let mut changed = true;
    while changed {
        changed = false;
        for production in grammar.productions() {
            let body = production.body();
            for i in 0..body.len() {
                let Symbol::NonTerminal(b) = &body[i] else {
                    continue;
                };
                let beta = &body[i + 1..];
                let (beta_first, nullable) = first_of_body(first_sets.raw(), beta);
                let head_follow_snapshot = follow.get(production.head()).cloned().unwrap_or_default();

                let entry = follow.entry(b.clone()).or_default();
                let before = entry.len();
                entry.extend(beta_first);
                if nullable {
                    entry.extend(head_follow_snapshot);
                }
                if entry.len() != before {
                    changed = true;
                }
            }
        }
    }
    follow
}

/// One of the competing actions the verifier found for a single `(state, terminal)` pair.
#[derive(Clone, Debug)]
pub enum VerifierAction {
    Shift(usize),
    Reduce(Production),
    Accept,
}

impl fmt::Display for VerifierAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifierAction::Shift(s) => write!(f, "shift to state {}", s),
            VerifierAction::Reduce(p) => write!(f, "reduce by {}", p),
            VerifierAction::Accept => write!(f, "accept"),
        }
    }
}

/// A shift/reduce or reduce/reduce conflict discovered while verifying a grammar.
#[derive(Clone, Debug)]
pub struct VerifierConflict {
    pub state: usize,
    pub terminal: Terminal,
    pub actions: Vec<VerifierAction>,
}

impl fmt::Display for VerifierConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state {} on '{}': ", self.state, self.terminal)?;
        for (i, action) in self.actions.iter().enumerate() {
            if i > 0 {
                write!(f, " vs. ")?;
            }
            write!(f, "{}", action)?;
        }
        Ok(())
    }
}

/// Receives every conflict [`verify`] finds. Implemented for `Vec<VerifierConflict>` and for
/// any `FnMut(VerifierConflict)`, so callers can either collect conflicts or log them as
/// they're found.
pub trait ConflictSink {
    fn report(&mut self, conflict: VerifierConflict);
}

fn reduce_like_production(action: &VerifierAction, augmented: &Production) -> Option<Production> {
    match action {
        VerifierAction::Reduce(p) => Some(p.clone()),
        VerifierAction::Accept => Some(augmented.clone()),
        VerifierAction::Shift(_) => None,
    }
}

fn as_verifier_action(production: Production, augmented: &Production) -> VerifierAction {
    if &production == augmented {
        VerifierAction::Accept
    } else {
        VerifierAction::Reduce(production)
    }
}

fn action_matches(a: &VerifierAction, b: &VerifierAction) -> bool {
    match (a, b) {
        (VerifierAction::Shift(x), VerifierAction::Shift(y)) => x == y,
        (VerifierAction::Reduce(x), VerifierAction::Reduce(y)) => x == y,
        (VerifierAction::Accept, VerifierAction::Accept) => true,
        _ => false,
    }
}

/// Picks the action `Parser` would resolve this conflict to, following the exact policy
/// `action.rs::ActionResolver` applies at runtime: highest-precedence reduce wins
/// reduce/reduce ties (declaration order breaks remaining ties), and shift/reduce ties go to
/// associativity, defaulting to shift when precedence is undeclared on either side.
fn preferred_action(
    grammar: &Grammar,
    precedence: &PrecedenceMap,
    augmented: &Production,
    terminal: &Terminal,
    actions: &[VerifierAction],
) -> Option<VerifierAction> {
    let best_reduce = actions
        .iter()
        .filter_map(|a| reduce_like_production(a, augmented))
        .min_by_key(|p| {
            (
                Reverse(precedence.production(p).unwrap_or_default().level()),
                grammar.index_of(p),
            )
        });

    let shift_target = actions.iter().find_map(|a| match a {
        VerifierAction::Shift(s) => Some(*s),
        _ => None,
    });

    match (best_reduce, shift_target) {
        (None, None) => None,
        (None, Some(s)) => Some(VerifierAction::Shift(s)),
        (Some(r), None) => Some(as_verifier_action(r, augmented)),
        (Some(r), Some(s)) => {
            let reduce_precedence = precedence.production(&r);
            let shift_precedence = precedence.terminal(terminal);
            let winner = match (reduce_precedence, shift_precedence) {
                (Some(rp), Some(sp)) if rp.level() > sp.level() => as_verifier_action(r, augmented),
                (Some(rp), Some(sp)) if rp.level() < sp.level() => VerifierAction::Shift(s),
                (Some(rp), Some(_)) => match rp.associativity() {
                    Associativity::Left => as_verifier_action(r, augmented),
                    Associativity::Right => VerifierAction::Shift(s),
                },
                _ => VerifierAction::Shift(s),
            };
            Some(winner)
        }
    }
}

impl ConflictSink for Vec<VerifierConflict> {
    fn report(&mut self, conflict: VerifierConflict) {
        self.push(conflict);
    }
}

impl<F: FnMut(VerifierConflict)> ConflictSink for F {
    fn report(&mut self, conflict: VerifierConflict) {
        self(conflict)
    }
}

/// Builds the full canonical automaton for `grammar` and reports every state/lookahead pair
/// with more than one candidate action to `sink`. This mirrors what the lazy driver would
/// eventually discover one state at a time, but eagerly and exhaustively, so a grammar can
/// be checked for ambiguity before it is ever used to parse anything.
///
/// `precedence` resolves conflicts with the same policy [`crate::Parser`] uses at runtime:
/// the action the runtime driver would pick is reported first in each conflict's action
/// list. Every conflict found is still reported, including ones the policy fully resolves --
/// `verify` surfaces ambiguity in the grammar itself, independent of whether the runtime
/// would go on to handle it deterministically.
pub fn verify(
    grammar: &Grammar,
    precedence: &PrecedenceMap,
    sink: &mut dyn ConflictSink,
) -> Result<(), crate::error::GrammarError> {
    let (working_grammar, augmented_production) = augment(grammar)?;
    let precedence = precedence.complete(&working_grammar);
    let first_sets = FirstSets::compute(&working_grammar);
    let follow = follow_sets(&working_grammar, &first_sets);
    let states = build_lr0_automaton(&working_grammar, &augmented_production);

    let mut candidates: HashMap<(usize, Terminal), Vec<VerifierAction>> = HashMap::new();

    for (state_index, state) in states.iter().enumerate() {
        for item in &state.items {
            if item.is_complete() {
                if item.production == augmented_production {
                    candidates
                        .entry((state_index, Terminal::eof()))
                        .or_default()
                        .push(VerifierAction::Accept);
                } else {
                    let follow_set = follow.get(item.production.head()).cloned().unwrap_or_default();
                    for terminal in follow_set {
                        candidates
                            .entry((state_index, terminal))
                            .or_default()
                            .push(VerifierAction::Reduce(item.production.clone()));
                    }
                }
            } else if let Some(Symbol::Terminal(t)) = item.next_symbol() {
                if let Some(&target) = state.transitions.get(&Symbol::Terminal(t.clone())) {
                    candidates
                        .entry((state_index, t.clone()))
                        .or_default()
                        .push(VerifierAction::Shift(target));
                }
            }
        }
    }

    for ((state_index, terminal), mut actions) in candidates {
        if actions.len() < 2 {
            continue;
        }
        let winner = preferred_action(
            &working_grammar,
            &precedence,
            &augmented_production,
            &terminal,
            &actions,
        );
        actions.sort_by_key(|a| {
            let is_winner = winner.as_ref().map_or(false, |w| action_matches(w, a));
            let tie_break = match a {
                VerifierAction::Shift(s) => (1u8, *s),
                VerifierAction::Reduce(p) => (2u8, working_grammar.index_of(p)),
                VerifierAction::Accept => (0u8, 0usize),
            };
            (!is_winner, tie_break)
        });
        log::warn!(
            "conflict in state {} on '{}' ({} candidate actions)",
            state_index,
            terminal,
            actions.len()
        );
        sink.report(VerifierConflict {
            state: state_index,
            terminal,
            actions,
        });
    }

    Ok(())
}
