//! The parser engine: lazy canonical-state construction, the shift/reduce driver loop, and
//! the evaluator/listener duality it exposes to callers.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};
use std::convert::Infallible;

use crate::action::{Action, ActionResolver};
use crate::closure::{closure, goto_kernel};
use crate::error::{InternalError, ParseError};
use crate::first::FirstSets;
use crate::grammar::{augment, Grammar, PrecedenceMap};
use crate::item::Item;
use crate::production::Production;
use crate::state::State;
use crate::symbol::{Symbol, Terminal};

/// Receives the final value of a reduction or a shifted terminal, and builds up whatever
/// representation the caller wants out of a parse (an AST, a number, a side effect).
pub trait Evaluator<V> {
    type Error;

    /// Called when `terminal` is shifted; the returned value is pushed onto the value stack.
    fn evaluate_terminal(&mut self, terminal: &Terminal) -> V;

    /// Called when `production` is reduced, with its right-hand side's values in order.
    /// Returning `Err` aborts the parse with [`crate::ParseError::Evaluator`].
    fn evaluate(&mut self, production: &Production, values: Vec<V>) -> Result<V, Self::Error>;
}

/// The low-level alternative to [`Evaluator`]: notified of every shift and reduce, without
/// being asked to produce or combine values. Useful for tracing a parse or building a
/// parse-tree representation the driver itself knows nothing about.
pub trait Listener {
    fn on_shift(&mut self, terminal: &Terminal);
    fn on_reduce(&mut self, production: &Production);
}

struct ListenerAdapter<'a, L>(&'a mut L);

impl<'a, L: Listener> Evaluator<()> for ListenerAdapter<'a, L> {
    type Error = Infallible;

    fn evaluate_terminal(&mut self, terminal: &Terminal) {
        self.0.on_shift(terminal);
    }

    fn evaluate(&mut self, production: &Production, _values: Vec<()>) -> Result<(), Infallible> {
        self.0.on_reduce(production);
        Ok(())
    }
}

/// A lazily-built LR(1) parser for one grammar and precedence table.
///
/// States and transitions are discovered on demand the first time a parse visits them and
/// memoized for the lifetime of the `Parser`; nothing is precomputed at construction beyond
/// the single initial state.
pub struct Parser {
    working_grammar: Grammar,
    augmented_production: Production,
    first_sets: FirstSets,
    precedence: PrecedenceMap,
    initial_state: State,
    next_state_id: Cell<usize>,
    canonical_states: RefCell<HashMap<BTreeSet<Item>, State>>,
    goto_cache: RefCell<HashMap<(usize, Symbol), Option<State>>>,
    action_cache: RefCell<HashMap<(usize, Terminal), Option<Action>>>,
}

impl Parser {
    pub fn new(grammar: Grammar, precedence: PrecedenceMap) -> Result<Self, crate::error::GrammarError> {
        let (working_grammar, augmented_production) = augment(&grammar)?;
        let precedence = precedence.complete(&working_grammar);
        let first_sets = FirstSets::compute(&working_grammar);

        let initial_kernel: BTreeSet<Item> =
            std::iter::once(Item::new(augmented_production.clone(), 0, Terminal::eof())).collect();
        let initial_items = closure(&working_grammar, &first_sets, initial_kernel);
        let initial_state = State::new(0, initial_items.clone());

        let mut canonical_states = HashMap::new();
        canonical_states.insert(initial_items, initial_state.clone());

        log::debug!("parser initialized, state 0 has {} items", initial_state.items().len());

        Ok(Self {
            working_grammar,
            augmented_production,
            first_sets,
            precedence,
            initial_state,
            next_state_id: Cell::new(1),
            canonical_states: RefCell::new(canonical_states),
            goto_cache: RefCell::new(HashMap::new()),
            action_cache: RefCell::new(HashMap::new()),
        })
    }

    pub fn initial_state(&self) -> &State {
        &self.initial_state
    }

    fn canonicalize(&self, items: BTreeSet<Item>) -> State {
        if let Some(existing) = self.canonical_states.borrow().get(&items) {
            return existing.clone();
        }
        let id = self.next_state_id.get();
        self.next_state_id.set(id + 1);
        let state = State::new(id, items.clone());
        self.canonical_states.borrow_mut().insert(items, state.clone());
        log::debug!("discovered canonical state {}", id);
        state
    }

    fn goto(&self, state: &State, symbol: &Symbol) -> Option<State> {
        let key = (state.id(), symbol.clone());
        if let Some(cached) = self.goto_cache.borrow().get(&key) {
            return cached.clone();
        }
        let kernel = goto_kernel(state.items(), symbol);
        let result = if kernel.is_empty() {
            None
        } else {
            let closed = closure(&self.working_grammar, &self.first_sets, kernel);
            Some(self.canonicalize(closed))
        };
        self.goto_cache.borrow_mut().insert(key, result.clone());
        result
    }

    fn action(&self, state: &State, lookahead: &Terminal) -> Option<Action> {
        let key = (state.id(), lookahead.clone());
        if let Some(cached) = self.action_cache.borrow().get(&key) {
            return cached.clone();
        }
        let shift_target = self.goto(state, &Symbol::Terminal(lookahead.clone()));
        let resolver = ActionResolver {
            grammar: &self.working_grammar,
            precedence: &self.precedence,
        };
        let action = resolver.resolve(state, lookahead, shift_target);
        self.action_cache.borrow_mut().insert(key, action.clone());
        action
    }

    /// Runs a parse over `tokens`, producing a `V` via `evaluator`'s shift/reduce
    /// callbacks. An end-of-input terminal is appended automatically if `tokens` doesn't
    /// supply one.
    pub fn parse<V, Ev>(
        &self,
        tokens: impl IntoIterator<Item = Terminal>,
        evaluator: &mut Ev,
    ) -> Result<V, ParseError<Ev::Error>>
    where
        Ev: Evaluator<V>,
    {
        self.run(tokens, evaluator)
    }

    /// Runs a parse purely for its shift/reduce event stream, discarding values.
    pub fn parse_events<L: Listener>(
        &self,
        tokens: impl IntoIterator<Item = Terminal>,
        listener: &mut L,
    ) -> Result<(), ParseError<Infallible>> {
        let mut adapter = ListenerAdapter(listener);
        self.run(tokens, &mut adapter)
    }

    fn run<V, Ev>(
        &self,
        tokens: impl IntoIterator<Item = Terminal>,
        evaluator: &mut Ev,
    ) -> Result<V, ParseError<Ev::Error>>
    where
        Ev: Evaluator<V>,
    {
        let mut tokens = tokens.into_iter().chain(std::iter::once(Terminal::eof()));
        let mut state_stack: Vec<State> = vec![self.initial_state.clone()];
        let mut value_stack: Vec<V> = Vec::new();
        let mut current = tokens.next().unwrap_or_else(Terminal::eof);

        loop {
            let top = state_stack
                .last()
                .cloned()
                .ok_or(InternalError::StackUnderflow)?;

            match self.action(&top, &current) {
                Some(Action::Shift(next)) => {
                    log::trace!("shift {} -> state {}", current, next.id());
                    let value = evaluator.evaluate_terminal(&current);
                    value_stack.push(value);
                    state_stack.push(next);
                    current = tokens.next().unwrap_or_else(Terminal::eof);
                }
                Some(Action::Reduce(production)) => {
                    log::trace!("reduce {}", production);
                    let arity = production.body().len();

                    let value_split = value_stack
                        .len()
                        .checked_sub(arity)
                        .ok_or(InternalError::StackUnderflow)?;
                    let args = value_stack.split_off(value_split);
                    let value = evaluator
                        .evaluate(&production, args)
                        .map_err(ParseError::Evaluator)?;

                    let state_split = state_stack
                        .len()
                        .checked_sub(arity)
                        .ok_or(InternalError::StackUnderflow)?;
                    state_stack.truncate(state_split);

                    if production == self.augmented_production {
                        log::debug!("accept");
                        return Ok(value);
                    }

                    let goto_from = state_stack.last().ok_or(InternalError::StackUnderflow)?;
                    let goto_state = self
                        .goto(goto_from, &Symbol::NonTerminal(production.head().clone()))
                        .ok_or_else(|| InternalError::MissingGoto {
                            state: goto_from.id(),
                            nonterminal: production.head().clone(),
                        })?;
                    state_stack.push(goto_state);
                    value_stack.push(value);
                }
                None => {
                    return Err(ParseError::Syntax {
                        terminal: current,
                        state: top.id(),
                    });
                }
            }
        }
    }
}
