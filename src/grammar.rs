//! Grammar definition: productions, precedence, and the augmented start symbol used
//! internally to drive an LR automaton to acceptance.

use std::collections::HashMap;
use std::fmt;

use crate::error::GrammarError;
use crate::production::Production;
use crate::symbol::{NonTerminal, Symbol, Terminal};

/// A context-free grammar: a start symbol together with the productions that define it.
pub struct Grammar {
    start: NonTerminal,
    productions: Vec<Production>,
    by_head: HashMap<NonTerminal, Vec<Production>>,
    index: HashMap<Production, usize>,
}

impl Grammar {
    pub fn new(start: NonTerminal, productions: Vec<Production>) -> Result<Self, GrammarError> {
        if !productions.iter().any(|p| p.head() == &start) {
            return Err(GrammarError::UndefinedStart(start.name().to_string()));
        }

        let mut by_head: HashMap<NonTerminal, Vec<Production>> = HashMap::new();
        let mut index = HashMap::new();
        for (i, production) in productions.iter().enumerate() {
            by_head
                .entry(production.head().clone())
                .or_default()
                .push(production.clone());
            index.insert(production.clone(), i);
        }

        Ok(Self {
            start,
            productions,
            by_head,
            index,
        })
    }

    pub fn start(&self) -> &NonTerminal {
        &self.start
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Productions headed by `non_terminal`, in declaration order. Empty if `non_terminal`
    /// never appears as a head (including non-terminals that only occur in a body).
    pub fn productions_for(&self, non_terminal: &NonTerminal) -> &[Production] {
        self.by_head
            .get(non_terminal)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Declaration order of `production`, used to break reduce/reduce ties deterministically.
    pub(crate) fn index_of(&self, production: &Production) -> usize {
        self.index.get(production).copied().unwrap_or(usize::MAX)
    }
}

/// Builds the augmented grammar `S' -> S` that the driver and the verifier both reason
/// about. `S'` is a fresh non-terminal, guaranteed not to collide with any non-terminal the
/// caller already declared as long as the caller doesn't itself mint symbols ending in `'`
/// chained off the start symbol's name.
pub(crate) fn augment(grammar: &Grammar) -> Result<(Grammar, Production), GrammarError> {
    let augmented_start = NonTerminal::fresh_from(grammar.start());
    let augmented_production = Production::new(
        augmented_start.clone(),
        vec![Symbol::NonTerminal(grammar.start().clone())],
    )?;

    let mut productions = Vec::with_capacity(grammar.productions().len() + 1);
    productions.push(augmented_production.clone());
    productions.extend(grammar.productions().iter().cloned());

    let augmented_grammar = Grammar::new(augmented_start, productions)?;
    Ok((augmented_grammar, augmented_production))
}

/// Associativity of an operator, used to break shift/reduce ties at equal precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// A precedence level paired with the associativity used to break ties within that level.
/// Higher `level` binds tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precedence {
    level: u32,
    associativity: Associativity,
}

impl Precedence {
    pub fn new(level: i64, associativity: Associativity) -> Result<Self, GrammarError> {
        if level < 0 {
            return Err(GrammarError::NegativePrecedence(level));
        }
        Ok(Self {
            level: level as u32,
            associativity,
        })
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn associativity(&self) -> Associativity {
        self.associativity
    }
}

impl Default for Precedence {
    fn default() -> Self {
        Self {
            level: 0,
            associativity: Associativity::Left,
        }
    }
}

/// Either side of a precedence declaration: a terminal (for shift/reduce ties against a
/// lookahead) or a production (for reduce/reduce ties and for deciding a rule's own level
/// when it isn't declared directly).
#[derive(Clone, PartialEq, Eq, Hash)]
enum PrecedenceEntity {
    Terminal(Terminal),
    Production(Production),
}

/// Assigns precedence to terminals and productions. A map is built incrementally with
/// [`PrecedenceMap::set_terminal`] and [`PrecedenceMap::set_production`], then completed
/// against a grammar with [`PrecedenceMap::complete`] before it is used to build a parser.
#[derive(Clone, Default)]
pub struct PrecedenceMap(HashMap<PrecedenceEntity, Precedence>);

impl PrecedenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_terminal(&mut self, terminal: Terminal, precedence: Precedence) -> &mut Self {
        self.0.insert(PrecedenceEntity::Terminal(terminal), precedence);
        self
    }

    pub fn set_production(&mut self, production: Production, precedence: Precedence) -> &mut Self {
        self.0
            .insert(PrecedenceEntity::Production(production), precedence);
        self
    }

    pub fn terminal(&self, terminal: &Terminal) -> Option<Precedence> {
        self.0
            .get(&PrecedenceEntity::Terminal(terminal.clone()))
            .copied()
    }

    pub fn production(&self, production: &Production) -> Option<Precedence> {
        self.0
            .get(&PrecedenceEntity::Production(production.clone()))
            .copied()
    }

    /// Derives a precedence for every production in `grammar` that wasn't given one
    /// explicitly: a production inherits the precedence of the rightmost terminal in its
    /// body, or falls back to level 0, left-associative, if its body has no terminal (or
    /// that terminal itself has no declared precedence).
    pub(crate) fn complete(&self, grammar: &Grammar) -> PrecedenceMap {
        let mut completed = self.clone();
        for production in grammar.productions() {
            if completed.production(production).is_some() {
                continue;
            }
            let inherited = production
                .body()
                .iter()
                .rev()
                .find_map(|s| s.as_terminal())
                .and_then(|t| completed.terminal(t))
                .unwrap_or_default();
            completed.set_production(production.clone(), inherited);
        }
        completed
    }
}

impl fmt::Debug for PrecedenceEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrecedenceEntity::Terminal(t) => write!(f, "{}", t),
            PrecedenceEntity::Production(p) => write!(f, "{}", p),
        }
    }
}
