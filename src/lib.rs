//! A library for constructing and running LR(1)/LALR(1) parsers lazily: states, GOTO
//! transitions and parser actions are discovered as a parse visits them, rather than
//! compiled up front into an offline table.
//!
//! Build a [`Grammar`] from [`Production`]s, optionally attach a [`PrecedenceMap`] to
//! resolve shift/reduce and reduce/reduce conflicts, and construct a [`Parser`] from the
//! two. Drive a parse with an [`Evaluator`] to get back a value, or with a [`Listener`] to
//! just observe the shift/reduce event stream. Use [`verify`] to check a grammar for
//! conflicts ahead of time.

mod action;
mod closure;
mod driver;
mod error;
mod first;
mod grammar;
mod item;
mod production;
mod state;
mod symbol;
mod verifier;

pub use action::Action;
pub use driver::{Evaluator, Listener, Parser};
pub use error::{GrammarError, InternalError, ParseError};
pub use first::FirstSets;
pub use grammar::{Associativity, Grammar, Precedence, PrecedenceMap};
pub use item::Item;
pub use production::Production;
pub use state::State;
pub use symbol::{NonTerminal, Symbol, Terminal};
pub use verifier::{verify, ConflictSink, VerifierAction, VerifierConflict};
