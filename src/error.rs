//! Error taxonomy: grammar construction failures, engine-internal invariant violations,
//! and the errors surfaced by a parse.

use thiserror::Error;

use crate::symbol::{NonTerminal, Terminal};

/// Failures detected while building a [`crate::Grammar`] or completing a precedence table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("symbol name must not be empty")]
    EmptyName,

    #[error("start symbol '{0}' is not the head of any production")]
    UndefinedStart(String),

    #[error("production body contains the epsilon marker, which may only appear in FIRST sets")]
    EpsilonInBody,

    #[error("precedence level must be non-negative, got {0}")]
    NegativePrecedence(i64),
}

/// An engine invariant was violated. Seeing one of these means the driver's own bookkeeping
/// is inconsistent with the grammar it was built from -- it is never the fault of the input
/// being parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InternalError {
    #[error("state stack underflow during reduction")]
    StackUnderflow,

    #[error("no GOTO transition from state {state} on non-terminal '{nonterminal}'")]
    MissingGoto { state: usize, nonterminal: NonTerminal },
}

/// The outcome of a failed [`crate::Parser::parse`] or [`crate::Parser::parse_events`] call.
///
/// `E` is the error type of the caller's [`crate::Evaluator`]; it is `Infallible` for
/// [`crate::Listener`]-driven parses.
#[derive(Debug, Error)]
pub enum ParseError<E> {
    #[error("unexpected token '{terminal}' in state {state}")]
    Syntax { terminal: Terminal, state: usize },

    #[error("evaluator rejected a reduction: {0}")]
    Evaluator(E),

    #[error("internal parser error: {0}")]
    Internal(#[from] InternalError),
}

impl<E: Clone> Clone for ParseError<E> {
    fn clone(&self) -> Self {
        match self {
            ParseError::Syntax { terminal, state } => ParseError::Syntax {
                terminal: terminal.clone(),
                state: *state,
            },
            ParseError::Evaluator(e) => ParseError::Evaluator(e.clone()),
            ParseError::Internal(e) => ParseError::Internal(e.clone()),
        }
    }
}

impl<E: PartialEq> PartialEq for ParseError<E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                ParseError::Syntax { terminal: t1, state: s1 },
                ParseError::Syntax { terminal: t2, state: s2 },
            ) => t1 == t2 && s1 == s2,
            (ParseError::Evaluator(a), ParseError::Evaluator(b)) => a == b,
            (ParseError::Internal(a), ParseError::Internal(b)) => a == b,
            _ => false,
        }
    }
}

