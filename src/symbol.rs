//! Grammar symbols: terminals, non-terminals, and the sentinels the engine relies on.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::error::GrammarError;

const EOF_NAME: &str = "$end";
const EPSILON_NAME: &str = "$epsilon";
const ERROR_NAME: &str = "$error";

struct TerminalData {
    name: Box<str>,
    value: Option<String>,
}

/// A terminal symbol, identified by name. Equality and hashing consider only the name --
/// the `value` is carried so a `Terminal` can double as a concrete token instance (the
/// text matched by a lexer) without the engine caring about it during grammar analysis.
#[derive(Clone)]
pub struct Terminal(Rc<TerminalData>);

impl Terminal {
    /// Construct a grammar terminal with no matched text.
    pub fn new(name: impl Into<String>) -> Result<Self, GrammarError> {
        let name = name.into();
        if name.is_empty() {
            return Err(GrammarError::EmptyName);
        }
        Ok(Self(Rc::new(TerminalData {
            name: name.into_boxed_str(),
            value: None,
        })))
    }

    /// Construct a token instance: a terminal together with the text a lexer matched for it.
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Result<Self, GrammarError> {
        let name = name.into();
        if name.is_empty() {
            return Err(GrammarError::EmptyName);
        }
        Ok(Self(Rc::new(TerminalData {
            name: name.into_boxed_str(),
            value: Some(value.into()),
        })))
    }

    /// The end-of-input sentinel. Every parse is implicitly terminated by one.
    pub fn eof() -> Self {
        Self(Rc::new(TerminalData {
            name: EOF_NAME.into(),
            value: None,
        }))
    }

    /// The marker used only inside FIRST sets to signal nullability. Never appears in a
    /// production body or an input stream.
    pub fn epsilon() -> Self {
        Self(Rc::new(TerminalData {
            name: EPSILON_NAME.into(),
            value: None,
        }))
    }

    /// The sentinel a lexer may report in place of a real terminal to signal a lexical error.
    pub fn error() -> Self {
        Self(Rc::new(TerminalData {
            name: ERROR_NAME.into(),
            value: None,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn value(&self) -> Option<&str> {
        self.0.value.as_deref()
    }

    pub fn is_eof(&self) -> bool {
        self.0.name.as_ref() == EOF_NAME
    }

    pub fn is_epsilon(&self) -> bool {
        self.0.name.as_ref() == EPSILON_NAME
    }
}

impl fmt::Debug for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(v) => write!(f, "Terminal({:?}, {:?})", self.name(), v),
            None => write!(f, "Terminal({:?})", self.name()),
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(v) if !v.is_empty() => write!(f, "{}({})", self.name(), v),
            _ => write!(f, "{}", self.name()),
        }
    }
}

impl PartialEq for Terminal {
    fn eq(&self, other: &Self) -> bool {
        self.0.name == other.0.name
    }
}

impl Eq for Terminal {}

impl Hash for Terminal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl PartialOrd for Terminal {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Terminal {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.name.cmp(&other.0.name)
    }
}

/// A non-terminal symbol, identified by name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonTerminal(Rc<str>);

impl NonTerminal {
    pub fn new(name: impl Into<String>) -> Result<Self, GrammarError> {
        let name = name.into();
        if name.is_empty() {
            return Err(GrammarError::EmptyName);
        }
        Ok(Self(Rc::from(name)))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub(crate) fn fresh_from(base: &NonTerminal) -> Self {
        Self(Rc::from(format!("{}'", base.name())))
    }
}

impl fmt::Debug for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NonTerminal({:?})", self.name())
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<&str> for NonTerminal {
    fn from(name: &str) -> Self {
        Self(Rc::from(name))
    }
}

/// A grammar symbol: either a terminal or a non-terminal.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    Terminal(Terminal),
    NonTerminal(NonTerminal),
}

impl Symbol {
    pub fn as_terminal(&self) -> Option<&Terminal> {
        match self {
            Symbol::Terminal(t) => Some(t),
            Symbol::NonTerminal(_) => None,
        }
    }

    pub fn as_non_terminal(&self) -> Option<&NonTerminal> {
        match self {
            Symbol::NonTerminal(n) => Some(n),
            Symbol::Terminal(_) => None,
        }
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(t) => write!(f, "{:?}", t),
            Symbol::NonTerminal(n) => write!(f, "{:?}", n),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(t) => write!(f, "{}", t),
            Symbol::NonTerminal(n) => write!(f, "{}", n),
        }
    }
}

impl From<Terminal> for Symbol {
    fn from(t: Terminal) -> Self {
        Symbol::Terminal(t)
    }
}

impl From<NonTerminal> for Symbol {
    fn from(n: NonTerminal) -> Self {
        Symbol::NonTerminal(n)
    }
}

// Ordering only exists so item sets can be stored in BTreeSet/BTreeMap for deterministic
// canonicalization; terminals sort before non-terminals, each group sorted by name.
impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering::*;
        match (self, other) {
            (Symbol::Terminal(a), Symbol::Terminal(b)) => a.cmp(b),
            (Symbol::NonTerminal(a), Symbol::NonTerminal(b)) => a.cmp(b),
            (Symbol::Terminal(_), Symbol::NonTerminal(_)) => Less,
            (Symbol::NonTerminal(_), Symbol::Terminal(_)) => Greater,
        }
    }
}
