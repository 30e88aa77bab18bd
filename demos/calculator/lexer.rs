//! Lexer for tokenizing calculator expressions into lazylr terminals.

use lazylr::Terminal;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexError {
    #[error("unexpected character '{char}' at {line}:{column}")]
    UnexpectedChar { char: char, line: usize, column: usize },

    #[error("invalid number '{lexeme}' at {line}:{column}")]
    InvalidNumber {
        lexeme: String,
        line: usize,
        column: usize,
    },
}

/// Lexer for tokenizing input strings into the terminals the calculator grammar expects:
/// `NUM`, `+`, `-`, `*`, `/`, `(`, `)`.
pub struct Lexer {
    input: Vec<char>,
    current: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            current: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Terminal>, LexError> {
        let mut tokens = Vec::new();
        while !self.is_at_end() {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }
            tokens.push(self.next_token()?);
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Terminal, LexError> {
        let start_column = self.column;
        let ch = self.advance();

        let name = match ch {
            '+' => "+",
            '-' => "-",
            '*' => "*",
            '/' => "/",
            '(' => "(",
            ')' => ")",
            '0'..='9' => return self.number(start_column),
            _ => {
                return Err(LexError::UnexpectedChar {
                    char: ch,
                    line: self.line,
                    column: start_column,
                })
            }
        };

        Ok(Terminal::with_value(name, ch.to_string()).expect("reserved terminal names are non-empty"))
    }

    fn number(&mut self, start_column: usize) -> Result<Terminal, LexError> {
        let start = self.current - 1;

        while self.peek().map_or(false, |ch| ch.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') && self.peek_next().map_or(false, |ch| ch.is_ascii_digit()) {
            self.advance();
            while self.peek().map_or(false, |ch| ch.is_ascii_digit()) {
                self.advance();
            }
        }

        let lexeme: String = self.input[start..self.current].iter().collect();
        if lexeme.parse::<f64>().is_err() {
            return Err(LexError::InvalidNumber {
                lexeme,
                line: self.line,
                column: start_column,
            });
        }

        Ok(Terminal::with_value("NUM", lexeme).expect("reserved terminal names are non-empty"))
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '\n' => {
                    self.advance();
                    self.line += 1;
                    self.column = 1;
                }
                _ => break,
            }
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.current).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.input.get(self.current + 1).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.input[self.current];
        self.current += 1;
        self.column += 1;
        ch
    }
}
