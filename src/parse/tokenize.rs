use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

use super::ParseError;
use crate::core::env::is_valid_name;

/// A word or operator produced by the tokenizer.
///
/// `quoted` is set when any part of the word came from a quoted region or a
/// backslash escape. Operators (`|`, `>`, `>>`) only ever come from bare
/// characters, so a quoted `"|"` stays an ordinary argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    value: String,
    quoted: bool,
    operator: bool,
}

impl Token {
    pub fn word(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: false,
            operator: false,
        }
    }

    pub fn quoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: true,
            operator: false,
        }
    }

    pub fn operator(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: false,
            operator: true,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn into_value(self) -> String {
        self.value
    }

    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    pub fn is_operator(&self) -> bool {
        self.operator
    }

    pub fn is_pipe(&self) -> bool {
        self.operator && self.value == "|"
    }

    pub fn is_redirect(&self) -> bool {
        self.operator && (self.value == ">" || self.value == ">>")
    }
}

/// Source of values for `$NAME` expansion.
pub trait VarLookup {
    fn lookup(&self, name: &str) -> Option<String>;
}

impl VarLookup for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Where an escape returns to once the escaped character is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    Normal,
    DoubleQuote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Normal,
    SingleQuote,
    DoubleQuote,
    Escape(Resume),
}

impl From<Resume> for State {
    fn from(resume: Resume) -> Self {
        match resume {
            Resume::Normal => State::Normal,
            Resume::DoubleQuote => State::DoubleQuote,
        }
    }
}

/// What the driver should do with the character just consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Push(char),
    Escaped(char),
    OpenQuote,
    CloseQuote,
    Break,
    Operator(char),
    Variable,
    Skip,
}

/// One step of the scanner. Pure: the result depends only on the arguments.
pub fn transition(state: State, c: char) -> (State, Action) {
    match (state, c) {
        (State::Normal, '\'') => (State::SingleQuote, Action::OpenQuote),
        (State::Normal, '"') => (State::DoubleQuote, Action::OpenQuote),
        (State::Normal, '\\') => (State::Escape(Resume::Normal), Action::Skip),
        (State::Normal, '|' | '>') => (State::Normal, Action::Operator(c)),
        (State::Normal, '$') => (State::Normal, Action::Variable),
        (State::Normal, c) if c.is_whitespace() => (State::Normal, Action::Break),
        (State::Normal, c) => (State::Normal, Action::Push(c)),

        (State::SingleQuote, '\'') => (State::Normal, Action::CloseQuote),
        (State::SingleQuote, c) => (State::SingleQuote, Action::Push(c)),

        (State::DoubleQuote, '"') => (State::Normal, Action::CloseQuote),
        (State::DoubleQuote, '\\') => (State::Escape(Resume::DoubleQuote), Action::Skip),
        (State::DoubleQuote, '$') => (State::DoubleQuote, Action::Variable),
        (State::DoubleQuote, c) => (State::DoubleQuote, Action::Push(c)),

        (State::Escape(resume), c) => (resume.into(), Action::Escaped(c)),
    }
}

/// Splits a line into tokens without variable expansion.
pub fn tokenize(line: &str) -> Result<Vec<Token>, ParseError> {
    Tokenizer::new(line, None).run()
}

/// Splits a line into tokens, expanding `$NAME` and `${NAME}` outside
/// single quotes.
pub fn tokenize_with(line: &str, vars: &dyn VarLookup) -> Result<Vec<Token>, ParseError> {
    Tokenizer::new(line, Some(vars)).run()
}

struct Tokenizer<'a> {
    chars: Peekable<Chars<'a>>,
    vars: Option<&'a dyn VarLookup>,
    tokens: Vec<Token>,
    current: String,
    started: bool,
    quoted: bool,
}

impl<'a> Tokenizer<'a> {
    fn new(line: &'a str, vars: Option<&'a dyn VarLookup>) -> Self {
        Self {
            chars: line.chars().peekable(),
            vars,
            tokens: Vec::new(),
            current: String::new(),
            started: false,
            quoted: false,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, ParseError> {
        let mut state = State::Normal;

        while let Some(c) = self.chars.next() {
            let (next, action) = transition(state, c);
            match action {
                Action::Push(c) => self.push(c),
                Action::Escaped(c) => {
                    self.push(c);
                    self.quoted = true;
                }
                Action::OpenQuote | Action::CloseQuote => {
                    self.started = true;
                    self.quoted = true;
                }
                Action::Break => self.finish_word(),
                Action::Operator(op) => {
                    self.finish_word();
                    self.push_operator(op);
                }
                Action::Variable => self.expand_variable(),
                Action::Skip => {}
            }
            state = next;
        }

        match state {
            State::SingleQuote => Err(ParseError::UnterminatedQuote('\'')),
            State::DoubleQuote | State::Escape(Resume::DoubleQuote) => {
                Err(ParseError::UnterminatedQuote('"'))
            }
            // a dangling backslash is dropped
            State::Normal | State::Escape(Resume::Normal) => {
                self.finish_word();
                Ok(self.tokens)
            }
        }
    }

    fn push(&mut self, c: char) {
        self.current.push(c);
        self.started = true;
    }

    fn finish_word(&mut self) {
        if self.started {
            let value = std::mem::take(&mut self.current);
            self.tokens.push(Token {
                value,
                quoted: self.quoted,
                operator: false,
            });
        }
        self.started = false;
        self.quoted = false;
    }

    fn push_operator(&mut self, op: char) {
        if op == '>' && self.chars.peek() == Some(&'>') {
            self.chars.next();
            self.tokens.push(Token::operator(">>"));
        } else {
            self.tokens.push(Token::operator(op.to_string()));
        }
    }

    fn expand_variable(&mut self) {
        let Some(vars) = self.vars else {
            self.push('$');
            return;
        };

        match self.read_name() {
            Some(name) => {
                let value = vars.lookup(&name).unwrap_or_default();
                if !value.is_empty() {
                    self.current.push_str(&value);
                    self.started = true;
                }
            }
            None => self.push('$'),
        }
    }

    /// Consumes a variable name after `$`, or nothing if none follows.
    fn read_name(&mut self) -> Option<String> {
        if self.chars.peek() == Some(&'{') {
            let mut probe = self.chars.clone();
            probe.next();
            let mut name = String::new();
            loop {
                match probe.next() {
                    Some('}') => break,
                    Some(c) => name.push(c),
                    None => return None,
                }
            }
            if !is_valid_name(&name) {
                return None;
            }
            self.chars = probe;
            return Some(name);
        }

        match self.chars.peek() {
            Some(c) if c.is_ascii_alphabetic() || *c == '_' => {}
            _ => return None,
        }

        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }
            name.push(c);
            self.chars.next();
        }
        Some(name)
    }
}
