//! Turning a raw command line into a [`Pipeline`].
//!
//! Two passes: [`tokenize`] splits the line into words and operators while
//! honouring quotes and escapes, then [`parse`] groups the tokens into stages
//! and pulls out the output redirection.

mod pipeline;
mod tokenize;

pub use pipeline::{parse, Pipeline, RedirectMode, Redirection, Stage};
pub use tokenize::{
    tokenize, tokenize_with, transition, Action, Resume, State, Token, VarLookup,
};

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnterminatedQuote(char),
    EmptyPipeline,
    EmptyStage { index: usize },
    MissingRedirectTarget,
    RedirectNotFinal { stage: usize },
    MalformedRedirection,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnterminatedQuote(quote) => write!(f, "unterminated {} quote", quote),
            ParseError::EmptyPipeline => write!(f, "empty pipeline"),
            ParseError::EmptyStage { index } => write!(f, "empty stage at position {}", index),
            ParseError::MissingRedirectTarget => write!(f, "redirection is missing a target"),
            ParseError::RedirectNotFinal { stage } => {
                write!(f, "redirection in stage {} is not at the end of the pipeline", stage)
            }
            ParseError::MalformedRedirection => {
                write!(f, "redirection must be followed by exactly one path")
            }
        }
    }
}

impl std::error::Error for ParseError {}
