//! A small command-line shell engine: quoting-aware tokenizing, pipelines of
//! built-in and external commands, output redirection, and persistent
//! history. [`Shell`] is the entry point; it never writes to the console.

pub mod config;
pub mod core;
pub mod error;
pub mod flags;
pub mod highlight;
pub mod history;
pub mod logging;
pub mod parse;
pub mod path;
pub mod process;
pub mod shell;

pub use crate::config::Config;
pub use crate::core::state::{ShellState, StateChange};
pub use crate::history::{Direction, HistoryManager};
pub use crate::parse::{parse, tokenize, tokenize_with, ParseError, Pipeline, Token};
pub use crate::shell::{ExecError, ExecutionResult, Shell};
