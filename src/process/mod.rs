//! Running external programs found on the search path.

use std::fmt;
use std::time::Duration;

mod executor;
mod search;

pub use executor::{ProcessExecutor, ProcessOutput};
pub use search::{find_executable, resolve};

#[derive(Debug)]
pub enum ProcessError {
    CommandNotFound(String),
    Spawn {
        command: String,
        source: std::io::Error,
    },
    Io(std::io::Error),
    TimedOut {
        command: String,
        after: Duration,
    },
    Other(String),
}

impl ProcessError {
    /// Status a shell reports for this failure.
    pub fn status(&self) -> i32 {
        match self {
            ProcessError::CommandNotFound(_) => 127,
            ProcessError::Spawn { .. } => 126,
            ProcessError::TimedOut { .. } => 124,
            ProcessError::Io(_) | ProcessError::Other(_) => 1,
        }
    }
}

impl From<std::io::Error> for ProcessError {
    fn from(e: std::io::Error) -> Self {
        ProcessError::Io(e)
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::CommandNotFound(cmd) => write!(f, "{}: command not found", cmd),
            ProcessError::Spawn { command, source } => {
                write!(f, "{}: cannot execute: {}", command, source)
            }
            ProcessError::Io(e) => write!(f, "IO error: {}", e),
            ProcessError::TimedOut { command, after } => {
                write!(f, "{}: timed out after {:?}", command, after)
            }
            ProcessError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ProcessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProcessError::Spawn { source, .. } => Some(source),
            ProcessError::Io(e) => Some(e),
            _ => None,
        }
    }
}
