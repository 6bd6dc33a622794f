use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::parse::ParseError;

/// Why a line did not run cleanly. Every variant raised while executing
/// names the stage (zero-based) and the command it was running.
#[derive(Debug)]
pub enum ExecError {
    Parse(ParseError),
    NotFound {
        stage: usize,
        command: String,
        /// The file or directory a built-in could not find; `None` when the
        /// command itself does not exist.
        target: Option<String>,
    },
    Execution {
        stage: usize,
        command: String,
        message: String,
    },
    Io {
        stage: usize,
        command: String,
        path: PathBuf,
        source: io::Error,
    },
}

impl ExecError {
    pub fn stage(&self) -> Option<usize> {
        match self {
            ExecError::Parse(_) => None,
            ExecError::NotFound { stage, .. }
            | ExecError::Execution { stage, .. }
            | ExecError::Io { stage, .. } => Some(*stage),
        }
    }

    pub fn command(&self) -> Option<&str> {
        match self {
            ExecError::Parse(_) => None,
            ExecError::NotFound { command, .. }
            | ExecError::Execution { command, .. }
            | ExecError::Io { command, .. } => Some(command),
        }
    }
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::Parse(e) => write!(f, "parse error: {}", e),
            ExecError::NotFound {
                command,
                target: Some(target),
                ..
            } => write!(f, "{}: {}: No such file or directory", command, target),
            ExecError::NotFound { command, .. } => write!(f, "{}: command not found", command),
            ExecError::Execution { message, .. } => write!(f, "{}", message),
            ExecError::Io { path, source, .. } => write!(f, "{}: {}", path.display(), source),
        }
    }
}

impl std::error::Error for ExecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecError::Parse(e) => Some(e),
            ExecError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ParseError> for ExecError {
    fn from(e: ParseError) -> Self {
        ExecError::Parse(e)
    }
}

/// What one line produced: the final stage's output (unless redirected),
/// everything external stages wrote to stderr, and the pipeline status.
#[derive(Debug, Default)]
pub struct ExecutionResult {
    pub output: String,
    pub stderr: String,
    pub status: i32,
    pub error: Option<ExecError>,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.status == 0 && self.error.is_none()
    }

    pub(crate) fn parse_failure(error: ParseError) -> Self {
        Self {
            status: 2,
            error: Some(ExecError::Parse(error)),
            ..Self::default()
        }
    }
}
