use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};

use crate::core::env::EnvError;
use crate::core::state::ShellState;

const HISTORY_FILE: &str = ".sluice_history";
const RC_FILE: &str = ".sluicerc";

#[derive(Debug)]
pub enum ConfigError {
    HomeDirNotFound,
    IoError(PathBuf, std::io::Error),
    InvalidLine { line: usize, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::HomeDirNotFound => write!(f, "Home directory not found"),
            ConfigError::IoError(path, e) => write!(f, "{}: {}", path.display(), e),
            ConfigError::InvalidLine { line, reason } => {
                write!(f, "rc file line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where the shell keeps its files, and how long an external stage may run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    history_path: PathBuf,
    rc_path: PathBuf,
    command_timeout: Option<Duration>,
}

impl Config {
    /// `HISTFILE` if set, otherwise files in the home directory.
    pub fn new() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
        let history_path = env::var_os("HISTFILE")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(HISTORY_FILE));

        Ok(Self::with_paths(history_path, home.join(RC_FILE)))
    }

    pub fn with_paths(history_path: impl Into<PathBuf>, rc_path: impl Into<PathBuf>) -> Self {
        Self {
            history_path: history_path.into(),
            rc_path: rc_path.into(),
            command_timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    pub fn rc_path(&self) -> &Path {
        &self.rc_path
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout
    }

    /// Applies the `export` and `alias` lines of the rc file to `state`.
    /// Returns how many lines took effect; a missing file applies nothing.
    pub fn load_rc(&self, state: &mut ShellState) -> Result<usize, ConfigError> {
        if !self.rc_path.exists() {
            debug!("no rc file at {}", self.rc_path.display());
            return Ok(0);
        }

        let content = fs::read_to_string(&self.rc_path)
            .map_err(|e| ConfigError::IoError(self.rc_path.clone(), e))?;

        let mut applied = 0;
        for (index, line) in content.lines().enumerate() {
            if self.process_line(line, state).map_err(|e| ConfigError::InvalidLine {
                line: index + 1,
                reason: e.to_string(),
            })? {
                applied += 1;
            }
        }

        info!("applied {} rc lines from {}", applied, self.rc_path.display());
        Ok(applied)
    }

    fn process_line(&self, line: &str, state: &mut ShellState) -> Result<bool, EnvError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(false);
        }

        if let Some(var_def) = line.strip_prefix("export ") {
            let Some((name, value)) = var_def.trim().split_once('=') else {
                return Ok(false);
            };
            let value = state.env().expand_value(strip_quotes(value)).into_owned();
            state.env_mut().set(name.trim(), &value)?;
            return Ok(true);
        }

        if let Some(alias_def) = line.strip_prefix("alias ") {
            let Some((name, value)) = alias_def.trim().split_once('=') else {
                return Ok(false);
            };
            state.set_alias(name.trim(), strip_quotes(value));
            return Ok(true);
        }

        debug!("ignoring rc line: {}", line);
        Ok(false)
    }
}

fn strip_quotes(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
