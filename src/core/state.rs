use std::collections::BTreeMap;
use std::env;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::env::{EnvError, EnvOverlay};
use crate::parse::VarLookup;
use crate::path::PathExpander;

/// A mutation requested by a built-in and applied by the executor once the
/// built-in has returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    ChangeDir(PathBuf),
    SetVars(Vec<(String, String)>),
    UnsetVars(Vec<String>),
    SetAliases(Vec<(String, String)>),
    RequestExit(i32),
}

/// Per-shell mutable state: working directory, variable overlay and aliases.
#[derive(Debug, Clone)]
pub struct ShellState {
    current_dir: PathBuf,
    env: EnvOverlay,
    aliases: BTreeMap<String, String>,
    exit_request: Option<i32>,
    path_expander: PathExpander,
}

impl ShellState {
    /// Starts in the process's working directory.
    pub fn from_process() -> io::Result<Self> {
        Self::with_dir(env::current_dir()?)
    }

    pub fn with_dir(dir: impl AsRef<Path>) -> io::Result<Self> {
        let current_dir = dir.as_ref().canonicalize()?;
        if !current_dir.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", current_dir.display()),
            ));
        }

        Ok(Self {
            current_dir,
            env: EnvOverlay::new(),
            aliases: BTreeMap::new(),
            exit_request: None,
            path_expander: PathExpander::new(),
        })
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn env(&self) -> &EnvOverlay {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut EnvOverlay {
        &mut self.env
    }

    pub fn var(&self, name: &str) -> Option<String> {
        self.env.get(name).map(|value| value.into_owned())
    }

    pub fn alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn set_alias(&mut self, name: &str, value: &str) {
        self.aliases.insert(name.to_string(), value.to_string());
    }

    pub fn exit_request(&self) -> Option<i32> {
        self.exit_request
    }

    /// Expands `~` and anchors relative paths at the working directory.
    pub fn resolve_path(&self, path: &str) -> Result<PathBuf, EnvError> {
        self.path_expander.resolve(path, &self.current_dir)
    }

    /// Switches directory only if the target is an existing directory.
    pub fn set_current_dir(&mut self, dir: &Path) -> Result<(), EnvError> {
        let resolved = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.current_dir.join(dir)
        };

        match resolved.canonicalize() {
            Ok(canonical) if canonical.is_dir() => {
                self.current_dir = canonical;
                Ok(())
            }
            _ => Err(EnvError::InvalidPath(resolved)),
        }
    }

    pub fn apply(&mut self, change: StateChange) -> Result<(), EnvError> {
        match change {
            StateChange::ChangeDir(dir) => self.set_current_dir(&dir),
            StateChange::SetVars(vars) => {
                for (name, value) in vars {
                    self.env.set(&name, &value)?;
                }
                Ok(())
            }
            StateChange::UnsetVars(names) => {
                for name in names {
                    self.env.unset(&name)?;
                }
                Ok(())
            }
            StateChange::SetAliases(aliases) => {
                for (name, value) in aliases {
                    self.set_alias(&name, &value);
                }
                Ok(())
            }
            StateChange::RequestExit(code) => {
                self.exit_request = Some(code);
                Ok(())
            }
        }
    }
}

impl VarLookup for ShellState {
    fn lookup(&self, name: &str) -> Option<String> {
        self.var(name)
    }
}
