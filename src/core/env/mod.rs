mod vars;

pub use vars::{is_valid_name, EnvOverlay};

use std::path::PathBuf;

#[derive(Debug)]
pub enum EnvError {
    HomeDirNotFound,
    InvalidPath(PathBuf),
    InvalidValue(&'static str),
}

impl std::fmt::Display for EnvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvError::HomeDirNotFound => write!(f, "Home directory not found"),
            EnvError::InvalidPath(path) => write!(f, "Invalid path: {}", path.display()),
            EnvError::InvalidValue(val) => write!(f, "Invalid value: {}", val),
        }
    }
}

impl std::error::Error for EnvError {}
