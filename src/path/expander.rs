use crate::core::env::EnvError;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct PathExpander;

impl Default for PathExpander {
    fn default() -> Self {
        Self::new()
    }
}

impl PathExpander {
    pub fn new() -> Self {
        Self
    }

    pub fn expand(&self, path: &str) -> Result<PathBuf, EnvError> {
        if path.starts_with('~') {
            self.expand_tilde(path)
        } else {
            Ok(Path::new(path).to_path_buf())
        }
    }

    /// Expands `~` and anchors relative paths at `base`.
    pub fn resolve(&self, path: &str, base: &Path) -> Result<PathBuf, EnvError> {
        let expanded = self.expand(path)?;
        if expanded.is_absolute() {
            Ok(expanded)
        } else {
            Ok(base.join(expanded))
        }
    }

    fn expand_tilde(&self, path: &str) -> Result<PathBuf, EnvError> {
        if path.len() == 1 {
            return self.home_dir();
        }

        let without_tilde = &path[1..];
        match without_tilde.strip_prefix('/') {
            Some(stripped) => {
                let mut home_path = self.home_dir()?;
                for part in stripped.split('/').filter(|part| !part.is_empty()) {
                    home_path.push(part);
                }
                Ok(home_path)
            }
            // "~user" is left alone
            None => Ok(Path::new(path).to_path_buf()),
        }
    }

    pub fn home_dir(&self) -> Result<PathBuf, EnvError> {
        dirs::home_dir().ok_or(EnvError::HomeDirNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_plain_path() {
        let expander = PathExpander::new();
        assert_eq!(expander.expand("src/lib.rs").unwrap(), PathBuf::from("src/lib.rs"));
    }

    #[test]
    fn test_expand_home() {
        let expander = PathExpander::new();
        let home = dirs::home_dir().unwrap();
        assert_eq!(expander.expand("~").unwrap(), home);
        assert_eq!(expander.expand("~/a/b").unwrap(), home.join("a").join("b"));
    }

    #[test]
    fn test_other_user_untouched() {
        let expander = PathExpander::new();
        assert_eq!(expander.expand("~root/x").unwrap(), PathBuf::from("~root/x"));
    }

    #[test]
    fn test_resolve_relative() {
        let expander = PathExpander::new();
        let base = Path::new("/var");
        assert_eq!(expander.resolve("log", base).unwrap(), PathBuf::from("/var/log"));
        assert_eq!(expander.resolve("/etc", base).unwrap(), PathBuf::from("/etc"));
    }
}
