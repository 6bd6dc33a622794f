use super::EnvError;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::env;

/// Shell-local variables layered over the process environment.
///
/// Nothing here touches the real process environment: values are handed to
/// child processes explicitly, so two shells never see each other's exports.
/// An unset name is kept as `None` so it also hides the inherited value.
#[derive(Clone, Debug, Default)]
pub struct EnvOverlay {
    vars: BTreeMap<Box<str>, Option<Box<str>>>,
}

impl EnvOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<(), EnvError> {
        if name.is_empty() {
            return Err(EnvError::InvalidValue("Empty variable name"));
        }
        if !is_valid_name(name) {
            return Err(EnvError::InvalidValue("Invalid variable name"));
        }

        let clean_value = if name == "PATH" {
            self.sanitize_path(value)?
        } else {
            value.to_string()
        };

        self.vars.insert(name.into(), Some(clean_value.into()));
        Ok(())
    }

    /// Hides `name` from lookups and from child processes. Returns whether
    /// it was visible before.
    pub fn unset(&mut self, name: &str) -> Result<bool, EnvError> {
        if !is_valid_name(name) {
            return Err(EnvError::InvalidValue("Invalid variable name"));
        }
        let was_visible = self.get(name).is_some();
        self.vars.insert(name.into(), None);
        Ok(was_visible)
    }

    /// Looks a name up locally first, then in the process environment.
    pub fn get(&self, name: &str) -> Option<Cow<'_, str>> {
        match self.vars.get(name) {
            Some(Some(value)) => Some(Cow::Borrowed(value.as_ref())),
            Some(None) => None,
            None => env::var(name).ok().map(Cow::Owned),
        }
    }

    /// Only the locally set variables, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_ref(), v)))
    }

    /// Names that were unset and must not be inherited.
    pub fn removed(&self) -> impl Iterator<Item = &str> {
        self.vars
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(k, _)| k.as_ref())
    }

    fn sanitize_path(&self, path: &str) -> Result<String, EnvError> {
        if path.is_empty() {
            return Err(EnvError::InvalidValue("Empty PATH value"));
        }

        let mut seen = HashSet::new();
        let unique_parts: Vec<_> = env::split_paths(path)
            .filter(|part| !part.as_os_str().is_empty())
            .filter(|part| seen.insert(part.clone()))
            .collect();

        env::join_paths(unique_parts)
            .map(|joined| joined.to_string_lossy().into_owned())
            .map_err(|_| EnvError::InvalidValue("Malformed PATH value"))
    }

    /// Substitutes `$HOME` and `$PATH`, the two names rc files lean on.
    pub fn expand_value<'a>(&self, value: &'a str) -> Cow<'a, str> {
        let mut result = Cow::Borrowed(value);

        for name in ["HOME", "PATH"] {
            let pattern = format!("${}", name);
            if result.contains(&pattern) {
                let replacement = self.get(name).map(|v| v.into_owned()).unwrap_or_default();
                result = Cow::Owned(result.replace(&pattern, &replacement));
            }
        }

        result
    }
}

pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() -> Result<(), EnvError> {
        let mut overlay = EnvOverlay::new();
        overlay.set("SLUICE_TEST_VAR", "test value")?;
        assert_eq!(overlay.get("SLUICE_TEST_VAR").as_deref(), Some("test value"));
        assert!(env::var("SLUICE_TEST_VAR").is_err());
        Ok(())
    }

    #[test]
    fn test_falls_back_to_process_env() {
        let overlay = EnvOverlay::new();
        let expected = env::var("PATH").ok();
        assert_eq!(overlay.get("PATH").map(|v| v.into_owned()), expected);
        assert_eq!(overlay.iter().count(), 0);
    }

    #[test]
    fn test_override_shadows_process_env() -> Result<(), EnvError> {
        let mut overlay = EnvOverlay::new();
        overlay.set("PATH", "/opt/bin")?;
        assert_eq!(overlay.get("PATH").as_deref(), Some("/opt/bin"));
        assert!(overlay.unset("PATH")?);
        assert_eq!(overlay.get("PATH"), None);
        assert_eq!(overlay.removed().collect::<Vec<_>>(), vec!["PATH"]);
        assert_eq!(overlay.iter().count(), 0);
        Ok(())
    }

    #[test]
    fn test_unset_then_set_again() -> Result<(), EnvError> {
        let mut overlay = EnvOverlay::new();
        assert!(!overlay.unset("SLUICE_NEVER_SET_VARIABLE")?);
        overlay.set("SLUICE_NEVER_SET_VARIABLE", "back")?;
        assert_eq!(overlay.get("SLUICE_NEVER_SET_VARIABLE").as_deref(), Some("back"));
        assert_eq!(overlay.removed().count(), 0);
        assert!(overlay.unset("1BAD").is_err());
        Ok(())
    }

    #[test]
    fn test_sanitize_path() -> Result<(), EnvError> {
        let overlay = EnvOverlay::new();
        let sanitized = overlay.sanitize_path("/usr/bin:/usr/local/bin:/usr/bin")?;
        assert_eq!(sanitized, "/usr/bin:/usr/local/bin");
        Ok(())
    }

    #[test]
    fn test_expand_value() -> Result<(), EnvError> {
        let mut overlay = EnvOverlay::new();
        overlay.set("HOME", "/home/test")?;
        overlay.set("PATH", "/usr/bin")?;
        assert_eq!(overlay.expand_value("$HOME/bin:$PATH"), "/home/test/bin:/usr/bin");
        assert!(matches!(overlay.expand_value("plain"), Cow::Borrowed(_)));
        Ok(())
    }

    #[test]
    fn test_invalid_var_name() {
        let mut overlay = EnvOverlay::new();
        assert!(overlay.set("", "value").is_err());
        assert!(overlay.set("1ABC", "value").is_err());
        assert!(overlay.set("A-B", "value").is_err());
    }
}
