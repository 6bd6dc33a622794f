use crate::error::ShellError;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Flags {
    flags: HashMap<String, Flag>,
}

#[derive(Debug, Clone)]
pub struct Flag {
    pub short: String,
    pub long: String,
    pub description: String,
    pub takes_value: bool,
    pub value: Option<String>,
}

impl Flag {
    fn new(short: &str, long: &str, description: &str, takes_value: bool) -> Self {
        Self {
            short: short.to_string(),
            long: long.to_string(),
            description: description.to_string(),
            takes_value,
            value: None,
        }
    }
}

impl Default for Flags {
    fn default() -> Self {
        Self::new()
    }
}

impl Flags {
    pub fn new() -> Self {
        let mut flags = HashMap::new();

        flags.insert(
            "help".to_string(),
            Flag::new("-h", "--help", "Print this help message", false),
        );
        flags.insert(
            "version".to_string(),
            Flag::new("-v", "--version", "Show version information", false),
        );
        flags.insert(
            "quiet".to_string(),
            Flag::new("-q", "--quiet", "Suppress diagnostics", false),
        );
        flags.insert(
            "debug".to_string(),
            Flag::new("-d", "--debug", "Enable debug logging", false),
        );
        flags.insert(
            "command".to_string(),
            Flag::new("-c", "--command", "Run one line and exit with its status", true),
        );
        flags.insert(
            "timeout".to_string(),
            Flag::new("-t", "--timeout", "Kill external commands after SECS seconds", true),
        );
        flags.insert(
            "log".to_string(),
            Flag::new("-l", "--log", "Also write the log to FILE", true),
        );

        Flags { flags }
    }

    pub fn parse(&mut self, args: &[String]) -> Result<(), ShellError> {
        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];
            let flag = self
                .flags
                .values_mut()
                .find(|flag| arg == &flag.short || arg == &flag.long)
                .ok_or_else(|| ShellError::FlagError(format!("Unknown flag {}", arg)))?;

            if flag.takes_value {
                let value = args.get(i + 1).ok_or_else(|| {
                    ShellError::FlagError(format!("Flag {} requires a value", arg))
                })?;
                flag.value = Some(value.clone());
                i += 1;
            } else {
                flag.value = Some("true".to_string());
            }
            i += 1;
        }
        Ok(())
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.flags
            .get(name)
            .and_then(|f| f.value.as_ref())
            .is_some()
    }

    pub fn get_value(&self, name: &str) -> Option<&String> {
        self.flags.get(name).and_then(|f| f.value.as_ref())
    }

    /// `--timeout` as a duration; fractional seconds are allowed.
    pub fn timeout(&self) -> Result<Option<Duration>, ShellError> {
        let Some(raw) = self.get_value("timeout") else {
            return Ok(None);
        };

        raw.parse::<f64>()
            .ok()
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .map(|secs| Some(Duration::from_secs_f64(secs)))
            .ok_or_else(|| ShellError::FlagError(format!("Invalid timeout '{}'", raw)))
    }

    pub fn print_help(&self) {
        let mut flags: Vec<&Flag> = self.flags.values().collect();
        flags.sort_by(|a, b| a.long.cmp(&b.long));

        println!("Usage: sluice [OPTIONS]");
        println!("\nOptions:");
        for flag in flags {
            println!("  {}, {:<15} {}", flag.short, flag.long, flag.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_boolean_flags() {
        let mut flags = Flags::new();
        flags.parse(&args(&["-q", "--debug"])).unwrap();
        assert!(flags.is_set("quiet"));
        assert!(flags.is_set("debug"));
        assert!(!flags.is_set("help"));
    }

    #[test]
    fn test_value_flags() {
        let mut flags = Flags::new();
        flags
            .parse(&args(&["-c", "echo hi | cat", "--timeout", "1.5", "-l", "out.log"]))
            .unwrap();
        assert_eq!(flags.get_value("command").map(String::as_str), Some("echo hi | cat"));
        assert_eq!(flags.get_value("log").map(String::as_str), Some("out.log"));
        assert_eq!(flags.timeout().unwrap(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_missing_value_and_unknown_flag() {
        let mut flags = Flags::new();
        assert!(matches!(flags.parse(&args(&["-c"])), Err(ShellError::FlagError(_))));

        let mut flags = Flags::new();
        assert!(matches!(flags.parse(&args(&["--nope"])), Err(ShellError::FlagError(_))));
    }

    #[test]
    fn test_invalid_timeout() {
        let mut flags = Flags::new();
        flags.parse(&args(&["-t", "soon"])).unwrap();
        assert!(flags.timeout().is_err());

        let flags = Flags::new();
        assert_eq!(flags.timeout().unwrap(), None);
    }
}
