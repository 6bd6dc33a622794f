use std::collections::BTreeMap;
use std::io::Write;

mod alias;
mod builtin;
mod cd;
mod export;
mod fs;
mod help;
mod history;
mod ls;
mod type_cmd;

pub use alias::AliasCommand;
pub use builtin::{EchoCommand, ExitCommand, PwdCommand};
pub use cd::CdCommand;
pub use export::{ExportCommand, UnsetCommand};
pub use fs::{CatCommand, MkdirCommand, TouchCommand};
pub use help::HelpCommand;
pub use history::HistoryCommand;
pub use ls::LsCommand;
pub use type_cmd::TypeCommand;

use crate::core::env::EnvError;
use crate::core::state::{ShellState, StateChange};
use crate::history::{HistoryError, HistoryManager};

/// Names of every built-in, sorted.
pub const BUILTINS: &[&str] = &[
    "alias", "cat", "cd", "echo", "exit", "export", "help", "history", "ls", "mkdir", "pwd",
    "touch", "type", "unset",
];

#[derive(Debug)]
pub enum CommandError {
    NotFound(String),
    InvalidArguments(String),
    ExecutionError(String),
    IoError(std::io::Error),
    HistoryError(HistoryError),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::NotFound(target) => write!(f, "{}: No such file or directory", target),
            CommandError::InvalidArguments(msg) => write!(f, "invalid arguments: {}", msg),
            CommandError::ExecutionError(msg) => write!(f, "{}", msg),
            CommandError::IoError(err) => write!(f, "IO error: {}", err),
            CommandError::HistoryError(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::IoError(err)
    }
}

impl From<HistoryError> for CommandError {
    fn from(err: HistoryError) -> Self {
        CommandError::HistoryError(err)
    }
}

impl From<EnvError> for CommandError {
    fn from(err: EnvError) -> Self {
        match err {
            EnvError::InvalidPath(path) => CommandError::NotFound(path.display().to_string()),
            EnvError::InvalidValue(msg) => CommandError::InvalidArguments(msg.to_string()),
            EnvError::HomeDirNotFound => {
                CommandError::ExecutionError("Home directory not found".to_string())
            }
        }
    }
}

pub type CommandResult = Result<Option<StateChange>, CommandError>;

/// Everything a built-in may look at while it runs.
///
/// `stdout` is the sink for the built-in's output; the executor owns the
/// buffer behind it and reads it back once the call returns.
pub struct CommandContext<'a> {
    pub state: &'a ShellState,
    pub history: &'a mut HistoryManager,
    pub input: &'a str,
    pub stdout: &'a mut dyn Write,
}

pub trait Command {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CommandResult;
}

#[derive(Clone, Debug)]
pub enum CommandType {
    Alias(AliasCommand),
    Cat(CatCommand),
    Cd(CdCommand),
    Echo(EchoCommand),
    Exit(ExitCommand),
    Export(ExportCommand),
    Help(HelpCommand),
    History(HistoryCommand),
    Ls(LsCommand),
    Mkdir(MkdirCommand),
    Pwd(PwdCommand),
    Touch(TouchCommand),
    Type(TypeCommand),
    Unset(UnsetCommand),
}

impl Command for CommandType {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CommandResult {
        match self {
            CommandType::Alias(cmd) => cmd.execute(ctx, args),
            CommandType::Cat(cmd) => cmd.execute(ctx, args),
            CommandType::Cd(cmd) => cmd.execute(ctx, args),
            CommandType::Echo(cmd) => cmd.execute(ctx, args),
            CommandType::Exit(cmd) => cmd.execute(ctx, args),
            CommandType::Export(cmd) => cmd.execute(ctx, args),
            CommandType::Help(cmd) => cmd.execute(ctx, args),
            CommandType::History(cmd) => cmd.execute(ctx, args),
            CommandType::Ls(cmd) => cmd.execute(ctx, args),
            CommandType::Mkdir(cmd) => cmd.execute(ctx, args),
            CommandType::Pwd(cmd) => cmd.execute(ctx, args),
            CommandType::Touch(cmd) => cmd.execute(ctx, args),
            CommandType::Type(cmd) => cmd.execute(ctx, args),
            CommandType::Unset(cmd) => cmd.execute(ctx, args),
        }
    }
}

/// Name → built-in table. A miss means "not a built-in", never an error.
#[derive(Clone, Debug)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandType>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            commands: BTreeMap::new(),
        };

        registry.register("alias", CommandType::Alias(AliasCommand));
        registry.register("cat", CommandType::Cat(CatCommand));
        registry.register("cd", CommandType::Cd(CdCommand));
        registry.register("echo", CommandType::Echo(EchoCommand));
        registry.register("exit", CommandType::Exit(ExitCommand));
        registry.register("export", CommandType::Export(ExportCommand));
        registry.register("help", CommandType::Help(HelpCommand));
        registry.register("history", CommandType::History(HistoryCommand));
        registry.register("ls", CommandType::Ls(LsCommand));
        registry.register("mkdir", CommandType::Mkdir(MkdirCommand));
        registry.register("pwd", CommandType::Pwd(PwdCommand));
        registry.register("touch", CommandType::Touch(TouchCommand));
        registry.register("type", CommandType::Type(TypeCommand));
        registry.register("unset", CommandType::Unset(UnsetCommand));

        registry
    }

    fn register(&mut self, name: &str, command: CommandType) {
        self.commands.insert(name.to_string(), command);
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandType> {
        self.commands.get(name)
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_command_detection() {
        let registry = CommandRegistry::new();

        assert!(registry.is_builtin("cd"));
        assert!(registry.is_builtin("history"));
        assert!(registry.lookup("ls").is_some());
        assert!(registry.lookup("grep").is_none());
        assert!(!registry.is_builtin(""));
    }

    #[test]
    fn test_names_match_builtin_list() {
        let registry = CommandRegistry::new();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, BUILTINS);
    }

    #[test]
    fn test_command_error_display() {
        let errors = vec![
            CommandError::NotFound("test".to_string()),
            CommandError::InvalidArguments("bad args".to_string()),
            CommandError::ExecutionError("failed".to_string()),
            CommandError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "io error",
            )),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
        }
    }

    #[test]
    fn test_env_error_conversion() {
        let err: CommandError = EnvError::InvalidPath("/missing".into()).into();
        assert!(matches!(err, CommandError::NotFound(ref p) if p == "/missing"));
    }
}
