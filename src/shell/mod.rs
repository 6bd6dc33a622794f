//! The engine facade: one [`Shell`] owns its state, history and built-ins and
//! turns lines into [`ExecutionResult`]s without touching the console.

use std::time::Duration;

use log::debug;

mod executor;
mod result;

pub use result::{ExecError, ExecutionResult};

use crate::{
    config::Config,
    core::{commands::CommandRegistry, state::ShellState},
    error::ShellError,
    history::HistoryManager,
    parse::{parse, tokenize_with, ParseError, Pipeline, Token},
    process::ProcessExecutor,
};

use executor::PipelineRunner;

pub struct Shell {
    pub(crate) state: ShellState,
    pub(crate) history: HistoryManager,
    pub(crate) registry: CommandRegistry,
    pub(crate) processes: ProcessExecutor,
}

impl Shell {
    /// Starts in the process's working directory with history and rc file
    /// taken from `config`.
    pub fn new(config: &Config) -> Result<Self, ShellError> {
        let mut state = ShellState::from_process()?;
        config.load_rc(&mut state)?;
        let history = HistoryManager::open(config.history_path());

        Ok(Self::with_parts(state, history, config.command_timeout()))
    }

    pub fn with_parts(
        state: ShellState,
        history: HistoryManager,
        command_timeout: Option<Duration>,
    ) -> Self {
        Self {
            state,
            history,
            registry: CommandRegistry::new(),
            processes: ProcessExecutor::new(command_timeout),
        }
    }

    /// Records `line`, then tokenizes, expands and runs it. Blank lines are
    /// neither recorded nor run.
    pub fn run_line(&mut self, line: &str) -> ExecutionResult {
        if line.trim().is_empty() {
            return ExecutionResult::default();
        }

        self.history.record(line);

        match self.prepare(line) {
            Ok(pipeline) => self.execute(&pipeline),
            Err(e) => {
                debug!("parse error in {:?}: {}", line, e);
                ExecutionResult::parse_failure(e)
            }
        }
    }

    pub fn execute(&mut self, pipeline: &Pipeline) -> ExecutionResult {
        self.run_pipeline(pipeline)
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ShellState {
        &mut self.state
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryManager {
        &mut self.history
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Set once `exit` has run.
    pub fn exit_request(&self) -> Option<i32> {
        self.state.exit_request()
    }

    fn prepare(&self, line: &str) -> Result<Pipeline, ParseError> {
        let tokens = tokenize_with(line, &self.state)?;
        parse(self.expand_aliases(tokens)?)
    }

    /// Replaces an unquoted alias name in command position with the alias
    /// body. Bodies are not expanded again.
    fn expand_aliases(&self, tokens: Vec<Token>) -> Result<Vec<Token>, ParseError> {
        let mut expanded = Vec::with_capacity(tokens.len());
        let mut command_position = true;

        for token in tokens {
            let alias = if command_position && !token.is_quoted() && !token.is_operator() {
                self.state.alias(token.value())
            } else {
                None
            };
            command_position = token.is_pipe();

            match alias {
                Some(body) => {
                    debug!("alias {} -> {}", token.value(), body);
                    expanded.extend(tokenize_with(body, &self.state)?);
                }
                None => expanded.push(token),
            }
        }

        Ok(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::StateChange;

    fn shell() -> (tempfile::TempDir, Shell) {
        let dir = tempfile::tempdir().unwrap();
        let state = ShellState::with_dir(dir.path()).unwrap();
        (dir, Shell::with_parts(state, HistoryManager::in_memory(), None))
    }

    #[test]
    fn test_blank_line_is_skipped() {
        let (_dir, mut shell) = shell();
        let result = shell.run_line("   ");
        assert!(result.success());
        assert!(shell.history().is_empty());
    }

    #[test]
    fn test_parse_error_is_recorded() {
        let (_dir, mut shell) = shell();
        let result = shell.run_line("echo \"abc");
        assert_eq!(result.status, 2);
        assert!(matches!(
            result.error,
            Some(ExecError::Parse(ParseError::UnterminatedQuote('"')))
        ));
        assert_eq!(shell.history().all(), &["echo \"abc"]);
    }

    #[test]
    fn test_alias_expansion_in_command_position() {
        let (_dir, mut shell) = shell();
        shell
            .state_mut()
            .apply(StateChange::SetAliases(vec![("greet".into(), "echo hello".into())]))
            .unwrap();

        let result = shell.run_line("greet world | cat");
        assert_eq!(result.output, "hello world\n");

        let result = shell.run_line("echo greet");
        assert_eq!(result.output, "greet\n");

        let result = shell.run_line("'greet'");
        assert!(matches!(result.error, Some(ExecError::NotFound { .. })));
    }

    #[test]
    fn test_alias_is_not_recursive() {
        let (_dir, mut shell) = shell();
        shell.state_mut().set_alias("echo", "echo again");
        let result = shell.run_line("echo x");
        assert_eq!(result.output, "again x\n");
    }

    #[test]
    fn test_exit_request() {
        let (_dir, mut shell) = shell();
        assert_eq!(shell.exit_request(), None);
        let result = shell.run_line("exit 4");
        assert!(result.success());
        assert_eq!(shell.exit_request(), Some(4));
    }
}
