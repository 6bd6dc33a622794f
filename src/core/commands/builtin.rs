use std::io::Write;

use super::{Command, CommandContext, CommandError, CommandResult};
use crate::core::state::StateChange;

#[derive(Clone, Debug, Default)]
pub struct PwdCommand;

impl Command for PwdCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> CommandResult {
        writeln!(ctx.stdout, "{}", ctx.state.current_dir().display())?;
        Ok(None)
    }
}

#[derive(Clone, Debug, Default)]
pub struct EchoCommand;

impl Command for EchoCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CommandResult {
        let (newline, words) = match args.first().map(String::as_str) {
            Some("-n") => (false, &args[1..]),
            _ => (true, args),
        };

        write!(ctx.stdout, "{}", words.join(" "))?;
        if newline {
            writeln!(ctx.stdout)?;
        }
        Ok(None)
    }
}

/// Asks the front-end to leave; the engine itself never exits the process.
#[derive(Clone, Debug, Default)]
pub struct ExitCommand;

impl Command for ExitCommand {
    fn execute(&self, _ctx: &mut CommandContext<'_>, args: &[String]) -> CommandResult {
        let code = match args {
            [] => 0,
            [code] => code.parse::<i32>().map_err(|_| {
                CommandError::InvalidArguments(format!("{}: numeric argument required", code))
            })?,
            _ => return Err(CommandError::InvalidArguments("too many arguments".to_string())),
        };

        Ok(Some(StateChange::RequestExit(code)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::test_support::{run, temp_state};
    use crate::history::HistoryManager;

    #[test]
    fn test_pwd() {
        let (_dir, state) = temp_state();
        let mut history = HistoryManager::in_memory();
        let (result, out) = run(&PwdCommand, &state, &mut history, "", &[]);
        assert!(result.unwrap().is_none());
        assert_eq!(out, format!("{}\n", state.current_dir().display()));
    }

    #[test]
    fn test_echo() {
        let (_dir, state) = temp_state();
        let mut history = HistoryManager::in_memory();

        let (_, out) = run(&EchoCommand, &state, &mut history, "ignored", &["a b", "c"]);
        assert_eq!(out, "a b c\n");

        let (_, out) = run(&EchoCommand, &state, &mut history, "", &["-n", "x"]);
        assert_eq!(out, "x");

        let (_, out) = run(&EchoCommand, &state, &mut history, "", &[]);
        assert_eq!(out, "\n");
    }

    #[test]
    fn test_exit_command() {
        let (_dir, state) = temp_state();
        let mut history = HistoryManager::in_memory();

        let (result, _) = run(&ExitCommand, &state, &mut history, "", &[]);
        assert_eq!(result.unwrap(), Some(StateChange::RequestExit(0)));

        let (result, _) = run(&ExitCommand, &state, &mut history, "", &["7"]);
        assert_eq!(result.unwrap(), Some(StateChange::RequestExit(7)));

        let (result, _) = run(&ExitCommand, &state, &mut history, "", &["soon"]);
        assert!(matches!(result, Err(CommandError::InvalidArguments(_))));
    }
}
