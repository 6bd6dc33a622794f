use std::io::Write;

use super::{Command, CommandContext, CommandError, CommandResult};

const SUMMARIES: &[(&str, &str)] = &[
    ("alias", "alias [NAME=VALUE...]   define or list aliases"),
    ("cat", "cat [FILE...]           print files, or the piped input"),
    ("cd", "cd [DIR]                change the working directory"),
    ("echo", "echo [-n] [ARG...]      print arguments"),
    ("exit", "exit [CODE]             leave the shell"),
    ("export", "export [NAME=VALUE...]  set or list shell variables"),
    ("help", "help [COMMAND]          show this help"),
    ("history", "history [N|-r|-w|-a F]  show or save command history"),
    ("ls", "ls [-a] [-l] [PATH...]  list directory contents"),
    ("mkdir", "mkdir [-p] DIR...       create directories"),
    ("pwd", "pwd                     print the working directory"),
    ("touch", "touch FILE...           create files or update their times"),
    ("type", "type NAME...            tell whether NAME is built in or on PATH"),
    ("unset", "unset NAME...           remove shell variables"),
];

#[derive(Clone, Debug, Default)]
pub struct HelpCommand;

impl Command for HelpCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CommandResult {
        if args.is_empty() {
            writeln!(ctx.stdout, "Built-in commands:")?;
            for (_, summary) in SUMMARIES {
                writeln!(ctx.stdout, "  {}", summary)?;
            }
            writeln!(
                ctx.stdout,
                "Anything else is looked up on PATH. Join commands with '|', end with '> file' or '>> file'."
            )?;
            return Ok(None);
        }

        for arg in args {
            let summary = SUMMARIES
                .iter()
                .find(|(name, _)| *name == arg.as_str())
                .map(|(_, summary)| *summary)
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!("no help topics match '{}'", arg))
                })?;
            writeln!(ctx.stdout, "{}", summary)?;
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::test_support::{run, temp_state};
    use crate::core::commands::BUILTINS;
    use crate::history::HistoryManager;

    #[test]
    fn test_help_covers_every_builtin() {
        let names: Vec<&str> = SUMMARIES.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, BUILTINS);
    }

    #[test]
    fn test_help_topic() {
        let (_dir, state) = temp_state();
        let mut history = HistoryManager::in_memory();

        let (_, out) = run(&HelpCommand, &state, &mut history, "", &["cd"]);
        assert!(out.starts_with("cd [DIR]"));

        let (result, _) = run(&HelpCommand, &state, &mut history, "", &["nope"]);
        assert!(matches!(result, Err(CommandError::InvalidArguments(_))));
    }

    #[test]
    fn test_help_listing() {
        let (_dir, state) = temp_state();
        let mut history = HistoryManager::in_memory();
        let (_, out) = run(&HelpCommand, &state, &mut history, "", &[]);
        assert_eq!(out.lines().count(), SUMMARIES.len() + 2);
    }
}
