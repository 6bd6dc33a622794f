use super::{Command, CommandContext, CommandError, CommandResult};
use crate::core::state::StateChange;

#[derive(Clone, Debug, Default)]
pub struct CdCommand;

impl Command for CdCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CommandResult {
        if args.len() > 1 {
            return Err(CommandError::InvalidArguments("too many arguments".to_string()));
        }

        let path_str = args.first().map(|s| s.as_str()).unwrap_or("~");
        let expanded_path = ctx.state.resolve_path(path_str)?;

        match expanded_path.canonicalize() {
            Ok(dir) if dir.is_dir() => Ok(Some(StateChange::ChangeDir(dir))),
            _ => Err(CommandError::NotFound(path_str.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::test_support::{run, temp_state};
    use crate::history::HistoryManager;
    use std::fs;

    #[test]
    fn test_cd_home() {
        let (_dir, state) = temp_state();
        let mut history = HistoryManager::in_memory();
        let (result, _) = run(&CdCommand, &state, &mut history, "", &[]);
        let home = dirs::home_dir().unwrap().canonicalize().unwrap();
        assert_eq!(result.unwrap(), Some(StateChange::ChangeDir(home)));
    }

    #[test]
    fn test_cd_relative() {
        let (dir, state) = temp_state();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let mut history = HistoryManager::in_memory();

        let (result, out) = run(&CdCommand, &state, &mut history, "", &["sub"]);
        let expected = dir.path().join("sub").canonicalize().unwrap();
        assert_eq!(result.unwrap(), Some(StateChange::ChangeDir(expected)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_cd_invalid() {
        let (dir, state) = temp_state();
        fs::write(dir.path().join("file.txt"), "x").unwrap();
        let mut history = HistoryManager::in_memory();

        let (result, _) = run(&CdCommand, &state, &mut history, "", &["/nonexistent/path"]);
        assert!(matches!(result, Err(CommandError::NotFound(_))));

        let (result, _) = run(&CdCommand, &state, &mut history, "", &["file.txt"]);
        assert!(matches!(result, Err(CommandError::NotFound(_))));

        let (result, _) = run(&CdCommand, &state, &mut history, "", &["a", "b"]);
        assert!(matches!(result, Err(CommandError::InvalidArguments(_))));
    }
}
