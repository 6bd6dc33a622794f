use std::io::Write;

use super::{Command, CommandContext, CommandError, CommandResult, BUILTINS};
use crate::process::find_executable;

#[derive(Clone, Debug, Default)]
pub struct TypeCommand;

impl Command for TypeCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CommandResult {
        if args.is_empty() {
            return Err(CommandError::InvalidArguments("Usage: type NAME...".to_string()));
        }

        for name in args {
            if let Some(value) = ctx.state.alias(name) {
                writeln!(ctx.stdout, "{} is aliased to '{}'", name, value)?;
            } else if BUILTINS.contains(&name.as_str()) {
                writeln!(ctx.stdout, "{} is a shell builtin", name)?;
            } else if let Some(path) = find_executable(name, ctx.state) {
                writeln!(ctx.stdout, "{} is {}", name, path.display())?;
            } else {
                return Err(CommandError::NotFound(name.clone()));
            }
        }

        Ok(None)
    }
}
