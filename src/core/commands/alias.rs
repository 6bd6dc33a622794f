use std::io::Write;

use super::{Command, CommandContext, CommandError, CommandResult};
use crate::core::state::StateChange;

#[derive(Clone, Debug, Default)]
pub struct AliasCommand;

impl AliasCommand {
    fn usage() -> CommandError {
        CommandError::InvalidArguments("Usage: alias name='command'".to_string())
    }
}

impl Command for AliasCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CommandResult {
        if args.is_empty() {
            for (name, value) in ctx.state.aliases() {
                writeln!(ctx.stdout, "{}='{}'", name, value)?;
            }
            return Ok(None);
        }

        let mut aliases = Vec::with_capacity(args.len());
        for arg in args {
            match arg.split_once('=') {
                Some((name, value)) if !name.is_empty() && !name.contains(char::is_whitespace) => {
                    aliases.push((name.to_string(), value.to_string()));
                }
                _ => match ctx.state.alias(arg) {
                    Some(value) => writeln!(ctx.stdout, "{}='{}'", arg, value)?,
                    None => return Err(Self::usage()),
                },
            }
        }

        if aliases.is_empty() {
            Ok(None)
        } else {
            Ok(Some(StateChange::SetAliases(aliases)))
        }
    }
}
