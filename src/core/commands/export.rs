use std::io::Write;

use super::{Command, CommandContext, CommandError, CommandResult};
use crate::core::env::is_valid_name;
use crate::core::state::StateChange;

#[derive(Clone, Debug, Default)]
pub struct ExportCommand;

impl ExportCommand {
    fn parse_assignment(&self, arg: &str) -> Result<(String, String), CommandError> {
        match arg.split_once('=') {
            Some((name, value)) if is_valid_name(name) => Ok((name.to_string(), value.to_string())),
            _ => Err(CommandError::InvalidArguments(
                "Export syntax: export NAME=VALUE".to_string(),
            )),
        }
    }
}

impl Command for ExportCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CommandResult {
        if args.is_empty() {
            for (name, value) in ctx.state.env().iter() {
                writeln!(ctx.stdout, "export {}={}", name, value)?;
            }
            return Ok(None);
        }

        let vars = args
            .iter()
            .map(|arg| self.parse_assignment(arg))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(StateChange::SetVars(vars)))
    }
}

/// `unset NAME...`: hides shell variables, inherited ones included.
#[derive(Clone, Debug, Default)]
pub struct UnsetCommand;

impl Command for UnsetCommand {
    fn execute(&self, _ctx: &mut CommandContext<'_>, args: &[String]) -> CommandResult {
        if args.is_empty() {
            return Err(CommandError::InvalidArguments("Usage: unset NAME...".to_string()));
        }

        if let Some(bad) = args.iter().find(|name| !is_valid_name(name)) {
            return Err(CommandError::InvalidArguments(format!(
                "unset: '{}': not a valid identifier",
                bad
            )));
        }

        Ok(Some(StateChange::UnsetVars(args.to_vec())))
    }
}
