use std::fs::{self, OpenOptions};
use std::io::Write;

use super::{Command, CommandContext, CommandError, CommandResult};

/// `cat FILE...`, or a straight copy of the piped input when no file is named.
#[derive(Clone, Debug, Default)]
pub struct CatCommand;

impl Command for CatCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CommandResult {
        if args.is_empty() {
            ctx.stdout.write_all(ctx.input.as_bytes())?;
            return Ok(None);
        }

        for arg in args {
            let path = ctx.state.resolve_path(arg)?;
            if path.is_dir() {
                return Err(CommandError::ExecutionError(format!("{}: Is a directory", arg)));
            }
            let contents = fs::read(&path).map_err(|_| CommandError::NotFound(arg.clone()))?;
            ctx.stdout.write_all(&contents)?;
        }

        Ok(None)
    }
}

/// `mkdir DIR...`, creating missing parents along the way.
#[derive(Clone, Debug, Default)]
pub struct MkdirCommand;

impl Command for MkdirCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CommandResult {
        let dirs: Vec<&String> = args.iter().filter(|arg| arg.as_str() != "-p").collect();
        if dirs.is_empty() {
            return Err(CommandError::InvalidArguments("mkdir: missing operand".to_string()));
        }

        for dir in dirs {
            let path = ctx.state.resolve_path(dir)?;
            fs::create_dir_all(&path).map_err(|e| {
                CommandError::ExecutionError(format!("mkdir: cannot create '{}': {}", dir, e))
            })?;
        }

        Ok(None)
    }
}

#[derive(Clone, Debug, Default)]
pub struct TouchCommand;

impl Command for TouchCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CommandResult {
        if args.is_empty() {
            return Err(CommandError::InvalidArguments("touch: missing file operand".to_string()));
        }

        for arg in args {
            let path = ctx.state.resolve_path(arg)?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| {
                    CommandError::ExecutionError(format!("touch: cannot touch '{}': {}", arg, e))
                })?;
            file.set_modified(std::time::SystemTime::now())?;
        }

        Ok(None)
    }
}
