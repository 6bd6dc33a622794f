use std::io::Write;

use super::{Command, CommandContext, CommandError, CommandResult};
use crate::history::HistoryEntry;

/// `history [N]`, plus `-r`, `-w` and `-a` for reading, writing and
/// appending to a file.
#[derive(Clone, Debug, Default)]
pub struct HistoryCommand;

impl HistoryCommand {
    fn format_entry(&self, entry: HistoryEntry<'_>) -> String {
        format!("{:>5}  {}", entry.position + 1, entry.line)
    }

    fn show(&self, ctx: &mut CommandContext<'_>, count: Option<usize>) -> CommandResult {
        let count = count.unwrap_or(ctx.history.len());
        let lines: Vec<String> = ctx
            .history
            .recent(count)
            .map(|entry| self.format_entry(entry))
            .collect();

        for line in lines {
            writeln!(ctx.stdout, "{}", line)?;
        }
        Ok(None)
    }

    fn file_operation(
        &self,
        ctx: &mut CommandContext<'_>,
        flag: &str,
        target: &str,
    ) -> CommandResult {
        let path = ctx.state.resolve_path(target)?;
        match flag {
            "-r" => {
                let count = ctx.history.read_from(&path)?;
                writeln!(ctx.stdout, "Loaded {} commands from {}", count, target)?;
            }
            "-w" => {
                let count = ctx.history.write_to(&path)?;
                writeln!(ctx.stdout, "Wrote {} commands to {}", count, target)?;
            }
            "-a" => match ctx.history.append_to(&path)? {
                0 => writeln!(ctx.stdout, "No new commands to append")?,
                count => writeln!(ctx.stdout, "Appended {} new commands to {}", count, target)?,
            },
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown history option '{}'",
                    other
                )))
            }
        }
        Ok(None)
    }
}

impl Command for HistoryCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CommandResult {
        match args {
            [] => self.show(ctx, None),
            [flag, target] if flag.starts_with('-') => self.file_operation(ctx, flag, target),
            [flag] if flag.starts_with('-') => Err(CommandError::InvalidArguments(format!(
                "{} requires a file name",
                flag
            ))),
            [count] => {
                let count = count.parse::<usize>().map_err(|_| {
                    CommandError::InvalidArguments(format!("{}: numeric argument required", count))
                })?;
                self.show(ctx, Some(count))
            }
            _ => Err(CommandError::InvalidArguments(
                "Usage: history [N] | history -r|-w|-a FILE".to_string(),
            )),
        }
    }
}
