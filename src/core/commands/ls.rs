use std::fs;
use std::io::Write;
use std::path::Path;

use super::{Command, CommandContext, CommandError, CommandResult};

#[derive(Clone, Debug, Default)]
pub struct LsCommand;

#[derive(Debug, Default, Clone, Copy)]
struct LsOptions {
    all: bool,
    long: bool,
}

struct Listing {
    name: String,
    is_dir: bool,
    len: u64,
}

impl LsCommand {
    fn parse_args<'a>(&self, args: &'a [String]) -> Result<(LsOptions, Vec<&'a str>), CommandError> {
        let mut options = LsOptions::default();
        let mut paths = Vec::new();

        for arg in args {
            match arg.strip_prefix('-') {
                Some(flags) if !flags.is_empty() => {
                    for flag in flags.chars() {
                        match flag {
                            'a' => options.all = true,
                            'l' => options.long = true,
                            '1' => {}
                            other => {
                                return Err(CommandError::InvalidArguments(format!(
                                    "invalid option -- '{}'",
                                    other
                                )))
                            }
                        }
                    }
                }
                _ => paths.push(arg.as_str()),
            }
        }

        Ok((options, paths))
    }

    fn read_dir(&self, dir: &Path, options: LsOptions) -> Result<Vec<Listing>, CommandError> {
        let mut listings = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !options.all && name.starts_with('.') {
                continue;
            }

            // Follow symlinks; a dangling one is described by the link itself.
            let metadata = match fs::metadata(entry.path()) {
                Ok(metadata) => metadata,
                Err(_) => entry.metadata()?,
            };
            listings.push(Listing {
                name,
                is_dir: metadata.is_dir(),
                len: metadata.len(),
            });
        }

        listings.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listings)
    }

    fn write_listing(
        &self,
        out: &mut dyn Write,
        listing: &Listing,
        options: LsOptions,
    ) -> Result<(), CommandError> {
        let suffix = if listing.is_dir { "/" } else { "" };
        if options.long {
            let kind = if listing.is_dir { 'd' } else { '-' };
            writeln!(out, "{} {:>10} {}{}", kind, listing.len, listing.name, suffix)?;
        } else {
            writeln!(out, "{}{}", listing.name, suffix)?;
        }
        Ok(())
    }
}

impl Command for LsCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CommandResult {
        let (options, paths) = self.parse_args(args)?;
        let targets = if paths.is_empty() { vec!["."] } else { paths };
        let with_headers = targets.len() > 1;

        for (index, target) in targets.iter().enumerate() {
            let path = ctx.state.resolve_path(target)?;
            let metadata =
                fs::metadata(&path).map_err(|_| CommandError::NotFound(target.to_string()))?;

            if !metadata.is_dir() {
                let listing = Listing {
                    name: target.to_string(),
                    is_dir: false,
                    len: metadata.len(),
                };
                self.write_listing(ctx.stdout, &listing, options)?;
                continue;
            }

            if with_headers {
                if index > 0 {
                    writeln!(ctx.stdout)?;
                }
                writeln!(ctx.stdout, "{}:", target)?;
            }
            for listing in self.read_dir(&path, options)? {
                self.write_listing(ctx.stdout, &listing, options)?;
            }
        }

        Ok(None)
    }
}
