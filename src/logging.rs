use std::fs::OpenOptions;
use std::path::Path;

use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};

use crate::error::ShellError;
use crate::flags::Flags;

/// `Off` when quiet, `Debug` when debugging, warnings otherwise.
pub fn level_for(flags: &Flags) -> LevelFilter {
    if flags.is_set("quiet") {
        LevelFilter::Off
    } else if flags.is_set("debug") {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Installs the global logger: the terminal's stderr, plus `log_file` when
/// one is given. The file always receives debug output.
pub fn init(level: LevelFilter, log_file: Option<&Path>) -> Result<(), ShellError> {
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        loggers.push(WriteLogger::new(LevelFilter::Debug, config, file));
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}
