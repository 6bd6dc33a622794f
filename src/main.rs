use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process;

use log::{debug, warn};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use sluice::config::Config;
use sluice::error::ShellError;
use sluice::flags::Flags;
use sluice::highlight::SyntaxHighlighter;
use sluice::logging;
use sluice::shell::{ExecutionResult, Shell};

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("sluice: {}", e);
            1
        }
    };
    process::exit(code);
}

fn run() -> Result<i32, ShellError> {
    let mut flags = Flags::new();
    let args: Vec<String> = env::args().skip(1).collect();
    flags.parse(&args)?;

    if flags.is_set("help") {
        flags.print_help();
        return Ok(0);
    }

    if flags.is_set("version") {
        println!("sluice {}", env!("CARGO_PKG_VERSION"));
        return Ok(0);
    }

    logging::init(
        logging::level_for(&flags),
        flags.get_value("log").map(Path::new),
    )?;

    let config = Config::new()?.with_timeout(flags.timeout()?);
    let mut shell = Shell::new(&config)?;
    let highlighter = SyntaxHighlighter::new();

    if let Some(line) = flags.get_value("command") {
        let result = shell.run_line(line);
        render(&highlighter, &result)?;
        return Ok(shell.exit_request().unwrap_or(result.status));
    }

    ctrlc::set_handler(move || {
        debug!("interrupt received");
    })?;

    repl(&mut shell, &highlighter)
}

fn repl(shell: &mut Shell, highlighter: &SyntaxHighlighter) -> Result<i32, ShellError> {
    let mut editor = DefaultEditor::new()?;
    for line in shell.history().all() {
        editor.add_history_entry(line.as_str())?;
    }

    let mut status = 0;
    loop {
        let prompt = highlighter.highlight_prompt(&shell.state().current_dir().display().to_string());
        match editor.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(e) = editor.add_history_entry(line.as_str()) {
                        warn!("Couldn't add to history: {}", e);
                    }
                }
                if take_clear(shell, &line) {
                    editor.clear_screen()?;
                    continue;
                }

                let result = shell.run_line(&line);
                render(highlighter, &result)?;
                status = result.status;

                if let Some(code) = shell.exit_request() {
                    return Ok(code);
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => return Ok(status),
            Err(e) => return Err(e.into()),
        }
    }
}

/// `clear` is a terminal action handled here, but it still goes into the
/// history like any other line. Returns whether `line` was `clear`.
fn take_clear(shell: &mut Shell, line: &str) -> bool {
    if line.trim() != "clear" {
        return false;
    }
    shell.history_mut().record(line);
    true
}

fn render(highlighter: &SyntaxHighlighter, result: &ExecutionResult) -> Result<(), ShellError> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(result.output.as_bytes())?;
    if !result.output.is_empty() && !result.output.ends_with('\n') {
        writeln!(stdout)?;
    }
    stdout.flush()?;

    if !result.stderr.is_empty() {
        eprint!("{}", highlighter.highlight_stderr(&result.stderr));
    }
    if let Some(error) = &result.error {
        eprintln!("{}", highlighter.highlight_error(&format!("sluice: {}", error)));
    } else if result.status != 0 {
        eprintln!("{}", highlighter.highlight_hint(&format!("[exit {}]", result.status)));
    }
    Ok(())
}
