use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use log::debug;

use super::result::{ExecError, ExecutionResult};
use crate::core::commands::{Command, CommandContext, CommandError, CommandType};
use crate::parse::{Pipeline, RedirectMode, Redirection, Stage};
use crate::process::{find_executable, ProcessError, ProcessOutput};

/// A stage that stopped the pipeline.
struct StageFailure {
    status: i32,
    error: ExecError,
}

pub(crate) trait PipelineRunner {
    fn run_pipeline(&mut self, pipeline: &Pipeline) -> ExecutionResult;
}

impl PipelineRunner for super::Shell {
    fn run_pipeline(&mut self, pipeline: &Pipeline) -> ExecutionResult {
        let mut input: Vec<u8> = Vec::new();
        let mut stderr = String::new();
        let mut status = 0;

        for (index, stage) in pipeline.stages().iter().enumerate() {
            debug!("stage {}: {:?}", index, stage.argv());
            match self.run_stage(index, stage, &input) {
                Ok(output) => {
                    stderr.push_str(&String::from_utf8_lossy(&output.stderr));
                    if output.status != 0 {
                        debug!("stage {} exited with {}, continuing", index, output.status);
                        status = output.status;
                    }
                    input = output.stdout;
                }
                Err(failure) => {
                    debug!("stage {} failed: {}", index, failure.error);
                    return ExecutionResult {
                        output: String::new(),
                        stderr,
                        status: failure.status,
                        error: Some(failure.error),
                    };
                }
            }
        }

        let output = String::from_utf8_lossy(&input).into_owned();
        let Some(redirection) = pipeline.redirection() else {
            return ExecutionResult {
                output,
                stderr,
                status,
                error: None,
            };
        };

        let last = pipeline.len() - 1;
        match self.write_redirection(redirection, &input) {
            Ok(()) => ExecutionResult {
                output: String::new(),
                stderr,
                status,
                error: None,
            },
            Err((path, source)) => ExecutionResult {
                output,
                stderr,
                status: 1,
                error: Some(ExecError::Io {
                    stage: last,
                    command: pipeline.stages()[last].command().to_string(),
                    path,
                    source,
                }),
            },
        }
    }
}

impl super::Shell {
    fn run_stage(
        &mut self,
        index: usize,
        stage: &Stage,
        input: &[u8],
    ) -> Result<ProcessOutput, StageFailure> {
        match self.registry.lookup(stage.command()).cloned() {
            Some(builtin) => self.run_builtin(index, stage, &builtin, input),
            None => self.run_external(index, stage, input),
        }
    }

    fn run_builtin(
        &mut self,
        index: usize,
        stage: &Stage,
        builtin: &CommandType,
        input: &[u8],
    ) -> Result<ProcessOutput, StageFailure> {
        let name = stage.command();
        let args = stage.args();
        let input = String::from_utf8_lossy(input);
        let mut sink = Vec::new();

        let outcome = {
            let mut ctx = CommandContext {
                state: &self.state,
                history: &mut self.history,
                input: &input,
                stdout: &mut sink,
            };
            builtin.execute(&mut ctx, &args)
        };

        let change = outcome.map_err(|e| builtin_failure(index, name, e))?;
        if let Some(change) = change {
            debug!("{} requested {:?}", name, change);
            self.state
                .apply(change)
                .map_err(|e| builtin_failure(index, name, e.into()))?;
        }

        Ok(ProcessOutput {
            stdout: sink,
            stderr: Vec::new(),
            status: 0,
        })
    }

    fn run_external(
        &mut self,
        index: usize,
        stage: &Stage,
        input: &[u8],
    ) -> Result<ProcessOutput, StageFailure> {
        let name = stage.command();
        let not_found = || StageFailure {
            status: 127,
            error: ExecError::NotFound {
                stage: index,
                command: name.to_string(),
                target: None,
            },
        };

        let program = find_executable(name, &self.state).ok_or_else(not_found)?;
        self.processes
            .run(&program, name, &stage.args(), input, &self.state)
            .map_err(|e| match e {
                ProcessError::CommandNotFound(_) => not_found(),
                other => StageFailure {
                    status: other.status(),
                    error: ExecError::Execution {
                        stage: index,
                        command: name.to_string(),
                        message: other.to_string(),
                    },
                },
            })
    }

    fn write_redirection(
        &self,
        redirection: &Redirection,
        contents: &[u8],
    ) -> Result<(), (PathBuf, io::Error)> {
        let path = self
            .state
            .resolve_path(&redirection.path)
            .map_err(|e| {
                (
                    PathBuf::from(&redirection.path),
                    io::Error::new(io::ErrorKind::Other, e.to_string()),
                )
            })?;

        let mut options = OpenOptions::new();
        options.create(true);
        match redirection.mode {
            RedirectMode::Overwrite => options.write(true).truncate(true),
            RedirectMode::Append => options.append(true),
        };

        debug!("redirecting {} bytes to {}", contents.len(), path.display());
        options
            .open(&path)
            .and_then(|mut file| file.write_all(contents))
            .map_err(|e| (path, e))
    }
}

fn builtin_failure(index: usize, name: &str, error: CommandError) -> StageFailure {
    let error = match error {
        CommandError::NotFound(target) => ExecError::NotFound {
            stage: index,
            command: name.to_string(),
            target: Some(target),
        },
        other => ExecError::Execution {
            stage: index,
            command: name.to_string(),
            message: format!("{}: {}", name, other),
        },
    };

    StageFailure { status: 1, error }
}
