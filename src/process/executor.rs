use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, warn};

use super::ProcessError;
use crate::core::state::ShellState;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub status: i32,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Runs one external program to completion with its streams captured.
#[derive(Clone, Debug, Default)]
pub struct ProcessExecutor {
    timeout: Option<Duration>,
}

impl ProcessExecutor {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Spawns `program` in the shell's directory and environment, feeds it
    /// `input` and collects everything it writes.
    ///
    /// `name` is what the user typed; it becomes `argv[0]` and is used in
    /// error messages.
    pub fn run(
        &self,
        program: &Path,
        name: &str,
        args: &[String],
        input: &[u8],
        state: &ShellState,
    ) -> Result<ProcessOutput, ProcessError> {
        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(state.current_dir())
            .envs(state.env().iter())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for name in state.env().removed() {
            command.env_remove(name);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.arg0(name);
            // A timed child gets its own group so its descendants die with it.
            if self.timeout.is_some() {
                command.process_group(0);
            }
        }

        debug!("spawning {} ({}) with {} args", name, program.display(), args.len());
        let mut child = command.spawn().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ProcessError::CommandNotFound(name.to_string()),
            _ => ProcessError::Spawn {
                command: name.to_string(),
                source: e,
            },
        })?;

        let feeder = self.feed_input(&mut child, input.to_vec());
        let stdout = Self::drain(child.stdout.take());
        let stderr = Self::drain(child.stderr.take());

        let status = match self.wait(&mut child, name) {
            Ok(status) => status,
            Err(e) => {
                // Anything that escaped the kill may still hold the pipes, so
                // the pumps are left to finish on their own.
                drop((feeder, stdout, stderr));
                return Err(e);
            }
        };

        Self::join(feeder)??;
        let output = ProcessOutput {
            stdout: Self::join(stdout)??,
            stderr: Self::join(stderr)??,
            status: exit_code(status),
        };
        debug!("{} exited with status {}", name, output.status);
        Ok(output)
    }

    fn feed_input(&self, child: &mut Child, input: Vec<u8>) -> JoinHandle<io::Result<()>> {
        let stdin = child.stdin.take();
        thread::spawn(move || {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            match stdin.write_all(&input) {
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
        })
    }

    fn drain<R: Read + Send + 'static>(source: Option<R>) -> JoinHandle<io::Result<Vec<u8>>> {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            if let Some(mut source) = source {
                source.read_to_end(&mut buffer)?;
            }
            Ok(buffer)
        })
    }

    fn join<T>(handle: JoinHandle<T>) -> Result<T, ProcessError> {
        handle
            .join()
            .map_err(|_| ProcessError::Other("stream pump panicked".to_string()))
    }

    fn wait(&self, child: &mut Child, name: &str) -> Result<ExitStatus, ProcessError> {
        let Some(timeout) = self.timeout else {
            return Ok(child.wait()?);
        };

        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if started.elapsed() >= timeout {
                warn!("{} exceeded {:?}, killing it", name, timeout);
                kill_group(child)?;
                child.wait()?;
                return Err(ProcessError::TimedOut {
                    command: name.to_string(),
                    after: timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

#[cfg(unix)]
fn kill_group(child: &mut Child) -> io::Result<()> {
    let pgid = libc::pid_t::try_from(child.id())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
    // SAFETY: kill(2) with a negative pid only signals the group the child
    // leads; it touches no memory.
    if unsafe { libc::kill(-pgid, libc::SIGKILL) } == 0 {
        return Ok(());
    }
    child.kill()
}

#[cfg(not(unix))]
fn kill_group(child: &mut Child) -> io::Result<()> {
    child.kill()
}

/// Exit code, or 128 plus the signal number for a killed child.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh() -> std::path::PathBuf {
        std::path::PathBuf::from("/bin/sh")
    }

    fn args(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    fn temp_state() -> (tempfile::TempDir, ShellState) {
        let dir = tempfile::tempdir().unwrap();
        let state = ShellState::with_dir(dir.path()).unwrap();
        (dir, state)
    }

    #[test]
    fn test_captures_stdout_and_stderr() {
        let (_dir, state) = temp_state();
        let output = ProcessExecutor::default()
            .run(&sh(), "sh", &args("echo out; echo err >&2"), b"", &state)
            .unwrap();
        assert_eq!(output.stdout, b"out\n");
        assert_eq!(output.stderr, b"err\n");
        assert!(output.success());
    }

    #[test]
    fn test_feeds_input() {
        let (_dir, state) = temp_state();
        let output = ProcessExecutor::default()
            .run(&sh(), "sh", &args("tr a-z A-Z"), b"hello\n", &state)
            .unwrap();
        assert_eq!(output.stdout, b"HELLO\n");
    }

    #[test]
    fn test_ignores_unread_input() {
        let (_dir, state) = temp_state();
        let input = vec![b'x'; 1 << 20];
        let output = ProcessExecutor::default()
            .run(&sh(), "sh", &args("exit 0"), &input, &state)
            .unwrap();
        assert!(output.success());
    }

    #[test]
    fn test_exit_status_and_signal() {
        let (_dir, state) = temp_state();
        let executor = ProcessExecutor::default();

        let output = executor.run(&sh(), "sh", &args("exit 3"), b"", &state).unwrap();
        assert_eq!(output.status, 3);

        let output = executor.run(&sh(), "sh", &args("kill -9 $$"), b"", &state).unwrap();
        assert_eq!(output.status, 128 + 9);
    }

    #[test]
    fn test_runs_in_shell_directory_with_overlay() {
        let (dir, mut state) = temp_state();
        state.env_mut().set("SLUICE_TEST_VAR", "overlay").unwrap();

        let output = ProcessExecutor::default()
            .run(&sh(), "sh", &args("pwd; echo $SLUICE_TEST_VAR"), b"", &state)
            .unwrap();
        let expected = format!("{}\noverlay\n", dir.path().canonicalize().unwrap().display());
        assert_eq!(String::from_utf8(output.stdout).unwrap(), expected);
    }

    #[test]
    fn test_unset_variable_is_not_inherited() {
        let (_dir, mut state) = temp_state();
        state.env_mut().set("SLUICE_HIDDEN", "x").unwrap();
        state.env_mut().unset("SLUICE_HIDDEN").unwrap();
        state.env_mut().unset("HOME").unwrap();

        let output = ProcessExecutor::default()
            .run(
                &sh(),
                "sh",
                &args("echo ${SLUICE_HIDDEN-none} ${HOME-gone}"),
                b"",
                &state,
            )
            .unwrap();
        assert_eq!(output.stdout, b"none gone\n");
    }

    #[test]
    fn test_timeout_kills_child() {
        let (_dir, state) = temp_state();
        let executor = ProcessExecutor::new(Some(Duration::from_millis(100)));
        let result = executor.run(&sh(), "sh", &args("exec sleep 5"), b"", &state);
        assert!(matches!(result, Err(ProcessError::TimedOut { .. })));
    }

    #[test]
    fn test_timeout_kills_forked_descendants() {
        let (_dir, state) = temp_state();
        let executor = ProcessExecutor::new(Some(Duration::from_millis(200)));

        let started = Instant::now();
        let result = executor.run(&sh(), "sh", &args("sleep 3; echo late"), b"", &state);
        assert!(matches!(result, Err(ProcessError::TimedOut { .. })));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_missing_program() {
        let (_dir, state) = temp_state();
        let result = ProcessExecutor::default().run(
            Path::new("/definitely/not/here"),
            "here",
            &[],
            b"",
            &state,
        );
        assert!(matches!(result, Err(ProcessError::CommandNotFound(ref name)) if name == "here"));
    }
}
