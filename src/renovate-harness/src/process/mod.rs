//! External command execution.
//!
//! Every git, docker and `gh` invocation goes through [`run_command`], which
//! streams the child's stdout and stderr line by line into `tracing` while
//! also capturing them for the caller.

mod command;
mod error;

pub use command::{CommandSpec, REDACTED};
pub use error::ProcessError;

use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, info_span, Instrument};

/// Captured result of a command that exited successfully.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Everything written to stdout.
    pub stdout: String,
    /// Everything written to stderr.
    pub stderr: String,
}

/// Runs a command to completion.
///
/// Output lines are logged as they arrive (secrets masked) so long-running
/// tools such as Renovate can be followed live.
///
/// # Errors
///
/// Returns [`ProcessError::Failed`] with the captured output when the command
/// exits non-zero, and [`ProcessError::TimedOut`] when it outlives its
/// timeout. The child is killed in the latter case.
pub async fn run_command(spec: &CommandSpec) -> Result<CommandOutput, ProcessError> {
    let command_line = spec.display();
    let span = info_span!("command", program = %spec.program());

    async {
        info!(command = %command_line, "Running command");

        let mut command = Command::new(spec.program());
        command
            .args(spec.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in spec.envs() {
            command.env(key, value);
        }
        if let Some(dir) = spec.working_dir() {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|source| ProcessError::Spawn {
            program: spec.program().to_string(),
            source,
        })?;

        let output = match spec.timeout_duration() {
            Some(timeout) => tokio::time::timeout(timeout, wait_for_exit(child, spec))
                .await
                .map_err(|_| ProcessError::TimedOut {
                    command: command_line.clone(),
                    timeout_secs: timeout.as_secs(),
                })?,
            None => wait_for_exit(child, spec).await,
        };

        let (status, stdout, stderr) = output.map_err(|source| ProcessError::Io {
            command: command_line.clone(),
            source,
        })?;

        if !status.success() {
            return Err(ProcessError::Failed {
                command: command_line.clone(),
                exit_code: status.code(),
                stdout,
                stderr,
            });
        }

        debug!("Command succeeded");
        Ok(CommandOutput { stdout, stderr })
    }
    .instrument(span)
    .await
}

/// Drains both pipes concurrently and waits for the child to exit.
async fn wait_for_exit(
    mut child: tokio::process::Child,
    spec: &CommandSpec,
) -> std::io::Result<(std::process::ExitStatus, String, String)> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (stdout, stderr) = futures::try_join!(
        pump(stdout, "stdout", spec),
        pump(stderr, "stderr", spec)
    )?;
    let status = child.wait().await?;

    Ok((status, stdout, stderr))
}

/// Reads one output stream to the end, logging each line.
async fn pump<R>(stream: Option<R>, name: &str, spec: &CommandSpec) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut captured = String::new();
    let Some(stream) = stream else {
        return Ok(captured);
    };

    // Tools may emit bytes that are not UTF-8; those are replaced, not fatal.
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let raw = String::from_utf8_lossy(&buf);
        let line = spec.redact(raw.trim_end_matches(['\n', '\r']));
        if !spec.is_quiet() {
            info!(stream = name, "{line}");
        }
        captured.push_str(&line);
        captured.push('\n');
    }

    Ok(captured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn captures_stdout_and_stderr() {
        let spec = CommandSpec::new("sh").args(["-c", "echo out; echo err >&2"]);

        let output = run_command(&spec).await.unwrap();

        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[tokio::test]
    async fn non_zero_exit_keeps_output() {
        let spec = CommandSpec::new("sh").args(["-c", "echo partial; echo boom >&2; exit 3"]);

        let error = run_command(&spec).await.unwrap_err();

        match error {
            ProcessError::Failed {
                exit_code,
                stdout,
                stderr,
                ..
            } => {
                assert_eq!(exit_code, Some(3));
                assert_eq!(stdout, "partial\n");
                assert_eq!(stderr, "boom\n");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn captured_output_is_redacted() {
        let spec = CommandSpec::new("sh")
            .args(["-c", "echo token=$SECRET_VALUE"])
            .env("SECRET_VALUE", "hunter2")
            .secret("hunter2");

        let output = run_command(&spec).await.unwrap();

        assert_eq!(output.stdout, "token=***\n");
    }

    #[tokio::test]
    async fn invalid_utf8_output_is_captured_lossily() {
        let spec = CommandSpec::new("sh").args(["-c", "printf 'caf\\351\\n'; echo ok; exit 0"]);

        let output = run_command(&spec).await.unwrap();

        assert_eq!(output.stdout, "caf\u{FFFD}\nok\n");
    }

    #[tokio::test]
    async fn final_line_without_newline_is_kept() {
        let spec = CommandSpec::new("sh").args(["-c", "printf 'no newline'"]);

        let output = run_command(&spec).await.unwrap();

        assert_eq!(output.stdout, "no newline\n");
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let spec = CommandSpec::new("definitely-not-a-real-program-3f9a");

        let error = run_command(&spec).await.unwrap_err();

        assert!(matches!(error, ProcessError::Spawn { .. }));
    }

    #[tokio::test]
    async fn timeout_kills_the_child() {
        let spec = CommandSpec::new("sleep")
            .arg("5")
            .timeout(Duration::from_millis(100));

        let error = run_command(&spec).await.unwrap_err();

        assert!(matches!(error, ProcessError::TimedOut { .. }));
    }

    #[tokio::test]
    async fn runs_in_working_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("marker.txt"), "").unwrap();
        let spec = CommandSpec::new("ls").current_dir(temp.path());

        let output = run_command(&spec).await.unwrap();

        assert!(output.stdout.contains("marker.txt"));
    }
}
