//! External command execution with a hard wall-clock bound

use std::future::Future;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Text returned in place of output when a command exceeds its timeout
pub const TIMED_OUT_TEXT: &str = "command timed out";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// Exit code 0; text is stdout
    Success,
    /// Non-zero or signal exit; text is stderr
    Failed(Option<i32>),
    /// Killed after the timeout; text is [`TIMED_OUT_TEXT`]
    TimedOut,
    /// The binary could not be started; text is the OS error
    SpawnFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: CommandStatus,
    pub text: String,
}

impl CommandOutput {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Success,
            text: text.into(),
        }
    }

    pub fn timed_out() -> Self {
        Self {
            status: CommandStatus::TimedOut,
            text: TIMED_OUT_TEXT.to_string(),
        }
    }

    /// Output of a successful run that produced something
    pub fn usable_text(&self) -> Option<&str> {
        match self.status {
            CommandStatus::Success if !self.text.is_empty() => Some(self.text.as_str()),
            _ => None,
        }
    }
}

/// Runs one external command to completion or timeout.
///
/// Implementations never fail: every outcome is folded into a
/// [`CommandOutput`] so probes treat timeouts like unparseable output.
pub trait CommandRunner: Send + Sync + 'static {
    fn run(&self, argv: &[String], timeout: Duration) -> impl Future<Output = CommandOutput> + Send;
}

/// Runs commands as child processes of the agent
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, argv: &[String], timeout: Duration) -> impl Future<Output = CommandOutput> + Send {
        async move {
            let Some((program, args)) = argv.split_first() else {
                return CommandOutput {
                    status: CommandStatus::SpawnFailed,
                    text: "empty command".to_string(),
                };
            };

            debug!("Running {} {:?} (timeout {:?})", program, args, timeout);

            let child = Command::new(program)
                .args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn();

            let child = match child {
                Ok(child) => child,
                Err(e) => {
                    warn!("Failed to start {}: {}", program, e);
                    return CommandOutput {
                        status: CommandStatus::SpawnFailed,
                        text: format!("failed to start {}: {}", program, e),
                    };
                }
            };

            // Dropping the wait future on timeout drops the child, which kills it
            match tokio::time::timeout(timeout, child.wait_with_output()).await {
                Ok(Ok(output)) if output.status.success() => {
                    CommandOutput::success(String::from_utf8_lossy(&output.stdout).trim())
                }
                Ok(Ok(output)) => CommandOutput {
                    status: CommandStatus::Failed(output.status.code()),
                    text: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                },
                Ok(Err(e)) => CommandOutput {
                    status: CommandStatus::Failed(None),
                    text: format!("failed to collect output of {}: {}", program, e),
                },
                Err(_) => {
                    warn!("{} timed out after {:?}", program, timeout);
                    CommandOutput::timed_out()
                }
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_success_captures_trimmed_stdout() {
        let output = ProcessRunner
            .run(&argv(&["sh", "-c", "echo '  hello  '"]), Duration::from_secs(5))
            .await;
        assert_eq!(output, CommandOutput::success("hello"));
    }

    #[tokio::test]
    async fn test_failure_captures_stderr() {
        let output = ProcessRunner
            .run(&argv(&["sh", "-c", "echo out; echo err >&2; exit 3"]), Duration::from_secs(5))
            .await;
        assert_eq!(output.status, CommandStatus::Failed(Some(3)));
        assert_eq!(output.text, "err");
        assert_eq!(output.usable_text(), None);
    }

    #[tokio::test]
    async fn test_timeout_returns_sentinel() {
        let output = ProcessRunner
            .run(&argv(&["sleep", "5"]), Duration::from_millis(100))
            .await;
        assert_eq!(output, CommandOutput::timed_out());
    }

    #[tokio::test]
    async fn test_missing_binary_is_not_an_error() {
        let output = ProcessRunner
            .run(&argv(&["/nonexistent/nettool-probe"]), Duration::from_secs(1))
            .await;
        assert_eq!(output.status, CommandStatus::SpawnFailed);
        assert!(output.text.contains("/nonexistent/nettool-probe"));
    }

    #[tokio::test]
    async fn test_empty_argv() {
        let output = ProcessRunner.run(&[], Duration::from_secs(1)).await;
        assert_eq!(output.status, CommandStatus::SpawnFailed);
    }
}
