// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Per-platform strategies that turn a target's command list into one outcome.

use crate::ssh::{CapturedOutput, HostKeyPolicy, RemoteSession, SshError};
use crate::target::{Platform, Target};

use super::result_types::Outcome;

/// How commands are delivered to a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// All commands joined into one `exec` request.
    Batch,
    /// Commands typed line by line into a login shell.
    Interactive,
}

impl From<Platform> for ExecutionStrategy {
    fn from(platform: Platform) -> Self {
        match platform {
            Platform::Posix => ExecutionStrategy::Batch,
            Platform::Other => ExecutionStrategy::Interactive,
        }
    }
}

impl ExecutionStrategy {
    pub fn for_target(target: &Target) -> Self {
        Self::from(target.platform)
    }

    /// Run the target's commands and fold every error into the outcome.
    pub async fn run(&self, target: &Target, policy: &HostKeyPolicy) -> Outcome {
        match self {
            ExecutionStrategy::Batch => run_batch(target, policy).await,
            ExecutionStrategy::Interactive => run_interactive(target, policy).await,
        }
    }
}

/// Join commands so the first failing one short-circuits the rest.
pub fn batch_command(commands: &[String]) -> String {
    commands
        .iter()
        .map(String::as_str)
        .chain(std::iter::once("exit"))
        .collect::<Vec<_>>()
        .join(" && ")
}

/// Lines written into an interactive shell, each newline terminated and
/// followed by a final `exit`.
pub fn interactive_script(commands: &[String]) -> Vec<String> {
    commands
        .iter()
        .map(String::as_str)
        .chain(std::iter::once("exit"))
        .map(|command| format!("{command}\n"))
        .collect()
}

async fn run_batch(target: &Target, policy: &HostKeyPolicy) -> Outcome {
    let cmd = batch_command(&target.commands);
    let host = target.address.as_str();

    let mut session = match RemoteSession::open(target, policy).await {
        Ok(session) => session,
        Err(e) => return failure(host, cmd, &e),
    };

    tracing::debug!("Executing on {}: {}", target, cmd);
    let result = session.exec(&cmd).await;
    session.close().await;

    match result {
        Ok(captured) => match captured.exit_result() {
            Ok(()) => judge(host, cmd, &captured),
            Err(e) => failure(host, cmd, &e),
        },
        Err(e) => failure(host, cmd, &e),
    }
}

async fn run_interactive(target: &Target, policy: &HostKeyPolicy) -> Outcome {
    let lines = interactive_script(&target.commands);
    let cmd = lines.concat();
    let host = target.address.as_str();

    let mut session = match RemoteSession::open(target, policy).await {
        Ok(session) => session,
        Err(e) => return Outcome::failed(host, cmd, e.to_string()),
    };

    tracing::debug!("Typing {} line(s) into shell on {}", lines.len(), target);
    let result = session.shell(&lines).await;
    session.close().await;

    // The shell's own exit report is not consulted, only its stderr.
    match result {
        Ok(captured) => judge(host, cmd, &captured),
        Err(e) => Outcome::failed(host, cmd, e.to_string()),
    }
}

/// Anything on stderr fails the run even when the command itself succeeded.
fn judge(host: &str, cmd: String, captured: &CapturedOutput) -> Outcome {
    if captured.stderr.is_empty() {
        Outcome::succeeded(host, cmd, captured.stdout_string())
    } else {
        Outcome::failed(host, cmd, captured.stderr_string())
    }
}

fn failure(host: &str, cmd: String, error: &SshError) -> Outcome {
    tracing::debug!("Run on {} failed: {}", host, error);
    Outcome::failed(host, cmd, error.to_string()).with_code(error.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_batch_command_appends_exit() {
        assert_eq!(
            batch_command(&commands(&["uptime", "df -h"])),
            "uptime && df -h && exit"
        );
        assert_eq!(batch_command(&[]), "exit");
    }

    #[test]
    fn test_interactive_script_lines() {
        let lines = interactive_script(&commands(&["display version", "quit"]));
        assert_eq!(lines, vec!["display version\n", "quit\n", "exit\n"]);
        assert_eq!(lines.concat(), "display version\nquit\nexit\n");
    }

    #[test]
    fn test_strategy_selection() {
        assert_eq!(
            ExecutionStrategy::from(Platform::Posix),
            ExecutionStrategy::Batch
        );
        let target = Target::new("10.0.0.1").with_platform(Platform::from("huawei"));
        assert_eq!(
            ExecutionStrategy::for_target(&target),
            ExecutionStrategy::Interactive
        );
    }

    #[test]
    fn test_stderr_fails_run() {
        let captured = CapturedOutput {
            stdout: b"partial\n".to_vec(),
            stderr: b"permission denied\n".to_vec(),
            exit_status: Some(0),
            exit_signal: None,
        };
        let outcome = judge("10.0.0.1", "ls && exit".to_string(), &captured);
        assert!(!outcome.success);
        assert_eq!(outcome.error_text(), "permission denied\n");
        assert!(outcome.detail.is_none());
    }

    #[test]
    fn test_clean_run_succeeds() {
        let captured = CapturedOutput {
            stdout: b"ok\n".to_vec(),
            exit_status: Some(0),
            ..CapturedOutput::default()
        };
        let outcome = judge("10.0.0.1", "true && exit".to_string(), &captured);
        assert!(outcome.success);
        assert_eq!(outcome.detail.as_deref(), Some("ok\n"));
    }

    #[tokio::test]
    async fn test_batch_missing_credentials_sets_connect_code() {
        let target = Target::new("127.0.0.1").with_commands(commands(&["id"]));
        let outcome = ExecutionStrategy::Batch
            .run(&target, &HostKeyPolicy::AcceptAny)
            .await;
        assert!(!outcome.success);
        assert_eq!(outcome.code, Some(-1));
        assert_eq!(outcome.cmd, "id && exit");
    }

    #[tokio::test]
    async fn test_interactive_missing_credentials_has_no_code() {
        let target = Target::new("127.0.0.1")
            .with_commands(commands(&["show run"]))
            .with_platform(Platform::Other);
        let outcome = ExecutionStrategy::Interactive
            .run(&target, &HostKeyPolicy::AcceptAny)
            .await;
        assert!(!outcome.success);
        assert_eq!(outcome.code, None);
        assert_eq!(outcome.cmd, "show run\nexit\n");
    }
}
