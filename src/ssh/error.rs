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

//! Errors raised while opening a session or running commands on it.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SshError {
    #[error("password and key file cannot both be empty")]
    AuthConfig,

    #[error("failed to read key file {path:?}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse key file {path:?}: {source}")]
    KeyParse {
        path: PathBuf,
        #[source]
        source: russh::keys::Error,
    },

    #[error("dial {address}: {source}")]
    Dial {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("authentication rejected for user {user}")]
    AuthRejected { user: String },

    #[error("host key for {host} was rejected by the verification policy")]
    HostKeyRejected { host: String },

    #[error("failed to open session: {0}")]
    Session(#[source] russh::Error),

    #[error("request for pseudo terminal failed: {0}")]
    Pty(String),

    #[error("failed to start remote shell: {0}")]
    Shell(String),

    #[error("failed to write to remote shell: {0}")]
    Write(#[source] russh::Error),

    #[error("Process exited with status {0}")]
    ExitStatus(u32),

    #[error("Process exited with signal {0}")]
    ExitSignal(String),

    #[error("remote command exited without exit status or exit signal")]
    MissingExitStatus,

    #[error(transparent)]
    Ssh(#[from] russh::Error),
}

impl SshError {
    /// Whether the error happened before any command reached the host.
    pub fn is_connect_error(&self) -> bool {
        matches!(
            self,
            SshError::AuthConfig
                | SshError::KeyRead { .. }
                | SshError::KeyParse { .. }
                | SshError::Dial { .. }
                | SshError::AuthRejected { .. }
                | SshError::HostKeyRejected { .. }
                | SshError::Session(_)
                | SshError::Pty(_)
        )
    }

    /// Exit status carried by the error, if the remote command ran at all.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            SshError::ExitStatus(status) => Some(*status as i32),
            _ if self.is_connect_error() => Some(-1),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(SshError::ExitStatus(2).exit_code(), Some(2));
        assert_eq!(SshError::AuthConfig.exit_code(), Some(-1));
        assert_eq!(SshError::MissingExitStatus.exit_code(), None);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            SshError::ExitStatus(127).to_string(),
            "Process exited with status 127"
        );
        let dial = SshError::Dial {
            address: "10.0.0.1:22".to_string(),
            source: io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"),
        };
        assert_eq!(dial.to_string(), "dial 10.0.0.1:22: connection refused");
    }
}
