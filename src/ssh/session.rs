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

//! SSH session establishment and command channel handling.
//!
//! [`RemoteSession::open`] resolves credentials, dials the host, negotiates
//! the transport with the target's cipher list, authenticates, opens one
//! session channel and requests a PTY on it. The session is released by
//! [`RemoteSession::close`], or by `Drop` on any path that skips it.

use russh::client::{Config, Handle, Msg};
use russh::{Channel, ChannelMsg, Disconnect, Preferred};
use std::borrow::Cow;
use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;

use super::auth::{authenticate, resolve_auth_method, AuthMethod};
use super::ciphers::resolve_ciphers;
use super::error::SshError;
use super::known_hosts::{ClientHandler, HostKeyPolicy};
use super::terminal_modes::{configure_terminal_modes, TERM_COLUMNS, TERM_ROWS, TERM_TYPE};
use crate::target::Target;

/// Everything the remote side sent back on a channel.
#[derive(Debug, Default, Clone)]
pub struct CapturedOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_status: Option<u32>,
    pub exit_signal: Option<String>,
}

impl CapturedOutput {
    pub fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }

    /// Interpret the exit report the way a blocking `run` would.
    pub fn exit_result(&self) -> Result<(), SshError> {
        if let Some(signal) = &self.exit_signal {
            return Err(SshError::ExitSignal(signal.clone()));
        }
        match self.exit_status {
            Some(0) => Ok(()),
            Some(status) => Err(SshError::ExitStatus(status)),
            None => Err(SshError::MissingExitStatus),
        }
    }
}

/// One authenticated connection with a single PTY-backed session channel.
pub struct RemoteSession {
    handle: Option<Handle<ClientHandler>>,
    channel: Option<Channel<Msg>>,
    address: String,
}

impl RemoteSession {
    /// Connect to the target and prepare a session channel with a PTY.
    ///
    /// The target's timeout bounds dial, handshake and authentication.
    pub async fn open(target: &Target, policy: &HostKeyPolicy) -> Result<Self, SshError> {
        let auth = resolve_auth_method(target).await?;
        let address = target.socket_address();

        tracing::debug!("Connecting to {}", address);
        let handle = match tokio::time::timeout(
            target.timeout_duration(),
            establish(target, &address, policy, auth),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(SshError::Dial {
                    address,
                    source: io::Error::new(io::ErrorKind::TimedOut, "i/o timeout"),
                })
            }
        };
        tracing::debug!("Connected and authenticated to {}", address);

        let channel = handle
            .channel_open_session()
            .await
            .map_err(SshError::Session)?;

        let mut session = Self {
            handle: Some(handle),
            channel: Some(channel),
            address,
        };
        session.request_pty().await?;
        Ok(session)
    }

    async fn request_pty(&mut self) -> Result<(), SshError> {
        let channel = self.channel_mut()?;
        channel
            .request_pty(
                true,
                TERM_TYPE,
                TERM_COLUMNS,
                TERM_ROWS,
                0, // pixel width (0 means undefined)
                0, // pixel height (0 means undefined)
                &configure_terminal_modes(),
            )
            .await
            .map_err(|e| SshError::Pty(e.to_string()))?;
        await_reply(channel).await.map_err(SshError::Pty)
    }

    /// Run one command line and collect its output and exit report.
    pub async fn exec(&mut self, command: &str) -> Result<CapturedOutput, SshError> {
        let channel = self.channel_mut()?;
        channel.exec(true, command).await?;
        Ok(drain(channel).await)
    }

    /// Start a login shell, type `lines` into it, and collect everything it
    /// prints until the remote side closes the channel.
    pub async fn shell(&mut self, lines: &[String]) -> Result<CapturedOutput, SshError> {
        let channel = self.channel_mut()?;
        channel
            .request_shell(true)
            .await
            .map_err(|e| SshError::Shell(e.to_string()))?;
        await_reply(channel).await.map_err(SshError::Shell)?;

        for line in lines {
            channel
                .data(line.as_bytes())
                .await
                .map_err(SshError::Write)?;
        }

        Ok(drain(channel).await)
    }

    /// Close the channel and disconnect.
    pub async fn close(mut self) {
        if let Some(channel) = self.channel.take() {
            let _ = channel.close().await;
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle
                .disconnect(Disconnect::ByApplication, "", "English")
                .await
            {
                tracing::trace!("Disconnect from {} failed: {}", self.address, e);
            }
        }
        tracing::debug!("Session to {} closed", self.address);
    }

    fn channel_mut(&mut self) -> Result<&mut Channel<Msg>, SshError> {
        self.channel
            .as_mut()
            .ok_or(SshError::Ssh(russh::Error::Disconnect))
    }
}

impl Drop for RemoteSession {
    fn drop(&mut self) {
        self.channel.take();
        if let Some(handle) = self.handle.take() {
            // Dropped without close(): finish the disconnect in the background.
            if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                let address = std::mem::take(&mut self.address);
                runtime.spawn(async move {
                    let _ = handle
                        .disconnect(Disconnect::ByApplication, "", "English")
                        .await;
                    tracing::trace!("Session to {} released on drop", address);
                });
            }
        }
    }
}

async fn establish(
    target: &Target,
    address: &str,
    policy: &HostKeyPolicy,
    auth: AuthMethod,
) -> Result<Handle<ClientHandler>, SshError> {
    let stream = TcpStream::connect(address)
        .await
        .map_err(|source| SshError::Dial {
            address: address.to_string(),
            source,
        })?;

    let config = Config {
        preferred: Preferred {
            cipher: Cow::Owned(resolve_ciphers(&target.ciphers)),
            ..Preferred::default()
        },
        ..Config::default()
    };
    let handler = ClientHandler::new(target.address.clone(), target.port, policy.clone());

    let mut handle = russh::client::connect_stream(Arc::new(config), stream, handler)
        .await
        .map_err(|e| match e {
            SshError::Ssh(russh::Error::UnknownKey) => SshError::HostKeyRejected {
                host: target.address.clone(),
            },
            SshError::Ssh(russh::Error::IO(source)) => SshError::Dial {
                address: address.to_string(),
                source,
            },
            other => other,
        })?;

    authenticate(&mut handle, &target.user, auth).await?;
    Ok(handle)
}

/// Wait for the reply to a `want_reply` channel request.
async fn await_reply(channel: &mut Channel<Msg>) -> Result<(), String> {
    loop {
        match channel.wait().await {
            Some(ChannelMsg::Success) => return Ok(()),
            Some(ChannelMsg::Failure) => return Err("request rejected by server".to_string()),
            Some(_) => continue,
            None => return Err("channel closed before reply".to_string()),
        }
    }
}

/// Collect channel messages until the remote side closes the channel.
async fn drain(channel: &mut Channel<Msg>) -> CapturedOutput {
    let mut captured = CapturedOutput::default();

    while let Some(msg) = channel.wait().await {
        match msg {
            ChannelMsg::Data { ref data } => captured.stdout.extend_from_slice(data),
            ChannelMsg::ExtendedData { ref data, ext } => {
                if ext == 1 {
                    captured.stderr.extend_from_slice(data)
                }
            }
            // Exit reports can precede trailing data, keep reading.
            ChannelMsg::ExitStatus { exit_status } => captured.exit_status = Some(exit_status),
            ChannelMsg::ExitSignal {
                signal_name,
                error_message,
                ..
            } => {
                let mut signal = format!("{signal_name:?}");
                if !error_message.is_empty() {
                    signal.push_str(": ");
                    signal.push_str(&error_message);
                }
                captured.exit_signal = Some(signal);
            }
            _ => {}
        }
    }

    captured
}
