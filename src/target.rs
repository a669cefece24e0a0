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

//! Remote hosts and the parameters used to reach them.

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 22;
pub const DEFAULT_USER: &str = "root";

// Per-host deadline when neither the playbook nor the CLI sets one:
// - 5 minutes covers package installs and similar long commands
// - also used as the network-level connect timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Declared operating system family of a target.
///
/// Decides how commands are delivered: POSIX-like hosts get a single
/// `cmd1 && cmd2 && exit` exec request, everything else gets the commands
/// typed line by line into an interactive shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "String")]
pub enum Platform {
    #[default]
    Posix,
    Other,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Posix => "linux",
            Platform::Other => "other",
        }
    }
}

impl From<&str> for Platform {
    /// Only `linux` and the empty string are POSIX-like; any other tag,
    /// including other spellings of `linux`, is treated as `Other`.
    fn from(tag: &str) -> Self {
        match tag.trim() {
            "" | "linux" => Platform::Posix,
            _ => Platform::Other,
        }
    }
}

impl From<String> for Platform {
    fn from(tag: String) -> Self {
        Platform::from(tag.as_str())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One remote host plus everything needed to run commands on it.
///
/// Field names in the playbook document follow the `rename`s below.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Target {
    #[serde(rename = "ip", default)]
    pub address: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(rename = "cert-key", default)]
    pub key_file: String,
    #[serde(default)]
    pub ciphers: Vec<String>,
    #[serde(rename = "tasks", default)]
    pub commands: Vec<String>,
    #[serde(default)]
    pub platform: Platform,
    /// Seconds; `0` means [`DEFAULT_TIMEOUT_SECS`].
    #[serde(default)]
    pub timeout: u64,
}

impl Target {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            ..Self::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn with_key_file(mut self, key_file: impl Into<String>) -> Self {
        self.key_file = key_file.into();
        self
    }

    pub fn with_ciphers(mut self, ciphers: Vec<String>) -> Self {
        self.ciphers = ciphers;
        self
    }

    pub fn with_commands(mut self, commands: Vec<String>) -> Self {
        self.commands = commands;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout = timeout_secs;
        self
    }

    /// Fill unset fields with defaults. Address is left untouched.
    pub fn with_defaults(mut self) -> Self {
        if self.port == 0 {
            self.port = DEFAULT_PORT;
        }
        if self.user.is_empty() {
            self.user = DEFAULT_USER.to_string();
        }
        if self.timeout == 0 {
            self.timeout = DEFAULT_TIMEOUT_SECS;
        }
        self
    }

    pub fn timeout_secs(&self) -> u64 {
        if self.timeout == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            self.timeout
        }
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs())
    }

    pub fn socket_address(&self) -> String {
        let port = if self.port == 0 {
            DEFAULT_PORT
        } else {
            self.port
        };
        format!("{}:{}", self.address, port)
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("address", &self.address)
            .field("port", &self.port)
            .field("user", &self.user)
            .field(
                "password",
                &if self.password.is_empty() { "" } else { "<redacted>" },
            )
            .field("key_file", &self.key_file)
            .field("ciphers", &self.ciphers)
            .field("commands", &self.commands)
            .field("platform", &self.platform)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.socket_address())
    }
}
