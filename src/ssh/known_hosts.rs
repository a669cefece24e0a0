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

//! Host key verification policy and the russh client handler enforcing it.

use russh::client::Handler;
use std::path::PathBuf;
use std::str::FromStr;

use super::error::SshError;

/// How server host keys are verified during the handshake
///
/// The default accepts every key without recording it. Fleets that carry
/// a populated known_hosts file can opt into checking against it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HostKeyPolicy {
    /// Accept any host key
    #[default]
    AcceptAny,
    /// Check against the user's default known_hosts file
    KnownHosts,
    /// Check against a specific known_hosts file
    KnownHostsFile(PathBuf),
}

impl FromStr for HostKeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "accept-any" | "no" | "none" => Ok(Self::AcceptAny),
            "known-hosts" | "yes" | "strict" => Ok(Self::KnownHosts),
            other => Err(format!(
                "unknown host key policy '{other}' (expected accept-any or known-hosts)"
            )),
        }
    }
}

/// SSH client handler for managing server key verification.
#[derive(Debug, Clone)]
pub struct ClientHandler {
    hostname: String,
    port: u16,
    policy: HostKeyPolicy,
}

impl ClientHandler {
    pub fn new(hostname: String, port: u16, policy: HostKeyPolicy) -> Self {
        Self {
            hostname,
            port,
            policy,
        }
    }
}

impl Handler for ClientHandler {
    type Error = SshError;

    async fn check_server_key(
        &mut self,
        server_public_key: &russh::keys::PublicKey,
    ) -> Result<bool, Self::Error> {
        match &self.policy {
            HostKeyPolicy::AcceptAny => Ok(true),
            HostKeyPolicy::KnownHosts => {
                russh::keys::check_known_hosts(&self.hostname, self.port, server_public_key)
                    .map_err(|e| {
                        tracing::debug!("known_hosts check failed for {}: {}", self.hostname, e);
                        SshError::HostKeyRejected {
                            host: self.hostname.clone(),
                        }
                    })
            }
            HostKeyPolicy::KnownHostsFile(path) => russh::keys::check_known_hosts_path(
                &self.hostname,
                self.port,
                server_public_key,
                path,
            )
            .map_err(|e| {
                tracing::debug!(
                    "known_hosts check against {:?} failed for {}: {}",
                    path,
                    self.hostname,
                    e
                );
                SshError::HostKeyRejected {
                    host: self.hostname.clone(),
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "accept-any".parse::<HostKeyPolicy>().unwrap(),
            HostKeyPolicy::AcceptAny
        );
        assert_eq!(
            "Known-Hosts".parse::<HostKeyPolicy>().unwrap(),
            HostKeyPolicy::KnownHosts
        );
        assert!("tofu".parse::<HostKeyPolicy>().is_err());
    }

    #[test]
    fn test_default_accepts_any() {
        assert_eq!(HostKeyPolicy::default(), HostKeyPolicy::AcceptAny);
    }
}
