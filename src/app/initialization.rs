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

//! Application initialization and configuration loading

use anyhow::{Context, Result};
use std::path::PathBuf;

use super::targets::resolve_targets;
use crate::cli::{Cli, OutputFormat};
use crate::config::expand_tilde;
use crate::ssh::HostKeyPolicy;
use crate::target::Target;

/// Where the report is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSink {
    Stdout,
    File(PathBuf),
}

/// Application context after initialization
#[derive(Debug)]
pub struct AppContext {
    pub targets: Vec<Target>,
    pub max_parallel: usize,
    pub host_key_policy: HostKeyPolicy,
    pub format: OutputFormat,
    pub sink: ReportSink,
}

impl AppContext {
    /// Build the run from parsed flags. Document loading errors end the run here.
    pub async fn from_cli(cli: &Cli) -> Result<Self> {
        let host_key_policy = parse_host_key_policy(cli)?;
        let targets = resolve_targets(cli).await?;

        let sink = if cli.writes_to_stdout() {
            ReportSink::Stdout
        } else {
            ReportSink::File(expand_tilde(&PathBuf::from(&cli.output)))
        };

        Ok(Self {
            targets,
            max_parallel: cli.max_run_count.max(1),
            host_key_policy,
            format: cli.format,
            sink,
        })
    }
}

/// Host key policy from `--host-key-policy` and `--known-hosts`.
pub fn parse_host_key_policy(cli: &Cli) -> Result<HostKeyPolicy> {
    let policy: HostKeyPolicy = cli
        .host_key_policy
        .parse()
        .map_err(anyhow::Error::msg)
        .context("Invalid --host-key-policy")?;

    Ok(match (policy, &cli.known_hosts) {
        (HostKeyPolicy::KnownHosts, Some(path)) => {
            HostKeyPolicy::KnownHostsFile(expand_tilde(path))
        }
        (policy, _) => policy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_policy_accepts_any() {
        let cli = Cli::parse_from(["fanout"]);
        assert_eq!(parse_host_key_policy(&cli).unwrap(), HostKeyPolicy::AcceptAny);
    }

    #[test]
    fn test_known_hosts_file() {
        let cli = Cli::parse_from([
            "fanout",
            "--host-key-policy",
            "known-hosts",
            "--known-hosts",
            "/etc/ssh/ssh_known_hosts",
        ]);
        assert_eq!(
            parse_host_key_policy(&cli).unwrap(),
            HostKeyPolicy::KnownHostsFile(PathBuf::from("/etc/ssh/ssh_known_hosts"))
        );
    }

    #[test]
    fn test_bad_policy() {
        let cli = Cli::parse_from(["fanout", "--host-key-policy", "tofu"]);
        assert!(parse_host_key_policy(&cli).is_err());
    }

    #[tokio::test]
    async fn test_context_from_flags() {
        let cli = Cli::parse_from(["fanout", "-I", "10.0.0.0/30", "-w", "pw", "-o", "report.txt"]);
        let ctx = AppContext::from_cli(&cli).await.unwrap();
        assert_eq!(ctx.targets.len(), 2);
        assert_eq!(ctx.max_parallel, 20);
        assert_eq!(ctx.sink, ReportSink::File(PathBuf::from("report.txt")));
    }
}
