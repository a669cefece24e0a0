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

//! Target resolution from command-line flags

use anyhow::Result;

use crate::cli::Cli;
use crate::config::{load_taskbook, split_list, Playbook};
use crate::hostlist::expand_ip_range;
use crate::target::{Platform, Target};

/// Resolve the targets of a run.
///
/// A playbook replaces every per-host flag. Otherwise one target is built
/// per host, where `--ip-range` replaces `--hosts`.
pub async fn resolve_targets(cli: &Cli) -> Result<Vec<Target>> {
    if let Some(path) = &cli.playbook {
        let playbook = Playbook::load(path).await?;
        return Ok(playbook.targets);
    }

    let commands = resolve_commands(cli).await?;
    Ok(targets_from_flags(cli, &commands))
}

/// Commands from `--taskbook`, or from `--cmds` when no taskbook is given.
pub async fn resolve_commands(cli: &Cli) -> Result<Vec<String>> {
    if let Some(path) = &cli.taskbook {
        return load_taskbook(path).await;
    }
    Ok(cli.cmds.as_deref().map(split_list).unwrap_or_default())
}

/// Host addresses named on the command line.
pub fn resolve_hosts(cli: &Cli) -> Vec<String> {
    match cli.ip_range.as_deref() {
        Some(range) if !range.trim().is_empty() => expand_ip_range(range),
        _ => cli.hosts.as_deref().map(split_list).unwrap_or_default(),
    }
}

/// One target per host, all sharing the connection flags.
pub fn targets_from_flags(cli: &Cli, commands: &[String]) -> Vec<Target> {
    let ciphers = cli.ciphers.as_deref().map(split_list).unwrap_or_default();
    let platform = Platform::from(cli.platform.as_str());
    let key_file = cli
        .cert_key
        .as_ref()
        .map(|path| path.to_string_lossy().to_string())
        .unwrap_or_default();

    resolve_hosts(cli)
        .into_iter()
        .map(|host| {
            Target::new(host)
                .with_port(cli.port)
                .with_user(cli.user.clone())
                .with_password(cli.password.clone().unwrap_or_default())
                .with_key_file(key_file.clone())
                .with_ciphers(ciphers.clone())
                .with_commands(commands.to_vec())
                .with_platform(platform)
                .with_timeout(cli.timeout)
                .with_defaults()
        })
        .collect()
}
