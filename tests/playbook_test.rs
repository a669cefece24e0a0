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

//! Playbook-driven runs, from the command line to the target list.

use clap::Parser;
use fanout::app::{resolve_targets, AppContext};
use fanout::{Cli, Platform};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path.to_string_lossy().to_string()
}

#[tokio::test]
async fn test_playbook_replaces_host_flags() {
    let dir = TempDir::new().unwrap();
    let taskbook = write(&dir, "switch.yaml", "- display version\n- display interface brief\n");
    let playbook = write(
        &dir,
        "playbook.yaml",
        &format!(
            r#"
- ip: 10.0.0.1
  password: secret
  tasks: [uptime]
- ip: 10.0.0.254
  user: admin
  password: secret
  platform: other
  taskbook: {taskbook}
  timeout: 20
"#
        ),
    );

    let cli = Cli::parse_from(["fanout", "-H", "192.168.7.7", "-c", "ignored", "-p", &playbook]);
    let targets = resolve_targets(&cli).await.unwrap();

    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0].address, "10.0.0.1");
    assert_eq!(targets[0].commands, vec!["uptime"]);
    assert_eq!(targets[0].platform, Platform::Posix);

    assert_eq!(targets[1].user, "admin");
    assert_eq!(targets[1].platform, Platform::Other);
    assert_eq!(
        targets[1].commands,
        vec!["display version", "display interface brief"]
    );
    assert_eq!(targets[1].timeout, 20);
}

#[tokio::test]
async fn test_broken_playbook_is_fatal() {
    let dir = TempDir::new().unwrap();
    let playbook = write(&dir, "playbook.yaml", "- ip: [unterminated\n");

    let cli = Cli::parse_from(["fanout", "-p", &playbook]);
    assert!(AppContext::from_cli(&cli).await.is_err());
}

#[tokio::test]
async fn test_taskbook_replaces_cmds_flag() {
    let dir = TempDir::new().unwrap();
    let taskbook = write(&dir, "tasks.yaml", "- hostname\n");

    let cli = Cli::parse_from([
        "fanout", "-H", "10.0.0.1;10.0.0.2", "-w", "pw", "-c", "uptime", "-t", &taskbook,
    ]);
    let targets = resolve_targets(&cli).await.unwrap();

    assert_eq!(targets.len(), 2);
    assert!(targets.iter().all(|t| t.commands == vec!["hostname"]));
}
