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

//! SSH strategy failure paths that need no SSH server.

use fanout::executor::{play, ExecutionStrategy};
use fanout::ssh::HostKeyPolicy;
use fanout::{Platform, Target};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

/// A local port with nothing listening on it.
async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

#[tokio::test]
async fn test_connection_refused_is_connect_failure() {
    let target = Target::new("127.0.0.1")
        .with_port(closed_port().await)
        .with_password("secret")
        .with_commands(vec!["uptime".to_string()])
        .with_timeout(5);

    let outcome = ExecutionStrategy::Batch
        .run(&target, &HostKeyPolicy::AcceptAny)
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.host, "127.0.0.1");
    assert_eq!(outcome.cmd, "uptime && exit");
    assert_eq!(outcome.code, Some(-1));
    assert!(outcome.error_text().starts_with("dial 127.0.0.1:"));
}

#[tokio::test]
async fn test_unreadable_key_file_fails_before_dial() {
    let target = Target::new("127.0.0.1")
        .with_key_file("/nonexistent/fanout/id_ed25519")
        .with_platform(Platform::Other);

    let outcome = ExecutionStrategy::for_target(&target)
        .run(&target, &HostKeyPolicy::AcceptAny)
        .await;

    assert!(!outcome.success);
    assert!(outcome.error_text().contains("failed to read key file"));
}

#[tokio::test]
async fn test_silent_server_hits_connect_timeout() {
    // Accepts TCP but never speaks SSH, so the handshake stalls.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let _server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    let target = Target::new("127.0.0.1")
        .with_port(port)
        .with_password("secret")
        .with_timeout(1);

    let start = Instant::now();
    let outcomes = play(vec![target], 1).await;

    assert!(start.elapsed() < Duration::from_secs(4));
    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].success);
    assert!(outcomes[0].error_text().contains("timeout"));
}
