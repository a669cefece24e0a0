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

//! Core parallel executor implementation.
//!
//! Each target gets its own task. A semaphore bounds how many strategies
//! run at once, and every strategy is raced against its target's timeout.
//! The race loser is detached, not aborted: a strategy that outlives its
//! deadline keeps its semaphore slot until it returns on its own.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

use crate::ssh::HostKeyPolicy;
use crate::target::Target;

use super::execution_strategy::ExecutionStrategy;
use super::result_types::Outcome;

/// Default number of hosts running at the same time.
pub const DEFAULT_MAX_PARALLEL: usize = 20;

/// Runs one target to completion and reports its outcome.
///
/// Implementations must not panic on per-target failures; every error
/// belongs in the returned [`Outcome`].
#[async_trait]
pub trait TargetRunner: Send + Sync {
    async fn run(&self, target: &Target) -> Outcome;
}

/// Runner that reaches targets over SSH with the strategy their platform selects.
#[derive(Debug, Clone, Default)]
pub struct SshRunner {
    policy: HostKeyPolicy,
}

impl SshRunner {
    pub fn new(policy: HostKeyPolicy) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl TargetRunner for SshRunner {
    async fn run(&self, target: &Target) -> Outcome {
        if target.address.is_empty() {
            return Outcome::failed("", "", "target has no address");
        }
        ExecutionStrategy::for_target(target)
            .run(target, &self.policy)
            .await
    }
}

/// Parallel executor for running command lists across many targets.
pub struct ParallelExecutor {
    pub(crate) targets: Vec<Target>,
    pub(crate) max_parallel: usize,
    pub(crate) runner: Arc<dyn TargetRunner>,
}

impl ParallelExecutor {
    /// Create an executor that reaches targets over SSH, accepting any host key.
    pub fn new(targets: Vec<Target>, max_parallel: usize) -> Self {
        Self {
            targets,
            max_parallel: max_parallel.max(1),
            runner: Arc::new(SshRunner::default()),
        }
    }

    /// Set how server host keys are verified.
    pub fn with_host_key_policy(mut self, policy: HostKeyPolicy) -> Self {
        self.runner = Arc::new(SshRunner::new(policy));
        self
    }

    /// Replace the per-target runner.
    pub fn with_runner(mut self, runner: Arc<dyn TargetRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    /// Run every target and return one outcome per target, in completion order.
    ///
    /// Submission blocks while all slots are taken. The returned collection is
    /// only available once every target has finished or timed out.
    pub async fn play(&self) -> Vec<Outcome> {
        let semaphore = Arc::new(Semaphore::new(self.max_parallel));
        let (tx, mut rx) = mpsc::unbounded_channel();

        tracing::info!(
            "Playing {} target(s) with up to {} in parallel",
            self.targets.len(),
            self.max_parallel
        );

        for target in &self.targets {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    let _ = tx.send(Outcome::failed(
                        target.address.clone(),
                        "",
                        format!("Semaphore acquisition failed: {e}"),
                    ));
                    continue;
                }
            };

            let target = target.clone();
            let runner = Arc::clone(&self.runner);
            let tx = tx.clone();

            tokio::spawn(async move {
                let host = target.address.clone();
                let deadline = target.timeout_duration();

                let strategy = tokio::spawn(async move {
                    let outcome = runner.run(&target).await;
                    drop(permit);
                    outcome
                });

                let outcome = match tokio::time::timeout(deadline, strategy).await {
                    Ok(Ok(outcome)) => outcome,
                    Ok(Err(e)) => {
                        tracing::error!("Execution task for {} failed: {}", host, e);
                        Outcome::failed(host, "", format!("execution task failed: {e}"))
                    }
                    Err(_) => {
                        tracing::warn!("{} did not finish within {:?}", host, deadline);
                        Outcome::timed_out(host, deadline)
                    }
                };

                let _ = tx.send(outcome);
            });
        }
        drop(tx);

        let mut outcomes = Vec::with_capacity(self.targets.len());
        while let Some(outcome) = rx.recv().await {
            if outcome.host.is_empty() {
                tracing::warn!("Dropping outcome without a host address");
                continue;
            }
            outcomes.push(outcome);
        }

        tracing::info!(
            "Finished {} target(s): {} succeeded",
            outcomes.len(),
            outcomes.iter().filter(|o| o.is_success()).count()
        );
        outcomes
    }
}

/// Run `targets` over SSH with at most `limit` in flight.
pub async fn play(targets: Vec<Target>, limit: usize) -> Vec<Outcome> {
    ParallelExecutor::new(targets, limit).play().await
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoRunner;

    #[async_trait]
    impl TargetRunner for EchoRunner {
        async fn run(&self, target: &Target) -> Outcome {
            Outcome::succeeded(target.address.clone(), target.commands.join(";"), "done")
        }
    }

    struct PanicRunner;

    #[async_trait]
    impl TargetRunner for PanicRunner {
        async fn run(&self, _target: &Target) -> Outcome {
            panic!("runner blew up");
        }
    }

    #[test]
    fn test_limit_is_at_least_one() {
        let executor = ParallelExecutor::new(vec![], 0);
        assert_eq!(executor.max_parallel(), 1);
    }

    #[tokio::test]
    async fn test_one_outcome_per_target() {
        let targets = vec![Target::new("10.0.0.1"), Target::new("10.0.0.2")];
        let outcomes = ParallelExecutor::new(targets, 4)
            .with_runner(Arc::new(EchoRunner))
            .play()
            .await;

        let mut hosts: Vec<_> = outcomes.iter().map(|o| o.host.as_str()).collect();
        hosts.sort();
        assert_eq!(hosts, vec!["10.0.0.1", "10.0.0.2"]);
    }

    #[tokio::test]
    async fn test_empty_target_list() {
        let outcomes = ParallelExecutor::new(vec![], 4)
            .with_runner(Arc::new(EchoRunner))
            .play()
            .await;
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_panicking_runner_becomes_failure() {
        let outcomes = ParallelExecutor::new(vec![Target::new("10.0.0.9")], 1)
            .with_runner(Arc::new(PanicRunner))
            .play()
            .await;
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].success);
        assert_eq!(outcomes[0].host, "10.0.0.9");
    }

    #[tokio::test]
    async fn test_ssh_runner_rejects_empty_address() {
        let outcome = SshRunner::default().run(&Target::default()).await;
        assert!(outcome.host.is_empty());
        assert!(!outcome.success);
    }
}
