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

//! Playbook and taskbook loading.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

use super::utils::expand_tilde;
use crate::target::Target;

/// One record of a playbook: a target plus an optional taskbook reference.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaybookEntry {
    #[serde(flatten)]
    pub target: Target,
    /// Path to a taskbook replacing the inline `tasks`.
    #[serde(default)]
    pub taskbook: String,
}

/// A parsed playbook with every taskbook already resolved.
#[derive(Debug, Clone, Default)]
pub struct Playbook {
    pub targets: Vec<Target>,
}

impl Playbook {
    /// Load a playbook and the taskbooks its records name.
    ///
    /// Any read or parse failure aborts the whole load.
    pub async fn load(path: &Path) -> Result<Self> {
        let expanded_path = expand_tilde(path);

        let content = fs::read_to_string(&expanded_path)
            .await
            .with_context(|| format!("Failed to read playbook at {}", expanded_path.display()))?;

        let entries = Self::parse(&content)
            .with_context(|| format!("Failed to parse playbook at {}", expanded_path.display()))?;

        let mut targets = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut target = entry.target;
            if !entry.taskbook.is_empty() {
                target.commands = load_taskbook(Path::new(&entry.taskbook)).await?;
            }
            targets.push(target.with_defaults());
        }

        tracing::debug!(
            "Loaded {} target(s) from {:?}",
            targets.len(),
            expanded_path
        );

        Ok(Self { targets })
    }

    /// Parse playbook text into records without touching taskbooks.
    pub fn parse(content: &str) -> Result<Vec<PlaybookEntry>> {
        // An empty document is an empty playbook, not an error.
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let entries: Vec<PlaybookEntry> = serde_yaml::from_str(content)?;
        Ok(entries)
    }
}

/// Load a taskbook: a YAML sequence of command strings.
pub async fn load_taskbook(path: &Path) -> Result<Vec<String>> {
    let expanded_path = expand_tilde(path);

    let content = fs::read_to_string(&expanded_path)
        .await
        .with_context(|| format!("Failed to read taskbook at {}", expanded_path.display()))?;

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let tasks: Vec<String> = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse taskbook at {}", expanded_path.display()))?;

    Ok(tasks)
}
