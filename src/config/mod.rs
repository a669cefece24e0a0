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

//! Playbook documents for fanout.
//!
//! A playbook is a YAML sequence of host records:
//!
//! ```yaml
//! - ip: 10.0.0.1
//!   user: admin
//!   password: secret
//!   tasks: [uptime, "df -h"]
//! - ip: 10.0.0.2
//!   cert-key: ~/.ssh/id_ed25519
//!   taskbook: ./switch-tasks.yaml
//!   platform: other
//! ```
//!
//! A taskbook is a YAML sequence of command strings.

mod playbook;
mod utils;

// Re-export public types
pub use playbook::{load_taskbook, Playbook, PlaybookEntry};
pub use utils::{expand_tilde, split_list};
