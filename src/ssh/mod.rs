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

pub mod auth;
pub mod ciphers;
pub mod error;
pub mod known_hosts;
pub mod session;
pub mod terminal_modes;

pub use auth::{authenticate, resolve_auth_method, AuthMethod};
pub use ciphers::{resolve_ciphers, DEFAULT_CIPHERS};
pub use error::SshError;
pub use known_hosts::{ClientHandler, HostKeyPolicy};
pub use session::{CapturedOutput, RemoteSession};
