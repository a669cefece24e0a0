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

//! Cipher preference list negotiated with each host.

use russh::cipher;

/// Ciphers offered when a target does not list its own, in preference order.
///
/// CTR modes come first, CBC modes last for older appliances that only
/// speak those.
pub const DEFAULT_CIPHERS: &[&str] = &[
    "aes128-ctr",
    "aes192-ctr",
    "aes256-ctr",
    "aes256-gcm@openssh.com",
    "chacha20-poly1305@openssh.com",
    "aes128-cbc",
    "aes192-cbc",
    "aes256-cbc",
];

fn lookup(name: &str) -> Option<cipher::Name> {
    match name {
        "aes128-ctr" => Some(cipher::AES_128_CTR),
        "aes192-ctr" => Some(cipher::AES_192_CTR),
        "aes256-ctr" => Some(cipher::AES_256_CTR),
        "aes256-gcm@openssh.com" => Some(cipher::AES_256_GCM),
        "chacha20-poly1305@openssh.com" => Some(cipher::CHACHA20_POLY1305),
        "aes128-cbc" => Some(cipher::AES_128_CBC),
        "aes192-cbc" => Some(cipher::AES_192_CBC),
        "aes256-cbc" => Some(cipher::AES_256_CBC),
        _ => None,
    }
}

/// Map a target's cipher list onto the ciphers the transport implements.
///
/// An empty list means [`DEFAULT_CIPHERS`]. Names the transport does not
/// implement are dropped with a warning; if nothing is left the defaults
/// are used instead.
pub fn resolve_ciphers(requested: &[String]) -> Vec<cipher::Name> {
    if requested.is_empty() {
        return default_ciphers();
    }

    let resolved: Vec<cipher::Name> = requested
        .iter()
        .filter_map(|name| {
            let name = name.trim();
            let found = lookup(name);
            if found.is_none() {
                tracing::warn!("Ignoring unsupported cipher '{}'", name);
            }
            found
        })
        .collect();

    if resolved.is_empty() {
        tracing::warn!("No supported cipher in {:?}, using defaults", requested);
        return default_ciphers();
    }
    resolved
}

fn default_ciphers() -> Vec<cipher::Name> {
    DEFAULT_CIPHERS.iter().filter_map(|name| lookup(name)).collect()
}
