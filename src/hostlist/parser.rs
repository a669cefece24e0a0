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

//! Parser for address-range sub-expressions
//!
//! A sub-expression is one of:
//! - `A-B`: every address from `A` to `B` inclusive
//! - `A/N` or `A/255.255.255.0`: the usable hosts of a network
//! - anything else: a literal host, passed through untouched

use ipnetwork::{ipv4_mask_to_prefix, Ipv4Network};
use std::net::Ipv4Addr;

use super::error::RangeError;

/// A parsed range sub-expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeExpr {
    /// Literal host string. Not validated; it may be a hostname.
    Single(String),
    /// Inclusive start-end span. `start > end` denotes nothing.
    Span { start: Ipv4Addr, end: Ipv4Addr },
    /// Network with prefix length below 32.
    Network(Ipv4Network),
}

impl RangeExpr {
    /// Number of addresses this expression expands to.
    pub fn address_count(&self) -> u64 {
        match self {
            RangeExpr::Single(_) => 1,
            RangeExpr::Span { start, end } => {
                let (start, end) = (u32::from(*start) as u64, u32::from(*end) as u64);
                if start > end {
                    0
                } else {
                    end - start + 1
                }
            }
            RangeExpr::Network(network) => usable_hosts(network),
        }
    }
}

/// Network size minus the network and broadcast addresses.
pub fn usable_hosts(network: &Ipv4Network) -> u64 {
    let size = 1u64 << (32 - u32::from(network.prefix()));
    size.saturating_sub(2)
}

/// Parse one sub-expression (no `,` or `;` separators).
pub fn parse_range_expression(expr: &str) -> Result<RangeExpr, RangeError> {
    let trimmed = expr.trim().trim_end_matches('/');

    if let Some((start, end)) = trimmed.split_once('-') {
        return Ok(RangeExpr::Span {
            start: parse_ipv4(trimmed, start)?,
            end: parse_ipv4(trimmed, end)?,
        });
    }

    if let Some((addr, suffix)) = trimmed.split_once('/') {
        let suffix = suffix.trim();
        if suffix == "32" {
            return Ok(RangeExpr::Single(addr.to_string()));
        }

        let prefix = parse_prefix(trimmed, suffix)?;
        let addr = parse_ipv4(trimmed, addr)?;
        if prefix == 32 {
            return Ok(RangeExpr::Single(addr.to_string()));
        }

        let network = Ipv4Network::new(addr, prefix).map_err(|_| RangeError::InvalidPrefix {
            expression: trimmed.to_string(),
            value: suffix.to_string(),
        })?;
        return Ok(RangeExpr::Network(network));
    }

    Ok(RangeExpr::Single(trimmed.to_string()))
}

fn parse_ipv4(expression: &str, value: &str) -> Result<Ipv4Addr, RangeError> {
    value
        .trim()
        .parse::<Ipv4Addr>()
        .map_err(|_| RangeError::InvalidAddress {
            expression: expression.to_string(),
            value: value.trim().to_string(),
        })
}

/// Accepts either a prefix length (`24`) or a dotted netmask (`255.255.255.0`).
fn parse_prefix(expression: &str, suffix: &str) -> Result<u8, RangeError> {
    if suffix.contains('.') {
        let mask = suffix
            .parse::<Ipv4Addr>()
            .map_err(|_| RangeError::InvalidMask {
                expression: expression.to_string(),
                value: suffix.to_string(),
            })?;
        return ipv4_mask_to_prefix(mask).map_err(|_| RangeError::InvalidMask {
            expression: expression.to_string(),
            value: suffix.to_string(),
        });
    }

    match suffix.parse::<u8>() {
        Ok(prefix) if prefix <= 32 => Ok(prefix),
        _ => Err(RangeError::InvalidPrefix {
            expression: expression.to_string(),
            value: suffix.to_string(),
        }),
    }
}
