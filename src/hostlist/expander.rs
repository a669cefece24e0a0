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

//! Address-range expansion implementation
//!
//! This module turns parsed range sub-expressions into flat lists of
//! dotted-quad addresses.

use ipnetwork::Ipv4Network;
use std::net::Ipv4Addr;

use super::error::RangeError;
use super::parser::{parse_range_expression, usable_hosts, RangeExpr};

/// Expand a range argument into the list of addresses it denotes
///
/// The argument is split on `,` and `;`; each sub-expression is expanded
/// independently and the results are concatenated in input order.
/// Duplicates across sub-expressions are kept.
///
/// A sub-expression that fails to parse contributes nothing and does not
/// affect its neighbours.
///
/// # Examples
///
/// ```rust
/// use fanout::hostlist::expand_ip_range;
///
/// let ips = expand_ip_range("192.168.1.0/30");
/// assert_eq!(ips, vec!["192.168.1.1", "192.168.1.2"]);
///
/// let ips = expand_ip_range("10.0.0.1-10.0.0.3;10.0.0.9");
/// assert_eq!(ips, vec!["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.9"]);
/// ```
pub fn expand_ip_range(expr: &str) -> Vec<String> {
    let mut addresses = Vec::new();

    for part in split_range_argument(expr) {
        match expand_range_expression(part) {
            Ok(expanded) => addresses.extend(expanded),
            Err(e) => {
                tracing::warn!("Skipping range expression: {}", e);
            }
        }
    }

    addresses
}

/// Expand one sub-expression, reporting why it produced nothing
pub fn expand_range_expression(expr: &str) -> Result<Vec<String>, RangeError> {
    let range = parse_range_expression(expr)?;
    let count = range.address_count();

    Ok(match range {
        RangeExpr::Single(host) => vec![host],
        RangeExpr::Span { start, end } => (u32::from(start)..=u32::from(end))
            .map(|n| Ipv4Addr::from(n).to_string())
            .collect(),
        RangeExpr::Network(network) => host_cycle(network)
            .take(count as usize)
            .map(|ip| ip.to_string())
            .collect(),
    })
}

/// Endless rotation over a network's usable hosts
///
/// Starts at network address + 1 and wraps back there after the last
/// address below broadcast. Yields nothing for /31 and /32.
pub fn host_cycle(network: Ipv4Network) -> impl Iterator<Item = Ipv4Addr> {
    let base = u32::from(network.network());
    (0..usable_hosts(&network))
        .cycle()
        .map(move |offset| Ipv4Addr::from(base.wrapping_add(offset as u32 + 1)))
}

/// Split on `,` and `;`, dropping empty pieces
fn split_range_argument(expr: &str) -> impl Iterator<Item = &str> {
    expr.split([',', ';'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
}
