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

//! Address-range expansion through the public API.

use fanout::hostlist::{expand_ip_range, expand_range_expression, host_cycle};
use ipnetwork::Ipv4Network;
use std::collections::HashSet;
use std::net::Ipv4Addr;

#[test]
fn test_slash_24_yields_254_hosts() {
    let ips = expand_ip_range("192.168.1.0/24");
    assert_eq!(ips.len(), 254);
    assert_eq!(ips.first().map(String::as_str), Some("192.168.1.1"));
    assert_eq!(ips.last().map(String::as_str), Some("192.168.1.254"));
    assert!(!ips.iter().any(|ip| ip == "192.168.1.0" || ip == "192.168.1.255"));

    let unique: HashSet<_> = ips.iter().collect();
    assert_eq!(unique.len(), 254);
}

#[test]
fn test_slash_30_example() {
    assert_eq!(
        expand_ip_range("192.168.1.0/30"),
        vec!["192.168.1.1", "192.168.1.2"]
    );
}

#[test]
fn test_slash_32_is_single_address() {
    for ip in ["10.0.0.7", "172.16.5.200", "192.168.1.0"] {
        assert_eq!(expand_ip_range(&format!("{ip}/32")), vec![ip]);
    }
}

#[test]
fn test_equal_span_bounds_single_address() {
    for ip in ["10.0.0.7", "0.0.0.0", "255.255.255.255"] {
        assert_eq!(expand_ip_range(&format!("{ip}-{ip}")), vec![ip]);
    }
}

#[test]
fn test_netmask_matches_prefix() {
    assert_eq!(
        expand_ip_range("10.1.0.0/255.255.255.248"),
        expand_ip_range("10.1.0.0/29")
    );
}

#[test]
fn test_trailing_slash_stripped() {
    assert_eq!(expand_ip_range("10.0.0.5/"), vec!["10.0.0.5"]);
}

#[test]
fn test_mixed_argument_keeps_order_and_duplicates() {
    let ips = expand_ip_range("10.0.0.1-10.0.0.2;10.0.0.2,bad-range;192.168.9.0/30");
    assert_eq!(
        ips,
        vec![
            "10.0.0.1",
            "10.0.0.2",
            "10.0.0.2",
            "192.168.9.1",
            "192.168.9.2"
        ]
    );
}

#[test]
fn test_malformed_bounds_are_reported_but_skipped() {
    assert!(expand_ip_range("10.0.0.1-10.0.0.x").is_empty());
    assert!(expand_range_expression("10.0.0.1-10.0.0.x").is_err());
}

#[test]
fn test_large_ranges_enumerate_every_address() {
    let network = expand_ip_range("10.0.0.0/11");
    assert_eq!(network.len(), 2_097_150);
    assert_eq!(network[0], "10.0.0.1");
    assert_eq!(network[network.len() - 1], "10.31.255.254");

    let span = expand_ip_range("10.0.0.0-10.31.255.255");
    assert_eq!(span.len(), 2_097_152);
    assert_eq!(span[0], "10.0.0.0");
    assert_eq!(span[span.len() - 1], "10.31.255.255");
}

#[test]
fn test_host_cycle_is_rotation_from_first_host() {
    let network = Ipv4Network::new(Ipv4Addr::new(192, 168, 1, 0), 24).unwrap();
    let cycled: Vec<Ipv4Addr> = host_cycle(network).skip(253).take(3).collect();
    assert_eq!(
        cycled,
        vec![
            Ipv4Addr::new(192, 168, 1, 254),
            Ipv4Addr::new(192, 168, 1, 1),
            Ipv4Addr::new(192, 168, 1, 2),
        ]
    );
}
