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

//! IPv4 address-range expansion
//!
//! # Syntax
//!
//! A range argument is a `,` or `;` separated list of sub-expressions:
//! - Single host: `10.0.0.1` (passed through as-is, hostnames allowed)
//! - Inclusive span: `10.0.0.1-10.0.0.20`
//! - Network by prefix: `192.168.1.0/24` -> `.1` through `.254`
//! - Network by netmask: `192.168.1.0/255.255.255.0`
//! - Host route: `192.168.1.7/32` -> `192.168.1.7`
//!
//! Only IPv4 spans and networks are understood.
//!
//! # Examples
//!
//! ```rust
//! use fanout::hostlist::expand_ip_range;
//!
//! let ips = expand_ip_range("10.0.0.1-10.0.0.2,192.168.0.9/32");
//! assert_eq!(ips, vec!["10.0.0.1", "10.0.0.2", "192.168.0.9"]);
//! ```

mod error;
pub mod expander;
mod parser;

pub use error::RangeError;
pub use expander::{expand_ip_range, expand_range_expression, host_cycle};
pub use parser::{parse_range_expression, usable_hosts, RangeExpr};
