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

//! Error types for address-range parsing

use thiserror::Error;

/// Errors that can occur while parsing a single range sub-expression
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    /// A range boundary or network address is not a dotted-quad IPv4 address
    #[error("invalid IPv4 address '{value}' in '{expression}'")]
    InvalidAddress { expression: String, value: String },

    /// Prefix length is not a number in 0..=32
    #[error("invalid prefix length '{value}' in '{expression}'")]
    InvalidPrefix { expression: String, value: String },

    /// Dotted netmask with non-contiguous bits (e.g., `255.0.255.0`)
    #[error("invalid netmask '{value}' in '{expression}'")]
    InvalidMask { expression: String, value: String },
}
