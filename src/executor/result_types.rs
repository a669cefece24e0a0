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

//! Result types for parallel execution operations.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Terminal result of running one target.
///
/// `success` is true exactly when `error` is absent. Use the constructors
/// rather than building the struct by hand to keep the two in step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub host: String,
    #[serde(default)]
    pub cmd: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome {
    pub fn succeeded(host: impl Into<String>, cmd: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            cmd: cmd.into(),
            success: true,
            code: None,
            detail: Some(detail.into()),
            error: None,
        }
    }

    /// A failed outcome. An empty message is replaced so the error stays
    /// present on every failure.
    pub fn failed(host: impl Into<String>, cmd: impl Into<String>, error: impl Into<String>) -> Self {
        let mut error = error.into();
        if error.trim().is_empty() {
            error = "unknown error".to_string();
        }
        Self {
            host: host.into(),
            cmd: cmd.into(),
            success: false,
            code: None,
            detail: None,
            error: Some(error),
        }
    }

    /// Outcome recorded when the per-target deadline fires first.
    pub fn timed_out(host: impl Into<String>, timeout: Duration) -> Self {
        let secs = timeout.as_secs();
        let unit = if secs == 1 { "second" } else { "seconds" };
        Self::failed(host, "", format!("ssh run timeout in {secs} {unit}"))
    }

    pub fn with_code(mut self, code: Option<i32>) -> Self {
        self.code = code;
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Error text, empty for successful outcomes.
    pub fn error_text(&self) -> &str {
        self.error.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_has_no_error() {
        let outcome = Outcome::succeeded("10.0.0.1", "uptime && exit", "up 3 days\n");
        assert!(outcome.is_success());
        assert_eq!(outcome.error_text(), "");
        assert_eq!(outcome.detail.as_deref(), Some("up 3 days\n"));
    }

    #[test]
    fn test_failure_always_carries_error() {
        let outcome = Outcome::failed("10.0.0.1", "", "   ");
        assert!(!outcome.is_success());
        assert_eq!(outcome.error_text(), "unknown error");
        assert!(outcome.detail.is_none());
    }

    #[test]
    fn test_timed_out_message() {
        let outcome = Outcome::timed_out("10.0.0.1", Duration::from_secs(1));
        assert!(!outcome.success);
        assert_eq!(outcome.error_text(), "ssh run timeout in 1 second");

        let outcome = Outcome::timed_out("10.0.0.1", Duration::from_secs(30));
        assert!(outcome.error_text().contains("timeout"));
        assert!(outcome.error_text().ends_with("30 seconds"));
    }

    #[test]
    fn test_json_omits_absent_fields() {
        let outcome = Outcome::succeeded("10.0.0.1", "id && exit", "uid=0(root)");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["host"], "10.0.0.1");
        assert_eq!(json["success"], true);
        assert!(json.get("error").is_none());
        assert!(json.get("code").is_none());

        let outcome = Outcome::failed("10.0.0.2", "false && exit", "Process exited with status 1")
            .with_code(Some(1));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["code"], 1);
        assert!(json.get("detail").is_none());
    }
}
