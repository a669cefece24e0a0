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

use chrono::{DateTime, Local, SecondsFormat};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::cli::OutputFormat;
use crate::executor::Outcome;

const SEPARATOR: &str = "--------------------------------------------------------";

/// Everything the report shows about one run.
#[derive(Debug, Clone)]
pub struct Report {
    pub started: DateTime<Local>,
    pub finished: DateTime<Local>,
    pub host_count: usize,
    pub outcomes: Vec<Outcome>,
}

impl Report {
    pub fn elapsed(&self) -> Duration {
        (self.finished - self.started).to_std().unwrap_or_default()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Renders a [`Report`] as plain text or JSON.
pub struct OutputFormatter {
    format: OutputFormat,
    colored: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, colored: bool) -> Self {
        Self { format, colored }
    }

    pub fn format_report(&self, report: &Report) -> String {
        let mut output = String::new();

        output.push_str(&self.line("start:", &timestamp(&report.started)));
        output.push_str(&self.line("finished:", &timestamp(&report.finished)));
        output.push_str(&self.line("process time:", &format_duration(report.elapsed())));
        output.push_str(&self.line("number of hosts:", &report.host_count.to_string()));
        output.push_str(&self.heading("OUTPUT"));

        for outcome in &report.outcomes {
            output.push_str(&self.separator());
            match self.format {
                OutputFormat::Plain => output.push_str(&self.format_plain(outcome)),
                OutputFormat::Json => output.push_str(&self.format_json(outcome)),
            }
        }
        output.push_str(&self.separator());
        output.push_str(&self.format_summary(report.outcomes.len(), report.succeeded(), report.failed()));

        output
    }

    pub fn format_plain(&self, outcome: &Outcome) -> String {
        let mut output = String::new();
        output.push_str(&self.line("host:", &outcome.host));
        output.push_str(&self.line("cmd:", &outcome.cmd));
        if let Some(code) = outcome.code {
            output.push_str(&self.line("code:", &code.to_string()));
        }
        if let Some(detail) = &outcome.detail {
            if !detail.is_empty() {
                output.push_str(&self.line("detail:", &format!("{detail:?}")));
            }
        }
        if let Some(error) = &outcome.error {
            output.push_str(&self.line("error:", error));
        }
        output
    }

    pub fn format_json(&self, outcome: &Outcome) -> String {
        let mut output = self.line("host:", &outcome.host);
        match serde_json::to_string_pretty(outcome) {
            Ok(json) => {
                output.push_str(&self.label("result:"));
                output.push('\n');
                output.push_str(&self.value(&json));
                output.push('\n');
            }
            Err(e) => {
                tracing::warn!("Failed to serialize outcome for {}: {}", outcome.host, e);
                output = self.format_plain(outcome);
            }
        }
        output
    }

    pub fn format_summary(&self, total: usize, success: usize, failed: usize) -> String {
        if !self.colored {
            return format!("Summary: {total} hosts, {success} successful, {failed} failed\n");
        }

        let mut parts = vec![format!("{} hosts", total.to_string().bold())];
        if success > 0 {
            parts.push(format!(
                "{} {}",
                success.to_string().green().bold(),
                "successful".green()
            ));
        }
        if failed > 0 {
            parts.push(format!(
                "{} {}",
                failed.to_string().red().bold(),
                "failed".red()
            ));
        }
        format!("{}\n", format!("Summary: {}", parts.join(" • ")).bold())
    }

    fn line(&self, label: &str, value: &str) -> String {
        format!("{}\t{}\n", self.label(&format!("{label:<16}")), self.value(value))
    }

    fn label(&self, text: &str) -> String {
        if self.colored {
            text.blue().to_string()
        } else {
            text.to_string()
        }
    }

    fn value(&self, text: &str) -> String {
        if self.colored {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.colored {
            format!("{}\n", text.red().bold())
        } else {
            format!("{text}\n")
        }
    }

    fn separator(&self) -> String {
        format!("{}\n", self.label(SEPARATOR))
    }
}

fn timestamp(time: &DateTime<Local>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Format a Duration into a human-readable string
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs_f64();

    if total_seconds < 1.0 {
        // Less than 1 second: show in milliseconds
        format!("{:.1} ms", total_seconds * 1000.0)
    } else if total_seconds < 60.0 {
        format!("{total_seconds:.2} s")
    } else {
        let minutes = duration.as_secs() / 60;
        let seconds = duration.as_secs() % 60;
        let millis = duration.subsec_millis();

        if seconds == 0 {
            format!("{minutes}m")
        } else if millis > 0 {
            format!("{minutes}m {seconds}.{millis:03}s")
        } else {
            format!("{minutes}m {seconds}s")
        }
    }
}
