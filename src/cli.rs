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

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::executor::DEFAULT_MAX_PARALLEL;

#[derive(Parser, Debug)]
#[command(
    name = "fanout",
    version,
    about = "Run shell commands on many hosts over SSH in parallel",
    long_about = "fanout runs a list of shell commands on every target host over SSH.\nAt most --max-run-count hosts run at the same time and each host gets --timeout seconds.\nTargets come from --hosts, --ip-range or a YAML playbook; commands from --cmds or a YAML taskbook.",
    after_help = "EXAMPLES:\n  Run on two hosts:            fanout -H \"10.0.0.1;10.0.0.2\" -w secret -c \"uptime;df -h\"\n  Run on a whole subnet:       fanout -I 192.168.1.0/24 -k ~/.ssh/id_ed25519 -c hostname\n  Run from a playbook as JSON: fanout -p playbook.yaml -f json -o report.json\n  Network devices (shell):     fanout -H 10.1.1.1 -w secret -S other -t switch-tasks.yaml"
)]
pub struct Cli {
    #[arg(
        short = 'H',
        long,
        help = "Host list in the form HOST[;HOST]"
    )]
    pub hosts: Option<String>,

    #[arg(short = 'c', long, help = "Command list in the form CMD[;CMD]")]
    pub cmds: Option<String>,

    #[arg(
        short = 'C',
        long,
        help = "Cipher list in the form CIPHER[;CIPHER]\nUnsupported names are ignored; an empty list uses the built-in defaults"
    )]
    pub ciphers: Option<String>,

    #[arg(
        short = 'I',
        long,
        help = "Address range in the form IP-IP[;IP/NN][;IP/MASK]\nReplaces --hosts when given"
    )]
    pub ip_range: Option<String>,

    #[arg(short = 'u', long, default_value = "root", help = "SSH login user")]
    pub user: String,

    #[arg(short = 'w', long, help = "SSH login password, or key passphrase with --cert-key")]
    pub password: Option<String>,

    #[arg(short = 'k', long, help = "SSH private key file")]
    pub cert_key: Option<PathBuf>,

    #[arg(
        short = 'p',
        long,
        help = "Load targets from a YAML playbook\nReplaces every per-host flag"
    )]
    pub playbook: Option<PathBuf>,

    #[arg(
        short = 't',
        long,
        help = "Load commands from a YAML taskbook\nReplaces --cmds"
    )]
    pub taskbook: Option<PathBuf>,

    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Plain, help = "Report format")]
    pub format: OutputFormat,

    #[arg(
        short = 'S',
        long,
        default_value = "linux",
        help = "Target platform: linux runs commands as one exec request, anything else types them into a shell"
    )]
    pub platform: String,

    #[arg(
        short = 'o',
        long,
        default_value = "stdout",
        help = "Write the report to stdout or to FILE"
    )]
    pub output: String,

    #[arg(short = 's', long, default_value = "30", help = "Per-host timeout in seconds")]
    pub timeout: u64,

    #[arg(short = 'P', long, default_value = "22", help = "SSH port")]
    pub port: u16,

    #[arg(
        short = 'n',
        long,
        default_value_t = DEFAULT_MAX_PARALLEL,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..),
        help = "Maximum number of hosts running at the same time"
    )]
    pub max_run_count: usize,

    #[arg(
        long,
        default_value = "accept-any",
        help = "Host key verification (accept-any/known-hosts)\n  accept-any  - Accept every host key without recording it\n  known-hosts - Check against ~/.ssh/known_hosts (or --known-hosts FILE)"
    )]
    pub host_key_policy: String,

    #[arg(long, help = "known_hosts file used with --host-key-policy known-hosts")]
    pub known_hosts: Option<PathBuf>,

    #[arg(
        short = 'v',
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
}

impl Cli {
    /// Whether the report goes to standard output.
    pub fn writes_to_stdout(&self) -> bool {
        self.output.is_empty() || self.output.eq_ignore_ascii_case("stdout")
    }
}
