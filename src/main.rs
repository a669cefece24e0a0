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

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::io::{IsTerminal, Write};

use fanout::{
    app::{AppContext, ReportSink},
    cli::Cli,
    executor::ParallelExecutor,
    ui::{OutputFormatter, Report},
    utils::init_logging,
};

/// Show concise usage message
fn show_usage() {
    println!("usage: fanout [-H hosts | -I ip-range | -p playbook] [-c cmds | -t taskbook]");
    println!("              [-u user] [-w password] [-k cert-key] [-P port] [-C ciphers]");
    println!("              [-S linux|other] [-s timeout] [-n max-run-count]");
    println!("              [-f plain|json] [-o stdout|FILE] [-v]");
    println!();
    println!("For more information, try 'fanout --help'");
}

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().len() == 1 {
        show_usage();
        return Ok(());
    }

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = AppContext::from_cli(&cli).await?;

    if ctx.targets.is_empty() {
        anyhow::bail!(
            "No hosts specified. Please use one of the following options:\n  -H <hosts>     Hosts separated by ';' (e.g., -H \"10.0.0.1;10.0.0.2\")\n  -I <ip-range>  Address range (e.g., -I 192.168.1.0/24)\n  -p <playbook>  YAML playbook listing the hosts"
        );
    }

    let host_count = ctx.targets.len();
    let executor = ParallelExecutor::new(ctx.targets, ctx.max_parallel)
        .with_host_key_policy(ctx.host_key_policy);

    let started = Local::now();
    let outcomes = executor.play().await;
    let finished = Local::now();

    let report = Report {
        started,
        finished,
        host_count,
        outcomes,
    };

    match &ctx.sink {
        ReportSink::Stdout => {
            let colored = std::io::stdout().is_terminal();
            let text = OutputFormatter::new(ctx.format, colored).format_report(&report);
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .context("Failed to write report to stdout")?;
            stdout.flush().context("Failed to flush stdout")?;
        }
        ReportSink::File(path) => {
            let text = OutputFormatter::new(ctx.format, false).format_report(&report);
            tokio::fs::write(path, text)
                .await
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            tracing::info!("Report written to {:?}", path);
        }
    }

    Ok(())
}
