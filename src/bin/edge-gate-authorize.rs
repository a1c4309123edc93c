//! Evaluates one invocation event against the edge gate.
//!
//! Reads the event JSON from stdin (or `--event <file>`), prints the decision
//! JSON on stdout, and logs to stderr. The secret comes from
//! `CLOUDFRONT_SECRET`.
//!
//! ```text
//! echo '{"headers":{"x-cloudfront-secret":"s3cr3t"}}' \
//!   | CLOUDFRONT_SECRET=s3cr3t edge-gate-authorize --mode boolean
//! ```

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use edge_origin_gate::handler::{handle_event, process_gate};
use edge_origin_gate::{DecisionMode, GateError};
use serde_json::Value;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "edge-gate-authorize")]
#[command(about = "Check that a request event carries the trusted edge secret", long_about = None)]
struct Cli {
    /// Decision encoding: boolean or policy
    #[arg(short, long, env = "EDGE_GATE_MODE", default_value = "boolean")]
    mode: DecisionMode,

    /// Read the event from this file instead of stdin
    #[arg(short, long)]
    event: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let gate = process_gate();

    let raw = match read_input(cli.event.as_ref()) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "could not read event");
            return ExitCode::from(2);
        }
    };

    let event: Value = match serde_json::from_str(&raw) {
        Ok(event) => event,
        Err(err) => {
            let decision = gate.reject(
                GateError::MalformedInput(format!("event is not JSON: {err}")),
                None,
                cli.mode,
            );
            println!("{}", serde_json::to_string(&decision).unwrap_or_default());
            return ExitCode::from(2);
        }
    };

    let response = handle_event(&event, gate, cli.mode);
    println!("{response}");
    ExitCode::SUCCESS
}

fn read_input(path: Option<&PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading event file {}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("reading event from stdin")?;
            Ok(raw)
        }
    }
}
