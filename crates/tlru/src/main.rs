//! tlru - replay cache operation scripts against tinylru

mod replay;
mod script;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::replay::Replayer;
use crate::script::{parse_script, DEMO_CAPACITY, DEMO_SCRIPT};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity (number of entries)
    #[arg(short, long, default_value_t = DEMO_CAPACITY)]
    capacity: usize,

    /// Operation script; runs the built-in demo when omitted
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Emit one JSON object per step
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for --json
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let args = Args::parse();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&args, &mut out)
}

fn run<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    info!("Starting tlru v{}", env!("CARGO_PKG_VERSION"));

    let source = match &args.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?,
        None => {
            info!("No script given, replaying built-in demo");
            DEMO_SCRIPT.to_string()
        }
    };

    let ops = parse_script(&source)?;
    if ops.is_empty() {
        warn!("Script contains no operations");
    }

    let mut replayer = Replayer::new(args.capacity)?;
    info!(ops = ops.len(), capacity = args.capacity, "Replaying script");

    for step in replayer.run(&ops) {
        if args.json {
            serde_json::to_writer(&mut *out, &step)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", step)?;
        }
    }

    let summary = replayer.summary();
    if args.json {
        serde_json::to_writer(&mut *out, &summary)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", summary)?;
    }

    info!(
        size = summary.size,
        hit_ratio = summary.hit_ratio,
        "Replay finished"
    );
    Ok(())
}
