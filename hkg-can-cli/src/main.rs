//! HKG CAN Encoder CLI Application
//!
//! Command-line front end for the hkg-can-encoder library. It replays a
//! scripted session of control cycles through the encoder and prints the
//! resulting frames:
//! - LKAS11, CLU11, LFAHDA_MFC and MDPS12 on top of carried-forward snapshots
//! - The ACC command set and, periodically, the ACC option frames
//! - candump-style or JSON-lines output (JSON lines carry the message name and DLC)

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hkg_can_encoder::{CanFrame, DbcPacker, Encoder, HYUNDAI_KIA_GENERIC_DBC};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

mod config;
mod replay;

use replay::{Replay, SnapshotPacker};

/// HKG CAN Encoder - Build Hyundai/Kia/Genesis control frames
#[derive(Parser, Debug)]
#[command(name = "hkg-can-cli")]
#[command(about = "Replay a scripted session through the HKG CAN encoder", long_about = None)]
#[command(version)]
struct Args {
    /// Path to DBC file(s) (can be repeated; default: bundled layouts)
    #[arg(long, value_name = "FILE")]
    dbc: Vec<PathBuf>,

    /// Path to the session file (session.toml)
    #[arg(short, long, value_name = "FILE")]
    session: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Candump)]
    format: OutputFormat,

    /// Maximum number of cycles to replay (for testing)
    #[arg(long, value_name = "COUNT")]
    max_cycles: Option<usize>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `(cycle) canN ID#DATA`
    Candump,
    /// One JSON object per frame
    Json,
}

/// A frame tagged with the cycle that produced it
#[derive(Serialize)]
struct EmittedFrame<'a> {
    cycle: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    dlc: usize,
    #[serde(flatten)]
    frame: &'a CanFrame,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("HKG CAN Encoder CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using encoder library v{}", hkg_can_encoder::VERSION);

    let packer = load_packer(&args.dbc)?;
    let stats = packer.database_stats();
    log::info!("Signal database: {} messages, {} signals", stats.num_messages, stats.num_signals);
    log::debug!("Loaded CAN IDs: {:?}", packer.message_ids());

    let session = config::load_session(&args.session)?;
    let encoder = Encoder::new(SnapshotPacker::new(packer), session.session.clone());
    let mut replay = Replay::new(encoder, session.snapshots.clone());

    let limit = args.max_cycles.unwrap_or(usize::MAX);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut emitted = 0usize;

    for (index, cycle) in session.expanded_cycles().take(limit).enumerate() {
        let frame = index as u64;
        let frames = replay
            .run_cycle(frame, cycle)
            .with_context(|| format!("Cycle {} failed", frame))?;

        let layouts = replay.encoder().packer().inner();
        for can_frame in &frames {
            let name = layouts.message_by_id(can_frame.can_id).map(|m| m.name.as_str());
            write_frame(&mut out, args.format, frame, name, can_frame)?;
        }
        emitted += frames.len();
    }

    log::info!("Emitted {} frames", emitted);
    Ok(())
}

/// Load every DBC given on the command line, or the bundled layouts
fn load_packer(paths: &[PathBuf]) -> Result<DbcPacker> {
    if paths.is_empty() {
        log::info!("No --dbc given, using bundled layouts");
        return DbcPacker::from_dbc_str(HYUNDAI_KIA_GENERIC_DBC)
            .context("Failed to load bundled DBC");
    }

    let mut packer = DbcPacker::new();
    for path in paths {
        packer
            .add_dbc(path)
            .with_context(|| format!("Error loading DBC: {:?}", path))?;
    }
    Ok(packer)
}

fn write_frame(
    out: &mut impl Write,
    format: OutputFormat,
    cycle: u64,
    name: Option<&str>,
    frame: &CanFrame,
) -> Result<()> {
    match format {
        OutputFormat::Candump => writeln!(out, "({:06}) can{} {}", cycle, frame.bus, frame)?,
        OutputFormat::Json => {
            let line = serde_json::to_string(&EmittedFrame {
                cycle,
                name,
                dlc: frame.dlc(),
                frame,
            })?;
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
