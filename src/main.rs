//! maskfield - apply input masks from the command line.
//!
//! `mask` formats values; `replay` drives a simulated text field through a
//! TOML session of keystrokes, pastes and caret moves.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mask_core::{MaskConfig, MaskModifiers};
use r3bl_simple_logger::{Config, LevelFilter, WriteLogger};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

mod session;

/// Apply input masks to text values
#[derive(Parser, Debug)]
#[command(name = "maskfield", version, about, long_about = None)]
struct Cli {
    /// Log more (-v debug, -vv trace); overrides MASKFIELD_LOG
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Mask each VALUE (or each stdin line) and print `masked<TAB>unmasked`
    Mask {
        /// Mask pattern: `#` digit, `A` letter, `*` letter or digit
        #[arg(short, long)]
        pattern: String,

        /// Trim trailing literals after the last filled slot
        #[arg(long)]
        short: bool,

        /// Show leading literals even for empty input
        #[arg(long)]
        prefill: bool,

        /// Values to mask; read from stdin when absent
        #[arg(value_name = "VALUE")]
        values: Vec<String>,
    },
    /// Replay a TOML edit session against a simulated field
    Replay {
        /// Session file
        #[arg(value_name = "SESSION")]
        session: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Mask {
            pattern,
            short,
            prefill,
            values,
        } => run_mask(pattern, MaskModifiers { short, prefill }, values),
        Commands::Replay { session } => run_replay(&session),
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => std::env::var("MASKFIELD_LOG")
            .ok()
            .and_then(|raw| raw.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Warn),
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // stdout carries results; logs go to stderr.
    WriteLogger::init(level, Config::default(), io::stderr())
        .context("failed to install logger")
}

fn run_mask(pattern: String, modifiers: MaskModifiers, values: Vec<String>) -> Result<()> {
    let config = MaskConfig::new(pattern, modifiers);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut emit = |value: &str| -> Result<()> {
        let result = config.apply(value);
        writeln!(out, "{}\t{}", result.masked, result.unmasked).context("failed to write output")
    };

    if values.is_empty() {
        for line in io::stdin().lock().lines() {
            emit(&line.context("failed to read stdin")?)?;
        }
    } else {
        for value in &values {
            emit(value)?;
        }
    }
    Ok(())
}

fn run_replay(path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read session {}", path.display()))?;
    let session: session::Session = toml::from_str(&text)
        .with_context(|| format!("failed to parse session {}", path.display()))?;

    let report = session::replay(&session)
        .with_context(|| format!("session {} could not be replayed", path.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in &report.steps {
        writeln!(out, "{line}").context("failed to write output")?;
    }

    if !report.failures.is_empty() {
        for failure in &report.failures {
            log::error!("{failure}");
        }
        anyhow::bail!(
            "{} expectation(s) failed in {}",
            report.failures.len(),
            path.display()
        );
    }
    Ok(())
}
