//! # Gapline - A Gap Buffer Editor
//!
//! Feeds input codes to an editor session and prints the resulting screen.
//!
//! ## Quick Start
//!
//! ```bash
//! # Type "hello", go back three characters, insert X
//! cargo run -- --keys 'hello^B^B^BX'
//!
//! # Same, showing where the gap sits in storage
//! cargo run -- --internals --keys 'hello^B^B^BX'
//!
//! # Read raw codes from stdin until EOF or C-q
//! printf 'abc\x11' | cargo run
//! ```

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gapline_core::{Config, Editor, KeyCode};

/// Gapline - a gap buffer editor driven by input codes
#[derive(Parser, Debug)]
#[command(name = "gapline")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input codes as text; `^X` is Ctrl-X and `^^` a literal caret
    #[arg(short, long, value_name = "KEYS")]
    keys: Option<String>,

    /// Config file (defaults to the user config directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show the storage layout under the text
    #[arg(short, long)]
    internals: bool,

    /// Cells added to storage whenever the gap runs out
    #[arg(short, long, value_name = "N")]
    growth: Option<usize>,

    /// Never write the bell character
    #[arg(long)]
    no_bell: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Loads the config file and applies command-line overrides.
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => Config::load(),
        };

        if self.internals {
            config.display.show_internals = true;
        }
        if let Some(growth) = self.growth {
            config.buffer.growth_increment = growth;
        }
        if self.no_bell {
            config.display.bell = false;
        }
        Ok(config)
    }
}

/// Decodes `--keys` text into input codes.
fn parse_keys(keys: &str) -> anyhow::Result<Vec<u32>> {
    let mut codes = Vec::with_capacity(keys.len());
    let mut chars = keys.chars();

    while let Some(c) = chars.next() {
        if c != '^' {
            codes.push(c as u32);
            continue;
        }
        match chars.next() {
            Some('^') => codes.push('^' as u32),
            Some(next) => match KeyCode::ctrl(next) {
                Some(key) => codes.push(key.0),
                None => bail!("`^{next}` is not a control key"),
            },
            None => bail!("dangling `^` at end of keys"),
        }
    }

    Ok(codes)
}

/// Reads raw input codes from stdin until EOF.
fn read_stdin_codes() -> anyhow::Result<Vec<u32>> {
    let mut bytes = Vec::new();
    std::io::stdin()
        .read_to_end(&mut bytes)
        .context("reading input from stdin")?;
    Ok(String::from_utf8_lossy(&bytes)
        .chars()
        .map(|c| c as u32)
        .collect())
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting gapline v{}", env!("CARGO_PKG_VERSION"));

    let config = args.config()?;
    let ring_bell = config.display.bell;
    let mut editor = Editor::with_config(config);

    let codes = match &args.keys {
        Some(keys) => parse_keys(keys)?,
        None => read_stdin_codes()?,
    };

    let mut stderr = std::io::stderr();
    for code in codes {
        let eval = editor
            .evaluate(code)
            .map_err(|e| anyhow::anyhow!("Editor error: {}", e))?;
        if eval.bell && ring_bell {
            stderr.write_all(b"\x07")?;
        }
        if eval.exit {
            tracing::info!("quit requested");
            break;
        }
    }

    let frame = editor.render()?;
    println!("{frame}");

    Ok(())
}
