//! strcache - replay a command script against an LRU cache

mod handler;
mod script;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use strcache::SharedCache;
use tracing::{debug, info, warn};

use crate::handler::CommandHandler;
use crate::script::parse_command;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity (number of entries)
    #[arg(short, long, default_value_t = 16)]
    capacity: usize,

    /// Script file to run (reads stdin when omitted)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Suppress per-command replies
    #[arg(short, long)]
    quiet: bool,

    /// Log cache activity to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Outcome of one script run
#[derive(Debug, Default, PartialEq, Eq)]
struct RunSummary {
    commands: usize,
    errors: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let cache = SharedCache::new(args.capacity)
        .with_context(|| format!("cannot create cache with capacity {}", args.capacity))?;
    info!("Cache capacity: {}", args.capacity);
    let handler = CommandHandler::new(cache);

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(open_script(path)?),
        None => Box::new(io::stdin().lock()),
    };

    let summary = if args.quiet {
        run_script(&handler, input, &mut io::sink())?
    } else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let summary = run_script(&handler, input, &mut out)?;
        out.flush()?;
        summary
    };

    info!(
        commands = summary.commands,
        errors = summary.errors,
        entries = handler.cache().len(),
        "script finished"
    );
    Ok(())
}

fn open_script(path: &Path) -> Result<BufReader<File>> {
    let file =
        File::open(path).with_context(|| format!("cannot open script {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Execute every line of `input`, writing replies to `out`
///
/// Unparseable lines (including invalid UTF-8) are reported and skipped;
/// only I/O errors abort the run.
fn run_script<R: BufRead, W: Write>(
    handler: &CommandHandler,
    input: R,
    out: &mut W,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for (i, bytes) in input.split(b'\n').enumerate() {
        let line_no = i + 1;
        let mut bytes = bytes.with_context(|| format!("cannot read script line {}", line_no))?;
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }

        let parsed = match String::from_utf8(bytes) {
            Ok(line) => parse_command(&line),
            Err(_) => Err("line is not valid UTF-8".to_string()),
        };

        match parsed {
            Ok(Some(cmd)) => {
                debug!(line = line_no, ?cmd, "executing");
                handler.handle(cmd, out)?;
                summary.commands += 1;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(line = line_no, "Parse error: {}", e);
                writeln!(out, "ERR line {}: {}", line_no, e)?;
                summary.errors += 1;
            }
        }
    }

    Ok(summary)
}
