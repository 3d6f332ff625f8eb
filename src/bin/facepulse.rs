//! Facepulse CLI - Command-line interface for the Facepulse engine
//!
//! Commands:
//! - analyze: Process capture-request JSON into report payloads
//! - shapes: Print the canonical blend-shape vocabulary

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use facepulse::{capture_to_report_json, CANONICAL_BLEND_SHAPES, FACEPULSE_VERSION};

/// Facepulse - On-device analysis engine for facial health indicator signals
#[derive(Parser)]
#[command(name = "facepulse")]
#[command(version = FACEPULSE_VERSION)]
#[command(about = "Transform facial capture data into health indicator reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process capture-request JSON into report payloads
    Analyze {
        /// Input file path (use - for stdin); one JSON object per line
        /// in ndjson mode, otherwise a single JSON object
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Treat input as newline-delimited JSON (one capture per line)
        #[arg(long)]
        ndjson: bool,
    },

    /// Print the canonical blend-shape vocabulary
    Shapes {
        /// Output as a JSON array
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            output,
            ndjson,
        } => run_analyze(&input, &output, ndjson),
        Commands::Shapes { json } => run_shapes(json),
    }
}

fn run_analyze(input: &PathBuf, output: &PathBuf, ndjson: bool) -> ExitCode {
    let raw = match read_input(input) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("error: failed to read input: {err}");
            return ExitCode::FAILURE;
        }
    };

    let reports = if ndjson {
        let mut reports = Vec::new();
        for (line_number, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match capture_to_report_json(line) {
                Ok(report) => reports.push(report),
                Err(err) => {
                    eprintln!("error: line {}: {err}", line_number + 1);
                    return ExitCode::FAILURE;
                }
            }
        }
        reports
    } else {
        match capture_to_report_json(&raw) {
            Ok(report) => vec![report],
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
    };

    if let Err(err) = write_output(output, &reports) {
        eprintln!("error: failed to write output: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run_shapes(json: bool) -> ExitCode {
    let mut stdout = io::stdout().lock();
    let result = if json {
        serde_json::to_string_pretty(CANONICAL_BLEND_SHAPES.as_slice())
            .map_err(io::Error::other)
            .and_then(|list| writeln!(stdout, "{list}"))
    } else {
        CANONICAL_BLEND_SHAPES
            .iter()
            .try_for_each(|name| writeln!(stdout, "{name}"))
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn read_input(path: &PathBuf) -> io::Result<String> {
    if path.as_os_str() == "-" {
        if atty::is(atty::Stream::Stdin) {
            eprintln!("reading capture JSON from stdin (pipe input or press Ctrl-D to end)");
        }
        let mut buffer = String::new();
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            buffer.push_str(&line?);
            buffer.push('\n');
        }
        Ok(buffer)
    } else {
        let mut buffer = String::new();
        fs::File::open(path)?.read_to_string(&mut buffer)?;
        Ok(buffer)
    }
}

fn write_output(path: &PathBuf, reports: &[String]) -> io::Result<()> {
    if path.as_os_str() == "-" {
        let mut stdout = io::stdout().lock();
        for report in reports {
            writeln!(stdout, "{report}")?;
        }
        Ok(())
    } else {
        let mut file = fs::File::create(path)?;
        for report in reports {
            writeln!(file, "{report}")?;
        }
        Ok(())
    }
}
