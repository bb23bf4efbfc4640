//! adfmark CLI - Markdown to Atlassian Document Format JSON
//!
//! Usage: `adfmark [--pretty] [FILE|-]`. Reads stdin when no file is given.
//! Log verbosity follows `RUST_LOG`.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("adfmark: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut pretty = false;
    let mut path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--pretty" | "-p" => pretty = true,
            _ => path = Some(arg),
        }
    }

    let input = match path.as_deref() {
        Some(path) if path != "-" => std::fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let json = if pretty {
        adfmark::to_adf_json_pretty(&input)?
    } else {
        adfmark::to_adf_json(&input)?
    };
    let mut stdout = io::stdout().lock();
    stdout.write_all(json.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}
