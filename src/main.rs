//! The `tabia` binary: a text session over stdin and stdout, see
//! [`tabia::interface`] for the commands.

use std::io;

use anyhow::Context;
use clap::Parser;
use tabia::Session;
use tracing_subscriber::EnvFilter;

/// Plays chess through a line-based text protocol on stdin and stdout.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Log filter used when `RUST_LOG` is not set. Logs go to stderr.
    #[arg(long, default_value = "warn")]
    log: String,
    /// Comma-separated moves in UCI notation to play before the session
    /// starts, e.g. `e2e4,e7e5`.
    #[arg(long, value_delimiter = ',')]
    moves: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&args.log)
            .with_context(|| format!("invalid log filter: {}", args.log))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    tabia::print_engine_info();

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    let mut session = Session::new(&mut input, &mut output);
    session
        .play(&args.moves)
        .context("playing the initial moves")?;
    session.run()
}
