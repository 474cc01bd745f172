//! pipeverb CLI — run left-to-right verb pipelines over JSON data.
//!
//! Reads a JSON value, pipes it through registered verbs, and prints the
//! result as JSON.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
