//! appconf
//!
//! Resolves environment config files for an app dir and prints, compares or
//! updates them.

use anyhow::Result;
use appconf::cli::{Cli, commands};
use appconf::logging::{self, LogTarget};
use clap::Parser;
use std::io::Write;
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;
    debug!(env = %cli.env, prefix = %cli.prefix, all = cli.all, "Starting");

    let out = commands::run(&cli)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(out.text.as_bytes())?;
    stdout.flush()?;

    if out.exit_code != 0 {
        std::process::exit(out.exit_code);
    }
    Ok(())
}
