use anyhow::Result;
use clap::Parser;

use plugin_canvas::cli::{run, CliArgs};

fn main() -> Result<()> {
    plugin_canvas::tracing::init();

    let args = CliArgs::parse();
    tracing::debug!("Running {:?}", args.command);

    print!("{}", run(&args)?);
    Ok(())
}
