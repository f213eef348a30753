use clap::Parser;
use tracing_subscriber::EnvFilter;

use cmc_drv::{run, Cli};

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "cmc=debug" } else { "cmc=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run(&cli) {
        eprintln!("cmc: {error:#}");
        std::process::exit(1);
    }
}
