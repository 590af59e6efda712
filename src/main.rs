use clap::Parser;
use tracing_subscriber::EnvFilter;

use tsm::{actions, cli};

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();

    if let Err(e) = actions::handle(args) {
        eprintln!("tsm: {e:#}");
        std::process::exit(1);
    }
}
