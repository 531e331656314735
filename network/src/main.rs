use clap::Parser;
use std::process;

use network::{cli, services};

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();

    session::cli::init_logging(args.log_level);

    if let Err(e) = services::run(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
