use clap::Parser;
use std::process;
use vacuum::{cli::Cli, config};

#[tokio::main]
async fn main() {
    match run().await {
        Ok(0) => {}
        Ok(failing) => {
            log::info!("{} result(s) at or above the failure threshold", failing);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

async fn run() -> vacuum::Result<usize> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    // Load configuration
    let config = config::load_config(cli.config.as_deref())?;

    vacuum::run_command(cli.command, &config, cli.quiet).await
}
