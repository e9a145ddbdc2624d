mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::config::PartialConfig;
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!("pdbmanip CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let config = PartialConfig::load(cli.config.as_deref())?;

    let command_result = match cli.command {
        Commands::Info(args) => {
            info!("Dispatching to 'info' command.");
            commands::info::run(args)
        }
        Commands::Select(args) => {
            info!("Dispatching to 'select' command.");
            commands::select::run(args, &config)
        }
        Commands::Transform(args) => {
            info!("Dispatching to 'transform' command.");
            commands::transform::run(args)
        }
        Commands::Edit(args) => {
            info!("Dispatching to 'edit' command.");
            commands::edit::run(args, &config)
        }
        Commands::Align(args) => {
            info!("Dispatching to 'align' command.");
            commands::align::run(args, &config)
        }
        Commands::Rmsd(args) => {
            info!("Dispatching to 'rmsd' command.");
            commands::rmsd::run(args, &config)
        }
        Commands::Concat(args) => {
            info!("Dispatching to 'concat' command.");
            commands::concat::run(args)
        }
    };

    match &command_result {
        Ok(()) => info!("Command completed successfully."),
        Err(e) => error!("Command failed: {}", e),
    }
    command_result
}
