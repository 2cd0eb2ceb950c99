//! keel - build orchestrator for a two-target (browser + server) application.
//!
//! Entry point: argument parsing, logging setup, and dispatch between the
//! one-shot production build and the development watch loop.

use clap::Parser;
use keel_cli::{cli, commands, error, logger};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);

    let result = if args.dev {
        commands::dev::execute(&args).await
    } else {
        commands::build::execute(&args).await
    };

    result.map_err(error::cli_error_to_miette)
}
