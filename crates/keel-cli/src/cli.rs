//! Command-line interface definition.
//!
//! The command surface is deliberately small: one optional `--dev` switch
//! selects the development watch loop; its absence means a one-shot
//! production build. Everything else is ambient configuration.

use std::path::PathBuf;

use clap::Parser;

/// keel - build orchestrator for a two-target (browser + server) application
#[derive(Parser, Debug)]
#[command(
    name = "keel",
    version,
    about = "Build orchestrator for a two-target (browser + server) application",
    long_about = "keel compiles a browser client bundle and a server runtime bundle from a\n\
                  single invocation. Without flags it performs a one-shot production build;\n\
                  with --dev it enters a persistent watch loop that rebuilds on file changes\n\
                  and respawns the server process after every server rebuild."
)]
pub struct Cli {
    /// Run the development watch loop instead of a one-shot production build
    #[arg(long)]
    pub dev: bool,

    /// Project root directory (defaults to the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Path to the esbuild binary (otherwise resolved from PATH)
    #[arg(long, env = "KEEL_ESBUILD")]
    pub esbuild: Option<PathBuf>,

    /// Runtime used to launch the server bundle in development mode
    #[arg(long, env = "KEEL_RUNTIME", default_value = "node")]
    pub runtime: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
