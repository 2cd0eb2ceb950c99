//! Development watch loop.
//!
//! Clears the output directory, runs both targets' initial builds (failure
//! here is fatal, exactly like production), then parks each session in its
//! own watch task. The server finalizer respawns the managed server process
//! after every completed server build, the initial one included. The loop
//! has no programmatic stop; it ends with Ctrl+C.

use keel_bundler::BuildMode;

use crate::cli::Cli;
use crate::commands;
use crate::error::Result;
use crate::pipeline::{ClientPipeline, ServerPipeline};
use crate::ui;

pub async fn execute(args: &Cli) -> Result<()> {
    let (layout, compiler) = commands::prepare(args)?;

    let mut client = ClientPipeline::new(compiler.clone(), &layout, BuildMode::Development);
    let mut server = ServerPipeline::new(
        compiler,
        &layout,
        BuildMode::Development,
        args.runtime.clone(),
    );

    ui::info("performing initial builds...");
    client.build().await?;
    server.build().await?;
    ui::success("initial builds complete");

    // The two sessions rebuild independently; there is no cross-target
    // barrier. Each hook only writes its own subset of output paths.
    let mut client_task = tokio::spawn(client.watch());
    let mut server_task = tokio::spawn(server.watch());

    ui::info("watching for changes, press Ctrl+C to stop");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            ui::info("shutting down");
        }
        _ = &mut client_task => {
            ui::warning("client watch task ended unexpectedly");
        }
        _ = &mut server_task => {
            ui::warning("server watch task ended unexpectedly");
        }
    }

    client_task.abort();
    server_task.abort();
    Ok(())
}
