//! One-shot production build.
//!
//! Clears the output directory, builds the client and server targets once
//! each (post-build hooks included), and returns. Any failure along the way
//! propagates to a non-zero exit of the whole process.

use std::time::Instant;

use keel_bundler::BuildMode;

use crate::cli::Cli;
use crate::commands;
use crate::error::Result;
use crate::pipeline::{ClientPipeline, ServerPipeline};
use crate::ui;

pub async fn execute(args: &Cli) -> Result<()> {
    let started = Instant::now();
    let (layout, compiler) = commands::prepare(args)?;

    let mut client = ClientPipeline::new(compiler.clone(), &layout, BuildMode::Production);
    let mut server = ServerPipeline::new(
        compiler,
        &layout,
        BuildMode::Production,
        args.runtime.clone(),
    );

    ui::info("building client...");
    client.build().await?;

    ui::info("building server...");
    server.build().await?;

    ui::success(&format!(
        "production build completed in {}ms",
        started.elapsed().as_millis()
    ));
    Ok(())
}
