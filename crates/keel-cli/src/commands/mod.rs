//! Command implementations: the one-shot production build and the
//! development watch loop.

pub mod build;
pub mod dev;

use std::path::Path;

use keel_bundler::Esbuild;

use crate::assets;
use crate::cli::Cli;
use crate::error::{CliError, Result};
use crate::layout::ProjectLayout;
use crate::ui;

/// Shared run setup: resolve the project root, validate the entry modules,
/// clear the output directory, and locate the compiler.
///
/// The clear completes before this returns, so no build can start against a
/// directory still holding a prior run's artifacts.
pub(crate) fn prepare(args: &Cli) -> Result<(ProjectLayout, Esbuild)> {
    let root = match &args.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };
    let layout = ProjectLayout::new(root);

    validate_entry(&layout.client_entry())?;
    validate_entry(&layout.server_entry())?;

    ui::info(&format!("output directory: {}", layout.build_dir().display()));
    assets::empty_dir(&layout.build_dir())?;

    let compiler = Esbuild::locate(args.esbuild.as_deref(), layout.scratch_dir())?;
    Ok((layout, compiler))
}

fn validate_entry(entry: &Path) -> Result<()> {
    if !entry.is_file() {
        return Err(CliError::InvalidArgument(format!(
            "entry module not found: {}",
            entry.display()
        )));
    }
    Ok(())
}
