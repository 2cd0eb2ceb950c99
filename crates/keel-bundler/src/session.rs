//! Build sessions and their post-build listener interface.
//!
//! A [`BuildSession`] is the stateful compiler session bound to one target.
//! Exactly one exists per target for the process's lifetime: in production
//! it performs a single build; in development it persists and re-runs the
//! build whenever a watched file changes. After every completed build the
//! session hands the fresh [`OutputManifest`] to its listener.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{error, info};

use crate::compiler::Esbuild;
use crate::config::BundleConfig;
use crate::error::{BundleError, Result};
use crate::manifest::OutputManifest;
use crate::watcher::FileWatcher;

/// Post-build lifecycle listener.
///
/// Each pipeline owns its own listener instance; there is no global plugin
/// registry. The listener is invoked after every completed build, including
/// every incremental rebuild in watch mode.
#[async_trait]
pub trait BuildListener: Send {
    /// Called with the manifest of a completed build.
    ///
    /// Errors abort this build's hook chain; in production that fails the
    /// run, in watch mode it is reported and the next change retries.
    async fn on_build_complete(&mut self, manifest: &OutputManifest) -> anyhow::Result<()>;
}

/// One target's compiler session.
pub struct BuildSession {
    compiler: Esbuild,
    config: BundleConfig,
    cwd: PathBuf,
    listener: Box<dyn BuildListener>,
}

impl BuildSession {
    pub fn new(
        compiler: Esbuild,
        config: BundleConfig,
        cwd: PathBuf,
        listener: Box<dyn BuildListener>,
    ) -> Self {
        Self {
            compiler,
            config,
            cwd,
            listener,
        }
    }

    /// Session name (target identifier) for logs.
    pub fn name(&self) -> &str {
        self.config.name()
    }

    /// Run one build and its post-build hook, propagating any failure.
    pub async fn build(&mut self) -> Result<()> {
        let started = std::time::Instant::now();
        let manifest = self.compiler.run(&self.config, &self.cwd).await?;
        info!(
            target = self.config.name(),
            outputs = manifest.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "build complete"
        );
        self.listener
            .on_build_complete(&manifest)
            .await
            .map_err(BundleError::Hook)?;
        Ok(())
    }

    /// Enter the persistent watch loop.
    ///
    /// Rebuilds are serialized per session: the next change event is not
    /// consumed until the current rebuild and its hook finish, so hooks are
    /// never re-entered. Rebuild failures are reported and left for the
    /// next file change; only watcher setup errors propagate.
    pub async fn watch(mut self, roots: Vec<PathBuf>, debounce_ms: u64) -> Result<()> {
        let (_watcher, mut changes) = FileWatcher::new(roots, debounce_ms)?;

        while let Some(change) = changes.recv().await {
            info!(
                target = self.config.name(),
                path = %change.path().display(),
                "file changed, rebuilding"
            );
            if let Err(err) = self.build().await {
                error!(target = self.config.name(), "rebuild failed: {err}");
            }
        }
        Ok(())
    }
}
