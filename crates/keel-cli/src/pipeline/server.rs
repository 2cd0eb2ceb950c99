//! Server pipeline: the server-runtime bundle and its finalization.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use keel_bundler::{
    BuildFlags, BuildListener, BuildMode, BuildSession, BundleConfig, Esbuild, OutputManifest,
    Platform, TargetKind,
};
use tracing::warn;

use crate::error::FinalizeError;
use crate::layout::{ProjectLayout, PHYSICS_BINARY};
use crate::pipeline::DEBOUNCE_MS;
use crate::process::DevProcessManager;

/// Builds the server bundle. External packages stay unresolved (present at
/// runtime); after every completed build the finalizer copies the physics
/// binary and, in development mode, respawns the server process.
pub struct ServerPipeline {
    session: BuildSession,
    layout: ProjectLayout,
}

impl ServerPipeline {
    pub fn new(
        compiler: Esbuild,
        layout: &ProjectLayout,
        mode: BuildMode,
        runtime: PathBuf,
    ) -> Self {
        let config = BundleConfig::new("server", layout.server_entry_rel())
            .out_file(layout.server_out_rel())
            .platform(Platform::Node)
            .sourcemap(true)
            .packages_external(true)
            .flags(BuildFlags::new(mode, TargetKind::Server));

        let listener = ServerFinalizer {
            layout: layout.clone(),
            manager: mode.is_dev().then(|| DevProcessManager::new(runtime)),
        };
        let session = BuildSession::new(
            compiler,
            config,
            layout.root().to_path_buf(),
            Box::new(listener),
        );

        Self {
            session,
            layout: layout.clone(),
        }
    }

    /// Run one build plus finalization; failures propagate.
    pub async fn build(&mut self) -> keel_bundler::Result<()> {
        self.session.build().await
    }

    /// Enter the persistent watch loop for this target.
    pub async fn watch(self) -> keel_bundler::Result<()> {
        let roots = self.layout.server_watch_roots();
        self.session.watch(roots, DEBOUNCE_MS).await
    }
}

/// Post-build hook for the server target.
///
/// `manager` is `Some` only in development mode; it is the sole mutator of
/// the managed process handle.
struct ServerFinalizer {
    layout: ProjectLayout,
    manager: Option<DevProcessManager>,
}

#[async_trait]
impl BuildListener for ServerFinalizer {
    async fn on_build_complete(&mut self, _manifest: &OutputManifest) -> anyhow::Result<()> {
        self.finalize().map_err(Into::into)
    }
}

impl ServerFinalizer {
    fn finalize(&mut self) -> Result<(), FinalizeError> {
        let src = self.layout.physics_binary();
        if !src.exists() {
            return Err(FinalizeError::MissingRequiredAsset(src));
        }
        fs::copy(&src, self.layout.build_dir().join(PHYSICS_BINARY))?;

        if let Some(manager) = &mut self.manager {
            // Restart failures are surfaced but never crash the watch
            // loop; the next successful rebuild gets another chance.
            if let Err(err) = manager.restart(&self.layout.server_out_file()) {
                warn!("failed to restart server process: {err}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finalizer(root: &std::path::Path) -> ServerFinalizer {
        ServerFinalizer {
            layout: ProjectLayout::new(root),
            manager: None,
        }
    }

    #[test]
    fn finalize_copies_the_physics_binary() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let src = layout.physics_binary();
        fs::create_dir_all(src.parent().unwrap()).unwrap();
        fs::write(&src, b"\0asm").unwrap();
        fs::create_dir_all(layout.build_dir()).unwrap();

        finalizer(dir.path()).finalize().unwrap();

        assert_eq!(
            fs::read(layout.build_dir().join(PHYSICS_BINARY)).unwrap(),
            b"\0asm"
        );
    }

    #[tokio::test]
    async fn finalize_survives_a_failed_process_restart() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let src = layout.physics_binary();
        fs::create_dir_all(src.parent().unwrap()).unwrap();
        fs::write(&src, b"\0asm").unwrap();
        fs::create_dir_all(layout.build_dir()).unwrap();

        let mut finalizer = ServerFinalizer {
            layout: layout.clone(),
            manager: Some(DevProcessManager::new("/nonexistent/runtime")),
        };

        // The respawn fails but the hook still reports success; the asset
        // copy happened and the watch loop stays alive.
        assert!(finalizer.finalize().is_ok());
        assert!(layout.build_dir().join(PHYSICS_BINARY).exists());
    }

    #[test]
    fn finalize_fails_without_the_required_binary() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        fs::create_dir_all(layout.build_dir()).unwrap();

        let err = finalizer(dir.path()).finalize().unwrap_err();

        assert!(matches!(err, FinalizeError::MissingRequiredAsset(_)));
        assert!(!layout.build_dir().join(PHYSICS_BINARY).exists());
    }
}
