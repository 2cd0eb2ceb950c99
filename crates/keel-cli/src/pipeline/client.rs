//! Client pipeline: the browser-loadable bundle and its finalization.

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use keel_bundler::{
    BuildFlags, BuildListener, BuildMode, BuildSession, BundleConfig, Esbuild, OutputManifest,
    Platform, ResolveOverride, TargetKind,
};

use crate::assets;
use crate::error::FinalizeError;
use crate::layout::{ProjectLayout, ENV_SCRIPT, JSX_IMPORT_SOURCE, PHYSICS_GLUE, PHYSICS_SPECIFIER};
use crate::pipeline::DEBOUNCE_MS;

/// Builds the browser bundle; after every completed build the finalizer
/// copies static assets and renders the HTML shell.
pub struct ClientPipeline {
    session: BuildSession,
    layout: ProjectLayout,
}

impl ClientPipeline {
    pub fn new(compiler: Esbuild, layout: &ProjectLayout, mode: BuildMode) -> Self {
        let config = BundleConfig::new("client", layout.client_entry_rel())
            .out_dir(layout.client_out_rel())
            .entry_names("[name]-[hash]")
            .platform(Platform::Browser)
            .sourcemap(true)
            .jsx_automatic(JSX_IMPORT_SOURCE)
            .loader(".js", "jsx")
            .flags(BuildFlags::new(mode, TargetKind::Client))
            // The physics package's default module resolves to a
            // binary-loading path that cannot run in a browser sandbox;
            // substitute the local glue module and rewrite its
            // self-reference, which bundling would otherwise break.
            .resolve_override(
                ResolveOverride::new(PHYSICS_SPECIFIER, layout.physics_glue()).rewrite_self_url(),
            );

        let listener = ClientFinalizer {
            layout: layout.clone(),
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
        let roots = self.layout.client_watch_roots();
        self.session.watch(roots, DEBOUNCE_MS).await
    }
}

/// Post-build hook for the client target.
struct ClientFinalizer {
    layout: ProjectLayout,
}

#[async_trait]
impl BuildListener for ClientFinalizer {
    async fn on_build_complete(&mut self, manifest: &OutputManifest) -> anyhow::Result<()> {
        self.finalize(manifest).map_err(Into::into)
    }
}

impl ClientFinalizer {
    fn finalize(&self, manifest: &OutputManifest) -> Result<(), FinalizeError> {
        let layout = &self.layout;

        // Public assets first, then the rendered HTML overwrites the raw
        // template that came along with them.
        assets::copy_dir_all(&layout.public_dir(), &layout.client_out_dir())?;

        assets::copy_if_exists(&layout.env_script(), &layout.build_dir().join(ENV_SCRIPT))?;
        assets::copy_if_exists(&layout.physics_glue(), &layout.build_dir().join(PHYSICS_GLUE))?;

        let bundle = manifest
            .find_by_extension(".js")
            .ok_or(FinalizeError::MissingBundleArtifact)?;
        let url = bundle_url(bundle, layout.client_out_rel());

        let template = fs::read_to_string(layout.html_template())?;
        let html = assets::render_template(&template, &url, &assets::build_id());
        fs::write(layout.html_out(), html)?;
        Ok(())
    }
}

/// Root-relative URL of a generated bundle: its manifest path with the
/// client output directory stripped.
fn bundle_url(output: &str, out_dir: &Path) -> String {
    let path = Path::new(output);
    let rel = path
        .strip_prefix(out_dir)
        .ok()
        .or_else(|| path.file_name().map(Path::new))
        .unwrap_or(path);
    format!("/{}", rel.display())
}
