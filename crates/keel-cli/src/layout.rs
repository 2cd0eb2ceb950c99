//! The project's fixed filesystem contract.
//!
//! Input and output locations are fixed by convention, not configured; the
//! orchestrator checks existence, never content. `ProjectLayout` is the one
//! place those paths are spelled out.

use std::path::{Path, PathBuf};

/// Import specifier of the physics package that gets substituted with the
/// local glue module.
pub const PHYSICS_SPECIFIER: &str = "physx-js-webidl";
/// File name of the physics glue script copied into the output root.
pub const PHYSICS_GLUE: &str = "physx-js-webidl.js";
/// File name of the physics compiled binary copied into the output root.
pub const PHYSICS_BINARY: &str = "physx-js-webidl.wasm";
/// File name of the optional environment-configuration script.
pub const ENV_SCRIPT: &str = "env.js";
/// JSX import source for the client target.
pub const JSX_IMPORT_SOURCE: &str = "@firebolt-dev/jsx";

const CLIENT_ENTRY: &str = "src/client/index.js";
const SERVER_ENTRY: &str = "src/server/index.js";
const CLIENT_SRC: &str = "src/client";
const SERVER_SRC: &str = "src/server";
const PUBLIC_DIR: &str = "src/client/public";
const PHYSX_DIR: &str = "src/server/physx";
const BUILD_DIR: &str = "build";
const CLIENT_OUT: &str = "build/public";
const SERVER_OUT_FILE: &str = "build/index.js";
const SCRATCH_DIR: &str = ".keel";
const HTML_FILE: &str = "index.html";

/// Typed view of the project's fixed paths, anchored at the root.
///
/// Compiler configs take the `_rel` accessors so manifest output paths stay
/// root-relative; filesystem operations take the absolute ones.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // Inputs.

    pub fn client_entry_rel(&self) -> &'static Path {
        Path::new(CLIENT_ENTRY)
    }

    pub fn server_entry_rel(&self) -> &'static Path {
        Path::new(SERVER_ENTRY)
    }

    pub fn client_entry(&self) -> PathBuf {
        self.root.join(CLIENT_ENTRY)
    }

    pub fn server_entry(&self) -> PathBuf {
        self.root.join(SERVER_ENTRY)
    }

    /// Static public-asset directory, copied wholesale into the output.
    pub fn public_dir(&self) -> PathBuf {
        self.root.join(PUBLIC_DIR)
    }

    /// HTML template source (inside the public dir).
    pub fn html_template(&self) -> PathBuf {
        self.public_dir().join(HTML_FILE)
    }

    /// Optional environment-configuration script.
    pub fn env_script(&self) -> PathBuf {
        self.public_dir().join(ENV_SCRIPT)
    }

    /// Physics glue script (also the client resolution override target).
    pub fn physics_glue(&self) -> PathBuf {
        self.root.join(PHYSX_DIR).join(PHYSICS_GLUE)
    }

    /// Physics compiled binary; required by the server pipeline's hook.
    pub fn physics_binary(&self) -> PathBuf {
        self.root.join(PHYSX_DIR).join(PHYSICS_BINARY)
    }

    // Outputs.

    /// Root of the output directory, emptied once per run.
    pub fn build_dir(&self) -> PathBuf {
        self.root.join(BUILD_DIR)
    }

    pub fn client_out_rel(&self) -> &'static Path {
        Path::new(CLIENT_OUT)
    }

    pub fn client_out_dir(&self) -> PathBuf {
        self.root.join(CLIENT_OUT)
    }

    /// Rendered HTML artifact destination.
    pub fn html_out(&self) -> PathBuf {
        self.client_out_dir().join(HTML_FILE)
    }

    pub fn server_out_rel(&self) -> &'static Path {
        Path::new(SERVER_OUT_FILE)
    }

    pub fn server_out_file(&self) -> PathBuf {
        self.root.join(SERVER_OUT_FILE)
    }

    // Scratch and watching.

    /// Scratch directory for metafiles and materialized override modules.
    /// Hidden, therefore invisible to the watcher.
    pub fn scratch_dir(&self) -> PathBuf {
        self.root.join(SCRATCH_DIR)
    }

    /// Source roots the client session watches.
    ///
    /// The physics glue directory is included: the glue module is an input
    /// of the client bundle through the resolution override, so editing it
    /// must trigger a client rebuild, not only a server one.
    pub fn client_watch_roots(&self) -> Vec<PathBuf> {
        vec![self.root.join(CLIENT_SRC), self.root.join(PHYSX_DIR)]
    }

    /// Source roots the server session watches.
    pub fn server_watch_roots(&self) -> Vec<PathBuf> {
        vec![self.root.join(SERVER_SRC)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_anchor_at_root() {
        let layout = ProjectLayout::new("/project");
        assert_eq!(
            layout.client_entry(),
            PathBuf::from("/project/src/client/index.js")
        );
        assert_eq!(
            layout.physics_binary(),
            PathBuf::from("/project/src/server/physx/physx-js-webidl.wasm")
        );
        assert_eq!(layout.html_out(), PathBuf::from("/project/build/public/index.html"));
        assert_eq!(layout.server_out_file(), PathBuf::from("/project/build/index.js"));
    }

    #[test]
    fn rel_paths_stay_relative() {
        let layout = ProjectLayout::new("/project");
        assert!(layout.client_entry_rel().is_relative());
        assert_eq!(layout.client_out_rel(), Path::new("build/public"));
    }

    #[test]
    fn client_watch_covers_the_aliased_glue_module() {
        let layout = ProjectLayout::new("/project");
        let roots = layout.client_watch_roots();
        assert!(roots.iter().any(|root| layout.physics_glue().starts_with(root)));
        assert!(roots.iter().any(|root| layout.client_entry().starts_with(root)));
        // The server bundle itself stays out of the client's roots.
        assert!(!roots.iter().any(|root| layout.server_entry().starts_with(root)));
    }

    #[test]
    fn template_lives_inside_public_dir() {
        let layout = ProjectLayout::new("/project");
        assert!(layout.html_template().starts_with(layout.public_dir()));
    }
}
