//! Typed build configuration.
//!
//! The original system injected its mode flags as ad hoc string defines;
//! here the mode/target pair is a typed [`BuildFlags`] value and the define
//! table is derived from it, so a pipeline cannot end up with mismatched
//! CLIENT/SERVER polarity.

use std::path::{Path, PathBuf};

use crate::overrides::ResolveOverride;

/// Build mode, chosen once at startup and fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// One-shot build; the process exits after both targets complete.
    Production,
    /// Persistent watch loop with rebuild and server respawn.
    Development,
}

impl BuildMode {
    /// Whether this is the development watch mode.
    pub fn is_dev(self) -> bool {
        matches!(self, BuildMode::Development)
    }

    /// The NODE_ENV value injected into bundled code.
    pub fn node_env(self) -> &'static str {
        match self {
            BuildMode::Production => "production",
            BuildMode::Development => "development",
        }
    }
}

/// Which of the two targets a session builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Browser-loadable bundle.
    Client,
    /// Server-runtime bundle.
    Server,
}

/// Compiler platform for module resolution and built-in shims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Browser,
    Node,
}

impl Platform {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Platform::Browser => "browser",
            Platform::Node => "node",
        }
    }
}

/// Output module format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Esm,
    Cjs,
    Iife,
}

impl OutputFormat {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Esm => "esm",
            OutputFormat::Cjs => "cjs",
            OutputFormat::Iife => "iife",
        }
    }
}

/// Typed mode/target pair from which the compile-time define table derives.
///
/// Bundled code branches on `process.env.CLIENT` / `process.env.SERVER`
/// statically instead of inspecting its runtime environment.
#[derive(Debug, Clone, Copy)]
pub struct BuildFlags {
    pub mode: BuildMode,
    pub target: TargetKind,
}

impl BuildFlags {
    pub fn new(mode: BuildMode, target: TargetKind) -> Self {
        Self { mode, target }
    }

    /// The define table injected into the compiled bundle.
    ///
    /// Values are JSON expressions as the compiler expects them; the whole
    /// `process` global is stubbed for the browser target exactly as the
    /// original build did.
    pub fn defines(&self) -> Vec<(String, String)> {
        let env = self.mode.node_env();
        let client = matches!(self.target, TargetKind::Client);
        vec![
            ("process.env.NODE_ENV".into(), format!("\"{env}\"")),
            ("process.env.CLIENT".into(), client.to_string()),
            ("process.env.SERVER".into(), (!client).to_string()),
            (
                "process".into(),
                serde_json::json!({ "env": { "NODE_ENV": env } }).to_string(),
            ),
        ]
    }
}

/// Configuration for one target's compiler invocation.
///
/// Paths are interpreted relative to the session's working directory (the
/// project root), which keeps manifest output paths root-relative.
#[derive(Debug, Clone)]
pub struct BundleConfig {
    pub(crate) name: String,
    pub(crate) entry: PathBuf,
    pub(crate) out_dir: Option<PathBuf>,
    pub(crate) out_file: Option<PathBuf>,
    pub(crate) entry_names: Option<String>,
    pub(crate) platform: Platform,
    pub(crate) format: OutputFormat,
    pub(crate) bundle: bool,
    pub(crate) tree_shaking: bool,
    pub(crate) minify: bool,
    pub(crate) sourcemap: bool,
    pub(crate) packages_external: bool,
    pub(crate) jsx_automatic: bool,
    pub(crate) jsx_import_source: Option<String>,
    pub(crate) loaders: Vec<(String, String)>,
    pub(crate) defines: Vec<(String, String)>,
    pub(crate) overrides: Vec<ResolveOverride>,
}

impl BundleConfig {
    /// Create a config for `entry` with bundling and tree shaking enabled.
    ///
    /// `name` identifies the session in logs and scratch-file names.
    pub fn new(name: impl Into<String>, entry: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            entry: entry.into(),
            out_dir: None,
            out_file: None,
            entry_names: None,
            platform: Platform::Browser,
            format: OutputFormat::Esm,
            bundle: true,
            tree_shaking: true,
            minify: false,
            sourcemap: false,
            packages_external: false,
            jsx_automatic: false,
            jsx_import_source: None,
            loaders: Vec::new(),
            defines: Vec::new(),
            overrides: Vec::new(),
        }
    }

    /// Session name, used in logs and scratch-file names.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Write outputs into a directory (hashed-name targets).
    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(dir.into());
        self.out_file = None;
        self
    }

    /// Write a single output file (server target).
    pub fn out_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.out_file = Some(file.into());
        self.out_dir = None;
        self
    }

    /// Output filename pattern, e.g. `[name]-[hash]` for cache-busting.
    pub fn entry_names(mut self, pattern: impl Into<String>) -> Self {
        self.entry_names = Some(pattern.into());
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Emit external source maps alongside each output.
    pub fn sourcemap(mut self, sourcemap: bool) -> Self {
        self.sourcemap = sourcemap;
        self
    }

    /// Leave package imports unresolved, to be provided at runtime.
    pub fn packages_external(mut self, external: bool) -> Self {
        self.packages_external = external;
        self
    }

    /// Enable the automatic JSX transform with the given import source.
    pub fn jsx_automatic(mut self, import_source: impl Into<String>) -> Self {
        self.jsx_automatic = true;
        self.jsx_import_source = Some(import_source.into());
        self
    }

    /// Map a file extension to a compiler loader, e.g. `.js` -> `jsx`.
    pub fn loader(mut self, ext: impl Into<String>, loader: impl Into<String>) -> Self {
        self.loaders.push((ext.into(), loader.into()));
        self
    }

    /// Apply the define table derived from a typed flag pair.
    pub fn flags(mut self, flags: BuildFlags) -> Self {
        self.defines = flags.defines();
        self
    }

    /// Add a module-resolution override (logical name -> replacement module).
    pub fn resolve_override(mut self, rule: ResolveOverride) -> Self {
        self.overrides.push(rule);
        self
    }

    pub(crate) fn entry(&self) -> &Path {
        &self.entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_dev_defines() {
        let flags = BuildFlags::new(BuildMode::Development, TargetKind::Client);
        let defines = flags.defines();

        let lookup = |key: &str| -> &str {
            &defines
                .iter()
                .find(|(k, _)| k == key)
                .unwrap_or_else(|| panic!("missing define {key}"))
                .1
        };

        assert_eq!(lookup("process.env.NODE_ENV"), "\"development\"");
        assert_eq!(lookup("process.env.CLIENT"), "true");
        assert_eq!(lookup("process.env.SERVER"), "false");
        assert_eq!(lookup("process"), r#"{"env":{"NODE_ENV":"development"}}"#);
    }

    #[test]
    fn server_production_defines() {
        let flags = BuildFlags::new(BuildMode::Production, TargetKind::Server);
        let defines = flags.defines();

        assert!(defines.contains(&("process.env.NODE_ENV".into(), "\"production\"".into())));
        assert!(defines.contains(&("process.env.CLIENT".into(), "false".into())));
        assert!(defines.contains(&("process.env.SERVER".into(), "true".into())));
    }

    #[test]
    fn out_dir_and_out_file_are_mutually_exclusive() {
        let config = BundleConfig::new("server", "src/server/index.js")
            .out_dir("build/public")
            .out_file("build/index.js");

        assert!(config.out_dir.is_none());
        assert_eq!(config.out_file, Some(PathBuf::from("build/index.js")));
    }

    #[test]
    fn mode_accessors() {
        assert!(BuildMode::Development.is_dev());
        assert!(!BuildMode::Production.is_dev());
        assert_eq!(BuildMode::Production.node_env(), "production");
    }
}
