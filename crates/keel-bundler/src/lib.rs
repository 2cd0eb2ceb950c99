//! # keel-bundler
//!
//! Compiler-session layer for the keel build orchestrator.
//!
//! This crate owns everything between "a target's build configuration" and
//! "a parsed output manifest": locating the external `esbuild` compiler,
//! translating a [`BundleConfig`] into its command line, running it, and
//! feeding the resulting [`OutputManifest`] to the session's
//! [`BuildListener`]. It deliberately knows nothing about what the listener
//! does with the manifest: asset copying, HTML templating, and process
//! management live in the CLI crate.
//!
//! ## Quick start
//!
//! ```no_run
//! use keel_bundler::{
//!     BuildFlags, BuildMode, BuildSession, BundleConfig, Esbuild, Platform, TargetKind,
//! };
//!
//! # use keel_bundler::{BuildListener, OutputManifest};
//! # struct NoopListener;
//! # #[async_trait::async_trait]
//! # impl BuildListener for NoopListener {
//! #     async fn on_build_complete(&mut self, _: &OutputManifest) -> anyhow::Result<()> { Ok(()) }
//! # }
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let root = std::env::current_dir()?;
//! let compiler = Esbuild::locate(None, root.join(".keel"))?;
//!
//! let config = BundleConfig::new("client", "src/client/index.js")
//!     .out_dir("build/public")
//!     .entry_names("[name]-[hash]")
//!     .platform(Platform::Browser)
//!     .sourcemap(true)
//!     .flags(BuildFlags::new(BuildMode::Production, TargetKind::Client));
//!
//! let mut session = BuildSession::new(compiler, config, root, Box::new(NoopListener));
//! session.build().await?;
//! # Ok(()) }
//! ```

mod compiler;
mod config;
mod error;
mod manifest;
mod overrides;
mod session;
mod watcher;

pub use compiler::Esbuild;
pub use config::{BuildFlags, BuildMode, BundleConfig, OutputFormat, Platform, TargetKind};
pub use error::{BundleError, Result};
pub use manifest::{OutputEntry, OutputManifest};
pub use overrides::{rewrite_self_reference, ResolveOverride};
pub use session::{BuildListener, BuildSession};
pub use watcher::{FileChange, FileWatcher};
