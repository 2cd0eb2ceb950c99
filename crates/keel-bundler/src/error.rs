//! Error types for the compiler-session layer.

use thiserror::Error;

/// Errors produced while driving the external compiler or watching files.
#[derive(Debug, Error)]
pub enum BundleError {
    /// The compiler binary could not be found on PATH.
    #[error("compiler binary not found: {0}\n\nHint: install esbuild or pass --esbuild <path>")]
    CompilerNotFound(#[from] which::Error),

    /// The compiler ran but reported a build failure.
    #[error("build failed ({status}):\n{stderr}")]
    CompilerFailed {
        /// Exit status of the compiler process.
        status: std::process::ExitStatus,
        /// Captured compiler diagnostics.
        stderr: String,
    },

    /// The compiler's metafile could not be parsed.
    #[error("failed to parse build metafile: {0}")]
    Metafile(#[from] serde_json::Error),

    /// A post-build listener failed.
    ///
    /// Listener errors are opaque at this layer; the CLI attaches its own
    /// typed errors underneath.
    #[error("post-build hook failed: {0:#}")]
    Hook(anyhow::Error),

    /// File watching errors.
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// I/O errors from scratch-file and metafile handling.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`BundleError`] as the default error type.
pub type Result<T, E = BundleError> = std::result::Result<T, E>;
