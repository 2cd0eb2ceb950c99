//! Error types for the orchestrator.
//!
//! `FinalizeError` carries the post-build finalization failures; `CliError`
//! is the top-level type commands return, rendered through miette at the
//! binary boundary.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Compiler-session failures (compiler missing, build failed, watch).
    #[error(transparent)]
    Bundle(#[from] keel_bundler::BundleError),

    /// Post-build finalization failures.
    #[error(transparent)]
    Finalize(#[from] FinalizeError),

    /// Invalid command-line arguments or project layout.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures raised inside a post-build hook.
#[derive(Debug, Error)]
pub enum FinalizeError {
    /// The manifest contains no generated bundle file. Raised loudly so a
    /// template is never written with an unresolved placeholder.
    #[error("no generated bundle found in the output manifest\n\nHint: the compiler completed but produced no .js output; check the entry point")]
    MissingBundleArtifact,

    /// A required asset (the physics binary) is absent.
    #[error("required asset missing: {}\n\nHint: the server bundle cannot run without it", .0.display())]
    MissingRequiredAsset(PathBuf),

    /// I/O failure while copying assets or writing the rendered template.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`CliError`] as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert a CLI error into a miette report for terminal rendering.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    miette::miette!("{err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_bundle_message_names_the_manifest() {
        let msg = FinalizeError::MissingBundleArtifact.to_string();
        assert!(msg.contains("output manifest"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn missing_required_asset_names_the_path() {
        let err = FinalizeError::MissingRequiredAsset(PathBuf::from(
            "src/server/physx/physx-js-webidl.wasm",
        ));
        assert!(err.to_string().contains("physx-js-webidl.wasm"));
    }

    #[test]
    fn finalize_errors_convert_to_cli_errors() {
        let err: CliError = FinalizeError::MissingBundleArtifact.into();
        assert!(matches!(err, CliError::Finalize(_)));
    }
}
