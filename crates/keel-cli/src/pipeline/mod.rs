//! The two target pipelines.
//!
//! Each pipeline owns exactly one build session for the lifetime of the
//! process and a listener implementing its post-build side effects. The
//! pipelines share the output directory root but write disjoint path sets,
//! so their hooks are safe to interleave in watch mode.

mod client;
mod server;

pub use client::ClientPipeline;
pub use server::ServerPipeline;

/// Debounce window for file-change events, per session.
pub(crate) const DEBOUNCE_MS: u64 = 200;
