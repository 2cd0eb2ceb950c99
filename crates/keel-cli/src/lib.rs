//! keel CLI library.
//!
//! Exposed as a library so integration tests and the thin `main.rs` binary
//! share the same modules.

pub mod assets;
pub mod cli;
pub mod commands;
pub mod error;
pub mod layout;
pub mod logger;
pub mod pipeline;
pub mod process;
pub mod ui;
