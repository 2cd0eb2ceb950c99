//! Asset finalization helpers.
//!
//! Pure-ish side-effecting pieces the post-build hooks are assembled from,
//! kept free of any compiler coupling so template rendering and directory
//! handling are testable without running a build.

use std::fs;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Placeholder replaced with the generated bundle's path (first occurrence).
pub const BUNDLE_PATH_TOKEN: &str = "{jsFile}";
/// Placeholder replaced with the build identifier (every occurrence).
pub const BUILD_ID_TOKEN: &str = "{buildId}";

/// Remove and recreate a directory so no artifact from a prior run survives.
pub fn empty_dir(dir: &Path) -> io::Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)
}

/// Recursively copy `src` into `dst`, overwriting existing files.
pub fn copy_dir_all(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let dest = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &dest)?;
        } else {
            fs::copy(entry.path(), dest)?;
        }
    }
    Ok(())
}

/// Copy `src` to `dst` if it exists. A missing source is a silent no-op;
/// returns whether a copy happened.
pub fn copy_if_exists(src: &Path, dst: &Path) -> io::Result<bool> {
    if !src.exists() {
        return Ok(false);
    }
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)?;
    Ok(true)
}

/// Render the HTML template: the bundle-path token is replaced once, the
/// build-identifier token everywhere. Deterministic given its inputs.
pub fn render_template(template: &str, bundle_path: &str, build_id: &str) -> String {
    template
        .replacen(BUNDLE_PATH_TOKEN, bundle_path, 1)
        .replace(BUILD_ID_TOKEN, build_id)
}

/// Build identifier derived from the current time (milliseconds since the
/// unix epoch). Derived once per hook run so every occurrence in one
/// rendered document is identical.
pub fn build_id() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
        .to_string()
}
