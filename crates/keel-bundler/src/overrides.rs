//! Module-resolution overrides.
//!
//! A named capability can be substituted at resolution time with a local
//! replacement module. One replacement (the physics glue) additionally needs
//! its `import.meta.url` self-reference rewritten, because bundling wraps
//! the module such that the original expression would resolve to the wrong
//! location. The rewrite is scoped to exactly the module that opts in; it is
//! not a general transform.

use std::path::PathBuf;

/// One entry in the resolution override table: `specifier` resolves to
/// `replacement` instead of whatever the normal resolver would find.
#[derive(Debug, Clone)]
pub struct ResolveOverride {
    /// The logical import specifier being overridden.
    pub specifier: String,
    /// The local module that satisfies it.
    pub replacement: PathBuf,
    /// Apply [`rewrite_self_reference`] when materializing the replacement.
    pub rewrite_self_url: bool,
}

impl ResolveOverride {
    pub fn new(specifier: impl Into<String>, replacement: impl Into<PathBuf>) -> Self {
        Self {
            specifier: specifier.into(),
            replacement: replacement.into(),
            rewrite_self_url: false,
        }
    }

    /// Enable the scoped self-reference rewrite for this module.
    pub fn rewrite_self_url(mut self) -> Self {
        self.rewrite_self_url = true;
        self
    }
}

const SELF_REFERENCE: &str = "import.meta.url";
const SYNTHESIZED_URL: &str = "URL.createObjectURL(new Blob([]))";

/// Replace the module's dynamic self-reference with a synthesized in-memory
/// resource handle.
pub fn rewrite_self_reference(source: &str) -> String {
    source.replace(SELF_REFERENCE, SYNTHESIZED_URL)
}
