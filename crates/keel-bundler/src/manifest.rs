//! Output manifest parsing.
//!
//! Every completed build writes a metafile describing the outputs it
//! produced. The manifest is regenerated wholesale each build; nothing here
//! merges state across builds. Hooks use it to locate generated artifacts by
//! role (extension) rather than by guessing hashed filenames.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

/// A build's record of every output file it produced.
///
/// Keys are output paths relative to the session's working directory, e.g.
/// `build/public/index-9F3AC1.js`.
#[derive(Debug, Default, Deserialize)]
pub struct OutputManifest {
    #[serde(default)]
    outputs: BTreeMap<String, OutputEntry>,
}

/// Per-output metadata; only the fields the orchestrator reads.
#[derive(Debug, Default, Deserialize)]
pub struct OutputEntry {
    #[serde(default, rename = "entryPoint")]
    pub entry_point: Option<String>,
    #[serde(default)]
    pub bytes: u64,
}

impl OutputManifest {
    /// Parse a compiler metafile.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Number of output files in this build.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Output paths, in deterministic (sorted) order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.outputs.keys().map(String::as_str)
    }

    /// Find the first output whose path ends with `ext`.
    ///
    /// Note `.js` does not match source maps: `index.js.map` does not end
    /// with `.js`.
    pub fn find_by_extension(&self, ext: &str) -> Option<&str> {
        self.paths().find(|p| p.ends_with(ext))
    }

    /// Metadata for a specific output path.
    pub fn output(&self, path: impl AsRef<Path>) -> Option<&OutputEntry> {
        self.outputs.get(path.as_ref().to_string_lossy().as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "inputs": {
            "src/client/index.js": { "bytes": 1204 }
        },
        "outputs": {
            "build/public/index-9F3AC1.js": {
                "entryPoint": "src/client/index.js",
                "bytes": 52110
            },
            "build/public/index-9F3AC1.js.map": { "bytes": 91832 }
        }
    }"#;

    #[test]
    fn parses_metafile_outputs() {
        let manifest = OutputManifest::from_json(SAMPLE).unwrap();
        assert_eq!(manifest.len(), 2);

        let entry = manifest.output("build/public/index-9F3AC1.js").unwrap();
        assert_eq!(entry.entry_point.as_deref(), Some("src/client/index.js"));
        assert_eq!(entry.bytes, 52110);
    }

    #[test]
    fn bundle_lookup_skips_source_maps() {
        let manifest = OutputManifest::from_json(SAMPLE).unwrap();
        assert_eq!(
            manifest.find_by_extension(".js"),
            Some("build/public/index-9F3AC1.js")
        );
    }

    #[test]
    fn empty_manifest_has_no_bundle() {
        let manifest = OutputManifest::from_json(r#"{ "outputs": {} }"#).unwrap();
        assert!(manifest.is_empty());
        assert_eq!(manifest.find_by_extension(".js"), None);
    }

    #[test]
    fn missing_outputs_key_defaults_empty() {
        let manifest = OutputManifest::from_json("{}").unwrap();
        assert!(manifest.is_empty());
    }
}
