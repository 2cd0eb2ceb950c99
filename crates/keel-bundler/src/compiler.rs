//! External compiler driver.
//!
//! The bundler itself is an external collaborator: the real `esbuild`
//! binary, driven through its command line. This module locates the binary,
//! translates a [`BundleConfig`] into an argument vector, runs the compiler
//! with a metafile enabled, and parses the metafile back into an
//! [`OutputManifest`].

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::config::BundleConfig;
use crate::error::{BundleError, Result};
use crate::manifest::OutputManifest;
use crate::overrides::rewrite_self_reference;

const COMPILER_BINARY: &str = "esbuild";

/// Handle to the external compiler plus the scratch directory used for
/// metafiles and materialized override modules.
#[derive(Debug, Clone)]
pub struct Esbuild {
    binary: PathBuf,
    scratch_dir: PathBuf,
}

impl Esbuild {
    /// Locate the compiler binary.
    ///
    /// An explicit path wins; otherwise the binary is resolved from PATH.
    pub fn locate(explicit: Option<&Path>, scratch_dir: impl Into<PathBuf>) -> Result<Self> {
        let binary = match explicit {
            Some(path) => path.to_path_buf(),
            None => which::which(COMPILER_BINARY)?,
        };
        Ok(Self {
            binary,
            scratch_dir: scratch_dir.into(),
        })
    }

    /// Path of the compiler binary in use.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Run one build and parse the resulting manifest.
    ///
    /// `cwd` is the project root; config paths and manifest output paths are
    /// relative to it.
    pub async fn run(&self, config: &BundleConfig, cwd: &Path) -> Result<OutputManifest> {
        std::fs::create_dir_all(&self.scratch_dir)?;

        let aliases = self.materialize_overrides(config, cwd)?;
        let metafile = self.scratch_dir.join(format!("{}.metafile.json", config.name()));
        let args = build_args(config, &aliases, &metafile);

        debug!(target = config.name(), ?args, "invoking compiler");

        let output = Command::new(&self.binary)
            .args(&args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(BundleError::CompilerFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let json = std::fs::read_to_string(&metafile)?;
        Ok(OutputManifest::from_json(&json)?)
    }

    /// Materialize override modules into the scratch directory and return
    /// the (specifier, resolved path) alias pairs to pass to the compiler.
    ///
    /// Modules that opt into the self-reference rewrite are copied through
    /// [`rewrite_self_reference`]; the rest alias to their source directly.
    /// Materialization runs on every build so edits to the replacement
    /// module are picked up by the next rebuild.
    fn materialize_overrides(
        &self,
        config: &BundleConfig,
        cwd: &Path,
    ) -> Result<Vec<(String, PathBuf)>> {
        let mut aliases = Vec::with_capacity(config.overrides.len());
        for rule in &config.overrides {
            let source_path = if rule.replacement.is_absolute() {
                rule.replacement.clone()
            } else {
                cwd.join(&rule.replacement)
            };

            let resolved = if rule.rewrite_self_url {
                let file_name = rule
                    .replacement
                    .file_name()
                    .ok_or_else(|| invalid_override(&rule.specifier))?;
                let source = std::fs::read_to_string(&source_path)?;
                // Written as .mjs: the rewritten copy must stay on the
                // plain js loader even when the config maps .js elsewhere
                // (the client maps .js to jsx).
                let dest = self.scratch_dir.join(file_name).with_extension("mjs");
                std::fs::write(&dest, rewrite_self_reference(&source))?;
                dest
            } else {
                source_path
            };

            aliases.push((rule.specifier.clone(), resolved));
        }
        Ok(aliases)
    }
}

fn invalid_override(specifier: &str) -> BundleError {
    BundleError::Io(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        format!("resolution override for '{specifier}' has no file name"),
    ))
}

/// Translate a config into the compiler's argument vector.
///
/// Pure; separated from [`Esbuild::run`] so the translation is testable
/// without a compiler installed.
pub(crate) fn build_args(
    config: &BundleConfig,
    aliases: &[(String, PathBuf)],
    metafile: &Path,
) -> Vec<String> {
    let mut args = vec![config.entry().display().to_string()];

    if config.bundle {
        args.push("--bundle".into());
    }
    args.push(format!("--format={}", config.format.as_str()));
    args.push(format!("--platform={}", config.platform.as_str()));

    if let Some(dir) = &config.out_dir {
        args.push(format!("--outdir={}", dir.display()));
    }
    if let Some(file) = &config.out_file {
        args.push(format!("--outfile={}", file.display()));
    }
    if let Some(pattern) = &config.entry_names {
        args.push(format!("--entry-names={pattern}"));
    }

    args.push(format!("--tree-shaking={}", config.tree_shaking));
    if config.minify {
        args.push("--minify".into());
    }
    if config.sourcemap {
        args.push("--sourcemap".into());
    }
    if config.packages_external {
        args.push("--packages=external".into());
    }

    if config.jsx_automatic {
        args.push("--jsx=automatic".into());
        if let Some(source) = &config.jsx_import_source {
            args.push(format!("--jsx-import-source={source}"));
        }
    }

    for (ext, loader) in &config.loaders {
        args.push(format!("--loader:{ext}={loader}"));
    }
    for (key, value) in &config.defines {
        args.push(format!("--define:{key}={value}"));
    }
    for (specifier, path) in aliases {
        args.push(format!("--alias:{specifier}={}", path.display()));
    }

    args.push(format!("--metafile={}", metafile.display()));
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildFlags, BuildMode, Platform, TargetKind};

    fn client_config() -> BundleConfig {
        BundleConfig::new("client", "src/client/index.js")
            .out_dir("build/public")
            .entry_names("[name]-[hash]")
            .platform(Platform::Browser)
            .sourcemap(true)
            .jsx_automatic("@firebolt-dev/jsx")
            .loader(".js", "jsx")
            .flags(BuildFlags::new(BuildMode::Production, TargetKind::Client))
    }

    #[test]
    fn client_args_shape() {
        let metafile = Path::new(".keel/client.metafile.json");
        let aliases = vec![(
            "physx-js-webidl".to_string(),
            PathBuf::from("/project/.keel/physx-js-webidl.js"),
        )];
        let args = build_args(&client_config(), &aliases, metafile);

        assert_eq!(args[0], "src/client/index.js");
        assert!(args.contains(&"--bundle".to_string()));
        assert!(args.contains(&"--format=esm".to_string()));
        assert!(args.contains(&"--platform=browser".to_string()));
        assert!(args.contains(&"--outdir=build/public".to_string()));
        assert!(args.contains(&"--entry-names=[name]-[hash]".to_string()));
        assert!(args.contains(&"--sourcemap".to_string()));
        assert!(args.contains(&"--tree-shaking=true".to_string()));
        assert!(args.contains(&"--jsx=automatic".to_string()));
        assert!(args.contains(&"--jsx-import-source=@firebolt-dev/jsx".to_string()));
        assert!(args.contains(&"--loader:.js=jsx".to_string()));
        assert!(args.contains(&"--define:process.env.NODE_ENV=\"production\"".to_string()));
        assert!(args.contains(&"--define:process.env.CLIENT=true".to_string()));
        assert!(args
            .contains(&"--alias:physx-js-webidl=/project/.keel/physx-js-webidl.js".to_string()));
        assert!(args.contains(&"--metafile=.keel/client.metafile.json".to_string()));
        assert!(!args.iter().any(|a| a == "--minify"));
    }

    #[test]
    fn server_args_shape() {
        let config = BundleConfig::new("server", "src/server/index.js")
            .out_file("build/index.js")
            .platform(Platform::Node)
            .sourcemap(true)
            .packages_external(true)
            .flags(BuildFlags::new(BuildMode::Development, TargetKind::Server));
        let args = build_args(&config, &[], Path::new(".keel/server.metafile.json"));

        assert!(args.contains(&"--platform=node".to_string()));
        assert!(args.contains(&"--outfile=build/index.js".to_string()));
        assert!(args.contains(&"--packages=external".to_string()));
        assert!(args.contains(&"--define:process.env.SERVER=true".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("--outdir")));
        assert!(!args.iter().any(|a| a.starts_with("--jsx")));
    }

    #[test]
    fn locate_prefers_explicit_path() {
        let compiler =
            Esbuild::locate(Some(Path::new("/opt/esbuild/bin/esbuild")), ".keel").unwrap();
        assert_eq!(compiler.binary(), Path::new("/opt/esbuild/bin/esbuild"));
    }

    #[test]
    fn materializes_rewritten_override() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let glue_dir = root.join("src/server/physx");
        std::fs::create_dir_all(&glue_dir).unwrap();
        std::fs::write(
            glue_dir.join("physx-js-webidl.js"),
            "const url = import.meta.url;\n",
        )
        .unwrap();

        let compiler = Esbuild {
            binary: PathBuf::from("/nonexistent/esbuild"),
            scratch_dir: root.join(".keel"),
        };
        let config = BundleConfig::new("client", "src/client/index.js").resolve_override(
            crate::overrides::ResolveOverride::new(
                "physx-js-webidl",
                "src/server/physx/physx-js-webidl.js",
            )
            .rewrite_self_url(),
        );

        std::fs::create_dir_all(root.join(".keel")).unwrap();
        let aliases = compiler.materialize_overrides(&config, root).unwrap();
        assert_eq!(aliases.len(), 1);

        let materialized = std::fs::read_to_string(&aliases[0].1).unwrap();
        assert!(!materialized.contains("import.meta.url"));
        assert!(materialized.contains("URL.createObjectURL"));
    }

    #[test]
    fn materialized_override_dodges_extension_loader_mappings() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let glue_dir = root.join("src/server/physx");
        std::fs::create_dir_all(&glue_dir).unwrap();
        std::fs::write(glue_dir.join("physx-js-webidl.js"), "export {};\n").unwrap();

        let compiler = Esbuild {
            binary: PathBuf::from("/nonexistent/esbuild"),
            scratch_dir: root.join(".keel"),
        };
        let config = BundleConfig::new("client", "src/client/index.js")
            .loader(".js", "jsx")
            .resolve_override(
                crate::overrides::ResolveOverride::new(
                    "physx-js-webidl",
                    "src/server/physx/physx-js-webidl.js",
                )
                .rewrite_self_url(),
            );

        std::fs::create_dir_all(root.join(".keel")).unwrap();
        let aliases = compiler.materialize_overrides(&config, root).unwrap();

        // The .js -> jsx mapping must not catch the rewritten copy.
        assert_eq!(
            aliases[0].1.extension().and_then(|e| e.to_str()),
            Some("mjs")
        );
    }
}
