//! External bundler seam
//!
//! Bundling and transpilation are delegated. A [`Bundler`] receives the
//! virtual file set with its entry points and external modules, and returns
//! a [`Bundle`] that can be written once per output target.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::files::{ROOT_PATH, VirtualFileSet};

/// Module format of a library output directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    /// ES modules
    Esm,
    /// CommonJS
    CommonJs,
}

/// Where and how a bundle is written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum OutputOptions {
    /// One output file per entry point in `dir`
    Library {
        /// Output directory
        dir: PathBuf,
        /// Module format
        format: ModuleFormat,
        /// Entry file naming pattern
        entry_file_names: String,
        /// Banner prepended to every chunk
        banner: String,
        /// Export mode
        exports: String,
    },
    /// A single self-contained file assigning to a global
    Universal {
        /// Output file
        file: PathBuf,
        /// Global variable name
        name: String,
        /// Global names of the external modules
        globals: BTreeMap<String, String>,
    },
}

impl OutputOptions {
    /// Library output preserving entry names
    pub fn library(dir: impl Into<PathBuf>, format: ModuleFormat, banner: &str) -> Self {
        OutputOptions::Library {
            dir: dir.into(),
            format,
            entry_file_names: "[name]".to_string(),
            banner: banner.to_string(),
            exports: "auto".to_string(),
        }
    }
}

/// Bundler input: entry points, externals and the virtual sources
#[derive(Debug, Clone)]
pub struct BundleInput<'a> {
    /// Entry name → virtual path
    pub input: IndexMap<String, String>,

    /// Module specifiers left unresolved
    pub external: Vec<String>,

    /// Virtual sources served to the bundler
    pub files: &'a VirtualFileSet,
}

impl<'a> BundleInput<'a> {
    /// Every entry point of the file set
    pub fn library(files: &'a VirtualFileSet, external: &[String]) -> Self {
        Self {
            input: files
                .entries()
                .iter()
                .map(|path| (path.clone(), path.clone()))
                .collect(),
            external: external.to_vec(),
            files,
        }
    }

    /// Only the root aggregate
    pub fn universal(files: &'a VirtualFileSet, external: &[String]) -> Self {
        Self {
            input: IndexMap::from([(ROOT_PATH.to_string(), ROOT_PATH.to_string())]),
            external: external.to_vec(),
            files,
        }
    }
}

/// Produces bundles from virtual sources
#[async_trait]
pub trait Bundler: Send + Sync {
    /// Resolve and compile `input` into a writable bundle
    async fn bundle(&self, input: BundleInput<'_>) -> Result<Box<dyn Bundle>>;

    /// Identity of this bundler and its settings
    ///
    /// Part of the build stamp: outputs written by one bundler are never
    /// reused for another.
    fn fingerprint(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// A compiled bundle
#[async_trait]
pub trait Bundle: Send + Sync {
    /// Write the bundle for one output target
    async fn write(&self, options: &OutputOptions) -> Result<()>;
}

/// Runs an external bundler command against a staged copy of the sources
///
/// For every write the command is invoked as `<command> <args...> <manifest>`
/// where the manifest is a JSON document describing the staged root, the
/// entry points, the externals and the output target.
#[derive(Debug, Clone)]
pub struct CommandBundler {
    command: String,
    args: Vec<String>,
    staging_dir: PathBuf,
}

impl CommandBundler {
    /// Create a bundler staging sources below `staging_dir`
    pub fn new(command: impl Into<String>, args: Vec<String>, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            args,
            staging_dir: staging_dir.into(),
        }
    }
}

#[async_trait]
impl Bundler for CommandBundler {
    fn fingerprint(&self) -> String {
        let mut parts = vec!["command", self.command.as_str()];
        parts.extend(self.args.iter().map(String::as_str));
        parts.join("\0")
    }

    async fn bundle(&self, input: BundleInput<'_>) -> Result<Box<dyn Bundle>> {
        if self.staging_dir.exists() {
            tokio::fs::remove_dir_all(&self.staging_dir).await?;
        }
        tokio::fs::create_dir_all(&self.staging_dir).await?;
        input.files.stage_to(&self.staging_dir).await?;

        tracing::debug!(
            "Staged {} files for {} entries in {}",
            input.files.len(),
            input.input.len(),
            self.staging_dir.display()
        );

        Ok(Box::new(StagedBundle {
            command: self.command.clone(),
            args: self.args.clone(),
            root: self.staging_dir.clone(),
            input: input.input,
            external: input.external,
        }))
    }
}

struct StagedBundle {
    command: String,
    args: Vec<String>,
    root: PathBuf,
    input: IndexMap<String, String>,
    external: Vec<String>,
}

#[derive(Serialize)]
struct Manifest<'a> {
    root: &'a Path,
    input: &'a IndexMap<String, String>,
    external: &'a [String],
    output: &'a OutputOptions,
}

#[async_trait]
impl Bundle for StagedBundle {
    async fn write(&self, options: &OutputOptions) -> Result<()> {
        let manifest = Manifest {
            root: &self.root,
            input: &self.input,
            external: &self.external,
            output: options,
        };
        let manifest_path = self.root.join("bundle-manifest.json");
        tokio::fs::write(&manifest_path, serde_json::to_vec_pretty(&manifest)?).await?;

        tracing::debug!("Running bundler: {} {:?}", self.command, self.args);

        let output = Command::new(&self.command)
            .args(&self.args)
            .arg(&manifest_path)
            .output()
            .await
            .map_err(|e| Error::ToolchainError {
                message: format!("Failed to run {}: {}", self.command, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::BundleError {
                message: format!("{} exited with {}", self.command, output.status),
                stderr: Some(stderr.to_string()),
            });
        }

        Ok(())
    }
}

/// Writes the generated sources untouched
///
/// Library targets receive every virtual file; universal targets receive the
/// root aggregate. Useful for inspecting generated output and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughBundler;

#[async_trait]
impl Bundler for PassthroughBundler {
    fn fingerprint(&self) -> String {
        "passthrough".to_string()
    }

    async fn bundle(&self, input: BundleInput<'_>) -> Result<Box<dyn Bundle>> {
        let files = input
            .files
            .iter()
            .map(|(path, source)| (path.to_string(), source.to_string()))
            .collect();
        Ok(Box::new(PassthroughBundle { files }))
    }
}

struct PassthroughBundle {
    files: Vec<(String, String)>,
}

#[async_trait]
impl Bundle for PassthroughBundle {
    async fn write(&self, options: &OutputOptions) -> Result<()> {
        match options {
            OutputOptions::Library { dir, .. } => {
                for (path, source) in &self.files {
                    let target = dir.join(path);
                    if let Some(parent) = target.parent() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                    tokio::fs::write(&target, source).await?;
                }
            }
            OutputOptions::Universal { file, .. } => {
                let root = self
                    .files
                    .iter()
                    .find(|(path, _)| path == ROOT_PATH)
                    .ok_or_else(|| Error::MissingVirtualFile {
                        path: ROOT_PATH.to_string(),
                    })?;
                if let Some(parent) = file.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::write(file, &root.1).await?;
            }
        }
        Ok(())
    }
}
