//! In-memory virtual file set handed to the bundler
//!
//! Paths are package-relative and always use `/` separators, independent of
//! the host platform.

use indexmap::IndexMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Virtual path of the hand-authored base component
pub const BASE_COMPONENT_PATH: &str = "Icon.js";

/// Virtual path of the root aggregate
pub const ROOT_PATH: &str = "index.js";

/// Directory holding the bucket aggregates
pub const GENERATED_DIR: &str = "__generated__";

/// Fallback base component used when the project does not provide one
pub const DEFAULT_BASE_COMPONENT: &str = include_str!("../assets/Icon.js");

/// Ordered mapping of virtual path → source text plus the entry points
#[derive(Debug, Clone, Default)]
pub struct VirtualFileSet {
    files: IndexMap<String, String>,
    entries: Vec<String>,
}

impl VirtualFileSet {
    /// Create an empty file set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, failing if the path is already taken
    ///
    /// Paths must stay below the package root: absolute paths and `..`
    /// segments are rejected.
    pub fn insert_new(&mut self, path: impl Into<String>, source: impl Into<String>) -> Result<()> {
        let path = normalize(&path.into());
        if !is_contained(&path) {
            return Err(Error::InvalidPath { path });
        }
        if self.files.contains_key(&path) {
            return Err(Error::DuplicatePath { path });
        }
        self.files.insert(path, source.into());
        Ok(())
    }

    /// Add a file that is also a bundler entry point
    pub fn insert_entry(&mut self, path: impl Into<String>, source: impl Into<String>) -> Result<()> {
        let path = normalize(&path.into());
        self.insert_new(path.clone(), source)?;
        self.entries.push(path);
        Ok(())
    }

    /// Append text to an existing file
    pub fn append(&mut self, path: &str, text: &str) -> Result<()> {
        let source = self
            .files
            .get_mut(path)
            .ok_or_else(|| Error::MissingVirtualFile {
                path: path.to_string(),
            })?;
        source.push_str(text);
        Ok(())
    }

    /// Source text of a file
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(&normalize(path)).map(String::as_str)
    }

    /// Whether a path exists in the set
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(&normalize(path))
    }

    /// Entry points in insertion order
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Iterate `(path, source)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the set has no files
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check that every entry point and every listed import target exists
    pub fn verify(&self, imports: &[&str]) -> Result<()> {
        let referenced = self.entries.iter().map(String::as_str).chain(imports.iter().copied());
        for path in referenced {
            if !self.contains(path) {
                return Err(Error::MissingVirtualFile {
                    path: path.to_string(),
                });
            }
        }
        Ok(())
    }

    /// SHA-256 over every path, source and entry, in order
    pub fn content_hash(&self) -> String {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        for (path, source) in &self.files {
            hasher.update(path.as_bytes());
            hasher.update([0u8]);
            hasher.update(source.as_bytes());
            hasher.update([0u8]);
        }
        for entry in &self.entries {
            hasher.update(entry.as_bytes());
            hasher.update([0u8]);
        }

        hex::encode(hasher.finalize())
    }

    /// Write every file below `dir`, creating directories as needed
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        for (path, source) in &self.files {
            let target = dir.join(path);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&target, source)?;
            tracing::debug!("Wrote {}", target.display());
        }
        Ok(())
    }

    /// Async counterpart of [`write_to`](Self::write_to)
    pub async fn stage_to(&self, dir: &Path) -> Result<()> {
        for (path, source) in &self.files {
            let target = dir.join(path);
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&target, source).await?;
        }
        tracing::debug!("Staged {} files in {}", self.files.len(), dir.display());
        Ok(())
    }
}

fn is_contained(path: &str) -> bool {
    !path.is_empty()
        && !path.starts_with('/')
        && !Path::new(path).is_absolute()
        && path.split('/').all(|segment| segment != ".." && !segment.contains(':'))
}

fn normalize(path: &str) -> String {
    path.trim_start_matches("./").replace('\\', "/")
}

/// ES module specifier importing `to` from the module at `from`
///
/// Both arguments are package-relative virtual paths.
pub fn relative_specifier(from: &str, to: &str) -> String {
    let from = normalize(from);
    let to = normalize(to);

    let mut from_dirs: Vec<&str> = from.split('/').collect();
    from_dirs.pop();
    let to_parts: Vec<&str> = to.split('/').collect();

    let common = from_dirs
        .iter()
        .zip(&to_parts[..to_parts.len() - 1])
        .take_while(|(a, b)| a == b)
        .count();

    let ups = from_dirs.len() - common;
    let rest = to_parts[common..].join("/");

    if ups == 0 {
        format!("./{}", rest)
    } else {
        format!("{}{}", "../".repeat(ups), rest)
    }
}
