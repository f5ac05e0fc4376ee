//! Layered output assembly
//!
//! A single entrypoint re-exporting thousands of components is too large for
//! most tooling, while re-exporting every standalone module is slow to
//! resolve. The assembler takes the middle road:
//!
//! ```text
//! index.js ──▶ __generated__/bucket-0.js   (250 flat components)
//!          ──▶ __generated__/bucket-1.js   (250 flat components)
//!          ──▶ ...
//! Add16.js, Add20.js, ...                  (standalone entrypoints)
//! ```

use std::collections::HashMap;

use crate::bucket::{bucket_path, partition};
use crate::component::WarningGuard;
use crate::error::{Error, Result};
use crate::files::{BASE_COMPONENT_PATH, ROOT_PATH, VirtualFileSet, relative_specifier};
use crate::planner::ModuleJob;

/// Assembled virtual output
#[derive(Debug, Clone)]
pub struct Assembly {
    /// Every generated file plus the base component
    pub files: VirtualFileSet,

    /// Number of module jobs
    pub module_count: usize,

    /// Number of bucket aggregates
    pub bucket_count: usize,
}

/// Builds the per-module, per-bucket and root files
pub struct Assembler<'a> {
    banner: &'a str,
    bucket_size: usize,
    base_component: &'a str,
}

impl<'a> Assembler<'a> {
    /// Create an assembler
    pub fn new(banner: &'a str, bucket_size: usize, base_component: &'a str) -> Self {
        Self {
            banner,
            bucket_size,
            base_component,
        }
    }

    /// Assemble the virtual file set for `jobs`
    ///
    /// Entries are ordered root first, then the standalone modules, then the
    /// buckets. Duplicate module names or file paths are rejected.
    pub fn assemble(&self, jobs: &[ModuleJob]) -> Result<Assembly> {
        check_unique_names(jobs)?;
        let buckets = partition(jobs, self.bucket_size)?;

        let mut files = VirtualFileSet::new();
        files.insert_entry(ROOT_PATH, self.root_header())?;

        for job in jobs {
            files.insert_entry(job.filepath.as_str(), job.entrypoint.as_str())?;
        }

        let mut bucket_paths = Vec::with_capacity(buckets.len());
        for (index, bucket) in buckets.iter().enumerate() {
            let path = bucket_path(index);
            let mut source = self.bucket_header(&path);

            for job in bucket.iter() {
                source.push('\n');
                source.push_str(&job.flat_export);
                source.push_str(&format!("export {{ {} }};\n", job.module_name));

                files.append(
                    ROOT_PATH,
                    &format!(
                        "export {{ {} }} from '{}';\n",
                        job.module_name,
                        relative_specifier(ROOT_PATH, &path)
                    ),
                )?;
            }

            tracing::debug!("Assembled {} ({} modules)", path, bucket.len());
            files.insert_entry(path.as_str(), source)?;
            bucket_paths.push(path);
        }

        files.insert_new(BASE_COMPONENT_PATH, self.base_component)?;

        let mut imports: Vec<&str> = bucket_paths.iter().map(String::as_str).collect();
        imports.push(BASE_COMPONENT_PATH);
        files.verify(&imports)?;

        tracing::info!(
            "Assembled {} modules into {} buckets ({} files)",
            jobs.len(),
            buckets.len(),
            files.len()
        );

        Ok(Assembly {
            files,
            module_count: jobs.len(),
            bucket_count: buckets.len(),
        })
    }

    fn root_header(&self) -> String {
        format!(
            "{}\n\nexport {{ default as Icon }} from '{}';\n",
            self.banner,
            relative_specifier(ROOT_PATH, BASE_COMPONENT_PATH)
        )
    }

    fn bucket_header(&self, path: &str) -> String {
        format!(
            "{banner}\n\nimport React from 'react';\nimport Icon from '{icon}';\n\n{guard}\n",
            banner = self.banner,
            icon = relative_specifier(path, BASE_COMPONENT_PATH),
            guard = WarningGuard::Shared.declaration(),
        )
    }
}

fn check_unique_names(jobs: &[ModuleJob]) -> Result<()> {
    let mut seen: HashMap<&str, &str> = HashMap::with_capacity(jobs.len());
    for job in jobs {
        if let Some(first) = seen.insert(&job.module_name, &job.filepath) {
            return Err(Error::DuplicateModule {
                module_name: job.module_name.clone(),
                first: first.to_string(),
                second: job.filepath.clone(),
            });
        }
    }
    Ok(())
}
