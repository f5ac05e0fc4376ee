//! Output driver
//!
//! Plans and assembles the virtual file set, then hands it to a [`Bundler`]
//! for the library formats and the universal bundle.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glyphweave_core::config::DEFAULT_BUCKET_SIZE;
use glyphweave_core::{Catalog, Config};

use crate::assembler::{Assembler, Assembly};
use crate::bundler::{BundleInput, Bundler, ModuleFormat, OutputOptions};
use crate::error::{Error, Result};
use crate::files::{DEFAULT_BASE_COMPONENT, GENERATED_DIR};
use crate::planner::ModulePlanner;

/// File below the output root recording the last successful build
pub const STAMP_FILE: &str = ".glyphweave-hash";

/// Library output directories and their module formats
pub const LIBRARY_TARGETS: [(&str, ModuleFormat); 2] =
    [("es", ModuleFormat::Esm), ("lib", ModuleFormat::CommonJs)];

/// Universal bundle path below the output root
pub const UNIVERSAL_FILE: &str = "umd/index.js";

/// Options for a build
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Output root
    pub output_dir: PathBuf,

    /// Maximum modules per bucket file
    pub bucket_size: usize,

    /// Banner for every generated file and bundle chunk
    pub banner: String,

    /// Package named in deprecation warnings
    pub package: String,

    /// Base `Icon` component source
    pub base_component: String,

    /// Modules left external by the bundler
    pub externals: Vec<String>,

    /// Global name of the universal bundle
    pub universal_name: String,

    /// Global names of the external modules in the universal bundle
    pub globals: BTreeMap<String, String>,

    /// Whether to bundle even when the build stamp matches
    pub force: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dist"),
            bucket_size: DEFAULT_BUCKET_SIZE,
            banner: String::new(),
            package: "icons".to_string(),
            base_component: DEFAULT_BASE_COMPONENT.to_string(),
            externals: Vec::new(),
            universal_name: "Icons".to_string(),
            globals: BTreeMap::new(),
            force: false,
        }
    }
}

impl BuildOptions {
    /// Options derived from a loaded project configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let project = &config.project;
        Ok(Self {
            output_dir: config.output_dir(),
            bucket_size: project.bucket_size,
            banner: config.render_banner()?,
            package: project.name.clone(),
            base_component: config
                .load_base_component()?
                .unwrap_or_else(|| DEFAULT_BASE_COMPONENT.to_string()),
            externals: project.externals.clone(),
            universal_name: project.universal.name.clone(),
            globals: project.universal.globals.clone(),
            force: false,
        })
    }
}

/// Summary of a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Number of generated components
    pub module_count: usize,

    /// Number of bucket files
    pub bucket_count: usize,

    /// Number of virtual files handed to the bundler
    pub file_count: usize,

    /// Build key: generated sources, bundler and output targets
    pub hash: String,

    /// Whether bundling was skipped because the stamp matched
    pub skipped: bool,
}

/// Drives generation and bundling
pub struct Builder {
    options: BuildOptions,
}

impl Builder {
    /// Create a builder with the given options
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Build options in use
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Plan and assemble the virtual file set without bundling
    pub fn generate(&self, catalog: &Catalog) -> Result<Assembly> {
        let planner = ModulePlanner::new(&self.options.banner, &self.options.package);
        let jobs = planner.plan(catalog);

        Assembler::new(
            &self.options.banner,
            self.options.bucket_size,
            &self.options.base_component,
        )
        .assemble(&jobs)
    }

    /// Write the unbundled virtual file set below `dir`
    pub fn emit(&self, catalog: &Catalog, dir: &Path) -> Result<Assembly> {
        let assembly = self.generate(catalog)?;
        assembly.files.write_to(dir)?;
        tracing::info!(
            "Emitted {} files to {}",
            assembly.files.len(),
            dir.display()
        );
        Ok(assembly)
    }

    /// Generate and bundle every output target
    ///
    /// The library bundle is written as ES modules to `es/` and CommonJS to
    /// `lib/`, each followed by pruning stray directories. The universal
    /// bundle is written to `umd/index.js`. Targets run strictly in sequence.
    pub async fn build(&self, catalog: &Catalog, bundler: &dyn Bundler) -> Result<BuildReport> {
        let assembly = self.generate(catalog)?;
        let output_dir = &self.options.output_dir;

        let library_targets: Vec<OutputOptions> = LIBRARY_TARGETS
            .iter()
            .map(|(subdir, format)| {
                OutputOptions::library(output_dir.join(subdir), *format, &self.options.banner)
            })
            .collect();
        let universal_target = OutputOptions::Universal {
            file: output_dir.join(UNIVERSAL_FILE),
            name: self.options.universal_name.clone(),
            globals: self.options.globals.clone(),
        };

        let mut report = BuildReport {
            module_count: assembly.module_count,
            bucket_count: assembly.bucket_count,
            file_count: assembly.files.len(),
            hash: self.build_key(&assembly, bundler, &library_targets, &universal_target)?,
            skipped: false,
        };

        if !self.options.force && self.is_up_to_date(&report.hash) {
            tracing::info!("Output is up to date ({}...)", &report.hash[..8]);
            report.skipped = true;
            return Ok(report);
        }

        // Outputs are about to change; a failure from here on must not
        // leave a stamp vouching for them.
        remove_stamp(output_dir)?;

        let library = bundler
            .bundle(BundleInput::library(&assembly.files, &self.options.externals))
            .await?;

        for target in &library_targets {
            if let OutputOptions::Library { dir, format, .. } = target {
                tracing::info!("Writing {:?} bundle to {}", format, dir.display());
                let written = library.write(target).await;
                let pruned = prune_stray_dirs(dir);
                first_error(written, pruned)?;
            }
        }

        let universal = bundler
            .bundle(BundleInput::universal(&assembly.files, &self.options.externals))
            .await?;
        if let OutputOptions::Universal { file, .. } = &universal_target {
            tracing::info!("Writing universal bundle to {}", file.display());
        }
        universal.write(&universal_target).await?;

        std::fs::create_dir_all(output_dir)?;
        std::fs::write(output_dir.join(STAMP_FILE), &report.hash)?;

        tracing::info!(
            "Built {} modules in {} buckets",
            report.module_count,
            report.bucket_count
        );
        Ok(report)
    }

    /// SHA-256 over the generated sources, the bundler identity, the
    /// externals and every output target
    fn build_key(
        &self,
        assembly: &Assembly,
        bundler: &dyn Bundler,
        library_targets: &[OutputOptions],
        universal_target: &OutputOptions,
    ) -> Result<String> {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(assembly.files.content_hash().as_bytes());
        hasher.update([0u8]);
        hasher.update(bundler.fingerprint().as_bytes());
        hasher.update([0u8]);
        hasher.update(serde_json::to_vec(&self.options.externals)?);
        hasher.update([0u8]);
        hasher.update(serde_json::to_vec(library_targets)?);
        hasher.update([0u8]);
        hasher.update(serde_json::to_vec(universal_target)?);

        Ok(hex::encode(hasher.finalize()))
    }

    fn is_up_to_date(&self, hash: &str) -> bool {
        let output_dir = &self.options.output_dir;
        let stamp = std::fs::read_to_string(output_dir.join(STAMP_FILE)).ok();
        let outputs_exist = LIBRARY_TARGETS
            .iter()
            .all(|(subdir, _)| output_dir.join(subdir).is_dir())
            && output_dir.join(UNIVERSAL_FILE).is_file();

        outputs_exist && stamp.as_deref().map(str::trim) == Some(hash)
    }
}

fn remove_stamp(output_dir: &Path) -> Result<()> {
    match std::fs::remove_file(output_dir.join(STAMP_FILE)) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

/// Remove every directory in `dir` except the generated bucket directory
///
/// A missing `dir` is not an error.
pub fn prune_stray_dirs(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }

    let cleanup = |path: &Path, source: std::io::Error| Error::Cleanup {
        path: path.display().to_string(),
        source,
    };

    for entry in std::fs::read_dir(dir).map_err(|e| cleanup(dir, e))? {
        let entry = entry.map_err(|e| cleanup(dir, e))?;
        let file_type = entry.file_type().map_err(|e| cleanup(&entry.path(), e))?;
        if file_type.is_dir() && entry.file_name() != GENERATED_DIR {
            let path = entry.path();
            tracing::debug!("Pruning {}", path.display());
            std::fs::remove_dir_all(&path).map_err(|e| cleanup(&path, e))?;
        }
    }
    Ok(())
}

/// Combine a bundling result with the cleanup that followed it
///
/// A bundling failure always wins; a cleanup failure behind it is logged.
fn first_error(written: Result<()>, pruned: Result<()>) -> Result<()> {
    match (written, pruned) {
        (Err(bundle_err), Err(cleanup_err)) => {
            tracing::warn!("Cleanup also failed: {}", cleanup_err);
            Err(bundle_err)
        }
        (Err(err), Ok(())) | (Ok(()), Err(err)) => Err(err),
        (Ok(()), Ok(())) => Ok(()),
    }
}
