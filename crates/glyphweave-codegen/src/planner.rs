//! Catalog → module jobs
//!
//! Expands every `(icon, size variant)` pair into one job carrying both
//! source forms of the generated component.

use glyphweave_core::Catalog;

use crate::component::ComponentCodegen;

/// One generated component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleJob {
    /// Exported component name
    pub module_name: String,

    /// Path of the standalone module
    pub filepath: String,

    /// Whether the component warns about deprecation
    pub deprecated: bool,

    /// Component definition for concatenation into a bucket file
    pub flat_export: String,

    /// Complete standalone module source
    pub entrypoint: String,
}

/// Plans module jobs for a catalog
pub struct ModulePlanner<'a> {
    codegen: ComponentCodegen<'a>,
}

impl<'a> ModulePlanner<'a> {
    /// Create a planner using the given banner and package name
    pub fn new(banner: &'a str, package: &'a str) -> Self {
        Self {
            codegen: ComponentCodegen::new(banner, package),
        }
    }

    /// Jobs in icon order, then variant order
    ///
    /// Module names are not deduplicated here.
    pub fn plan(&self, catalog: &Catalog) -> Vec<ModuleJob> {
        let jobs: Vec<ModuleJob> = catalog
            .variants()
            .map(|(icon, variant)| ModuleJob {
                module_name: variant.module_name.clone(),
                filepath: variant.filepath.clone(),
                deprecated: icon.deprecated,
                flat_export: self.codegen.flat_export(
                    &variant.module_name,
                    &variant.descriptor,
                    icon.deprecated,
                ),
                entrypoint: self.codegen.entrypoint(
                    &variant.module_name,
                    &variant.filepath,
                    &variant.descriptor,
                    icon.deprecated,
                ),
            })
            .collect();

        tracing::debug!(
            "Planned {} modules ({} deprecated)",
            jobs.len(),
            jobs.iter().filter(|job| job.deprecated).count()
        );

        jobs
    }
}
