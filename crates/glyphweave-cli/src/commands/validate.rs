//! Validate configuration command

use anyhow::{Context, Result};
use glyphweave_core::{Catalog, Config};
use regex::Regex;
use std::collections::HashMap;

/// Run the validate command
pub async fn run(config_path: &str) -> Result<()> {
    tracing::info!("Validating configuration: {}", config_path);

    let config = Config::load(config_path).context("Failed to load configuration")?;
    config
        .render_banner()
        .context("Failed to render banner template")?;
    config
        .load_base_component()
        .context("Failed to load base component")?;

    tracing::info!("✓ Package: {}", config.project.name);
    tracing::info!("✓ Version: {}", config.project.version);

    let catalog = config
        .load_catalog()
        .context("Failed to load icon metadata")?;

    let modules = catalog.variant_count();
    let deprecated: usize = catalog
        .icons
        .iter()
        .filter(|icon| icon.deprecated)
        .map(|icon| icon.output.len())
        .sum();
    let buckets = modules.div_ceil(config.project.bucket_size);

    tracing::info!("✓ Icons: {}", catalog.icons.len());
    tracing::info!("✓ Modules: {} ({} deprecated)", modules, deprecated);
    tracing::info!(
        "✓ Buckets: {} of up to {} modules",
        buckets,
        config.project.bucket_size
    );

    let problems = find_problems(&catalog)?;
    if !problems.is_empty() {
        for problem in &problems {
            tracing::error!("✗ {}", problem);
        }
        anyhow::bail!("Icon metadata has {} problem(s)", problems.len());
    }

    tracing::info!("✓ Configuration is valid");
    Ok(())
}

/// Collect metadata problems that would break generation or bundling
fn find_problems(catalog: &Catalog) -> Result<Vec<String>> {
    let identifier = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$")?;
    let mut problems = Vec::new();
    let mut names: HashMap<&str, &str> = HashMap::new();
    let mut paths: HashMap<&str, &str> = HashMap::new();

    for (_, variant) in catalog.variants() {
        let name = variant.module_name.as_str();

        if !identifier.is_match(name) {
            problems.push(format!("'{}' is not a valid JavaScript identifier", name));
        }

        if let Some(first) = names.insert(name, &variant.filepath) {
            problems.push(format!(
                "duplicate module name '{}' ({} and {})",
                name, first, variant.filepath
            ));
        }

        if let Some(first) = paths.insert(&variant.filepath, name) {
            problems.push(format!(
                "duplicate filepath '{}' ({} and {})",
                variant.filepath, first, name
            ));
        }

        let missing = variant.descriptor.missing_dimensions();
        if !missing.is_empty() {
            problems.push(format!(
                "{} is missing descriptor attributes: {}",
                name,
                missing.join(", ")
            ));
        }
    }

    Ok(problems)
}
