//! Write generated sources without bundling

use anyhow::{Context, Result};
use glyphweave_codegen::{BuildOptions, Builder};
use glyphweave_core::Config;
use std::path::PathBuf;

/// Run the emit command
pub async fn run(config_path: &str, out: Option<&str>) -> Result<()> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    let catalog = config
        .load_catalog()
        .context("Failed to load icon metadata")?;

    let out_dir = match out {
        Some(dir) => PathBuf::from(dir),
        None => config.output_dir().join(".generated"),
    };

    let builder = Builder::new(BuildOptions::from_config(&config)?);
    let assembly = builder
        .emit(&catalog, &out_dir)
        .context("Failed to emit generated sources")?;

    tracing::info!(
        "✓ {} modules in {} buckets written to {}",
        assembly.module_count,
        assembly.bucket_count,
        out_dir.display()
    );

    Ok(())
}
