//! Generate and bundle the package

use anyhow::{Context, Result};
use glyphweave_codegen::{BuildOptions, Builder, Bundler, CommandBundler, PassthroughBundler};
use glyphweave_core::Config;

/// Run the build command
pub async fn run(config_path: &str, passthrough: bool, force: bool) -> Result<()> {
    tracing::info!("Loading configuration from {}", config_path);

    let config = Config::load(config_path).context("Failed to load configuration")?;
    let catalog = config
        .load_catalog()
        .context("Failed to load icon metadata")?;

    let options = BuildOptions {
        force,
        ..BuildOptions::from_config(&config)?
    };
    let staging_dir = config.base_path.join(".glyphweave/staging");
    let builder = Builder::new(options);

    let bundler: Box<dyn Bundler> = if passthrough {
        tracing::info!("Writing untranspiled sources (passthrough)");
        Box::new(PassthroughBundler)
    } else {
        let bundler_config = &config.project.bundler;
        Box::new(CommandBundler::new(
            bundler_config.command.clone(),
            bundler_config.args.clone(),
            staging_dir,
        ))
    };

    let report = builder
        .build(&catalog, bundler.as_ref())
        .await
        .context("Build failed")?;

    if report.skipped {
        tracing::info!("✓ {} is up to date", config.project.name);
    } else {
        tracing::info!(
            "✓ {} ({} modules, {} buckets, hash: {}...)",
            config.project.name,
            report.module_count,
            report.bucket_count,
            &report.hash[..8]
        );
    }

    Ok(())
}
