//! Initialize a new glyphweave project

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Run the init command
pub async fn run(path: &str, name: Option<&str>) -> Result<()> {
    let project_dir = Path::new(path);

    // Create directory if it doesn't exist
    if !project_dir.exists() {
        fs::create_dir_all(project_dir)?;
    }

    // Get absolute path for deriving name
    let abs_path = project_dir.canonicalize()?;

    // Derive package name from directory name if not provided
    let package_name = match name {
        Some(n) => n.to_string(),
        None => abs_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("Could not determine package name from path"))?,
    };

    // Check if already initialized
    if project_dir.join("glyphweave.yaml").exists() {
        anyhow::bail!(
            "Directory '{}' already contains a glyphweave.yaml",
            project_dir.display()
        );
    }

    tracing::info!("Creating new glyphweave project: {}", package_name);

    let config = format!(
        r#"# glyphweave project configuration
name: "{package_name}"
version: "0.1.0"

# Pre-computed icon catalog (JSON or YAML)
metadata: metadata.json

# Bundles are written to <output>/es, <output>/lib and <output>/umd
output: dist

# Modules per generated bucket file
bucket_size: 250

# Optional hand-authored base component; a built-in Icon is used otherwise
# base_component: src/Icon.js

externals:
  - "@carbon/icon-helpers"
  - react
  - prop-types

universal:
  name: CarbonIconsReact
  globals:
    "@carbon/icon-helpers": CarbonIconHelpers
    prop-types: PropTypes
    react: React

# Invoked as `<command> <args...> <manifest.json>` for every output target
bundler:
  command: node
  args: [scripts/bundle.mjs]
"#
    );
    fs::write(project_dir.join("glyphweave.yaml"), config)?;

    let metadata = serde_json::json!({
        "icons": [
            {
                "name": "add",
                "output": [
                    {
                        "moduleName": "Add16",
                        "filepath": "Add16.js",
                        "descriptor": {
                            "attrs": { "width": 16, "height": 16, "viewBox": "0 0 16 16" },
                            "content": [
                                { "elem": "path", "attrs": { "d": "M8.5 7.5V3h-1v4.5H3v1h4.5V13h1V8.5H13v-1z" } }
                            ]
                        }
                    },
                    {
                        "moduleName": "Add32",
                        "filepath": "Add32.js",
                        "descriptor": {
                            "attrs": { "width": 32, "height": 32, "viewBox": "0 0 32 32" },
                            "content": [
                                { "elem": "path", "attrs": { "d": "M17 15V8h-2v7H8v2h7v7h2v-7h7v-2z" } }
                            ]
                        }
                    }
                ]
            },
            {
                "name": "close",
                "deprecated": true,
                "output": [
                    {
                        "moduleName": "Close16",
                        "filepath": "Close16.js",
                        "descriptor": {
                            "attrs": { "width": 16, "height": 16, "viewBox": "0 0 16 16", "aria-hidden": true },
                            "content": [
                                { "elem": "path", "attrs": { "d": "M12 4.7l-.7-.7L8 7.3 4.7 4l-.7.7L7.3 8 4 11.3l.7.7L8 8.7l3.3 3.3.7-.7L8.7 8z" } }
                            ]
                        }
                    }
                ]
            }
        ]
    });
    fs::write(
        project_dir.join("metadata.json"),
        serde_json::to_string_pretty(&metadata)?,
    )?;

    let gitignore = r#"# glyphweave staging and build stamp
.glyphweave/

# Bundles
dist/
"#;
    fs::write(project_dir.join(".gitignore"), gitignore)?;

    tracing::info!(
        "✓ Created project '{}' at {}",
        package_name,
        abs_path.display()
    );
    tracing::info!("");
    tracing::info!("Next steps:");
    if path != "." {
        tracing::info!("  cd {}", project_dir.display());
    }
    tracing::info!("  glyphweave validate              # Check metadata");
    tracing::info!("  glyphweave build --passthrough   # Write generated sources");

    Ok(())
}
