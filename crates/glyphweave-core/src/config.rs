//! Configuration parsing and validation
//!
//! This module handles loading `glyphweave.yaml`, the project root
//! configuration that tells the generator where the icon metadata lives,
//! where bundles are written and how the external bundler is invoked.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::error::{Error, Result};

/// File name looked up when a directory is passed to [`Config::load`]
pub const CONFIG_FILE_NAME: &str = "glyphweave.yaml";

/// Modules per generated bucket file
pub const DEFAULT_BUCKET_SIZE: usize = 250;

const DEFAULT_BANNER: &str = "/**
 * Code generated by glyphweave for {{ name }}@{{ version }}. DO NOT EDIT.
 */";

/// Root project configuration from `glyphweave.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Published package name, used in deprecation warnings
    pub name: String,

    /// Project version
    #[serde(default = "default_version")]
    pub version: String,

    /// Icon metadata file (JSON or YAML)
    #[serde(default = "default_metadata")]
    pub metadata: String,

    /// Output root for the bundles
    #[serde(default = "default_output")]
    pub output: String,

    /// Maximum number of modules per generated bucket file
    #[serde(default = "default_bucket_size")]
    pub bucket_size: usize,

    /// Hand-authored base `Icon` component; a built-in one is used if unset
    #[serde(default)]
    pub base_component: Option<String>,

    /// Banner template prepended to every generated file
    #[serde(default)]
    pub banner: Option<String>,

    /// Module specifiers left external by the bundler
    #[serde(default = "default_externals")]
    pub externals: Vec<String>,

    /// Universal (single-file) bundle settings
    #[serde(default)]
    pub universal: UniversalConfig,

    /// External bundler invocation
    #[serde(default)]
    pub bundler: BundlerConfig,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_metadata() -> String {
    "metadata.json".to_string()
}

fn default_output() -> String {
    "dist".to_string()
}

fn default_bucket_size() -> usize {
    DEFAULT_BUCKET_SIZE
}

fn default_externals() -> Vec<String> {
    vec![
        "@carbon/icon-helpers".to_string(),
        "react".to_string(),
        "prop-types".to_string(),
    ]
}

/// Universal bundle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniversalConfig {
    /// Global variable the bundle assigns its exports to
    #[serde(default = "default_universal_name")]
    pub name: String,

    /// Global variable names for each external module
    #[serde(default = "default_globals")]
    pub globals: BTreeMap<String, String>,
}

impl Default for UniversalConfig {
    fn default() -> Self {
        Self {
            name: default_universal_name(),
            globals: default_globals(),
        }
    }
}

fn default_universal_name() -> String {
    "CarbonIconsReact".to_string()
}

fn default_globals() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "@carbon/icon-helpers".to_string(),
            "CarbonIconHelpers".to_string(),
        ),
        ("prop-types".to_string(), "PropTypes".to_string()),
        ("react".to_string(), "React".to_string()),
    ])
}

/// External bundler command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundlerConfig {
    /// Program to run
    #[serde(default = "default_bundler_command")]
    pub command: String,

    /// Arguments passed before the manifest path
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            command: default_bundler_command(),
            args: Vec::new(),
        }
    }
}

fn default_bundler_command() -> String {
    "glyphweave-bundle".to_string()
}

/// Main configuration container
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Base path of the project
    pub base_path: PathBuf,
}

impl Config {
    /// Load configuration from a directory
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the project directory or glyphweave.yaml file
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let config = Config::load("./icons-react")?;
    /// println!("Project: {}", config.project.name);
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let (config_path, base_path) = if path.is_dir() {
            (path.join(CONFIG_FILE_NAME), path.to_path_buf())
        } else {
            (
                path.to_path_buf(),
                path.parent().unwrap_or(Path::new(".")).to_path_buf(),
            )
        };

        if !config_path.exists() {
            return Err(Error::ConfigNotFound {
                path: config_path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let project: ProjectConfig = serde_yaml::from_str(&contents)?;

        let config = Self { project, base_path };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.project.bucket_size == 0 {
            return Err(Error::ConfigInvalid {
                message: "bucket_size must be greater than zero".to_string(),
            });
        }
        if self.project.universal.name.trim().is_empty() {
            return Err(Error::ConfigInvalid {
                message: "universal.name must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Resolve a project-relative path against the configuration directory
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        let relative = relative.as_ref();
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.base_path.join(relative)
        }
    }

    /// Absolute path of the icon metadata file
    pub fn metadata_path(&self) -> PathBuf {
        self.resolve(&self.project.metadata)
    }

    /// Absolute path of the output root
    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.project.output)
    }

    /// Load the icon catalog referenced by this configuration
    pub fn load_catalog(&self) -> Result<Catalog> {
        Catalog::load(self.metadata_path())
    }

    /// Read the hand-authored base component, if one is configured
    pub fn load_base_component(&self) -> Result<Option<String>> {
        match &self.project.base_component {
            Some(relative) => {
                let path = self.resolve(relative);
                if !path.exists() {
                    return Err(Error::ConfigInvalid {
                        message: format!("base component not found: {}", path.display()),
                    });
                }
                Ok(Some(std::fs::read_to_string(path)?))
            }
            None => Ok(None),
        }
    }

    /// Render the banner template with the project name and version
    pub fn render_banner(&self) -> Result<String> {
        let template = self.project.banner.as_deref().unwrap_or(DEFAULT_BANNER);
        let env = minijinja::Environment::new();
        let rendered = env.render_str(
            template,
            minijinja::context! {
                name => self.project.name,
                version => self.project.version,
            },
        )?;
        Ok(rendered.trim_end().to_string())
    }
}
