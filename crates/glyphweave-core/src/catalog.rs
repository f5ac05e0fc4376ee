//! Icon catalog model
//!
//! The catalog is produced ahead of time by the metadata pipeline. Each icon
//! carries one or more size variants, and every variant already has its
//! module name, output path, and rendering descriptor resolved.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// The full icon catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Icons in publication order
    #[serde(default)]
    pub icons: Vec<IconRecord>,
}

/// A single icon and its size variants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconRecord {
    /// Icon name as it appears in the metadata
    #[serde(default)]
    pub name: Option<String>,

    /// Whether every variant of this icon is deprecated
    #[serde(default)]
    pub deprecated: bool,

    /// Size variants, in output order
    #[serde(default)]
    pub output: Vec<SizeVariant>,
}

/// One emitted module for an icon at a given size
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeVariant {
    /// Exported component name, e.g. `Add16`
    pub module_name: String,

    /// Output path of the standalone module, relative to the package root
    pub filepath: String,

    /// Rendering descriptor
    pub descriptor: Descriptor,
}

/// Rendering descriptor for a single component
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Descriptor {
    /// Top-level attributes: `width`, `height`, `viewBox`, plus pass-through
    #[serde(default)]
    pub attrs: Attributes,

    /// Drawing primitives, in paint order
    #[serde(default)]
    pub content: Vec<DrawingNode>,
}

/// A leaf drawing primitive such as `path` or `circle`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawingNode {
    /// Element tag name
    pub elem: String,

    /// Element attributes
    #[serde(default)]
    pub attrs: Attributes,
}

/// Ordered attribute mapping
pub type Attributes = IndexMap<String, AttrValue>;

/// Scalar attribute value
///
/// Values are spliced into generated source verbatim, so numbers keep the
/// textual form they had in the metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// String value
    Text(String),
    /// Numeric value
    Number(serde_json::Number),
    /// Boolean value
    Bool(bool),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => f.write_str(s),
            AttrValue::Number(n) => write!(f, "{}", n),
            AttrValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<u32> for AttrValue {
    fn from(value: u32) -> Self {
        AttrValue::Number(value.into())
    }
}

impl Descriptor {
    /// Names of the attributes mapped to dedicated wrapper props
    pub const DIMENSION_ATTRS: [&'static str; 3] = ["width", "height", "viewBox"];

    /// Dimension attributes absent from this descriptor
    pub fn missing_dimensions(&self) -> Vec<&'static str> {
        Self::DIMENSION_ATTRS
            .into_iter()
            .filter(|name| !self.attrs.contains_key(*name))
            .collect()
    }
}

impl Catalog {
    /// Load a catalog from a JSON or YAML file
    ///
    /// Files ending in `.yaml` or `.yml` are read as YAML, everything else
    /// as JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::MetadataNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");

        let catalog: Catalog = if is_yaml {
            serde_yaml::from_str(&contents)?
        } else {
            serde_json::from_str(&contents)?
        };

        tracing::debug!(
            "Loaded {} icons ({} variants) from {}",
            catalog.icons.len(),
            catalog.variant_count(),
            path.display()
        );

        Ok(catalog)
    }

    /// Total number of size variants across all icons
    pub fn variant_count(&self) -> usize {
        self.icons.iter().map(|icon| icon.output.len()).sum()
    }

    /// Iterate `(icon, variant)` pairs in publication order
    pub fn variants(&self) -> impl Iterator<Item = (&IconRecord, &SizeVariant)> {
        self.icons
            .iter()
            .flat_map(|icon| icon.output.iter().map(move |variant| (icon, variant)))
    }
}
