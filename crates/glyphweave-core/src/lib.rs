//! glyphweave Core Library
//!
//! This crate provides the shared data model for glyphweave:
//! - Icon catalog (icons, size variants, rendering descriptors)
//! - Project configuration (`glyphweave.yaml`)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Metadata   │────▶│   Catalog   │────▶│   Codegen   │
//! │ (JSON/YAML) │     │   (model)   │     │  (modules)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use glyphweave_core::Config;
//!
//! let config = Config::load("./glyphweave.yaml")?;
//! let catalog = config.load_catalog()?;
//! println!("{} variants", catalog.variant_count());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod config;
pub mod error;

pub use catalog::{AttrValue, Attributes, Catalog, Descriptor, DrawingNode, IconRecord, SizeVariant};
pub use config::{Config, ProjectConfig};
pub use error::{Error, Result};
