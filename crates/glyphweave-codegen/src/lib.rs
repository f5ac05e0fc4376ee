//! glyphweave Code Generation
//!
//! This crate turns an icon catalog into React component sources and hands
//! them to an external bundler.
//!
//! # Pipeline Overview
//!
//! ```text
//! ┌─────────┐     ┌─────────┐     ┌─────────┐     ┌──────────┐     ┌─────────┐
//! │ Catalog │────▶│  Jobs   │────▶│ Buckets │────▶│ Virtual  │────▶│ Bundles │
//! │         │     │ (Plan)  │     │  (250)  │     │  Files   │     │ es/lib/ │
//! └─────────┘     └─────────┘     └─────────┘     └──────────┘     │   umd   │
//!                                                                  └─────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use glyphweave_codegen::{BuildOptions, Builder, PassthroughBundler};
//!
//! let builder = Builder::new(BuildOptions::from_config(&config)?);
//! let report = builder.build(&catalog, &PassthroughBundler).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod assembler;
pub mod attributes;
pub mod bucket;
pub mod bundler;
pub mod component;
pub mod driver;
pub mod error;
pub mod files;
pub mod planner;

pub use assembler::{Assembler, Assembly};
pub use bundler::{Bundle, BundleInput, Bundler, CommandBundler, OutputOptions, PassthroughBundler};
pub use driver::{BuildOptions, BuildReport, Builder};
pub use error::{Error, Result};
pub use files::VirtualFileSet;
pub use planner::{ModuleJob, ModulePlanner};
