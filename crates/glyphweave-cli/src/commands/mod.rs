//! CLI command implementations

pub mod build;
pub mod emit;
pub mod init;
pub mod validate;
