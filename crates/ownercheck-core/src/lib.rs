//! Core types, configuration, and error handling for ownercheck.
//!
//! This crate provides the shared foundation used by the other crates:
//! - [`OwnerCheckError`]: unified error type using `thiserror`
//! - [`OwnerCheckConfig`]: configuration loaded from `.ownercheck.toml`
//! - Shared types: [`FileScope`], [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{CodeownersConfig, GitConfig, OwnerCheckConfig, CONFIG_FILE_NAME};
pub use error::OwnerCheckError;
pub use types::{FileScope, OutputFormat};

/// A convenience `Result` type for ownercheck operations.
pub type Result<T> = std::result::Result<T, OwnerCheckError>;
