//! Core types, configuration, and error handling for changed-code-files.
//!
//! This crate provides the shared foundation used by the other crates:
//! - [`CcfError`] — unified error type using `thiserror` and `miette`
//! - [`CcfConfig`] — configuration loaded from `.changed-code-files.toml`
//! - Shared types: [`ReferencePair`], [`ComparisonResult`], [`SuffixMatching`]

mod config;
mod error;
mod types;

pub use config::{CcfConfig, FilterConfig, GitHubConfig, DEFAULT_CONFIG_FILE};
pub use error::CcfError;
pub use types::{ComparisonResult, ReferencePair, SuffixMatching, BASE_SHA_VAR, HEAD_SHA_VAR};

/// A convenience `Result` type for changed-code-files operations.
pub type Result<T> = std::result::Result<T, CcfError>;
