use std::path::PathBuf;

/// Errors that can occur while listing changed code files.
///
/// Library crates return this type directly; the binary renders it through
/// `miette` at the boundary.
///
/// # Examples
///
/// ```
/// use ccf_core::CcfError;
///
/// let err = CcfError::Config("bad repository".into());
/// assert!(err.to_string().contains("bad repository"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum CcfError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    #[diagnostic(code(ccf::io))]
    Io(#[from] std::io::Error),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    #[diagnostic(code(ccf::config))]
    Config(String),

    /// One or both commit references are absent from the environment.
    #[error(
        "no base commit ({}) or head commit ({}) given",
        describe(.base_missing),
        describe(.head_missing)
    )]
    #[diagnostic(
        code(ccf::missing_reference),
        help("set GITHUB_BASE_SHA and GITHUB_HEAD_SHA to the commits to compare")
    )]
    MissingReference {
        /// `GITHUB_BASE_SHA` was unset or empty.
        base_missing: bool,
        /// `GITHUB_HEAD_SHA` was unset or empty.
        head_missing: bool,
    },

    /// The request could not be sent or its body could not be read.
    #[error("HTTP error: {0}")]
    #[diagnostic(code(ccf::http))]
    Http(String),

    /// The compare response did not have the expected shape.
    #[error("unexpected compare response: {0}")]
    #[diagnostic(code(ccf::response))]
    Response(String),

    /// An exclusion pattern failed to compile.
    #[error("invalid exclusion pattern '{pattern}': {reason}")]
    #[diagnostic(code(ccf::pattern))]
    Pattern {
        /// The offending pattern source.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    #[diagnostic(code(ccf::toml))]
    Toml(#[from] toml::de::Error),

    /// A config file given on the command line does not exist.
    #[error("file not found: {}", .0.display())]
    #[diagnostic(code(ccf::file_not_found))]
    FileNotFound(PathBuf),
}

fn describe(missing: &bool) -> &'static str {
    if *missing {
        "missing"
    } else {
        "set"
    }
}
