//! Classification of changed paths into code and non-code files.
//!
//! A path is a code file when none of the fixed exclusion patterns match it.
//! Patterns are matched from the start of the path, not against the whole path.

pub mod patterns;

pub use patterns::{Classification, ExclusionKind, ExclusionPattern, ExclusionPatternSet};

/// Result of filtering a list of changed paths.
///
/// # Examples
///
/// ```
/// use ccf_pathfilter::FilterResult;
///
/// let result = FilterResult {
///     kept: vec![],
///     skipped: vec![],
/// };
/// assert!(result.kept.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterResult {
    /// Code files, in input order.
    pub kept: Vec<String>,
    /// Non-code files with the pattern that excluded them.
    pub skipped: Vec<SkippedFile>,
}

/// A path excluded from the code file list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    /// Path of the skipped file.
    pub path: String,
    /// Which exclusion matched first.
    pub kind: ExclusionKind,
}
