use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CcfError;

/// Environment variable holding the base (target branch) commit.
pub const BASE_SHA_VAR: &str = "GITHUB_BASE_SHA";

/// Environment variable holding the head (incoming change) commit.
pub const HEAD_SHA_VAR: &str = "GITHUB_HEAD_SHA";

/// The two commits being compared.
///
/// Both sides are guaranteed non-empty once constructed.
///
/// # Examples
///
/// ```
/// use ccf_core::ReferencePair;
///
/// let refs = ReferencePair::new("abc123", "def456").unwrap();
/// assert_eq!(refs.base(), "abc123");
/// assert_eq!(refs.head(), "def456");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencePair {
    base: String,
    head: String,
}

impl ReferencePair {
    /// Build a pair from explicit values.
    ///
    /// # Errors
    ///
    /// Returns [`CcfError::MissingReference`] if either side is empty.
    pub fn new(base: impl Into<String>, head: impl Into<String>) -> Result<Self, CcfError> {
        let base = base.into();
        let head = head.into();
        Self::from_parts(Some(base), Some(head))
    }

    /// Read `GITHUB_BASE_SHA` and `GITHUB_HEAD_SHA` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`CcfError::MissingReference`] if either variable is unset or empty.
    pub fn from_env() -> Result<Self, CcfError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the pair through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`CcfError::MissingReference`] if either variable is absent or empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ccf_core::{CcfError, ReferencePair};
    ///
    /// let err = ReferencePair::from_lookup(|key| match key {
    ///     "GITHUB_HEAD_SHA" => Some("def456".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap_err();
    /// assert!(matches!(err, CcfError::MissingReference { base_missing: true, head_missing: false }));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CcfError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_parts(lookup(BASE_SHA_VAR), lookup(HEAD_SHA_VAR))
    }

    fn from_parts(base: Option<String>, head: Option<String>) -> Result<Self, CcfError> {
        let base = base.filter(|s| !s.is_empty());
        let head = head.filter(|s| !s.is_empty());
        match (base, head) {
            (Some(base), Some(head)) => Ok(Self { base, head }),
            (base, head) => Err(CcfError::MissingReference {
                base_missing: base.is_none(),
                head_missing: head.is_none(),
            }),
        }
    }

    /// Base commit identifier.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Head commit identifier.
    pub fn head(&self) -> &str {
        &self.head
    }
}

impl fmt::Display for ReferencePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}...{}", self.base, self.head)
    }
}

/// Files reported as changed between two references, in upstream order.
///
/// # Examples
///
/// ```
/// use ccf_core::ComparisonResult;
///
/// let result = ComparisonResult::new(vec!["src/lib.rs".into(), "README.md".into()]);
/// assert!(!result.is_empty());
/// assert_eq!(result.files()[0], "src/lib.rs");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonResult {
    files: Vec<String>,
}

impl ComparisonResult {
    pub fn new(files: Vec<String>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_files(self) -> Vec<String> {
        self.files
    }
}

/// How the Markdown and reStructuredText exclusion patterns treat the extension.
///
/// `Loose` keeps the historical `^.*\.md` form, which also matches any path that
/// merely contains `.md` somewhere (`notes.mdx`, `a.md.bak`). `Anchored` requires
/// the extension to end the path.
///
/// # Examples
///
/// ```
/// use ccf_core::SuffixMatching;
///
/// assert_eq!(SuffixMatching::default(), SuffixMatching::Loose);
/// assert_eq!(SuffixMatching::Anchored.to_string(), "anchored");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuffixMatching {
    #[default]
    Loose,
    Anchored,
}

impl fmt::Display for SuffixMatching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuffixMatching::Loose => write!(f, "loose"),
            SuffixMatching::Anchored => write!(f, "anchored"),
        }
    }
}
