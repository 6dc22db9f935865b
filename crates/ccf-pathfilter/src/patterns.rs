//! The fixed exclusion pattern set.

use std::fmt;

use ccf_core::{CcfError, SuffixMatching};
use regex::Regex;

use crate::{FilterResult, SkippedFile};

/// What a non-code path was recognised as.
///
/// # Examples
///
/// ```
/// use ccf_pathfilter::ExclusionKind;
///
/// assert_eq!(ExclusionKind::Documentation.to_string(), "documentation");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionKind {
    /// The CI glue script that produces this list.
    CiScript,
    /// `.github/` automation tree.
    Automation,
    /// `docs/` tree.
    Documentation,
    /// Helm deployment tree.
    Deployment,
    /// Markdown file.
    Markdown,
    /// reStructuredText file.
    RestructuredText,
}

impl fmt::Display for ExclusionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionKind::CiScript => write!(f, "ci script"),
            ExclusionKind::Automation => write!(f, "automation"),
            ExclusionKind::Documentation => write!(f, "documentation"),
            ExclusionKind::Deployment => write!(f, "deployment"),
            ExclusionKind::Markdown => write!(f, "markdown"),
            ExclusionKind::RestructuredText => write!(f, "restructuredtext"),
        }
    }
}

/// A compiled exclusion pattern.
#[derive(Debug, Clone)]
pub struct ExclusionPattern {
    regex: Regex,
    kind: ExclusionKind,
}

impl ExclusionPattern {
    fn compile(source: &str, kind: ExclusionKind) -> Result<Self, CcfError> {
        let regex = Regex::new(source).map_err(|e| CcfError::Pattern {
            pattern: source.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { regex, kind })
    }

    pub fn kind(&self) -> ExclusionKind {
        self.kind
    }

    /// True if the pattern matches at the start of `path`.
    ///
    /// Every source begins with `^`, so an unanchored search is a prefix match.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Outcome of classifying one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Code,
    NonCode(ExclusionKind),
}

impl Classification {
    pub fn is_code(self) -> bool {
        matches!(self, Classification::Code)
    }
}

const PREFIX_PATTERNS: &[(&str, ExclusionKind)] = &[
    (
        r"^.buildkite/get_changed_code_files.py$",
        ExclusionKind::CiScript,
    ),
    (r"^.github/", ExclusionKind::Automation),
    (r"^docs/", ExclusionKind::Documentation),
    (r"^docker/helm/", ExclusionKind::Deployment),
];

const LOOSE_SUFFIX_PATTERNS: &[(&str, ExclusionKind)] = &[
    (r"^.*\.md", ExclusionKind::Markdown),
    (r"^.*\.rst", ExclusionKind::RestructuredText),
];

const ANCHORED_SUFFIX_PATTERNS: &[(&str, ExclusionKind)] = &[
    (r"^.*\.md$", ExclusionKind::Markdown),
    (r"^.*\.rst$", ExclusionKind::RestructuredText),
];

/// Ordered, immutable set of patterns describing non-code paths.
///
/// # Examples
///
/// ```
/// use ccf_core::SuffixMatching;
/// use ccf_pathfilter::ExclusionPatternSet;
///
/// let set = ExclusionPatternSet::new(SuffixMatching::Loose).unwrap();
/// assert!(set.is_code_file("src/core.py"));
/// assert!(!set.is_code_file("docs/readme.md"));
/// assert!(!set.is_code_file(".github/workflows/ci.yml"));
/// assert!(!set.is_code_file("README.md"));
/// ```
#[derive(Debug, Clone)]
pub struct ExclusionPatternSet {
    patterns: Vec<ExclusionPattern>,
}

impl ExclusionPatternSet {
    /// Compile the fixed pattern set.
    ///
    /// # Errors
    ///
    /// Returns [`CcfError::Pattern`] if a pattern fails to compile.
    pub fn new(suffix_matching: SuffixMatching) -> Result<Self, CcfError> {
        let suffixes = match suffix_matching {
            SuffixMatching::Loose => LOOSE_SUFFIX_PATTERNS,
            SuffixMatching::Anchored => ANCHORED_SUFFIX_PATTERNS,
        };

        let patterns = PREFIX_PATTERNS
            .iter()
            .chain(suffixes)
            .map(|(source, kind)| ExclusionPattern::compile(source, *kind))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    pub fn patterns(&self) -> &[ExclusionPattern] {
        &self.patterns
    }

    /// First pattern matching `path`, in set order.
    pub fn matching_pattern(&self, path: &str) -> Option<&ExclusionPattern> {
        self.patterns.iter().find(|p| p.matches(path))
    }

    /// Classify a single path.
    ///
    /// # Examples
    ///
    /// ```
    /// use ccf_core::SuffixMatching;
    /// use ccf_pathfilter::{Classification, ExclusionKind, ExclusionPatternSet};
    ///
    /// let set = ExclusionPatternSet::new(SuffixMatching::Loose).unwrap();
    /// assert_eq!(
    ///     set.classify("docker/helm/values.yaml"),
    ///     Classification::NonCode(ExclusionKind::Deployment)
    /// );
    /// assert_eq!(set.classify("lib/util.go"), Classification::Code);
    /// ```
    pub fn classify(&self, path: &str) -> Classification {
        match self.matching_pattern(path) {
            Some(pattern) => Classification::NonCode(pattern.kind()),
            None => Classification::Code,
        }
    }

    pub fn is_code_file(&self, path: &str) -> bool {
        self.classify(path).is_code()
    }

    /// Split `paths` into code files and skipped files, preserving order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ccf_core::SuffixMatching;
    /// use ccf_pathfilter::ExclusionPatternSet;
    ///
    /// let set = ExclusionPatternSet::new(SuffixMatching::Loose).unwrap();
    /// let result = set.filter(["docker/helm/values.yaml", "lib/util.go"]);
    /// assert_eq!(result.kept, vec!["lib/util.go"]);
    /// assert_eq!(result.skipped.len(), 1);
    /// ```
    pub fn filter<I, S>(&self, paths: I) -> FilterResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut kept = Vec::new();
        let mut skipped = Vec::new();

        for path in paths {
            let path = path.into();
            match self.classify(&path) {
                Classification::Code => kept.push(path),
                Classification::NonCode(kind) => skipped.push(SkippedFile { path, kind }),
            }
        }

        FilterResult { kept, skipped }
    }
}
