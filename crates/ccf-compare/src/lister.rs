use ccf_core::{CcfConfig, CcfError, ReferencePair};
use ccf_pathfilter::{ExclusionPatternSet, FilterResult};

use crate::client::{CompareClient, FetchOutcome, UpstreamFailure};

/// What a listing run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    /// The comparison had at least one changed file. `kept` may still be empty
    /// when every change was a non-code file.
    CodeFiles(FilterResult),
    /// The comparison succeeded with zero changed files.
    NoChangedFiles,
    /// The compare API answered with a status other than `200 OK`.
    FetchFailed(UpstreamFailure),
}

/// Fetches a comparison and keeps its code files.
pub struct ChangedCodeFileLister {
    client: CompareClient,
    patterns: ExclusionPatternSet,
}

impl ChangedCodeFileLister {
    pub fn new(client: CompareClient, patterns: ExclusionPatternSet) -> Self {
        Self { client, patterns }
    }

    /// Build the client and pattern set from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CcfError::Http`] if the HTTP client cannot be built, or
    /// [`CcfError::Pattern`] if the pattern set fails to compile.
    pub fn from_config(config: &CcfConfig) -> Result<Self, CcfError> {
        let client = CompareClient::new(&config.github)?;
        let patterns = ExclusionPatternSet::new(config.filter.suffix_matching)?;
        Ok(Self::new(client, patterns))
    }

    pub fn patterns(&self) -> &ExclusionPatternSet {
        &self.patterns
    }

    /// Run one comparison and classify the result.
    ///
    /// # Errors
    ///
    /// Propagates transport and response-shape errors from
    /// [`CompareClient::fetch_comparison`].
    pub async fn list(&self, refs: &ReferencePair) -> Result<ListOutcome, CcfError> {
        tracing::debug!("base = {}", refs.base());
        tracing::debug!("head = {}", refs.head());

        let comparison = match self.client.fetch_comparison(refs).await? {
            FetchOutcome::Fetched(comparison) => comparison,
            FetchOutcome::Failed(failure) => return Ok(ListOutcome::FetchFailed(failure)),
        };

        if comparison.is_empty() {
            return Ok(ListOutcome::NoChangedFiles);
        }

        let result = self.patterns.filter(comparison.into_files());
        for skipped in &result.skipped {
            tracing::debug!("skipping {} ({})", skipped.path, skipped.kind);
        }
        Ok(ListOutcome::CodeFiles(result))
    }
}
