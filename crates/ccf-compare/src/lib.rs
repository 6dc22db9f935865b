//! GitHub compare API client and the changed-code-file listing pipeline.
//!
//! The pipeline is strictly sequential: one compare request, then
//! classification of every returned path against the exclusion pattern set.

pub mod client;
pub mod lister;

pub use client::{CompareClient, FetchOutcome, UpstreamFailure};
pub use lister::{ChangedCodeFileLister, ListOutcome};
