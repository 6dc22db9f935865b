use std::fmt;
use std::time::Duration;

use ccf_core::{CcfError, ComparisonResult, GitHubConfig, ReferencePair};
use serde::Deserialize;

/// GitHub compare API client.
///
/// # Examples
///
/// ```
/// use ccf_compare::client::CompareClient;
/// use ccf_core::{GitHubConfig, ReferencePair};
///
/// let client = CompareClient::new(&GitHubConfig::default()).unwrap();
/// let refs = ReferencePair::new("abc", "def").unwrap();
/// assert_eq!(
///     client.compare_url(&refs),
///     "https://api.github.com/repos/khorovod-ai/khorovod/compare/abc...def"
/// );
/// ```
pub struct CompareClient {
    http: reqwest::Client,
    api_url: String,
    repository: String,
    token: Option<String>,
}

impl CompareClient {
    /// Create a client from the `[github]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`CcfError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &GitHubConfig) -> Result<Self, CcfError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("changed-code-files/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| CcfError::Http(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            repository: config.repository.clone(),
            token: config.token.clone(),
        })
    }

    /// URL of the compare endpoint for `refs`.
    pub fn compare_url(&self, refs: &ReferencePair) -> String {
        format!(
            "{}/repos/{}/compare/{}...{}",
            self.api_url,
            self.repository,
            refs.base(),
            refs.head()
        )
    }

    /// Fetch the list of files changed between `refs`.
    ///
    /// Any status other than `200 OK` is not an error: it is logged and
    /// returned as [`FetchOutcome::Failed`].
    ///
    /// # Errors
    ///
    /// Returns [`CcfError::Http`] if the request cannot be sent or the body
    /// cannot be read, and [`CcfError::Response`] if a successful body lacks
    /// `files[].filename`.
    pub async fn fetch_comparison(&self, refs: &ReferencePair) -> Result<FetchOutcome, CcfError> {
        let url = self.compare_url(refs);

        let mut request = self
            .http
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| CcfError::Http(format!("failed to fetch comparison: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CcfError::Http(format!("failed to read comparison response: {e}")))?;

        if status != reqwest::StatusCode::OK {
            let failure = UpstreamFailure {
                status: status.as_u16(),
                message: extract_error_message(&body),
            };
            tracing::error!("{failure}");
            return Ok(FetchOutcome::Failed(failure));
        }

        parse_compare_body(&body).map(FetchOutcome::Fetched)
    }
}

/// Result of one compare request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The request succeeded; the list may be empty.
    Fetched(ComparisonResult),
    /// The API answered with a status other than `200 OK`.
    Failed(UpstreamFailure),
}

/// A response from the compare API with a status other than `200 OK`.
///
/// # Examples
///
/// ```
/// use ccf_compare::client::UpstreamFailure;
///
/// let failure = UpstreamFailure { status: 404, message: Some("Not Found".into()) };
/// assert_eq!(failure.to_string(), "Request failed (404): Not Found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamFailure {
    /// HTTP status code.
    pub status: u16,
    /// The body's `message` field, when present.
    pub message: Option<String>,
}

impl fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "Request failed ({}): {message}", self.status),
            None => write!(f, "Request failed ({})", self.status),
        }
    }
}

#[derive(Deserialize)]
struct CompareResponse {
    files: Vec<ChangedFileRecord>,
}

#[derive(Deserialize)]
struct ChangedFileRecord {
    filename: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

/// Parse a successful compare body into its changed paths, in order.
///
/// # Errors
///
/// Returns [`CcfError::Response`] if the body is not JSON or lacks
/// `files[].filename`.
///
/// # Examples
///
/// ```
/// use ccf_compare::client::parse_compare_body;
///
/// let body = r#"{"files": [{"filename": "src/a.rs"}, {"filename": "README.md"}]}"#;
/// let result = parse_compare_body(body).unwrap();
/// assert_eq!(result.files(), ["src/a.rs", "README.md"]);
/// ```
pub fn parse_compare_body(body: &str) -> Result<ComparisonResult, CcfError> {
    let parsed: CompareResponse = serde_json::from_str(body)
        .map_err(|e| CcfError::Response(format!("expected files[].filename: {e}")))?;
    Ok(ComparisonResult::new(
        parsed.files.into_iter().map(|f| f.filename).collect(),
    ))
}

/// Best-effort extraction of the `message` field from an error body.
pub fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.message)
}
