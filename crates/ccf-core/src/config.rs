use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CcfError;
use crate::types::SuffixMatching;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".changed-code-files.toml";

/// Top-level configuration loaded from `.changed-code-files.toml`.
///
/// Resolution order: CLI flags > env vars > config file > defaults.
///
/// # Examples
///
/// ```
/// use ccf_core::CcfConfig;
///
/// let config = CcfConfig::default();
/// assert_eq!(config.github.api_url, "https://api.github.com");
/// assert_eq!(config.github.repository, "khorovod-ai/khorovod");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CcfConfig {
    /// Compare API settings.
    #[serde(default)]
    pub github: GitHubConfig,
    /// Path classification settings.
    #[serde(default)]
    pub filter: FilterConfig,
}

impl CcfConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CcfError::FileNotFound`] if `path` does not exist,
    /// [`CcfError::Io`] if it cannot be read, or [`CcfError::Toml`] if the
    /// content is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self, CcfError> {
        if !path.exists() {
            return Err(CcfError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`CcfError::Toml`] if parsing fails, or [`CcfError::Config`] if
    /// a value is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use ccf_core::{CcfConfig, SuffixMatching};
    ///
    /// let toml = r#"
    /// [filter]
    /// suffix_matching = "anchored"
    /// "#;
    /// let config = CcfConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.filter.suffix_matching, SuffixMatching::Anchored);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, CcfError> {
        let config: Self = toml::from_str(content)?;
        config.github.validate()?;
        Ok(config)
    }

    /// Apply `GITHUB_API_URL`, `GITHUB_REPOSITORY` and `GITHUB_TOKEN` overrides.
    ///
    /// Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CcfError::Config`] if an override produces an invalid value.
    ///
    /// # Examples
    ///
    /// ```
    /// use ccf_core::CcfConfig;
    ///
    /// let mut config = CcfConfig::default();
    /// config
    ///     .apply_env(|key| (key == "GITHUB_REPOSITORY").then(|| "octocat/hello-world".to_string()))
    ///     .unwrap();
    /// assert_eq!(config.github.repository, "octocat/hello-world");
    /// ```
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), CcfError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(url) = get("GITHUB_API_URL") {
            self.github.api_url = url;
        }
        if let Some(repo) = get("GITHUB_REPOSITORY") {
            self.github.repository = repo;
        }
        if let Some(token) = get("GITHUB_TOKEN") {
            self.github.token = Some(token);
        }
        self.github.validate()
    }
}

/// Compare API configuration.
///
/// # Examples
///
/// ```
/// use ccf_core::GitHubConfig;
///
/// let config = GitHubConfig::default();
/// assert!(config.token.is_none());
/// assert!(config.timeout_secs.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// API root (default: `https://api.github.com`).
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Repository in `owner/repo` form (default: `khorovod-ai/khorovod`).
    #[serde(default = "default_repository")]
    pub repository: String,
    /// Bearer token; unauthenticated when absent.
    pub token: Option<String>,
    /// Request timeout in seconds; no timeout when absent.
    pub timeout_secs: Option<u64>,
}

fn default_api_url() -> String {
    "https://api.github.com".into()
}

fn default_repository() -> String {
    "khorovod-ai/khorovod".into()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            repository: default_repository(),
            token: None,
            timeout_secs: None,
        }
    }
}

impl GitHubConfig {
    /// Check that `repository` is `owner/repo` and `api_url` is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`CcfError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), CcfError> {
        if self.api_url.trim().is_empty() {
            return Err(CcfError::Config("github.api_url must not be empty".into()));
        }
        match self.repository.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(())
            }
            _ => Err(CcfError::Config(format!(
                "invalid repository '{}', expected owner/repo",
                self.repository
            ))),
        }
    }
}

/// Path classification configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Markdown/reStructuredText suffix behavior (default: `loose`).
    #[serde(default)]
    pub suffix_matching: SuffixMatching,
}
