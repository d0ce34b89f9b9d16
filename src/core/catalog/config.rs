use std::time::Duration;

pub const PAPER_API_ROOT: &str = "https://api.papermc.io/v2";
pub const PAPER_PROJECT: &str = "paper";

/// Where the catalog lives and how long we are willing to wait for it.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub api_root: String,
    /// Project identifier, also the artifact file name prefix.
    pub project: String,
    /// Extension of downloadable artifacts (and of files the launcher looks for).
    pub artifact_extension: String,
    pub request_timeout: Duration,
    /// Upper bound for a whole artifact download.
    pub download_timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_root: PAPER_API_ROOT.to_string(),
            project: PAPER_PROJECT.to_string(),
            artifact_extension: "jar".to_string(),
            request_timeout: Duration::from_secs(10),
            download_timeout: Duration::from_secs(600),
        }
    }
}

impl CatalogConfig {
    /// Same defaults, different API root (mirrors, local mocks).
    pub fn with_api_root(api_root: impl Into<String>) -> Self {
        Self {
            api_root: api_root.into(),
            ..Self::default()
        }
    }

    fn root(&self) -> &str {
        self.api_root.trim_end_matches('/')
    }

    /// `<root>/projects/<project>`
    pub fn project_url(&self) -> String {
        format!("{}/projects/{}", self.root(), urlencoding::encode(&self.project))
    }

    /// `<root>/projects/<project>/versions/<version>`, or `None` when
    /// `version` cannot be a single path segment.
    pub fn version_url(&self, version: &str) -> Option<String> {
        let segment = path_segment(version)?;
        Some(format!("{}/versions/{}", self.project_url(), segment))
    }
}

/// Percent-encoded URL path segment. Dot segments are refused since URL
/// normalization would resolve them.
pub fn path_segment(value: &str) -> Option<String> {
    match value {
        "" | "." | ".." => None,
        _ => Some(urlencoding::encode(value).into_owned()),
    }
}
