use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the provisioning backend.
/// Every module returns `Result<T, SetupError>`.
#[derive(Debug, Error)]
pub enum SetupError {
    // ── Catalog ─────────────────────────────────────────
    #[error("Version catalog unavailable ({url}): {reason}")]
    CatalogUnavailable { url: String, reason: String },

    #[error("No builds found for version {0}")]
    NoBuildsFound(String),

    // ── Download ────────────────────────────────────────
    #[error("Download failed for {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    // ── Installation files ──────────────────────────────
    #[error("Could not write {path:?}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Request ─────────────────────────────────────────
    #[error("{0}")]
    ValidationFailed(ValidationIssue),

    // ── Launch ──────────────────────────────────────────
    #[error("No server jar found in {0:?}. Run the setup first.")]
    NotProvisioned(PathBuf),

    #[error("Could not open {path:?}: {source}")]
    LaunchFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The conditions that block provisioning outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingVersion,
    DirectoryNotFound(PathBuf),
    EulaNotAccepted,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingVersion => {
                write!(f, "Set a server version before running the setup")
            }
            ValidationIssue::DirectoryNotFound(path) => {
                write!(f, "Install directory does not exist: {:?}", path)
            }
            ValidationIssue::EulaNotAccepted => {
                write!(f, "You must accept the Minecraft EULA to continue")
            }
        }
    }
}

/// Convenience alias used throughout the crate.
pub type SetupResult<T> = Result<T, SetupError>;

impl SetupError {
    pub(crate) fn catalog(url: &str, reason: impl fmt::Display) -> Self {
        SetupError::CatalogUnavailable {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn download(url: &str, reason: impl fmt::Display) -> Self {
        SetupError::DownloadFailed {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SetupError::WriteFailed {
            path: path.into(),
            source,
        }
    }
}

impl From<ValidationIssue> for SetupError {
    fn from(issue: ValidationIssue) -> Self {
        SetupError::ValidationFailed(issue)
    }
}
