use std::fmt;

/// A concrete, immutable build of one catalog version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactRef {
    pub project: String,
    pub version: String,
    pub build: u64,
    /// File extension. Defaults to `"jar"`.
    pub extension: String,
}

impl ArtifactRef {
    pub fn new(project: &str, version: &str, build: u64, extension: &str) -> Self {
        Self {
            project: project.to_string(),
            version: version.to_string(),
            build,
            extension: extension.to_string(),
        }
    }

    /// `project-version-build.extension`
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}-{}.{}",
            self.project, self.version, self.build, self.extension
        )
    }

    /// Construct the download URL under the given API root.
    ///
    /// Template:
    /// `<root>/projects/<project>/versions/<version>/builds/<build>/downloads/<file_name>`,
    /// every segment percent-encoded.
    pub fn url(&self, api_root: &str) -> String {
        let base = api_root.trim_end_matches('/');
        format!(
            "{}/projects/{}/versions/{}/builds/{}/downloads/{}",
            base,
            urlencoding::encode(&self.project),
            urlencoding::encode(&self.version),
            self.build,
            urlencoding::encode(&self.file_name())
        )
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (build {})", self.project, self.version, self.build)
    }
}
