// ─── Version Catalog ───
// Queries the build-distribution API for versions and builds.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use super::config::CatalogConfig;
use crate::core::downloader::ArtifactRef;
use crate::core::error::{SetupError, SetupResult};

/// `GET /projects/<project>`; only `versions` is read.
#[derive(Debug, Deserialize)]
pub struct ProjectResponse {
    #[serde(default)]
    pub versions: Vec<String>,
}

/// `GET /projects/<project>/versions/<version>`; only `builds` is read.
#[derive(Debug, Deserialize)]
pub struct VersionResponse {
    #[serde(default)]
    pub builds: Vec<u64>,
}

pub struct CatalogClient {
    client: Client,
    config: CatalogConfig,
}

impl CatalogClient {
    pub fn new(client: Client, config: CatalogConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// All versions the catalog offers, highest string first.
    pub async fn list_versions(&self) -> SetupResult<Vec<String>> {
        let url = self.config.project_url();
        info!("Fetching {} versions...", self.config.project);

        let project: ProjectResponse = self.get_json(&url).await?;
        let versions = sort_versions_descending(project.versions);

        info!("Catalog lists {} versions", versions.len());
        Ok(versions)
    }

    /// The version a fresh form should be pre-filled with.
    pub async fn latest_version(&self) -> SetupResult<Option<String>> {
        Ok(self.list_versions().await?.into_iter().next())
    }

    /// Raw build ids for one version. Never empty on success.
    pub async fn resolve_builds(&self, version: &str) -> SetupResult<Vec<u64>> {
        let url = self
            .config
            .version_url(version)
            .ok_or_else(|| SetupError::NoBuildsFound(version.to_string()))?;
        debug!("Fetching builds for {}", version);

        let response: VersionResponse = self.get_json(&url).await?;
        if response.builds.is_empty() {
            return Err(SetupError::NoBuildsFound(version.to_string()));
        }

        Ok(response.builds)
    }

    /// Resolve `version` to its newest build.
    pub async fn resolve_latest(&self, version: &str) -> SetupResult<ArtifactRef> {
        let builds = self.resolve_builds(version).await?;
        let build = select_latest_build(&builds)
            .ok_or_else(|| SetupError::NoBuildsFound(version.to_string()))?;

        info!(
            "Selected build {} of {} ({} builds available)",
            build,
            version,
            builds.len()
        );

        Ok(ArtifactRef::new(
            &self.config.project,
            version,
            build,
            &self.config.artifact_extension,
        ))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> SetupResult<T> {
        let resp = self
            .client
            .get(url)
            .timeout(self.config.request_timeout)
            .send()
            .await
            .map_err(|e| SetupError::catalog(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SetupError::catalog(url, format!("HTTP {}", status)));
        }

        resp.json::<T>()
            .await
            .map_err(|e| SetupError::catalog(url, e))
    }
}

/// Descending plain string order: `"1.9"` sorts above `"1.20.4"`.
pub fn sort_versions_descending(mut versions: Vec<String>) -> Vec<String> {
    versions.sort_unstable_by(|a, b| b.cmp(a));
    versions
}

/// Latest build wins; ids are unique integers.
pub fn select_latest_build(builds: &[u64]) -> Option<u64> {
    builds.iter().copied().max()
}
