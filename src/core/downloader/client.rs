use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

use super::artifact::ArtifactRef;
use crate::core::catalog::CatalogConfig;
use crate::core::error::{SetupError, SetupResult};

/// Write buffer size; the body is never held in memory as a whole.
const CHUNK_SIZE: usize = 8 * 1024;

/// Streaming artifact downloader.
pub struct Downloader {
    client: Client,
    api_root: String,
    timeout: Duration,
}

impl Downloader {
    pub fn new(client: Client, config: &CatalogConfig) -> Self {
        Self {
            client,
            api_root: config.api_root.clone(),
            timeout: config.download_timeout,
        }
    }

    /// Download `artifact` into `dest_dir`, replacing any file of the same name.
    ///
    /// The body is streamed into `<file>.part` and renamed over the final name
    /// once complete. On failure the `.part` file is removed and an existing
    /// artifact from an earlier run is left untouched.
    pub async fn download(&self, artifact: &ArtifactRef, dest_dir: &Path) -> SetupResult<PathBuf> {
        let url = artifact.url(&self.api_root);
        let file_name = artifact.file_name();
        if !is_plain_file_name(&file_name) {
            return Err(SetupError::download(
                &url,
                format!("{:?} is not a plain file name", file_name),
            ));
        }
        let dest = dest_dir.join(&file_name);
        let part = dest_dir.join(format!("{}.part", file_name));

        tokio::fs::create_dir_all(dest_dir)
            .await
            .map_err(|e| SetupError::download(&url, format!("{:?}: {}", dest_dir, e)))?;

        info!("Downloading {} from {}", artifact, url);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SetupError::download(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SetupError::download(&url, format!("HTTP {}", status)));
        }

        let total_bytes = response.content_length();
        let written = match stream_to_file(&url, response, &part).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&part).await {
                    warn!("Could not remove partial download {:?}: {}", part, cleanup);
                }
                return Err(e);
            }
        };

        tokio::fs::rename(&part, &dest)
            .await
            .map_err(|e| SetupError::download(&url, format!("{:?}: {}", dest, e)))?;

        debug!(
            "Downloaded {} bytes (expected {:?}) -> {:?}",
            written, total_bytes, dest
        );
        info!("Saved {}", file_name);
        Ok(dest)
    }
}

/// Exactly one normal path component, so the file lands directly in `dest_dir`.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

async fn stream_to_file(url: &str, response: reqwest::Response, path: &Path) -> SetupResult<u64> {
    let io_err = |e: std::io::Error| SetupError::download(url, format!("{:?}: {}", path, e));

    let file = tokio::fs::File::create(path).await.map_err(io_err)?;
    let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
    let mut stream = response.bytes_stream();
    let mut written = 0_u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| SetupError::download(url, e))?;
        writer.write_all(&chunk).await.map_err(io_err)?;
        written += chunk.len() as u64;
    }

    writer.flush().await.map_err(io_err)?;
    // writer (and the file handle) drops here, before the rename
    Ok(written)
}
