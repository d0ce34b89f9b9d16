use crate::core::catalog::{CatalogClient, CatalogConfig};
use crate::core::downloader::Downloader;
use crate::core::error::{SetupError, SetupResult};
use crate::core::http::build_http_client;

/// Long-lived collaborators shared by every command of one session.
pub struct AppState {
    pub catalog: CatalogClient,
    pub downloader: Downloader,
}

impl AppState {
    pub fn new(config: CatalogConfig) -> SetupResult<Self> {
        let http_client =
            build_http_client().map_err(|e| SetupError::catalog(&config.api_root, e))?;
        let downloader = Downloader::new(http_client.clone(), &config);
        let catalog = CatalogClient::new(http_client, config);

        Ok(Self {
            catalog,
            downloader,
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        self.catalog.config()
    }
}
