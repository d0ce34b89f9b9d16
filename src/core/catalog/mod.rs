pub mod client;
pub mod config;

pub use client::{select_latest_build, sort_versions_descending, CatalogClient};
pub use config::CatalogConfig;
