pub mod artifact;
pub mod client;

pub use artifact::ArtifactRef;
pub use client::Downloader;
