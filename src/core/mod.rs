// ─── PaperSetup Core ───
// Provisioning backend for a Paper Minecraft server.
//
// Architecture:
//   core/
//     catalog/    — Version + build queries against the distribution API
//     downloader/ — Artifact naming + streaming download
//     install/    — Request validation, server.properties, start script, writer
//     launch/     — Hands the start script to the OS
//     state/      — Shared clients for one session
//     provision   — The end-to-end setup sequence

pub mod catalog;
pub mod downloader;
pub mod error;
pub mod http;
pub mod install;
pub mod launch;
pub mod provision;
pub mod state;
