// ─── Provisioning ───
// validate → resolve newest build → download → write installation files.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::error::SetupResult;
use crate::core::install::{self, Installation, ProvisioningRequest, SetupForm};
use crate::core::launch::{self, ScriptOpener};
use crate::core::state::AppState;

/// Validate `form` and provision. Rejected forms never reach the network.
pub async fn provision(state: &AppState, form: &SetupForm) -> SetupResult<Installation> {
    let request = ProvisioningRequest::from_form(form)?;
    provision_request(state, &request).await
}

pub async fn provision_request(
    state: &AppState,
    request: &ProvisioningRequest,
) -> SetupResult<Installation> {
    info!(
        "Provisioning {} {} into {:?}",
        state.config().project,
        request.version,
        request.install_dir
    );

    let artifact = state.catalog.resolve_latest(&request.version).await?;
    let jar = state
        .downloader
        .download(&artifact, &request.install_dir)
        .await?;

    install::write_installation(request, &jar).await
}

/// Launch the server previously provisioned into `dir`.
pub fn start(state: &AppState, dir: &Path, opener: &dyn ScriptOpener) -> SetupResult<PathBuf> {
    launch::launch(dir, &state.config().artifact_extension, opener)
}
