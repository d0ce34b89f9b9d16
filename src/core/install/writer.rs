// ─── Installation Writer ───
// Materializes eula.txt, server.properties, the start script and the
// directory skeleton next to a downloaded server jar.

use std::path::Path;

use tracing::{debug, info};

use super::model::{Installation, ProvisioningRequest};
use super::properties::ServerProperties;
use crate::core::error::{SetupError, SetupResult};

pub const EULA_FILE: &str = "eula.txt";
pub const PROPERTIES_FILE: &str = "server.properties";
pub const PLUGINS_DIR: &str = "plugins";

const EULA_CONTENT: &str = "eula=true\n";

/// Write the installation files for `request` around `artifact`.
///
/// Steps run in order and stop at the first failure. Files written by
/// earlier steps stay on disk; existing files are overwritten.
pub async fn write_installation(
    request: &ProvisioningRequest,
    artifact: &Path,
) -> SetupResult<Installation> {
    let root = request.install_dir.as_path();
    create_dir(root).await?;

    let eula = root.join(EULA_FILE);
    write_text(&eula, EULA_CONTENT).await?;

    let properties = ServerProperties::for_request(request);
    let properties_file = root.join(PROPERTIES_FILE);
    write_text(&properties_file, &properties.render()).await?;

    let jar_name = artifact
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let script = root.join(request.script.file_name());
    write_text(&script, &request.script.render(request.ram_mb, &jar_name)).await?;
    mark_executable(&script).await?;

    let plugins_dir = root.join(PLUGINS_DIR);
    let world_dir = root.join(properties.level_name());
    create_dir(&plugins_dir).await?;
    create_dir(&world_dir).await?;

    info!("Server files written to {:?}", root);

    Ok(Installation {
        root: root.to_path_buf(),
        artifact: artifact.to_path_buf(),
        eula,
        properties_file,
        script,
        plugins_dir,
        world_dir,
        properties,
    })
}

// Content is written as UTF-8.
async fn write_text(path: &Path, content: &str) -> SetupResult<()> {
    tokio::fs::write(path, content)
        .await
        .map_err(|e| SetupError::write(path, e))?;
    debug!("Wrote {:?}", path);
    Ok(())
}

async fn create_dir(path: &Path) -> SetupResult<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| SetupError::write(path, e))
}

#[cfg(unix)]
async fn mark_executable(path: &Path) -> SetupResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path)
        .await
        .map_err(|e| SetupError::write(path, e))?
        .permissions();
    perms.set_mode(perms.mode() | 0o755);
    tokio::fs::set_permissions(path, perms)
        .await
        .map_err(|e| SetupError::write(path, e))
}

#[cfg(not(unix))]
async fn mark_executable(_path: &Path) -> SetupResult<()> {
    Ok(())
}
