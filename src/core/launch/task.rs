// ─── Launch Task ───
// Hands the generated start script to the OS and returns immediately.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::core::error::{SetupError, SetupResult};
use crate::core::install::LaunchScript;

/// Seam between the launcher and the operating system.
pub trait ScriptOpener {
    fn open(&self, script: &Path) -> std::io::Result<()>;
}

/// Runs the script detached: `cmd /C start` on Windows, `sh` elsewhere.
pub struct SystemOpener;

impl ScriptOpener for SystemOpener {
    fn open(&self, script: &Path) -> std::io::Result<()> {
        let mut command = script_command(script);
        debug!("Command: {:?}", command);
        // The child is not awaited; its lifetime is the user's business.
        command.spawn().map(|_| ())
    }
}

fn script_command(script: &Path) -> Command {
    #[cfg(target_os = "windows")]
    let mut cmd = {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg("start").arg("").arg(script);
        cmd
    };

    #[cfg(not(target_os = "windows"))]
    let mut cmd = {
        let mut cmd = Command::new("sh");
        cmd.arg(script);
        cmd
    };

    if let Some(dir) = script.parent() {
        cmd.current_dir(dir);
    }
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    cmd
}

/// Server artifacts (`*.<extension>`) directly inside `dir`.
pub fn find_artifacts(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let read_dir = match std::fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(_) => return Vec::new(),
    };

    let mut artifacts: Vec<PathBuf> = read_dir
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case(extension))
                    .unwrap_or(false)
        })
        .collect();
    artifacts.sort();
    artifacts
}

/// The start script to run: the host flavour if present, else whichever exists.
pub fn locate_script(dir: &Path) -> Option<PathBuf> {
    let host = LaunchScript::for_host();
    let other = match host {
        LaunchScript::Batch => LaunchScript::Shell,
        LaunchScript::Shell => LaunchScript::Batch,
    };

    [host, other]
        .iter()
        .map(|kind| dir.join(kind.file_name()))
        .find(|path| path.is_file())
}

/// Start the server installed in `dir`.
///
/// Fails with `NotProvisioned` (without touching the OS) when `dir` holds no
/// artifact, and with `LaunchFailed` when it holds no start script. Returns
/// the script that was handed off.
pub fn launch(
    dir: &Path,
    extension: &str,
    opener: &dyn ScriptOpener,
) -> SetupResult<PathBuf> {
    let artifacts = find_artifacts(dir, extension);
    if artifacts.is_empty() {
        return Err(SetupError::NotProvisioned(dir.to_path_buf()));
    }
    debug!("Found server artifacts: {:?}", artifacts);

    let script = locate_script(dir).ok_or_else(|| SetupError::LaunchFailed {
        path: dir.join(LaunchScript::for_host().file_name()),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "start script missing"),
    })?;
    opener
        .open(&script)
        .map_err(|source| SetupError::LaunchFailed {
            path: script.clone(),
            source,
        })?;

    info!("Launched {:?}", script);
    Ok(script)
}
