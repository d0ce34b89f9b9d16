use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info, warn};

use crate::core::error::SetupError;
use crate::core::install::{Difficulty, GameMode, Installation, LevelType, SetupForm};
use crate::core::launch::SystemOpener;
use crate::core::provision;
use crate::core::state::AppState;

/// What the user sees after a successful setup.
#[derive(Debug)]
pub struct SetupReport {
    pub install_dir: String,
    pub jar: String,
    pub eula: String,
    pub script: String,
    pub properties: String,
}

impl From<&Installation> for SetupReport {
    fn from(install: &Installation) -> Self {
        Self {
            install_dir: install.root.to_string_lossy().to_string(),
            jar: install.artifact_name(),
            eula: display_name(&install.eula),
            script: install.script_name(),
            properties: display_name(&install.properties_file),
        }
    }
}

impl fmt::Display for SetupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Server files generated in {}", self.install_dir)?;
        writeln!(f, "  JAR:    {}", self.jar)?;
        writeln!(f, "  EULA:   {}", self.eula)?;
        writeln!(f, "  Script: {}", self.script)?;
        write!(f, "  {} created", self.properties)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub async fn get_latest_version(state: &AppState) -> Result<Option<String>, SetupError> {
    state.catalog.latest_version().await
}

pub async fn setup_server(state: &AppState, form: &SetupForm) -> Result<SetupReport, SetupError> {
    let install = provision::provision(state, form).await?;
    Ok(SetupReport::from(&install))
}

pub fn start_server(state: &AppState, install_dir: &str) -> Result<PathBuf, SetupError> {
    let dir = match install_dir.trim() {
        "" => ".",
        dir => dir,
    };
    provision::start(state, Path::new(dir), &SystemOpener)
}

// ── Terminal form ───────────────────────────────────

type InputLines = Lines<BufReader<Stdin>>;

/// Interactive session. Answers persist between actions, like a form.
pub async fn run_terminal(state: &AppState) {
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut form = SetupForm::default();

    loop {
        println!();
        println!("[1] Setup server   [2] Start server   [q] Quit");
        let Some(choice) = prompt(&mut input, "Choice", "").await else {
            break;
        };

        match choice.as_str() {
            "1" => {
                if fill_form(state, &mut input, &mut form).await.is_none() {
                    break;
                }
                match setup_server(state, &form).await {
                    Ok(report) => println!("{}", report),
                    Err(e) => report_error("Setup failed", &e),
                }
            }
            "2" => {
                let Some(dir) = prompt(&mut input, "Install directory", &form.install_dir).await
                else {
                    break;
                };
                form.install_dir = dir;
                match start_server(state, &form.install_dir) {
                    Ok(script) => println!("Started {}", script.display()),
                    Err(e) => report_error("Could not start the server", &e),
                }
            }
            "q" | "Q" => break,
            other => println!("Unknown choice: {}", other),
        }
    }

    info!("Session closed");
}

/// Ask for every field. `None` means input was closed.
async fn fill_form(state: &AppState, input: &mut InputLines, form: &mut SetupForm) -> Option<()> {
    if form.version.is_empty() {
        match get_latest_version(state).await {
            Ok(Some(latest)) => form.version = latest,
            Ok(None) => warn!("Catalog returned no versions"),
            Err(e) => report_error("Could not fetch versions", &e),
        }
    }

    form.version = prompt(input, "Version", &form.version).await?;
    form.install_dir = prompt(input, "Install directory", &form.install_dir).await?;
    form.ram_mb = prompt(input, "Memory (MB)", &form.ram_mb).await?;
    form.port = prompt(input, "Server port", &form.port).await?;
    form.gamemode = prompt(input, &choices("Game mode", &GameMode::ALL), &form.gamemode).await?;
    form.difficulty =
        prompt(input, &choices("Difficulty", &Difficulty::ALL), &form.difficulty).await?;
    form.level_type =
        prompt(input, &choices("World type", &LevelType::ALL), &form.level_type).await?;

    let eula_default = if form.eula_accepted { "y" } else { "n" };
    let eula = prompt(
        input,
        "Accept the Minecraft EULA (https://aka.ms/MinecraftEULA)? y/n",
        eula_default,
    )
    .await?;
    form.eula_accepted = matches!(eula.to_lowercase().as_str(), "y" | "yes");

    Some(())
}

fn choices<T: fmt::Display>(label: &str, options: &[T]) -> String {
    let options: Vec<String> = options.iter().map(|o| o.to_string()).collect();
    format!("{} ({})", label, options.join(", "))
}

/// Print `label [default]: ` and read one line; blank input keeps the default.
async fn prompt(input: &mut InputLines, label: &str, default: &str) -> Option<String> {
    if default.is_empty() {
        print!("{}: ", label);
    } else {
        print!("{} [{}]: ", label, default);
    }
    let _ = std::io::stdout().flush();

    match input.next_line().await {
        Ok(Some(line)) if line.trim().is_empty() => Some(default.to_string()),
        Ok(Some(line)) => Some(line.trim().to_string()),
        Ok(None) => None,
        Err(e) => {
            error!("Could not read input: {}", e);
            None
        }
    }
}

fn report_error(context: &str, err: &SetupError) {
    match err {
        SetupError::ValidationFailed(_) | SetupError::NotProvisioned(_) => {
            warn!("{}: {}", context, err)
        }
        _ => error!("{}: {}", context, err),
    }
    eprintln!("{}:\n{}", context, err);
}
