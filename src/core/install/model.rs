use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::properties::ServerProperties;
use super::script::LaunchScript;
use crate::core::error::{SetupResult, ValidationIssue};

pub const DEFAULT_RAM_MB: u32 = 2048;
pub const DEFAULT_PORT: u16 = 25565;

/// Game modes accepted by the server — strongly typed, no magic strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameMode {
    #[default]
    Survival,
    Creative,
    Adventure,
    Spectator,
}

impl GameMode {
    pub const ALL: [GameMode; 4] = [
        GameMode::Survival,
        GameMode::Creative,
        GameMode::Adventure,
        GameMode::Spectator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Survival => "survival",
            GameMode::Creative => "creative",
            GameMode::Adventure => "adventure",
            GameMode::Spectator => "spectator",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == label)
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty labels and the numeric code written to `server.properties`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Difficulty {
    Peaceful,
    Easy,
    /// Fallback for unknown labels.
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Peaceful,
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Peaceful => "peaceful",
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Difficulty::Peaceful => "0",
            Difficulty::Easy => "1",
            Difficulty::Normal => "2",
            Difficulty::Hard => "3",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label)
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// World generator, written as `level-type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LevelType {
    #[default]
    Default,
    Flat,
    LargeBiomes,
    Amplified,
    Buffet,
}

impl LevelType {
    pub const ALL: [LevelType; 5] = [
        LevelType::Default,
        LevelType::Flat,
        LevelType::LargeBiomes,
        LevelType::Amplified,
        LevelType::Buffet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelType::Default => "default",
            LevelType::Flat => "flat",
            LevelType::LargeBiomes => "largeBiomes",
            LevelType::Amplified => "amplified",
            LevelType::Buffet => "buffet",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == label)
    }
}

impl std::fmt::Display for LevelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form values exactly as the user typed them.
#[derive(Debug, Clone)]
pub struct SetupForm {
    pub version: String,
    pub install_dir: String,
    pub ram_mb: String,
    pub port: String,
    pub gamemode: String,
    pub difficulty: String,
    pub level_type: String,
    pub eula_accepted: bool,
}

impl Default for SetupForm {
    fn default() -> Self {
        let install_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            version: String::new(),
            install_dir: install_dir.to_string_lossy().to_string(),
            ram_mb: DEFAULT_RAM_MB.to_string(),
            port: DEFAULT_PORT.to_string(),
            gamemode: GameMode::default().to_string(),
            difficulty: Difficulty::default().to_string(),
            level_type: LevelType::default().to_string(),
            eula_accepted: false,
        }
    }
}

/// A validated provisioning request. Built once, then only read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningRequest {
    pub version: String,
    pub install_dir: PathBuf,
    pub ram_mb: u32,
    pub port: u16,
    pub gamemode: GameMode,
    pub difficulty: Difficulty,
    pub level_type: LevelType,
    pub script: LaunchScript,
}

impl ProvisioningRequest {
    /// Validate form input.
    ///
    /// Bad field values fall back to their defaults. Only an empty version, a
    /// missing directory or an unaccepted EULA reject the request.
    pub fn from_form(form: &SetupForm) -> SetupResult<Self> {
        let version = form.version.trim().to_string();
        let install_dir = match form.install_dir.trim() {
            "" => PathBuf::from("."),
            dir => PathBuf::from(dir),
        };

        let ram_mb = parse_digits(&form.ram_mb).unwrap_or(DEFAULT_RAM_MB);
        let port = parse_digits(&form.port).unwrap_or(DEFAULT_PORT);
        let gamemode = GameMode::from_label(form.gamemode.trim()).unwrap_or_default();
        let difficulty = Difficulty::from_label(form.difficulty.trim()).unwrap_or_default();
        let level_type = LevelType::from_label(form.level_type.trim()).unwrap_or_default();

        if version.is_empty() {
            return Err(ValidationIssue::MissingVersion.into());
        }
        if !install_dir.exists() {
            return Err(ValidationIssue::DirectoryNotFound(install_dir).into());
        }
        if !form.eula_accepted {
            return Err(ValidationIssue::EulaNotAccepted.into());
        }

        Ok(Self {
            version,
            install_dir,
            ram_mb,
            port,
            gamemode,
            difficulty,
            level_type,
            script: LaunchScript::for_host(),
        })
    }

    pub fn with_script(mut self, script: LaunchScript) -> Self {
        self.script = script;
        self
    }
}

/// Non-empty ASCII digits that fit `T`; anything else is rejected.
fn parse_digits<T: FromStr>(raw: &str) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Files and directories produced by one provisioning run.
#[derive(Debug, Clone)]
pub struct Installation {
    pub root: PathBuf,
    pub artifact: PathBuf,
    pub eula: PathBuf,
    pub properties_file: PathBuf,
    pub script: PathBuf,
    pub plugins_dir: PathBuf,
    pub world_dir: PathBuf,
    pub properties: ServerProperties,
}

impl Installation {
    pub fn artifact_name(&self) -> String {
        file_name_of(&self.artifact)
    }

    pub fn script_name(&self) -> String {
        file_name_of(&self.script)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
