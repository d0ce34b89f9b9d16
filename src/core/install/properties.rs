// ─── server.properties ───
// Ordered key/value model. Output order is the order of PROPERTY_DEFAULTS.

use super::model::ProvisioningRequest;

pub const LEVEL_NAME_KEY: &str = "level-name";
const DEFAULT_LEVEL_NAME: &str = "world";

/// Keys written on every run, in file order, with their default values.
pub const PROPERTY_DEFAULTS: [(&str, &str); 9] = [
    ("server-port", "25565"),
    ("motd", "A Minecraft Server"),
    ("max-players", "20"),
    ("online-mode", "true"),
    (LEVEL_NAME_KEY, DEFAULT_LEVEL_NAME),
    ("gamemode", "survival"),
    ("difficulty", "1"),
    ("pvp", "true"),
    ("level-type", "default"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerProperties {
    entries: Vec<(String, String)>,
}

impl Default for ServerProperties {
    fn default() -> Self {
        Self {
            entries: PROPERTY_DEFAULTS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl ServerProperties {
    /// Defaults with the request's choices applied in place.
    pub fn for_request(request: &ProvisioningRequest) -> Self {
        let mut props = Self::default();
        props.set("server-port", request.port.to_string());
        props.set("motd", format!("Minecraft Server ({})", request.version));
        props.set("gamemode", request.gamemode.as_str());
        props.set("difficulty", request.difficulty.code());
        props.set("level-type", request.level_type.as_str());
        props
    }

    /// Overwrite `key` where it already sits, or append it. Last write wins.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// World directory name.
    pub fn level_name(&self) -> &str {
        match self.get(LEVEL_NAME_KEY) {
            Some(name) if !name.trim().is_empty() => name,
            _ => DEFAULT_LEVEL_NAME,
        }
    }

    /// `key=value` lines, newline terminated.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}\n", k, v))
            .collect()
    }

    /// Read a properties file back. Blank lines, `#` comments and lines
    /// without `=` are skipped; repeated keys keep the last value.
    pub fn parse(text: &str) -> Self {
        let mut props = Self {
            entries: Vec::new(),
        };
        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                props.set(key, value);
            }
        }
        props
    }
}
