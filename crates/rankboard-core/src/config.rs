// Configuration loading and parsing (dashboard.toml).
//
// The player registry (name -> color + match sheet URL), the overview sheet
// URL and the fetch/display settings all come from one TOML file. The loaded
// `Config` is immutable and handed to the app task at startup.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// File name of the dashboard config inside `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "dashboard.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// A 24-bit display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Color used for players missing from the registry.
    pub const FALLBACK: Rgb = Rgb(0xFF, 0xFF, 0xFF);

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn parse_hex(text: &str) -> Option<Rgb> {
        let hex = text.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// CSV export of the shared SR-over-time sheet.
    pub overview_url: String,
    pub fetch: FetchConfig,
    pub display: DisplayConfig,
    pub registry: EntityRegistry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    /// Append a `t=<millis>` query parameter so published-sheet caches are
    /// bypassed on every load.
    #[serde(default = "default_true")]
    pub cache_bust: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Count the KD stat up from zero when a player view loads.
    #[serde(default = "default_true")]
    pub animate: bool,
    #[serde(default = "default_animation_ms")]
    pub animation_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            animate: true,
            animation_ms: default_animation_ms(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_animation_ms() -> u64 {
    1000
}

// ---------------------------------------------------------------------------
// Entity registry
// ---------------------------------------------------------------------------

/// A tracked player: display color and the location of their match sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredEntity {
    pub name: String,
    pub color: Rgb,
    pub url: String,
}

/// Lookup table of tracked players, in config order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityRegistry {
    entities: Vec<RegisteredEntity>,
}

impl EntityRegistry {
    pub fn new(entities: Vec<RegisteredEntity>) -> Self {
        EntityRegistry { entities }
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredEntity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Display color for `name`; unknown names get [`Rgb::FALLBACK`].
    pub fn color_for(&self, name: &str) -> Rgb {
        self.get(name).map_or(Rgb::FALLBACK, |e| e.color)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().map(|e| e.name.as_str())
    }

    pub fn entities(&self) -> &[RegisteredEntity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

// ---------------------------------------------------------------------------
// dashboard.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the whole dashboard.toml file.
#[derive(Debug, Clone, Deserialize)]
struct DashboardFile {
    overview: OverviewSection,
    fetch: FetchConfig,
    #[serde(default)]
    display: DisplayConfig,
    #[serde(default)]
    players: Vec<PlayerEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct OverviewSection {
    url: String,
}

#[derive(Debug, Clone, Deserialize)]
struct PlayerEntry {
    name: String,
    color: String,
    url: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/dashboard.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()` for normal startup.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    parse_config(&text).map_err(|e| match e {
        ParseFailure::Toml(source) => ConfigError::ParseError { path, source },
        ParseFailure::Invalid(err) => err,
    })
}

enum ParseFailure {
    Toml(toml::de::Error),
    Invalid(ConfigError),
}

fn parse_config(text: &str) -> Result<Config, ParseFailure> {
    let file: DashboardFile = toml::from_str(text).map_err(ParseFailure::Toml)?;
    validate(&file).map_err(ParseFailure::Invalid)?;

    let entities = file
        .players
        .into_iter()
        .map(|p| RegisteredEntity {
            color: Rgb::parse_hex(&p.color).unwrap_or(Rgb::FALLBACK),
            name: p.name.trim().to_string(),
            url: p.url.trim().to_string(),
        })
        .collect();

    Ok(Config {
        overview_url: file.overview.url.trim().to_string(),
        fetch: file.fetch,
        display: file.display,
        registry: EntityRegistry::new(entities),
    })
}

/// Seed `config/dashboard.toml` from `defaults/` when it is missing.
/// Returns the path written, or `None` when a config is already in place.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no {CONFIG_FILE} in config/ or defaults/ under {}",
                base_dir.display()
            ),
        });
    }

    let copy_failed = |e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("failed to seed {}: {e}", target.display()),
    };
    if let Some(config_dir) = target.parent() {
        std::fs::create_dir_all(config_dir).map_err(copy_failed)?;
    }
    std::fs::copy(&source, &target).map_err(copy_failed)?;

    info!("Seeded {} from {}", target.display(), source.display());
    Ok(Some(target))
}

/// Load config relative to the current working directory, seeding it from
/// defaults first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(file: &DashboardFile) -> Result<(), ConfigError> {
    if file.overview.url.trim().is_empty() {
        return Err(invalid("overview.url", "must not be empty"));
    }

    if file.fetch.timeout_secs == 0 {
        return Err(invalid("fetch.timeout_secs", "must be > 0"));
    }

    let mut seen = HashSet::new();
    for (i, player) in file.players.iter().enumerate() {
        let name = player.name.trim();
        if name.is_empty() {
            return Err(invalid(format!("players[{i}].name"), "must not be empty"));
        }
        if !seen.insert(name) {
            return Err(invalid(
                format!("players[{i}].name"),
                format!("duplicate player `{name}`"),
            ));
        }
        if Rgb::parse_hex(&player.color).is_none() {
            return Err(invalid(
                format!("players[{i}].color"),
                format!("expected #RRGGBB, got `{}`", player.color),
            ));
        }
        if player.url.trim().is_empty() {
            return Err(invalid(format!("players[{i}].url"), "must not be empty"));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Repository root holding `defaults/`, whether tests run from the crate
    /// directory or the workspace root.
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("../../defaults").exists() {
            cwd.join("../..")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    fn fresh_dir(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        tmp
    }

    fn write_config(dir: &Path, text: &str) {
        fs::write(dir.join("config").join(CONFIG_FILE), text).unwrap();
    }

    fn default_text() -> String {
        fs::read_to_string(project_root().join("defaults").join(CONFIG_FILE)).unwrap()
    }

    fn expect_field(err: ConfigError, expected: &str) {
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    const MINIMAL: &str = r##"
[overview]
url = "https://example.com/overview.csv"

[fetch]
timeout_secs = 5

[[players]]
name = "Ant"
color = "#FF5252"
url = "https://example.com/ant.csv"
"##;

    #[test]
    fn load_default_config_from_project_files() {
        let tmp = fresh_dir("rankboard_config_defaults");
        write_config(&tmp, &default_text());

        let config = load_config_from(&tmp).expect("defaults should be valid");
        assert!(config.overview_url.starts_with("https://docs.google.com/"));
        assert_eq!(config.fetch.timeout_secs, 10);
        assert!(config.fetch.cache_bust);
        assert!(config.display.animate);
        assert_eq!(config.display.animation_ms, 1000);

        let names: Vec<&str> = config.registry.names().collect();
        assert_eq!(names, vec!["Ant", "Kiko", "Tac", "June", "Yeti"]);
        assert_eq!(config.registry.color_for("Ant"), Rgb(0xFF, 0x52, 0x52));
        assert_eq!(config.registry.color_for("Yeti"), Rgb(0xFF, 0xAB, 0x40));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn minimal_config_uses_display_defaults() {
        let tmp = fresh_dir("rankboard_config_minimal");
        write_config(&tmp, MINIMAL);

        let config = load_config_from(&tmp).unwrap();
        assert!(config.fetch.cache_bust);
        assert!(config.display.animate);
        assert_eq!(config.display.animation_ms, 1000);
        assert_eq!(config.registry.len(), 1);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn unknown_player_gets_fallback_color() {
        let registry = EntityRegistry::new(vec![RegisteredEntity {
            name: "Kiko".into(),
            color: Rgb(0x44, 0x8A, 0xFF),
            url: "u".into(),
        }]);
        assert_eq!(registry.color_for("Kiko"), Rgb(0x44, 0x8A, 0xFF));
        assert_eq!(registry.color_for("Nobody"), Rgb::FALLBACK);
        assert!(registry.get("Nobody").is_none());
    }

    #[test]
    fn parse_hex_colors() {
        assert_eq!(Rgb::parse_hex("#69F0AE"), Some(Rgb(0x69, 0xF0, 0xAE)));
        assert_eq!(Rgb::parse_hex("e040fb"), Some(Rgb(0xE0, 0x40, 0xFB)));
        assert_eq!(Rgb::parse_hex("#fff"), None);
        assert_eq!(Rgb::parse_hex("#GGGGGG"), None);
        assert_eq!(Rgb::parse_hex(""), None);
    }

    #[test]
    fn rejects_bad_color() {
        let tmp = fresh_dir("rankboard_config_bad_color");
        write_config(&tmp, &MINIMAL.replace("#FF5252", "red"));
        expect_field(load_config_from(&tmp).unwrap_err(), "players[0].color");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_duplicate_player() {
        let tmp = fresh_dir("rankboard_config_duplicate");
        let text = format!(
            "{MINIMAL}\n[[players]]\nname = \" Ant \"\ncolor = \"#000000\"\nurl = \"x\"\n"
        );
        write_config(&tmp, &text);
        expect_field(load_config_from(&tmp).unwrap_err(), "players[1].name");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_timeout() {
        let tmp = fresh_dir("rankboard_config_zero_timeout");
        write_config(&tmp, &MINIMAL.replace("timeout_secs = 5", "timeout_secs = 0"));
        expect_field(load_config_from(&tmp).unwrap_err(), "fetch.timeout_secs");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_overview_url() {
        let tmp = fresh_dir("rankboard_config_empty_url");
        write_config(
            &tmp,
            &MINIMAL.replace("https://example.com/overview.csv", "  "),
        );
        expect_field(load_config_from(&tmp).unwrap_err(), "overview.url");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = fresh_dir("rankboard_config_missing");
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("expected FileNotFound, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = fresh_dir("rankboard_config_invalid_toml");
        write_config(&tmp, "this is not valid [[[ toml");
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("expected ParseError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_file_seeds_from_defaults() {
        let tmp = fresh_dir("rankboard_config_ensure_seeds");
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join(CONFIG_FILE), default_text()).unwrap();
        fs::write(defaults_dir.join("dashboard.toml.example"), "# sample\n").unwrap();

        let seeded = ensure_config_file(&tmp).expect("should succeed");
        assert_eq!(seeded, Some(tmp.join("config").join(CONFIG_FILE)));
        assert_eq!(
            fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap(),
            default_text()
        );
        assert!(!tmp.join("config/dashboard.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_file_keeps_existing() {
        let tmp = fresh_dir("rankboard_config_ensure_keeps");
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), default_text()).unwrap();
        write_config(&tmp, "# custom\n");

        assert_eq!(ensure_config_file(&tmp).expect("should succeed"), None);
        let content = fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_file_keeps_existing_without_defaults() {
        let tmp = fresh_dir("rankboard_config_ensure_no_defaults");
        write_config(&tmp, "# custom\n");

        assert_eq!(ensure_config_file(&tmp).expect("should succeed"), None);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_file_errors_when_nothing_to_seed() {
        let tmp = fresh_dir("rankboard_config_nothing_to_seed");

        match ensure_config_file(&tmp).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("no dashboard.toml in config/ or defaults/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
