//! CLI configuration.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Command-line flags override what the environment sets.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use loadout_domain::CharacterId;

use crate::error::{CtlError, CtlResult};

/// Default loadout name when the text has no `LOADOUT` line.
pub const DEFAULT_LOADOUT_NAME: &str = "Unnamed Loadout";

/// Editor used by `apply --edit` when neither VISUAL nor EDITOR is set.
pub const DEFAULT_EDITOR: &str = "vi";

// =============================================================================
// Configuration
// =============================================================================

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment (test, development, production)
    pub environment: Environment,

    /// Character loadouts are applied to
    pub character: Option<CharacterId>,

    /// Raw inventory feed (JSON)
    pub snapshot_path: PathBuf,

    /// Item definitions (JSON array)
    pub manifest_path: PathBuf,

    /// Name used when the loadout text has none
    pub default_name: String,

    /// Paste service request timeout
    pub paste_timeout: Duration,

    /// Log output format
    pub log_format: LogFormat,

    /// Editor command for `apply --edit`
    pub editor: String,
}

/// Environment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Test environment
    Test,
    /// Development environment
    Development,
    /// Production environment
    Production,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable lines
    Text,
    /// One JSON object per event
    Json,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> CtlResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let environment = Self::load_parsed("LOADOUT_ENV", Environment::Development)?;
        let character = match env::var("LOADOUT_CHARACTER_ID") {
            Ok(id) if !id.trim().is_empty() => Some(CharacterId::new(id)?),
            _ => None,
        };
        let timeout_secs = Self::load_parsed::<u64>("LOADOUT_PASTE_TIMEOUT_SECS", 10)?;
        let log_format = Self::load_parsed("LOADOUT_LOG_FORMAT", LogFormat::Text)?;

        Ok(Self {
            environment,
            character,
            snapshot_path: Self::load_path("LOADOUT_SNAPSHOT_PATH", "inventory.json"),
            manifest_path: Self::load_path("LOADOUT_MANIFEST_PATH", "manifest.json"),
            default_name: env::var("LOADOUT_DEFAULT_NAME")
                .unwrap_or_else(|_| DEFAULT_LOADOUT_NAME.to_string()),
            paste_timeout: Duration::from_secs(timeout_secs),
            log_format,
            editor: Self::load_editor(),
        })
    }

    /// Create test configuration.
    pub fn test() -> Self {
        Self {
            environment: Environment::Test,
            paste_timeout: Duration::from_secs(1),
            ..Self::default()
        }
    }

    /// Override values from command-line flags.
    pub fn with_overrides(
        mut self,
        character: Option<String>,
        snapshot_path: Option<PathBuf>,
        manifest_path: Option<PathBuf>,
    ) -> CtlResult<Self> {
        if let Some(id) = character {
            self.character = Some(CharacterId::new(id)?);
        }
        if let Some(path) = snapshot_path {
            self.snapshot_path = path;
        }
        if let Some(path) = manifest_path {
            self.manifest_path = path;
        }
        Ok(self)
    }

    /// The active character, which every command needs.
    pub fn require_character(&self) -> CtlResult<&CharacterId> {
        self.character.as_ref().ok_or_else(|| {
            CtlError::Config(
                "No character selected: pass --character or set LOADOUT_CHARACTER_ID".to_string(),
            )
        })
    }

    fn load_editor() -> String {
        ["VISUAL", "EDITOR"]
            .iter()
            .filter_map(|key| env::var(key).ok())
            .find(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
    }

    fn load_path(key: &str, default: &str) -> PathBuf {
        env::var(key).map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(default))
    }

    fn load_parsed<T: FromStr>(key: &str, default: T) -> CtlResult<T> {
        match env::var(key) {
            Ok(val) => val
                .parse::<T>()
                .map_err(|_| CtlError::Config(format!("Invalid {} value: {}", key, val))),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            character: None,
            snapshot_path: PathBuf::from("inventory.json"),
            manifest_path: PathBuf::from("manifest.json"),
            default_name: DEFAULT_LOADOUT_NAME.to_string(),
            paste_timeout: Duration::from_secs(10),
            log_format: LogFormat::Text,
            editor: DEFAULT_EDITOR.to_string(),
        }
    }
}

impl FromStr for Environment {
    type Err = CtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(CtlError::Config(format!(
                "Invalid LOADOUT_ENV: {}. Expected: test, development, production",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = CtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(CtlError::Config(format!("Invalid LOADOUT_LOG_FORMAT: {}", other))),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
