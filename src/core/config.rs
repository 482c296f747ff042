//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.courier/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::Endpoints;
use crate::core::state::NotificationSettings;
use crate::core::sync::PollIntervals;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CourierConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Endpoints default to `<base_url>/auth`, `/users`, `/messages`.
    pub base_url: Option<String>,
    pub session_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EndpointsConfig {
    pub auth_url: Option<String>,
    pub users_url: Option<String>,
    pub messages_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PollingConfig {
    pub chat_interval_ms: Option<u64>,
    pub chat_list_interval_ms: Option<u64>,
    pub search_debounce_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NotificationsConfig {
    pub messages: Option<bool>,
    pub mentions: Option<bool>,
    pub sounds: Option<bool>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const SESSION_FILE_NAME: &str = "session.json";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub endpoints: Endpoints,
    pub polling: PollIntervals,
    pub notifications: NotificationSettings,
    pub session_path: PathBuf,
}

/// Values supplied on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub session_file: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.courier/`, the home of the config file and the session record.
pub fn courier_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".courier"))
}

/// Returns the path to `~/.courier/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    courier_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.courier/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `CourierConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<CourierConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(CourierConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<CourierConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(CourierConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: CourierConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Courier Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# base_url = "http://localhost:8080"   # Or set COURIER_BASE_URL
# session_file = "/home/me/.courier/session.json"

# [endpoints]                          # Each defaults to <base_url>/<name>
# auth_url = "https://example.com/auth"          # COURIER_AUTH_URL
# users_url = "https://example.com/users"        # COURIER_USERS_URL
# messages_url = "https://example.com/messages"  # COURIER_MESSAGES_URL

# [polling]
# chat_interval_ms = 3000
# chat_list_interval_ms = 5000
# search_debounce_ms = 300

# [notifications]
# messages = true
# mentions = true
# sounds = false
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// A `--base-url` on the command line re-derives all three endpoints from it.
pub fn resolve(config: &CourierConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Base URL: env → config → default
    let base_url = std::env::var("COURIER_BASE_URL")
        .ok()
        .or_else(|| config.general.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let endpoints = match cli.base_url.as_deref() {
        Some(cli_base) => endpoints_from_base(cli_base),
        None => {
            let derived = endpoints_from_base(&base_url);
            Endpoints {
                auth: endpoint(
                    "COURIER_AUTH_URL",
                    config.endpoints.auth_url.as_ref(),
                    derived.auth,
                ),
                users: endpoint(
                    "COURIER_USERS_URL",
                    config.endpoints.users_url.as_ref(),
                    derived.users,
                ),
                messages: endpoint(
                    "COURIER_MESSAGES_URL",
                    config.endpoints.messages_url.as_ref(),
                    derived.messages,
                ),
            }
        }
    };

    let defaults = PollIntervals::default();
    let polling = PollIntervals {
        chat: interval_ms(
            "chat_interval_ms",
            config.polling.chat_interval_ms,
            defaults.chat,
        ),
        chat_list: interval_ms(
            "chat_list_interval_ms",
            config.polling.chat_list_interval_ms,
            defaults.chat_list,
        ),
        search_debounce: interval_ms(
            "search_debounce_ms",
            config.polling.search_debounce_ms,
            defaults.search_debounce,
        ),
    };

    let default_notifications = NotificationSettings::default();
    let notifications = NotificationSettings {
        messages: config
            .notifications
            .messages
            .unwrap_or(default_notifications.messages),
        mentions: config
            .notifications
            .mentions
            .unwrap_or(default_notifications.mentions),
        sounds: config
            .notifications
            .sounds
            .unwrap_or(default_notifications.sounds),
    };

    // Session file: CLI → config → ~/.courier/session.json
    let session_path = cli
        .session_file
        .clone()
        .or_else(|| config.general.session_file.as_ref().map(PathBuf::from))
        .unwrap_or_else(default_session_path);

    ResolvedConfig {
        endpoints,
        polling,
        notifications,
        session_path,
    }
}

fn endpoints_from_base(base: &str) -> Endpoints {
    let base = base.trim_end_matches('/');
    Endpoints {
        auth: format!("{base}/auth"),
        users: format!("{base}/users"),
        messages: format!("{base}/messages"),
    }
}

/// A configured interval in milliseconds. Zero falls back to the default.
fn interval_ms(key: &str, configured: Option<u64>, default: Duration) -> Duration {
    match configured {
        Some(0) => {
            warn!("Ignoring {} = 0, using {:?}", key, default);
            default
        }
        Some(ms) => Duration::from_millis(ms),
        None => default,
    }
}

/// Per-endpoint URL: env → config → derived from base.
fn endpoint(env_key: &str, configured: Option<&String>, derived: String) -> String {
    std::env::var(env_key)
        .ok()
        .or_else(|| configured.cloned())
        .unwrap_or(derived)
}

/// `~/.courier/session.json`, or `.courier/session.json` when there is no home directory.
pub fn default_session_path() -> PathBuf {
    courier_dir()
        .unwrap_or_else(|| PathBuf::from(".courier"))
        .join(SESSION_FILE_NAME)
}
