//! Configuration loading and validation.
//!
//! The bot reads a single human-owned `config.toml`. Secrets never live in
//! the file: the Telegram token is read from the environment variable named
//! by `channels.telegram.bot_token_env`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Statistics provider settings.
    #[serde(default)]
    pub stats: StatsConfig,

    /// Chat channel configuration.
    #[serde(default)]
    pub channels: ChannelsConfig,

    /// Reply pacing.
    #[serde(default)]
    pub replies: RepliesConfig,

    /// Chart rendering options.
    #[serde(default)]
    pub plot: PlotConfig,
}

/// Statistics provider (covid19api-compatible) settings.
#[derive(Debug, Deserialize)]
pub struct StatsConfig {
    /// Base URL of the statistics API, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl StatsConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Channel configuration.
#[derive(Debug, Default, Deserialize)]
pub struct ChannelsConfig {
    /// Telegram bot settings.
    #[serde(default)]
    pub telegram: TelegramConfig,
}

/// Telegram-specific configuration.
#[derive(Debug, Deserialize)]
pub struct TelegramConfig {
    /// Environment variable name holding the bot token.
    #[serde(default = "default_token_env")]
    pub bot_token_env: String,

    /// Chat IDs the bot answers in. Empty means every chat.
    #[serde(default)]
    pub allowed_chats: Vec<i64>,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token_env: default_token_env(),
            allowed_chats: Vec::new(),
        }
    }
}

/// Pacing between multi-part replies.
#[derive(Debug, Deserialize)]
pub struct RepliesConfig {
    /// Delay before each paced reply, in milliseconds.
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
}

impl RepliesConfig {
    /// Pacing delay as a [`Duration`].
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

impl Default for RepliesConfig {
    fn default() -> Self {
        Self {
            pause_ms: default_pause_ms(),
        }
    }
}

/// Chart rendering options.
#[derive(Debug, Deserialize)]
pub struct PlotConfig {
    /// Draw the y-axis on a base-10 logarithmic scale.
    #[serde(default)]
    pub log_scale: bool,

    /// Image width in pixels.
    #[serde(default = "default_plot_width")]
    pub width: u32,

    /// Image height in pixels.
    #[serde(default = "default_plot_height")]
    pub height: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            log_scale: false,
            width: default_plot_width(),
            height: default_plot_height(),
        }
    }
}

// Default value functions for serde

fn default_base_url() -> String {
    crate::stats::covid19api::DEFAULT_BASE_URL.to_owned()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_token_env() -> String {
    "COVIDBOT_TELEGRAM_TOKEN".to_owned()
}
fn default_pause_ms() -> u64 {
    1000
}
fn default_plot_width() -> u32 {
    1400
}
fn default_plot_height() -> u32 {
    1200
}

/// Load the configuration from a TOML file.
///
/// A missing file is not an error: the defaults are returned instead.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no config file found, using defaults");
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(anyhow::anyhow!(
                "failed to read config at {}: {e}",
                path.display()
            ))
        }
    };
    let config: Config = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config at {}: {e}", path.display()))?;
    Ok(config)
}

/// Resolve the default config directory (`~/.covidbot/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".covidbot"))
}

/// Read the Telegram bot token from the environment variable named in config.
///
/// # Errors
///
/// Returns an error if the variable is unset or empty.
pub fn telegram_token(config: &TelegramConfig) -> anyhow::Result<String> {
    match std::env::var(&config.bot_token_env) {
        Ok(token) if !token.trim().is_empty() => Ok(token),
        _ => Err(anyhow::anyhow!(
            "telegram token not found: set {}",
            config.bot_token_env
        )),
    }
}
