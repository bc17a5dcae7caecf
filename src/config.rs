use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::sync::SyncTiming;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings directory holding the config, session and log files
    pub settings_dir: PathBuf,
    /// Backend HTTP host
    pub backend_host: String,
    /// Backend HTTP port
    pub backend_port: u16,
    /// Target frames per second for the UI loop
    pub fps: u32,
    /// Wait between attempts while the broker is not connected
    pub connect_retry_ms: u64,
    /// Wait between drains of the broker subscription
    pub receive_poll_ms: u64,
    /// Wait after finding the send queue empty
    pub sender_idle_ms: u64,
    /// Session file (default: <settings_dir>/session)
    pub session_file: Option<PathBuf>,
    /// Log file (default: <settings_dir>/relaychat.log)
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            settings_dir: home_dir.join(".relaychat"),
            backend_host: "localhost".to_string(),
            backend_port: 8000,
            fps: 60,
            connect_retry_ms: 1000,
            receive_poll_ms: 1000,
            sender_idle_ms: 50,
            session_file: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or `~/.relaychat/config.toml`.
    /// A missing file yields the defaults.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p
        } else {
            let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home_dir.join(".relaychat").join("config.toml")
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Invalid config in {}", config_path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = if let Some(p) = path {
            p
        } else {
            self.settings_dir.join("config.toml")
        };

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| self.settings_dir.join("session"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.settings_dir.join("relaychat.log"))
    }

    pub fn sync_timing(&self) -> SyncTiming {
        SyncTiming {
            connect_retry: Duration::from_millis(self.connect_retry_ms),
            receive_poll: Duration::from_millis(self.receive_poll_ms),
            sender_idle: Duration::from_millis(self.sender_idle_ms),
        }
    }

    /// Time allotted to one UI frame. An `fps` of zero is treated as one.
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}
