use crate::domain::error::LingoError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Never call networked backends; local models and pivot only.
    #[serde(default)]
    pub offline_mode: bool,
    #[serde(default)]
    pub backends: Backends,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub logging: Logging,
}

/// Per-backend enable switches. All on by default; the fallback chain skips
/// disabled backends without attempting them.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Backends {
    #[serde(default = "default_true")]
    pub use_ai_models: bool,
    #[serde(default = "default_true")]
    pub use_google_translate: bool,
    #[serde(default = "default_true")]
    pub use_mymemory: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheSettings {
    /// Cache directory; defaults to the platform cache dir.
    pub dir: Option<String>,
    /// None auto-detects a reachable server at startup.
    pub use_redis: Option<bool>,
    /// Falls back to $REDIS_URL, then localhost.
    pub redis_url: Option<String>,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HistorySettings {
    #[serde(default = "default_true")]
    pub enable: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_true")]
    pub enable: bool,
    pub path: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for Backends {
    fn default() -> Self {
        Self {
            use_ai_models: true,
            use_google_translate: true,
            use_mymemory: true,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: None,
            use_redis: None,
            redis_url: None,
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { enable: true }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            level: "WARN".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            offline_mode: false,
            backends: Backends::default(),
            cache: CacheSettings::default(),
            history: HistorySettings::default(),
            logging: Logging::default(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_ttl_secs() -> u64 {
    3600
}
fn default_log_level() -> String {
    "WARN".to_string()
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("lingo").join("config.toml"))
}

/// Cache directory (config override or platform default).
pub fn get_cache_dir(config: &Config) -> PathBuf {
    if let Some(dir) = &config.cache.dir {
        return PathBuf::from(dir);
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lingo")
}

pub fn get_history_path(config: &Config) -> PathBuf {
    get_cache_dir(config).join("history.db")
}

pub fn load_config() -> Result<Config, LingoError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            match toml::from_str::<Config>(&content) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to parse config file: {}. Using defaults.",
                        e
                    );
                }
            }
        }
    }

    Ok(Config::default())
}

pub fn generate_config_sample() -> Result<(), LingoError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            eprintln!("Config file already exists at: {}", path.display());
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let sample = Config::default();
        let toml_content = toml::to_string_pretty(&sample)
            .map_err(|e| LingoError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, toml_content)
            .map_err(|e| LingoError::Config(format!("Failed to write config file: {}", e)))?;
        println!("Generated config file at: {}", path.display());
    } else {
        return Err(LingoError::Config(
            "Cannot determine config directory".to_string(),
        ));
    }

    Ok(())
}
