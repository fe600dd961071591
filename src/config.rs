use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{Result, SubrelayError};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "subrelay.toml";

pub const REGIONAL_KEYS_ENV: &str = "SUBRELAY_REGIONAL_API_KEYS";
pub const GENERAL_KEYS_ENV: &str = "SUBRELAY_GENERAL_API_KEYS";
pub const DEFAULT_LANGUAGE_ENV: &str = "SUBRELAY_DEFAULT_LANGUAGE";

fn default_timeout_secs() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_entries() -> usize {
    50
}

fn default_progress_interval() -> usize {
    10
}

fn default_language() -> String {
    "kh".to_string()
}

fn default_regional_codes() -> Vec<String> {
    ["km", "th", "vi", "lo", "my", "ms", "id", "tl", "zh-CN", "ja", "ko"]
        .iter()
        .map(|code| code.to_string())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub languages: LanguageConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Preferred backend for languages in the regional set
    pub regional: Option<ServiceConfig>,
    /// General-purpose backend, also the fallback for the regional one
    pub general: Option<ServiceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Which wire protocol the backend speaks
    pub kind: ServiceKind,
    /// Base URL, without the trailing route
    pub endpoint: String,
    /// Model name, ignored by literal backends
    #[serde(default)]
    pub model: String,
    /// API keys used round-robin
    #[serde(default)]
    pub api_keys: Vec<String>,
    /// Sampling temperature for chat backends
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// HTTP timeout per call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceKind {
    /// OpenAI-compatible chat completion endpoint
    ChatCompletion,
    /// Literal machine translation (Google translate_a/single)
    Literal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    /// Command tag used for users without a stored preference
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Language codes routed to the regional service first
    #[serde(default = "default_regional_codes")]
    pub regional: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Largest subtitle file accepted, in entries
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    /// Emit a progress update every this many entries
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
    /// Translate entries concurrently, bounded by the number of API keys
    #[serde(default)]
    pub parallel: bool,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            regional: default_regional_codes(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            progress_interval: default_progress_interval(),
            parallel: false,
        }
    }
}

impl ServiceConfig {
    /// Gemini through its OpenAI-compatible surface
    pub fn default_regional() -> Self {
        Self {
            kind: ServiceKind::ChatCompletion,
            endpoint: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_keys: Vec::new(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Keyless Google endpoint
    pub fn default_general() -> Self {
        Self {
            kind: ServiceKind::Literal,
            endpoint: "https://translate.googleapis.com".to_string(),
            model: String::new(),
            api_keys: Vec::new(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            services: ServicesConfig {
                regional: Some(ServiceConfig::default_regional()),
                general: Some(ServiceConfig::default_general()),
            },
            languages: LanguageConfig::default(),
            batch: BatchConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SubrelayError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SubrelayError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SubrelayError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| SubrelayError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Load from an explicit path, else `subrelay.toml` in the working
    /// directory, else defaults. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                if Path::new(DEFAULT_CONFIG_FILE).exists() {
                    info!("Found {} in current directory, loading...", DEFAULT_CONFIG_FILE);
                    Self::from_file(DEFAULT_CONFIG_FILE)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay API keys and the default language from a variable lookup.
    /// Keys for a slot with no configured service enable that slot's default.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(keys) = lookup(REGIONAL_KEYS_ENV) {
            let keys = split_keys(&keys);
            if !keys.is_empty() {
                self.services
                    .regional
                    .get_or_insert_with(ServiceConfig::default_regional)
                    .api_keys
                    .extend(keys);
            }
        }

        if let Some(keys) = lookup(GENERAL_KEYS_ENV) {
            let keys = split_keys(&keys);
            if !keys.is_empty() {
                self.services
                    .general
                    .get_or_insert_with(ServiceConfig::default_general)
                    .api_keys
                    .extend(keys);
            }
        }

        if let Some(language) = lookup(DEFAULT_LANGUAGE_ENV) {
            let language = language.trim();
            if !language.is_empty() {
                self.languages.default_language = language.to_string();
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if crate::language::find(&self.languages.default_language).is_none() {
            return Err(SubrelayError::Config(format!(
                "Default language '{}' is not a supported language command",
                self.languages.default_language
            )));
        }

        if self.batch.max_entries == 0 {
            return Err(SubrelayError::Config("batch.max_entries must be at least 1".to_string()));
        }

        if self.batch.progress_interval == 0 {
            return Err(SubrelayError::Config(
                "batch.progress_interval must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Split a comma-separated key list, dropping blanks
pub fn split_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}
