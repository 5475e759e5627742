use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ai::openai::DEFAULT_BASE_URL;
use crate::error::ConfigError;
use crate::generation::GenerationSettings;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub subject_max_tokens: Option<u32>,
    pub body_max_tokens: Option<u32>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the default location. A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// API key from the environment first, then the config file.
    pub fn api_key(&self) -> Option<String> {
        Self::key_from(std::env::var(API_KEY_ENV).ok(), self.openai_api_key.clone())
    }

    fn key_from(env_key: Option<String>, file_key: Option<String>) -> Option<String> {
        env_key
            .filter(|k| !k.trim().is_empty())
            .or(file_key)
            .filter(|k| !k.trim().is_empty())
    }

    pub fn base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Generation settings with the file's overrides applied on top of the
    /// defaults. A `model_override` (e.g. from the command line) wins.
    pub fn generation_settings(&self, model_override: Option<&str>) -> GenerationSettings {
        let defaults = GenerationSettings::default();
        GenerationSettings {
            model: model_override
                .map(str::to_string)
                .or_else(|| self.model.clone())
                .unwrap_or(defaults.model),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            subject_max_tokens: self.subject_max_tokens.unwrap_or(defaults.subject_max_tokens),
            body_max_tokens: self.body_max_tokens.unwrap_or(defaults.body_max_tokens),
            system_prompt: defaults.system_prompt,
        }
    }

    pub fn get_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;

        Ok(config_dir.join("autoedm").join("config.json"))
    }
}
