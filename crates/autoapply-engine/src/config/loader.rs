use super::schema::AutoApplyConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `explicit` when given, otherwise fall back to the default locations.
    pub async fn load(explicit: Option<&Path>) -> Result<AutoApplyConfig, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path).await,
            None => Self::load_default().await,
        }
    }

    /// Load from default locations:
    /// 1. ./autoapply.yaml
    /// 2. ~/.autoapply/config.yaml
    /// 3. Default configuration
    pub async fn load_default() -> Result<AutoApplyConfig, ConfigError> {
        let local_config = PathBuf::from("./autoapply.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".autoapply").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config).await;
            }
        }

        info!("No configuration file found, using built-in defaults");
        let config = AutoApplyConfig::default();
        Self::validate(&config)?;
        Ok(config)
    }

    pub async fn load_from(path: &Path) -> Result<AutoApplyConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config = Self::parse(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<AutoApplyConfig, ConfigError> {
        let config: AutoApplyConfig = serde_yaml::from_str(content)?;
        Self::validate(&config)?;
        Ok(config)
    }

    pub fn validate(config: &AutoApplyConfig) -> Result<(), ConfigError> {
        if config.timing.max_steps == 0 {
            return Err(ConfigError::Invalid(
                "timing.max_steps must be at least 1".into(),
            ));
        }
        if config.answers.resume_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "answers.resume_path must not be empty".into(),
            ));
        }
        if config.site.card.trim().is_empty() || config.site.description.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "site.card and site.description selectors are required".into(),
            ));
        }
        Ok(())
    }
}
