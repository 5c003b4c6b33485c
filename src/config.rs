use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Probed in order; the first existing directory becomes the scan
    /// root. Falls back to the working directory when none exist.
    pub root_candidates: Vec<PathBuf>,
    /// Conventional subdirectories seeded into discovery alongside the
    /// root and its parent.
    pub seed_subdirs: Vec<String>,
    /// Where the analysis documents are written.
    pub results_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_candidates: vec![
                PathBuf::from("./tests/e2e"),
                PathBuf::from("./e2e"),
                PathBuf::from("../e2e"),
            ],
            seed_subdirs: vec!["tests".to_string(), "e2e".to_string()],
            results_dir: PathBuf::from(crate::defaults::DEFAULT_RESULTS_DIR),
        }
    }
}

impl Config {
    pub async fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .await
                .context("Failed to read config file")?;

            let config: Config = toml::from_str(&contents)
                .context("Failed to parse config file")?;

            Ok(config)
        } else {
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    pub async fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(&config_path, contents)
            .await
            .context("Failed to write config file")?;

        Ok(())
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("speclens");

        Ok(config_dir.join(crate::defaults::DEFAULT_CONFIG_NAME))
    }
}
