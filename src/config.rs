use std::path::Path;

use anyhow::Context;
use precinct_models::ModelConfig;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub models: ModelConfig,
}

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("PRECINCT_SENTIMENT_REPO") {
            self.models.sentiment_repo = v;
        }
        if let Ok(v) = std::env::var("PRECINCT_ZERO_SHOT_REPO") {
            self.models.zero_shot_repo = v;
        }
        if let Ok(v) = std::env::var("PRECINCT_NER_REPO") {
            self.models.ner_repo = v;
        }
        if let Ok(v) = std::env::var("PRECINCT_DEVICE") {
            self.models.device = v;
        }
    }
}
