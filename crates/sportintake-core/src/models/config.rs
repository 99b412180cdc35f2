//! Configuration structures for the intake pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IntakeError, Result};

/// Main configuration for the sportintake pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Remote AI extractor configuration.
    pub remote: RemoteConfig,

    /// Heuristic extraction configuration.
    pub extraction: ExtractionConfig,

    /// Duplicate submission suppression.
    pub dedup: DedupConfig,
}

/// Remote AI extractor (OpenAI-compatible chat completions endpoint).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Try the remote extractor before the heuristic path.
    pub enabled: bool,

    /// Base URL of the API (the client appends `/chat/completions`).
    pub endpoint: String,

    /// Model name sent with each request.
    pub model: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Upper bound for a single remote extraction.
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 20,
        }
    }
}

/// Heuristic extraction limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Documents shorter than this (after trimming) are rejected.
    pub min_input_length: usize,

    /// Cap for the indication reasoning section.
    pub reasoning_max_chars: usize,

    /// Cap for the guidance tips section.
    pub guidance_max_chars: usize,

    /// Cap for the learning goals section.
    pub learning_goals_max_chars: usize,

    /// Cap for the mutation reason.
    pub reason_max_chars: usize,

    /// Cap for the mutation context section.
    pub context_max_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_input_length: 10,
            reasoning_max_chars: 2000,
            guidance_max_chars: 1500,
            learning_goals_max_chars: 1000,
            reason_max_chars: 500,
            context_max_chars: 1500,
        }
    }
}

/// Duplicate submission window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Identical documents within this window are treated as duplicates.
    pub ttl_secs: u64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self { ttl_secs: 10 }
    }
}

impl IntakeConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            IntakeError::Config(format!("{}: {}", path.display(), e))
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{ "remote": { "enabled": false }, "extraction": { "min_input_length": 20 } }"#;
        let config: IntakeConfig = serde_json::from_str(json).unwrap();

        assert!(!config.remote.enabled);
        assert_eq!(config.remote.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.extraction.min_input_length, 20);
        assert_eq!(config.extraction.reasoning_max_chars, 2000);
        assert_eq!(config.dedup.ttl_secs, 10);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("sportintake-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");

        let mut config = IntakeConfig::default();
        config.remote.timeout_secs = 5;
        config.save(&path).unwrap();

        let loaded = IntakeConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_dir_all(&dir).ok();
    }
}
