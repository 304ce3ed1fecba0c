//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and validated before use.

use consilium_domain::RunStrategy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("server.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("council.chairman cannot be empty")]
    EmptyChairman,

    #[error("unknown council.strategy: {0}")]
    UnknownStrategy(String),

    #[error("council.max_iterations cannot be 0")]
    InvalidMaxIterations,
}

/// Raw server configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Base URL of the council backend
    pub base_url: String,
    /// Bearer token sent with every request
    pub api_token: Option<String>,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_token: None,
        }
    }
}

/// Raw council configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Council member model names as strings
    pub members: Vec<String>,
    /// Chairman model for synthesis
    pub chairman: String,
    /// Default orchestration strategy for `run`
    pub strategy: String,
    /// Upper bound on diagnostic-panel loops
    pub max_iterations: u32,
}

impl Default for FileCouncilConfig {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            chairman: "openai/gpt-4o".to_string(),
            strategy: RunStrategy::default().as_str().to_string(),
            max_iterations: 5,
        }
    }
}

impl FileCouncilConfig {
    /// Parse the configured strategy string.
    pub fn parse_strategy(&self) -> Result<RunStrategy, ConfigValidationError> {
        self.strategy
            .parse()
            .map_err(|_| ConfigValidationError::UnknownStrategy(self.strategy.clone()))
    }
}

/// Complete file configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: FileServerConfig,
    pub council: FileCouncilConfig,
}

impl FileConfig {
    /// Validate the merged configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.server.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        if self.council.chairman.trim().is_empty() {
            return Err(ConfigValidationError::EmptyChairman);
        }
        if self.council.max_iterations == 0 {
            return Err(ConfigValidationError::InvalidMaxIterations);
        }
        self.council.parse_strategy()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.base_url, "http://localhost:8000");
        assert_eq!(config.council.max_iterations, 5);
    }

    #[test]
    fn test_parse_from_toml() {
        let config: FileConfig = toml::from_str(
            r#"
            [server]
            base_url = "https://council.example.com"
            api_token = "secret"

            [council]
            members = ["openai/gpt-4o", "google/gemini-2.5-pro"]
            chairman = "anthropic/claude-sonnet-4"
            strategy = "ensemble"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.base_url, "https://council.example.com");
        assert_eq!(config.council.members.len(), 2);
        assert_eq!(
            config.council.parse_strategy().unwrap(),
            RunStrategy::Ensemble
        );
        // unspecified fields keep their defaults
        assert_eq!(config.council.max_iterations, 5);
    }

    #[test]
    fn test_unknown_strategy_fails_validation() {
        let mut config = FileConfig::default();
        config.council.strategy = "debate".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_zero_iterations_fails_validation() {
        let mut config = FileConfig::default();
        config.council.max_iterations = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidMaxIterations)
        ));
    }
}
