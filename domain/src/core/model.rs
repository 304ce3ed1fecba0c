//! Model value object representing a council member

use serde::{Deserialize, Serialize};

/// Identifier of a model instance participating in a deliberation (Value Object).
///
/// The roster is served by the backend, so this is an open set of
/// provider-qualified identifiers (e.g. `openai/gpt-4o`) rather than a
/// closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Model(String);

impl Model {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Provider prefix of the identifier, if it is provider-qualified.
    pub fn provider(&self) -> Option<&str> {
        self.0.split_once('/').map(|(provider, _)| provider)
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Model(s.to_string()))
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        Model(s.to_string())
    }
}

impl From<String> for Model {
    fn from(s: String) -> Self {
        Model(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_display_roundtrip() {
        let model = Model::new("openai/gpt-4o");
        let parsed: Model = model.to_string().parse().unwrap();
        assert_eq!(model, parsed);
    }

    #[test]
    fn test_provider_prefix() {
        assert_eq!(Model::new("google/gemini-2.5-flash").provider(), Some("google"));
        assert_eq!(Model::new("local-model").provider(), None);
    }

    #[test]
    fn test_serde_transparent() {
        let model = Model::new("openai/gpt-4o");
        assert_eq!(serde_json::to_string(&model).unwrap(), "\"openai/gpt-4o\"");
    }
}
