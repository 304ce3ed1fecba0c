//! Orchestration strategy selector
//!
//! Selected per request and sent to the server; it determines which node
//! kinds the stream will carry. Multi-turn chat is not a member — it has
//! its own endpoint rather than a selector value.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Orchestration method for a council run (Value Object).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunStrategy {
    /// DAG pipeline: plan → parallel research → critique → synthesis.
    #[default]
    Pipeline,
    /// All members answer in parallel, the chairman synthesizes.
    Ensemble,
    /// Diagnostic panel: propose → critique/test → refine → verdict loop.
    Panel,
}

impl RunStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStrategy::Pipeline => "pipeline",
            RunStrategy::Ensemble => "ensemble",
            RunStrategy::Panel => "panel",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RunStrategy::Pipeline => "Pipeline",
            RunStrategy::Ensemble => "Ensemble",
            RunStrategy::Panel => "Diagnostic Panel",
        }
    }
}

impl std::fmt::Display for RunStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RunStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pipeline" => Ok(RunStrategy::Pipeline),
            "ensemble" => Ok(RunStrategy::Ensemble),
            "panel" => Ok(RunStrategy::Panel),
            other => Err(format!("unknown strategy: {other}")),
        }
    }
}

impl Serialize for RunStrategy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RunStrategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
