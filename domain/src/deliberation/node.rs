//! Deliberation output nodes
//!
//! A deliberation produces a flat, append-only sequence of nodes. Each node
//! is one unit of orchestration output (the user prompt, a plan step, a
//! research finding, a critique, a synthesis, ...). The node log never
//! rewrites history: nodes are immutable once appended, and all structure
//! (sections, turns) is derived from the log on demand.

use crate::core::model::Model;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Per-session ordering key of a node (Value Object).
///
/// Ids are assigned by the server, monotonically increasing, and unique
/// within a session. Arrival order is the authoritative causal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a persisted deliberation (Value Object).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub i64);

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind tag of a node (Value Object).
///
/// Which tags appear in a session depends on the orchestration strategy the
/// server ran, and the strategy is not declared up front — consumers infer
/// the session's shape from the tags present (see
/// [`NodeLog::shape`](super::log::NodeLog::shape)). Unknown tags are
/// preserved as [`NodeKind::Other`] so new server-side node kinds never
/// lose data on older clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The user prompt anchoring a session or a chat turn.
    Root,
    /// Coordinator plan (pipeline strategy).
    Plan,
    /// A council member's research finding.
    Research,
    /// A peer critique of earlier findings.
    Critique,
    /// The chairman's final synthesis (pipeline/ensemble strategies).
    Synthesis,
    /// Initial draft (diagnostic panel).
    Proposal,
    /// A revised draft after critique (diagnostic panel).
    Refinement,
    /// Generated QA test cases (diagnostic panel).
    TestCases,
    /// The panel's final verdict (diagnostic panel).
    Verdict,
    /// A tag this client does not know about.
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Plan => "plan",
            NodeKind::Research => "research",
            NodeKind::Critique => "critique",
            NodeKind::Synthesis => "synthesis",
            NodeKind::Proposal => "proposal",
            NodeKind::Refinement => "refinement",
            NodeKind::TestCases => "test_cases",
            NodeKind::Verdict => "verdict",
            NodeKind::Other(s) => s,
        }
    }

    /// Tags that only the diagnostic panel emits.
    ///
    /// The presence of any of these marks a session as panel-shaped.
    pub fn is_panel_marker(&self) -> bool {
        matches!(
            self,
            NodeKind::Proposal | NodeKind::Refinement | NodeKind::TestCases | NodeKind::Verdict
        )
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NodeKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "root" => NodeKind::Root,
            "plan" => NodeKind::Plan,
            "research" => NodeKind::Research,
            "critique" => NodeKind::Critique,
            "synthesis" => NodeKind::Synthesis,
            "proposal" => NodeKind::Proposal,
            "refinement" => NodeKind::Refinement,
            "test_cases" => NodeKind::TestCases,
            "verdict" => NodeKind::Verdict,
            other => NodeKind::Other(other.to_string()),
        })
    }
}

impl Serialize for NodeKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap())
    }
}

/// A file reference attached to a root node (Value Object).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Server-assigned attachment id.
    pub id: String,
    /// Original filename.
    pub filename: String,
    /// Media kind (image, document, video, ...).
    pub kind: String,
}

/// One unit of deliberation output (Entity).
///
/// Nodes are append-only: a node is never updated in place, its kind is
/// immutable, and a given id is applied to a log at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Payload, treated as opaque formatted text.
    pub content: String,
    /// Producing model; absent on root nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<Model>,
    /// Anchor to the root node this one responds to (multi-turn sessions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    /// File references; only root nodes carry them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    /// Reviewer confidence, attached to panel critiques.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Node {
    /// Minimal constructor used by tests and fixtures.
    pub fn new(id: i64, kind: NodeKind, content: impl Into<String>) -> Self {
        Self {
            id: NodeId(id),
            kind,
            content: content.into(),
            model: None,
            parent_id: None,
            attachments: Vec::new(),
            score: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<Model>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_parent(mut self, parent: i64) -> Self {
        self.parent_id = Some(NodeId(parent));
        self
    }

    pub fn is_root(&self) -> bool {
        self.kind == NodeKind::Root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_string_roundtrip() {
        for tag in [
            "root",
            "plan",
            "research",
            "critique",
            "synthesis",
            "proposal",
            "refinement",
            "test_cases",
            "verdict",
        ] {
            let kind: NodeKind = tag.parse().unwrap();
            assert_eq!(kind.as_str(), tag);
            assert!(!matches!(kind, NodeKind::Other(_)));
        }
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let kind: NodeKind = "debate_summary".parse().unwrap();
        assert_eq!(kind, NodeKind::Other("debate_summary".to_string()));
        assert_eq!(kind.as_str(), "debate_summary");
    }

    #[test]
    fn test_panel_markers() {
        assert!(NodeKind::Proposal.is_panel_marker());
        assert!(NodeKind::Verdict.is_panel_marker());
        assert!(!NodeKind::Research.is_panel_marker());
        assert!(!NodeKind::Other("verdict2".into()).is_panel_marker());
    }

    #[test]
    fn test_node_wire_deserialization() {
        let node: Node = serde_json::from_value(serde_json::json!({
            "id": 7,
            "type": "research",
            "content": "findings",
            "model": "openai/gpt-4o",
            "parent_id": 1
        }))
        .unwrap();
        assert_eq!(node.id, NodeId(7));
        assert_eq!(node.kind, NodeKind::Research);
        assert_eq!(node.model.as_ref().map(|m| m.as_str()), Some("openai/gpt-4o"));
        assert_eq!(node.parent_id, Some(NodeId(1)));
        assert!(node.attachments.is_empty());
    }

    #[test]
    fn test_root_node_with_attachments() {
        let node: Node = serde_json::from_value(serde_json::json!({
            "id": 1,
            "type": "root",
            "content": "Summarize the design",
            "attachments": [
                { "id": "a1", "filename": "design.pdf", "kind": "document" }
            ]
        }))
        .unwrap();
        assert!(node.is_root());
        assert!(node.model.is_none());
        assert_eq!(node.attachments.len(), 1);
        assert_eq!(node.attachments[0].filename, "design.pdf");
    }
}
