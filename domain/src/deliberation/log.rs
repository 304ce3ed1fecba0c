//! Append-only node log and derived groupings
//!
//! The log is the single source of truth for a session's output: an ordered
//! arena of nodes plus an id index for duplicate suppression. Everything a
//! view needs (typed slots, chronological panels, turns) is a pure
//! derivation over the full log, so live accumulation and replay from
//! persisted history always agree.

use crate::deliberation::node::{Node, NodeId, NodeKind};
use std::collections::HashSet;

/// Append-only log of deliberation output with duplicate suppression.
#[derive(Debug, Clone, Default)]
pub struct NodeLog {
    nodes: Vec<Node>,
    seen: HashSet<NodeId>,
}

/// How a session's nodes should be grouped, inferred from the tags present.
///
/// The strategy that produced a session is not declared on the wire; it is
/// inferred from which node kinds appear. Panel-only tags mark the
/// diagnostic-panel shape, presented as one chronological sequence; every
/// other session is pipeline-shaped, presented categorically. The inference
/// is a structural property of the protocol and is reproduced here exactly
/// (a future strategy reusing panel tags would be misclassified — see
/// DESIGN.md).
#[derive(Debug)]
pub enum SessionShape<'a> {
    Pipeline(PipelineView<'a>),
    Panel(PanelView<'a>),
}

/// Categorical slots of a pipeline/ensemble session.
///
/// Slots render independently of arrival order: one plan, any number of
/// research findings and critiques, one synthesis.
#[derive(Debug, Default)]
pub struct PipelineView<'a> {
    pub plan: Option<&'a Node>,
    pub research: Vec<&'a Node>,
    pub critiques: Vec<&'a Node>,
    pub synthesis: Option<&'a Node>,
}

/// Chronological view of a diagnostic-panel session.
///
/// All non-root nodes ordered by id, whatever their kind — the panel's
/// propose/critique/refine loop only makes sense read in sequence.
#[derive(Debug, Default)]
pub struct PanelView<'a> {
    pub entries: Vec<&'a Node>,
}

impl NodeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from a persisted node sequence (history replay).
    pub fn replay(nodes: impl IntoIterator<Item = Node>) -> Self {
        let mut log = Self::new();
        for node in nodes {
            log.apply(node);
        }
        log
    }

    /// Append a node. Returns `false` (and leaves the log untouched) when a
    /// node with the same id was already applied — a session resumed
    /// mid-stream may redeliver its anchor nodes.
    ///
    /// Never fails: semantically odd nodes (unknown kinds, dangling
    /// parents) are retained as-is and dealt with at derivation time.
    pub fn apply(&mut self, node: Node) -> bool {
        if !self.seen.insert(node.id) {
            return false;
        }
        self.nodes.push(node);
        true
    }

    /// All nodes in arrival order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.seen.contains(&id)
    }

    /// All nodes with the given kind, in log order.
    pub fn of_kind(&self, kind: &NodeKind) -> Vec<&Node> {
        self.nodes.iter().filter(|n| &n.kind == kind).collect()
    }

    /// First node with the given kind, if any.
    pub fn first_of_kind(&self, kind: &NodeKind) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.kind == kind)
    }

    /// Group the log by the session's inferred shape.
    pub fn shape(&self) -> SessionShape<'_> {
        let is_panel = self.nodes.iter().any(|n| n.kind.is_panel_marker());

        if is_panel {
            let mut entries: Vec<&Node> = self.nodes.iter().filter(|n| !n.is_root()).collect();
            entries.sort_by_key(|n| n.id);
            return SessionShape::Panel(PanelView { entries });
        }

        let mut view = PipelineView::default();
        for node in &self.nodes {
            match node.kind {
                NodeKind::Plan => {
                    if view.plan.is_none() {
                        view.plan = Some(node);
                    }
                }
                NodeKind::Research => view.research.push(node),
                NodeKind::Critique => view.critiques.push(node),
                NodeKind::Synthesis => {
                    if view.synthesis.is_none() {
                        view.synthesis = Some(node);
                    }
                }
                // Root anchors turns, unknown kinds have no slot; both stay
                // in the log untouched.
                _ => {}
            }
        }
        SessionShape::Pipeline(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deliberation::node::NodeKind;

    fn node(id: i64, kind: NodeKind) -> Node {
        Node::new(id, kind, format!("content-{id}"))
    }

    #[test]
    fn test_apply_is_idempotent_per_id() {
        let mut log = NodeLog::new();
        assert!(log.apply(node(1, NodeKind::Plan)));
        assert!(!log.apply(node(1, NodeKind::Plan)));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_duplicate_keeps_first_applied_node() {
        let mut log = NodeLog::new();
        log.apply(Node::new(1, NodeKind::Plan, "first"));
        log.apply(Node::new(1, NodeKind::Plan, "second"));
        assert_eq!(log.nodes()[0].content, "first");
    }

    #[test]
    fn test_of_kind_preserves_log_order() {
        let mut log = NodeLog::new();
        log.apply(node(3, NodeKind::Research));
        log.apply(node(1, NodeKind::Research));
        log.apply(node(2, NodeKind::Critique));
        let research = log.of_kind(&NodeKind::Research);
        assert_eq!(research.len(), 2);
        assert_eq!(research[0].id.0, 3);
        assert_eq!(research[1].id.0, 1);
    }

    #[test]
    fn test_pipeline_shape_grouping() {
        let log = NodeLog::replay([
            node(1, NodeKind::Root),
            node(2, NodeKind::Plan),
            node(3, NodeKind::Research),
            node(4, NodeKind::Research),
            node(5, NodeKind::Synthesis),
        ]);
        match log.shape() {
            SessionShape::Pipeline(view) => {
                assert_eq!(view.plan.unwrap().id.0, 2);
                assert_eq!(view.research.len(), 2);
                assert!(view.critiques.is_empty());
                assert_eq!(view.synthesis.unwrap().id.0, 5);
            }
            SessionShape::Panel(_) => panic!("expected pipeline shape"),
        }
    }

    #[test]
    fn test_panel_shape_is_chronological() {
        let log = NodeLog::replay([
            node(1, NodeKind::Root),
            node(4, NodeKind::Verdict),
            node(2, NodeKind::Proposal),
            node(3, NodeKind::Critique),
        ]);
        match log.shape() {
            SessionShape::Panel(view) => {
                let ids: Vec<i64> = view.entries.iter().map(|n| n.id.0).collect();
                assert_eq!(ids, vec![2, 3, 4]);
            }
            SessionShape::Pipeline(_) => panic!("expected panel shape"),
        }
    }

    #[test]
    fn test_critique_alone_does_not_mark_panel() {
        // Critiques appear in both shapes; only panel-exclusive tags flip
        // the classification.
        let log = NodeLog::replay([node(1, NodeKind::Research), node(2, NodeKind::Critique)]);
        assert!(matches!(log.shape(), SessionShape::Pipeline(_)));
    }

    #[test]
    fn test_unknown_kind_retained_but_unslotted() {
        let mut log = NodeLog::new();
        log.apply(node(1, NodeKind::Plan));
        log.apply(node(2, NodeKind::Other("debate_summary".into())));
        assert_eq!(log.len(), 2);
        match log.shape() {
            SessionShape::Pipeline(view) => {
                assert!(view.plan.is_some());
                assert!(view.research.is_empty());
            }
            SessionShape::Panel(_) => panic!("unknown kind must not flip the shape"),
        }
    }

    #[test]
    fn test_unknown_kind_visible_in_panel_sequence() {
        let log = NodeLog::replay([
            node(2, NodeKind::Other("aside".into())),
            node(1, NodeKind::Proposal),
        ]);
        match log.shape() {
            SessionShape::Panel(view) => {
                let ids: Vec<i64> = view.entries.iter().map(|n| n.id.0).collect();
                assert_eq!(ids, vec![1, 2]);
            }
            SessionShape::Pipeline(_) => panic!("expected panel shape"),
        }
    }
}
