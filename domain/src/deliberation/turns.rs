//! Turn grouping for multi-turn sessions
//!
//! A turn is one root prompt plus the nodes that answer it, matched by
//! `parent_id`. Turns are recomputed from the full log every time — a
//! lookup from root id to child list over the arena, never nested object
//! references — so a log populated node-by-node while streaming and the
//! same log loaded at once from history produce identical groupings.

use crate::deliberation::log::NodeLog;
use crate::deliberation::node::{Node, NodeId};
use std::collections::HashSet;

/// One request/response exchange of a multi-turn session.
#[derive(Debug)]
pub struct Turn<'a> {
    /// The user prompt anchoring the turn.
    pub root: &'a Node,
    /// Nodes answering this root, in log order.
    pub replies: Vec<&'a Node>,
}

impl NodeLog {
    /// Group the log into turns, ordered by root id.
    ///
    /// A non-root node belongs to the turn whose root id equals its
    /// `parent_id`; nodes with no parent or a parent that matches no root
    /// belong to no turn (see [`orphan_replies`](Self::orphan_replies)).
    pub fn turns(&self) -> Vec<Turn<'_>> {
        let mut roots: Vec<&Node> = self.nodes().iter().filter(|n| n.is_root()).collect();
        roots.sort_by_key(|n| n.id);

        roots
            .into_iter()
            .map(|root| Turn {
                root,
                replies: self
                    .nodes()
                    .iter()
                    .filter(|n| !n.is_root() && n.parent_id == Some(root.id))
                    .collect(),
            })
            .collect()
    }

    /// Non-root nodes whose `parent_id` matches no root in the log.
    ///
    /// Orphans are retained in the log (data is never dropped) but appear
    /// in zero turns; callers decide how to surface them.
    pub fn orphan_replies(&self) -> Vec<&Node> {
        let root_ids: HashSet<NodeId> = self
            .nodes()
            .iter()
            .filter(|n| n.is_root())
            .map(|n| n.id)
            .collect();

        self.nodes()
            .iter()
            .filter(|n| {
                !n.is_root()
                    && n.parent_id
                        .is_some_and(|parent| !root_ids.contains(&parent))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deliberation::node::NodeKind;

    fn root(id: i64) -> Node {
        Node::new(id, NodeKind::Root, format!("prompt-{id}"))
    }

    fn reply(id: i64, parent: i64) -> Node {
        Node::new(id, NodeKind::Research, format!("reply-{id}")).with_parent(parent)
    }

    #[test]
    fn test_live_and_replay_produce_identical_turns() {
        let fixture = [root(1), reply(2, 1), root(3), reply(4, 3)];

        let mut live = NodeLog::new();
        for node in fixture.clone() {
            live.apply(node);
        }
        let replayed = NodeLog::replay(fixture);

        for log in [&live, &replayed] {
            let turns = log.turns();
            assert_eq!(turns.len(), 2);
            assert_eq!(turns[0].root.id.0, 1);
            assert_eq!(turns[0].replies.len(), 1);
            assert_eq!(turns[0].replies[0].id.0, 2);
            assert_eq!(turns[1].root.id.0, 3);
            assert_eq!(turns[1].replies[0].id.0, 4);
        }
    }

    #[test]
    fn test_turns_ordered_by_root_id_not_arrival() {
        let log = NodeLog::replay([root(5), reply(6, 5), root(2), reply(3, 2)]);
        let turns = log.turns();
        assert_eq!(turns[0].root.id.0, 2);
        assert_eq!(turns[1].root.id.0, 5);
    }

    #[test]
    fn test_orphan_is_retained_but_in_no_turn() {
        let log = NodeLog::replay([root(1), reply(2, 1), reply(9, 42)]);
        assert_eq!(log.len(), 3);

        let turns = log.turns();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].replies.len(), 1);

        let orphans = log.orphan_replies();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].id.0, 9);
    }

    #[test]
    fn test_reply_without_parent_is_not_an_orphan() {
        // Pipeline sessions emit parentless nodes; they are simply outside
        // the turn structure, not dangling.
        let log = NodeLog::replay([root(1), Node::new(2, NodeKind::Synthesis, "s")]);
        assert!(log.orphan_replies().is_empty());
        assert!(log.turns()[0].replies.is_empty());
    }

    #[test]
    fn test_replies_keep_log_order_within_turn() {
        let log = NodeLog::replay([root(1), reply(4, 1), reply(2, 1), reply(3, 1)]);
        let turns = log.turns();
        let ids: Vec<i64> = turns[0].replies.iter().map(|n| n.id.0).collect();
        assert_eq!(ids, vec![4, 2, 3]);
    }
}
