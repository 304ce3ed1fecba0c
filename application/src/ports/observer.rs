//! Session observation port
//!
//! Callback interface for live progress while a session streams.
//! Implementations live in the presentation layer (console, web UI, ...);
//! everything reported here is also recoverable from the finished session,
//! so observers are purely cosmetic.

use consilium_domain::{ConversationId, Node};

/// Callbacks fired as a streaming session advances.
pub trait SessionObserver: Send + Sync {
    /// The server assigned a conversation id to a fresh session.
    fn on_started(&self, _conversation_id: ConversationId) {}

    /// Progress text changed (last write wins).
    fn on_status(&self, _message: &str) {}

    /// A node was appended to the log. Not fired for duplicates.
    fn on_node(&self, _node: &Node) {}
}

/// No-op observer for when progress reporting is not needed.
pub struct NoObserver;

impl SessionObserver for NoObserver {}
