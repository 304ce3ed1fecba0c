//! Replay Conversation use case
//!
//! Loads a persisted session from the history interface and rebuilds its
//! node log in one pass. No streaming is involved — and because every
//! grouping is a pure derivation over the log, the replayed log yields the
//! same turns and shape the live session did.

use crate::ports::council_gateway::{ConversationSummary, CouncilGateway, GatewayError};
use consilium_domain::{ConversationId, NodeLog};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ReplayConversationError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// A persisted session rebuilt for viewing.
#[derive(Debug)]
pub struct ReplayedConversation {
    pub summary: ConversationSummary,
    pub log: NodeLog,
}

/// Use case for browsing a persisted deliberation.
pub struct ReplayConversationUseCase<G: CouncilGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: CouncilGateway + 'static> ReplayConversationUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub async fn execute(
        &self,
        id: ConversationId,
    ) -> Result<ReplayedConversation, ReplayConversationError> {
        let record = self.gateway.fetch_conversation(id).await?;
        info!(
            conversation_id = %id,
            nodes = record.nodes.len(),
            "Replaying persisted conversation"
        );

        Ok(ReplayedConversation {
            summary: record.conversation,
            log: NodeLog::replay(record.nodes),
        })
    }
}
